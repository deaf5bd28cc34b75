use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::application::ports::VectorStore;
use crate::application::services::DocumentInput;
use crate::domain::ExtractionSchema;
use crate::infrastructure::persistence::VectorStoreManager;
use crate::presentation::config::Settings;
use crate::presentation::state::AppState;

#[derive(Debug, Parser)]
#[command(name = "docextract", version, about = "Extract schema-shaped JSON from documents")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run extraction over one or more files and print a JSON array of reports.
    Extract {
        /// JSON object mapping field name to {type, prompt, enabled}.
        #[arg(long)]
        schema: PathBuf,
        /// Free-text domain instruction; overrides the configured default.
        #[arg(long, conflicts_with = "instruction_file")]
        instruction: Option<String>,
        #[arg(long)]
        instruction_file: Option<PathBuf>,
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the configured vector store's index status.
    Status,
}

/// Executes one command and returns what should be printed.
pub async fn run(cli: Cli, settings: Settings) -> anyhow::Result<String> {
    match cli.command {
        Command::Extract {
            schema,
            instruction,
            instruction_file,
            files,
        } => {
            let raw_schema = tokio::fs::read_to_string(&schema)
                .await
                .with_context(|| format!("reading schema {}", schema.display()))?;
            let schema: ExtractionSchema = serde_json::from_str(&raw_schema)
                .with_context(|| format!("parsing schema {}", schema.display()))?;

            let instruction = match (instruction, instruction_file) {
                (Some(text), _) => text,
                (None, Some(path)) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading instruction {}", path.display()))?,
                (None, None) => settings.pipeline.domain_instruction.clone(),
            };

            let mut inputs = Vec::with_capacity(files.len());
            for path in &files {
                let data = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                inputs.push(
                    DocumentInput::new(data, filename, content_type_for(path))
                        .with_source_path(path.display().to_string()),
                );
            }

            let state = AppState::build(settings).await?;
            let reports = state
                .pipeline
                .extract_batch(inputs, &schema, &instruction)
                .await;
            state.shutdown().await;
            Ok(serde_json::to_string_pretty(&reports)?)
        }
        Command::Status => {
            let manager = VectorStoreManager::new();
            manager.connect(&settings.vector_store_config()).await?;
            let status = manager.status().await?;
            Ok(serde_json::to_string_pretty(&status)?)
        }
    }
}

/// Content type inferred from the extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}
