use serde::Serialize;

use super::{ExtractionResult, FailureKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Success,
    UnsupportedType,
    Failed,
}

/// Outcome of one document in a batch run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItemReport {
    pub filename: String,
    pub status: BatchItemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ExtractionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<FailureKind>,
}

impl BatchItemReport {
    pub fn success(filename: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            filename: filename.into(),
            status: BatchItemStatus::Success,
            result: Some(result),
            error: None,
            error_kind: None,
        }
    }

    pub fn failure(
        filename: impl Into<String>,
        status: BatchItemStatus,
        error: String,
        kind: FailureKind,
    ) -> Self {
        Self {
            filename: filename.into(),
            status,
            result: None,
            error: Some(error),
            error_kind: Some(kind),
        }
    }
}
