use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::VectorStoreError;

/// Backend tag chosen at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum VectorProvider {
    Flat,
    Sqlite,
    Qdrant,
}

impl VectorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Sqlite => "sqlite",
            Self::Qdrant => "qdrant",
        }
    }
}

impl FromStr for VectorProvider {
    type Err = VectorStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flat" | "faiss" => Ok(Self::Flat),
            "sqlite" | "chroma" => Ok(Self::Sqlite),
            "qdrant" => Ok(Self::Qdrant),
            other => Err(VectorStoreError::UnsupportedProvider(other.to_string())),
        }
    }
}

impl TryFrom<String> for VectorProvider {
    type Error = VectorStoreError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for VectorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
