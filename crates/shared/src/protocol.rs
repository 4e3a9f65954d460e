use serde::{Deserialize, Serialize};

use crate::domain::{Selection, SourceTag};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub code_snippet: String,
    pub file_path: String,
    pub line_numbers: String,
}

impl From<&Selection> for ExplainRequest {
    fn from(selection: &Selection) -> Self {
        Self {
            code_snippet: selection.code.clone(),
            file_path: selection.file_path.clone(),
            line_numbers: selection.lines.wire_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub code_snippet: String,
    pub file_path: String,
    pub line_numbers: String,
}

impl From<&Selection> for RetrieveRequest {
    fn from(selection: &Selection) -> Self {
        Self {
            code_snippet: selection.code.clone(),
            file_path: selection.file_path.clone(),
            line_numbers: selection.lines.wire_format(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainResult {
    pub markdown: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextItem {
    pub source: SourceTag,
    pub title_or_user: String,
    pub content_summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
    pub items_synced: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub message: String,
}
