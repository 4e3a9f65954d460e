use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use shared::domain::{LineRange, Selection};

/// Selection as sent by an editor over the stdio bridge. Lines are 1-based.
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionPayload {
    pub code: String,
    pub file_path: String,
    pub start_line: u32,
    pub end_line: u32,
}

impl SelectionPayload {
    pub fn into_selection(self) -> Result<Selection> {
        let lines = LineRange::new(self.start_line, self.end_line)?;
        Ok(Selection::new(self.code, self.file_path, lines))
    }
}

pub async fn read_selection(path: &Path, lines: LineRange) -> Result<Selection> {
    let source = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    Ok(Selection::new(
        extract_span(&source, lines),
        path.display().to_string(),
        lines,
    ))
}

/// Lines past the end of the file are silently absent.
pub fn extract_span(source: &str, lines: LineRange) -> String {
    let skip = lines.start.saturating_sub(1) as usize;
    let take = lines.end.saturating_sub(lines.start) as usize + 1;
    source.lines().skip(skip).take(take).collect::<Vec<_>>().join("\n")
}
