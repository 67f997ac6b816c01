//! Cursor extraction

use super::types::{CursorType, EntryContent, Instruction, TimelineResponse};
use crate::error::{Error, Result};
use crate::types::{Cursor, JsonValue, OptionStringExt};
use serde::Deserialize;
use tracing::{debug, info};

/// Cursor information recovered from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageCursor {
    /// Entries in the authoritative add-entries instruction
    pub entry_count: usize,
    /// How many of those entries are cursor markers
    pub cursor_entry_count: usize,
    /// Cursor for the next page, absent once the timeline is exhausted
    pub bottom_cursor: Option<Cursor>,
    /// Whether the end-of-timeline heuristic fired
    pub exhausted: bool,
}

impl PageCursor {
    /// Entries that are not cursor markers
    pub fn content_count(&self) -> usize {
        self.entry_count.saturating_sub(self.cursor_entry_count)
    }
}

/// End-of-timeline heuristic
///
/// The API never says a timeline is finished. Once the pages run out it keeps
/// answering with add-entries instructions that hold nothing but Top/Bottom
/// cursor markers, so a page made only of markers (or of nothing at all) is
/// treated as the end. This reflects observed behaviour of this one API, not
/// a documented contract.
pub fn timeline_exhausted(entry_count: usize, cursor_entry_count: usize) -> bool {
    entry_count == cursor_entry_count
}

/// Decode raw page text and extract its cursor
pub fn extract_text(text: &str) -> Result<PageCursor> {
    let payload: JsonValue = serde_json::from_str(text)
        .map_err(|e| Error::extraction(format!("page is not valid JSON: {e}")))?;
    extract(&payload)
}

/// Extract the bottom cursor from a decoded page
///
/// The last add-entries instruction is authoritative. Any structural mismatch
/// along the way is an extraction error.
pub fn extract(payload: &JsonValue) -> Result<PageCursor> {
    let response = TimelineResponse::deserialize(payload)
        .map_err(|e| Error::extraction(format!("unexpected timeline shape: {e}")))?;

    let entries = response
        .instructions()
        .iter()
        .filter_map(|instruction| match instruction {
            Instruction::AddEntries { entries } => Some(entries.as_slice()),
            Instruction::Other => None,
        })
        .last()
        .unwrap_or_default();

    let mut cursor_entry_count = 0;
    let mut bottom_cursor = None;

    for entry in entries {
        if let EntryContent::Cursor { cursor_type, value } = &entry.content {
            cursor_entry_count += 1;
            if *cursor_type == CursorType::Bottom {
                let value = value.clone().ok_or_else(|| {
                    Error::extraction(format!(
                        "bottom cursor entry {} has no value",
                        entry.entry_id.as_deref().unwrap_or("<unnamed>")
                    ))
                })?;
                bottom_cursor = value.none_if_empty().map(Cursor::from);
            }
        }
    }

    let entry_count = entries.len();
    let exhausted = timeline_exhausted(entry_count, cursor_entry_count);
    if exhausted {
        info!(
            entries = entry_count,
            "Page holds only cursor markers, possibly reached end of timeline"
        );
        bottom_cursor = None;
    }

    debug!(
        entries = entry_count,
        cursor_entries = cursor_entry_count,
        has_cursor = bottom_cursor.is_some(),
        "Extracted page cursor"
    );

    Ok(PageCursor {
        entry_count,
        cursor_entry_count,
        bottom_cursor,
        exhausted,
    })
}
