//! Timeline payload types
//!
//! Only the fields needed to find the cursor are modelled; everything else in
//! the payload is ignored during decoding.

use serde::Deserialize;

/// Top-level GraphQL response for a user timeline
#[derive(Debug, Clone, Deserialize)]
pub struct TimelineResponse {
    data: ResponseData,
}

impl TimelineResponse {
    /// Instructions of the user's timeline
    pub fn instructions(&self) -> &[Instruction] {
        &self.data.user.result.timeline.timeline.instructions
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ResponseData {
    user: UserNode,
}

#[derive(Debug, Clone, Deserialize)]
struct UserNode {
    result: UserResult,
}

#[derive(Debug, Clone, Deserialize)]
struct UserResult {
    #[serde(rename = "timeline_v2", alias = "timeline")]
    timeline: TimelineContainer,
}

#[derive(Debug, Clone, Deserialize)]
struct TimelineContainer {
    timeline: Timeline,
}

#[derive(Debug, Clone, Deserialize)]
struct Timeline {
    instructions: Vec<Instruction>,
}

/// One timeline instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type")]
pub enum Instruction {
    /// Adds the page's entries, cursor markers included
    #[serde(rename = "TimelineAddEntries")]
    AddEntries {
        /// Entries in display order
        entries: Vec<TimelineEntry>,
    },
    /// Any other instruction (pin, clear cache, terminate, ...)
    #[serde(other)]
    Other,
}

/// An entry of an add-entries instruction
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimelineEntry {
    /// Entry identifier, when present
    #[serde(rename = "entryId", default)]
    pub entry_id: Option<String>,
    /// Entry payload
    pub content: EntryContent,
}

/// Content of a timeline entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "entryType")]
pub enum EntryContent {
    /// Pagination marker
    #[serde(rename = "TimelineTimelineCursor")]
    Cursor {
        /// Position of the marker
        #[serde(rename = "cursorType")]
        cursor_type: CursorType,
        /// Opaque token
        #[serde(default)]
        value: Option<String>,
    },
    /// Real content (tweet, module, ...)
    #[serde(other)]
    Content,
}

impl EntryContent {
    /// Check if this is a cursor marker
    pub fn is_cursor(&self) -> bool {
        matches!(self, Self::Cursor { .. })
    }
}

/// Position of a cursor marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum CursorType {
    /// Cursor for newer entries
    Top,
    /// Cursor for older entries, drives pagination
    Bottom,
    /// Any other marker kind (e.g. `ShowMore`)
    #[serde(other)]
    Other,
}
