//! Timeline module
//!
//! Locates the continuation cursor in one page of a timeline response.
//!
//! # Payload shape
//!
//! ```text
//! data.user.result.timeline_v2.timeline.instructions[]
//!     { "type": "TimelineAddEntries", "entries": [
//!         { "content": { "entryType": "TimelineTimelineItem", ... } },
//!         { "content": { "entryType": "TimelineTimelineCursor",
//!                        "cursorType": "Bottom", "value": "..." } } ] }
//! ```
//!
//! The payload is decoded into tagged variants ([`Instruction`],
//! [`EntryContent`]) so that any deviation from this shape is an
//! [`Error::Extraction`](crate::error::Error::Extraction) instead of a
//! silently missing cursor.

mod extractor;
mod types;

pub use extractor::{extract, extract_text, timeline_exhausted, PageCursor};
pub use types::{CursorType, EntryContent, Instruction, TimelineEntry, TimelineResponse};
