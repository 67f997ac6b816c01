//! Page sinks

use crate::error::Result;

/// Receives every page of a run, in order
pub trait PageSink: Send {
    /// Persist the raw text of a page (1-based index)
    fn write(&mut self, page_index: usize, raw: &str) -> Result<()>;
}

/// Sink that keeps pages in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pages: Vec<(usize, String)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages received so far
    pub fn pages(&self) -> &[(usize, String)] {
        &self.pages
    }

    /// Number of pages received
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Check if no page was received
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl PageSink for MemorySink {
    fn write(&mut self, page_index: usize, raw: &str) -> Result<()> {
        self.pages.push((page_index, raw.to_string()));
        Ok(())
    }
}
