use crate::error::Result;
use crate::models::EventRecord;

/// Port for handing detected events to persistence or notification
///
/// Batching and retries are the implementor's concern.
pub trait EventSink {
    /// Deliver a batch of event records
    fn deliver(&mut self, records: &[EventRecord]) -> Result<()>;
}

/// In-memory sink that keeps every delivered record
#[derive(Debug, Clone, Default)]
pub struct MemoryEventSink {
    records: Vec<EventRecord>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl EventSink for MemoryEventSink {
    fn deliver(&mut self, records: &[EventRecord]) -> Result<()> {
        self.records.extend_from_slice(records);
        Ok(())
    }
}
