//! Shared append-only buffer for raw records.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tickbar_core::RawRecord;

/// Lock-guarded collection point for raw records.
///
/// Any number of ingestion workers may append concurrently; the buffer is
/// drained once, after every worker has finished.
#[derive(Debug, Default)]
pub struct RawBuffer {
    records: Mutex<Vec<RawRecord>>,
}

impl RawBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<RawRecord>> {
        // A panicking writer leaves the vector intact; keep using it.
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one record.
    pub fn push(&self, record: RawRecord) {
        self.lock().push(record);
    }

    /// Append a batch under a single lock.
    pub fn extend(&self, records: Vec<RawRecord>) {
        self.lock().extend(records);
    }

    /// Current number of records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every record in arrival order, leaving the buffer empty.
    pub fn drain(&self) -> Vec<RawRecord> {
        std::mem::take(&mut *self.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use tickbar_core::RecordOrigin;

    fn record(file_index: usize, row: usize) -> RawRecord {
        RawRecord::new(
            RecordOrigin::new(file_index, row),
            [("Timestamp", "2024-09-16 09:30:00.0"), ("Price", "1"), ("Size", "1")],
        )
    }

    #[test]
    fn test_push_and_drain() {
        let buffer = RawBuffer::new();
        buffer.push(record(0, 0));
        buffer.extend(vec![record(0, 1), record(0, 2)]);

        assert_eq!(buffer.len(), 3);
        let drained = buffer.drain();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[2].origin, RecordOrigin::new(0, 2));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_concurrent_append() {
        let buffer = Arc::new(RawBuffer::new());

        let handles: Vec<_> = (0..8)
            .map(|file_index| {
                let buffer = Arc::clone(&buffer);
                thread::spawn(move || {
                    for row in 0..250 {
                        buffer.push(record(file_index, row));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut drained = buffer.drain();
        assert_eq!(drained.len(), 8 * 250);

        drained.sort_by_key(|r| r.origin);
        drained.dedup_by_key(|r| r.origin);
        assert_eq!(drained.len(), 8 * 250);
    }
}
