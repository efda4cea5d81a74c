use crate::core::error::Result;
use crate::core::event::{Event, EventOp};
use serde::Serialize;
use std::fmt::{self, Debug, Formatter};
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Ordered record of a run, echoing every entry to an output sink as it lands
pub struct Transcript {
    pub(crate) entries: Vec<Event<i64>>,
    sink: Box<dyn Write + Send>,
}

impl Transcript {
    pub fn new(sink: Box<dyn Write + Send>) -> Self {
        Self { entries: Vec::new(), sink }
    }

    /// Transcript that keeps entries but prints nothing
    pub fn silent() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Record an operation and write its line.
    ///
    /// The entry is kept iff the whole line was handed to the sink. A failed
    /// flush afterwards still returns an error, but the entry stays, since
    /// the line may already be visible downstream.
    pub fn record(&mut self, op: EventOp, item: i64) -> Result<()> {
        let event = Event { seq: self.entries.len() as u64, op, item };
        let line = format!("{event}\n");
        self.sink.write_all(line.as_bytes())?;

        let before = self.entries.len();
        self.entries.push(event);
        // --- Negative-space assertion: transcript grew by exactly one entry ---
        assert_eq!(self.entries.len(), before + 1, "Transcript must grow by exactly one entry");

        // lines must hit the sink in record order, even when stdout is a pipe
        self.sink.flush()?;
        Ok(())
    }

    pub fn entries(&self) -> &[Event<i64>] {
        &self.entries
    }

    /// Items of the given kind, in record order
    pub fn items(&self, op: EventOp) -> Vec<i64> {
        self.entries
            .iter()
            .filter(|e| e.op == op)
            .map(|e| e.item)
            .collect()
    }
}

impl Debug for Transcript {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

/// Write events as NDJSON, one JSON object per line
pub fn write_ndjson<T: Serialize, W: Write>(events: &[Event<T>], mut writer: W) -> Result<()> {
    for event in events {
        let json = serde_json::to_string(event)?;
        writeln!(writer, "{}", json)?;
    }
    writer.flush()?;
    Ok(())
}

/// Thread-safe wrapper
pub type SafeTranscript = Arc<Mutex<Transcript>>;
