use crate::core::config::{HandoffMode, RunConfig};
use crate::core::error::{HandoffError, Result};
use crate::core::event::{Event, EventOp};
use crate::core::log::{SafeTranscript, Transcript};
use crate::core::phase;
use crate::core::queue::SafeQueue;
use serde::Serialize;
use std::io::Write;
use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle, ScopedJoinHandle};

/// Outcome of a finished run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub produced: Vec<i64>,
    pub consumed: Vec<i64>,
    /// result of one more emptiness check after the consumer finished
    pub drained: bool,
    /// every reported step, `seq` counting from 0
    pub events: Vec<Event<i64>>,
}

/// One producer/consumer hand-off: a run-scoped queue, its transcript and settings.
///
/// `run` consumes the value, so the queue and transcript never outlive their run.
pub struct Handoff {
    config: RunConfig,
    queue: Arc<SafeQueue<i64>>,
    transcript: SafeTranscript,
}

impl Handoff {
    /// Build a run whose report lines go to `sink`
    pub fn new(config: RunConfig, sink: Box<dyn Write + Send>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            queue: Arc::new(SafeQueue::new()),
            transcript: Arc::new(Mutex::new(Transcript::new(sink))),
        })
    }

    /// Run both phases to completion according to the configured mode
    pub fn run(self) -> Result<RunReport> {
        let items = self.config.items()?;
        tracing::info!("starting hand-off, mode={:?}, items={items:?}", self.config.mode);
        match self.config.mode {
            HandoffMode::Serialized => self.run_serialized(items)?,
            HandoffMode::Channel => self.run_channel(items)?,
        }

        let transcript = self.transcript.lock().unwrap_or_else(PoisonError::into_inner);
        let report = RunReport {
            produced: transcript.items(EventOp::Produced),
            consumed: transcript.items(EventOp::Consumed),
            drained: self.queue.is_empty(),
            events: transcript.entries().to_vec(),
        };
        tracing::info!(
            "finished hand-off, produced={}, consumed={}, drained={}",
            report.produced.len(),
            report.consumed.len(),
            report.drained
        );
        Ok(report)
    }

    /// Producer thread is joined before the consumer thread is spawned
    fn run_serialized(&self, items: Range<i64>) -> Result<()> {
        let queue = self.queue.clone();
        let transcript = self.transcript.clone();
        let producer = thread::Builder::new()
            .name("producer".into())
            .spawn(move || phase::produce(&queue, items, &transcript))?;
        join("producer", producer)?;
        tracing::info!("producer joined, queued={}", self.queue.len());

        let queue = self.queue.clone();
        let transcript = self.transcript.clone();
        let consumer = thread::Builder::new()
            .name("consumer".into())
            .spawn(move || phase::consume(&queue, &transcript))?;
        join("consumer", consumer)?;
        tracing::info!("consumer joined");
        Ok(())
    }

    /// Both phases overlap; the channel closes when the producer drops its sender
    fn run_channel(&self, items: Range<i64>) -> Result<()> {
        let (tx, rx) = crossbeam_channel::bounded(self.config.capacity);
        let transcript = &self.transcript;

        thread::scope(|s| {
            let producer = thread::Builder::new()
                .name("producer".into())
                .spawn_scoped(s, move || phase::produce_into(tx, items, transcript))?;
            let consumer = thread::Builder::new()
                .name("consumer".into())
                .spawn_scoped(s, move || phase::consume_from(rx, transcript))?;

            // join both before reporting, so a failed producer never strands the consumer
            let produced = join_scoped("producer", producer);
            let consumed = join_scoped("consumer", consumer);
            produced.and(consumed)
        })
    }

    /// Current `(len, is_empty)` of the run's queue
    pub fn queue_state(&self) -> (usize, bool) {
        (self.queue.len(), self.queue.is_empty())
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }
}

fn join(phase: &'static str, handle: JoinHandle<Result<()>>) -> Result<()> {
    handle.join().map_err(|_| {
        tracing::error!("{phase} thread panicked");
        HandoffError::PhasePanicked { phase }
    })?
}

fn join_scoped(phase: &'static str, handle: ScopedJoinHandle<'_, Result<()>>) -> Result<()> {
    handle.join().map_err(|_| {
        tracing::error!("{phase} thread panicked");
        HandoffError::PhasePanicked { phase }
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silent(config: RunConfig) -> Handoff {
        Handoff::new(config, Box::new(std::io::sink())).unwrap()
    }

    #[test]
    fn serialized_run_consumes_only_after_producing() {
        let handoff = silent(RunConfig::default());
        let report = handoff.run().unwrap();

        assert_eq!(report.produced, vec![0, 1, 2, 3, 4]);
        assert_eq!(report.consumed, vec![0, 1, 2, 3, 4]);
        assert!(report.drained);

        let ops: Vec<EventOp> = report.events.iter().map(|e| e.op).collect();
        let first_consumed = ops.iter().position(|op| *op == EventOp::Consumed).unwrap();
        assert_eq!(first_consumed, 5);
        assert!(ops[first_consumed..].iter().all(|op| *op == EventOp::Consumed));
    }

    #[test]
    fn channel_run_hands_off_every_item_once() {
        let config = RunConfig { count: 50, mode: HandoffMode::Channel, capacity: 3, ..RunConfig::default() };
        let report = silent(config).run().unwrap();

        let expected: Vec<i64> = (0..50).collect();
        assert_eq!(report.produced, expected);
        assert_eq!(report.consumed, expected);
        assert!(report.drained);
    }

    #[test]
    fn empty_sequence_runs_cleanly() {
        let config = RunConfig { count: 0, ..RunConfig::default() };
        let handoff = silent(config);
        assert_eq!(handoff.queue_state(), (0, true));
        let report = handoff.run().unwrap();
        assert!(report.produced.is_empty());
        assert!(report.consumed.is_empty());
        assert!(report.drained);
    }

    #[test]
    fn each_handoff_reports_only_its_own_run() {
        let first = silent(RunConfig::default()).run().unwrap();
        let second = silent(RunConfig::default()).run().unwrap();

        assert_eq!(first, second);
        assert_eq!(second.produced, vec![0, 1, 2, 3, 4]);
        let seqs: Vec<u64> = second.events.iter().map(|e| e.seq).collect();
        assert_eq!(seqs, (0..10).collect::<Vec<u64>>());
    }

    /// Accepts `ok_writes` writes, then fails every write after that
    struct FailAfter {
        ok_writes: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.ok_writes == 0 {
                return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "reader went away"));
            }
            self.ok_writes -= 1;
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct PanicOnWrite;

    impl Write for PanicOnWrite {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn serialized_run_surfaces_sink_failure() {
        let handoff = Handoff::new(RunConfig::default(), Box::new(FailAfter { ok_writes: 2 })).unwrap();
        let err = handoff.run().unwrap_err();
        assert!(matches!(err, HandoffError::Io(_)));
    }

    #[test]
    fn channel_run_surfaces_sink_failure_without_hanging() {
        let config = RunConfig { count: 50, mode: HandoffMode::Channel, capacity: 1, ..RunConfig::default() };
        let handoff = Handoff::new(config, Box::new(FailAfter { ok_writes: 3 })).unwrap();
        let err = handoff.run().unwrap_err();
        assert!(matches!(err, HandoffError::Io(_)));
    }

    #[test]
    fn serialized_producer_panic_is_reported() {
        let handoff = Handoff::new(RunConfig::default(), Box::new(PanicOnWrite)).unwrap();
        let err = handoff.run().unwrap_err();
        assert!(matches!(err, HandoffError::PhasePanicked { phase: "producer" }));
    }

    #[test]
    fn channel_producer_panic_is_reported() {
        let config = RunConfig { mode: HandoffMode::Channel, ..RunConfig::default() };
        let handoff = Handoff::new(config, Box::new(PanicOnWrite)).unwrap();
        let err = handoff.run().unwrap_err();
        assert!(matches!(err, HandoffError::PhasePanicked { phase: "producer" }));
    }

    #[test]
    fn zero_capacity_is_rejected_up_front() {
        let config = RunConfig { capacity: 0, ..RunConfig::default() };
        let err = Handoff::new(config, Box::new(std::io::sink())).err().unwrap();
        assert!(matches!(err, HandoffError::InvalidCapacity(0)));
    }
}
