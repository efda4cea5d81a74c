use crate::core::error::Result;
use crate::core::event::EventOp;
use crate::core::log::SafeTranscript;
use crate::core::queue::SafeQueue;
use crossbeam_channel::{Receiver, Sender};
use std::sync::PoisonError;

fn report(transcript: &SafeTranscript, op: EventOp, item: i64) -> Result<()> {
    transcript
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .record(op, item)
}

/// Producer phase: enqueue every item in order, reporting each right after the put
pub fn produce<I>(queue: &SafeQueue<i64>, items: I, transcript: &SafeTranscript) -> Result<()>
where
    I: IntoIterator<Item = i64>,
{
    for item in items {
        queue.put(item);
        report(transcript, EventOp::Produced, item)?;
        tracing::debug!("enqueued item, item={item}, len={}", queue.len());
    }
    Ok(())
}

/// Consumer phase: take the head until an emptiness check finds the queue empty
pub fn consume(queue: &SafeQueue<i64>, transcript: &SafeTranscript) -> Result<()> {
    while !queue.is_empty() {
        // single consumer: nobody can take the head between the check and the get
        let Some(item) = queue.get() else { break };
        report(transcript, EventOp::Consumed, item)?;
        tracing::debug!("dequeued item, item={item}, len={}", queue.len());
    }
    Ok(())
}

/// Channel producer: send every item, then drop the sender to close the channel.
///
/// An item is reported before it is sent, so its `Produced` line always
/// precedes its `Consumed` line. The transcript lock is not held across
/// `send`: a full channel would otherwise block the consumer's report.
pub fn produce_into<I>(tx: Sender<i64>, items: I, transcript: &SafeTranscript) -> Result<()>
where
    I: IntoIterator<Item = i64>,
{
    for item in items {
        report(transcript, EventOp::Produced, item)?;
        if tx.send(item).is_err() {
            // receiver is gone, only possible if the consumer bailed out early
            tracing::warn!("consumer hung up, item={item} was reported but never handed off");
            break;
        }
        tracing::debug!("sent item, item={item}, backlog={}", tx.len());
    }
    Ok(())
}

/// Channel consumer: receive until the channel is closed and drained
pub fn consume_from(rx: Receiver<i64>, transcript: &SafeTranscript) -> Result<()> {
    for item in rx.iter() {
        report(transcript, EventOp::Consumed, item)?;
        tracing::debug!("received item, item={item}, backlog={}", rx.len());
    }
    Ok(())
}
