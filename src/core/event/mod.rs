use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventOp {
    Produced,
    Consumed,
}

impl Display for EventOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            EventOp::Produced => f.write_str("Produced"),
            EventOp::Consumed => f.write_str("Consumed"),
        }
    }
}

/// One reported hand-off step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<T> {
    pub seq: u64, // position in the run's transcript, starting at 0
    pub op: EventOp,
    pub item: T,
}

impl<T> Event<T> {
    pub fn produced(seq: u64, item: T) -> Self {
        Self { seq, op: EventOp::Produced, item }
    }

    pub fn consumed(seq: u64, item: T) -> Self {
        Self { seq, op: EventOp::Consumed, item }
    }
}

/// The output line for the event, e.g. `Produced: 3`
impl<T: Display> Display for Event<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.op, self.item)
    }
}
