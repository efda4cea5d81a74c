pub mod core;

pub use crate::core::pipeline::{Handoff, RunReport};
pub use crate::core::config::{HandoffMode, RunConfig};
pub use crate::core::error::HandoffError;
