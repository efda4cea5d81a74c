pub mod config;
pub mod error;
pub mod event;
pub mod log;
pub mod phase;
pub mod pipeline;
pub mod queue;
