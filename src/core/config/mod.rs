use crate::core::error::{HandoffError, Result};
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// How the two phases are scheduled
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandoffMode {
    /// Producer thread is joined before the consumer thread starts
    #[default]
    Serialized,
    /// Both threads run at once, connected by a bounded channel
    Channel,
}

/// Parameters of one run. `Default` is the fixed 0..5 serialized hand-off.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub start: i64,
    pub count: usize,
    pub mode: HandoffMode,
    /// channel capacity, only read in `HandoffMode::Channel`
    pub capacity: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { start: 0, count: 5, mode: HandoffMode::Serialized, capacity: 1 }
    }
}

impl RunConfig {
    /// Parse a (possibly partial) JSON document; absent fields keep their defaults
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(HandoffError::InvalidCapacity(self.capacity));
        }
        self.items()?;
        Ok(())
    }

    /// The items the producer hands off, in order.
    ///
    /// The exclusive end `start + count` must itself be a valid `i64`.
    pub fn items(&self) -> Result<Range<i64>> {
        let overflow = || HandoffError::ItemRangeOverflow { start: self.start, count: self.count };
        let count = i64::try_from(self.count).map_err(|_| overflow())?;
        let end = self.start.checked_add(count).ok_or_else(overflow)?;
        Ok(self.start..end)
    }
}
