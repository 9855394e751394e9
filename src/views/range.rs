//! 1-indexed inclusive rank ranges

use serde::Serialize;
use std::fmt;

use super::{ViewError, ViewResult};

/// Ranks `start..=end`, counted from 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RankRange {
    start: u32,
    end: u32,
}

impl RankRange {
    /// Ranks are counted from 1
    pub const MIN: u32 = 1;

    pub fn new(start: u32, end: u32) -> ViewResult<Self> {
        if start < Self::MIN {
            return Err(ViewError::InvalidRange(format!(
                "start must be at least {}, got {}",
                Self::MIN,
                start
            )));
        }
        if start > end {
            return Err(ViewError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Row count of the range
    pub fn limit(&self) -> u32 {
        self.end - self.start + 1
    }

    /// Rows skipped before the range
    pub fn offset(&self) -> u32 {
        self.start - 1
    }
}

impl Default for RankRange {
    fn default() -> Self {
        Self { start: 1, end: 10 }
    }
}

impl fmt::Display for RankRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}
