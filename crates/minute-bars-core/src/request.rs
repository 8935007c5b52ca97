use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ExportError;

/// Bar granularity. Only minute bars are exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Interval {
    #[default]
    OneMinute,
}

impl Interval {
    /// Textual form used both on the command line and in provider queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1m" => Ok(Interval::OneMinute),
            other => Err(format!("unsupported interval: '{other}'. Expected: 1m")),
        }
    }
}

/// A bounded time-series window for one symbol.
///
/// Both `start` and `end` are inclusive calendar dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeSeriesRequest {
    symbol: String,
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
    day_after_end: NaiveDate,
}

impl TimeSeriesRequest {
    /// Build a request, upper-casing the symbol.
    /// Rejects a blank symbol, a window whose start is after its end, or an
    /// end date with no representable following day.
    pub fn new(
        symbol: &str,
        interval: Interval,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, ExportError> {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(ExportError::InvalidRequest("symbol must not be empty".into()));
        }
        if start > end {
            return Err(ExportError::InvalidRequest(format!(
                "start date {start} is after end date {end}"
            )));
        }
        let day_after_end = end.succ_opt().ok_or_else(|| {
            ExportError::InvalidRequest(format!("end date {end} is out of range"))
        })?;

        Ok(Self {
            symbol,
            interval,
            start,
            end,
            day_after_end,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Exclusive upper bound of the window.
    pub fn day_after_end(&self) -> NaiveDate {
        self.day_after_end
    }
}
