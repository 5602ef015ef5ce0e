use chrono::{DateTime, Utc};
use shared::error::{AppError, AppResult};

use crate::model::id::EventId;

pub mod event;

#[derive(Debug)]
pub struct Event {
    pub event_id: EventId,
    pub name: String,
    pub start_datetime: DateTime<Utc>,
    pub end_datetime: DateTime<Utc>,
    pub location: String,
    pub notes: String,
}

/// A validated half-open time window `[start, end)`.
///
/// Construction is the only way to obtain one, so every window held by the
/// rest of the system satisfies `end > start` (equal endpoints are invalid).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventWindow {
    start_datetime: DateTime<Utc>,
    end_datetime: DateTime<Utc>,
}

impl EventWindow {
    pub fn new(start_datetime: DateTime<Utc>, end_datetime: DateTime<Utc>) -> AppResult<Self> {
        if end_datetime <= start_datetime {
            return Err(AppError::InvalidEventWindow);
        }
        Ok(Self {
            start_datetime,
            end_datetime,
        })
    }

    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.start_datetime
    }

    pub fn end_datetime(&self) -> DateTime<Utc> {
        self.end_datetime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, 0, 0).unwrap()
    }

    #[test]
    fn window_requires_end_after_start() {
        assert!(EventWindow::new(at(10), at(12)).is_ok());
    }

    #[test]
    fn equal_endpoints_are_rejected() {
        let res = EventWindow::new(at(10), at(10));
        assert!(matches!(res, Err(AppError::InvalidEventWindow)));
    }

    #[test]
    fn reversed_endpoints_are_rejected() {
        let res = EventWindow::new(at(12), at(10));
        assert!(matches!(res, Err(AppError::InvalidEventWindow)));
    }

    #[test]
    fn one_second_of_duration_is_enough() {
        let start = at(10);
        let end = start + Duration::seconds(1);
        assert!(EventWindow::new(start, end).is_ok());
    }
}
