//! Clock-time validation and the activity time window.
//!
//! Hours and minutes arrive as separate, possibly missing integers. They are
//! checked here and converted to minute-of-day offsets; nothing is clamped.

use std::fmt;

use serde::Serialize;

use crate::types::{Activity, ActivityDraft, ValidationError};

/// A validated wall-clock time within a single day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    /// Creates a clock time, rejecting hours outside 0-23 and minutes outside 0-59.
    pub fn new(hour: i64, minute: i64) -> Result<Self, ValidationError> {
        Self::checked(hour, minute, "time")
    }

    /// Creates a clock time from optional parts, naming `field` in any error.
    pub fn from_parts(
        hour: Option<i64>,
        minute: Option<i64>,
        field: &'static str,
    ) -> Result<Self, ValidationError> {
        match (hour, minute) {
            (Some(hour), Some(minute)) => Self::checked(hour, minute, field),
            _ => Err(ValidationError::IncompleteInput { field }),
        }
    }

    fn checked(hour: i64, minute: i64, field: &'static str) -> Result<Self, ValidationError> {
        let Some(hour) = u8::try_from(hour).ok().filter(|h| *h <= 23) else {
            return Err(ValidationError::InvalidRange {
                field,
                detail: format!("hour {hour} is outside 0-23"),
            });
        };
        let Some(minute) = u8::try_from(minute).ok().filter(|m| *m <= 59) else {
            return Err(ValidationError::InvalidRange {
                field,
                detail: format!("minute {minute} is outside 0-59"),
            });
        };
        Ok(Self { hour, minute })
    }

    /// Minutes since midnight (`hour * 60 + minute`).
    #[must_use]
    pub fn minute_of_day(self) -> i64 {
        i64::from(self.hour) * 60 + i64::from(self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl Serialize for ClockTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Length of the window from `start` to `end` in minutes.
///
/// A window that ends before it starts has no length and yields 0.
pub fn window_minutes(start: ClockTime, end: ClockTime) -> i64 {
    let start = start.minute_of_day();
    let end = end.minute_of_day();
    if end >= start { end - start } else { 0 }
}

/// Validates raw activity input into an [`Activity`].
///
/// All four time parts must be present before any of them is range checked.
pub fn validate_activity(draft: &ActivityDraft) -> Result<Activity, ValidationError> {
    if draft.start_hour.is_none() || draft.start_minute.is_none() {
        return Err(ValidationError::IncompleteInput {
            field: "start time",
        });
    }
    if draft.end_hour.is_none() || draft.end_minute.is_none() {
        return Err(ValidationError::IncompleteInput { field: "end time" });
    }

    let start = ClockTime::from_parts(draft.start_hour, draft.start_minute, "start time")?;
    let end = ClockTime::from_parts(draft.end_hour, draft.end_minute, "end time")?;

    // Duration is reported before the rate, matching the order a form is filled in.
    if window_minutes(start, end) == 0 {
        return Err(ValidationError::NonPositiveDuration { start, end });
    }

    let hourly_rate = draft.hourly_rate.ok_or(ValidationError::IncompleteInput {
        field: "hourly rate",
    })?;
    Activity::new(start, end, hourly_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(start: (i64, i64), end: (i64, i64), rate: f64) -> ActivityDraft {
        ActivityDraft {
            start_hour: Some(start.0),
            start_minute: Some(start.1),
            end_hour: Some(end.0),
            end_minute: Some(end.1),
            hourly_rate: Some(rate),
        }
    }

    #[test]
    fn clock_time_converts_to_minute_of_day() {
        let time = ClockTime::new(18, 30).unwrap();
        assert_eq!(time.minute_of_day(), 18 * 60 + 30);
        assert_eq!(ClockTime::new(23, 59).unwrap().minute_of_day(), 1439);
        assert_eq!(ClockTime::new(0, 0).unwrap().minute_of_day(), 0);
    }

    #[test]
    fn clock_time_rejects_out_of_range_parts() {
        assert!(matches!(
            ClockTime::new(24, 0),
            Err(ValidationError::InvalidRange { .. })
        ));
        assert!(matches!(
            ClockTime::new(12, 60),
            Err(ValidationError::InvalidRange { .. })
        ));
        assert!(matches!(
            ClockTime::new(-1, 0),
            Err(ValidationError::InvalidRange { .. })
        ));
    }

    #[test]
    fn clock_time_from_parts_requires_both_parts() {
        let err = ClockTime::from_parts(Some(10), None, "join time").unwrap_err();
        assert_eq!(err, ValidationError::IncompleteInput { field: "join time" });
    }

    #[test]
    fn clock_time_displays_zero_padded() {
        assert_eq!(ClockTime::new(7, 5).unwrap().to_string(), "07:05");
    }

    #[test]
    fn window_minutes_is_zero_for_reversed_window() {
        let start = ClockTime::new(22, 0).unwrap();
        let end = ClockTime::new(18, 0).unwrap();
        assert_eq!(window_minutes(start, end), 0);
        assert_eq!(window_minutes(end, start), 240);
    }

    #[test]
    fn validate_activity_accepts_valid_window() {
        let activity = validate_activity(&draft((18, 0), (22, 0), 100_000.0)).unwrap();
        assert_eq!(activity.total_minutes(), 240);
        assert_eq!(activity.total_cost(), 400_000);
    }

    #[test]
    fn validate_activity_reports_missing_time() {
        let mut input = draft((18, 0), (22, 0), 1.0);
        input.end_minute = None;
        assert_eq!(
            validate_activity(&input).unwrap_err(),
            ValidationError::IncompleteInput { field: "end time" }
        );
    }

    #[test]
    fn validate_activity_reports_range_before_duration() {
        let err = validate_activity(&draft((18, 75), (17, 0), 1.0)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidRange {
                field: "start time",
                ..
            }
        ));
    }

    #[test]
    fn validate_activity_rejects_empty_window() {
        let err = validate_activity(&draft((18, 0), (18, 0), 1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveDuration { .. }));

        let err = validate_activity(&draft((20, 0), (18, 0), 1.0)).unwrap_err();
        assert!(matches!(err, ValidationError::NonPositiveDuration { .. }));
    }

    #[test]
    fn validate_activity_rejects_bad_rate() {
        let err = validate_activity(&draft((18, 0), (19, 0), 0.0)).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveRate);

        let err = validate_activity(&draft((18, 0), (19, 0), f64::NAN)).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveRate);

        let mut input = draft((18, 0), (19, 0), 1.0);
        input.hourly_rate = None;
        assert_eq!(
            validate_activity(&input).unwrap_err(),
            ValidationError::IncompleteInput {
                field: "hourly rate"
            }
        );
    }
}
