use chrono::{DateTime, Duration, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Id carried by a workout the server has not stored yet.
pub const UNASSIGNED_ID: i64 = -1;

/// A single workout session, bounded by its start and end instants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Workout {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<i64>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Workout {
    /// Creates a workout that has not been saved yet.
    pub fn new(user: i64, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: UNASSIGNED_ID,
            user: Some(user),
            start,
            end,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }

    pub fn with_times(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Returns true once the server has assigned an id.
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_ID
    }

    /// Elapsed time between start and end.
    ///
    /// Negative when `end` precedes `start`; nothing rejects such workouts.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

impl fmt::Display for Workout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start.with_timezone(&Local);
        let end = self.end.with_timezone(&Local);
        let minutes = self.duration().num_minutes();
        write!(
            f,
            "#{} {} {} - {} ({} min)",
            self.id,
            end.format("%Y-%m-%d"),
            start.format("%-I:%M %p"),
            end.format("%-I:%M %p"),
            minutes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    #[test]
    fn test_new_workout_is_unassigned() {
        let workout = Workout::new(7, at(9, 0), at(10, 0));

        assert_eq!(workout.id, UNASSIGNED_ID);
        assert_eq!(workout.user, Some(7));
        assert!(!workout.is_persisted());
        assert!(workout.with_id(3).is_persisted());
    }

    #[test]
    fn test_duration_can_be_negative() {
        let workout = Workout::new(1, at(10, 0), at(9, 30));
        assert_eq!(workout.duration().num_minutes(), -30);
    }

    #[test]
    fn test_serializes_instants_as_iso8601() {
        let workout = Workout::new(1, at(9, 0), at(10, 0)).with_id(12);
        let json = serde_json::to_value(&workout).unwrap();

        assert_eq!(json["id"], 12);
        assert_eq!(json["user"], 1);
        assert_eq!(json["start"], "2024-01-15T09:00:00Z");
        assert_eq!(json["end"], "2024-01-15T10:00:00Z");
    }

    #[test]
    fn test_user_is_omitted_when_absent() {
        let mut workout = Workout::new(1, at(9, 0), at(10, 0));
        workout.user = None;

        let json = serde_json::to_string(&workout).unwrap();
        assert!(!json.contains("user"));

        let json = r#"{"id":4,"start":"2024-01-15T09:00:00Z","end":"2024-01-15T10:00:00Z"}"#;
        let parsed: Workout = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.user, None);
        assert_eq!(parsed.end, at(10, 0));
    }
}
