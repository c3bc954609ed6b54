//! Propagation of confirmed remote changes into in-memory state.
//!
//! The calendar owns the authoritative [`WorkoutCache`]. A [`DayList`] may sit
//! between the calendar and the [`WorkoutEditor`] when a day holds more than
//! one workout. Every level implements [`CacheMutationSink`]; the editor only
//! notifies its parent after the server confirmed the change, and a list
//! mirrors a change locally once its own parent accepted it.

mod editor;
mod list;

use chrono::TimeZone;

pub use editor::{EditorError, Origin, ReturnTarget, WorkoutEditor};
pub use list::DayList;

use crate::cache::{CacheError, WorkoutCache};
use crate::models::Workout;

/// Receiver of confirmed create/update/delete notifications.
pub trait CacheMutationSink {
    fn add(&mut self, workout: Workout) -> Result<(), CacheError>;
    fn update(&mut self, workout: Workout) -> Result<(), CacheError>;
    fn delete(&mut self, workout: &Workout) -> Result<(), CacheError>;

    /// Live number of workouts held by an intermediate list.
    ///
    /// `None` for the calendar, which has no list of its own.
    fn remaining_count(&self) -> Option<usize> {
        None
    }
}

impl<Tz: TimeZone> CacheMutationSink for WorkoutCache<Tz> {
    fn add(&mut self, workout: Workout) -> Result<(), CacheError> {
        tracing::debug!(id = workout.id, "Adding workout to cache");
        self.insert(workout);
        Ok(())
    }

    fn update(&mut self, workout: Workout) -> Result<(), CacheError> {
        tracing::debug!(id = workout.id, "Updating cached workout");
        self.replace(workout).map(|_| ())
    }

    fn delete(&mut self, workout: &Workout) -> Result<(), CacheError> {
        tracing::debug!(id = workout.id, "Removing cached workout");
        self.remove(workout.id).map(|_| ())
    }
}
