use chrono::TimeZone;

use super::{CacheMutationSink, DayList};
use crate::api::{ApiClient, ApiError};
use crate::cache::{day_key, CacheError, WorkoutCache};
use crate::models::Workout;

/// Where the editor was opened from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Calendar,
    DayList,
}

/// Where to go once the editor is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnTarget {
    Calendar,
    DayList,
}

/// Errors that can occur while saving from the editor.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Creates, edits and deletes a single workout.
///
/// Each operation runs the remote call first and only notifies the parent
/// once the server confirmed it. A failed call leaves local state untouched.
pub struct WorkoutEditor<'a, Tz: TimeZone> {
    client: &'a ApiClient,
    parent: &'a mut dyn CacheMutationSink,
    origin: Origin,
    tz: Tz,
}

impl<'a, Tz: TimeZone + 'a> WorkoutEditor<'a, Tz> {
    /// Editor opened straight from the calendar.
    pub fn from_calendar(client: &'a ApiClient, cache: &'a mut WorkoutCache<Tz>) -> Self {
        let tz = cache.timezone().clone();
        Self::new(client, cache, Origin::Calendar, tz)
    }

    /// Editor opened from a day's list.
    pub fn from_list<'b: 'a>(client: &'a ApiClient, list: &'a mut DayList<'b, Tz>) -> Self {
        let tz = list.timezone().clone();
        Self::new(client, list, Origin::DayList, tz)
    }
}

impl<'a, Tz: TimeZone> WorkoutEditor<'a, Tz> {
    pub fn new(
        client: &'a ApiClient,
        parent: &'a mut dyn CacheMutationSink,
        origin: Origin,
        tz: Tz,
    ) -> Self {
        Self {
            client,
            parent,
            origin,
            tz,
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    /// Saves a new workout and adds it to the calendar.
    ///
    /// Returns the workout with the id assigned by the server.
    pub async fn create(&mut self, workout: Workout) -> Result<Workout, EditorError> {
        if self.origin != Origin::Calendar {
            return Err(CacheError::AddNotSupported.into());
        }

        let created = self.client.create_workout(&workout).await?;
        let saved = workout.with_id(created.id);
        tracing::info!(id = saved.id, "Saved workout");

        self.parent.add(saved.clone())?;
        Ok(saved)
    }

    /// Sends an edited workout and propagates it to the parent.
    ///
    /// Goes back to the calendar instead of the list when the edit moved the
    /// workout to another day, since the list no longer shows it.
    pub async fn update(
        &mut self,
        original: &Workout,
        edited: Workout,
    ) -> Result<ReturnTarget, EditorError> {
        self.client.update_workout(&edited).await?;
        tracing::info!(id = edited.id, "Updated workout");

        let moved = day_key(&original.end, &self.tz) != day_key(&edited.end, &self.tz);
        self.parent.update(edited)?;

        Ok(match self.origin {
            Origin::DayList if !moved => ReturnTarget::DayList,
            _ => ReturnTarget::Calendar,
        })
    }

    /// Deletes a workout and propagates the removal to the parent.
    ///
    /// A list left with one workout or none is skipped on the way back.
    pub async fn delete(&mut self, workout: &Workout) -> Result<ReturnTarget, EditorError> {
        self.client.delete_workout(workout).await?;
        tracing::info!(id = workout.id, "Deleted workout");

        self.parent.delete(workout)?;

        let remaining = self.parent.remaining_count();
        Ok(match (self.origin, remaining) {
            (Origin::DayList, Some(count)) if count > 1 => ReturnTarget::DayList,
            _ => ReturnTarget::Calendar,
        })
    }
}
