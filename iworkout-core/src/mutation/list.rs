use chrono::TimeZone;

use super::CacheMutationSink;
use crate::cache::{day_key, CacheError, DayKey, WorkoutCache};
use crate::models::Workout;

/// The workouts of one day, shown when the day holds more than one.
///
/// Keeps its own copy of the day's bucket and forwards every change to its
/// parent so both stay identical. A workout whose end moves to another day
/// leaves the list.
pub struct DayList<'a, Tz: TimeZone> {
    day: DayKey,
    workouts: Vec<Workout>,
    tz: Tz,
    parent: &'a mut dyn CacheMutationSink,
}

impl<'a, Tz: TimeZone + 'a> DayList<'a, Tz> {
    /// Opens the list for `day` on top of the calendar cache.
    pub fn open(cache: &'a mut WorkoutCache<Tz>, day: DayKey) -> Self {
        let workouts = cache.bucket_for(day).to_vec();
        let tz = cache.timezone().clone();
        Self {
            day,
            workouts,
            tz,
            parent: cache,
        }
    }
}

impl<'a, Tz: TimeZone> DayList<'a, Tz> {
    pub fn new(
        day: DayKey,
        workouts: Vec<Workout>,
        tz: Tz,
        parent: &'a mut dyn CacheMutationSink,
    ) -> Self {
        Self {
            day,
            workouts,
            tz,
            parent,
        }
    }

    pub fn day(&self) -> DayKey {
        self.day
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    pub fn workouts(&self) -> &[Workout] {
        &self.workouts
    }

    fn position(&self, id: i64) -> Result<usize, CacheError> {
        self.workouts
            .iter()
            .position(|w| w.id == id)
            .ok_or(CacheError::NotFound(id))
    }
}

impl<Tz: TimeZone> CacheMutationSink for DayList<'_, Tz> {
    /// New workouts are only created from the calendar.
    fn add(&mut self, _workout: Workout) -> Result<(), CacheError> {
        Err(CacheError::AddNotSupported)
    }

    fn update(&mut self, workout: Workout) -> Result<(), CacheError> {
        let index = self.position(workout.id)?;
        self.parent.update(workout.clone())?;

        // Same order as the cache: remove, append, stable sort.
        self.workouts.remove(index);
        if day_key(&workout.end, &self.tz) == self.day {
            self.workouts.push(workout);
            self.workouts.sort_by_key(|w| w.end);
        }
        Ok(())
    }

    fn delete(&mut self, workout: &Workout) -> Result<(), CacheError> {
        let index = self.position(workout.id)?;
        self.parent.delete(workout)?;
        self.workouts.remove(index);
        Ok(())
    }

    fn remaining_count(&self) -> Option<usize> {
        Some(self.workouts.len())
    }
}
