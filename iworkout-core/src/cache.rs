//! In-memory index of workouts grouped by calendar day.
//!
//! Workouts are bucketed by the local date of their `end` instant. Within a
//! bucket they stay sorted by ascending `end`, and a bucket that loses its
//! last workout is dropped.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

use crate::models::Workout;

/// Calendar day, in the cache's time zone, that a workout belongs to.
pub type DayKey = NaiveDate;

/// Errors raised by the cache and the views that forward into it.
///
/// `NotFound` means a caller referenced an id the cache never held, which
/// is a state-sync bug upstream rather than a routine failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("Workout {0} is not in the cache")]
    NotFound(i64),

    #[error("New workouts can only be added to the calendar")]
    AddNotSupported,
}

/// Computes the day key of an instant in `tz`.
pub fn day_key<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> DayKey {
    instant.with_timezone(tz).date_naive()
}

/// Workouts grouped by the day they ended on.
#[derive(Debug, Clone)]
pub struct WorkoutCache<Tz: TimeZone = Local> {
    buckets: BTreeMap<DayKey, Vec<Workout>>,
    tz: Tz,
}

impl WorkoutCache<Local> {
    /// Creates an empty cache keyed by the local calendar.
    pub fn new() -> Self {
        Self::with_timezone(Local)
    }
}

impl Default for WorkoutCache<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Tz: TimeZone> WorkoutCache<Tz> {
    pub fn with_timezone(tz: Tz) -> Self {
        Self {
            buckets: BTreeMap::new(),
            tz,
        }
    }

    pub fn timezone(&self) -> &Tz {
        &self.tz
    }

    /// Day key of an instant in this cache's calendar.
    pub fn day_of(&self, instant: &DateTime<Utc>) -> DayKey {
        day_key(instant, &self.tz)
    }

    /// Replaces the whole cache with `workouts`.
    pub fn load<I>(&mut self, workouts: I)
    where
        I: IntoIterator<Item = Workout>,
    {
        self.buckets.clear();
        for workout in workouts {
            let day = self.day_of(&workout.end);
            self.buckets.entry(day).or_default().push(workout);
        }
        for bucket in self.buckets.values_mut() {
            bucket.sort_by_key(|w| w.end);
        }
    }

    /// Adds a workout to the bucket of its end day.
    pub fn insert(&mut self, workout: Workout) {
        let day = self.day_of(&workout.end);
        let bucket = self.buckets.entry(day).or_default();
        bucket.push(workout);
        bucket.sort_by_key(|w| w.end);
    }

    /// Swaps in a new version of a cached workout, matched by id.
    ///
    /// The workout moves to another bucket when its end day changed.
    /// Returns the previous version.
    pub fn replace(&mut self, workout: Workout) -> Result<Workout, CacheError> {
        let previous = self.take(workout.id)?;
        self.insert(workout);
        Ok(previous)
    }

    /// Removes a workout by id and returns it.
    pub fn remove(&mut self, id: i64) -> Result<Workout, CacheError> {
        self.take(id)
    }

    /// Ordered workouts for a day; empty if there are none.
    pub fn bucket_for(&self, day: DayKey) -> &[Workout] {
        self.buckets.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of workouts.
    pub fn count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Workout> {
        self.workouts().find(|w| w.id == id)
    }

    /// Non-empty days in ascending order.
    pub fn days(&self) -> impl Iterator<Item = (DayKey, &[Workout])> {
        self.buckets.iter().map(|(day, w)| (*day, w.as_slice()))
    }

    /// Non-empty days within one calendar month.
    pub fn days_in_month(
        &self,
        year: i32,
        month: u32,
    ) -> impl Iterator<Item = (DayKey, &[Workout])> {
        self.days()
            .filter(move |(day, _)| day.year() == year && day.month() == month)
    }

    /// All workouts, ordered by ascending `end`.
    pub fn workouts(&self) -> impl Iterator<Item = &Workout> {
        self.buckets.values().flatten()
    }

    /// End of the earliest workout.
    pub fn first_end(&self) -> Option<DateTime<Utc>> {
        self.workouts().next().map(|w| w.end)
    }

    /// End of the latest workout.
    pub fn last_end(&self) -> Option<DateTime<Utc>> {
        self.buckets
            .values()
            .next_back()
            .and_then(|bucket| bucket.last())
            .map(|w| w.end)
    }

    fn take(&mut self, id: i64) -> Result<Workout, CacheError> {
        let (day, index) = self
            .buckets
            .iter()
            .find_map(|(day, bucket)| {
                bucket
                    .iter()
                    .position(|w| w.id == id)
                    .map(|index| (*day, index))
            })
            .ok_or(CacheError::NotFound(id))?;

        let bucket = self
            .buckets
            .get_mut(&day)
            .ok_or(CacheError::NotFound(id))?;
        let workout = bucket.remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&day);
        }
        Ok(workout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn ymd_hm(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn workout(id: i64, end: DateTime<Utc>) -> Workout {
        Workout::new(1, end - Duration::minutes(30), end).with_id(id)
    }

    fn date(y: i32, m: u32, d: u32) -> DayKey {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn assert_invariants(cache: &WorkoutCache<Utc>) {
        for (day, bucket) in cache.days() {
            assert!(!bucket.is_empty(), "bucket {} is empty", day);
            for pair in bucket.windows(2) {
                assert!(pair[0].end <= pair[1].end, "bucket {} is unsorted", day);
            }
            for w in bucket {
                assert_eq!(cache.day_of(&w.end), day);
            }
        }
    }

    #[test]
    fn test_load_counts_and_orders() {
        let workouts = vec![
            workout(1, ymd_hm(2024, 1, 15, 18, 0)),
            workout(2, ymd_hm(2024, 1, 14, 7, 0)),
            workout(3, ymd_hm(2024, 1, 15, 6, 0)),
            workout(4, ymd_hm(2024, 2, 1, 12, 0)),
        ];
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.load(workouts.clone());

        assert_eq!(cache.count(), workouts.len());

        let mut expected = workouts;
        expected.sort_by_key(|w| w.end);
        let flattened: Vec<Workout> = cache.workouts().cloned().collect();
        assert_eq!(flattened, expected);
        assert_invariants(&cache);
    }

    #[test]
    fn test_load_replaces_previous_contents() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.insert(workout(1, ymd_hm(2024, 1, 1, 9, 0)));
        cache.load(vec![workout(2, ymd_hm(2024, 3, 3, 9, 0))]);

        assert_eq!(cache.count(), 1);
        assert!(cache.get(1).is_none());
        assert!(cache.bucket_for(date(2024, 1, 1)).is_empty());
    }

    #[test]
    fn test_insert_keeps_bucket_sorted() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.insert(workout(1, ymd_hm(2024, 1, 15, 18, 0)));
        cache.insert(workout(2, ymd_hm(2024, 1, 15, 8, 0)));
        cache.insert(workout(3, ymd_hm(2024, 1, 15, 12, 0)));

        let ids: Vec<i64> = cache
            .bucket_for(date(2024, 1, 15))
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_replace_moves_workout_to_new_day() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.load(vec![
            workout(1, ymd_hm(2024, 1, 15, 9, 0)),
            workout(2, ymd_hm(2024, 1, 16, 9, 0)),
            workout(3, ymd_hm(2024, 1, 16, 20, 0)),
        ]);

        let previous = cache
            .replace(workout(1, ymd_hm(2024, 1, 16, 12, 0)))
            .unwrap();

        assert_eq!(previous.end, ymd_hm(2024, 1, 15, 9, 0));
        assert!(cache.bucket_for(date(2024, 1, 15)).is_empty());
        assert_eq!(cache.days().count(), 1);
        let ids: Vec<i64> = cache
            .bucket_for(date(2024, 1, 16))
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(cache.count(), 3);
    }

    #[test]
    fn test_replace_within_same_day_resorts() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.load(vec![
            workout(1, ymd_hm(2024, 1, 15, 9, 0)),
            workout(2, ymd_hm(2024, 1, 15, 10, 0)),
        ]);

        cache.replace(workout(1, ymd_hm(2024, 1, 15, 11, 0))).unwrap();

        let ids: Vec<i64> = cache
            .bucket_for(date(2024, 1, 15))
            .iter()
            .map(|w| w.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_replace_unknown_id_fails() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.insert(workout(1, ymd_hm(2024, 1, 15, 9, 0)));

        let result = cache.replace(workout(99, ymd_hm(2024, 1, 15, 9, 0)));
        assert_eq!(result, Err(CacheError::NotFound(99)));
        assert_eq!(cache.count(), 1);
    }

    #[test]
    fn test_remove_drops_empty_bucket() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.insert(workout(1, ymd_hm(2024, 1, 15, 9, 0)));

        let removed = cache.remove(1).unwrap();

        assert_eq!(removed.id, 1);
        assert!(cache.is_empty());
        assert_eq!(cache.count(), 0);
        assert_eq!(cache.remove(1), Err(CacheError::NotFound(1)));
    }

    #[test]
    fn test_days_use_cache_timezone() {
        let tz = chrono::FixedOffset::west_opt(5 * 3600).unwrap();
        let mut cache = WorkoutCache::with_timezone(tz);
        // 02:00 UTC on the 16th is still the 15th at UTC-5.
        cache.insert(workout(1, ymd_hm(2024, 1, 16, 2, 0)));

        assert_eq!(cache.bucket_for(date(2024, 1, 15)).len(), 1);
        assert!(cache.bucket_for(date(2024, 1, 16)).is_empty());
    }

    #[test]
    fn test_days_in_month_and_bounds() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        cache.load(vec![
            workout(1, ymd_hm(2024, 1, 31, 9, 0)),
            workout(2, ymd_hm(2024, 2, 2, 9, 0)),
            workout(3, ymd_hm(2024, 2, 9, 9, 0)),
        ]);

        let february: Vec<DayKey> = cache.days_in_month(2024, 2).map(|(d, _)| d).collect();
        assert_eq!(february, vec![date(2024, 2, 2), date(2024, 2, 9)]);
        assert_eq!(cache.first_end(), Some(ymd_hm(2024, 1, 31, 9, 0)));
        assert_eq!(cache.last_end(), Some(ymd_hm(2024, 2, 9, 9, 0)));
    }

    #[test]
    fn test_mixed_operations_keep_invariants() {
        let mut cache = WorkoutCache::with_timezone(Utc);
        let base = ymd_hm(2024, 1, 1, 0, 0);
        let mut live: Vec<i64> = Vec::new();
        let mut seed: u64 = 0x2545_f491;
        let mut next = || {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            seed >> 33
        };

        for id in 0..300_i64 {
            let offset = Duration::minutes((next() % (60 * 24 * 10)) as i64);
            match next() % 3 {
                0 if !live.is_empty() => {
                    let victim = live.remove((next() as usize) % live.len());
                    cache.remove(victim).unwrap();
                }
                1 if !live.is_empty() => {
                    let target = live[(next() as usize) % live.len()];
                    cache.replace(workout(target, base + offset)).unwrap();
                }
                _ => {
                    cache.insert(workout(id, base + offset));
                    live.push(id);
                }
            }
            assert_eq!(cache.count(), live.len());
            assert_invariants(&cache);
        }
    }
}
