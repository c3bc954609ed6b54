//! Chart data derived from the workout cache.
//!
//! Everything here is a pure function over a snapshot of workouts, computed
//! when a chart is requested.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Datelike, Months, NaiveDate, TimeZone, Timelike, Utc};
use serde::Serialize;

use crate::cache::WorkoutCache;
use crate::models::Workout;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Workout count for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthPoint {
    /// Position on the x axis, starting at 0.
    pub index: usize,
    /// First day of the month.
    pub month: NaiveDate,
    pub count: usize,
    /// Axis label, e.g. `Jan 2024`.
    pub label: String,
}

/// Part of the day a workout ended in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    /// 00:00 to 06:00
    Night,
    /// 06:00 to 12:00
    Morning,
    /// 12:00 to 18:00
    Afternoon,
    /// 18:00 to 24:00
    Evening,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Night,
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
    ];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=5 => TimeOfDay::Night,
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeOfDay::Night => "Night",
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Share of workouts in one part of the day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeOfDayShare {
    pub category: TimeOfDay,
    pub count: usize,
    /// `100 * count / total`, unrounded.
    pub percent: f64,
}

/// Everything the charts view shows.
#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub days_since_last: Option<i64>,
    pub monthly: Vec<MonthPoint>,
    pub time_of_day: Vec<TimeOfDayShare>,
}

impl Insights {
    pub fn from_cache<Tz: TimeZone>(cache: &WorkoutCache<Tz>, now: DateTime<Utc>) -> Self {
        let tz = cache.timezone();
        Self {
            days_since_last: days_since_last(cache.workouts(), now),
            monthly: monthly_counts(cache.workouts(), now, tz),
            time_of_day: time_of_day_shares(cache.workouts(), tz),
        }
    }
}

/// First day of the month containing `instant` in `tz`.
pub fn first_of_month<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    let local = instant.with_timezone(tz).date_naive();
    local.with_day(1).unwrap_or(local)
}

/// Workouts per month, from the earliest workout's month through the month
/// of `now`.
///
/// Months without workouts are kept with a count of zero. Returns an empty
/// series when there are no workouts.
pub fn monthly_counts<'a, I, Tz>(workouts: I, now: DateTime<Utc>, tz: &Tz) -> Vec<MonthPoint>
where
    I: IntoIterator<Item = &'a Workout>,
    Tz: TimeZone,
{
    let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for workout in workouts {
        *counts.entry(first_of_month(&workout.end, tz)).or_insert(0) += 1;
    }

    let Some(mut month) = counts.keys().next().copied() else {
        return Vec::new();
    };
    let current = first_of_month(&now, tz);

    let mut points = Vec::new();
    while month <= current {
        points.push(MonthPoint {
            index: points.len(),
            month,
            count: counts.get(&month).copied().unwrap_or(0),
            label: month.format("%b %Y").to_string(),
        });
        month = match month.checked_add_months(Months::new(1)) {
            Some(next) => next,
            None => break,
        };
    }
    points
}

/// Percentage of workouts per part of the day, by the hour they ended.
///
/// Empty categories are left out. Shares are not adjusted to sum to exactly
/// 100 once rounded for display.
pub fn time_of_day_shares<'a, I, Tz>(workouts: I, tz: &Tz) -> Vec<TimeOfDayShare>
where
    I: IntoIterator<Item = &'a Workout>,
    Tz: TimeZone,
{
    let mut counts = [0usize; 4];
    for workout in workouts {
        let hour = workout.end.with_timezone(tz).hour();
        counts[TimeOfDay::from_hour(hour) as usize] += 1;
    }

    let total: usize = counts.iter().sum();
    if total == 0 {
        return Vec::new();
    }

    TimeOfDay::ALL
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(category, count)| TimeOfDayShare {
            category: *category,
            count,
            percent: 100.0 * count as f64 / total as f64,
        })
        .collect()
}

/// Whole days between the latest workout's end and `now`, rounded down.
pub fn days_since_last<'a, I>(workouts: I, now: DateTime<Utc>) -> Option<i64>
where
    I: IntoIterator<Item = &'a Workout>,
{
    let last = workouts.into_iter().map(|w| w.end).max()?;
    Some((now - last).num_seconds().div_euclid(SECONDS_PER_DAY))
}

/// Headline text for the charts view.
pub fn format_days_since(days: Option<i64>) -> String {
    match days {
        None => "No workouts yet".to_string(),
        Some(1) => "1 day".to_string(),
        Some(n) => format!("{} days", n),
    }
}
