//! iWorkout Core Library
//!
//! Transport, workout cache, change propagation and chart aggregation shared
//! by iWorkout front ends.

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod credentials;
pub mod models;
pub mod mutation;
pub mod session;
pub mod stopwatch;

pub use aggregate::{
    days_since_last, format_days_since, monthly_counts, time_of_day_shares, Insights, MonthPoint,
    TimeOfDay, TimeOfDayShare,
};
pub use api::{classify_response, ApiClient, ApiError, HttpVerb};
pub use cache::{day_key, CacheError, DayKey, WorkoutCache};
pub use credentials::{
    CredentialError, CredentialStore, FileCredentialStore, MemoryCredentialStore,
};
pub use models::{Session, User, Workout, UNASSIGNED_ID};
pub use mutation::{
    CacheMutationSink, DayList, EditorError, Origin, ReturnTarget, WorkoutEditor,
};
pub use session::{SessionError, SessionManager};
pub use stopwatch::{format_clock, Stopwatch};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
