mod user;
mod workout;

pub use user::{Session, User};
pub use workout::{Workout, UNASSIGNED_ID};
