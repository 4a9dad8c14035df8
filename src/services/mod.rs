//! Services behind the summary page: interval resolution, loading, colors, sessions.

pub mod auth;
pub mod colors;
pub mod interval;
pub mod session;
pub mod summary;
pub mod users;
