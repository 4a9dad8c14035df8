//! Domain models shared across the services and routes.

pub mod interval;
pub mod summary;
pub mod user;
pub mod view;
