//! BDD step definitions for the review relay

pub mod lifecycle_steps;
pub mod notification_steps;
pub mod polling_steps;
