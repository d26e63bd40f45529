//! Task and work plan planner.
//!
//! Managers create tasks and split them into work plans; anonymous visitors
//! and authenticated users browse what is public. Every submission is checked
//! by [`validation`] before it is bound and stored through [`db`].

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod validation;
