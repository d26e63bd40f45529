//! Domain models for the planner.
//!
//! # Core Concepts
//!
//! - [`Task`]: planned work owned by a [`Manager`], with a time window and a
//!   workload. Tasks decompose into work plans.
//! - [`WorkPlan`]: a window of work under a parent task.
//! - [`Privacy`]: whether anonymous and authenticated users can see an entity.
//! - [`SpamRule`]: terms rejected in public free text.
//!
//! ## Roles
//!
//! A [`UserAccount`] can hold a [`Manager`] and a [`Consumer`] role. The
//! resolved [`Principal`] of a request carries both.
//!
//! ## Forms
//!
//! [`TaskForm`] and [`WorkPlanForm`] hold submissions as raw strings. They
//! are validated by [`crate::validation`] and then bound into drafts.

mod account;
mod privacy;
mod spam;
mod task;
mod work_plan;

pub use account::*;
pub use privacy::*;
pub use spam::*;
pub use task::*;
pub use work_plan::*;
