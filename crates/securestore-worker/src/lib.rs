//! Background sweeps for SecureStore.
//!
//! This crate provides:
//! - The [`PeriodicTask`] trait for work that runs on a fixed interval
//! - A cooperative [`TaskScheduler`] that owns one cancellation signal for
//!   every registered task
//! - The built-in sweeps: stale-file cleanup, pending-file reconciliation and
//!   expired share-link removal

pub mod jobs;
pub mod scheduler;
pub mod task;

pub use jobs::register_default_tasks;
pub use scheduler::TaskScheduler;
pub use task::PeriodicTask;
