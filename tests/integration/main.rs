//! End-to-end tests over the HTTP router with in-memory stores.

mod helpers;

mod auth_test;
mod file_test;
mod reconcile_test;
mod share_test;
