//! Test helpers shared across crates in the workspace.
//!
//! This crate currently provides [`figment::Jail`] plumbing for tests that
//! load locale settings from files and environment variables.

pub mod figment;
