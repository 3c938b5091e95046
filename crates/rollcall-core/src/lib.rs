//! Core types and trait definitions for the Rollcall attendance tracker.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! defines the record types, the [`store::AttendanceStore`] and
//! [`sensor::Sensor`] seams, and the sensor-side halves of the enrollment and
//! identification workflows.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod capture;
pub mod error;
pub mod identity;
pub mod sensor;
pub mod store;

pub use error::{Error, Result};
