//! Geofence Core - Domain models, configuration, and ports
//!
//! This crate contains the shared domain types and port definitions for the
//! geofence detection engine.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{GeofenceError, Result};
