//! Acuity scoring for emergency-department encounter notes.
//!
//! A note is split into segments, each segment is fuzzy-matched against a weighted table
//! of charted interventions, and the deduplicated points are summed on top of a base value
//! and classified into an acuity level with its billing code.

pub mod config;
pub mod error;
pub mod scoring;
pub mod telemetry;
