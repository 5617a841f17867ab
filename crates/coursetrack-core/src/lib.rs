//! coursetrack-core — Course catalog, progress tracking and certificates.
//!
//! This crate defines the course data model, the persisted progress record,
//! and the derived views (metrics, eligibility) that gate certificate issuance.

pub mod certificate;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod metrics;
pub mod model;
pub mod parser;
pub mod progress;
pub mod quiz;
pub mod session;
pub mod store;
