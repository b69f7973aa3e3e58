//! Skyaudit Probe Abstraction
//!
//! This crate defines the boundary between the audit orchestration engine
//! and the per-service collectors ("probes") that talk to a cloud API.
//! A probe knows how to list one kind of resource in one region; everything
//! else — scheduling, failure isolation, aggregation — lives in
//! `skyaudit-core` and treats probes as opaque capabilities.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 skyaudit CLI                     │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               skyaudit-core                      │
//! │   planner → scheduler → collector → aggregator   │
//! └─────────────────┬───────────────────────────────┘
//!                   │ trait Probe
//! ┌─────────────────▼───────────────────────────────┐
//! │               skyaudit-probe                     │
//! │  ProbeRegistry { "ec2" → Ec2Probe, ... }         │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │  skyaudit-aws │
//!           └───────────────┘
//! ```

pub mod error;
pub mod probe;
pub mod record;
pub mod region;

// Re-exports
pub use error::{ProbeError, Result};
pub use probe::{Probe, ProbeRegistry};
pub use record::ResourceRecord;
pub use region::{RegionCatalog, RegionStatus};
