//! Version comparison and channel resolution
//!
//! This module decides, for a client-reported release, whether a newer
//! release exists on a channel the client is allowed to move to.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────▶│   Lookup    │◀────│   Checker   │
//! │  (startup)  │     │   (trait)   │     │  (compare)  │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                                         ┌─────────────┐
//!                                         │    Types    │
//!                                         │ (descriptor)│
//!                                         └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`checker`]: `ReleaseLookup` trait and the update decision
//! - [`error`]: Error types for checks and catalog loading
//! - [`semver`]: Numeric version parsing and ordering
//! - [`types`]: Channels, release descriptors and check results

pub mod checker;
pub mod error;
pub mod semver;
pub mod types;
