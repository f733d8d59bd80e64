//! HTTP layer
//!
//! Extracts request fields, runs the check against the shared catalog and
//! writes the answer in the legacy plain-text form or as JSON.
//!
//! # Modules
//!
//! - [`server`]: Router, shared state and server lifecycle
//! - [`handlers`]: Route handlers
//! - [`params`]: Request fields and their validation
//! - [`response`]: Plain-text and JSON bodies
//! - [`error`]: Mapping of failures to status codes

pub mod error;
pub mod handlers;
pub mod params;
pub mod response;
pub mod server;
