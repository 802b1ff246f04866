//! demolink CLI library.
//!
//! The binary covers the runtime's pure surfaces: share-code decode and
//! encode, and demo-URL extraction over a captured coordinator payload.
//! The networked fetch path needs a wire-protocol client, which lives
//! outside this workspace.

pub mod cli;
pub mod commands;
pub mod logging;
