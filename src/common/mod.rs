//! Common types and utilities shared across linkleaf.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration ([`TreeConfig`])
//! - Error types
//! - Identifiers ([`NodeId`])

pub mod config;
pub mod error;
mod node_id;

pub use config::TreeConfig;
pub use error::{Error, NodeKind, Result};
pub use node_id::NodeId;
