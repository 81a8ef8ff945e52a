//! Core types shared across the EAV model facilities
//!
//! This crate provides foundational types used by the model, its logging
//! facility and its callers:
//!
//! - **Context**: `Context` snapshots and the `ContextManager` boundary
//! - **Schema constants**: Canonical field keys and event names

pub mod context;
pub mod schema;

pub use context::{Context, ContextManager, MissingContextKey, StaticContextManager};
