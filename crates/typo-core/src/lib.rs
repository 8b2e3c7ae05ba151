//! # typo-core
//!
//! Core types, diffing, and error types for the typology thesaurus revision
//! history engine.
//!
//! This crate provides the foundational types shared across all crates:
//! - Record and revision identifiers
//! - Snapshot and field value model (scalar and multilingual fields)
//! - Revision actions and the authoritative/heuristic revision type
//! - The field-level diff calculator with per-language fan-out
//! - Field label lookup and display formatting for presentation layers
//! - CLI response types
//! - Cross-cutting error types

pub mod diff;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod labels;
pub mod responses;
