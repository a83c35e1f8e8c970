//! # quill-core
//!
//! Core types, ID generation, and error types for Quill.
//!
//! This crate provides the foundational types shared across all Quill crates:
//! - The persisted [`entities::Workspace`] and its nested records
//!   (plan, paper records, insights, chat turns)
//! - The research [`enums::Phase`] state machine with its transition table
//! - ID prefix constants and generation helpers
//! - Cross-cutting error types
//! - Inbound turn request and response types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod responses;
