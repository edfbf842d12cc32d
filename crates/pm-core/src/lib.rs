//! # pm-core
//!
//! Core types and pure logic for the project manager issue service.
//!
//! This crate provides the foundation shared across all `pm-*` crates:
//! - Entity structs (issues, sprints, user projections) and status enums
//! - Issue tree assembly and the active-sprint index
//! - Dense position keys for manually ordered lists
//! - Request bodies, partial updates, and response shapes
//! - Capability traits for the store, the identity directory, and the rate limiter
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod ports;
pub mod position;
pub mod requests;
pub mod responses;
pub mod sprint_index;
pub mod tree;
pub mod updates;
