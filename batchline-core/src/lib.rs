//! Batchline Core
//!
//! Core types shared by the action pipeline builder and the run status
//! interpreter.
//!
//! This crate contains:
//! - Domain types: Actions, labels, mounts, remote events and run outcomes
//! - DTOs: The remote batch API's wire representation of steps and operations

pub mod domain;
pub mod dto;
