//! Data Transfer Objects for the remote batch API
//!
//! DTOs mirror the JSON shapes the remote service accepts and reports.
//! Domain types convert into and out of them; nothing else in the workspace
//! touches the wire format directly.

pub mod action;
pub mod operation;
