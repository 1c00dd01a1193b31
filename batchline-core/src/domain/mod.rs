//! Core domain types
//!
//! This module contains the domain structures shared by the builder (which
//! produces actions) and the interpreter (which reads them back to attribute
//! failures). The two never share mutable state; they only meet through the
//! labels carried by the submitted action list.

pub mod action;
pub mod event;
pub mod label;
pub mod mount;
pub mod operation;
pub mod status;
