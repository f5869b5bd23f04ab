//! svcgen CLI library.
//!
//! This crate provides the command implementations and input loading for the
//! `svcgen` binary.

pub mod commands;
pub mod console;
pub mod input;
