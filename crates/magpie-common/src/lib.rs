//! Common utilities for magpie.
//!
//! This crate provides shared infrastructure used by all magpie components:
//! - **Warning System** - colored terminal output for unsupported constructs
//! - **Fetching** - blocking HTTP GET used by the document loader

pub mod net;
pub mod warning;
