#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Shared helpers for go2dts.
//!
//! - `utils`: identifier rules for both sides of the translation (Go export
//!   visibility, import path naming, TypeScript identifier validity)
//! - `colors`: ANSI palette for terminal output

pub mod colors;
pub mod utils;


pub use colors::Colors;
