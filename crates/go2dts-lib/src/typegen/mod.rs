//! Target-language emitters for the resolved model.

pub mod typescript;
