//! Runtime module — process lifecycle: logging, config boot, header input.

pub mod boot;
pub mod input;
