#![forbid(unsafe_code)]

//! rescc - resource bundle compiler
//!
//! Packs the files listed in a TOML manifest into three parallel tables
//! (data, names, structure) and emits them as a Rust source artifact that
//! registers the tables with [`runtime`] on `init()`.

pub mod rcc;
pub mod runtime;
