//! The tools module provides helpers shared by the library and the binary.
//!
//! The tools are:
//! - cli: Command line interface and run options.
//! - freq_count: Symbol and transition frequency counts over an input stream.
//!
pub mod cli;
pub mod freq_count;
