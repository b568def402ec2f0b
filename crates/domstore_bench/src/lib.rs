//! Shared helpers for the domstore benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
