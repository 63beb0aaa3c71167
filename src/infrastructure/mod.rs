//! Adapters behind the domain ports, plus process-wide setup.
//!
//! - `engines`: reasoning backends (HTTP, local process, mock)
//! - `checkpoint`: JSON file and in-memory stores
//! - `config`: figment-based loading and validation
//! - `logging`: tracing subscriber and the progress line format

pub mod checkpoint;
pub mod config;
pub mod engines;
pub mod logging;
