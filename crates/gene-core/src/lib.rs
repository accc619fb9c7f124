//! Core types and utilities for the gene-logic behavior program system.

pub mod config;
pub mod error;
pub mod types;

pub use config::*;
pub use error::{Error, ParseError, Result};
pub use types::*;
