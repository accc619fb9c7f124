//! Execution environment for behavior programs.
//!
//! This crate provides:
//! - The [`ExecutionContext`] trait through which a program reads, writes and
//!   acts on its host
//! - The per-tick interpreter
//! - Byte-store collaborators for persisting encoded programs

pub mod context;
pub mod interpreter;
pub mod storage;

pub use context::ExecutionContext;
pub use interpreter::{run_tick, TickOutcome};
pub use storage::{load_program, save_program, ByteStore, FileStore, MemoryStore};
