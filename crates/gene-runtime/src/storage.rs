//! Byte-store collaborators for persisting encoded programs.
//!
//! A store maps a logical name to one byte stream holding one encoded
//! program. The caller owns exclusivity per name; no retries or timeouts
//! happen here. A name that was never written reads back as an empty stream,
//! which decodes to an empty program.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use tracing::{debug, info};

use gene_core::Result;
use gene_lang::{decode_program, encode_program, Program};

const PROGRAM_FILE_EXTENSION: &str = "dna";

pub trait ByteStore {
    fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>>;
    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Volatile store for hosts that run without disk access.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ByteStore for MemoryStore {
    fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        Ok(self.entries.get(name).cloned().unwrap_or_default())
    }

    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.entries.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Directory-rooted store keeping one `.dna` file per program name.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, name: &str) -> PathBuf {
        // Appended rather than set via `with_extension`: a dot inside the
        // logical name must not be taken for an extension, or distinct names
        // would alias to one file.
        self.root.join(format!("{name}.{PROGRAM_FILE_EXTENSION}"))
    }
}

impl ByteStore for FileStore {
    fn read_bytes(&mut self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_for(name);
        if !path.exists() {
            // First read of a fresh agent: start it with an empty stream.
            fs::create_dir_all(&self.root)?;
            fs::write(&path, [])?;
            info!(path = %path.display(), "created new program file");
            return Ok(Vec::new());
        }
        Ok(fs::read(&path)?)
    }

    fn write_bytes(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(name);
        fs::write(&path, bytes)?;
        debug!(path = %path.display(), len = bytes.len(), "program written");
        Ok(())
    }
}

/// Encodes and persists a program under `name`.
pub fn save_program<S: ByteStore>(store: &mut S, name: &str, program: &Program) -> Result<()> {
    store.write_bytes(name, &encode_program(program))
}

/// Restores the program stored under `name`; a never-written name yields an
/// empty program.
pub fn load_program<S: ByteStore>(store: &mut S, name: &str) -> Result<Program> {
    let bytes = store.read_bytes(name)?;
    Ok(decode_program(&bytes))
}
