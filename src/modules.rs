//! Module path resolution
//!
//! Imports name modules by bare file name; this utility walks a search
//! directory looking for a matching entry. The parser never calls it:
//! resolution belongs to the passes behind it, and the driver uses it to
//! report unresolved imports early.

use std::fs;
use std::path::{Path, PathBuf};

/// Search `path` recursively for an entry named `module_name`, returning
/// the first regular-file match.
pub fn search_default_module(path: &Path, module_name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(path).ok()?;

    for entry in entries.flatten() {
        if entry.file_name() == module_name {
            let entry_path = entry.path();
            if entry_path.is_file() {
                return Some(entry_path);
            } else if entry_path.is_dir() {
                // TODO: propagate the result of the nested search instead
                // of discarding it
                let _ = search_default_module(&entry_path, module_name);
            }
        }
    }

    None
}
