//! Two-tier name-mangling table
//!
//! Maps user identifiers to the spellings used in the emitted C. Locals
//! all share a fixed prefix; globals additionally carry a per-file unit
//! prefix so that symbols from different source files cannot collide.
//! The table is deep-copied on entry into every scoped construct and
//! restored on exit, which is the whole scoping model of the generator.
//!
//! `printf` and `error` are reserved and always map to themselves.

use rustc_hash::FxHashMap;

/// The fixed prefix shared by every mangled name.
pub(crate) const MANGLE_PREFIX: &str = "____PEREGRINE____PEREGRINE____";

/// Compute the unit prefix for global mangling: every path separator and
/// dot in the source filename becomes `____`.
pub fn global_name(filename: &str) -> String {
    let mut res = String::new();
    for c in filename.chars() {
        if c == '\\' || c == '/' || c == '.' {
            res.push_str("____");
        } else {
            res.push(c);
        }
    }
    res
}

/// Global and local identifier→mangled maps with global fallback.
#[derive(Debug, Clone, Default)]
pub struct MangleName {
    globals: FxHashMap<String, String>,
    locals: FxHashMap<String, String>,
}

impl MangleName {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a local name to its prefix mangling.
    pub fn set_local(&mut self, original: &str) {
        self.locals
            .insert(original.to_string(), format!("{}{}", MANGLE_PREFIX, original));
    }

    /// Bind a global name to an explicit mangled spelling.
    pub fn set_global(&mut self, original: &str, mangled: &str) {
        self.globals
            .insert(original.to_string(), mangled.to_string());
    }

    pub fn clear_local(&mut self) {
        self.locals.clear();
    }

    /// Whether the name resolves at all (reserved names always do).
    pub fn contains(&self, name: &str) -> bool {
        name == "error"
            || name == "printf"
            || self.locals.contains_key(name)
            || self.globals.contains_key(name)
    }

    /// Resolve a name: reserved names map to themselves, locals shadow
    /// globals, and unknown names fall back to their own spelling.
    pub fn get(&self, name: &str) -> String {
        if name == "printf" || name == "error" {
            return name.to_string();
        }
        if let Some(mangled) = self.locals.get(name) {
            return mangled.clone();
        }
        if let Some(mangled) = self.globals.get(name) {
            return mangled.clone();
        }
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_mangling_uses_fixed_prefix() {
        let mut map = MangleName::new();
        map.set_local("x");
        assert_eq!(map.get("x"), "____PEREGRINE____PEREGRINE____x");
    }

    #[test]
    fn test_local_shadows_global() {
        let mut map = MangleName::new();
        map.set_global("x", "____PEREGRINE____PEREGRINE____a____pgx");
        map.set_local("x");
        assert_eq!(map.get("x"), "____PEREGRINE____PEREGRINE____x");
        map.clear_local();
        assert_eq!(map.get("x"), "____PEREGRINE____PEREGRINE____a____pgx");
    }

    #[test]
    fn test_reserved_names_are_identity() {
        let mut map = MangleName::new();
        map.set_local("printf");
        assert_eq!(map.get("printf"), "printf");
        assert_eq!(map.get("error"), "error");
        assert!(map.contains("printf"));
    }

    #[test]
    fn test_unknown_name_falls_back_to_itself() {
        let map = MangleName::new();
        assert!(!map.contains("y"));
        assert_eq!(map.get("y"), "y");
    }

    #[test]
    fn test_snapshot_restore_round_trips() {
        let mut map = MangleName::new();
        map.set_global("g", "G");
        let snapshot = map.clone();
        map.set_local("t");
        map = snapshot;
        assert!(!map.contains("t"));
        assert!(map.contains("g"));
    }

    #[test]
    fn test_global_name_replaces_separators() {
        assert_eq!(global_name("a.pg"), "a____pg");
        assert_eq!(global_name("src/mod.pg"), "src____mod____pg");
        assert_eq!(global_name("a\\b.pg"), "a____b____pg");
    }
}
