//! Registered page scripts.
//!
//! Hosts register JavaScript files at build time; the control server
//! serves each one under `/scripts/<file name>` and the bootstrap
//! page injects a `<script>` tag per registration. File names are the
//! registry keys, so two registrations may not share a file name no
//! matter where the files live.

// ============================================================================
// Imports
// ============================================================================

use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};

use super::assets::CLIENT_SCRIPT_NAME;

// ============================================================================
// ScriptRegistry
// ============================================================================

/// File-name-keyed registry of scripts to serve and inject.
///
/// Registration order is preserved: script tags are injected in the
/// order files were registered, after the embedded client script.
///
/// # Examples
///
/// ```no_run
/// use browser_bridge::server::ScriptRegistry;
///
/// # fn example() -> browser_bridge::Result<()> {
/// let mut registry = ScriptRegistry::new();
/// registry.register("web/game.js")?;
/// assert!(registry.contains("game.js"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct ScriptRegistry {
    /// File names in registration order.
    names: Vec<String>,
    /// File name to source path.
    paths: FxHashMap<String, PathBuf>,
}

impl ScriptRegistry {
    /// Creates an empty registry.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a script file to serve under its file name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when the path has no file name or the
    /// file does not exist, and [`Error::DuplicateScript`] when the
    /// file name is already taken (the embedded client's name
    /// included).
    pub fn register(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::config(format!("script path has no file name: {}", path.display())))?;

        if !path.is_file() {
            return Err(Error::config(format!(
                "script file not found: {}",
                path.display()
            )));
        }

        if name == CLIENT_SCRIPT_NAME || self.paths.contains_key(&name) {
            return Err(Error::duplicate_script(name));
        }

        self.names.push(name.clone());
        self.paths.insert(name, path);
        Ok(())
    }

    /// Returns the source path registered under `name`.
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.paths.get(name).map(PathBuf::as_path)
    }

    /// Returns `true` if `name` is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.paths.contains_key(name)
    }

    /// Returns registered file names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Returns the number of registered scripts.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no scripts are registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================
