//! Engine configuration - executable discovery, program paths, deadlines.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SibylError};

/// Executable names probed, in order, when no explicit path is configured.
pub const ENGINE_CANDIDATES: &[&str] = &["ccl64", "ccl", "lx86cl64"];

/// Configuration for one engine session, loadable from `sibyl.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Explicit engine executable. When unset, discovery walks
    /// [`ENGINE_CANDIDATES`] on PATH.
    pub executable: Option<PathBuf>,
    /// Extra arguments passed to the engine executable.
    pub args: Vec<String>,
    /// Reasoner program source, compiled at startup when the compiled
    /// artifact is missing.
    pub source_path: Option<PathBuf>,
    /// Compiled reasoner program loaded at startup.
    pub compiled_path: Option<PathBuf>,
    /// Deadline for each verdict dequeue, in seconds.
    pub query_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: None,
            args: Vec::new(),
            source_path: None,
            compiled_path: None,
            query_timeout_secs: 30,
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| SibylError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from the given path when it exists, otherwise defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the engine executable, honoring an explicit override.
    pub fn resolve_executable(&self) -> Result<PathBuf> {
        if let Some(executable) = &self.executable {
            return Ok(executable.clone());
        }
        for candidate in ENGINE_CANDIDATES {
            if let Ok(path) = which::which(candidate) {
                return Ok(path);
            }
        }
        Err(SibylError::Startup(format!(
            "no engine executable found on PATH (tried {})",
            ENGINE_CANDIDATES.join(", ")
        )))
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Directives that bring the reasoner program up inside a fresh
    /// engine: compile when only the source is current, then load.
    pub fn load_directives(&self) -> Vec<String> {
        let mut directives = Vec::new();
        match (&self.compiled_path, &self.source_path) {
            (Some(compiled), source) => {
                if !compiled.exists() {
                    if let Some(source) = source {
                        directives.push(format!("(compile-file \"{}\")", source.display()));
                    }
                }
                directives.push(format!("(load \"{}\")", compiled.display()));
            }
            (None, Some(source)) => {
                directives.push(format!("(load \"{}\")", source.display()));
            }
            (None, None) => {}
        }
        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.query_timeout(), Duration::from_secs(30));
        assert!(config.executable.is_none());
        assert!(config.load_directives().is_empty());
    }

    #[test]
    fn test_explicit_executable_wins() {
        let config = EngineConfig {
            executable: Some(PathBuf::from("/opt/engine/bin/ccl")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_executable().unwrap(),
            PathBuf::from("/opt/engine/bin/ccl")
        );
    }

    #[test]
    fn test_load_directives_compile_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("spatial.lisp");
        std::fs::write(&source, ";; reasoner").unwrap();
        let compiled = dir.path().join("spatial.dx64fsl");

        let config = EngineConfig {
            source_path: Some(source.clone()),
            compiled_path: Some(compiled.clone()),
            ..Default::default()
        };

        let directives = config.load_directives();
        assert_eq!(directives.len(), 2);
        assert!(directives[0].starts_with("(compile-file "));
        assert!(directives[1].starts_with("(load "));

        // Once the artifact exists, only the load remains
        std::fs::write(&compiled, "fasl").unwrap();
        let directives = config.load_directives();
        assert_eq!(directives.len(), 1);
        assert!(directives[0].starts_with("(load "));
    }

    #[test]
    fn test_toml_round_trip() {
        let text = r#"
            executable = "/usr/local/bin/ccl64"
            query_timeout_secs = 5
        "#;
        let config: EngineConfig = toml::from_str(text).unwrap();
        assert_eq!(config.query_timeout(), Duration::from_secs(5));
        assert_eq!(
            config.executable,
            Some(PathBuf::from("/usr/local/bin/ccl64"))
        );
    }
}
