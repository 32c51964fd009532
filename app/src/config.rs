//! Application configuration.
//!
//! Taskbook needs exactly one setting: where the data directory lives.
//! `TASKBOOK_DIR` wins, then `$HOME/.taskbook`, then the current
//! directory as a last resort.

use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory the storage files live under
    pub data_dir: PathBuf,
}

impl Config {
    /// Resolves configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::resolve(env::var_os("TASKBOOK_DIR"), env::var_os("HOME"))
    }

    fn resolve(dir: Option<OsString>, home: Option<OsString>) -> Self {
        let data_dir = dir
            .map(PathBuf::from)
            .or_else(|| home.map(|home| PathBuf::from(home).join(".taskbook")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self { data_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_dir_wins() {
        let config = Config::resolve(
            Some(OsString::from("/tmp/tasks")),
            Some(OsString::from("/home/me")),
        );
        assert_eq!(config.data_dir, PathBuf::from("/tmp/tasks"));
    }

    #[test]
    fn falls_back_to_home() {
        let config = Config::resolve(None, Some(OsString::from("/home/me")));
        assert_eq!(config.data_dir, PathBuf::from("/home/me/.taskbook"));
    }

    #[test]
    fn falls_back_to_current_dir() {
        let config = Config::resolve(None, None);
        assert_eq!(config.data_dir, PathBuf::from("."));
    }
}
