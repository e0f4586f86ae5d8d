//! Configuration for lanprefill: directory layout, `settings.conf` parsing and
//! the per-run prefill options derived from it.

/// Small parsing helpers for `key = value` lines.
mod parsing;
/// Path resolution for config, log and state directories.
mod paths;
/// `settings.conf` loading and the skeleton written on first run.
mod settings;

pub use paths::{Paths, resolve_config_dir};
pub use settings::{SETTINGS_SKELETON, Settings, load_settings, parse_settings};

/// Options that change how a single prefill run behaves.
///
/// Built once from [`Settings`] and command-line flags, then handed to the
/// pipeline by value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PrefillConfig {
    /// Re-download apps even when the freshness tracker says they are current.
    pub force: bool,
    /// Print extra detail (chunk counts) on progress lines.
    pub verbose: bool,
}

impl PrefillConfig {
    /// What: Combine settings defaults with command-line flags.
    ///
    /// Inputs:
    /// - `settings`: Loaded settings
    /// - `force_flag`: `--force` given
    /// - `verbose_flag`: `--verbose` given
    ///
    /// Output:
    /// - Config where a flag can turn an option on but never off.
    #[must_use]
    pub const fn from_settings(settings: &Settings, force_flag: bool, verbose_flag: bool) -> Self {
        Self {
            force: settings.force_default || force_flag,
            verbose: settings.verbose_default || verbose_flag,
        }
    }
}
