//! Configuration module.
//!
//! Layout defaults come from a TOML file, environment variables, and CLI flags,
//! merged by [`loader`] into a [`ResolvedConfig`].

pub mod loader;

pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, CliOverrides, ConfigError,
    ConfigFile, LayoutKind, PagingKind, ResolvedConfig,
};
