//! Errors raised while locating, reading and writing `config.ron`.
//!
//! The only file this crate touches is `<config_dir>/config.ron`: read by
//! `Config::load_or_create` and `Config::reload`, written by `Config::save`
//! (and by `load_or_create` when the file is missing).

/// Failures of [`default_config_dir`](crate::default_config_dir) and the
/// `config.ron` load/save/reload operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform has no per-user configuration directory.
    #[error("no user configuration directory available on this platform")]
    NoConfigDir,

    /// `config.ron` exists but could not be read.
    #[error("failed to read config: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config directory or `config.ron` could not be written.
    #[error("failed to write config: {0}")]
    WriteError(#[source] std::io::Error),

    /// `config.ron` is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The in-memory config could not be rendered as RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
