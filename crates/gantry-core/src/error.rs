use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Manifest ──
    #[error("failed to read manifest at {path}")]
    ManifestRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid dependency specifier on line {line}: {text:?} ({reason})")]
    ManifestParse {
        line: usize,
        text: String,
        reason: &'static str,
    },

    // ── Launch descriptor ──
    #[error("invalid entry point {entry:?}: expected module:symbol, e.g. app:app")]
    InvalidEntryPoint { entry: String },
}
