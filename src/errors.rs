// src/errors.rs

//! Crate-wide error type.
//!
//! Only startup-class failures (`Startup`, `Config`, `Io`, `Toml`, `Notify`)
//! ever leave [`crate::run`]. The reactor logs `IgnoreLoad`, `Spawn` and
//! `Kill` and keeps going.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemonError {
    #[error("Startup error: {0}")]
    Startup(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("failed to load ignore rules from {root:?}: {source}")]
    IgnoreLoad {
        root: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to start command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to kill process group {pgid}: {source}")]
    Kill {
        pgid: i32,
        #[source]
        source: nix::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    Notify(#[from] notify::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RemonError>;
