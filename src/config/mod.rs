// src/config/mod.rs

//! Configuration for remon.
//!
//! Responsibilities:
//! - Define the optional TOML file model and the resolved [`ReactorConfig`]
//!   (`model.rs`).
//! - Read the file and merge it with CLI flags (`loader.rs`).
//! - Validate the resolved config (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_resolve, load_from_path, resolve};
pub use model::{ConfigFile, ReactorConfig, WatchSection};
pub use validate::validate_config;
