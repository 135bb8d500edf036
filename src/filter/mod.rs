// src/filter/mod.rs

//! Ignore-rule filtering.
//!
//! - [`rules`] holds [`IgnoreRuleSet`], an immutable, ordered collection of
//!   gitignore matchers answering "is this path irrelevant?".
//! - [`loader`] discovers ignore files under a set of roots and builds a
//!   fresh rule set. A reload always builds a new set; nothing is patched
//!   in place.

pub mod loader;
pub mod rules;

pub use loader::IgnoreLoader;
pub use rules::IgnoreRuleSet;
