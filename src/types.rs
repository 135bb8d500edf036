use std::str::FromStr;

use serde::Deserialize;

/// How far ignore-file discovery reaches below each ignore root.
///
/// - `Recursive`: every matching ignore file in the tree (default).
/// - `RootOnly`: only the ignore files directly inside the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IgnoreScope {
    #[default]
    Recursive,
    RootOnly,
}

impl FromStr for IgnoreScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recursive" => Ok(IgnoreScope::Recursive),
            "root-only" | "root_only" | "root" => Ok(IgnoreScope::RootOnly),
            other => Err(format!(
                "invalid ignore scope: {other} (expected \"recursive\" or \"root-only\")"
            )),
        }
    }
}
