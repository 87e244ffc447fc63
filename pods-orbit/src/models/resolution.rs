//! Conflict resolution policies

use crate::error::{ImportError, ImportResult};
use std::fmt;
use std::str::FromStr;

/// Outcome chosen for one conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionPolicy {
    /// Replace the local node's values with the incoming ones
    OverwriteLocal,
    /// Leave the local node alone and drop the incoming entry
    Skip,
    /// As `Skip`, for this and every remaining conflict
    SkipAll,
}

impl ResolutionPolicy {
    /// The fixed menu offered for every conflict, in display order
    pub const MENU: [ResolutionPolicy; 3] = [Self::OverwriteLocal, Self::Skip, Self::SkipAll];

    /// Human-readable label shown in prompts
    pub fn label(self) -> &'static str {
        match self {
            Self::OverwriteLocal => "Overwrite local value with remote value",
            Self::Skip => "Skip",
            Self::SkipAll => "Skip All",
        }
    }

    /// Canonical machine name (used in config files and on the command line)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OverwriteLocal => "overwrite",
            Self::Skip => "skip",
            Self::SkipAll => "skip-all",
        }
    }
}

impl fmt::Display for ResolutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionPolicy {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "overwrite" | "overwrite-local" => Ok(Self::OverwriteLocal),
            "skip" => Ok(Self::Skip),
            "skip-all" | "skipall" => Ok(Self::SkipAll),
            _ => Err(ImportError::Validation(format!(
                "'{}' is not a resolution; expected one of: overwrite, skip, skip-all",
                s.trim()
            ))),
        }
    }
}

/// Validate a raw answer against the offered menu
///
/// Accepts a 1-based menu position or a policy name. Anything that does not
/// name an entry of `menu` is rejected with the list of valid choices.
pub fn parse_choice(input: &str, menu: &[ResolutionPolicy]) -> ImportResult<ResolutionPolicy> {
    let trimmed = input.trim();

    let chosen = match trimmed.parse::<usize>() {
        Ok(n) if (1..=menu.len()).contains(&n) => Some(menu[n - 1]),
        Ok(_) => None,
        Err(_) => trimmed.parse::<ResolutionPolicy>().ok(),
    };

    match chosen {
        Some(policy) if menu.contains(&policy) => Ok(policy),
        _ => Err(ImportError::Validation(format!(
            "'{}' is not one of the offered choices ({})",
            trimmed,
            menu_hint(menu)
        ))),
    }
}

/// `1) overwrite, 2) skip, 3) skip-all`
pub fn menu_hint(menu: &[ResolutionPolicy]) -> String {
    menu.iter()
        .enumerate()
        .map(|(i, p)| format!("{}) {}", i + 1, p.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}
