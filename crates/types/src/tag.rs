use std::{error::Error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Maturity channel a method specification is published under.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseTag {
    #[default]
    Release,
    Beta,
    Dev,
}

impl ReleaseTag {
    /// Every known tag, in the order specifications are loaded.
    pub const ALL: [ReleaseTag; 3] = [ReleaseTag::Release, ReleaseTag::Beta, ReleaseTag::Dev];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Release => "release",
            Self::Beta => "beta",
            Self::Dev => "dev",
        }
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReleaseTag {
    type Err = ParseReleaseTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "release" => Ok(Self::Release),
            "beta" => Ok(Self::Beta),
            "dev" => Ok(Self::Dev),
            other => Err(ParseReleaseTagError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReleaseTagError(pub String);

impl fmt::Display for ParseReleaseTagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Can't find tag \"{}\" - allowed tags are release, beta, dev", self.0)
    }
}

impl Error for ParseReleaseTagError {}
