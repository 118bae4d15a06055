use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language the suggested tags should be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Mirror the language of the note itself.
    #[default]
    Auto,
    /// Always English.
    En,
    /// Always Korean.
    Ko,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::En => write!(f, "en"),
            Self::Ko => write!(f, "ko"),
        }
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "en" => Ok(Self::En),
            "ko" => Ok(Self::Ko),
            other => Err(format!(
                "unknown language '{other}' (expected one of: auto, en, ko)"
            )),
        }
    }
}
