//! Supported transcript languages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language the transcript can be requested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Hi,
    Mr,
    Es,
    Fr,
    De,
    Ja,
    Ko,
    Ru,
}

impl Language {
    /// All supported languages, in caption priority order.
    pub const ALL: [Language; 9] = [
        Language::En,
        Language::Hi,
        Language::Mr,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::Ja,
        Language::Ko,
        Language::Ru,
    ];

    /// ISO 639-1 code as used by YouTube caption tracks.
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Hi => "hi",
            Language::Mr => "mr",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::Ja => "ja",
            Language::Ko => "ko",
            Language::Ru => "ru",
        }
    }

    /// English display name.
    pub fn name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Hi => "Hindi",
            Language::Mr => "Marathi",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
            Language::Ja => "Japanese",
            Language::Ko => "Korean",
            Language::Ru => "Russian",
        }
    }

    /// Codes of every supported language.
    pub fn all_codes() -> Vec<String> {
        Self::ALL.iter().map(|l| l.code().to_string()).collect()
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        // Regional variants like "en-US" map to their base language.
        let base = needle.split(['-', '_']).next().unwrap_or_default();

        Self::ALL
            .iter()
            .find(|l| l.code() == base || l.name().to_lowercase() == needle)
            .copied()
            .ok_or_else(|| format!("Unsupported language: {}", s))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
