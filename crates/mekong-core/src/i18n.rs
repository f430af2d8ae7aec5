//! Display language for the farm assistant.

use serde::{Deserialize, Serialize};

/// The two languages the assistant speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[serde(rename = "EN")]
    En,
    #[default]
    #[serde(rename = "VI")]
    Vi,
}

impl Language {
    /// The other language.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::En => Self::Vi,
            Self::Vi => Self::En,
        }
    }

    /// Choose between an English and a Vietnamese rendering of the same text.
    #[must_use]
    pub fn pick<'a>(self, en: &'a str, vi: &'a str) -> &'a str {
        match self {
            Self::En => en,
            Self::Vi => vi,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::En => "EN",
            Self::Vi => "VI",
        }
    }

    /// Parse a language code case-insensitively ("en", "VI", ...).
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "EN" => Some(Self::En),
            "VI" => Some(Self::Vi),
            _ => None,
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_vietnamese() {
        assert_eq!(Language::default(), Language::Vi);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(Language::En.toggle(), Language::Vi);
        assert_eq!(Language::Vi.toggle(), Language::En);
    }

    #[test]
    fn test_pick() {
        assert_eq!(Language::En.pick("Rain", "Mưa"), "Rain");
        assert_eq!(Language::Vi.pick("Rain", "Mưa"), "Mưa");
    }

    #[test]
    fn test_from_code() {
        assert_eq!(Language::from_code("en"), Some(Language::En));
        assert_eq!(Language::from_code(" VI "), Some(Language::Vi));
        assert_eq!(Language::from_code("fr"), None);
    }

    #[test]
    fn test_serde_uses_upper_case_codes() {
        let json = serde_json::to_string(&Language::En).unwrap();
        assert_eq!(json, "\"EN\"");
        let lang: Language = serde_json::from_str("\"VI\"").unwrap();
        assert_eq!(lang, Language::Vi);
    }
}
