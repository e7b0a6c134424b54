//! Preset configurations
//!
//! Presets provide complete slicer configurations for common use cases.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Full dynamic slice
    ///
    /// - data + control dependencies, interprocedural
    /// - unresolved attributes recorded, never guessed
    #[default]
    Precise,

    /// Thin slice: producers of the value only, no control context
    Thin,

    /// Full slice that over-approximates untraced object initialization
    Exploratory,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Precise => "precise",
            Self::Thin => "thin",
            Self::Exploratory => "exploratory",
        }
    }

    pub fn all() -> [Preset; 3] {
        [Self::Precise, Self::Thin, Self::Exploratory]
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "precise" => Ok(Self::Precise),
            "thin" => Ok(Self::Thin),
            "exploratory" => Ok(Self::Exploratory),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        for preset in Preset::all() {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), preset);
        }
        assert_eq!("THIN".parse::<Preset>().unwrap(), Preset::Thin);
    }

    #[test]
    fn test_unknown_preset() {
        let err = "turbo".parse::<Preset>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(ref name) if name == "turbo"));
    }
}
