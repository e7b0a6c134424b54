//! Slicer configuration
//!
//! Builder-style setters, presets and versioned YAML files:
//!
//! ```yaml
//! version: 1
//! preset: precise
//! overrides:
//!   max_depth: 64
//!   attribute_coverage: over_approximate
//! ```

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SUPPORTED_VERSIONS: &[u32] = &[1];
const MAX_DEPTH_LIMIT: usize = 1_000_000;

/// What to do with an attribute use whose definition was never traced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCoverage {
    /// Record the use as unresolved; add nothing
    #[default]
    Strict,
    /// Include the owner's creating occurrence and its initializer frame
    OverApproximate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliceConfig {
    /// Follow data dependencies (bindings, stack values, call results)
    pub include_data: bool,

    /// Follow control dependencies (false = thin slicing)
    pub include_control: bool,

    /// Cross frame boundaries through call results and call sites
    pub interprocedural: bool,

    pub attribute_coverage: AttributeCoverage,

    /// Maximum dependency hops from the criterion (None = full fixpoint)
    pub max_depth: Option<usize>,
}

impl SliceConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.include_data && !self.include_control {
            return Err(ConfigError::conflict(
                "both include_data and include_control are disabled",
                "enable at least one dependency kind",
            ));
        }

        if let Some(depth) = self.max_depth {
            if depth == 0 || depth > MAX_DEPTH_LIMIT {
                return Err(ConfigError::range_with_hint(
                    "max_depth",
                    depth,
                    1,
                    MAX_DEPTH_LIMIT,
                    "Leave max_depth unset for a full fixpoint",
                ));
            }
        }

        if self.attribute_coverage == AttributeCoverage::OverApproximate && !self.include_data {
            return Err(ConfigError::conflict(
                "attribute_coverage over_approximate has no effect without data dependencies",
                "set include_data: true or attribute_coverage: strict",
            ));
        }

        Ok(())
    }

    /// Builder: Set include_data
    pub fn include_data(mut self, v: bool) -> Self {
        self.include_data = v;
        self
    }

    /// Builder: Set include_control (false = thin slicing)
    pub fn include_control(mut self, v: bool) -> Self {
        self.include_control = v;
        self
    }

    /// Builder: Set interprocedural
    pub fn interprocedural(mut self, v: bool) -> Self {
        self.interprocedural = v;
        self
    }

    /// Builder: Set attribute_coverage
    pub fn attribute_coverage(mut self, v: AttributeCoverage) -> Self {
        self.attribute_coverage = v;
        self
    }

    /// Builder: Set max_depth
    pub fn max_depth(mut self, v: Option<usize>) -> Self {
        self.max_depth = v;
        self
    }

    /// Data dependencies only
    ///
    /// Reference: Sridharan et al., "Thin Slicing", PLDI 2007
    pub fn thin_slicing() -> Self {
        Self::from_preset(Preset::Thin)
    }

    pub fn from_preset(preset: Preset) -> Self {
        match preset {
            Preset::Precise => Self {
                include_data: true,
                include_control: true,
                interprocedural: true,
                attribute_coverage: AttributeCoverage::Strict,
                max_depth: None,
            },
            Preset::Thin => Self {
                include_data: true,
                include_control: false,
                interprocedural: true,
                attribute_coverage: AttributeCoverage::Strict,
                max_depth: None,
            },
            Preset::Exploratory => Self {
                include_data: true,
                include_control: true,
                interprocedural: true,
                attribute_coverage: AttributeCoverage::OverApproximate,
                max_depth: None,
            },
        }
    }

    /// Parse and validate a versioned YAML configuration
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let file: SliceConfigFileV1 = serde_yaml::from_str(yaml)?;

        let version = file.version.ok_or(ConfigError::MissingVersion)?;
        if !SUPPORTED_VERSIONS.contains(&version) {
            return Err(ConfigError::UnsupportedVersion {
                found: version,
                supported: SUPPORTED_VERSIONS.to_vec(),
            });
        }

        let preset = match file.preset.as_deref() {
            Some(name) => name.parse()?,
            None => Preset::default(),
        };

        let config = file
            .overrides
            .unwrap_or_default()
            .apply(Self::from_preset(preset));
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Serialize as a version 1 file (every field as an override)
    pub fn to_yaml(&self) -> ConfigResult<String> {
        let file = SliceConfigFileV1 {
            version: Some(1),
            preset: None,
            overrides: Some(SliceOverrides {
                include_data: Some(self.include_data),
                include_control: Some(self.include_control),
                interprocedural: Some(self.interprocedural),
                attribute_coverage: Some(self.attribute_coverage),
                max_depth: self.max_depth,
            }),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

impl Default for SliceConfig {
    fn default() -> Self {
        Self::from_preset(Preset::Precise)
    }
}

/// YAML schema v1
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliceConfigFileV1 {
    #[serde(default)]
    version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    preset: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    overrides: Option<SliceOverrides>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct SliceOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    include_data: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    include_control: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    interprocedural: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_coverage: Option<AttributeCoverage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_depth: Option<usize>,
}

impl SliceOverrides {
    fn apply(self, mut base: SliceConfig) -> SliceConfig {
        if let Some(v) = self.include_data {
            base.include_data = v;
        }
        if let Some(v) = self.include_control {
            base.include_control = v;
        }
        if let Some(v) = self.interprocedural {
            base.interprocedural = v;
        }
        if let Some(v) = self.attribute_coverage {
            base.attribute_coverage = v;
        }
        if self.max_depth.is_some() {
            base.max_depth = self.max_depth;
        }
        base
    }
}
