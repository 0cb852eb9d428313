//! Run configuration.
//!
//! An [`ExtractConfig`] selects the output driver, the namespace to
//! announce, the input language and standard, the target triple, and the
//! optional side outputs. Every check happens in [`ExtractConfig::validate`],
//! before anything is written.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;

use crate::driver::{self, DEFAULT_DRIVER};
use crate::error::ConfigError;
use crate::source::TargetInfo;

// ============================================================================
// LANGUAGE
// ============================================================================

/// Source language of the translation unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
pub enum Language {
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c++")]
    Cxx,
    #[serde(rename = "objc")]
    ObjC,
    #[serde(rename = "objc++")]
    ObjCxx,
}

impl Language {
    pub fn as_str(self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cxx => "c++",
            Language::ObjC => "objc",
            Language::ObjCxx => "objc++",
        }
    }

    /// Language implied by a file extension. Unknown extensions are C.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "cpp" | "cxx" | "cc" | "c++" | "hpp" | "hxx" | "hh" => Language::Cxx,
            "m" => Language::ObjC,
            "mm" => Language::ObjCxx,
            _ => Language::C,
        }
    }

    pub fn is_cxx(self) -> bool {
        matches!(self, Language::Cxx | Language::ObjCxx)
    }

    fn family(self) -> StdFamily {
        if self.is_cxx() { StdFamily::Cxx } else { StdFamily::C }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Language::C),
            "c++" | "cxx" | "cpp" => Ok(Language::Cxx),
            "objc" | "objective-c" => Ok(Language::ObjC),
            "objc++" | "objective-c++" => Ok(Language::ObjCxx),
            other => Err(ConfigError::UnknownLanguage(other.to_string())),
        }
    }
}

// ============================================================================
// STANDARDS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StdFamily {
    C,
    Cxx,
}

const STANDARDS: &[(&str, StdFamily)] = &[
    ("c89", StdFamily::C),
    ("c90", StdFamily::C),
    ("iso9899:1990", StdFamily::C),
    ("gnu89", StdFamily::C),
    ("c99", StdFamily::C),
    ("iso9899:1999", StdFamily::C),
    ("gnu99", StdFamily::C),
    ("c11", StdFamily::C),
    ("iso9899:2011", StdFamily::C),
    ("gnu11", StdFamily::C),
    ("c17", StdFamily::C),
    ("c18", StdFamily::C),
    ("iso9899:2017", StdFamily::C),
    ("gnu17", StdFamily::C),
    ("c23", StdFamily::C),
    ("gnu23", StdFamily::C),
    ("c++98", StdFamily::Cxx),
    ("c++03", StdFamily::Cxx),
    ("gnu++98", StdFamily::Cxx),
    ("c++11", StdFamily::Cxx),
    ("gnu++11", StdFamily::Cxx),
    ("c++14", StdFamily::Cxx),
    ("gnu++14", StdFamily::Cxx),
    ("c++17", StdFamily::Cxx),
    ("gnu++17", StdFamily::Cxx),
    ("c++20", StdFamily::Cxx),
    ("gnu++20", StdFamily::Cxx),
    ("c++23", StdFamily::Cxx),
    ("gnu++23", StdFamily::Cxx),
];

fn standard_family(name: &str) -> Option<StdFamily> {
    STANDARDS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, family)| *family)
}

// ============================================================================
// CONFIG
// ============================================================================

/// Options for one extraction run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ExtractConfig {
    /// Output driver name.
    pub driver: String,
    /// Namespace announced before the first declaration.
    pub namespace: Option<String>,
    /// Input language; inferred from the file extension when absent.
    pub language: Option<Language>,
    /// Language standard, e.g. `c99` or `c++17`.
    pub std: Option<String>,
    /// Target triple; the host when absent.
    pub arch: Option<String>,
    /// Reproduce `#define` lines ahead of synthesized macro constants.
    /// Needs a macro side output.
    pub with_macro_defs: bool,
    /// Produce explicit template instantiations after the run. Needs a
    /// template side output.
    pub template_instantiations: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            driver: DEFAULT_DRIVER.to_string(),
            namespace: None,
            language: None,
            std: None,
            arch: None,
            with_macro_defs: false,
            template_instantiations: false,
        }
    }
}

impl ExtractConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
    }

    #[cfg(feature = "yaml")]
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(text).map_err(|e| ConfigError::parse(e.to_string()))
    }

    /// Load a configuration file, choosing the format by extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&text),
            #[cfg(feature = "yaml")]
            Some("yaml" | "yml") => Self::from_yaml_str(&text),
            #[cfg(not(feature = "yaml"))]
            Some("yaml" | "yml") => Err(ConfigError::parse(
                "YAML configuration requires the `yaml` feature",
            )),
            _ => Err(ConfigError::parse(format!(
                "unrecognized configuration format: {}",
                path.display()
            ))),
        }
    }

    /// Language to parse `input` as.
    pub fn language_for(&self, input: impl AsRef<Path>) -> Language {
        self.language.unwrap_or_else(|| {
            input
                .as_ref()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(Language::from_extension)
                .unwrap_or(Language::C)
        })
    }

    /// Target data for `arch`, or for the host.
    pub fn target(&self) -> Result<TargetInfo, ConfigError> {
        match &self.arch {
            Some(triple) => TargetInfo::from_triple(triple),
            None => TargetInfo::host(),
        }
    }

    /// Check every option. The language is only checked against the
    /// standard and side outputs when it is set explicitly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !driver::available_drivers().any(|name| name == self.driver) {
            return Err(ConfigError::UnknownDriver {
                name: self.driver.clone(),
                available: driver::available_drivers().collect::<Vec<_>>().join(", "),
            });
        }

        if let Some(std) = &self.std {
            let family =
                standard_family(std).ok_or_else(|| ConfigError::UnknownStandard(std.clone()))?;
            match self.language {
                Some(language) if language.family() != family => {
                    return Err(ConfigError::StandardMismatch {
                        std: std.clone(),
                        language: language.to_string(),
                    });
                }
                _ => {}
            }
        }

        match self.language {
            Some(language) if self.template_instantiations && !language.is_cxx() => {
                return Err(ConfigError::Conflict(format!(
                    "template instantiations need C++ input, not {language}"
                )));
            }
            _ => {}
        }

        if let Some(triple) = &self.arch {
            TargetInfo::from_triple(triple)?;
        }
        Ok(())
    }
}
