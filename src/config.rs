use regex::Regex;
use serde::Deserialize;
use thiserror::Error;

use crate::path::is_identifier_name;

pub const DEFAULT_GLOBAL_IDENTIFIER: &str = "jest";

// -----------------------------------------------------------------------------
// Errors
// -----------------------------------------------------------------------------

/// Problems found while loading or compiling the plugin configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid plugin configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("global mock identifier `{0}` is not a valid identifier")]
    GlobalIdentifier(String),

    #[error("invalid call pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: &'static str },

    #[error("call pattern `{pattern}` failed to compile: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

// -----------------------------------------------------------------------------
// Raw (serde) configuration
// -----------------------------------------------------------------------------

/// How a matched request call turns its arguments into mocked values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequestKind {
    /// Default replacement is the string literal of the mocked name.
    NameMock,
    /// Default replacement is a generated `<global>.fn()` with a display name.
    FunctionMock,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestIdentifier {
    /// Dotted callee pattern. A leading `.` is relative to the global identifier.
    pub name: String,
    #[serde(default = "default_remove")]
    pub remove: bool,
    pub kind: RequestKind,
}

fn default_remove() -> bool {
    true
}

impl RequestIdentifier {
    pub fn new(name: impl Into<String>, kind: RequestKind, remove: bool) -> Self {
        Self { name: name.into(), remove, kind }
    }
}

/// When a factory spreads the real module under its mocked exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "PreserveSetting")]
pub enum PreserveRealExports {
    #[default]
    Never,
    /// Only for factories that contain at least one nested export.
    Nested,
    Always,
}

// Accepts `true` / `false` as well as `"never" | "nested" | "always"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum PreserveSetting {
    Flag(bool),
    Mode(PreserveMode),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
enum PreserveMode {
    Never,
    Nested,
    Always,
}

impl From<PreserveSetting> for PreserveRealExports {
    fn from(setting: PreserveSetting) -> Self {
        match setting {
            PreserveSetting::Flag(false) | PreserveSetting::Mode(PreserveMode::Never) => Self::Never,
            PreserveSetting::Flag(true) | PreserveSetting::Mode(PreserveMode::Always) => Self::Always,
            PreserveSetting::Mode(PreserveMode::Nested) => Self::Nested,
        }
    }
}

/// Plugin configuration as passed by the host (camelCase JSON).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub global_mock_identifier: String,
    pub ignore_patterns: Vec<String>,
    pub request_identifiers: Vec<RequestIdentifier>,
    pub preserve_real_exports: PreserveRealExports,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            global_mock_identifier: DEFAULT_GLOBAL_IDENTIFIER.to_string(),
            ignore_patterns: [".mock", ".doMock", ".unmock", ".dontMock"]
                .iter()
                .map(|p| p.to_string())
                .collect(),
            request_identifiers: vec![
                RequestIdentifier::new(".mockObj", RequestKind::NameMock, true),
                RequestIdentifier::new(".mockFn", RequestKind::FunctionMock, true),
            ],
            preserve_real_exports: PreserveRealExports::Never,
        }
    }
}

impl Config {
    /// Parses the JSON blob handed over by the host. An empty blob means defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(raw)?)
    }

    pub fn compile(&self) -> Result<CompiledConfig, ConfigError> {
        let global = self.global_mock_identifier.trim();
        if !is_identifier_name(global) {
            return Err(ConfigError::GlobalIdentifier(self.global_mock_identifier.clone()));
        }

        let ignore = self
            .ignore_patterns
            .iter()
            .map(|p| CallPattern::compile(p, global))
            .collect::<Result<Vec<_>, _>>()?;

        let requests = self
            .request_identifiers
            .iter()
            .map(|entry| Ok((CallPattern::compile(&entry.name, global)?, entry.clone())))
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(CompiledConfig {
            global: global.to_string(),
            ignore,
            requests,
            preserve_real_exports: self.preserve_real_exports,
        })
    }
}

// -----------------------------------------------------------------------------
// Compiled configuration
// -----------------------------------------------------------------------------

/// A dotted callee pattern such as `jest.mockObj` or `*.mockFn`.
#[derive(Debug, Clone)]
struct CallPattern {
    regex: Regex,
}

impl CallPattern {
    fn compile(pattern: &str, global: &str) -> Result<Self, ConfigError> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Pattern { pattern: pattern.to_string(), reason: "empty pattern" });
        }
        let full = match trimmed.strip_prefix('.') {
            Some(rest) => format!("{global}.{rest}"),
            None => trimmed.to_string(),
        };

        let mut parts = Vec::new();
        for seg in full.split('.') {
            if seg == "*" {
                parts.push(r"[^.]+".to_string());
            } else if is_identifier_name(seg) {
                parts.push(regex::escape(seg));
            } else {
                return Err(ConfigError::Pattern {
                    pattern: pattern.to_string(),
                    reason: "segments must be identifiers or `*`",
                });
            }
        }

        let regex = Regex::new(&format!(r"^{}$", parts.join(r"\.")))
            .map_err(|source| ConfigError::Regex { pattern: pattern.to_string(), source })?;
        Ok(Self { regex })
    }

    fn matches(&self, dotted: &str) -> bool {
        self.regex.is_match(dotted)
    }
}

/// Validated configuration used by a single transform run.
#[derive(Debug, Clone)]
pub struct CompiledConfig {
    global: String,
    ignore: Vec<CallPattern>,
    requests: Vec<(CallPattern, RequestIdentifier)>,
    preserve_real_exports: PreserveRealExports,
}

impl Default for CompiledConfig {
    fn default() -> Self {
        // Default patterns always compile.
        Config::default().compile().unwrap_or_else(|_| Self {
            global: DEFAULT_GLOBAL_IDENTIFIER.to_string(),
            ignore: vec![],
            requests: vec![],
            preserve_real_exports: PreserveRealExports::Never,
        })
    }
}

impl CompiledConfig {
    pub fn global(&self) -> &str {
        &self.global
    }

    pub fn preserve_real_exports(&self) -> PreserveRealExports {
        self.preserve_real_exports
    }

    pub fn is_ignore_call(&self, dotted: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(dotted))
    }

    /// First configured request identifier whose pattern matches.
    pub fn request_for(&self, dotted: &str) -> Option<&RequestIdentifier> {
        self.requests
            .iter()
            .find(|(p, _)| p.matches(dotted))
            .map(|(_, entry)| entry)
    }
}
