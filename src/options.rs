//! Container options.
//!
//! Options can be built in code, read from `ARBOR_DI_*` environment
//! variables, or (with the `config` feature) deserialized from JSON.

use std::env;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{DiError, DiResult};

/// Default maximum number of nested factory productions.
pub const DEFAULT_MAX_DEPTH: usize = 256;

const ENV_PREFIX: &str = "ARBOR_DI";

/// Tunables for a container and the children created from it.
///
/// # Examples
///
/// ```rust
/// use arbor_di::{Container, ContainerOptions};
///
/// let options = ContainerOptions::new()
///     .with_label("app")
///     .with_max_depth(32);
///
/// let root = Container::with_options(options);
/// let request = root.create_labeled_child("request");
///
/// assert_eq!(request.path(), "app/request");
/// assert_eq!(request.options().max_depth, 32);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ContainerOptions {
    /// Label used in paths, logs and snapshots
    pub label: Option<String>,
    /// Maximum number of nested factory productions
    pub max_depth: usize,
    /// Whether re-entering a slot being produced is reported as circular
    pub detect_cycles: bool,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            label: None,
            max_depth: DEFAULT_MAX_DEPTH,
            detect_cycles: true,
        }
    }
}

impl ContainerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }

    /// Reads `ARBOR_DI_LABEL`, `ARBOR_DI_MAX_DEPTH` and `ARBOR_DI_DETECT_CYCLES`.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> DiResult<Self> {
        Self::from_env_with_prefix(ENV_PREFIX)
    }

    /// Like [`from_env`](Self::from_env) with a custom variable prefix.
    pub fn from_env_with_prefix(prefix: &str) -> DiResult<Self> {
        let var = |name: &str| env::var(format!("{}_{}", prefix.to_uppercase(), name)).ok();
        let mut options = Self::default();

        if let Some(label) = var("LABEL") {
            options.label = Some(label);
        }
        if let Some(raw) = var("MAX_DEPTH") {
            options.max_depth = raw
                .trim()
                .parse()
                .map_err(|_| DiError::Config(format!("MAX_DEPTH is not a number: {}", raw)))?;
        }
        if let Some(raw) = var("DETECT_CYCLES") {
            options.detect_cycles = parse_bool(&raw)
                .ok_or_else(|| DiError::Config(format!("DETECT_CYCLES is not a boolean: {}", raw)))?;
        }

        options.validate()?;
        Ok(options)
    }

    /// Parses options from JSON; missing fields keep their defaults.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> DiResult<Self> {
        let options: Self = serde_json::from_str(json).map_err(|e| DiError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Rejects options no container can work with.
    pub fn validate(&self) -> DiResult<()> {
        if self.max_depth == 0 {
            return Err(DiError::Config("max_depth must be greater than 0".to_string()));
        }
        Ok(())
    }

    /// Options inherited by a child container.
    pub(crate) fn for_child(&self, label: Option<String>) -> Self {
        Self {
            label,
            max_depth: self.max_depth,
            detect_cycles: self.detect_cycles,
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = ContainerOptions::default();
        assert_eq!(options.label, None);
        assert_eq!(options.max_depth, DEFAULT_MAX_DEPTH);
        assert!(options.detect_cycles);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn child_inherits_limits_not_label() {
        let parent = ContainerOptions::new()
            .with_label("root")
            .with_max_depth(8)
            .with_cycle_detection(false);
        let child = parent.for_child(Some("leaf".to_string()));
        assert_eq!(child.label.as_deref(), Some("leaf"));
        assert_eq!(child.max_depth, 8);
        assert!(!child.detect_cycles);
    }

    #[test]
    fn zero_depth_is_rejected() {
        let options = ContainerOptions::new().with_max_depth(0);
        assert!(matches!(options.validate(), Err(DiError::Config(_))));
    }

    #[test]
    fn bool_parsing() {
        assert_eq!(parse_bool(" Yes "), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
