//! User configuration loading
//!
//! Optional TOML file that overrides the built-in threshold and weight
//! tables per mode. Every field is optional; anything unset keeps its
//! built-in value. A missing config file is not an error, a malformed
//! one is.
//!
//! ```toml
//! [gaming.thresholds]
//! cpu_bad = 0.70
//!
//! [gaming.weights]
//! responsiveness = 0.30
//! ```

use crate::error::ZeroLagError;
use crate::policy::{Mode, Thresholds, Weights};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Top-level user configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserConfig {
    pub general: Option<ModeOverride>,
    pub gaming: Option<ModeOverride>,
}

impl UserConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default (empty) config; a present but
    /// unparseable file is a hard error so typos never silently revert
    /// to built-in behavior.
    pub fn load(path: &Path) -> Result<Self, ZeroLagError> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using built-in tables");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: UserConfig = toml::from_str(&content)
            .map_err(|e| ZeroLagError::Config(format!("{}: {e}", path.display())))?;
        debug!(path = %path.display(), "loaded user config");
        config.validate()?;
        Ok(config)
    }

    /// Pick the override block for a mode, if the user wrote one.
    pub fn for_mode(&self, mode: Mode) -> Option<&ModeOverride> {
        match mode {
            Mode::General => self.general.as_ref(),
            Mode::Gaming => self.gaming.as_ref(),
        }
    }

    fn validate(&self) -> Result<(), ZeroLagError> {
        for (name, block) in [("general", &self.general), ("gaming", &self.gaming)] {
            if let Some(ov) = block {
                ov.validate(name)?;
            }
        }
        Ok(())
    }
}

/// Per-mode override block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModeOverride {
    pub thresholds: Option<ThresholdOverride>,
    pub weights: Option<WeightOverride>,
}

impl ModeOverride {
    fn validate(&self, mode: &str) -> Result<(), ZeroLagError> {
        if let Some(t) = &self.thresholds {
            t.validate(mode)?;
        }
        if let Some(w) = &self.weights {
            w.validate(mode)?;
        }
        Ok(())
    }
}

/// Partial threshold table; unset fields keep the built-in value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThresholdOverride {
    pub cpu_warn: Option<f64>,
    pub cpu_bad: Option<f64>,
    pub memory_warn: Option<f64>,
    pub memory_bad: Option<f64>,
    pub disk_free_warn: Option<f64>,
    pub disk_free_bad: Option<f64>,
    pub latency_warn_ms: Option<f64>,
    pub latency_bad_ms: Option<f64>,
    pub startup_warn: Option<usize>,
    pub startup_bad: Option<usize>,
    pub process_cpu_hog_pct: Option<f64>,
    pub process_mem_hog_fraction: Option<f64>,
}

impl ThresholdOverride {
    pub fn apply(&self, thresholds: &mut Thresholds) {
        macro_rules! set {
            ($field:ident) => {
                if let Some(v) = self.$field {
                    thresholds.$field = v;
                }
            };
        }
        set!(cpu_warn);
        set!(cpu_bad);
        set!(memory_warn);
        set!(memory_bad);
        set!(disk_free_warn);
        set!(disk_free_bad);
        set!(latency_warn_ms);
        set!(latency_bad_ms);
        set!(startup_warn);
        set!(startup_bad);
        set!(process_cpu_hog_pct);
        set!(process_mem_hog_fraction);
    }

    fn validate(&self, mode: &str) -> Result<(), ZeroLagError> {
        let fractions = [
            ("cpu_warn", self.cpu_warn),
            ("cpu_bad", self.cpu_bad),
            ("memory_warn", self.memory_warn),
            ("memory_bad", self.memory_bad),
            ("disk_free_warn", self.disk_free_warn),
            ("disk_free_bad", self.disk_free_bad),
            ("process_mem_hog_fraction", self.process_mem_hog_fraction),
        ];
        for (name, value) in fractions {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(ZeroLagError::Config(format!(
                        "{mode}.thresholds.{name} must be in [0,1], got {v}"
                    )));
                }
            }
        }
        for (name, value) in [
            ("latency_warn_ms", self.latency_warn_ms),
            ("latency_bad_ms", self.latency_bad_ms),
            ("process_cpu_hog_pct", self.process_cpu_hog_pct),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    return Err(ZeroLagError::Config(format!(
                        "{mode}.thresholds.{name} must be non-negative, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Partial weight table; unset fields keep the built-in value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeightOverride {
    pub cpu: Option<f64>,
    pub memory: Option<f64>,
    pub disk: Option<f64>,
    pub startup: Option<f64>,
    pub responsiveness: Option<f64>,
}

impl WeightOverride {
    pub fn apply(&self, weights: &mut Weights) {
        if let Some(v) = self.cpu {
            weights.cpu = v;
        }
        if let Some(v) = self.memory {
            weights.memory = v;
        }
        if let Some(v) = self.disk {
            weights.disk = v;
        }
        if let Some(v) = self.startup {
            weights.startup = v;
        }
        if let Some(v) = self.responsiveness {
            weights.responsiveness = v;
        }
    }

    fn validate(&self, mode: &str) -> Result<(), ZeroLagError> {
        for (name, value) in [
            ("cpu", self.cpu),
            ("memory", self.memory),
            ("disk", self.disk),
            ("startup", self.startup),
            ("responsiveness", self.responsiveness),
        ] {
            if let Some(v) = value {
                if v < 0.0 {
                    warn!("{mode}.weights.{name} is negative, rejecting");
                    return Err(ZeroLagError::Config(format!(
                        "{mode}.weights.{name} must be non-negative, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ModePolicy;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = UserConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, UserConfig::default());
    }

    #[test]
    fn test_load_partial_overrides() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zerolag.toml");
        fs::write(
            &path,
            r#"
[gaming.thresholds]
cpu_bad = 0.70

[gaming.weights]
responsiveness = 0.30
"#,
        )
        .unwrap();

        let config = UserConfig::load(&path).unwrap();
        let ov = config.for_mode(Mode::Gaming).unwrap();
        assert_eq!(ov.thresholds.as_ref().unwrap().cpu_bad, Some(0.70));
        assert_eq!(ov.thresholds.as_ref().unwrap().cpu_warn, None);
        assert!(config.for_mode(Mode::General).is_none());
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zerolag.toml");
        fs::write(&path, "not even toml [").unwrap();
        assert!(matches!(
            UserConfig::load(&path),
            Err(ZeroLagError::Config(_))
        ));
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zerolag.toml");
        fs::write(&path, "[gaming.thresholds]\ncpu_badd = 0.7\n").unwrap();
        assert!(UserConfig::load(&path).is_err());
    }

    #[test]
    fn test_out_of_range_fraction_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("zerolag.toml");
        fs::write(&path, "[general.thresholds]\ncpu_bad = 1.5\n").unwrap();
        assert!(matches!(
            UserConfig::load(&path),
            Err(ZeroLagError::Config(_))
        ));
    }

    #[test]
    fn test_overrides_flow_into_policy() {
        let ov = ModeOverride {
            thresholds: Some(ThresholdOverride {
                cpu_bad: Some(0.70),
                ..Default::default()
            }),
            weights: Some(WeightOverride {
                cpu: Some(0.60),
                ..Default::default()
            }),
        };
        let policy = ModePolicy::for_mode(Mode::General).with_overrides(Some(&ov));
        assert_eq!(policy.thresholds.cpu_bad, 0.70);
        // Weights were renormalized back to a 1.0 sum
        let sum = policy.weights.cpu
            + policy.weights.memory
            + policy.weights.disk
            + policy.weights.startup
            + policy.weights.responsiveness;
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(policy.weights.cpu > 0.40);
    }
}
