//! Start-up configuration read from a TOML file.
//!
//! Every field is optional; missing ones keep the option defaults. Values
//! go through the same validation as `setoption`.

use crate::error::ConfigError;
use crate::position::SEARCH_MAX_DEPTH;
use crate::uci::options::{self, UciOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub variant: Option<String>,
    /// Depth of `go` without a depth limit
    pub max_depth: Option<usize>,
    pub multi_pv: Option<usize>,
    pub null_move_pruning: Option<bool>,
    pub nmp_min_depth: Option<usize>,
    pub null_move_reduction: Option<usize>,
    pub stack_reduction: Option<bool>,
    pub pruning_agressivity: Option<usize>,
    pub pruning_reduction: Option<usize>,
    pub aspiration_window: Option<bool>,
    pub verbose: Option<bool>,
    pub log_file: Option<PathBuf>,
}

impl EngineConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply the configured values over `opts`.
    pub fn apply(&self, opts: &mut UciOptions) -> Result<(), ConfigError> {
        let mut set = |name: &str, value: Option<String>| -> Result<(), ConfigError> {
            if let Some(v) = value {
                opts.set_option(name, Some(&v))?;
            }
            Ok(())
        };
        set(options::UCI_VARIANT, self.variant.clone())?;
        set(options::MULTI_PV, self.multi_pv.map(|v| v.to_string()))?;
        set(options::NULL_MOVE_PRUNING, self.null_move_pruning.map(|v| v.to_string()))?;
        set(options::NMP_MIN_DEPTH, self.nmp_min_depth.map(|v| v.to_string()))?;
        set(options::NULL_MOVE_REDUCTION, self.null_move_reduction.map(|v| v.to_string()))?;
        set(options::STACK_REDUCTION, self.stack_reduction.map(|v| v.to_string()))?;
        set(options::PRUNING_AGRESSIVITY, self.pruning_agressivity.map(|v| v.to_string()))?;
        set(options::PRUNING_REDUCTION, self.pruning_reduction.map(|v| v.to_string()))?;
        set(options::ASPIRATION_WINDOW, self.aspiration_window.map(|v| v.to_string()))?;
        set(options::VERBOSE, self.verbose.map(|v| v.to_string()))?;

        if let Some(depth) = self.max_depth {
            opts.default_depth = depth.clamp(1, SEARCH_MAX_DEPTH);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OptionError;
    use crate::piece::Variant;

    #[test]
    fn applies_present_fields_only() {
        let cfg = EngineConfig::from_toml_str(
            r#"
            variant = "Standard"
            multi_pv = 2
            stack_reduction = true
            max_depth = 7
            "#,
        )
        .unwrap();
        let mut opts = UciOptions::new();
        cfg.apply(&mut opts).unwrap();
        assert_eq!(opts.variant, Variant::Standard);
        assert_eq!(opts.multi_pv, 2);
        assert!(opts.stack_reduction);
        assert_eq!(opts.default_depth, 7);
        assert!(!opts.null_move_pruning);
        assert_eq!(opts.pruning_reduction, 1);
    }

    #[test]
    fn empty_file_is_defaults() {
        let cfg = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, EngineConfig::default());
        let mut opts = UciOptions::new();
        cfg.apply(&mut opts).unwrap();
        assert_eq!(opts, UciOptions::new());
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            EngineConfig::from_toml_str("hash = 16"),
            Err(ConfigError::Parse(_))
        ));
        let cfg = EngineConfig::from_toml_str("pruning_reduction = 7").unwrap();
        let err = cfg.apply(&mut UciOptions::new()).unwrap_err();
        assert!(matches!(err, ConfigError::Option(OptionError::OutOfRange { value: 7, .. })));
        assert!(matches!(
            EngineConfig::load(Path::new("/nonexistent/eightpiece.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
