//! UCI options for the engine
//!
//! Option descriptors with types, defaults and ranges, validated storage of
//! the current values, and their translation into [`SearchParams`].

use crate::error::OptionError;
use crate::piece::Variant;
use crate::search::params::MAX_MULTI_PV;
use crate::search::SearchParams;
use serde::{Deserialize, Serialize};

pub const UCI_VARIANT: &str = "UCI_Variant";
pub const MULTI_PV: &str = "MultiPV";
pub const NULL_MOVE_PRUNING: &str = "Null Move Pruning";
pub const NMP_MIN_DEPTH: &str = "NMP Min Depth";
pub const NULL_MOVE_REDUCTION: &str = "Null Move Depth Reduction";
pub const STACK_REDUCTION: &str = "Stack Reduction";
pub const PRUNING_AGRESSIVITY: &str = "Pruning Agressivity";
pub const PRUNING_REDUCTION: &str = "Pruning Reduction";
pub const ASPIRATION_WINDOW: &str = "Aspiration Window";
pub const VERBOSE: &str = "Verbose";
pub const LOG_FILE: &str = "Log File";

/// UCI option types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum OptionType {
    Check { default: bool },
    Spin { default: i64, min: i64, max: i64 },
    Combo { default: String, vars: Vec<String> },
    String { default: String },
}

/// Individual UCI option definition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UciOption {
    pub name: String,
    pub opt_type: OptionType,
}

impl UciOption {
    fn check(name: &str, default: bool) -> Self {
        Self {
            name: name.to_string(),
            opt_type: OptionType::Check { default },
        }
    }

    fn spin(name: &str, default: i64, min: i64, max: i64) -> Self {
        Self {
            name: name.to_string(),
            opt_type: OptionType::Spin { default, min, max },
        }
    }

    /// The `option name ...` line announced after `uci`.
    pub fn to_uci_line(&self) -> String {
        match &self.opt_type {
            OptionType::Check { default } => {
                format!("option name {} type check default {}", self.name, default)
            }
            OptionType::Spin { default, min, max } => format!(
                "option name {} type spin default {} min {} max {}",
                self.name, default, min, max
            ),
            OptionType::Combo { default, vars } => {
                let mut line = format!("option name {} type combo default {}", self.name, default);
                for var in vars {
                    line.push_str(" var ");
                    line.push_str(var);
                }
                line
            }
            OptionType::String { default } => {
                let shown = if default.is_empty() { "<empty>" } else { default };
                format!("option name {} type string default {}", self.name, shown)
            }
        }
    }
}

/// Every option the engine announces, in announcement order.
pub fn descriptors() -> Vec<UciOption> {
    let defaults = SearchParams::default();
    vec![
        UciOption {
            name: UCI_VARIANT.to_string(),
            opt_type: OptionType::Combo {
                default: Variant::default().name().to_string(),
                vars: vec![
                    Variant::Standard.name().to_string(),
                    Variant::EightPiece.name().to_string(),
                ],
            },
        },
        UciOption::spin(MULTI_PV, defaults.multi_pv as i64, 1, MAX_MULTI_PV as i64),
        UciOption::check(NULL_MOVE_PRUNING, defaults.null_move_pruning),
        UciOption::spin(NMP_MIN_DEPTH, defaults.null_move_min_depth as i64, 2, 6),
        UciOption::spin(NULL_MOVE_REDUCTION, defaults.null_move_reduction as i64, 1, 5),
        UciOption::check(STACK_REDUCTION, defaults.stack_reduction),
        UciOption::spin(PRUNING_AGRESSIVITY, defaults.pruning_agressivity as i64, 1, 10),
        UciOption::spin(PRUNING_REDUCTION, defaults.pruning_reduction as i64, 1, 3),
        UciOption::check(ASPIRATION_WINDOW, defaults.aspiration_window),
        UciOption::check(VERBOSE, false),
        UciOption {
            name: LOG_FILE.to_string(),
            opt_type: OptionType::String {
                default: String::new(),
            },
        },
    ]
}

/// A validated option value
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionValue {
    Check(bool),
    Spin(i64),
    Text(String),
}

fn validate(opt: &UciOption, value: Option<&str>) -> Result<OptionValue, OptionError> {
    let raw = value.map(str::trim).unwrap_or("");
    let invalid = || OptionError::InvalidValue {
        name: opt.name.clone(),
        value: raw.to_string(),
    };
    match &opt.opt_type {
        OptionType::Check { .. } => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(OptionValue::Check(true)),
            "false" => Ok(OptionValue::Check(false)),
            _ => Err(invalid()),
        },
        OptionType::Spin { min, max, .. } => {
            let v: i64 = raw.parse().map_err(|_| invalid())?;
            if v < *min || v > *max {
                return Err(OptionError::OutOfRange {
                    name: opt.name.clone(),
                    value: v,
                    min: *min,
                    max: *max,
                });
            }
            Ok(OptionValue::Spin(v))
        }
        OptionType::Combo { vars, .. } => vars
            .iter()
            .find(|var| var.eq_ignore_ascii_case(raw))
            .map(|var| OptionValue::Text(var.clone()))
            .ok_or_else(invalid),
        OptionType::String { .. } => Ok(OptionValue::Text(raw.to_string())),
    }
}

/// Current option values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UciOptions {
    pub variant: Variant,

    pub multi_pv: usize,

    pub null_move_pruning: bool,

    pub nmp_min_depth: usize,

    pub null_move_reduction: usize,

    pub stack_reduction: bool,

    pub pruning_agressivity: usize,

    pub pruning_reduction: usize,

    pub aspiration_window: bool,

    /// Debug-level logging
    pub verbose: bool,

    /// Transcript of the UCI session, `None` when off
    pub log_file: Option<String>,

    /// Depth of a `go` without a depth limit. Not a UCI option, set from
    /// the config file.
    pub default_depth: usize,
}

impl Default for UciOptions {
    fn default() -> Self {
        let p = SearchParams::default();
        Self {
            variant: Variant::default(),
            multi_pv: p.multi_pv,
            null_move_pruning: p.null_move_pruning,
            nmp_min_depth: p.null_move_min_depth,
            null_move_reduction: p.null_move_reduction,
            stack_reduction: p.stack_reduction,
            pruning_agressivity: p.pruning_agressivity,
            pruning_reduction: p.pruning_reduction,
            aspiration_window: p.aspiration_window,
            verbose: false,
            log_file: None,
            default_depth: p.max_depth,
        }
    }
}

impl UciOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines announced in reply to `uci`
    pub fn uci_lines() -> Vec<String> {
        descriptors().iter().map(UciOption::to_uci_line).collect()
    }

    /// Set option value. Names match case-insensitively.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), OptionError> {
        let opt = descriptors()
            .into_iter()
            .find(|o| o.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| OptionError::Unknown(name.to_string()))?;

        match (opt.name.as_str(), validate(&opt, value)?) {
            (UCI_VARIANT, OptionValue::Text(v)) => {
                // validate() only passes declared vars
                self.variant = Variant::from_name(&v).unwrap_or_default();
            }
            (MULTI_PV, OptionValue::Spin(v)) => self.multi_pv = v as usize,
            (NULL_MOVE_PRUNING, OptionValue::Check(v)) => self.null_move_pruning = v,
            (NMP_MIN_DEPTH, OptionValue::Spin(v)) => self.nmp_min_depth = v as usize,
            (NULL_MOVE_REDUCTION, OptionValue::Spin(v)) => self.null_move_reduction = v as usize,
            (STACK_REDUCTION, OptionValue::Check(v)) => self.stack_reduction = v,
            (PRUNING_AGRESSIVITY, OptionValue::Spin(v)) => self.pruning_agressivity = v as usize,
            (PRUNING_REDUCTION, OptionValue::Spin(v)) => self.pruning_reduction = v as usize,
            (ASPIRATION_WINDOW, OptionValue::Check(v)) => self.aspiration_window = v,
            (VERBOSE, OptionValue::Check(v)) => self.verbose = v,
            (LOG_FILE, OptionValue::Text(v)) => {
                self.log_file = (!v.is_empty() && v != "<empty>").then_some(v);
            }
            _ => return Err(OptionError::Unknown(name.to_string())),
        }
        Ok(())
    }

    /// Search parameters for a search of `max_depth` plies
    pub fn search_params(&self, max_depth: usize) -> SearchParams {
        SearchParams::new()
            .max_depth(max_depth)
            .multi_pv(self.multi_pv)
            .null_move_pruning(self.null_move_pruning)
            .null_move_min_depth(self.nmp_min_depth)
            .null_move_reduction(self.null_move_reduction)
            .stack_reduction(self.stack_reduction)
            .pruning_agressivity(self.pruning_agressivity)
            .pruning_reduction(self.pruning_reduction)
            .aspiration_window(self.aspiration_window)
    }
}
