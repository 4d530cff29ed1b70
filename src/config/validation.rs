//! Config validation: unknown-key detection with Levenshtein suggestions
//! and physical range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults::{MAX_ACTIVE_PERIOD, SUPER_HYPERBOLIC_B};
use super::{ForecastConfig, WellEntry};
use crate::types::WellType;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, " (did you mean '{s}'?)")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Step records are keyed by action name; the step parser owns those keys.
const STEP_RECORDS_PATH: &str = "programs.steps";

/// Returns the complete set of valid dotted key paths for ForecastConfig.
///
/// Arrays of tables contribute their element keys without an index, so every
/// well in every platform maps to `facilities.pexes.platforms.wells.<key>`.
/// Any new field added to the config structs must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [description]
        "description",
        "description.name",
        "description.start_date",
        // [defaults.well]
        "defaults",
        "defaults.well",
        "defaults.well.choke",
        "defaults.well.active_period",
        // [defaults.well.oil]
        "defaults.well.oil",
        "defaults.well.oil.ultimate_oil_recovery",
        "defaults.well.oil.initial_oil_rate",
        "defaults.well.oil.gas_oil_ratio",
        "defaults.well.oil.b_oil",
        // [defaults.well.gas]
        "defaults.well.gas",
        "defaults.well.gas.ultimate_gas_recovery",
        "defaults.well.gas.initial_gas_rate",
        "defaults.well.gas.gas_condensate_ratio",
        "defaults.well.gas.b_gas",
        // [facilities]
        "facilities",
        "facilities.asset",
        "facilities.enforce_slot_capacity",
        "facilities.pexes",
        "facilities.pexes.name",
        "facilities.pexes.platforms",
        "facilities.pexes.platforms.name",
        "facilities.pexes.platforms.slots",
        "facilities.pexes.platforms.wells",
        "facilities.pexes.platforms.wells.name",
        "facilities.pexes.platforms.wells.type",
        "facilities.pexes.platforms.wells.oil_rate",
        "facilities.pexes.platforms.wells.oil_cumulative",
        "facilities.pexes.platforms.wells.gas_rate",
        "facilities.pexes.platforms.wells.gas_cumulative",
        "facilities.pexes.platforms.wells.condensate_rate",
        "facilities.pexes.platforms.wells.condensate_cumulative",
        "facilities.pexes.platforms.wells.choke",
        "facilities.pexes.platforms.wells.active_period",
        "facilities.pexes.platforms.wells.ultimate_recovery",
        "facilities.pexes.platforms.wells.gas_oil_ratio",
        "facilities.pexes.platforms.wells.gas_condensate_ratio",
        "facilities.pexes.platforms.wells.b",
        // [[programs]]
        "programs",
        "programs.rig",
        "programs.steps",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`. Arrays of tables are walked element by element
/// under the array's own path, and duplicate paths are reported once.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    collect_keys(value, prefix, &mut keys);
    keys
}

fn collect_keys(value: &toml::Value, prefix: &str, keys: &mut Vec<String>) {
    let Some(table) = value.as_table() else {
        return;
    };
    for (k, v) in table {
        let path = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{prefix}.{k}")
        };
        if !keys.contains(&path) {
            keys.push(path.clone());
        }
        if path == STEP_RECORDS_PATH {
            continue;
        }
        match v {
            toml::Value::Table(_) => collect_keys(v, &path, keys),
            toml::Value::Array(items) => {
                for item in items.iter().filter(|item| item.is_table()) {
                    collect_keys(item, &path, keys);
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }
    if b_len == 0 {
        return a.chars().count();
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (k, levenshtein(unknown, k)))
        .filter(|&(_, dist)| dist <= 3)
        .min_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)))
        .map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Physical Range Validation
// ============================================================================

fn check_positive(value: f64, name: &str, errors: &mut Vec<String>) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(format!("{name} = {value} must be a finite number > 0"));
    }
}

fn check_non_negative(value: f64, name: &str, errors: &mut Vec<String>) {
    if !value.is_finite() || value < 0.0 {
        errors.push(format!("{name} = {value} must be a finite number >= 0"));
    }
}

fn check_active_period(days: u32, name: &str, errors: &mut Vec<String>) {
    if days == 0 || days > MAX_ACTIVE_PERIOD {
        errors.push(format!("{name} = {days} must be between 1 and {MAX_ACTIVE_PERIOD} days"));
    }
}

fn check_b(value: f64, name: &str, errors: &mut Vec<String>, warnings: &mut Vec<ValidationWarning>) {
    check_non_negative(value, name, errors);
    if value.is_finite() && value > SUPER_HYPERBOLIC_B {
        warnings.push(ValidationWarning {
            field: name.to_string(),
            message: format!("{name} = {value} is super-hyperbolic (b > {SUPER_HYPERBOLIC_B})"),
            suggestion: None,
        });
    }
}

/// Validate physical ranges on a parsed ForecastConfig.
///
/// Returns (errors, warnings): errors are impossible values that must
/// prevent a run; warnings are suspicious but not fatal.
pub fn validate_physical_ranges(config: &ForecastConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let well = &config.defaults.well;
    check_non_negative(well.choke, "defaults.well.choke", &mut errors);
    if let Some(days) = well.active_period {
        check_active_period(days, "defaults.well.active_period", &mut errors);
    }

    if let Some(oil) = &well.oil {
        check_positive(oil.ultimate_oil_recovery, "defaults.well.oil.ultimate_oil_recovery", &mut errors);
        check_positive(oil.initial_oil_rate, "defaults.well.oil.initial_oil_rate", &mut errors);
        for gor in oil.gas_oil_ratio {
            check_non_negative(gor, "defaults.well.oil.gas_oil_ratio", &mut errors);
        }
        check_b(oil.b_oil, "defaults.well.oil.b_oil", &mut errors, &mut warnings);
    }

    if let Some(gas) = &well.gas {
        check_positive(gas.ultimate_gas_recovery, "defaults.well.gas.ultimate_gas_recovery", &mut errors);
        check_positive(gas.initial_gas_rate, "defaults.well.gas.initial_gas_rate", &mut errors);
        check_non_negative(gas.gas_condensate_ratio, "defaults.well.gas.gas_condensate_ratio", &mut errors);
        check_b(gas.b_gas, "defaults.well.gas.b_gas", &mut errors, &mut warnings);
    }

    for pex in &config.facilities.pexes {
        for whp in &pex.platforms {
            if whp.slots == 0 {
                errors.push(format!("facilities: platform '{}' slots must be > 0", whp.name));
            }
            for entry in &whp.wells {
                validate_well_entry(config, entry, &mut errors, &mut warnings);
            }
        }
    }

    (errors, warnings)
}

fn validate_well_entry(
    config: &ForecastConfig,
    entry: &WellEntry,
    errors: &mut Vec<String>,
    warnings: &mut Vec<ValidationWarning>,
) {
    let prefix = format!("well '{}'", entry.name);
    let figures = [
        (entry.oil_rate, "oil_rate"),
        (entry.oil_cumulative, "oil_cumulative"),
        (entry.gas_rate, "gas_rate"),
        (entry.gas_cumulative, "gas_cumulative"),
        (entry.condensate_rate, "condensate_rate"),
        (entry.condensate_cumulative, "condensate_cumulative"),
        (entry.choke, "choke"),
        (entry.ultimate_recovery, "ultimate_recovery"),
        (entry.gas_condensate_ratio, "gas_condensate_ratio"),
    ];
    for (value, name) in figures {
        if let Some(v) = value {
            check_non_negative(v, &format!("{prefix}.{name}"), errors);
        }
    }
    if let Some(gor) = entry.gas_oil_ratio {
        for v in gor {
            check_non_negative(v, &format!("{prefix}.gas_oil_ratio"), errors);
        }
    }
    if let Some(b) = entry.b {
        check_b(b, &format!("{prefix}.b"), errors, warnings);
    }
    if let Some(days) = entry.active_period {
        check_active_period(days, &format!("{prefix}.active_period"), errors);
    }

    // Remaining reserves: cumulative already at or above ultimate recovery
    let (cumulative, ultimate) = match entry.well_type {
        WellType::Oil => (
            entry.oil_cumulative,
            entry
                .ultimate_recovery
                .or_else(|| config.defaults.well.oil.as_ref().map(|o| o.ultimate_oil_recovery)),
        ),
        WellType::Gas => (
            entry.gas_cumulative,
            entry
                .ultimate_recovery
                .or_else(|| config.defaults.well.gas.as_ref().map(|g| g.ultimate_gas_recovery)),
        ),
    };
    if let (Some(cum), Some(ult)) = (cumulative, ultimate) {
        if cum >= ult {
            warnings.push(ValidationWarning {
                field: format!("{prefix}.{}_cumulative", entry.well_type),
                message: format!(
                    "{prefix}: cumulative {cum} already reaches ultimate recovery {ult}; decline calibration will fail"
                ),
                suggestion: None,
            });
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ForecastConfig {
        toml::from_str(
            r#"
[description]
start_date = "01/01/2018"

[defaults.well]
active_period = 3650

[defaults.well.oil]
ultimate_oil_recovery = 8000000.0
initial_oil_rate = 5000.0
gas_oil_ratio = [2000.0, 4000.0]
b_oil = 1.0

[defaults.well.gas]
ultimate_gas_recovery = 100000000.0
initial_gas_rate = 10000000.0
gas_condensate_ratio = 3.1415
b_gas = 0.5

[facilities]
asset = "MXII"

[[facilities.pexes]]
name = "Nene"

[[facilities.pexes.platforms]]
name = "AEP"
"#,
        )
        .expect("base config should deserialize")
    }

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("initial_oil_rte", "initial_oil_rate"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [defaults.well.oil]
            b_oil = 1.0
        "#
        .parse()
        .expect("valid toml");
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"defaults".to_string()));
        assert!(keys.contains(&"defaults.well".to_string()));
        assert!(keys.contains(&"defaults.well.oil.b_oil".to_string()));
    }

    #[test]
    fn test_walk_toml_keys_arrays_of_tables() {
        let toml: toml::Value = r#"
            [[facilities.pexes]]
            name = "A"
            [[facilities.pexes.platforms]]
            name = "P1"
            [[facilities.pexes]]
            name = "B"
        "#
        .parse()
        .expect("valid toml");
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"facilities.pexes.name".to_string()));
        assert!(keys.contains(&"facilities.pexes.platforms.name".to_string()));
        let name_count = keys.iter().filter(|k| *k == "facilities.pexes.name").count();
        assert_eq!(name_count, 1, "duplicate paths should be reported once");
    }

    #[test]
    fn test_step_actions_are_not_walked() {
        let toml_str = r#"
[[programs]]
rig = "Rig1"
steps = [{ start = "01/01/2018, AEP" }, { standby = 100 }]
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let toml_str = r#"
[defaults.well.oil]
initial_oil_rte = 5000.0
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].field.contains("initial_oil_rte"));
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("defaults.well.oil.initial_oil_rate")
        );
    }

    #[test]
    fn test_typo_in_well_entry_suggests_correction() {
        let toml_str = r#"
[[facilities.pexes]]
name = "Nene"
[[facilities.pexes.platforms]]
name = "AEP"
[[facilities.pexes.platforms.wells]]
name = "NNM-3"
type = "oil"
oil_cumulatve = 10.0
"#;
        let warnings = validate_unknown_keys(toml_str);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].suggestion.as_deref(),
            Some("facilities.pexes.platforms.wells.oil_cumulative")
        );
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_physical_range_defaults_clean() {
        let (errors, warnings) = validate_physical_ranges(&base_config());
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
        assert!(warnings.is_empty(), "unexpected warnings: {warnings:?}");
    }

    #[test]
    fn test_zero_active_period_is_error() {
        let mut config = base_config();
        config.defaults.well.active_period = Some(0);
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("active_period")));
    }

    #[test]
    fn test_oversized_active_period_is_error() {
        let mut config = base_config();
        config.defaults.well.active_period = Some(MAX_ACTIVE_PERIOD + 1);
        let mut entry = WellEntry::new("NNM-3", WellType::Oil);
        entry.oil_rate = Some(1851.0);
        entry.oil_cumulative = Some(2_846_703.0);
        entry.active_period = Some(u32::MAX);
        config.facilities.pexes[0].platforms[0].wells.push(entry);

        let (errors, _) = validate_physical_ranges(&config);
        assert_eq!(errors.len(), 2, "errors: {errors:?}");
        assert!(errors.iter().all(|e| e.contains("active_period")));
    }

    #[test]
    fn test_negative_b_is_error() {
        let mut config = base_config();
        if let Some(oil) = config.defaults.well.oil.as_mut() {
            oil.b_oil = -0.5;
        }
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("b_oil")));
    }

    #[test]
    fn test_super_hyperbolic_b_warns() {
        let mut config = base_config();
        if let Some(gas) = config.defaults.well.gas.as_mut() {
            gas.b_gas = 1.5;
        }
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field.contains("b_gas")));
    }

    #[test]
    fn test_nan_rate_is_error() {
        let mut config = base_config();
        if let Some(oil) = config.defaults.well.oil.as_mut() {
            oil.initial_oil_rate = f64::NAN;
        }
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("initial_oil_rate")));
    }

    #[test]
    fn test_zero_slots_is_error() {
        let mut config = base_config();
        config.facilities.pexes[0].platforms[0].slots = 0;
        let (errors, _) = validate_physical_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("slots")));
    }

    #[test]
    fn test_exhausted_reserves_warns() {
        let mut config = base_config();
        let mut entry = WellEntry::new("LJM-11", WellType::Gas);
        entry.gas_rate = Some(31_415_927.0);
        entry.gas_cumulative = Some(533_919_437.0);
        config.facilities.pexes[0].platforms[0].wells.push(entry);
        let (errors, warnings) = validate_physical_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.message.contains("LJM-11")));
    }
}
