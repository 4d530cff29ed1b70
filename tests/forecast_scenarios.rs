//! Forecast Scenario Tests
//!
//! End-to-end runs from TOML configuration through tree build, program
//! replay, decline calibration and aggregation.

use chrono::{Duration, NaiveDate};
use well_forecast::{ForecastConfig, ForecastError, Forecast, Level, Rates};

const SAMPLE: &str = include_str!("../forecast.toml");

const DEFAULTS: &str = r#"
[description]
start_date = "01/01/2018"

[defaults.well]
choke = 100.0
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
"#;

const FRESH_OIL_WELL: &str = r#"
[[facilities.pexes.platforms.wells]]
name = "NNM-3"
type = "oil"
oil_rate = 5000.0
oil_cumulative = 0.0
"#;

fn build(toml_str: &str) -> Forecast {
    let config = ForecastConfig::from_toml_str(toml_str).expect("config should parse");
    Forecast::build(&config).expect("forecast should build")
}

fn jan_first() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid date")
}

// ============================================================================
// Single and paired wells
// ============================================================================

#[test]
fn single_oil_well_reference_curve() {
    let forecast = build(&format!("{DEFAULTS}{FRESH_OIL_WELL}"));
    let field = forecast.field_production();
    assert_eq!(field.len(), 3650);

    let day0 = field[&jan_first()];
    assert_eq!(day0, Rates::new(5000.0, 10_000_000.0, 0.0));

    let day365 = field[&(jan_first() + Duration::days(365))];
    assert!((day365.oil - 3742.0).abs() < 1.0, "qo(365) = {}", day365.oil);
    assert!((day365.gas - 8_233_680.0).abs() < 1.0, "qg(365) = {}", day365.gas);
    assert_eq!(day365.condensate, 0.0);
}

#[test]
fn two_identical_wells_sum_at_well_level() {
    let second = FRESH_OIL_WELL.replace("NNM-3", "NNM-4");
    let forecast = build(&format!("{DEFAULTS}{FRESH_OIL_WELL}{second}"));
    let wells = forecast.production(Level::Well);
    assert_eq!(wells.labels(), ["nnm-3", "nnm-4"]);

    let sum_at = |day: i64| -> f64 {
        let date = jan_first() + Duration::days(day);
        wells
            .labels()
            .iter()
            .filter_map(|label| wells.get(date, label))
            .map(|r| r.oil)
            .sum()
    };
    assert_eq!(sum_at(0), 10_000.0);
    assert!((sum_at(365) - 7485.0).abs() < 1.0, "total qo(365) = {}", sum_at(365));
}

#[test]
fn existing_well_calibrates_on_remaining_reserves() {
    let well = FRESH_OIL_WELL
        .replace("oil_rate = 5000.0", "oil_rate = 1851.0")
        .replace("oil_cumulative = 0.0", "oil_cumulative = 2846703.0");
    let forecast = build(&format!("{DEFAULTS}{well}"));
    let curve = &forecast.curves()[0];
    assert_eq!(curve.qi, 1851.0);
    let produced: f64 = curve.points.iter().map(|p| p.rates.oil).sum();
    assert!((produced - (8_000_000.0 - 2_846_703.0)).abs() < 1.0);
}

#[test]
fn unreachable_reserves_abort_the_run() {
    // 198/day for 3650 days cannot deliver 7.5 million
    let well = FRESH_OIL_WELL
        .replace("oil_rate = 5000.0", "oil_rate = 198.0")
        .replace("oil_cumulative = 0.0", "oil_cumulative = 458645.0");
    let config = ForecastConfig::from_toml_str(&format!("{DEFAULTS}{well}")).expect("config parses");
    let err = Forecast::build(&config).expect_err("calibration cannot reach target");
    assert!(matches!(err, ForecastError::RootFinding { ref well, .. } if well == "NNM-3"));
}

// ============================================================================
// Full sample case
// ============================================================================

#[test]
fn sample_case_builds_every_well() {
    let forecast = build(SAMPLE);
    let tree = forecast.tree();
    assert_eq!(tree.wells(tree.root()).len(), 12 + 6);
    assert_eq!(forecast.profiles().len(), 18 * 3650);

    let last = NaiveDate::from_ymd_opt(2029, 2, 11).expect("valid date");
    assert_eq!(forecast.profiles().date_range(), Some((jan_first(), last)));
}

#[test]
fn sample_case_drilled_wells_start_at_spud_dates() {
    let forecast = build(SAMPLE);
    let tree = forecast.tree();
    for (well, date) in [
        ("NNM-305", (2018, 1, 1)),
        ("NNM-306", (2018, 3, 12)),
        ("NNM-405", (2018, 6, 20)),
        ("NNM-406", (2018, 8, 29)),
        ("L14", (2018, 12, 7)),
        ("L15", (2019, 2, 15)),
    ] {
        let id = tree.find_well(well).expect("well drilled");
        let expected = NaiveDate::from_ymd_opt(date.0, date.1, date.2).expect("valid date");
        assert_eq!(tree.well(id).expect("well").start_date, expected, "{well}");
    }
}

#[test]
fn sample_case_levels_are_additive() {
    let forecast = build(SAMPLE);
    let field = forecast.field_production();
    for level in [Level::Pex, Level::Platform, Level::Well] {
        let production = forecast.production(level);
        assert_eq!(production.dates().len(), field.len(), "{level} is dense over dates");
        for (&date, expected) in &field {
            let total = production.total(date).expect("date present");
            let tolerance = 1e-9 * expected.gas.abs().max(1.0);
            assert!(
                total.max_abs_diff(expected) <= tolerance,
                "{level} total on {date} differs from field"
            );
        }
    }
}

#[test]
fn sample_case_platform_equals_its_wells() {
    let forecast = build(SAMPLE);
    let platforms = forecast.production(Level::Platform);
    let wells = forecast.production(Level::Well);
    let whp4_wells = ["nnm-401", "nnm-402", "nnm-403", "nnm-404", "nnm-405", "nnm-406"];

    let whp4 = platforms.column("whp4").expect("whp4 column");
    for (date, expected) in whp4 {
        let summed: Rates = whp4_wells
            .iter()
            .map(|w| wells.get(date, w).expect("well cell"))
            .sum();
        assert!(summed.max_abs_diff(&expected) <= 1e-6, "whp4 on {date}");
    }
}

#[test]
fn sample_case_gas_wells_produce_condensate_only_with_gas() {
    let forecast = build(SAMPLE);
    let wells = forecast.production(Level::Well);
    let l14 = wells.column("l14").expect("l14 column");
    let spud = NaiveDate::from_ymd_opt(2018, 12, 7).expect("valid date");

    assert_eq!(l14[&(spud - Duration::days(1))], Rates::ZERO);
    let first = l14[&spud];
    assert_eq!(first.gas, 10_000_000.0);
    assert_eq!(first.oil, 0.0);
    assert!((first.condensate - first.gas * 3.1415).abs() < 1e-6);
}

#[test]
fn sample_case_lineage_labels_are_lower_case() {
    let forecast = build(SAMPLE);
    let row = &forecast.profiles().rows()[0];
    assert_eq!(
        (row.asset.as_str(), row.pex.as_str(), row.whp.as_str(), row.well.as_str()),
        ("mxii", "nene", "aep", "nnm-3")
    );
}

#[test]
fn rebuild_is_deterministic() {
    let first = build(SAMPLE);
    let second = build(SAMPLE);
    assert_eq!(first.profiles().rows(), second.profiles().rows());
}
