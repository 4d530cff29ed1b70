//! Property Tests
//!
//! Decline-law and aggregation invariants over generated inputs.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use well_forecast::decline::arps;
use well_forecast::decline::CurvePoint;
use well_forecast::facilities::Lineage;
use well_forecast::{Level, NodeId, ProfileTable, Rates, WellCurve};

fn close(actual: f64, expected: f64, relative: f64) -> bool {
    (actual - expected).abs() <= relative * expected.abs().max(1.0)
}

// ============================================================================
// Decline Law
// ============================================================================

proptest! {
    #[test]
    fn calibrated_curve_starts_at_qi_and_hits_target(
        qi in 100.0f64..20_000.0,
        b in prop_oneof![Just(0.0f64), 0.05f64..1.5],
        days in 30u32..2_000,
        fraction in 0.2f64..0.95,
    ) {
        let target = qi * f64::from(days) * fraction;
        let di = arps::calibrate(qi, b, target, days).expect("target is reachable");

        prop_assert!(di > 0.0);
        prop_assert_eq!(arps::rate(qi, di, b, 0.0), qi);
        let produced = arps::cumulative(qi, di, b, days);
        prop_assert!(close(produced, target, 1e-3), "produced {} vs target {}", produced, target);
    }

    #[test]
    fn rate_never_increases_for_positive_b(
        qi in 1.0f64..50_000.0,
        di in 1e-6f64..0.5,
        b in 0.01f64..2.0,
        t in 0u32..10_000,
    ) {
        let now = arps::rate(qi, di, b, f64::from(t));
        let next = arps::rate(qi, di, b, f64::from(t + 1));
        prop_assert!(next <= now);
        prop_assert!(next >= 0.0);
    }

    #[test]
    fn cumulative_falls_as_decline_steepens(
        qi in 1.0f64..50_000.0,
        di in 1e-5f64..0.1,
        b in prop_oneof![Just(0.0f64), 0.05f64..1.5],
        days in 2u32..1_000,
    ) {
        let gentle = arps::cumulative(qi, di, b, days);
        let steep = arps::cumulative(qi, di * 2.0, b, days);
        prop_assert!(steep < gentle);
    }
}

// ============================================================================
// Aggregation
// ============================================================================

const PEXES: [&str; 2] = ["nene", "litchendjili"];
const PLATFORMS: [&str; 3] = ["aep", "whp3", "whp4"];

fn curve(index: usize, pex: usize, whp: usize, start: i64, days: u32, oil: f64, gas: f64) -> WellCurve {
    let first = NaiveDate::from_ymd_opt(2018, 1, 1).expect("valid date") + Duration::days(start);
    WellCurve {
        well: NodeId::new(index),
        lineage: Lineage {
            asset: "mxii".into(),
            pex: PEXES[pex].into(),
            whp: PLATFORMS[whp].into(),
            well: format!("w-{index}"),
        },
        qi: oil,
        target: oil * f64::from(days),
        b: 1.0,
        di: 0.0,
        points: (0..days)
            .map(|day| CurvePoint {
                day,
                date: first + Duration::days(i64::from(day)),
                rates: Rates::new(oil / f64::from(day + 1), gas, gas * 0.5),
            })
            .collect(),
    }
}

fn well_specs() -> impl Strategy<Value = Vec<(usize, usize, i64, u32, f64, f64)>> {
    prop::collection::vec(
        (0..PEXES.len(), 0..PLATFORMS.len(), 0i64..60, 1u32..90, 0.0f64..5_000.0, 0.0f64..1e6),
        1..8,
    )
}

proptest! {
    #[test]
    fn every_level_sums_to_the_field(specs in well_specs()) {
        let curves: Vec<WellCurve> = specs
            .iter()
            .enumerate()
            .map(|(i, &(pex, whp, start, days, oil, gas))| curve(i, pex, whp, start, days, oil, gas))
            .collect();
        let mut table = ProfileTable::new();
        table.extend(&curves);

        let field = table.field_production();
        for level in [Level::Pex, Level::Platform, Level::Well] {
            let production = table.level_production(level);
            prop_assert_eq!(production.dates().len(), field.len());
            for (&date, expected) in &field {
                let total = production.total(date).expect("date present");
                prop_assert!(close(total.oil, expected.oil, 1e-9));
                prop_assert!(close(total.gas, expected.gas, 1e-9));
                prop_assert!(close(total.condensate, expected.condensate, 1e-9));
            }
        }
    }

    #[test]
    fn insertion_order_does_not_change_rollups(specs in well_specs()) {
        let curves: Vec<WellCurve> = specs
            .iter()
            .enumerate()
            .map(|(i, &(pex, whp, start, days, oil, gas))| curve(i, pex, whp, start, days, oil, gas))
            .collect();

        let mut forward = ProfileTable::new();
        forward.extend(&curves);
        let mut reversed = ProfileTable::new();
        reversed.extend(curves.iter().rev());

        let a = forward.well_production();
        let b = reversed.well_production();
        prop_assert_eq!(a.labels(), b.labels());
        prop_assert_eq!(a.dates(), b.dates());
        for &date in a.dates() {
            for label in a.labels() {
                let (x, y) = (a.get(date, label).expect("cell"), b.get(date, label).expect("cell"));
                prop_assert!(x.max_abs_diff(&y) <= 1e-9 * x.gas.abs().max(1.0));
            }
        }
    }
}
