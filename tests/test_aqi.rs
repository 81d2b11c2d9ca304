//! Integration tests for breakpoint interpolation, aggregation and categories

use airq::aqi::{
    category, global_index, subindex, AqiStandard, Breakpoint, BreakpointTable, Category, Pollutant,
};
use airq::error::AirQualityError;

fn table(pollutant: Pollutant) -> BreakpointTable {
    AqiStandard::default().table(pollutant).unwrap().clone()
}

// ============================================================================
// Breakpoint interpolation
// ============================================================================

#[test]
fn test_boundaries_map_exactly_for_every_range() {
    for (_, table) in AqiStandard::default().tables() {
        for bp in table.ranges() {
            assert_eq!(subindex(bp.conc_low, table), Some(bp.index_low));
            assert_eq!(subindex(bp.conc_high, table), Some(bp.index_high));
        }
    }
}

#[test]
fn test_monotonic_inside_each_range() {
    for (_, table) in AqiStandard::default().tables() {
        for bp in table.ranges() {
            let steps = 50;
            let mut previous = f64::NEG_INFINITY;
            for i in 1..steps {
                let c = bp.conc_low + (bp.conc_high - bp.conc_low) * i as f64 / steps as f64;
                let v = subindex(c, table).unwrap();
                assert!(v >= previous, "{} decreased at {}", v, c);
                previous = v;
            }
        }
    }
}

#[test]
fn test_reference_subindices() {
    assert!((subindex(10.0, &table(Pollutant::Pm25)).unwrap() - 41.6667).abs() < 1e-3);
    assert!((subindex(40.0, &table(Pollutant::Pm10)).unwrap() - 37.037).abs() < 1e-3);
    assert!((subindex(30.0, &table(Pollutant::No2)).unwrap() - 28.3019).abs() < 1e-3);
}

#[test]
fn test_out_of_table_is_missing() {
    let pm25 = table(Pollutant::Pm25);
    assert_eq!(subindex(-1.0, &pm25), None);
    assert_eq!(subindex(150.5, &pm25), None);
    assert_eq!(subindex(500.0, &pm25), None);
    assert_eq!(subindex(f64::NAN, &pm25), None);
    // gap between 12.0 and 12.1
    assert_eq!(subindex(12.05, &pm25), None);
}

#[test]
fn test_shared_boundary_resolves_to_first_range() {
    let table = BreakpointTable::new(vec![
        Breakpoint::new(0.0, 50.0, 0.0, 50.0),
        Breakpoint::new(50.0, 100.0, 75.0, 100.0),
    ])
    .unwrap();
    assert_eq!(table.subindex(50.0), Some(50.0));
    assert_eq!(table.subindex(50.5).map(|v| v > 75.0), Some(true));
}

#[test]
fn test_overlapping_table_rejected() {
    let result = BreakpointTable::new(vec![
        Breakpoint::new(0.0, 60.0, 0.0, 50.0),
        Breakpoint::new(50.0, 100.0, 51.0, 100.0),
    ]);
    assert!(matches!(result, Err(AirQualityError::InvalidParameter { .. })));
    assert!(BreakpointTable::new(Vec::new()).is_err());
}

#[test]
fn test_custom_standard_adds_pollutant() {
    let o3 = BreakpointTable::new(vec![Breakpoint::new(0.0, 100.0, 0.0, 200.0)]).unwrap();
    let mut tables = AqiStandard::default().tables().to_vec();
    tables.push((Pollutant::O3, o3));
    let standard = AqiStandard::new(tables).unwrap();

    let breakdown = standard.evaluate(|p| match p {
        Pollutant::O3 => Some(90.0),
        _ => Some(1.0),
    });
    assert!((breakdown.global.unwrap() - 180.0).abs() < 1e-9);
    assert_eq!(breakdown.category(), Some(Category::VeryUnhealthy));
}

#[test]
fn test_table_serde_validates() {
    let json = r#"[{"conc_low":0.0,"conc_high":10.0,"index_low":0.0,"index_high":50.0},
                   {"conc_low":5.0,"conc_high":20.0,"index_low":51.0,"index_high":100.0}]"#;
    assert!(serde_json::from_str::<BreakpointTable>(json).is_err());
}

// ============================================================================
// Aggregation and categories
// ============================================================================

#[test]
fn test_reference_reading_is_good() {
    let breakdown = AqiStandard::default().evaluate(|p| match p {
        Pollutant::Pm25 => Some(10.0),
        Pollutant::Pm10 => Some(40.0),
        Pollutant::No2 => Some(30.0),
        _ => None,
    });
    assert!((breakdown.global.unwrap() - 41.6667).abs() < 1e-3);
    assert_eq!(breakdown.category(), Some(Category::Good));
}

#[test]
fn test_only_three_pollutants_contribute() {
    let standard = AqiStandard::default();
    let pollutants: Vec<Pollutant> = standard.pollutants().collect();
    assert_eq!(pollutants, vec![Pollutant::Pm25, Pollutant::Pm10, Pollutant::No2]);

    // SO2 far above any table does not move the index
    let breakdown = standard.evaluate(|p| match p {
        Pollutant::So2 => Some(10_000.0),
        _ => Some(5.0),
    });
    assert_eq!(breakdown.category(), Some(Category::Good));
}

#[test]
fn test_missing_subindices_are_skipped() {
    assert_eq!(global_index([None, Some(30.0), None]), Some(30.0));
    assert_eq!(global_index([Some(-0.0), None]), Some(0.0));
    assert_eq!(global_index([None, None, None]), None);
    assert_eq!(global_index(Vec::<Option<f64>>::new()), None);
}

#[test]
fn test_all_missing_has_no_category() {
    let breakdown = AqiStandard::default().evaluate(|_| Some(-5.0));
    assert_eq!(breakdown.global, None);
    assert_eq!(breakdown.category(), None);
    assert_eq!(category(None), None);
}

#[test]
fn test_category_threshold_edges() {
    assert_eq!(category(Some(50.0)), Some(Category::Good));
    assert_eq!(category(Some(50.01)), Some(Category::Moderate));
    assert_eq!(category(Some(100.0)), Some(Category::Moderate));
    assert_eq!(category(Some(100.01)), Some(Category::Unhealthy));
    assert_eq!(category(Some(150.0)), Some(Category::Unhealthy));
    assert_eq!(category(Some(150.01)), Some(Category::VeryUnhealthy));
    assert_eq!(category(Some(0.0)), Some(Category::Good));
}

#[test]
fn test_category_labels_round_trip() {
    for c in Category::ALL {
        assert_eq!(c.as_str().parse::<Category>().unwrap(), c);
        assert_eq!(serde_json::to_string(&c).unwrap(), format!("\"{}\"", c.as_str()));
    }
    assert!("Hazardous".parse::<Category>().is_err());
}
