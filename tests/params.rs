//! 계산 계수 병합/검사 테스트.
use dc_matrix_calculator::model::{CalculationParams, RedundancyMode};
use dc_matrix_calculator::validation::params::default_params_value;
use dc_matrix_calculator::validation::{
    ensure_params_structure, validate_calculation_params, validate_params, ParamError,
};
use serde_json::{json, Value};

#[test]
fn empty_or_non_object_params_are_defaults() {
    for raw in [Value::Null, json!({}), json!("params"), json!([1])] {
        assert_eq!(ensure_params_structure(&raw), CalculationParams::default());
    }
}

#[test]
fn partial_section_keeps_its_own_defaults() {
    let params = ensure_params_structure(&json!({
        "electrical": { "busbarsPerRow": 3 },
        "cooling": { "pue": { "dlc": 1.15 } }
    }));
    let defaults = CalculationParams::default();

    assert_eq!(params.electrical.busbars_per_row, 3.0);
    assert_eq!(params.electrical.power_factor, defaults.electrical.power_factor);
    assert_eq!(params.electrical.voltage_factor, defaults.electrical.voltage_factor);
    assert_eq!(params.cooling.pue.dlc, 1.15);
    assert_eq!(params.cooling.pue.air, defaults.cooling.pue.air);
    assert_eq!(params.power, defaults.power);
}

#[test]
fn implausible_values_of_the_right_type_are_kept() {
    let params = ensure_params_structure(&json!({
        "electrical": { "powerFactor": 7.5 },
        "costFactors": { "installationPercentage": -1 }
    }));
    assert_eq!(params.electrical.power_factor, 7.5);
    assert_eq!(params.cost_factors.installation_percentage, -1.0);
}

#[test]
fn wrong_kinds_and_unknown_enum_fall_back() {
    let params = ensure_params_structure(&json!({
        "electrical": { "powerFactor": "high", "redundancyMode": "3N" },
        "power": "none"
    }));
    let defaults = CalculationParams::default();
    assert_eq!(params.electrical.power_factor, defaults.electrical.power_factor);
    assert_eq!(params.electrical.redundancy_mode, RedundancyMode::NPlusOne);
    assert_eq!(params.power, defaults.power);

    let params = ensure_params_structure(&json!({ "electrical": { "redundancyMode": "2N" } }));
    assert_eq!(params.electrical.redundancy_mode, RedundancyMode::TwoN);
}

#[test]
fn default_params_pass_validation() {
    let report = validate_calculation_params(&default_params_value());
    assert!(report.is_valid, "{:?}", report.errors);
    assert!(validate_params(&CalculationParams::default()).is_valid);
}

#[test]
fn validation_reports_without_repairing() {
    let mut raw = default_params_value();
    raw["electrical"]["powerFactor"] = json!(1.5);
    raw["electrical"]["redundancyMode"] = json!("3N");
    raw["cooling"]["deltaT"] = json!("ten");
    raw["costFactors"]["contingencyPercentage"] = json!(2);
    raw["power"]
        .as_object_mut()
        .expect("power section")
        .remove("batteryEfficiency");
    let before = raw.clone();

    let report = validate_calculation_params(&raw);
    assert_eq!(raw, before);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 5);

    let find = |path: &str| report.errors.iter().find(|e| e.path() == path);
    assert!(matches!(
        find("electrical.powerFactor"),
        Some(ParamError::OutOfRange { value, .. }) if *value == 1.5
    ));
    assert!(matches!(
        find("electrical.redundancyMode"),
        Some(ParamError::UnknownVariant { .. })
    ));
    assert!(matches!(
        find("cooling.deltaT"),
        Some(ParamError::WrongType { expected: "number", found: "string", .. })
    ));
    assert!(matches!(
        find("costFactors.contingencyPercentage"),
        Some(ParamError::OutOfRange { .. })
    ));
    assert!(matches!(
        find("power.batteryEfficiency"),
        Some(ParamError::Missing { .. })
    ));
}

#[test]
fn threshold_order_is_checked() {
    let mut params = CalculationParams::default();
    params.cooling_thresholds.recommended_dlc_min = 10.0;
    let report = validate_params(&params);
    assert!(!report.is_valid);
    assert_eq!(report.errors, vec![ParamError::ThresholdOrder]);
}

#[test]
fn empty_params_report_every_leaf_missing() {
    let report = validate_calculation_params(&json!({}));
    let leaves = dc_matrix_calculator::safe_access::flatten_leaves(&default_params_value());
    assert_eq!(report.errors.len(), leaves.len());
    assert!(report
        .errors
        .iter()
        .all(|e| matches!(e, ParamError::Missing { .. })));
}
