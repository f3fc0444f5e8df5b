use dc_matrix_calculator::config::{load_or_default, parse_config, read_params_value, OutputFormat};
use dc_matrix_calculator::model::{CalculationParams, RedundancyMode};
use serde_json::Value;

#[test]
fn partial_params_table_keeps_defaults() {
    let cfg = parse_config(
        r#"
output_format = "json"

[params.electrical]
busbarsPerRow = 3
redundancyMode = "2N"

[params.costFactors]
contingencyPercentage = 0.05
"#,
    )
    .expect("parse config");
    let defaults = CalculationParams::default();

    assert_eq!(cfg.output_format, OutputFormat::Json);
    assert_eq!(cfg.params.electrical.busbars_per_row, 3.0);
    assert_eq!(cfg.params.electrical.redundancy_mode, RedundancyMode::TwoN);
    assert_eq!(cfg.params.electrical.power_factor, defaults.electrical.power_factor);
    assert_eq!(cfg.params.cost_factors.contingency_percentage, 0.05);
    assert_eq!(
        cfg.params.cost_factors.installation_percentage,
        defaults.cost_factors.installation_percentage
    );
    assert_eq!(cfg.params.cooling, defaults.cooling);
}

#[test]
fn empty_config_uses_defaults() {
    let cfg = parse_config("").expect("parse empty");
    assert_eq!(cfg.output_format, OutputFormat::Text);
    assert_eq!(cfg.params, CalculationParams::default());
}

#[test]
fn mistyped_param_falls_back_to_default() {
    let cfg = parse_config("[params.electrical]\npowerFactor = \"high\"\n").expect("parse config");
    assert_eq!(
        cfg.params.electrical.power_factor,
        CalculationParams::default().electrical.power_factor
    );
}

#[test]
fn invalid_toml_is_an_error() {
    assert!(parse_config("output_format = ").is_err());
}

#[test]
fn load_or_default_creates_and_rereads_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");
    assert!(!path.exists());

    let created = load_or_default(&path).expect("create config");
    assert!(path.exists());
    assert_eq!(created.params, CalculationParams::default());

    let reread = load_or_default(&path).expect("reload config");
    assert_eq!(reread.params, created.params);
    assert_eq!(reread.output_format, created.output_format);

    let raw = read_params_value(&path).expect("raw params");
    assert!(raw.get("electrical").is_some());
}

#[test]
fn saved_changes_survive_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("config.toml");

    let mut cfg = load_or_default(&path).expect("create config");
    cfg.output_format = OutputFormat::Json;
    cfg.params.power.battery_runtime = 15.0;
    cfg.save(&path).expect("save config");

    let reread = load_or_default(&path).expect("reload config");
    assert_eq!(reread.output_format, OutputFormat::Json);
    assert_eq!(reread.params.power.battery_runtime, 15.0);
}

#[test]
fn missing_file_has_no_raw_params() {
    let dir = tempfile::tempdir().expect("tempdir");
    let raw = read_params_value(&dir.path().join("absent.toml")).expect("read");
    assert_eq!(raw, Value::Null);
}
