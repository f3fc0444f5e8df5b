//! 결과 검증기(자가 복구)와 기본 결과 생성 테스트.
use dc_matrix_calculator::diagnostics::{DiagnosticLevel, MemorySink, NullSink};
use dc_matrix_calculator::model::{
    CalculationInput, CalculationParams, CalculationResult, CoolingSection, CoolingType,
    RedundancyMode, SustainabilityOptions,
};
use dc_matrix_calculator::validation::{
    create_default_results, create_default_results_with_params, validate_calculation_inputs,
    validate_calculation_results, validate_calculation_results_with_params,
};
use serde_json::{json, Value};

fn assert_close(actual: f64, expected: f64) {
    let tol = 1e-9 * expected.abs().max(1.0);
    assert!(
        (actual - expected).abs() <= tol,
        "actual={actual} expected={expected}"
    );
}

fn scenario_input() -> CalculationInput {
    validate_calculation_inputs(
        &json!({
            "kwPerRack": 10,
            "coolingType": "air",
            "totalRacks": 20,
            "redundancyMode": "N+1",
            "includeGenerator": false,
            "batteryRuntime": 10,
            "sustainabilityOptions": {
                "enableWasteHeatRecovery": false,
                "enableWaterRecycling": false,
                "renewableEnergyPercentage": 20
            }
        }),
        &NullSink,
    )
}

fn input_with(cooling_type: CoolingType, redundancy_mode: RedundancyMode) -> CalculationInput {
    CalculationInput {
        cooling_type,
        redundancy_mode,
        ..CalculationInput::default()
    }
}

fn assert_all_finite(r: &CalculationResult) {
    let value = serde_json::to_value(r).expect("serialize result");
    fn walk(path: &str, v: &Value) {
        match v {
            Value::Object(map) => {
                for (k, child) in map {
                    walk(&format!("{path}.{k}"), child);
                }
            }
            Value::Number(n) => {
                let f = n.as_f64().expect("number");
                assert!(f.is_finite(), "{path} = {f}");
            }
            Value::Null => panic!("{path} is null"),
            _ => {}
        }
    }
    walk("", &value);
}

fn assert_cost_identity(r: &CalculationResult) {
    let c = &r.cost;
    assert_eq!(
        c.total_project_cost,
        c.equipment_total + c.installation + c.engineering + c.contingency
    );
}

#[test]
fn absent_result_is_synthesized_from_input() {
    let input = scenario_input();
    let sink = MemorySink::new();
    let r = validate_calculation_results(&Value::Null, &input, &sink);

    assert_close(r.rack.total_it_load, 200.0);
    assert_eq!(r.cooling.type_tag(), "air");
    assert_eq!(r.reliability.tier, "Tier III");
    assert_eq!(r.reliability.availability, "99.99%");
    assert_eq!(r, create_default_results(&input));
    assert_eq!(sink.count(DiagnosticLevel::Error), 1);
}

#[test]
fn synthesized_air_design_matches_hand_calculation() {
    let r = create_default_results(&scenario_input());

    assert_close(r.rack.rows, 2.0);
    assert_eq!(r.electrical.tap_off_box, "63A");
    assert_eq!(r.electrical.rpdu, "32A 3-Phase");
    assert_eq!(r.electrical.busbar_size, "800A");
    assert_close(r.electrical.busbars_required, 4.0);

    match &r.cooling {
        CoolingSection::Air(c) => {
            assert_close(c.heat_load, 200.0);
            assert_close(c.installed_capacity, 240.0);
            assert_close(c.rdhx_units, 4.0);
            assert_eq!(c.rdhx_model, "Standard");
            assert_eq!(c.piping_size, "none");
        }
        other => panic!("expected air cooling, got {other:?}"),
    }

    assert_close(r.power.ups.modules_required, 1.0);
    assert_close(r.power.ups.redundant_modules, 1.0);
    assert_close(r.power.ups.total_capacity, 500.0);
    assert_close(r.power.battery.cabinets, 1.0);
    assert!(!r.power.generator.included);
    assert_close(r.power.generator.capacity, 0.0);

    assert_close(r.cost.electrical.total, 174_000.0);
    assert_close(r.cost.cooling, 216_000.0);
    assert_close(r.cost.installation, r.cost.equipment_total * 0.15);
    assert_close(r.cost.engineering, r.cost.equipment_total * 0.10);
    assert_close(r.cost.contingency, r.cost.equipment_total * 0.10);
    assert_cost_identity(&r);
    assert_close(r.cost.cost_per_rack, r.cost.total_project_cost / 20.0);
    assert_close(r.cost.cost_per_kw, r.cost.total_project_cost / 200.0);

    assert_close(r.sustainability.pue, 1.6);
    assert_close(r.sustainability.annual_energy_consumption, 200.0 * 8.76 * 1.6);
    assert_close(
        r.carbon_footprint.grid_emissions,
        200.0 * 8.76 * 1.6 * 0.4 * 0.8,
    );
    assert_close(r.carbon_footprint.generator_emissions, 0.0);
    assert_close(r.tco.total_5_year, r.tco.capex + r.tco.opex * 5.0);
    assert_close(r.tco.total_10_year, r.tco.capex + r.tco.opex * 10.0);
}

#[test]
fn empty_cost_section_is_recomputed_hierarchically() {
    let input = CalculationInput::default();
    assert_eq!(input.kw_per_rack, 75.0);
    assert_eq!(input.total_racks, 28);

    let sink = MemorySink::new();
    let r = validate_calculation_results(&json!({ "cost": {} }), &input, &sink);
    assert!(r.cost.total_project_cost > 0.0);
    assert_cost_identity(&r);
    assert_eq!(r.cost, create_default_results(&input).cost);
    // 빈 cost 섹션의 필드 18개는 경고, 나머지 8개 섹션은 오류
    assert_eq!(sink.count(DiagnosticLevel::Warn), 18);
    assert_eq!(sink.count(DiagnosticLevel::Error), 8);
}

#[test]
fn missing_reliability_uses_redundancy_mode() {
    let input = input_with(CoolingType::Air, RedundancyMode::TwoN);
    let mut supplied = serde_json::to_value(create_default_results(&input)).expect("serialize");
    supplied
        .as_object_mut()
        .expect("object")
        .remove("reliability");

    let sink = MemorySink::new();
    let r = validate_calculation_results(&supplied, &input, &sink);
    assert_eq!(r.reliability.tier, "Tier IV");
    assert_eq!(r.reliability.availability, "99.999%");
    assert_close(r.reliability.annual_downtime, 5.3);
    assert_eq!(r.reliability.redundancy_mode, "2N");
    assert_eq!(sink.count(DiagnosticLevel::Error), 1);
    assert_eq!(sink.events()[0].field(), Some("reliability"));
}

#[test]
fn reliability_profiles_follow_redundancy_mode() {
    let cases = [
        (RedundancyMode::N, "Tier II", "99.9%", 526.0),
        (RedundancyMode::NPlusOne, "Tier III", "99.99%", 52.6),
        (RedundancyMode::TwoN, "Tier IV", "99.999%", 5.3),
        (RedundancyMode::TwoNPlusOne, "Tier II", "99.9%", 526.0),
    ];
    for (mode, tier, availability, downtime) in cases {
        let r = create_default_results(&input_with(CoolingType::Air, mode));
        assert_eq!(r.reliability.tier, tier, "{mode:?}");
        assert_eq!(r.reliability.availability, availability);
        assert_close(r.reliability.annual_downtime, downtime);
    }
}

#[test]
fn pue_baseline_and_credits() {
    let cases = [
        (CoolingType::Air, 1.6),
        (CoolingType::Dlc, 1.2),
        (CoolingType::Hybrid, 1.3),
        (CoolingType::Immersion, 1.1),
    ];
    for (cooling_type, pue) in cases {
        let r = create_default_results(&input_with(cooling_type, RedundancyMode::NPlusOne));
        assert_close(r.sustainability.pue, pue);
    }

    let mut input = input_with(CoolingType::Dlc, RedundancyMode::NPlusOne);
    input.sustainability_options = SustainabilityOptions {
        enable_waste_heat_recovery: true,
        enable_water_recycling: true,
        renewable_energy_percentage: 20.0,
    };
    let r = create_default_results(&input);
    assert_close(r.sustainability.pue, 1.2 - 0.1 - 0.05);

    input.cooling_type = CoolingType::Immersion;
    let r = create_default_results(&input);
    assert_close(r.sustainability.pue, 1.03);
}

#[test]
fn generator_emissions_only_when_included() {
    let mut input = CalculationInput::default();
    let without = create_default_results(&input);
    assert_close(without.carbon_footprint.generator_emissions, 0.0);

    input.include_generator = true;
    let with = create_default_results(&input);
    assert!(with.power.generator.included);
    assert!(with.power.generator.units >= 2.0);
    assert!(with.carbon_footprint.generator_emissions > 0.0);
    assert_close(
        with.carbon_footprint.total_emissions,
        with.carbon_footprint.grid_emissions + with.carbon_footprint.generator_emissions,
    );
}

#[test]
fn full_renewable_zeroes_grid_emissions() {
    let mut input = CalculationInput::default();
    input.sustainability_options.renewable_energy_percentage = 100.0;
    let r = create_default_results(&input);
    assert_close(r.carbon_footprint.grid_emissions, 0.0);
    assert!(r.carbon_footprint.renewable_offset > 0.0);
}

#[test]
fn every_cooling_type_and_redundancy_mode_is_complete() {
    for cooling_type in CoolingType::ALL {
        for mode in RedundancyMode::ALL {
            let input = input_with(cooling_type, mode);
            let r = create_default_results(&input);
            assert_eq!(r.cooling.type_tag(), cooling_type.as_str());
            assert_close(r.rack.total_it_load, input.total_it_load());
            assert_cost_identity(&r);
            assert_all_finite(&r);
            assert!(r.cooling.installed_capacity() >= r.cooling.heat_load());
        }
    }
}

#[test]
fn liquid_cooling_branches_have_their_fields() {
    let r = create_default_results(&input_with(CoolingType::Dlc, RedundancyMode::NPlusOne));
    let CoolingSection::Dlc(c) = &r.cooling else {
        panic!("expected dlc");
    };
    assert_close(c.dlc_cooling_capacity, 2100.0 * 0.75);
    assert_close(c.residual_cooling_capacity, 2100.0 * 0.25);
    assert_close(c.dlc_flow_rate, 1575.0 * 14.33 / 10.0);
    assert_eq!(c.piping_size, "DN200");

    let r = create_default_results(&input_with(CoolingType::Immersion, RedundancyMode::N));
    let CoolingSection::Immersion(c) = &r.cooling else {
        panic!("expected immersion");
    };
    assert_close(c.immersion_tanks, 21.0);
    assert_close(c.fluid_volume, 42_000.0);
    assert_eq!(c.piping_size, "DN250");
}

#[test]
fn cooling_branch_follows_supplied_type() {
    let input = input_with(CoolingType::Air, RedundancyMode::NPlusOne);
    let supplied = json!({ "cooling": { "type": "immersion", "heatLoad": 1234.5 } });
    let r = validate_calculation_results(&supplied, &input, &NullSink);
    match &r.cooling {
        CoolingSection::Immersion(c) => {
            assert_close(c.heat_load, 1234.5);
            assert!(c.immersion_tanks > 0.0);
        }
        other => panic!("expected immersion, got {other:?}"),
    }
}

#[test]
fn invalid_cooling_type_tag_uses_input_type() {
    let input = input_with(CoolingType::Hybrid, RedundancyMode::NPlusOne);
    let supplied = json!({ "cooling": { "type": "water" } });
    let sink = MemorySink::new();
    let r = validate_calculation_results(&supplied, &input, &sink);
    assert_eq!(r.cooling.type_tag(), "hybrid");
    assert!(sink
        .warnings()
        .iter()
        .any(|e| e.field() == Some("cooling.type")));
}

#[test]
fn supplied_numbers_are_trusted_even_when_implausible() {
    let input = CalculationInput::default();
    let mut supplied = serde_json::to_value(create_default_results(&input)).expect("serialize");
    supplied["cost"]["totalProjectCost"] = json!(-1000.0);
    supplied["rack"]["totalITLoad"] = json!(1.0);

    let sink = MemorySink::new();
    let r = validate_calculation_results(&supplied, &input, &sink);
    assert_eq!(r.cost.total_project_cost, -1000.0);
    assert_eq!(r.rack.total_it_load, 1.0);
    assert!(sink.is_empty());
}

#[test]
fn wrong_typed_leaf_is_replaced_with_warning() {
    let input = CalculationInput::default();
    let mut supplied = serde_json::to_value(create_default_results(&input)).expect("serialize");
    supplied["rack"]["totalITLoad"] = json!("2100");
    supplied["power"]["generator"]["included"] = json!(1);

    let sink = MemorySink::new();
    let r = validate_calculation_results(&supplied, &input, &sink);
    assert_close(r.rack.total_it_load, 2100.0);
    assert!(!r.power.generator.included);

    let warnings = sink.warnings();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].field(), Some("rack.totalITLoad"));
    assert_eq!(warnings[0].data["provided"], json!("2100"));
    assert_eq!(warnings[1].field(), Some("power.generator.included"));
}

#[test]
fn derived_costs_use_supplied_siblings() {
    let input = CalculationInput::default();
    let supplied = json!({ "cost": { "equipmentTotal": 1_000_000.0 } });
    let r = validate_calculation_results(&supplied, &input, &NullSink);
    assert_close(r.cost.equipment_total, 1_000_000.0);
    assert_close(r.cost.installation, 150_000.0);
    assert_close(r.cost.engineering, 100_000.0);
    assert_close(r.cost.contingency, 100_000.0);
    assert_close(r.cost.total_project_cost, 1_350_000.0);
    assert_close(r.cost.cost_per_rack, 1_350_000.0 / 28.0);
    assert_close(r.cost.cost_per_kw, 1_350_000.0 / 2100.0);

    let supplied = json!({ "tco": { "capex": 10.0, "opex": 2.0 } });
    let r = validate_calculation_results(&supplied, &input, &NullSink);
    assert_close(r.tco.total_5_year, 20.0);
    assert_close(r.tco.total_10_year, 30.0);
}

#[test]
fn division_by_zero_is_guarded() {
    let zero_racks = CalculationInput {
        total_racks: 0,
        ..CalculationInput::default()
    };
    let zero_kw = CalculationInput {
        kw_per_rack: 0.0,
        ..CalculationInput::default()
    };
    for input in [zero_racks, zero_kw] {
        let r = create_default_results(&input);
        assert_all_finite(&r);
        assert_eq!(r.cost.cost_per_kw, 0.0);
        assert_cost_identity(&r);
        let repaired = validate_calculation_results(&json!({ "cost": {} }), &input, &NullSink);
        assert_all_finite(&repaired);
    }
    let r = create_default_results(&CalculationInput {
        total_racks: 0,
        ..CalculationInput::default()
    });
    assert_eq!(r.cost.cost_per_rack, 0.0);
}

#[test]
fn garbage_results_always_yield_complete_output() {
    let input = CalculationInput::default();
    let samples = [
        Value::Null,
        json!(0),
        json!("result"),
        json!([]),
        json!({}),
        json!({ "rack": 5, "cooling": [], "power": { "ups": "x", "battery": null } }),
        json!({ "cost": { "electrical": 7, "power": { "ups": "NaN" } }, "tco": { "capex": null } }),
        json!({ "sustainability": { "pue": true }, "carbonFootprint": { "gridEmissions": {} } }),
    ];
    for raw in samples {
        let r = validate_calculation_results(&raw, &input, &NullSink);
        assert_all_finite(&r);
        assert_close(r.rack.total_it_load, input.total_it_load());
    }
}

#[test]
fn result_validation_is_idempotent() {
    let input = input_with(CoolingType::Hybrid, RedundancyMode::TwoN);
    let samples = [
        Value::Null,
        json!({ "cost": {}, "cooling": { "type": "dlc" } }),
        json!({ "rack": { "totalITLoad": "bad" }, "tco": { "capex": 5 } }),
    ];
    for raw in samples {
        let once = validate_calculation_results(&raw, &input, &NullSink);
        let as_json = serde_json::to_value(&once).expect("serialize result");
        let sink = MemorySink::new();
        let twice = validate_calculation_results(&as_json, &input, &sink);
        assert_eq!(once, twice);
        assert!(sink.is_empty(), "second pass emitted {:?}", sink.events());
    }
}

#[test]
fn custom_params_flow_through_defaults() {
    let input = CalculationInput::default();
    let mut params = CalculationParams::default();
    params.cost_factors.installation_percentage = 0.2;
    params.electrical.racks_per_row = 7.0;

    let r = create_default_results_with_params(&input, &params);
    assert_close(r.rack.rows, 4.0);
    assert_close(r.cost.installation, r.cost.equipment_total * 0.2);

    let repaired =
        validate_calculation_results_with_params(&json!({}), &input, &params, &NullSink);
    assert_eq!(repaired, r);
}
