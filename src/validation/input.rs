//! 입력 검증기. 신뢰할 수 없는 JSON을 완전한 [`CalculationInput`]으로 정규화한다.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::diagnostics::DiagnosticSink;
use crate::model::{CalculationInput, CoolingType, Location, RedundancyMode, SustainabilityOptions};

const SOURCE: &str = "input_validator";

fn positive_number(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite() && *x > 0.0)
}

fn rack_count(v: &Value) -> Option<u32> {
    let n = v.as_f64()?;
    if n.is_finite() && n > 0.0 && n.fract() == 0.0 && n <= f64::from(u32::MAX) {
        Some(n as u32)
    } else {
        None
    }
}

fn percentage(v: &Value) -> Option<f64> {
    v.as_f64().filter(|x| x.is_finite() && (0.0..=100.0).contains(x))
}

fn finite_number(v: Option<&Value>) -> Option<f64> {
    v?.as_f64().filter(|x| x.is_finite())
}

/// 값이 유효하면 그대로, 아니면 기본값을 쓰고 경고를 남긴다.
fn pick<T: Serialize>(
    sink: &dyn DiagnosticSink,
    field: &str,
    provided: Option<&Value>,
    default: T,
    parse: impl FnOnce(&Value) -> Option<T>,
) -> T {
    match provided.and_then(parse) {
        Some(v) => v,
        None => {
            let default_json = serde_json::to_value(&default).unwrap_or(Value::Null);
            sink.warn(
                SOURCE,
                format!("{field} 값이 유효하지 않아 기본값 {default_json}을(를) 사용합니다"),
                json!({
                    "field": field,
                    "provided": provided.cloned().unwrap_or(Value::Null),
                    "default": default_json,
                }),
            );
            default
        }
    }
}

/// 원시 입력을 검증·정규화한다. 실패하지 않으며 부분 데이터를 돌려주지 않는다.
///
/// 객체가 아니면 전체 기본 입력을 돌려준다. `location`은 위도/경도가 모두 유효할
/// 때만 통째로 받아들이고, `sustainabilityOptions`는 필드별로 병합한다.
pub fn validate_calculation_inputs(raw: &Value, sink: &dyn DiagnosticSink) -> CalculationInput {
    let defaults = CalculationInput::default();
    let Some(obj) = raw.as_object() else {
        sink.error(
            SOURCE,
            "입력이 객체가 아니므로 기본 입력을 사용합니다".to_string(),
            json!({ "provided": raw }),
        );
        return defaults;
    };

    let kw_per_rack = pick(
        sink,
        "kwPerRack",
        obj.get("kwPerRack"),
        defaults.kw_per_rack,
        positive_number,
    );
    let cooling_type = pick(
        sink,
        "coolingType",
        obj.get("coolingType"),
        defaults.cooling_type,
        |v| v.as_str().and_then(CoolingType::parse),
    );
    let total_racks = pick(
        sink,
        "totalRacks",
        obj.get("totalRacks"),
        defaults.total_racks,
        rack_count,
    );
    let redundancy_mode = pick(
        sink,
        "redundancyMode",
        obj.get("redundancyMode"),
        defaults.redundancy_mode,
        |v| v.as_str().and_then(RedundancyMode::parse),
    );
    let include_generator = pick(
        sink,
        "includeGenerator",
        obj.get("includeGenerator"),
        defaults.include_generator,
        Value::as_bool,
    );
    let battery_runtime = pick(
        sink,
        "batteryRuntime",
        obj.get("batteryRuntime"),
        defaults.battery_runtime,
        positive_number,
    );
    let sustainability_options = validate_sustainability(obj.get("sustainabilityOptions"), sink);
    let location = match obj.get("location") {
        None | Some(Value::Null) => None,
        Some(v) => validate_location(v, sink),
    };

    CalculationInput {
        kw_per_rack,
        cooling_type,
        total_racks,
        redundancy_mode,
        include_generator,
        battery_runtime,
        sustainability_options,
        location,
    }
}

fn validate_sustainability(raw: Option<&Value>, sink: &dyn DiagnosticSink) -> SustainabilityOptions {
    let defaults = SustainabilityOptions::default();
    let opts: Option<&Map<String, Value>> = match raw {
        Some(Value::Object(map)) => Some(map),
        None => None,
        Some(other) => {
            sink.warn(
                SOURCE,
                "sustainabilityOptions가 객체가 아니므로 필드별 기본값을 사용합니다".to_string(),
                json!({
                    "field": "sustainabilityOptions",
                    "provided": other,
                    "default": defaults,
                }),
            );
            None
        }
    };
    let field = |name: &'static str| opts.and_then(|m| m.get(name));

    SustainabilityOptions {
        enable_waste_heat_recovery: pick(
            sink,
            "sustainabilityOptions.enableWasteHeatRecovery",
            field("enableWasteHeatRecovery"),
            defaults.enable_waste_heat_recovery,
            Value::as_bool,
        ),
        enable_water_recycling: pick(
            sink,
            "sustainabilityOptions.enableWaterRecycling",
            field("enableWaterRecycling"),
            defaults.enable_water_recycling,
            Value::as_bool,
        ),
        renewable_energy_percentage: pick(
            sink,
            "sustainabilityOptions.renewableEnergyPercentage",
            field("renewableEnergyPercentage"),
            defaults.renewable_energy_percentage,
            percentage,
        ),
    }
}

/// 위치는 위도/경도가 모두 유한한 숫자일 때만 통째로 받아들인다.
fn validate_location(raw: &Value, sink: &dyn DiagnosticSink) -> Option<Location> {
    let parsed = raw.as_object().and_then(|m| {
        let latitude = finite_number(m.get("latitude"))?;
        let longitude = finite_number(m.get("longitude"))?;
        Some((m, latitude, longitude))
    });
    let Some((map, latitude, longitude)) = parsed else {
        sink.warn(
            SOURCE,
            "location의 좌표가 유효하지 않아 위치 정보를 버립니다".to_string(),
            json!({ "field": "location", "provided": raw, "default": Value::Null }),
        );
        return None;
    };

    let address = match map.get("address") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            sink.warn(
                SOURCE,
                "location.address가 문자열이 아니므로 무시합니다".to_string(),
                json!({ "field": "location.address", "provided": other, "default": Value::Null }),
            );
            None
        }
    };
    let climate_data = map.get("climateData").filter(|v| !v.is_null()).cloned();

    Some(Location {
        latitude,
        longitude,
        address,
        climate_data,
    })
}
