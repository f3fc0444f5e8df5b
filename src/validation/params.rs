//! 계산 계수의 구조 보정(`ensure_params_structure`)과 범위 검사(`validate_calculation_params`).

use serde_json::Value;

use crate::model::{CalculationParams, RedundancyMode};
use crate::safe_access::{
    ensure_object_structure, flatten_leaves, get_nested, same_kind, set_nested_property,
};

/// 문자열 말단 중 열거형으로 해석되어야 하는 경로.
const ENUM_LEAVES: &[(&str, fn(&str) -> bool)] =
    &[("electrical.redundancyMode", is_redundancy_tag)];

fn is_redundancy_tag(tag: &str) -> bool {
    RedundancyMode::parse(tag).is_some()
}

/// 내장 기본 계수의 JSON 표현.
pub fn default_params_value() -> Value {
    serde_json::to_value(CalculationParams::default()).unwrap_or(Value::Null)
}

/// 부분 계수를 기본값 위에 말단 단위로 병합한다.
///
/// 종류(숫자/문자열/불리언)가 기본값과 같은 말단은 값이 비현실적이어도 유지한다.
/// 한 섹션이 일부만 주어져도 나머지 필드만 기본값으로 채운다.
pub fn ensure_params_structure(partial: &Value) -> CalculationParams {
    let schema = flatten_leaves(&default_params_value());
    let mut merged = ensure_object_structure(partial, &schema);
    for (path, is_valid) in ENUM_LEAVES {
        let ok = get_nested(&merged, path)
            .and_then(Value::as_str)
            .is_some_and(is_valid);
        if !ok {
            if let Some((_, default)) = schema.iter().find(|(p, _)| p == path) {
                set_nested_property(&mut merged, path, default.clone());
            }
        }
    }
    serde_json::from_value(merged).unwrap_or_default()
}

/// 계수 검증 오류.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// 필드 누락
    Missing { path: String },
    /// JSON 종류 불일치
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    /// 허용 범위 밖
    OutOfRange {
        path: String,
        value: f64,
        expected: &'static str,
    },
    /// 알 수 없는 열거형 값
    UnknownVariant { path: String, value: String },
    /// 냉각 밀도 구간 순서 오류
    ThresholdOrder,
}

impl ParamError {
    pub fn path(&self) -> &str {
        match self {
            ParamError::Missing { path }
            | ParamError::WrongType { path, .. }
            | ParamError::OutOfRange { path, .. }
            | ParamError::UnknownVariant { path, .. } => path,
            ParamError::ThresholdOrder => "coolingThresholds",
        }
    }
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::Missing { path } => write!(f, "{path}: 값이 없습니다"),
            ParamError::WrongType {
                path,
                expected,
                found,
            } => write!(f, "{path}: {expected} 타입이어야 하지만 {found}입니다"),
            ParamError::OutOfRange {
                path,
                value,
                expected,
            } => write!(f, "{path}: {value}는 허용 범위 {expected} 밖입니다"),
            ParamError::UnknownVariant { path, value } => {
                write!(f, "{path}: 알 수 없는 값 '{value}'")
            }
            ParamError::ThresholdOrder => write!(
                f,
                "coolingThresholds: airCooledMax ≤ recommendedDlcMin ≤ recommendedImmersionMin 이어야 합니다"
            ),
        }
    }
}

impl std::error::Error for ParamError {}

/// 계수 검증 결과.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamsReport {
    pub is_valid: bool,
    pub errors: Vec<ParamError>,
}

#[derive(Debug, Clone, Copy)]
enum Bound {
    /// (0, ∞)
    Positive,
    /// [0, ∞)
    NonNegative,
    /// [1, ∞)
    AtLeastOne,
    /// (0, 1]
    UnitOpenClosed,
    /// (0, 1)
    UnitOpen,
    /// [0, 1]
    UnitClosed,
}

impl Bound {
    fn contains(self, v: f64) -> bool {
        match self {
            Bound::Positive => v > 0.0,
            Bound::NonNegative => v >= 0.0,
            Bound::AtLeastOne => v >= 1.0,
            Bound::UnitOpenClosed => v > 0.0 && v <= 1.0,
            Bound::UnitOpen => v > 0.0 && v < 1.0,
            Bound::UnitClosed => (0.0..=1.0).contains(&v),
        }
    }

    fn label(self) -> &'static str {
        match self {
            Bound::Positive => "(0, ∞)",
            Bound::NonNegative => "[0, ∞)",
            Bound::AtLeastOne => "[1, ∞)",
            Bound::UnitOpenClosed => "(0, 1]",
            Bound::UnitOpen => "(0, 1)",
            Bound::UnitClosed => "[0, 1]",
        }
    }
}

fn bound_for(path: &str) -> Option<Bound> {
    let bound = match path {
        "electrical.powerFactor" => Bound::UnitOpenClosed,
        "electrical.busbarsPerRow" | "electrical.racksPerRow" => Bound::AtLeastOne,
        "cooling.dlcResidualHeatFraction" | "cooling.hybridDlcFraction" => Bound::UnitOpen,
        "cooling.chillerEfficiencyFactor" | "cooling.immersionFluidPerTank" => Bound::NonNegative,
        p if p.starts_with("cooling.pue.") => Bound::AtLeastOne,
        p if p.starts_with("cooling.waterFactor.") => Bound::NonNegative,
        "power.upsFrameMaxModules" => Bound::AtLeastOne,
        "power.batteryEfficiency" => Bound::UnitOpenClosed,
        "power.eHouseBaseSqm" | "power.eHouseBatterySqm" | "power.generatorFuelPerKwh" => {
            Bound::NonNegative
        }
        "costFactors.installationPercentage"
        | "costFactors.engineeringPercentage"
        | "costFactors.contingencyPercentage" => Bound::UnitClosed,
        p if p.starts_with("costFactors.") => Bound::NonNegative,
        "sustainability.wasteHeatRecoveryFraction" | "sustainability.waterRecyclingReduction" => {
            Bound::UnitClosed
        }
        "sustainability.pueFloor" => Bound::AtLeastOne,
        p if p.starts_with("sustainability.") => Bound::NonNegative,
        p if p.starts_with("electrical.")
            || p.starts_with("cooling.")
            || p.starts_with("power.")
            || p.starts_with("coolingThresholds.") =>
        {
            Bound::Positive
        }
        _ => return None,
    };
    Some(bound)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// 계수를 수정하지 않고 누락·타입·범위 오류를 모두 모아 보고한다.
pub fn validate_calculation_params(params: &Value) -> ParamsReport {
    let mut errors = Vec::new();
    for (path, default) in flatten_leaves(&default_params_value()) {
        let value = match get_nested(params, &path) {
            None | Some(Value::Null) => {
                errors.push(ParamError::Missing { path });
                continue;
            }
            Some(v) => v,
        };
        if !same_kind(value, &default) {
            errors.push(ParamError::WrongType {
                expected: kind_name(&default),
                found: kind_name(value),
                path,
            });
            continue;
        }
        match value {
            Value::Number(n) => {
                let v = n.as_f64().unwrap_or(f64::NAN);
                if let Some(bound) = bound_for(&path) {
                    if !bound.contains(v) {
                        errors.push(ParamError::OutOfRange {
                            path,
                            value: v,
                            expected: bound.label(),
                        });
                    }
                }
            }
            Value::String(s) => {
                let known = ENUM_LEAVES
                    .iter()
                    .find(|(p, _)| *p == path)
                    .map_or(true, |(_, is_valid)| is_valid(s.as_str()));
                if !known {
                    errors.push(ParamError::UnknownVariant {
                        value: s.clone(),
                        path,
                    });
                }
            }
            _ => {}
        }
    }

    let threshold = |name: &str| {
        get_nested(params, &format!("coolingThresholds.{name}")).and_then(Value::as_f64)
    };
    if let (Some(air), Some(dlc), Some(immersion)) = (
        threshold("airCooledMax"),
        threshold("recommendedDlcMin"),
        threshold("recommendedImmersionMin"),
    ) {
        if !(air <= dlc && dlc <= immersion) {
            errors.push(ParamError::ThresholdOrder);
        }
    }

    ParamsReport {
        is_valid: errors.is_empty(),
        errors,
    }
}

/// 타입이 확정된 계수의 범위 검사.
pub fn validate_params(params: &CalculationParams) -> ParamsReport {
    match serde_json::to_value(params) {
        Ok(value) => validate_calculation_params(&value),
        Err(_) => ParamsReport {
            is_valid: false,
            errors: vec![ParamError::Missing {
                path: String::new(),
            }],
        },
    }
}
