//! 결과 검증기(자가 복구 계층)와 기본 결과 생성.
//!
//! 어떤 입력에도 구조적으로 완전한 [`CalculationResult`]를 돌려준다. 오류는 반환하지
//! 않고 진단 싱크로만 알린다.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::diagnostics::{DiagnosticSink, NullSink};
use crate::engine::derive::Derivation;
use crate::model::{CalculationInput, CalculationParams, CalculationResult};

use super::schema::{repair_section_value, Section};

pub(crate) const SOURCE: &str = "result_validator";

/// 보정한 섹션을 타입으로 옮기는 중 발생한 오류. 외부로 전파되지 않는다.
#[derive(Debug)]
pub enum RepairError {
    /// JSON → 결과 타입 변환 실패
    Conversion {
        section: &'static str,
        source: serde_json::Error,
    },
}

impl std::fmt::Display for RepairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepairError::Conversion { section, source } => {
                write!(f, "{section} 섹션 변환 오류: {source}")
            }
        }
    }
}

impl std::error::Error for RepairError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RepairError::Conversion { source, .. } => Some(source),
        }
    }
}

/// 기본 계수로 결과를 검증·보정한다.
pub fn validate_calculation_results(
    result: &Value,
    input: &CalculationInput,
    sink: &dyn DiagnosticSink,
) -> CalculationResult {
    validate_calculation_results_with_params(result, input, &CalculationParams::default(), sink)
}

/// 결과를 섹션별로 독립적으로 검증·보정한다.
///
/// - 결과 전체가 객체가 아니면 오류 이벤트 후 전체 기본값을 생성한다.
/// - 섹션이 없거나 객체가 아니면 오류 이벤트 후 해당 섹션만 생성한다.
/// - 말단 필드의 타입이 틀리면 경고 이벤트 후 입력 기반 기본값으로 바꾼다.
/// - 타입이 맞는 유한한 숫자는 값이 비현실적이어도 그대로 둔다.
pub fn validate_calculation_results_with_params(
    result: &Value,
    input: &CalculationInput,
    params: &CalculationParams,
    sink: &dyn DiagnosticSink,
) -> CalculationResult {
    let d = Derivation::new(input, params);
    if !result.is_object() {
        sink.error(
            SOURCE,
            "계산 결과가 없거나 객체가 아니므로 전체 기본값을 생성합니다".to_string(),
            json!({ "provided": kind_name(result) }),
        );
        return synthesize(&d);
    }
    match repair_tree(Some(result), &d, sink) {
        Ok(repaired) => repaired,
        Err(err) => {
            sink.error(
                SOURCE,
                format!("결과 보정 중 오류가 발생해 전체 기본값으로 대체합니다: {err}"),
                json!({ "error": err.to_string() }),
            );
            synthesize(&d)
        }
    }
}

/// 기본 계수로 입력만 가지고 전체 결과를 생성한다.
pub fn create_default_results(input: &CalculationInput) -> CalculationResult {
    create_default_results_with_params(input, &CalculationParams::default())
}

/// 입력과 계수만 가지고 전체 결과를 생성한다. 이전 결과에 의존하지 않는다.
pub fn create_default_results_with_params(
    input: &CalculationInput,
    params: &CalculationParams,
) -> CalculationResult {
    synthesize(&Derivation::new(input, params))
}

fn synthesize(d: &Derivation<'_>) -> CalculationResult {
    match repair_tree(None, d, &NullSink) {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(error = %err, "기본 결과 스키마가 결과 타입과 맞지 않습니다");
            CalculationResult::default()
        }
    }
}

fn repair_tree(
    result: Option<&Value>,
    d: &Derivation<'_>,
    sink: &dyn DiagnosticSink,
) -> Result<CalculationResult, RepairError> {
    Ok(CalculationResult {
        rack: repair_section(Section::Rack, result, d, sink)?,
        electrical: repair_section(Section::Electrical, result, d, sink)?,
        cooling: repair_section(Section::Cooling, result, d, sink)?,
        power: repair_section(Section::Power, result, d, sink)?,
        cost: repair_section(Section::Cost, result, d, sink)?,
        reliability: repair_section(Section::Reliability, result, d, sink)?,
        sustainability: repair_section(Section::Sustainability, result, d, sink)?,
        carbon_footprint: repair_section(Section::CarbonFootprint, result, d, sink)?,
        tco: repair_section(Section::Tco, result, d, sink)?,
    })
}

fn repair_section<T: DeserializeOwned>(
    section: Section,
    result: Option<&Value>,
    d: &Derivation<'_>,
    sink: &dyn DiagnosticSink,
) -> Result<T, RepairError> {
    let key = section.key();
    let source = match result {
        None => None,
        Some(tree) => match tree.get(key) {
            Some(v) if v.is_object() => Some(v),
            other => {
                sink.error(
                    SOURCE,
                    format!("{key} 섹션이 없거나 객체가 아니므로 기본값을 생성합니다"),
                    json!({
                        "field": key,
                        "provided": other.cloned().unwrap_or(Value::Null),
                    }),
                );
                None
            }
        },
    };
    let repaired = repair_section_value(section, source, d, sink);
    serde_json::from_value(repaired).map_err(|source| RepairError::Conversion {
        section: key,
        source,
    })
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
