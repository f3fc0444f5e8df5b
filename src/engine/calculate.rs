use crate::model::{
    CalculationInput, CalculationParams, CalculationResult, CoolingThresholds, CoolingType,
    RedundancyMode,
};
use crate::validation::create_default_results_with_params;

/// 순방향 계산 결과와 설계 검토 메시지.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub result: CalculationResult,
    /// 경고/주의 메시지
    pub warnings: Vec<String>,
}

/// 검증된 입력과 계수로 전체 결과를 계산한다.
pub fn calculate(input: &CalculationInput, params: &CalculationParams) -> Estimate {
    Estimate {
        result: create_default_results_with_params(input, params),
        warnings: review_design(input, params),
    }
}

/// 랙 밀도 [kW/rack]에 맞는 냉각 방식을 추천한다.
pub fn recommend_cooling_type(kw_per_rack: f64, thresholds: &CoolingThresholds) -> CoolingType {
    if kw_per_rack <= thresholds.air_cooled_max {
        CoolingType::Air
    } else if kw_per_rack < thresholds.recommended_dlc_min {
        CoolingType::Hybrid
    } else if kw_per_rack < thresholds.recommended_immersion_min {
        CoolingType::Dlc
    } else {
        CoolingType::Immersion
    }
}

/// 냉각 방식이 감당할 수 있는 밀도 순위.
fn cooling_rank(cooling_type: CoolingType) -> u8 {
    match cooling_type {
        CoolingType::Air => 0,
        CoolingType::Hybrid => 1,
        CoolingType::Dlc => 2,
        CoolingType::Immersion => 3,
    }
}

fn redundancy_rank(mode: RedundancyMode) -> u8 {
    match mode {
        RedundancyMode::N => 0,
        RedundancyMode::NPlusOne => 1,
        RedundancyMode::TwoN => 2,
        RedundancyMode::TwoNPlusOne => 3,
    }
}

/// 결과를 바꾸지 않는 설계 검토. 조합상 무리가 있는 입력을 메시지로 알려준다.
pub fn review_design(input: &CalculationInput, params: &CalculationParams) -> Vec<String> {
    let mut warnings = Vec::new();

    let recommended = recommend_cooling_type(input.kw_per_rack, &params.cooling_thresholds);
    if cooling_rank(input.cooling_type) < cooling_rank(recommended) {
        warnings.push(format!(
            "랙당 {:.1} kW에는 {} 냉각이 부족할 수 있습니다. {} 냉각을 검토하세요.",
            input.kw_per_rack,
            input.cooling_type.as_str(),
            recommended.as_str()
        ));
    }

    if input.battery_runtime < params.power.battery_runtime {
        warnings.push(format!(
            "배터리 유지 시간 {:.1}분이 권장 최소 {:.1}분보다 짧습니다.",
            input.battery_runtime, params.power.battery_runtime
        ));
    }

    if input.redundancy_mode.is_dual_path() && !input.include_generator {
        warnings.push(format!(
            "{} 구성에 발전기가 포함되지 않았습니다.",
            input.redundancy_mode.as_str()
        ));
    }

    let baseline = params.electrical.redundancy_mode;
    if redundancy_rank(input.redundancy_mode) < redundancy_rank(baseline) {
        warnings.push(format!(
            "이중화 {}가 기준 {}보다 낮습니다.",
            input.redundancy_mode.as_str(),
            baseline.as_str()
        ));
    }

    warnings
}
