use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 랙 냉각 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoolingType {
    /// 공랭 + 후면도어 열교환기(RDHX)
    #[default]
    Air,
    /// 직접 액체 냉각(DLC)
    Dlc,
    /// DLC + 잔열 공랭 혼합
    Hybrid,
    /// 액침 냉각
    Immersion,
}

impl CoolingType {
    pub const ALL: [CoolingType; 4] = [
        CoolingType::Air,
        CoolingType::Dlc,
        CoolingType::Hybrid,
        CoolingType::Immersion,
    ];

    /// 직렬화 태그 목록. 스키마의 허용값 검사에 쓴다.
    pub const TAGS: &'static [&'static str] = &["air", "dlc", "hybrid", "immersion"];

    pub fn as_str(self) -> &'static str {
        match self {
            CoolingType::Air => "air",
            CoolingType::Dlc => "dlc",
            CoolingType::Hybrid => "hybrid",
            CoolingType::Immersion => "immersion",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }
}

/// 전력/냉각 이중화 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RedundancyMode {
    #[serde(rename = "N")]
    N,
    #[default]
    #[serde(rename = "N+1")]
    NPlusOne,
    #[serde(rename = "2N")]
    TwoN,
    #[serde(rename = "2N+1")]
    TwoNPlusOne,
}

impl RedundancyMode {
    pub const ALL: [RedundancyMode; 4] = [
        RedundancyMode::N,
        RedundancyMode::NPlusOne,
        RedundancyMode::TwoN,
        RedundancyMode::TwoNPlusOne,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RedundancyMode::N => "N",
            RedundancyMode::NPlusOne => "N+1",
            RedundancyMode::TwoN => "2N",
            RedundancyMode::TwoNPlusOne => "2N+1",
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == tag)
    }

    /// 2N 계열(이중 급전)인지 여부.
    pub fn is_dual_path(self) -> bool {
        matches!(self, RedundancyMode::TwoN | RedundancyMode::TwoNPlusOne)
    }
}

/// 지속가능성 옵션.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityOptions {
    pub enable_waste_heat_recovery: bool,
    pub enable_water_recycling: bool,
    /// 재생에너지 비율 [%], 0~100
    pub renewable_energy_percentage: f64,
}

impl Default for SustainabilityOptions {
    fn default() -> Self {
        Self {
            enable_waste_heat_recovery: false,
            enable_water_recycling: false,
            renewable_energy_percentage: 20.0,
        }
    }
}

/// 부지 위치. 위도/경도가 모두 유효할 때만 존재한다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// 외부 기후 데이터. 해석하지 않고 그대로 보존한다.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climate_data: Option<Value>,
}

/// 검증을 마친 계산 요청. 모든 필드가 항상 유효한 값을 가진다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationInput {
    /// 랙당 전력 [kW]
    pub kw_per_rack: f64,
    pub cooling_type: CoolingType,
    pub total_racks: u32,
    pub redundancy_mode: RedundancyMode,
    pub include_generator: bool,
    /// 배터리 유지 시간 [분]
    pub battery_runtime: f64,
    pub sustainability_options: SustainabilityOptions,
    pub location: Option<Location>,
}

impl Default for CalculationInput {
    fn default() -> Self {
        Self {
            kw_per_rack: 75.0,
            cooling_type: CoolingType::Air,
            total_racks: 28,
            redundancy_mode: RedundancyMode::NPlusOne,
            include_generator: false,
            battery_runtime: 10.0,
            sustainability_options: SustainabilityOptions::default(),
            location: None,
        }
    }
}

impl CalculationInput {
    /// 총 IT 부하 [kW] = 랙당 kW × 랙 수
    pub fn total_it_load(&self) -> f64 {
        self.kw_per_rack * f64::from(self.total_racks)
    }
}
