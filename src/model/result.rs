//! 계산 결과 스키마. 각 섹션은 입력만으로 독립적으로 재구성할 수 있다.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RackSection {
    pub total_racks: f64,
    pub kw_per_rack: f64,
    /// 총 IT 부하 [kW]
    #[serde(rename = "totalITLoad")]
    pub total_it_load: f64,
    pub racks_per_row: f64,
    pub rows: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricalSection {
    /// 랙당 전류 [A]
    pub current_per_rack: f64,
    /// 열(row)당 전류 [A]
    pub current_per_row: f64,
    pub busbars_required: f64,
    pub busbar_size: String,
    pub tap_off_box: String,
    pub rpdu: String,
    pub feeds_per_rack: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AirCooling {
    pub heat_load: f64,
    pub installed_capacity: f64,
    pub cooling_power: f64,
    pub rdhx_units: f64,
    pub rdhx_model: String,
    pub piping_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DlcCooling {
    pub heat_load: f64,
    pub installed_capacity: f64,
    pub cooling_power: f64,
    pub dlc_cooling_capacity: f64,
    pub residual_cooling_capacity: f64,
    /// 냉각수 유량 [L/min]
    pub dlc_flow_rate: f64,
    pub piping_size: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridCooling {
    pub heat_load: f64,
    pub installed_capacity: f64,
    pub cooling_power: f64,
    pub dlc_cooling_capacity: f64,
    pub residual_cooling_capacity: f64,
    pub dlc_flow_rate: f64,
    pub piping_size: String,
    pub rdhx_units: f64,
    pub rdhx_model: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImmersionCooling {
    pub heat_load: f64,
    pub installed_capacity: f64,
    pub cooling_power: f64,
    pub immersion_tanks: f64,
    /// 절연유 총량 [L]
    pub fluid_volume: f64,
    pub coolant_flow_rate: f64,
    pub piping_size: String,
}

/// 냉각 섹션. `type` 태그에 따라 필수 필드가 달라진다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CoolingSection {
    Air(AirCooling),
    Dlc(DlcCooling),
    Hybrid(HybridCooling),
    Immersion(ImmersionCooling),
}

impl Default for CoolingSection {
    fn default() -> Self {
        CoolingSection::Air(AirCooling::default())
    }
}

impl CoolingSection {
    pub fn type_tag(&self) -> &'static str {
        match self {
            CoolingSection::Air(_) => "air",
            CoolingSection::Dlc(_) => "dlc",
            CoolingSection::Hybrid(_) => "hybrid",
            CoolingSection::Immersion(_) => "immersion",
        }
    }

    pub fn heat_load(&self) -> f64 {
        match self {
            CoolingSection::Air(c) => c.heat_load,
            CoolingSection::Dlc(c) => c.heat_load,
            CoolingSection::Hybrid(c) => c.heat_load,
            CoolingSection::Immersion(c) => c.heat_load,
        }
    }

    pub fn installed_capacity(&self) -> f64 {
        match self {
            CoolingSection::Air(c) => c.installed_capacity,
            CoolingSection::Dlc(c) => c.installed_capacity,
            CoolingSection::Hybrid(c) => c.installed_capacity,
            CoolingSection::Immersion(c) => c.installed_capacity,
        }
    }

    pub fn piping_size(&self) -> &str {
        match self {
            CoolingSection::Air(c) => &c.piping_size,
            CoolingSection::Dlc(c) => &c.piping_size,
            CoolingSection::Hybrid(c) => &c.piping_size,
            CoolingSection::Immersion(c) => &c.piping_size,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsSizing {
    pub total_capacity: f64,
    pub module_size: f64,
    pub modules_required: f64,
    pub redundant_modules: f64,
    pub total_modules: f64,
    pub frames_required: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySizing {
    /// [분]
    pub runtime: f64,
    /// [kWh]
    pub energy_required: f64,
    pub cabinets: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSizing {
    pub included: bool,
    pub capacity: f64,
    pub units: f64,
    /// [L/h]
    pub fuel_consumption: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerSection {
    pub ups: UpsSizing,
    pub battery: BatterySizing,
    pub generator: GeneratorSizing,
    /// 전기실(E-House) 면적 [m²]
    pub e_house_area: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricalCost {
    pub busbar: f64,
    pub tap_off_box: f64,
    pub rpdu: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerCost {
    pub ups: f64,
    pub battery: f64,
    pub generator: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSection {
    pub electrical: ElectricalCost,
    pub cooling: f64,
    pub power: PowerCost,
    pub infrastructure: f64,
    pub sustainability: f64,
    pub equipment_total: f64,
    pub installation: f64,
    pub engineering: f64,
    pub contingency: f64,
    pub total_project_cost: f64,
    pub cost_per_rack: f64,
    pub cost_per_kw: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilitySection {
    pub tier: String,
    pub availability: String,
    /// 연간 다운타임 [분/년]
    pub annual_downtime: f64,
    pub redundancy_mode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilitySection {
    pub pue: f64,
    /// [L/kWh]
    pub wue: f64,
    /// [MWh/년]
    pub annual_energy_consumption: f64,
    /// [m³/년]
    pub annual_water_usage: f64,
    /// [MWh/년]
    pub waste_heat_recovered: f64,
    pub renewable_energy_percentage: f64,
}

/// 연간 배출량 [tCO₂/년]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarbonFootprintSection {
    pub grid_emissions: f64,
    pub generator_emissions: f64,
    pub total_emissions: f64,
    pub renewable_offset: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TcoSection {
    pub capex: f64,
    /// 연간 운영비
    pub opex: f64,
    pub total_5_year: f64,
    pub total_10_year: f64,
}

/// 전체 계산 결과.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub rack: RackSection,
    pub electrical: ElectricalSection,
    pub cooling: CoolingSection,
    pub power: PowerSection,
    pub cost: CostSection,
    pub reliability: ReliabilitySection,
    pub sustainability: SustainabilitySection,
    pub carbon_footprint: CarbonFootprintSection,
    pub tco: TcoSection,
}
