//! 계산 계수(엔지니어링/원가/배출 계수). 사용자 입력이 아닌 설정값이다.

use serde::{Deserialize, Serialize};

use super::input::{CoolingType, RedundancyMode};

/// 냉각 방식별 계수 테이블.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerCoolingType {
    pub air: f64,
    pub dlc: f64,
    pub hybrid: f64,
    pub immersion: f64,
}

impl PerCoolingType {
    pub fn get(&self, cooling_type: CoolingType) -> f64 {
        match cooling_type {
            CoolingType::Air => self.air,
            CoolingType::Dlc => self.dlc,
            CoolingType::Hybrid => self.hybrid,
            CoolingType::Immersion => self.immersion,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectricalParams {
    /// √3 × 선간전압 [V]
    pub voltage_factor: f64,
    pub power_factor: f64,
    pub busbars_per_row: f64,
    pub racks_per_row: f64,
    pub redundancy_mode: RedundancyMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingParams {
    /// 냉각수 공급/환수 온도차 [°C]
    pub delta_t: f64,
    /// 유량 환산 계수 [L/min per kW·K]
    pub flow_rate_factor: f64,
    /// DLC 적용 시 공랭으로 남는 잔열 비율
    pub dlc_residual_heat_fraction: f64,
    /// 하이브리드에서 액체로 처리하는 열 비율
    pub hybrid_dlc_fraction: f64,
    /// 냉각 설비 소비전력 / 열부하
    pub chiller_efficiency_factor: f64,
    /// RDHX 1대 용량 [kW]
    pub rdhx_unit_capacity: f64,
    /// 액침 탱크 1기 용량 [kW]
    pub immersion_tank_capacity: f64,
    /// 탱크당 절연유 [L]
    pub immersion_fluid_per_tank: f64,
    pub pue: PerCoolingType,
    /// 공랭 대비 물 사용 비율
    pub water_factor: PerCoolingType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerParams {
    /// UPS 모듈 용량 [kW]
    pub ups_module_size: f64,
    pub ups_frame_max_modules: f64,
    /// 권장 최소 배터리 유지 시간 [분]
    pub battery_runtime: f64,
    pub battery_efficiency: f64,
    /// 배터리 캐비닛 1대 용량 [kWh]
    pub battery_cabinet_capacity: f64,
    pub e_house_base_sqm: f64,
    /// 배터리 캐비닛당 추가 면적 [m²]
    pub e_house_battery_sqm: f64,
    /// 발전기 1대 용량 [kW]
    pub generator_unit_size: f64,
    pub generator_sizing_factor: f64,
    /// 연료 소비 [L/kWh]
    pub generator_fuel_per_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostFactors {
    pub installation_percentage: f64,
    pub engineering_percentage: f64,
    pub contingency_percentage: f64,
    pub busbar_unit_cost: f64,
    pub tap_off_box_unit_cost: f64,
    pub rpdu_unit_cost: f64,
    pub ups_cost_per_kw: f64,
    pub battery_cost_per_kwh: f64,
    pub generator_cost_per_kw: f64,
    pub liquid_piping_cost_per_kw: f64,
    pub e_house_cost_per_sqm: f64,
    pub rack_infrastructure_cost: f64,
    pub waste_heat_recovery_cost_per_kw: f64,
    pub water_recycling_cost_per_kw: f64,
    /// TCO용 단위 CAPEX [per kW]
    pub capex_per_kw: f64,
    /// TCO용 단위 OPEX [per kWh]
    pub opex_per_kw_hour: f64,
    /// 냉각 방식별 설치 용량 단가 [per kW]
    pub cooling_cost_per_kw: PerCoolingType,
}

/// 랙 밀도 구간 [kW/rack].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoolingThresholds {
    pub air_cooled_max: f64,
    pub recommended_dlc_min: f64,
    pub recommended_immersion_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SustainabilityParams {
    /// 계통 전력 배출계수 [kgCO₂/kWh]
    pub co2_per_kwh: f64,
    /// 공랭 기준 물 사용량 [m³/MWh]
    pub water_usage_per_mwh: f64,
    /// 경유 배출계수 [kgCO₂/L]
    pub generator_co2_per_liter: f64,
    pub generator_test_hours_per_year: f64,
    pub waste_heat_recovery_fraction: f64,
    pub water_recycling_reduction: f64,
    pub waste_heat_pue_credit: f64,
    pub water_recycling_pue_credit: f64,
    pub pue_floor: f64,
}

/// 전체 계산 계수 집합.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationParams {
    pub electrical: ElectricalParams,
    pub cooling: CoolingParams,
    pub power: PowerParams,
    pub cost_factors: CostFactors,
    pub cooling_thresholds: CoolingThresholds,
    pub sustainability: SustainabilityParams,
}

impl Default for ElectricalParams {
    fn default() -> Self {
        Self {
            voltage_factor: 718.8,
            power_factor: 0.95,
            busbars_per_row: 2.0,
            racks_per_row: 14.0,
            redundancy_mode: RedundancyMode::NPlusOne,
        }
    }
}

impl Default for CoolingParams {
    fn default() -> Self {
        Self {
            delta_t: 10.0,
            flow_rate_factor: 14.33,
            dlc_residual_heat_fraction: 0.25,
            hybrid_dlc_fraction: 0.7,
            chiller_efficiency_factor: 0.28,
            rdhx_unit_capacity: 50.0,
            immersion_tank_capacity: 100.0,
            immersion_fluid_per_tank: 2000.0,
            pue: PerCoolingType {
                air: 1.6,
                dlc: 1.2,
                hybrid: 1.3,
                immersion: 1.1,
            },
            water_factor: PerCoolingType {
                air: 1.0,
                dlc: 0.25,
                hybrid: 0.5,
                immersion: 0.1,
            },
        }
    }
}

impl Default for PowerParams {
    fn default() -> Self {
        Self {
            ups_module_size: 250.0,
            ups_frame_max_modules: 6.0,
            battery_runtime: 10.0,
            battery_efficiency: 0.95,
            battery_cabinet_capacity: 40.0,
            e_house_base_sqm: 120.0,
            e_house_battery_sqm: 2.5,
            generator_unit_size: 2000.0,
            generator_sizing_factor: 1.25,
            generator_fuel_per_kwh: 0.27,
        }
    }
}

impl Default for CostFactors {
    fn default() -> Self {
        Self {
            installation_percentage: 0.15,
            engineering_percentage: 0.10,
            contingency_percentage: 0.10,
            busbar_unit_cost: 25_000.0,
            tap_off_box_unit_cost: 1_500.0,
            rpdu_unit_cost: 2_200.0,
            ups_cost_per_kw: 280.0,
            battery_cost_per_kwh: 450.0,
            generator_cost_per_kw: 380.0,
            liquid_piping_cost_per_kw: 180.0,
            e_house_cost_per_sqm: 3_500.0,
            rack_infrastructure_cost: 6_000.0,
            waste_heat_recovery_cost_per_kw: 220.0,
            water_recycling_cost_per_kw: 90.0,
            capex_per_kw: 11_000.0,
            opex_per_kw_hour: 0.14,
            cooling_cost_per_kw: PerCoolingType {
                air: 900.0,
                dlc: 1_400.0,
                hybrid: 1_200.0,
                immersion: 1_800.0,
            },
        }
    }
}

impl Default for CoolingThresholds {
    fn default() -> Self {
        Self {
            air_cooled_max: 20.0,
            recommended_dlc_min: 40.0,
            recommended_immersion_min: 100.0,
        }
    }
}

impl Default for SustainabilityParams {
    fn default() -> Self {
        Self {
            co2_per_kwh: 0.4,
            water_usage_per_mwh: 1.8,
            generator_co2_per_liter: 2.68,
            generator_test_hours_per_year: 24.0,
            waste_heat_recovery_fraction: 0.3,
            water_recycling_reduction: 0.4,
            waste_heat_pue_credit: 0.1,
            water_recycling_pue_credit: 0.05,
            pue_floor: 1.03,
        }
    }
}

impl Default for CalculationParams {
    fn default() -> Self {
        Self {
            electrical: ElectricalParams::default(),
            cooling: CoolingParams::default(),
            power: PowerParams::default(),
            cost_factors: CostFactors::default(),
            cooling_thresholds: CoolingThresholds::default(),
            sustainability: SustainabilityParams::default(),
        }
    }
}
