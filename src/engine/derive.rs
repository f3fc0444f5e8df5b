//! 입력과 계수로부터 유도되는 모든 공식.
//!
//! 순방향 계산, 섹션별 결과 보정, 전체 기본값 생성이 모두 이 구조체를 거친다.
//! 공식을 다른 곳에 다시 쓰지 않는다.

use crate::model::{CalculationInput, CalculationParams, CoolingType, RedundancyMode};
use crate::safe_access::{finite_or, safe_divide};

/// 연간 운전 시간 [h]
pub const HOURS_PER_YEAR: f64 = 8760.0;

/// 이중화 방식별 신뢰도 등급 기본값.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReliabilityProfile {
    pub tier: &'static str,
    pub availability: &'static str,
    /// [분/년]
    pub annual_downtime: f64,
}

/// 0 나눗셈을 막은 올림 나눗셈. 개수 산정용.
pub fn ceil_div(numerator: f64, denominator: f64) -> f64 {
    safe_divide(numerator, denominator, 0.0).max(0.0).ceil()
}

/// 유량 [L/min]에 따른 주배관 규격.
pub fn piping_size_for_flow(flow_l_per_min: f64) -> &'static str {
    if flow_l_per_min.is_nan() || flow_l_per_min <= 0.0 {
        "none"
    } else if flow_l_per_min <= 300.0 {
        "DN80"
    } else if flow_l_per_min <= 600.0 {
        "DN100"
    } else if flow_l_per_min <= 1200.0 {
        "DN150"
    } else if flow_l_per_min <= 2400.0 {
        "DN200"
    } else {
        "DN250"
    }
}

/// 입력 한 건과 계수 집합에 대한 유도 공식 묶음.
#[derive(Debug, Clone, Copy)]
pub struct Derivation<'a> {
    pub input: &'a CalculationInput,
    pub params: &'a CalculationParams,
}

impl<'a> Derivation<'a> {
    pub fn new(input: &'a CalculationInput, params: &'a CalculationParams) -> Self {
        Self { input, params }
    }

    pub fn cooling_type(&self) -> CoolingType {
        self.input.cooling_type
    }

    pub fn redundancy_mode(&self) -> RedundancyMode {
        self.input.redundancy_mode
    }

    // ---- 랙 ----

    pub fn total_racks(&self) -> f64 {
        f64::from(self.input.total_racks)
    }

    pub fn kw_per_rack(&self) -> f64 {
        finite_or(self.input.kw_per_rack, 0.0)
    }

    /// 총 IT 부하 [kW]
    pub fn total_it_load(&self) -> f64 {
        finite_or(self.kw_per_rack() * self.total_racks(), 0.0)
    }

    pub fn racks_per_row(&self) -> f64 {
        self.params.electrical.racks_per_row
    }

    pub fn rows(&self) -> f64 {
        ceil_div(self.total_racks(), self.racks_per_row())
    }

    /// 한 열에 실제로 놓이는 랙 수.
    fn racks_in_row(&self) -> f64 {
        let per_row = self.racks_per_row();
        if per_row > 0.0 {
            per_row.min(self.total_racks())
        } else {
            self.total_racks()
        }
    }

    // ---- 전기 ----

    /// 3상 랙 전류 [A] = kW × 1000 / (√3·V × PF)
    pub fn current_per_rack(&self) -> f64 {
        let e = &self.params.electrical;
        safe_divide(
            self.kw_per_rack() * 1000.0,
            e.voltage_factor * e.power_factor,
            0.0,
        )
    }

    pub fn current_per_row(&self) -> f64 {
        self.current_per_rack() * self.racks_in_row()
    }

    pub fn busbars_required(&self) -> f64 {
        self.rows() * self.params.electrical.busbars_per_row
    }

    pub fn busbar_size(&self) -> &'static str {
        let amps = self.current_per_row();
        if amps <= 800.0 {
            "800A"
        } else if amps <= 1250.0 {
            "1250A"
        } else if amps <= 1600.0 {
            "1600A"
        } else {
            "2500A"
        }
    }

    pub fn tap_off_box(&self) -> &'static str {
        let amps = self.current_per_rack();
        if amps <= 63.0 {
            "63A"
        } else if amps <= 100.0 {
            "100A"
        } else {
            "160A"
        }
    }

    pub fn rpdu(&self) -> &'static str {
        if self.current_per_rack() <= 32.0 {
            "32A 3-Phase"
        } else {
            "63A 3-Phase"
        }
    }

    pub fn feeds_per_rack(&self) -> f64 {
        if self.redundancy_mode().is_dual_path() {
            2.0
        } else {
            1.0
        }
    }

    // ---- 냉각 ----

    /// 이중화 방식에 따른 설치 용량 배수.
    pub fn capacity_multiplier(&self) -> f64 {
        match self.redundancy_mode() {
            RedundancyMode::N => 1.0,
            RedundancyMode::NPlusOne => 1.2,
            RedundancyMode::TwoN => 2.0,
            RedundancyMode::TwoNPlusOne => 2.2,
        }
    }

    pub fn heat_load(&self) -> f64 {
        self.total_it_load()
    }

    pub fn installed_cooling_capacity(&self) -> f64 {
        self.heat_load() * self.capacity_multiplier()
    }

    pub fn cooling_power(&self) -> f64 {
        self.heat_load() * self.params.cooling.chiller_efficiency_factor
    }

    /// 액체로 처리하는 열 비율.
    pub fn liquid_fraction(&self, cooling_type: CoolingType) -> f64 {
        let c = &self.params.cooling;
        match cooling_type {
            CoolingType::Air => 0.0,
            CoolingType::Dlc => 1.0 - c.dlc_residual_heat_fraction,
            CoolingType::Hybrid => c.hybrid_dlc_fraction,
            CoolingType::Immersion => 1.0,
        }
    }

    pub fn dlc_cooling_capacity(&self, cooling_type: CoolingType) -> f64 {
        self.heat_load() * self.liquid_fraction(cooling_type)
    }

    pub fn residual_cooling_capacity(&self, cooling_type: CoolingType) -> f64 {
        self.heat_load() - self.dlc_cooling_capacity(cooling_type)
    }

    /// 냉각수 유량 [L/min] = kW × 계수 / ΔT
    pub fn coolant_flow_rate(&self, capacity_kw: f64) -> f64 {
        let c = &self.params.cooling;
        safe_divide(capacity_kw * c.flow_rate_factor, c.delta_t, 0.0)
    }

    pub fn liquid_flow_rate(&self, cooling_type: CoolingType) -> f64 {
        self.coolant_flow_rate(self.dlc_cooling_capacity(cooling_type))
    }

    pub fn liquid_piping_size(&self, cooling_type: CoolingType) -> &'static str {
        piping_size_for_flow(self.liquid_flow_rate(cooling_type))
    }

    /// 공랭으로 처리해야 하는 열량 기준 RDHX 대수.
    pub fn rdhx_units(&self, cooling_type: CoolingType) -> f64 {
        ceil_div(
            self.residual_cooling_capacity(cooling_type),
            self.params.cooling.rdhx_unit_capacity,
        )
    }

    pub fn rdhx_model(&self) -> &'static str {
        let t = &self.params.cooling_thresholds;
        let kw = self.kw_per_rack();
        if kw <= t.air_cooled_max {
            "Standard"
        } else if kw <= t.recommended_dlc_min {
            "High Density"
        } else {
            "Ultra High Density"
        }
    }

    pub fn immersion_tanks(&self) -> f64 {
        ceil_div(self.heat_load(), self.params.cooling.immersion_tank_capacity)
    }

    /// 절연유 총량 [L]
    pub fn immersion_fluid_volume(&self) -> f64 {
        self.immersion_tanks() * self.params.cooling.immersion_fluid_per_tank
    }

    // ---- 전력 ----

    pub fn ups_module_size(&self) -> f64 {
        self.params.power.ups_module_size
    }

    pub fn ups_modules_required(&self) -> f64 {
        ceil_div(self.total_it_load(), self.ups_module_size())
    }

    pub fn ups_redundant_modules(&self) -> f64 {
        let required = self.ups_modules_required();
        match self.redundancy_mode() {
            RedundancyMode::N => 0.0,
            RedundancyMode::NPlusOne => 1.0,
            RedundancyMode::TwoN => required,
            RedundancyMode::TwoNPlusOne => required + 1.0,
        }
    }

    pub fn ups_total_modules(&self) -> f64 {
        self.ups_modules_required() + self.ups_redundant_modules()
    }

    pub fn ups_frames_required(&self) -> f64 {
        ceil_div(
            self.ups_total_modules(),
            self.params.power.ups_frame_max_modules,
        )
    }

    pub fn ups_total_capacity(&self) -> f64 {
        self.ups_total_modules() * self.ups_module_size()
    }

    pub fn battery_runtime(&self) -> f64 {
        finite_or(self.input.battery_runtime, 0.0)
    }

    /// 배터리 필요 에너지 [kWh]
    pub fn battery_energy_required(&self) -> f64 {
        let raw = self.total_it_load() * self.battery_runtime() / 60.0;
        safe_divide(raw, self.params.power.battery_efficiency, raw)
    }

    pub fn battery_cabinets(&self) -> f64 {
        ceil_div(
            self.battery_energy_required(),
            self.params.power.battery_cabinet_capacity,
        )
    }

    pub fn generator_included(&self) -> bool {
        self.input.include_generator
    }

    pub fn generator_capacity(&self) -> f64 {
        if !self.generator_included() {
            return 0.0;
        }
        self.total_it_load() * self.params.power.generator_sizing_factor
    }

    pub fn generator_units(&self) -> f64 {
        if !self.generator_included() {
            return 0.0;
        }
        let spare = if self.redundancy_mode() == RedundancyMode::N {
            0.0
        } else {
            1.0
        };
        ceil_div(
            self.generator_capacity(),
            self.params.power.generator_unit_size,
        ) + spare
    }

    /// 발전기 정격 연료 소비 [L/h]
    pub fn generator_fuel_consumption(&self) -> f64 {
        self.generator_capacity() * self.params.power.generator_fuel_per_kwh
    }

    pub fn e_house_area(&self) -> f64 {
        let p = &self.params.power;
        p.e_house_base_sqm + p.e_house_battery_sqm * self.battery_cabinets()
    }

    // ---- 원가 ----

    pub fn busbar_cost(&self) -> f64 {
        self.busbars_required() * self.params.cost_factors.busbar_unit_cost
    }

    pub fn tap_off_box_cost(&self) -> f64 {
        self.total_racks() * self.feeds_per_rack() * self.params.cost_factors.tap_off_box_unit_cost
    }

    pub fn rpdu_cost(&self) -> f64 {
        self.total_racks() * self.feeds_per_rack() * self.params.cost_factors.rpdu_unit_cost
    }

    pub fn cooling_cost(&self) -> f64 {
        let cf = &self.params.cost_factors;
        let cooling_type = self.cooling_type();
        let equipment = self.installed_cooling_capacity() * cf.cooling_cost_per_kw.get(cooling_type);
        let piping = if cooling_type == CoolingType::Air {
            0.0
        } else {
            self.heat_load() * cf.liquid_piping_cost_per_kw
        };
        equipment + piping
    }

    pub fn ups_cost(&self) -> f64 {
        self.ups_total_capacity() * self.params.cost_factors.ups_cost_per_kw
    }

    pub fn battery_cost(&self) -> f64 {
        self.battery_energy_required() * self.params.cost_factors.battery_cost_per_kwh
    }

    pub fn generator_cost(&self) -> f64 {
        self.generator_capacity() * self.params.cost_factors.generator_cost_per_kw
    }

    pub fn infrastructure_cost(&self) -> f64 {
        let cf = &self.params.cost_factors;
        self.e_house_area() * cf.e_house_cost_per_sqm
            + self.total_racks() * cf.rack_infrastructure_cost
    }

    pub fn sustainability_cost(&self) -> f64 {
        let cf = &self.params.cost_factors;
        let opts = &self.input.sustainability_options;
        let mut cost = 0.0;
        if opts.enable_waste_heat_recovery {
            cost += self.total_it_load() * cf.waste_heat_recovery_cost_per_kw;
        }
        if opts.enable_water_recycling {
            cost += self.total_it_load() * cf.water_recycling_cost_per_kw;
        }
        cost
    }

    pub fn installation_percentage(&self) -> f64 {
        self.params.cost_factors.installation_percentage
    }

    pub fn engineering_percentage(&self) -> f64 {
        self.params.cost_factors.engineering_percentage
    }

    pub fn contingency_percentage(&self) -> f64 {
        self.params.cost_factors.contingency_percentage
    }

    /// 총 사업비를 랙 수로 나눈다. 랙이 0이면 0.
    pub fn per_rack(&self, total: f64) -> f64 {
        safe_divide(total, self.total_racks(), 0.0)
    }

    /// 총 사업비를 IT 부하로 나눈다. 부하가 0이면 0.
    pub fn per_kw(&self, total: f64) -> f64 {
        safe_divide(total, self.total_it_load(), 0.0)
    }

    // ---- 신뢰도 ----

    pub fn reliability_profile(&self) -> ReliabilityProfile {
        match self.redundancy_mode() {
            RedundancyMode::TwoN => ReliabilityProfile {
                tier: "Tier IV",
                availability: "99.999%",
                annual_downtime: 5.3,
            },
            RedundancyMode::NPlusOne => ReliabilityProfile {
                tier: "Tier III",
                availability: "99.99%",
                annual_downtime: 52.6,
            },
            _ => ReliabilityProfile {
                tier: "Tier II",
                availability: "99.9%",
                annual_downtime: 526.0,
            },
        }
    }

    // ---- 지속가능성 ----

    /// 냉각 방식 기준 PUE에서 옵션별 감면을 뺀 값. 하한은 `pueFloor`.
    pub fn pue(&self) -> f64 {
        let s = &self.params.sustainability;
        let opts = &self.input.sustainability_options;
        let mut pue = self.params.cooling.pue.get(self.cooling_type());
        if opts.enable_waste_heat_recovery {
            pue -= s.waste_heat_pue_credit;
        }
        if opts.enable_water_recycling {
            pue -= s.water_recycling_pue_credit;
        }
        pue.max(s.pue_floor)
    }

    /// [L/kWh]
    pub fn wue(&self) -> f64 {
        let s = &self.params.sustainability;
        let base = s.water_usage_per_mwh * self.params.cooling.water_factor.get(self.cooling_type());
        if self.input.sustainability_options.enable_water_recycling {
            base * (1.0 - s.water_recycling_reduction)
        } else {
            base
        }
    }

    /// 연간 IT 에너지 [MWh]
    pub fn annual_it_energy(&self) -> f64 {
        self.total_it_load() * HOURS_PER_YEAR / 1000.0
    }

    /// 연간 시설 에너지 [MWh]
    pub fn annual_energy_consumption(&self) -> f64 {
        self.annual_it_energy() * self.pue()
    }

    /// [m³/년]
    pub fn annual_water_usage(&self) -> f64 {
        self.wue() * self.annual_it_energy()
    }

    /// [MWh/년]
    pub fn waste_heat_recovered(&self) -> f64 {
        if self.input.sustainability_options.enable_waste_heat_recovery {
            self.annual_it_energy() * self.params.sustainability.waste_heat_recovery_fraction
        } else {
            0.0
        }
    }

    pub fn renewable_energy_percentage(&self) -> f64 {
        finite_or(
            self.input.sustainability_options.renewable_energy_percentage,
            0.0,
        )
    }

    // ---- 탄소 배출 ----

    /// 계통 전력 배출량 [tCO₂/년]. MWh × kg/kWh = t.
    pub fn grid_emissions(&self) -> f64 {
        self.annual_energy_consumption()
            * self.params.sustainability.co2_per_kwh
            * (1.0 - self.renewable_energy_percentage() / 100.0)
    }

    pub fn renewable_offset(&self) -> f64 {
        self.annual_energy_consumption()
            * self.params.sustainability.co2_per_kwh
            * (self.renewable_energy_percentage() / 100.0)
    }

    /// 발전기 시험 운전 배출량 [tCO₂/년]
    pub fn generator_emissions(&self) -> f64 {
        if !self.generator_included() {
            return 0.0;
        }
        let s = &self.params.sustainability;
        self.generator_fuel_consumption() * s.generator_test_hours_per_year * s.generator_co2_per_liter
            / 1000.0
    }

    // ---- TCO ----

    pub fn capex(&self) -> f64 {
        self.total_it_load() * self.params.cost_factors.capex_per_kw
    }

    /// 연간 OPEX
    pub fn annual_opex(&self) -> f64 {
        self.total_it_load() * HOURS_PER_YEAR * self.params.cost_factors.opex_per_kw_hour
    }
}
