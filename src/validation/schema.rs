//! 결과 섹션별 보정 스키마: 점 경로 → (기대 타입, 기본값 공식).
//!
//! 같은 테이블을 "아무것도 없는" 입력에 적용하면 전체 기본 결과가 되고, 손상된
//! 섹션에 적용하면 보정 결과가 된다. 기본값 공식은 [`Derivation`]만 호출한다.
//! 규칙은 순서대로 적용되며, 뒤 규칙은 앞서 확정된 형제 값을 읽을 수 있다.

use serde_json::{json, Map, Value};

use crate::diagnostics::DiagnosticSink;
use crate::engine::derive::Derivation;
use crate::model::CoolingType;
use crate::safe_access::{finite_or, get_nested, set_nested_property};

/// 지금까지 보정된 섹션 값을 받아 기본값을 계산하는 함수들.
pub type NumberFn = for<'a, 'b> fn(&Derivation<'a>, &'b Value) -> f64;
pub type TextFn = for<'a, 'b> fn(&Derivation<'a>, &'b Value) -> String;
pub type FlagFn = for<'a, 'b> fn(&Derivation<'a>, &'b Value) -> bool;

#[derive(Clone, Copy)]
pub enum FieldDefault {
    Number(NumberFn),
    Text(TextFn),
    Flag(FlagFn),
}

/// 말단 필드 하나의 보정 규칙.
#[derive(Clone, Copy)]
pub struct FieldRule {
    pub path: &'static str,
    pub default: FieldDefault,
    /// 문자열 필드의 허용값. `None`이면 모든 문자열 허용.
    pub allowed: Option<&'static [&'static str]>,
}

impl FieldRule {
    pub fn number(path: &'static str, f: NumberFn) -> Self {
        Self {
            path,
            default: FieldDefault::Number(f),
            allowed: None,
        }
    }

    pub fn text(path: &'static str, f: TextFn) -> Self {
        Self {
            path,
            default: FieldDefault::Text(f),
            allowed: None,
        }
    }

    pub fn flag(path: &'static str, f: FlagFn) -> Self {
        Self {
            path,
            default: FieldDefault::Flag(f),
            allowed: None,
        }
    }

    pub fn one_of(path: &'static str, allowed: &'static [&'static str], f: TextFn) -> Self {
        Self {
            path,
            default: FieldDefault::Text(f),
            allowed: Some(allowed),
        }
    }

    /// 제공된 값이 타입 검사를 통과하는지. 숫자는 유한해야 한다.
    pub fn accepts(&self, value: &Value) -> bool {
        match (&self.default, value) {
            (FieldDefault::Number(_), Value::Number(n)) => n.as_f64().is_some_and(f64::is_finite),
            (FieldDefault::Text(_), Value::String(s)) => self
                .allowed
                .map_or(true, |allowed| allowed.contains(&s.as_str())),
            (FieldDefault::Flag(_), Value::Bool(_)) => true,
            _ => false,
        }
    }

    pub fn default_value(&self, d: &Derivation<'_>, section: &Value) -> Value {
        match self.default {
            FieldDefault::Number(f) => json!(finite_or(f(d, section), 0.0)),
            FieldDefault::Text(f) => Value::String(f(d, section)),
            FieldDefault::Flag(f) => Value::Bool(f(d, section)),
        }
    }

    pub fn expected(&self) -> &'static str {
        match self.default {
            FieldDefault::Number(_) => "number",
            FieldDefault::Text(_) => "string",
            FieldDefault::Flag(_) => "bool",
        }
    }
}

/// 결과의 최상위 섹션.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Rack,
    Electrical,
    Cooling,
    Power,
    Cost,
    Reliability,
    Sustainability,
    CarbonFootprint,
    Tco,
}

impl Section {
    pub const ALL: [Section; 9] = [
        Section::Rack,
        Section::Electrical,
        Section::Cooling,
        Section::Power,
        Section::Cost,
        Section::Reliability,
        Section::Sustainability,
        Section::CarbonFootprint,
        Section::Tco,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Section::Rack => "rack",
            Section::Electrical => "electrical",
            Section::Cooling => "cooling",
            Section::Power => "power",
            Section::Cost => "cost",
            Section::Reliability => "reliability",
            Section::Sustainability => "sustainability",
            Section::CarbonFootprint => "carbonFootprint",
            Section::Tco => "tco",
        }
    }
}

/// 이미 확정된 형제 숫자 값을 읽는다.
fn sibling(section: &Value, path: &str) -> f64 {
    get_nested(section, path)
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn rack_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("totalRacks", |d, _| d.total_racks()),
        FieldRule::number("kwPerRack", |d, _| d.kw_per_rack()),
        FieldRule::number("totalITLoad", |d, _| d.total_it_load()),
        FieldRule::number("racksPerRow", |d, _| d.racks_per_row()),
        FieldRule::number("rows", |d, _| d.rows()),
    ]
}

fn electrical_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("currentPerRack", |d, _| d.current_per_rack()),
        FieldRule::number("currentPerRow", |d, _| d.current_per_row()),
        FieldRule::number("busbarsRequired", |d, _| d.busbars_required()),
        FieldRule::text("busbarSize", |d, _| d.busbar_size().to_string()),
        FieldRule::text("tapOffBox", |d, _| d.tap_off_box().to_string()),
        FieldRule::text("rpdu", |d, _| d.rpdu().to_string()),
        FieldRule::number("feedsPerRack", |d, _| d.feeds_per_rack()),
    ]
}

fn cooling_type_rule() -> FieldRule {
    FieldRule::one_of("type", CoolingType::TAGS, |d, _| {
        d.cooling_type().as_str().to_string()
    })
}

/// 냉각 섹션 규칙. 공통 필드 뒤에 냉각 방식별 필수 필드가 붙는다.
fn cooling_rules(cooling_type: CoolingType) -> Vec<FieldRule> {
    let mut rules = vec![
        cooling_type_rule(),
        FieldRule::number("heatLoad", |d, _| d.heat_load()),
        FieldRule::number("installedCapacity", |d, _| d.installed_cooling_capacity()),
        FieldRule::number("coolingPower", |d, _| d.cooling_power()),
    ];
    match cooling_type {
        CoolingType::Air => rules.extend([
            FieldRule::number("rdhxUnits", |d, _| d.rdhx_units(CoolingType::Air)),
            FieldRule::text("rdhxModel", |d, _| d.rdhx_model().to_string()),
            FieldRule::text("pipingSize", |_, _| "none".to_string()),
        ]),
        CoolingType::Dlc => rules.extend([
            FieldRule::number("dlcCoolingCapacity", |d, _| {
                d.dlc_cooling_capacity(CoolingType::Dlc)
            }),
            FieldRule::number("residualCoolingCapacity", |d, _| {
                d.residual_cooling_capacity(CoolingType::Dlc)
            }),
            FieldRule::number("dlcFlowRate", |d, _| d.liquid_flow_rate(CoolingType::Dlc)),
            FieldRule::text("pipingSize", |d, _| {
                d.liquid_piping_size(CoolingType::Dlc).to_string()
            }),
        ]),
        CoolingType::Hybrid => rules.extend([
            FieldRule::number("dlcCoolingCapacity", |d, _| {
                d.dlc_cooling_capacity(CoolingType::Hybrid)
            }),
            FieldRule::number("residualCoolingCapacity", |d, _| {
                d.residual_cooling_capacity(CoolingType::Hybrid)
            }),
            FieldRule::number("dlcFlowRate", |d, _| d.liquid_flow_rate(CoolingType::Hybrid)),
            FieldRule::text("pipingSize", |d, _| {
                d.liquid_piping_size(CoolingType::Hybrid).to_string()
            }),
            FieldRule::number("rdhxUnits", |d, _| d.rdhx_units(CoolingType::Hybrid)),
            FieldRule::text("rdhxModel", |d, _| d.rdhx_model().to_string()),
        ]),
        CoolingType::Immersion => rules.extend([
            FieldRule::number("immersionTanks", |d, _| d.immersion_tanks()),
            FieldRule::number("fluidVolume", |d, _| d.immersion_fluid_volume()),
            FieldRule::number("coolantFlowRate", |d, _| {
                d.liquid_flow_rate(CoolingType::Immersion)
            }),
            FieldRule::text("pipingSize", |d, _| {
                d.liquid_piping_size(CoolingType::Immersion).to_string()
            }),
        ]),
    }
    rules
}

fn power_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("ups.totalCapacity", |d, _| d.ups_total_capacity()),
        FieldRule::number("ups.moduleSize", |d, _| d.ups_module_size()),
        FieldRule::number("ups.modulesRequired", |d, _| d.ups_modules_required()),
        FieldRule::number("ups.redundantModules", |d, _| d.ups_redundant_modules()),
        FieldRule::number("ups.totalModules", |d, _| d.ups_total_modules()),
        FieldRule::number("ups.framesRequired", |d, _| d.ups_frames_required()),
        FieldRule::number("battery.runtime", |d, _| d.battery_runtime()),
        FieldRule::number("battery.energyRequired", |d, _| d.battery_energy_required()),
        FieldRule::number("battery.cabinets", |d, _| d.battery_cabinets()),
        FieldRule::flag("generator.included", |d, _| d.generator_included()),
        FieldRule::number("generator.capacity", |d, _| d.generator_capacity()),
        FieldRule::number("generator.units", |d, _| d.generator_units()),
        FieldRule::number("generator.fuelConsumption", |d, _| {
            d.generator_fuel_consumption()
        }),
        FieldRule::number("eHouseArea", |d, _| d.e_house_area()),
    ]
}

/// 원가 규칙. 하위 합계 → 장비 합계 → 비율 항목 → 총 사업비 → 단위 원가 순서.
fn cost_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("electrical.busbar", |d, _| d.busbar_cost()),
        FieldRule::number("electrical.tapOffBox", |d, _| d.tap_off_box_cost()),
        FieldRule::number("electrical.rpdu", |d, _| d.rpdu_cost()),
        FieldRule::number("electrical.total", |_, s| {
            sibling(s, "electrical.busbar")
                + sibling(s, "electrical.tapOffBox")
                + sibling(s, "electrical.rpdu")
        }),
        FieldRule::number("power.ups", |d, _| d.ups_cost()),
        FieldRule::number("power.battery", |d, _| d.battery_cost()),
        FieldRule::number("power.generator", |d, _| d.generator_cost()),
        FieldRule::number("power.total", |_, s| {
            sibling(s, "power.ups") + sibling(s, "power.battery") + sibling(s, "power.generator")
        }),
        FieldRule::number("cooling", |d, _| d.cooling_cost()),
        FieldRule::number("infrastructure", |d, _| d.infrastructure_cost()),
        FieldRule::number("sustainability", |d, _| d.sustainability_cost()),
        FieldRule::number("equipmentTotal", |_, s| {
            sibling(s, "electrical.total")
                + sibling(s, "power.total")
                + sibling(s, "cooling")
                + sibling(s, "infrastructure")
                + sibling(s, "sustainability")
        }),
        FieldRule::number("installation", |d, s| {
            sibling(s, "equipmentTotal") * d.installation_percentage()
        }),
        FieldRule::number("engineering", |d, s| {
            sibling(s, "equipmentTotal") * d.engineering_percentage()
        }),
        FieldRule::number("contingency", |d, s| {
            sibling(s, "equipmentTotal") * d.contingency_percentage()
        }),
        FieldRule::number("totalProjectCost", |_, s| {
            sibling(s, "equipmentTotal")
                + sibling(s, "installation")
                + sibling(s, "engineering")
                + sibling(s, "contingency")
        }),
        FieldRule::number("costPerRack", |d, s| d.per_rack(sibling(s, "totalProjectCost"))),
        FieldRule::number("costPerKw", |d, s| d.per_kw(sibling(s, "totalProjectCost"))),
    ]
}

fn reliability_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::text("tier", |d, _| d.reliability_profile().tier.to_string()),
        FieldRule::text("availability", |d, _| {
            d.reliability_profile().availability.to_string()
        }),
        FieldRule::number("annualDowntime", |d, _| {
            d.reliability_profile().annual_downtime
        }),
        FieldRule::text("redundancyMode", |d, _| d.redundancy_mode().as_str().to_string()),
    ]
}

fn sustainability_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("pue", |d, _| d.pue()),
        FieldRule::number("wue", |d, _| d.wue()),
        FieldRule::number("annualEnergyConsumption", |d, s| {
            d.annual_it_energy() * sibling(s, "pue")
        }),
        FieldRule::number("annualWaterUsage", |d, s| {
            d.annual_it_energy() * sibling(s, "wue")
        }),
        FieldRule::number("wasteHeatRecovered", |d, _| d.waste_heat_recovered()),
        FieldRule::number("renewableEnergyPercentage", |d, _| {
            d.renewable_energy_percentage()
        }),
    ]
}

fn carbon_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("gridEmissions", |d, _| d.grid_emissions()),
        FieldRule::number("generatorEmissions", |d, _| d.generator_emissions()),
        FieldRule::number("totalEmissions", |_, s| {
            sibling(s, "gridEmissions") + sibling(s, "generatorEmissions")
        }),
        FieldRule::number("renewableOffset", |d, _| d.renewable_offset()),
    ]
}

fn tco_rules() -> Vec<FieldRule> {
    vec![
        FieldRule::number("capex", |d, _| d.capex()),
        FieldRule::number("opex", |d, _| d.annual_opex()),
        FieldRule::number("total5Year", |_, s| {
            sibling(s, "capex") + sibling(s, "opex") * 5.0
        }),
        FieldRule::number("total10Year", |_, s| {
            sibling(s, "capex") + sibling(s, "opex") * 10.0
        }),
    ]
}

/// 냉각 분기를 고른다. 제공된 `type`이 유효하면 그것을, 아니면 입력값을 쓴다.
pub fn resolve_cooling_type(source: Option<&Value>, d: &Derivation<'_>) -> CoolingType {
    source
        .and_then(|s| s.get("type"))
        .and_then(Value::as_str)
        .and_then(CoolingType::parse)
        .unwrap_or_else(|| d.cooling_type())
}

/// 섹션의 규칙 목록.
pub fn section_rules(section: Section, source: Option<&Value>, d: &Derivation<'_>) -> Vec<FieldRule> {
    match section {
        Section::Rack => rack_rules(),
        Section::Electrical => electrical_rules(),
        Section::Cooling => cooling_rules(resolve_cooling_type(source, d)),
        Section::Power => power_rules(),
        Section::Cost => cost_rules(),
        Section::Reliability => reliability_rules(),
        Section::Sustainability => sustainability_rules(),
        Section::CarbonFootprint => carbon_rules(),
        Section::Tco => tco_rules(),
    }
}

/// 규칙을 순서대로 적용해 섹션 값을 만든다.
///
/// `source`가 `None`이면 모든 필드를 기본값으로 채우고 이벤트를 내지 않는다.
/// `source`가 있으면 타입이 맞는 값은 그대로 두고, 나머지는 기본값으로 바꾸며
/// 경고 이벤트를 낸다.
pub fn apply_rules(
    section_key: &'static str,
    rules: &[FieldRule],
    source: Option<&Value>,
    d: &Derivation<'_>,
    sink: &dyn DiagnosticSink,
) -> Value {
    let mut out = Value::Object(Map::new());
    for rule in rules {
        let supplied = source.and_then(|s| get_nested(s, rule.path));
        let value = match supplied {
            Some(v) if rule.accepts(v) => v.clone(),
            _ => {
                let default = rule.default_value(d, &out);
                if source.is_some() {
                    sink.warn(
                        super::result::SOURCE,
                        format!(
                            "{section_key}.{} 값이 {} 타입이 아니므로 기본값으로 대체합니다",
                            rule.path,
                            rule.expected()
                        ),
                        json!({
                            "field": format!("{section_key}.{}", rule.path),
                            "provided": supplied.cloned().unwrap_or(Value::Null),
                            "default": default.clone(),
                        }),
                    );
                }
                default
            }
        };
        set_nested_property(&mut out, rule.path, value);
    }
    out
}

/// 섹션 하나를 보정(또는 생성)한 JSON 값.
pub fn repair_section_value(
    section: Section,
    source: Option<&Value>,
    d: &Derivation<'_>,
    sink: &dyn DiagnosticSink,
) -> Value {
    let rules = section_rules(section, source, d);
    apply_rules(section.key(), &rules, source, d, sink)
}
