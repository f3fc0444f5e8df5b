use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use crate::app::AppError;
use crate::config::{Config, OutputFormat, DEFAULT_CONFIG_PATH};
use crate::diagnostics::{DiagnosticEvent, DiagnosticLevel};
use crate::model::{CalculationResult, CoolingSection, CoolingType, RedundancyMode};

#[derive(Debug, Parser)]
#[command(name = "dc_matrix_calculator")]
#[command(about = "데이터센터 설계 매트릭스 계산기 (전기/냉각/전력/원가/지속가능성)")]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// 설계 입력으로 전체 결과를 계산한다 (입력 파일이 없으면 대화형으로 묻는다)
    Calc {
        /// 입력 JSON 파일
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 출력 형식 (설정 파일 값을 덮어씀)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 저장된 결과를 입력 기준으로 검증하고 빠진 필드를 복구한다
    Repair {
        /// 입력 JSON 파일
        #[arg(short, long)]
        input: PathBuf,

        /// 결과 JSON 파일
        #[arg(short, long)]
        result: PathBuf,

        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 적용 중인 계산 계수를 출력한다
    Params {
        /// 계수 범위/타입 검사만 수행
        #[arg(long)]
        check: bool,
    },

    /// 랙 밀도에 맞는 냉각 방식을 추천한다
    Recommend {
        /// 랙당 전력 [kW]
        kw_per_rack: f64,
    },
}

/// 대화형으로 설계 입력을 받아 원시 JSON으로 돌려준다. 검증은 호출자가 한다.
pub fn prompt_input(cfg: &Config) -> Result<Value, AppError> {
    println!("\n-- 설계 입력 --");
    let kw_per_rack = read_f64("랙당 전력 [kW]: ")?;
    let total_racks = read_f64("랙 수: ")?;
    println!("냉각 방식: 1=공랭(air) 2=DLC 3=하이브리드 4=액침");
    let cooling = match read_line("선택: ")?.trim() {
        "2" => CoolingType::Dlc,
        "3" => CoolingType::Hybrid,
        "4" => CoolingType::Immersion,
        _ => CoolingType::Air,
    };
    let baseline = cfg.params.electrical.redundancy_mode;
    println!(
        "이중화: 1=N 2=N+1 3=2N 4=2N+1 (엔터 = {})",
        baseline.as_str()
    );
    let redundancy = match read_line("선택: ")?.trim() {
        "1" => RedundancyMode::N,
        "2" => RedundancyMode::NPlusOne,
        "3" => RedundancyMode::TwoN,
        "4" => RedundancyMode::TwoNPlusOne,
        _ => baseline,
    };
    let include_generator = read_yes_no("발전기 포함? (y/N): ")?;
    let battery_runtime = read_f64_or(
        "배터리 유지 시간 [분] (엔터 = 권장값): ",
        cfg.params.power.battery_runtime,
    )?;
    let waste_heat = read_yes_no("폐열 회수? (y/N): ")?;
    let water_recycling = read_yes_no("용수 재활용? (y/N): ")?;
    let renewable = read_f64_or("재생에너지 비율 [%] (엔터 = 20): ", 20.0)?;

    Ok(json!({
        "kwPerRack": kw_per_rack,
        "coolingType": cooling.as_str(),
        "totalRacks": total_racks,
        "redundancyMode": redundancy.as_str(),
        "includeGenerator": include_generator,
        "batteryRuntime": battery_runtime,
        "sustainabilityOptions": {
            "enableWasteHeatRecovery": waste_heat,
            "enableWaterRecycling": water_recycling,
            "renewableEnergyPercentage": renewable,
        },
    }))
}

/// 결과를 요청한 형식으로 출력한다.
pub fn print_result(
    result: &CalculationResult,
    warnings: &[String],
    format: OutputFormat,
) -> Result<(), AppError> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
            for w in warnings {
                eprintln!("주의: {w}");
            }
        }
        OutputFormat::Text => print_summary(result, warnings),
    }
    Ok(())
}

fn print_summary(r: &CalculationResult, warnings: &[String]) {
    println!("\n=== 설계 요약 ===");
    println!(
        "랙: {:.0}대 × {:.1} kW = IT 부하 {:.1} kW ({:.0}열)",
        r.rack.total_racks, r.rack.kw_per_rack, r.rack.total_it_load, r.rack.rows
    );
    println!(
        "전기: 랙당 {:.1} A, 열당 {:.1} A, 버스바 {} × {:.0}, TOB {}, rPDU {}",
        r.electrical.current_per_rack,
        r.electrical.current_per_row,
        r.electrical.busbar_size,
        r.electrical.busbars_required,
        r.electrical.tap_off_box,
        r.electrical.rpdu
    );
    print_cooling(&r.cooling);
    let p = &r.power;
    println!(
        "UPS: {:.0} kW ({:.0} + {:.0} 모듈, 프레임 {:.0})",
        p.ups.total_capacity, p.ups.modules_required, p.ups.redundant_modules, p.ups.frames_required
    );
    println!(
        "배터리: {:.0}분, {:.1} kWh, 캐비닛 {:.0}",
        p.battery.runtime, p.battery.energy_required, p.battery.cabinets
    );
    if p.generator.included {
        println!(
            "발전기: {:.0} kW × {:.0}대, 연료 {:.1} L/h",
            p.generator.capacity, p.generator.units, p.generator.fuel_consumption
        );
    }
    println!("E-House 면적: {:.1} m²", p.e_house_area);

    let c = &r.cost;
    println!("\n--- 원가 ---");
    println!("전기 설비: {:.0}", c.electrical.total);
    println!("냉각 설비: {:.0}", c.cooling);
    println!("전력 설비: {:.0}", c.power.total);
    println!("기반 시설: {:.0}", c.infrastructure);
    println!("지속가능성: {:.0}", c.sustainability);
    println!(
        "장비 합계 {:.0} + 설치 {:.0} + 엔지니어링 {:.0} + 예비비 {:.0}",
        c.equipment_total, c.installation, c.engineering, c.contingency
    );
    println!(
        "총 사업비: {:.0} (랙당 {:.0}, kW당 {:.0})",
        c.total_project_cost, c.cost_per_rack, c.cost_per_kw
    );

    println!("\n--- 신뢰도/지속가능성 ---");
    println!(
        "{} / {} / 연간 다운타임 {:.1}분 ({})",
        r.reliability.tier,
        r.reliability.availability,
        r.reliability.annual_downtime,
        r.reliability.redundancy_mode
    );
    let s = &r.sustainability;
    println!(
        "PUE {:.2}, WUE {:.2} L/kWh, 연간 {:.0} MWh, 물 {:.0} m³",
        s.pue, s.wue, s.annual_energy_consumption, s.annual_water_usage
    );
    println!(
        "탄소: 계통 {:.1} t + 발전기 {:.1} t = {:.1} tCO₂/년 (재생 상쇄 {:.1} t)",
        r.carbon_footprint.grid_emissions,
        r.carbon_footprint.generator_emissions,
        r.carbon_footprint.total_emissions,
        r.carbon_footprint.renewable_offset
    );
    println!(
        "TCO: CAPEX {:.0}, OPEX {:.0}/년, 5년 {:.0}, 10년 {:.0}",
        r.tco.capex, r.tco.opex, r.tco.total_5_year, r.tco.total_10_year
    );

    if !warnings.is_empty() {
        println!("\n--- 주의 ---");
        for w in warnings {
            println!("- {w}");
        }
    }
}

fn print_cooling(cooling: &CoolingSection) {
    print!(
        "냉각({}): 열부하 {:.1} kW, 설치 용량 {:.1} kW",
        cooling.type_tag(),
        cooling.heat_load(),
        cooling.installed_capacity()
    );
    match cooling {
        CoolingSection::Air(c) => println!(", RDHX {} × {:.0}", c.rdhx_model, c.rdhx_units),
        CoolingSection::Dlc(c) => println!(
            ", DLC {:.1} kW / 잔열 {:.1} kW, 유량 {:.0} L/min, 배관 {}",
            c.dlc_cooling_capacity, c.residual_cooling_capacity, c.dlc_flow_rate, c.piping_size
        ),
        CoolingSection::Hybrid(c) => println!(
            ", DLC {:.1} kW / 잔열 {:.1} kW, 유량 {:.0} L/min, 배관 {}, RDHX {} × {:.0}",
            c.dlc_cooling_capacity,
            c.residual_cooling_capacity,
            c.dlc_flow_rate,
            c.piping_size,
            c.rdhx_model,
            c.rdhx_units
        ),
        CoolingSection::Immersion(c) => println!(
            ", 탱크 {:.0}기, 절연유 {:.0} L, 유량 {:.0} L/min, 배관 {}",
            c.immersion_tanks, c.fluid_volume, c.coolant_flow_rate, c.piping_size
        ),
    }
}

/// 보정 이벤트 요약을 표준 에러로 출력한다.
pub fn print_diagnostics(events: &[DiagnosticEvent]) {
    if events.is_empty() {
        return;
    }
    let errors = events
        .iter()
        .filter(|e| e.level == DiagnosticLevel::Error)
        .count();
    eprintln!(
        "보정 {}건 (섹션 재생성 {}건, 필드 대체 {}건)",
        events.len(),
        errors,
        events.len() - errors
    );
}

fn read_line(prompt: &str) -> Result<String, AppError> {
    print!("{prompt}");
    io::stdout().flush().map_err(AppError::Io)?;
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).map_err(AppError::Io)?;
    Ok(buf)
}

fn read_f64(prompt: &str) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        match s.trim().parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

fn read_f64_or(prompt: &str, default: f64) -> Result<f64, AppError> {
    loop {
        let s = read_line(prompt)?;
        let s = s.trim();
        if s.is_empty() {
            return Ok(default);
        }
        match s.parse::<f64>() {
            Ok(v) => return Ok(v),
            Err(_) => println!("숫자를 입력하세요."),
        }
    }
}

fn read_yes_no(prompt: &str) -> Result<bool, AppError> {
    let s = read_line(prompt)?;
    Ok(matches!(s.trim(), "y" | "Y" | "yes"))
}
