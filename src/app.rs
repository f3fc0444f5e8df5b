use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::config::{self, Config};
use crate::diagnostics::{DiagnosticSink, MemorySink, TracingSink};
use crate::engine;
use crate::ui_cli::{self, Cli, Commands};
use crate::validation::{
    validate_calculation_inputs, validate_calculation_params, validate_calculation_results_with_params,
    validate_params, ParamError,
};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum AppError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// 설정 저장/로드 오류
    Config(crate::config::ConfigError),
    /// JSON 파싱/직렬화 오류
    Json(serde_json::Error),
    /// TOML 직렬화 오류
    Toml(toml::ser::Error),
    /// 계수 검사 실패 (오류 개수)
    InvalidParams(usize),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Io(e) => write!(f, "입출력 오류: {e}"),
            AppError::Config(e) => write!(f, "설정 오류: {e}"),
            AppError::Json(e) => write!(f, "JSON 오류: {e}"),
            AppError::Toml(e) => write!(f, "TOML 직렬화 오류: {e}"),
            AppError::InvalidParams(n) => write!(f, "계산 계수에 문제가 {n}건 있습니다"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<crate::config::ConfigError> for AppError {
    fn from(value: crate::config::ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        AppError::Json(value)
    }
}

impl From<toml::ser::Error> for AppError {
    fn from(value: toml::ser::Error) -> Self {
        AppError::Toml(value)
    }
}

/// 설정을 로드하고 하위 명령을 실행한다.
pub fn run(cli: Cli) -> Result<(), AppError> {
    let config = config::load_or_default(&cli.config)?;
    match cli.command {
        Commands::Calc { input, format } => {
            let raw = match input {
                Some(path) => read_json(&path)?,
                None => ui_cli::prompt_input(&config)?,
            };
            run_calc(&config, &raw, format.unwrap_or(config.output_format))
        }
        Commands::Repair {
            input,
            result,
            format,
        } => {
            let raw_input = read_json(&input)?;
            let raw_result = read_json(&result)?;
            run_repair(
                &config,
                &raw_input,
                &raw_result,
                format.unwrap_or(config.output_format),
            )
        }
        Commands::Params { check } => {
            if check {
                run_params_check(&cli.config, &config)
            } else {
                println!("{}", toml::to_string_pretty(&config.params)?);
                Ok(())
            }
        }
        Commands::Recommend { kw_per_rack } => {
            let recommended =
                engine::recommend_cooling_type(kw_per_rack, &config.params.cooling_thresholds);
            println!("랙당 {kw_per_rack:.1} kW → {}", recommended.as_str());
            Ok(())
        }
    }
}

fn run_calc(config: &Config, raw: &Value, format: config::OutputFormat) -> Result<(), AppError> {
    let sink = MemorySink::new();
    let input = validate_calculation_inputs(raw, &sink);
    report_events(&sink);
    let estimate = engine::calculate(&input, &config.params);
    tracing::debug!(
        total_it_load = estimate.result.rack.total_it_load,
        total_project_cost = estimate.result.cost.total_project_cost,
        "계산 완료"
    );
    ui_cli::print_result(&estimate.result, &estimate.warnings, format)
}

fn run_repair(
    config: &Config,
    raw_input: &Value,
    raw_result: &Value,
    format: config::OutputFormat,
) -> Result<(), AppError> {
    let sink = MemorySink::new();
    let input = validate_calculation_inputs(raw_input, &sink);
    let repaired =
        validate_calculation_results_with_params(raw_result, &input, &config.params, &sink);
    report_events(&sink);
    let warnings = engine::review_design(&input, &config.params);
    ui_cli::print_result(&repaired, &warnings, format)
}

/// 파일에 적힌 값의 타입 문제와 병합 후 계수의 범위 문제를 함께 보고한다.
fn run_params_check(path: &Path, config: &Config) -> Result<(), AppError> {
    let raw = config::read_params_value(path)?;
    let mut errors: Vec<ParamError> = validate_calculation_params(&raw)
        .errors
        .into_iter()
        .filter(|e| {
            matches!(
                e,
                ParamError::WrongType { .. } | ParamError::UnknownVariant { .. }
            )
        })
        .collect();
    errors.extend(validate_params(&config.params).errors);

    if errors.is_empty() {
        println!("계산 계수 이상 없음 ({})", path.display());
        return Ok(());
    }
    for e in &errors {
        println!("- {e}");
    }
    Err(AppError::InvalidParams(errors.len()))
}

/// 모아둔 진단 이벤트를 로그로 넘기고 요약을 출력한다.
fn report_events(sink: &MemorySink) {
    let events = sink.events();
    for event in &events {
        TracingSink.record(event.clone());
    }
    ui_cli::print_diagnostics(&events);
}

fn read_json(path: &Path) -> Result<Value, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
