use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::model::CalculationParams;
use crate::validation::ensure_params_structure;

/// 기본 설정 파일 경로.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// 결과 출력 형식.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 사람이 읽는 요약
    #[default]
    Text,
    /// 결과 JSON 전체
    Json,
}

/// 애플리케이션 설정을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output_format: OutputFormat,
    /// 계산 계수. 파일에는 일부만 적어도 된다.
    #[serde(default)]
    pub params: CalculationParams,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Text,
            params: CalculationParams::default(),
        }
    }
}

/// `params`는 느슨하게 병합하기 위해 원시 값으로 읽는다.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    output_format: OutputFormat,
    #[serde(default)]
    params: Option<serde_json::Value>,
}

/// 설정 로드/저장 시 발생 가능한 오류를 표현한다.
#[derive(Debug)]
pub enum ConfigError {
    /// 파일 입출력 오류
    Io(std::io::Error),
    /// TOML 직렬화/역직렬화 오류
    Serde(toml::de::Error),
    /// TOML 직렬화 오류
    Serialize(toml::ser::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "파일 입출력 오류: {e}"),
            ConfigError::Serde(e) => write!(f, "설정 파싱 오류: {e}"),
            ConfigError::Serialize(e) => write!(f, "설정 직렬화 오류: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(value: toml::de::Error) -> Self {
        ConfigError::Serde(value)
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(value: toml::ser::Error) -> Self {
        ConfigError::Serialize(value)
    }
}

/// TOML 문자열에서 설정을 읽는다. `params`는 기본 계수 위에 필드 단위로 병합한다.
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let raw: RawConfig = toml::from_str(content)?;
    let params = raw
        .params
        .as_ref()
        .map(ensure_params_structure)
        .unwrap_or_default();
    Ok(Config {
        output_format: raw.output_format,
        params,
    })
}

/// 설정 파일의 `params` 테이블을 가공하지 않은 JSON 값으로 읽는다. 없으면 `Null`.
pub fn read_params_value(path: &Path) -> Result<serde_json::Value, ConfigError> {
    if !path.exists() {
        return Ok(serde_json::Value::Null);
    }
    let content = fs::read_to_string(path)?;
    let raw: RawConfig = toml::from_str(&content)?;
    Ok(raw.params.unwrap_or(serde_json::Value::Null))
}

/// 설정 파일을 로드하거나 없으면 기본 설정을 생성한다.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if path.exists() {
        let content = fs::read_to_string(path)?;
        let cfg = parse_config(&content)?;
        tracing::debug!(path = %path.display(), "설정 파일을 읽었습니다");
        Ok(cfg)
    } else {
        let cfg = Config::default();
        save_config(&cfg, path)?;
        tracing::info!(path = %path.display(), "기본 설정 파일을 생성했습니다");
        Ok(cfg)
    }
}

fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(cfg)?;
    fs::write(path, content)?;
    Ok(())
}

impl Config {
    /// 설정을 파일에 저장한다.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        save_config(self, path)
    }
}
