//! 데이터센터 매트릭스 계산기. 계산/검증 로직을 라이브러리로 분리하여 CLI 외의 화면에서도 그대로 쓴다.

pub mod app;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod model;
pub mod safe_access;
pub mod ui_cli;
pub mod validation;
