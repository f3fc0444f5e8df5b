//! 검증 과정의 비치명적 진단 이벤트와 이를 받는 싱크(sink).
//!
//! 싱크는 관찰 전용이다. 싱크 유무와 관계없이 검증 결과는 동일해야 한다.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// 진단 이벤트 수준.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticLevel {
    Log,
    Warn,
    Error,
}

/// 검증기가 내보내는 진단 이벤트 하나.
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticEvent {
    pub level: DiagnosticLevel,
    /// 이벤트를 낸 구성요소 (예: `input_validator`)
    pub source: &'static str,
    pub message: String,
    /// 필드명, 제공값, 기본값 등 구조화된 부가 정보
    pub data: Value,
    pub timestamp: DateTime<Utc>,
}

impl DiagnosticEvent {
    pub fn new(
        level: DiagnosticLevel,
        source: &'static str,
        message: impl Into<String>,
        data: Value,
    ) -> Self {
        Self {
            level,
            source,
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }

    /// `data.field` 값을 문자열로 돌려준다.
    pub fn field(&self) -> Option<&str> {
        self.data.get("field").and_then(Value::as_str)
    }
}

/// 진단 이벤트를 받는 협력자.
pub trait DiagnosticSink {
    fn record(&self, event: DiagnosticEvent);

    fn warn(&self, source: &'static str, message: String, data: Value) {
        self.record(DiagnosticEvent::new(DiagnosticLevel::Warn, source, message, data));
    }

    fn error(&self, source: &'static str, message: String, data: Value) {
        self.record(DiagnosticEvent::new(DiagnosticLevel::Error, source, message, data));
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&DiagnosticEvent),
{
    fn record(&self, event: DiagnosticEvent) {
        self(&event)
    }
}

/// 모든 이벤트를 버린다.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn record(&self, _event: DiagnosticEvent) {}
}

/// 이벤트를 `tracing` 로그로 전달한다.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, event: DiagnosticEvent) {
        let data = event.data.to_string();
        match event.level {
            DiagnosticLevel::Log => {
                tracing::info!(source = event.source, data = %data, "{}", event.message)
            }
            DiagnosticLevel::Warn => {
                tracing::warn!(source = event.source, data = %data, "{}", event.message)
            }
            DiagnosticLevel::Error => {
                tracing::error!(source = event.source, data = %data, "{}", event.message)
            }
        }
    }
}

/// 이벤트를 메모리에 모아두는 싱크. CLI 보고서와 테스트에서 쓴다.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiagnosticEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// 지금까지 기록된 이벤트의 사본.
    pub fn events(&self) -> Vec<DiagnosticEvent> {
        match self.events.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, level: DiagnosticLevel) -> usize {
        self.events().iter().filter(|e| e.level == level).count()
    }

    pub fn warnings(&self) -> Vec<DiagnosticEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.level == DiagnosticLevel::Warn)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, event: DiagnosticEvent) {
        match self.events.lock() {
            Ok(mut guard) => guard.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
