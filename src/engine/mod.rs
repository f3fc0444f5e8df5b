//! 계산 엔진. 유도 공식([`derive`])과 순방향 계산/설계 검토([`calculate`])로 구성한다.

pub mod calculate;
pub mod derive;

pub use calculate::{calculate, recommend_cooling_type, review_design, Estimate};
pub use derive::{Derivation, HOURS_PER_YEAR};
