//! 입력/계수/결과 검증 계층.
//! 입력 정규화, 계수 병합·범위 검사, 결과 자가 복구와 기본 결과 생성으로 구성한다.

pub mod input;
pub mod params;
pub mod result;
pub mod schema;

pub use input::validate_calculation_inputs;
pub use params::{
    ensure_params_structure, validate_calculation_params, validate_params, ParamError,
    ParamsReport,
};
pub use result::{
    create_default_results, create_default_results_with_params, validate_calculation_results,
    validate_calculation_results_with_params,
};
