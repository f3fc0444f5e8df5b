//! 입력, 계수, 결과의 타입 정의.

pub mod input;
pub mod params;
pub mod result;

pub use input::*;
pub use params::*;
pub use result::*;
