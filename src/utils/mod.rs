//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 로그용 URL 마스킹 등 문자열 처리

pub mod string_utils;
