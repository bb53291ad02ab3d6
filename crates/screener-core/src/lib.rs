//! # Screener Core
//!
//! KRX 종목 스크리너의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 스크리너 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 행 및 시장 구분 타입
//! - 투자 성향 프리셋과 필터/정렬 로직
//! - 에러 타입
//! - 로깅 인프라

pub mod domain;
pub mod error;
pub mod logging;

pub use domain::*;
pub use error::*;
pub use logging::*;
