//! 스크리너의 에러 타입.

use thiserror::Error;

/// 스크리닝 파이프라인 에러.
///
/// 개별 값 파싱 실패나 종목명 조회 실패는 에러로 전파하지 않고
/// 로더가 국소적으로 복구합니다 (null 처리 / 빈 이름 대체).
#[derive(Debug, Error)]
pub enum ScreenerError {
    /// 기준일에 대한 시장 데이터 없음
    #[error("{base_date} 기준으로 {market} 시장 데이터를 가져오지 못했습니다")]
    DataUnavailable { base_date: String, market: String },

    /// 지원하지 않는 시장
    #[error("지원하지 않는 시장: {0}")]
    InvalidMarket(String),

    /// 외부 데이터 조회 에러
    #[error("데이터 조회 에러: {0}")]
    Fetch(String),

    /// 응답 파싱 에러
    #[error("응답 파싱 에러: {0}")]
    Parse(String),
}

/// 스크리닝 작업을 위한 Result 타입.
pub type ScreenerResult<T> = Result<T, ScreenerError>;
