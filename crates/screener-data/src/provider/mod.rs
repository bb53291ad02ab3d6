//! 시장 데이터 제공자.

mod krx;

pub use krx::KrxClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use screener_core::{MarketKind, ScreenerResult};

/// 가치지표 원시 레코드 (기준일 × 종목).
///
/// 제공자 응답의 문자열 값은 이미 숫자로 강제 변환된 상태이며,
/// 변환에 실패한 값은 null로 남습니다.
#[derive(Debug, Clone, Default)]
pub struct ValuationRecord {
    /// 종목코드
    pub ticker: String,
    /// PER (주가수익비율)
    pub per: Option<Decimal>,
    /// PBR (주가순자산비율)
    pub pbr: Option<Decimal>,
    /// ROE (자기자본이익률, %) — 소스가 제공하는 경우에만
    pub roe: Option<Decimal>,
    /// EPS (주당순이익)
    pub eps: Option<Decimal>,
    /// BPS (주당순자산)
    pub bps: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
}

/// 시장 데이터 소스 추상화.
///
/// 운영 구현은 [`KrxClient`]이고, 로더/라우트 테스트는 인메모리
/// 구현으로 대체합니다.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// 해당 일자에 거래 데이터가 존재하는지 확인합니다.
    ///
    /// 영업일 판정에 사용됩니다 (지수 데이터 유무 기준).
    async fn has_trading_data(&self, date: NaiveDate) -> ScreenerResult<bool>;

    /// 전종목 가치지표 조회.
    async fn fetch_valuations(
        &self,
        base_date: NaiveDate,
        market: MarketKind,
    ) -> ScreenerResult<Vec<ValuationRecord>>;

    /// 전종목 시가총액 조회.
    ///
    /// 값이 파싱 불가능한 종목은 null 시가총액으로 반환됩니다.
    async fn fetch_market_caps(
        &self,
        base_date: NaiveDate,
        market: MarketKind,
    ) -> ScreenerResult<Vec<(String, Option<i64>)>>;

    /// 종목코드에 대한 종목명 조회.
    async fn ticker_name(&self, market: MarketKind, ticker: &str) -> ScreenerResult<String>;
}
