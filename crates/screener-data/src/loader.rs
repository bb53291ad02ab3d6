//! 펀더멘털 테이블 로더.
//!
//! 기준일 결정 → 가치지표/시가총액 수집 → 병합 → 파생/정제의
//! 파이프라인을 실행해 요청 단위의 종목 테이블을 만듭니다.
//! 요청 간 공유 상태나 캐시는 없습니다.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use screener_core::{MarketKind, ScreenerError, ScreenerResult, StockRow};

use crate::provider::MarketDataSource;

/// 기준일 탐색 범위 (일).
const BASE_DATE_LOOKBACK_DAYS: i64 = 7;

/// 종목명 조회 사이의 기본 대기 시간.
const DEFAULT_LOOKUP_DELAY: Duration = Duration::from_millis(3);

/// 시장 데이터 로더.
pub struct MarketDataLoader {
    source: Arc<dyn MarketDataSource>,
    lookup_delay: Duration,
}

impl MarketDataLoader {
    /// 새 로더 생성.
    pub fn new(source: Arc<dyn MarketDataSource>) -> Self {
        Self {
            source,
            lookup_delay: DEFAULT_LOOKUP_DELAY,
        }
    }

    /// 종목명 조회 간 최소 대기 시간 설정.
    ///
    /// 외부 제공자 요청 한도를 지키기 위한 순차 루프의 간격입니다.
    pub fn with_lookup_delay(mut self, delay: Duration) -> Self {
        self.lookup_delay = delay;
        self
    }

    /// 기준일의 펀더멘털 테이블 로드.
    ///
    /// 반환 테이블은 종목코드가 6자리로 정규화되어 있고,
    /// `per`/`pbr`/`roe`/`market_cap`이 모두 양수인 행만 남습니다.
    pub async fn load(&self, market: MarketKind) -> ScreenerResult<(String, Vec<StockRow>)> {
        let base_date = self.resolve_base_date(market).await?;
        let base_date_str = base_date.format("%Y%m%d").to_string();

        let valuations = self.source.fetch_valuations(base_date, market).await?;
        let caps = self.source.fetch_market_caps(base_date, market).await?;

        if valuations.is_empty() || caps.is_empty() {
            return Err(ScreenerError::DataUnavailable {
                base_date: base_date_str,
                market: market.to_string(),
            });
        }

        // 시가총액 병합 (종목코드 inner join)
        let cap_by_ticker: HashMap<String, Option<i64>> = caps.into_iter().collect();

        let mut rows: Vec<StockRow> = Vec::new();
        for v in valuations {
            let Some(market_cap) = cap_by_ticker.get(&v.ticker).copied() else {
                continue;
            };
            let roe = v.roe.or_else(|| derive_roe(v.eps, v.bps));
            rows.push(StockRow {
                ticker: normalize_ticker(&v.ticker),
                name: String::new(),
                per: v.per,
                pbr: v.pbr,
                roe,
                dividend_yield: v.dividend_yield,
                market_cap,
                market_cap_eok: market_cap.map(|c| Decimal::from(c) / dec!(100000000)),
            });
        }

        // 기본 이상치 제거 (null/0/음수 제거)
        rows.retain(|r| {
            positive(r.per)
                && positive(r.pbr)
                && positive(r.roe)
                && r.market_cap.map(|c| c > 0).unwrap_or(false)
        });

        // 종목명 조회. 생존 행에 대해서만 순차 실행하고 호출 사이에
        // 대기 시간을 둔다. 단일 종목 실패는 빈 이름으로 대체.
        for row in rows.iter_mut() {
            match self.source.ticker_name(market, &row.ticker).await {
                Ok(name) => row.name = name,
                Err(e) => {
                    warn!(ticker = %row.ticker, error = %e, "종목명 조회 실패");
                }
            }
            tokio::time::sleep(self.lookup_delay).await;
        }

        info!(
            market = %market,
            base_date = %base_date_str,
            count = rows.len(),
            "펀더멘털 로드 완료"
        );
        Ok((base_date_str, rows))
    }

    /// 오늘(한국 시간) 이전 가장 가까운 영업일 결정.
    ///
    /// 제공자에게 거래 데이터 유무를 하루씩 거슬러 올라가며 확인합니다.
    /// 탐색 범위 내에 영업일이 없으면 `DataUnavailable`.
    async fn resolve_base_date(&self, market: MarketKind) -> ScreenerResult<NaiveDate> {
        let today = Utc::now().with_timezone(&chrono_tz::Asia::Seoul).date_naive();

        for back in 0..BASE_DATE_LOOKBACK_DAYS {
            let candidate = today - chrono::Duration::days(back);
            if self.source.has_trading_data(candidate).await? {
                return Ok(candidate);
            }
        }

        Err(ScreenerError::DataUnavailable {
            base_date: today.format("%Y%m%d").to_string(),
            market: market.to_string(),
        })
    }
}

/// ROE가 없을 때 EPS/BPS로 근사 계산.
///
/// ROE(%) ≈ (EPS / BPS) * 100. BPS가 0이면 계산하지 않습니다.
fn derive_roe(eps: Option<Decimal>, bps: Option<Decimal>) -> Option<Decimal> {
    match (eps, bps) {
        (Some(eps), Some(bps)) if !bps.is_zero() => Some(eps / bps * dec!(100)),
        _ => None,
    }
}

/// 종목코드를 6자리 0 패딩 문자열로 정규화.
fn normalize_ticker(ticker: &str) -> String {
    format!("{:0>6}", ticker.trim())
}

fn positive(value: Option<Decimal>) -> bool {
    value.map(|v| v > Decimal::ZERO).unwrap_or(false)
}
