//! KRX Open API 클라이언트.
//!
//! 한국거래소(KRX) Open API를 통해 일별 가치지표와 시가총액을
//! 수집합니다.
//!
//! # 지원 데이터
//!
//! - 가치지표 (PER, PBR, EPS, BPS, 배당수익률)
//! - 전종목 시가총액
//! - 종목명 조회
//! - 지수 일별 시세 (영업일 판정용)
//!
//! # API 키
//!
//! 인증키는 `KRX_API_KEY` 환경변수에서 읽어 HTTP `AUTH_KEY` 헤더로
//! 전달합니다.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use screener_core::{MarketKind, ScreenerError, ScreenerResult};

use super::{MarketDataSource, ValuationRecord};

/// KRX Open API 클라이언트.
#[derive(Clone)]
pub struct KrxClient {
    client: reqwest::Client,
    auth_key: String,
    base_url: String,
}

/// API 응답 래퍼.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(rename = "OutBlock_1")]
    out_block: Option<Vec<T>>,
}

impl KrxClient {
    /// 새로운 KRX API 클라이언트 생성.
    ///
    /// # Arguments
    /// * `auth_key` - KRX Open API 인증키
    pub fn new(auth_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("HTTP 클라이언트 생성 실패"),
            auth_key: auth_key.into(),
            base_url: "https://data-dbg.krx.co.kr".to_string(),
        }
    }

    /// 환경변수 `KRX_API_KEY`에서 인증키를 로드하여 클라이언트 생성.
    pub fn from_env() -> Option<Self> {
        std::env::var("KRX_API_KEY").ok().map(Self::new)
    }

    /// Base URL 교체 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// API 요청 실행.
    ///
    /// AUTH_KEY는 HTTP 헤더로 전달합니다 (KRX OPEN API 명세 준수).
    async fn request<T: for<'de> Deserialize<'de>>(
        &self,
        category: &str,
        api_id: &str,
        params: &HashMap<&str, &str>,
    ) -> ScreenerResult<Vec<T>> {
        let url = format!("{}/svc/sample/apis/{}/{}", self.base_url, category, api_id);

        tracing::debug!(api_id = api_id, url = %url, "KRX API 요청");

        let response = self
            .client
            .get(&url)
            .query(params)
            .header("AUTH_KEY", &self.auth_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ScreenerError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ScreenerError::Fetch(format!(
                "KRX API 오류 [{}]: {} - {}",
                api_id, status, body
            )));
        }

        let data: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| ScreenerError::Parse(e.to_string()))?;

        Ok(data.out_block.unwrap_or_default())
    }

    /// 주식 카테고리 API id 구성 (KOSPI: stk_*, KOSDAQ: ksq_*).
    fn stock_api(market: MarketKind, suffix: &str) -> String {
        match market {
            MarketKind::Kospi => format!("stk_{}", suffix),
            MarketKind::Kosdaq => format!("ksq_{}", suffix),
        }
    }
}

#[async_trait]
impl MarketDataSource for KrxClient {
    /// 해당 일자의 KRX 시리즈 지수 존재 여부로 영업일을 판정합니다.
    async fn has_trading_data(&self, date: NaiveDate) -> ScreenerResult<bool> {
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct RawIndex {
            #[serde(rename = "IDX_NM")]
            index_name: String,
        }

        let base_date = date.format("%Y%m%d").to_string();
        let params: HashMap<&str, &str> = [("basDd", base_date.as_str())].into_iter().collect();
        let rows: Vec<RawIndex> = self.request("idx", "krx_dd_trd", &params).await?;

        Ok(!rows.is_empty())
    }

    /// 종목별 가치지표 조회.
    async fn fetch_valuations(
        &self,
        base_date: NaiveDate,
        market: MarketKind,
    ) -> ScreenerResult<Vec<ValuationRecord>> {
        #[derive(Deserialize)]
        struct RawValuation {
            #[serde(rename = "ISU_SRT_CD")]
            ticker: String,
            #[serde(rename = "PER", default)]
            per: Option<String>,
            #[serde(rename = "PBR", default)]
            pbr: Option<String>,
            #[serde(rename = "ROE", default)]
            roe: Option<String>,
            #[serde(rename = "EPS", default)]
            eps: Option<String>,
            #[serde(rename = "BPS", default)]
            bps: Option<String>,
            #[serde(rename = "DVD_YLD", default)]
            dividend_yield: Option<String>,
        }

        let api_id = Self::stock_api(market, "isu_per_pbr");
        let date_param = base_date.format("%Y%m%d").to_string();
        let params: HashMap<&str, &str> = [("basDd", date_param.as_str())].into_iter().collect();
        let raw: Vec<RawValuation> = self.request("stk", &api_id, &params).await?;

        let valuations: Vec<ValuationRecord> = raw
            .into_iter()
            .map(|v| ValuationRecord {
                ticker: v.ticker,
                per: parse_decimal_opt(&v.per),
                pbr: parse_decimal_opt(&v.pbr),
                roe: parse_decimal_opt(&v.roe),
                eps: parse_decimal_opt(&v.eps),
                bps: parse_decimal_opt(&v.bps),
                dividend_yield: parse_decimal_opt(&v.dividend_yield),
            })
            .collect();

        tracing::info!(
            market = %market,
            count = valuations.len(),
            "가치지표 조회 완료"
        );
        Ok(valuations)
    }

    /// 전종목 일별 매매정보에서 시가총액 조회.
    async fn fetch_market_caps(
        &self,
        base_date: NaiveDate,
        market: MarketKind,
    ) -> ScreenerResult<Vec<(String, Option<i64>)>> {
        #[derive(Deserialize)]
        struct RawDailyTrade {
            #[serde(rename = "ISU_SRT_CD")]
            ticker: String,
            #[serde(rename = "MKTCAP", default)]
            market_cap: Option<String>,
        }

        let api_id = Self::stock_api(market, "bydd_trd");
        let date_param = base_date.format("%Y%m%d").to_string();
        let params: HashMap<&str, &str> = [("basDd", date_param.as_str())].into_iter().collect();
        let raw: Vec<RawDailyTrade> = self.request("stk", &api_id, &params).await?;

        let caps: Vec<(String, Option<i64>)> = raw
            .into_iter()
            .map(|t| (t.ticker, parse_i64_opt(&t.market_cap)))
            .collect();

        tracing::info!(market = %market, count = caps.len(), "시가총액 조회 완료");
        Ok(caps)
    }

    /// 종목 기본 정보에서 종목명 조회.
    async fn ticker_name(&self, market: MarketKind, ticker: &str) -> ScreenerResult<String> {
        #[derive(Deserialize)]
        struct RawBaseInfo {
            #[serde(rename = "ISU_ABBRV")]
            name: String,
        }

        let api_id = Self::stock_api(market, "isu_base_info");
        let params: HashMap<&str, &str> = [("isuCd", ticker)].into_iter().collect();
        let rows: Vec<RawBaseInfo> = self.request("stk", &api_id, &params).await?;

        rows.into_iter()
            .next()
            .map(|r| r.name)
            .ok_or_else(|| ScreenerError::Fetch(format!("종목명 데이터 없음: {}", ticker)))
    }
}

/// 문자열을 Decimal로 파싱 (쉼표/퍼센트 기호 제거).
fn parse_decimal_opt(s: &Option<String>) -> Option<Decimal> {
    s.as_ref().and_then(|v| {
        let cleaned = v.replace(",", "").replace("%", "");
        cleaned.parse().ok()
    })
}

/// 문자열을 i64로 파싱 (쉼표 제거).
fn parse_i64_opt(s: &Option<String>) -> Option<i64> {
    s.as_ref().and_then(|v| v.replace(",", "").parse().ok())
}
