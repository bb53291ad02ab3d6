//! 전종목 펀더멘털 조회 라우트.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use screener_core::{MarketKind, StockRow, COLUMNS};

use crate::error::{internal_error, ApiResult};
use crate::state::AppState;

/// `/api/stocks` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct StocksQuery {
    /// 시장 (기본값: KOSPI)
    #[serde(default = "default_market")]
    pub market: String,
}

pub(crate) fn default_market() -> String {
    "KOSPI".to_string()
}

/// 전종목 조회 응답.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StocksResponse {
    /// 기준일 (YYYYMMDD)
    pub base_date: String,
    /// 컬럼 순서
    pub columns: Vec<String>,
    /// 종목 행 목록
    pub data: Vec<StockRow>,
}

/// 기준일의 펀더멘털 테이블 조회.
///
/// GET /api/stocks?market=KOSPI
pub async fn list_stocks(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StocksQuery>,
) -> ApiResult<Json<StocksResponse>> {
    let market = MarketKind::parse(&query.market).map_err(internal_error)?;
    let (base_date, rows) = state.loader.load(market).await.map_err(internal_error)?;

    Ok(Json(StocksResponse {
        base_date,
        columns: COLUMNS.iter().map(|c| c.to_string()).collect(),
        data: rows,
    }))
}
