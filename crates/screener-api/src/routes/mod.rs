//! API 라우트.
//!
//! # 라우트 구조
//!
//! - `/api/stocks` - 전종목 펀더멘털 조회
//! - `/download.xlsx` - 프리셋 필터 결과 xlsx 다운로드

pub mod download;
pub mod stocks;

pub use download::DownloadQuery;
pub use stocks::{StocksQuery, StocksResponse};

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::state::AppState;

/// 전체 API 라우터 생성.
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/stocks", get(stocks::list_stocks))
        .route("/download.xlsx", get(download::download_xlsx))
}
