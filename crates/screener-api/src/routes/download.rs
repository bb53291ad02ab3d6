//! 프리셋 필터 결과 xlsx 다운로드 라우트.

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use screener_core::{filter_by_style, InvestStyle, MarketKind};

use crate::error::{internal_error, ApiResult};
use crate::export;
use crate::state::AppState;

/// xlsx 콘텐츠 타입.
const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `/download.xlsx` 쿼리 파라미터.
#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    /// 투자 성향 (1: 안정추구 / 2: 안정성장 / 3: 적극성장, 기본값: 2)
    #[serde(default = "default_choice")]
    pub choice: String,
    /// 시장 (기본값: KOSPI)
    #[serde(default = "super::stocks::default_market")]
    pub market: String,
}

fn default_choice() -> String {
    "2".to_string()
}

/// 프리셋 필터링 결과를 xlsx로 내려받기.
///
/// GET /download.xlsx?choice=2&market=KOSPI
pub async fn download_xlsx(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let market = MarketKind::parse(&query.market).map_err(internal_error)?;
    let style = InvestStyle::from_choice(&query.choice);

    let (base_date, rows) = state.loader.load(market).await.map_err(internal_error)?;
    let filtered = filter_by_style(&rows, style);
    let bytes = export::write_xlsx(&filtered).map_err(internal_error)?;

    let filename = format!("{}_{}_filtered.xlsx", market, base_date);
    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];

    Ok((StatusCode::OK, headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::routes::{create_api_router, test_support};

    #[tokio::test]
    async fn test_download_sets_attachment_headers() {
        let app = create_api_router().with_state(test_support::single_stock_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download.xlsx?choice=2&market=KOSPI")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            XLSX_CONTENT_TYPE
        );

        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .to_string();
        assert!(disposition.starts_with("attachment; filename=\"KOSPI_"));
        assert!(disposition.ends_with("_filtered.xlsx\""));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        // xlsx는 zip 컨테이너
        assert_eq!(&body[..4], b"PK\x03\x04");
    }

    #[tokio::test]
    async fn test_download_defaults_and_unknown_choice_fall_back() {
        // choice 누락과 범위 밖 choice 모두 기본 프리셋으로 처리
        for uri in ["/download.xlsx", "/download.xlsx?choice=9"] {
            let app = create_api_router().with_state(test_support::single_stock_state());
            let response = app
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK, "uri: {}", uri);
        }
    }

    #[tokio::test]
    async fn test_download_empty_provider_is_500() {
        let app = create_api_router().with_state(test_support::empty_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/download.xlsx?choice=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
