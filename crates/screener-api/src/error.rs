//! HTTP 에러 응답 타입.
//!
//! 파이프라인의 Result를 HTTP 상태 코드로 매핑합니다. 모든 실패는
//! 재시도 없이 메시지를 담은 500 응답이 되며, 부분 응답은 없습니다.

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

/// `{"error": "..."}` 형태의 에러 응답 본문.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// 사람이 읽을 수 있는 에러 메시지
    pub error: String,
}

impl ErrorResponse {
    /// 에러 응답 생성.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

/// 에러를 500 응답으로 변환.
pub fn internal_error(err: impl std::fmt::Display) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!(error = %err, "요청 처리 실패");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(err.to_string())),
    )
}
