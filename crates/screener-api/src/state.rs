//! 애플리케이션 상태.

use screener_data::MarketDataLoader;

/// 요청 핸들러가 공유하는 애플리케이션 상태.
///
/// 프로세스 시작 시 한 번 생성되며 가변 필드가 없습니다. 요청 간
/// 캐시가 없으므로 모든 요청이 로더 파이프라인을 처음부터 끝까지
/// 실행합니다.
pub struct AppState {
    /// 펀더멘털 로더
    pub loader: MarketDataLoader,
}

impl AppState {
    /// 새 상태 생성.
    pub fn new(loader: MarketDataLoader) -> Self {
        Self { loader }
    }
}
