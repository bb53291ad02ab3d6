//! 종목 행 및 시장 구분 타입.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScreenerError;

/// 응답 테이블의 컬럼 순서.
///
/// 종목코드가 항상 첫 컬럼이며, JSON 응답의 `columns` 배열과
/// xlsx 헤더 행이 모두 이 순서를 따릅니다.
pub const COLUMNS: [&str; 8] = [
    "ticker",
    "name",
    "per",
    "pbr",
    "roe",
    "dividendYield",
    "marketCap",
    "marketCapEok",
];

/// 시장 구분.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketKind {
    /// 유가증권시장 (코스피)
    Kospi,
    /// 코스닥
    Kosdaq,
}

impl MarketKind {
    /// 쿼리 파라미터 문자열에서 시장 구분을 파싱합니다.
    ///
    /// KOSPI/KOSDAQ 외의 값은 `InvalidMarket` 에러를 반환합니다.
    pub fn parse(s: &str) -> Result<Self, ScreenerError> {
        match s.trim().to_uppercase().as_str() {
            "KOSPI" => Ok(Self::Kospi),
            "KOSDAQ" => Ok(Self::Kosdaq),
            other => Err(ScreenerError::InvalidMarket(other.to_string())),
        }
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Kospi => write!(f, "KOSPI"),
            Self::Kosdaq => write!(f, "KOSDAQ"),
        }
    }
}

/// 종목 하나의 펀더멘털 행.
///
/// 로더를 통과한 행은 `per`, `pbr`, `roe`, `market_cap`이 모두
/// 채워져 있고 양수임이 보장됩니다. `dividend_yield`는 소스가
/// 제공하지 않으면 null로 남을 수 있습니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    /// 종목코드 (6자리, 0 패딩)
    pub ticker: String,
    /// 종목명 (조회 실패 시 빈 문자열)
    pub name: String,
    /// PER (주가수익비율)
    pub per: Option<Decimal>,
    /// PBR (주가순자산비율)
    pub pbr: Option<Decimal>,
    /// ROE (자기자본이익률, %)
    pub roe: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    /// 시가총액 (원)
    pub market_cap: Option<i64>,
    /// 시가총액 (억원)
    pub market_cap_eok: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_market_kind_parse() {
        assert_eq!(MarketKind::parse("KOSPI").unwrap(), MarketKind::Kospi);
        assert_eq!(MarketKind::parse("kosdaq").unwrap(), MarketKind::Kosdaq);
        assert_eq!(MarketKind::parse(" Kospi ").unwrap(), MarketKind::Kospi);
        assert!(matches!(
            MarketKind::parse("NASDAQ"),
            Err(ScreenerError::InvalidMarket(_))
        ));
    }

    #[test]
    fn test_market_kind_display() {
        assert_eq!(MarketKind::Kospi.to_string(), "KOSPI");
        assert_eq!(MarketKind::Kosdaq.to_string(), "KOSDAQ");
    }

    #[test]
    fn test_stock_row_serializes_with_column_keys() {
        let row = StockRow {
            ticker: "005930".to_string(),
            name: "삼성전자".to_string(),
            per: Some(dec!(12.34)),
            pbr: Some(dec!(1.2)),
            roe: Some(dec!(10)),
            dividend_yield: None,
            market_cap: Some(400_000_000_000_000),
            market_cap_eok: Some(dec!(4000000)),
        };

        let json = serde_json::to_value(&row).unwrap();
        let obj = json.as_object().unwrap();
        for col in COLUMNS {
            assert!(obj.contains_key(col), "missing column key: {}", col);
        }
        assert!(obj["dividendYield"].is_null());
    }
}
