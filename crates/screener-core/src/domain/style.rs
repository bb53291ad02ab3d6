//! 투자 성향 프리셋과 필터/정렬 로직.
//!
//! 로더가 만든 테이블에 프리셋별 임계값을 적용해 조건을 만족하는
//! 종목만 남기고, 프리셋의 정렬 기준으로 내림차순 정렬합니다.
//! 입력 테이블은 변경하지 않습니다.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::cmp::Ordering;
use tracing::debug;

use super::stock::StockRow;

/// 투자 성향 프리셋.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestStyle {
    /// 안정추구형: 저평가 + 고배당 + 시가총액 상위 20%
    IncomeStability,
    /// 안정성장형 (기본값): 적정 밸류에이션 + 시가총액 상위 50%
    BalancedGrowth,
    /// 적극성장형: 높은 ROE, 시가총액 하한 없음
    AggressiveGrowth,
}

impl InvestStyle {
    /// 요청 파라미터 `choice`에서 프리셋을 결정합니다.
    ///
    /// "1"과 "3" 외의 값은 (누락/비정상 포함) 모두 안정성장형으로
    /// 처리합니다.
    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "1" => Self::IncomeStability,
            "3" => Self::AggressiveGrowth,
            _ => Self::BalancedGrowth,
        }
    }

    fn thresholds(self) -> StyleThresholds {
        match self {
            Self::IncomeStability => StyleThresholds {
                per_max: dec!(12),
                pbr_max: dec!(1.2),
                roe_min: dec!(5),
                div_min: dec!(3.0),
                cap_floor: CapFloor::Quantile(0.80),
                sort_key: SortKey::DividendYield,
            },
            Self::BalancedGrowth => StyleThresholds {
                per_max: dec!(20),
                pbr_max: dec!(2),
                roe_min: dec!(10),
                div_min: dec!(1.5),
                cap_floor: CapFloor::Quantile(0.50),
                sort_key: SortKey::Roe,
            },
            Self::AggressiveGrowth => StyleThresholds {
                per_max: dec!(50),
                pbr_max: dec!(5),
                roe_min: dec!(15),
                div_min: dec!(0),
                cap_floor: CapFloor::Fixed(0.0),
                sort_key: SortKey::Roe,
            },
        }
    }
}

/// 시가총액 하한 산정 방식.
#[derive(Debug, Clone, Copy)]
enum CapFloor {
    /// 입력 테이블 시가총액 분포의 분위수
    Quantile(f64),
    /// 고정값 (원)
    Fixed(f64),
}

/// 프리셋별 임계값.
struct StyleThresholds {
    per_max: Decimal,
    pbr_max: Decimal,
    roe_min: Decimal,
    div_min: Decimal,
    cap_floor: CapFloor,
    sort_key: SortKey,
}

/// 정렬 기준 컬럼.
#[derive(Debug, Clone, Copy)]
enum SortKey {
    Roe,
    DividendYield,
}

/// 프리셋 조건으로 테이블을 필터링하고 정렬합니다.
///
/// 시가총액 분위수 하한은 다른 조건과 무관하게 *입력* 테이블 전체의
/// 시가총액 분포에서 계산합니다. 각 임계값 검사는 엄격한 부등호이며
/// 값이 비어 있으면 탈락합니다. 정렬은 안정 정렬이고 정렬 키가 비어
/// 있는 행은 맨 뒤로 갑니다.
pub fn filter_by_style(rows: &[StockRow], style: InvestStyle) -> Vec<StockRow> {
    if rows.is_empty() {
        return Vec::new();
    }

    let t = style.thresholds();
    let cap_floor = resolve_cap_floor(rows, t.cap_floor);

    let mut out: Vec<StockRow> = rows
        .iter()
        .filter(|r| passes_thresholds(r, &t, cap_floor))
        .cloned()
        .collect();

    let key = |r: &StockRow| match t.sort_key {
        SortKey::Roe => r.roe,
        SortKey::DividendYield => r.dividend_yield,
    };
    out.sort_by(|a, b| match (key(a), key(b)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    debug!(
        style = ?style,
        input = rows.len(),
        output = out.len(),
        "프리셋 필터링 완료"
    );
    out
}

/// 시가총액 하한값 계산.
///
/// 분위수 방식일 때 표본(시가총액이 채워진 행)이 비어 있으면 NaN을
/// 반환하고, 이후 비교가 모두 거짓이 되어 전 행이 탈락합니다.
fn resolve_cap_floor(rows: &[StockRow], floor: CapFloor) -> f64 {
    match floor {
        CapFloor::Fixed(v) => v,
        CapFloor::Quantile(q) => {
            let mut caps: Vec<f64> = rows
                .iter()
                .filter_map(|r| r.market_cap)
                .map(|c| c as f64)
                .collect();
            if caps.is_empty() {
                return f64::NAN;
            }
            caps.sort_by(f64::total_cmp);
            percentile_linear(&caps, q)
        }
    }
}

fn passes_thresholds(row: &StockRow, t: &StyleThresholds, cap_floor: f64) -> bool {
    below(row.per, t.per_max)
        && below(row.pbr, t.pbr_max)
        && above(row.roe, t.roe_min)
        && above(row.dividend_yield, t.div_min)
        && row.market_cap.map(|c| (c as f64) > cap_floor).unwrap_or(false)
}

fn below(value: Option<Decimal>, max: Decimal) -> bool {
    value.map(|v| v < max).unwrap_or(false)
}

fn above(value: Option<Decimal>, min: Decimal) -> bool {
    value.map(|v| v > min).unwrap_or(false)
}

/// 선형 보간 분위수.
///
/// 정렬된 표본에서 순위 `(n-1)*q`를 구하고 이웃한 두 순서통계량
/// 사이를 선형 보간합니다.
fn percentile_linear(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (n - 1) as f64 * q;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
