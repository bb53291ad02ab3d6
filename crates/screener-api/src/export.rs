//! 종목 테이블의 xlsx 인코딩.
//!
//! 워크북을 메모리 버퍼에 직접 기록합니다. 디스크를 거치지 않으므로
//! 응답 본문으로 바로 전달할 수 있습니다.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

use screener_core::{StockRow, COLUMNS};

/// 종목 테이블을 xlsx 바이트로 인코딩.
///
/// 첫 행은 [`COLUMNS`] 순서의 헤더이고, 값이 비어 있는 셀은
/// 빈 칸으로 남습니다.
pub fn write_xlsx(rows: &[StockRow]) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write(0, col as u16, *name)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let r = (i as u32) + 1;
        sheet.write(r, 0, row.ticker.as_str())?;
        sheet.write(r, 1, row.name.as_str())?;
        write_decimal(sheet, r, 2, row.per)?;
        write_decimal(sheet, r, 3, row.pbr)?;
        write_decimal(sheet, r, 4, row.roe)?;
        write_decimal(sheet, r, 5, row.dividend_yield)?;
        if let Some(cap) = row.market_cap {
            sheet.write(r, 6, cap as f64)?;
        }
        write_decimal(sheet, r, 7, row.market_cap_eok)?;
    }

    workbook.save_to_buffer()
}

fn write_decimal(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: Option<Decimal>,
) -> Result<(), XlsxError> {
    if let Some(v) = value.and_then(|v| v.to_f64()) {
        sheet.write(row, col, v)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_row() -> StockRow {
        StockRow {
            ticker: "005930".to_string(),
            name: "삼성전자".to_string(),
            per: Some(dec!(12.34)),
            pbr: Some(dec!(1.2)),
            roe: Some(dec!(10)),
            dividend_yield: None,
            market_cap: Some(400_000_000_000_000),
            market_cap_eok: Some(dec!(4000000)),
        }
    }

    #[test]
    fn test_write_xlsx_produces_zip_container() {
        let bytes = write_xlsx(&[sample_row()]).unwrap();
        // xlsx는 zip 컨테이너
        assert_eq!(&bytes[..4], b"PK\x03\x04");
    }

    #[test]
    fn test_write_xlsx_accepts_empty_table() {
        let bytes = write_xlsx(&[]).unwrap();
        assert!(!bytes.is_empty());
    }
}
