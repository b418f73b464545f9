//! Spreadsheet column addressing (`A`, `B`, ..., `Z`, `AA`, ...).
//!
//! Column identifiers are bijective base-26 numerals: the digits run from
//! 1 (`A`) to 26 (`Z`) and there is no zero digit.

use crate::utils::error::{Result, ScrapeError};

pub const ALPHABET_LENGTH: usize = 26;

/// 將 1 起算的欄位序號轉成試算表欄位字母
pub fn column_letters(index: usize) -> Result<String> {
    if index == 0 {
        return Err(ScrapeError::InvalidColumn { index });
    }

    let mut letters = Vec::new();
    let mut n = index;
    while n > 0 {
        let digit = (n - 1) % ALPHABET_LENGTH;
        letters.push(b'A' + digit as u8);
        n = (n - digit) / ALPHABET_LENGTH;
    }
    letters.reverse();

    Ok(letters.into_iter().map(char::from).collect())
}

/// Parses column letters back into a 1-based index. Lowercase is accepted.
pub fn column_number(letters: &str) -> Result<usize> {
    let invalid = || ScrapeError::InvalidColumnLetters {
        letters: letters.to_string(),
    };

    if letters.is_empty() {
        return Err(invalid());
    }

    letters.bytes().try_fold(0usize, |acc, b| {
        if !b.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = (b.to_ascii_uppercase() - b'A') as usize + 1;
        acc.checked_mul(ALPHABET_LENGTH)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(invalid)
    })
}

pub fn cell_reference(row: usize, col: usize) -> Result<String> {
    if row == 0 {
        return Err(ScrapeError::InvalidRow { row });
    }
    Ok(format!("{}{}", column_letters(col)?, row))
}

/// `C9:C20` style range covering `row_start..=row_end` of one column.
pub fn range_reference(row_start: usize, row_end: usize, col: usize) -> Result<String> {
    if row_end < row_start {
        return Err(ScrapeError::data_shape(format!(
            "range end row {} is before start row {}",
            row_end, row_start
        )));
    }
    Ok(format!(
        "{}:{}",
        cell_reference(row_start, col)?,
        cell_reference(row_end, col)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn test_known_columns() {
        assert_eq!(column_letters(1).unwrap(), "A");
        assert_eq!(column_letters(26).unwrap(), "Z");
        assert_eq!(column_letters(27).unwrap(), "AA");
        assert_eq!(column_letters(52).unwrap(), "AZ");
        assert_eq!(column_letters(53).unwrap(), "BA");
        assert_eq!(column_letters(702).unwrap(), "ZZ");
        assert_eq!(column_letters(703).unwrap(), "AAA");
        assert_eq!(column_letters(16384).unwrap(), "XFD");
    }

    #[test]
    fn test_zero_column_rejected() {
        assert!(matches!(
            column_letters(0),
            Err(ScrapeError::InvalidColumn { index: 0 })
        ));
        assert_err!(cell_reference(9, 0));
    }

    #[test]
    fn test_round_trip() {
        for n in 1..=10_000 {
            let letters = column_letters(n).unwrap();
            assert_eq!(column_number(&letters).unwrap(), n, "letters {}", letters);
        }
    }

    #[test]
    fn test_column_number_rejects_garbage() {
        assert_err!(column_number(""));
        assert_err!(column_number("A1"));
        assert_err!(column_number("Ä"));
        assert_err!(column_number(&"Z".repeat(64)));
        assert_eq!(column_number("ab").unwrap(), 28);
    }

    #[test]
    fn test_cell_and_range_reference() {
        assert_eq!(cell_reference(9, 3).unwrap(), "C9");
        assert_eq!(range_reference(9, 20, 3).unwrap(), "C9:C20");
        assert_eq!(range_reference(9, 9, 2).unwrap(), "B9:B9");
        assert_ok!(range_reference(1, 1, 28));
        assert_err!(range_reference(10, 9, 2));
        assert_err!(cell_reference(0, 2));
    }
}
