use cellscrub_sheet::CellValue;

/// Parse text that is a plain decimal once trimmed and stripped of thousands
/// separators: an optional `-`, digits, and an optional fraction.
#[must_use]
pub fn parse_plain_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != ',').collect();
    let unsigned = cleaned.strip_prefix('-').unwrap_or(&cleaned);
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(whole) || !fraction.map_or(true, all_digits) {
        return None;
    }
    cleaned.parse().ok()
}

/// Turn numeric-looking text into a number; returns whether the cell changed
pub fn fix_number(cell: &mut CellValue) -> bool {
    let Some(number) = cell.as_text().and_then(parse_plain_number) else {
        return false;
    };
    *cell = CellValue::Number(number);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_plain_number("42"), Some(42.0));
        assert_eq!(parse_plain_number(" -3.5 "), Some(-3.5));
        assert_eq!(parse_plain_number("1,234,567.89"), Some(1_234_567.89));
    }

    #[test]
    fn test_rejects_other_shapes() {
        for text in ["", "-", "1.", ".5", "1e5", "+4", "12abc", "1.2.3", "$5", "--1"] {
            assert_eq!(parse_plain_number(text), None, "{text}");
        }
    }

    #[test]
    fn test_fix_number_cells() {
        let mut cell = CellValue::text("1,000");
        assert!(fix_number(&mut cell));
        assert_eq!(cell, CellValue::Number(1000.0));

        let mut word = CellValue::text("one");
        assert!(!fix_number(&mut word));
        let mut already = CellValue::Number(1.0);
        assert!(!fix_number(&mut already));
    }
}
