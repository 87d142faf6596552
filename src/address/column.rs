//! Spreadsheet column letters <-> 1-based column numbers (`A` = 1, `Z` = 26, `AA` = 27).

/// Convert column letters (case-insensitive) to a 1-based column number.
///
/// Returns `None` for an empty string, a non-letter character, or overflow.
pub fn column_number(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    letters.chars().try_fold(0usize, |acc, c| {
        let digit = letter_value(c)?;
        acc.checked_mul(26)?.checked_add(digit)
    })
}

/// Convert a 1-based column number to column letters. `0` yields an empty string.
pub fn column_letters(mut number: usize) -> String {
    let mut out = Vec::new();
    while number > 0 {
        let rem = (number - 1) % 26;
        out.push(b'A' + rem as u8);
        number = (number - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

/// Value of one column letter, `A`/`a` = 1.
pub(crate) fn letter_value(c: char) -> Option<usize> {
    let c = c.to_ascii_uppercase();
    c.is_ascii_uppercase().then(|| (c as u8 - b'A') as usize + 1)
}
