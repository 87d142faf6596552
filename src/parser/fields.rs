//! Field tokenizer: splits one line into fields and infers each field's cell type.
//!
//! Quoting is an explicit three-state machine over the bytes of a line:
//!
//! | state               | protector            | separator          | other byte        |
//! |---------------------|----------------------|--------------------|-------------------|
//! | `Unquoted`          | -> `Quoted`          | end field          | append            |
//! | `Quoted`            | -> `MaybeEscapedQuote` | append           | append            |
//! | `MaybeEscapedQuote` | append protector, -> `Quoted` | close, end field | close, append |
//!
//! "close" marks the field as quoted, which forces it to [`Cell::Text`].

use crate::types::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QuoteState {
    Unquoted,
    Quoted,
    /// A protector was seen inside quotes: either the closing quote or the first half of an
    /// escaped (doubled) protector.
    MaybeEscapedQuote,
}

/// What the tokenizer does with the byte that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Append(u8),
    Skip,
    EndField,
}

impl QuoteState {
    pub(crate) fn step(self, byte: u8, separator: u8, protector: u8) -> (QuoteState, Step) {
        use QuoteState::*;
        match self {
            Unquoted if byte == separator => (Unquoted, Step::EndField),
            Unquoted if byte == protector => (Quoted, Step::Skip),
            Unquoted => (Unquoted, Step::Append(byte)),
            Quoted if byte == protector => (MaybeEscapedQuote, Step::Skip),
            Quoted => (Quoted, Step::Append(byte)),
            MaybeEscapedQuote if byte == protector => (Quoted, Step::Append(protector)),
            MaybeEscapedQuote if byte == separator => (Unquoted, Step::EndField),
            MaybeEscapedQuote => (Unquoted, Step::Append(byte)),
        }
    }
}

/// One field of a line, protector characters already removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawField {
    pub(crate) bytes: Vec<u8>,
    /// The last quote transition in this field was a closing one.
    pub(crate) quoted: bool,
}

impl RawField {
    /// Strip one trailing CR and infer the cell type.
    pub(crate) fn into_cell(mut self) -> Cell {
        if self.bytes.last() == Some(&b'\r') {
            self.bytes.pop();
        }
        let text = match String::from_utf8(self.bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        if text.is_empty() || self.quoted {
            return Cell::Text(text);
        }
        match parse_number(&text) {
            Some(value) => Cell::Number(value),
            None => Cell::Text(text),
        }
    }
}

/// Strict full-string float parse. Leading whitespace is skipped, anything trailing is not.
///
/// Accepts decimal literals, `inf`/`nan` spellings and hexadecimal floats such as `0x1.8p3`.
pub(crate) fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0b');
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().or_else(|| parse_hex_float(trimmed))
}

/// `[+-]0x` hex digits with an optional `.` and an optional binary exponent `p[+-]digits`.
fn parse_hex_float(text: &str) -> Option<f64> {
    let (negative, unsigned) = match text.as_bytes().first()? {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let body = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))?;
    let (mantissa, exponent) = match body.find(['p', 'P']) {
        Some(at) => (&body[..at], Some(&body[at + 1..])),
        None => (body, None),
    };
    let (int_digits, frac_digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut value = 0f64;
    for c in int_digits.chars().chain(frac_digits.chars()) {
        value = value * 16.0 + f64::from(c.to_digit(16)?);
    }

    let mut scale = match exponent {
        None => 0i64,
        Some(exp) => {
            let digits = exp.strip_prefix(['+', '-']).unwrap_or(exp);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            // Anything this large already saturates to 0 or infinity.
            exp.parse::<i64>()
                .unwrap_or(if exp.starts_with('-') { -100_000 } else { 100_000 })
        }
    };
    scale = scale.clamp(-100_000, 100_000) - 4 * frac_digits.len() as i64;

    while scale > 1000 {
        value *= 2f64.powi(1000);
        scale -= 1000;
    }
    while scale < -1000 {
        value *= 2f64.powi(-1000);
        scale += 1000;
    }
    value *= 2f64.powi(scale as i32);
    Some(if negative { -value } else { value })
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FieldTokenizer {
    separator: u8,
    protector: u8,
}

impl FieldTokenizer {
    pub(crate) fn new(separator: u8, protector: u8) -> Self {
        Self {
            separator,
            protector,
        }
    }

    pub(crate) fn fields<'a>(&self, line: &'a [u8]) -> Fields<'a> {
        Fields {
            line,
            pos: 0,
            separator: self.separator,
            protector: self.protector,
            done: false,
        }
    }

    /// Number of fields on `line`; escaped protectors do not toggle quoting.
    pub(crate) fn count(&self, line: &[u8]) -> usize {
        let mut state = QuoteState::Unquoted;
        let mut count = 1;
        for &b in line {
            let (next, step) = state.step(b, self.separator, self.protector);
            if step == Step::EndField {
                count += 1;
            }
            state = next;
        }
        count
    }
}

pub(crate) struct Fields<'a> {
    line: &'a [u8],
    pos: usize,
    separator: u8,
    protector: u8,
    done: bool,
}

impl Iterator for Fields<'_> {
    type Item = RawField;

    fn next(&mut self) -> Option<RawField> {
        if self.done {
            return None;
        }
        let mut state = QuoteState::Unquoted;
        let mut field = RawField {
            bytes: Vec::new(),
            quoted: false,
        };

        while let Some(&b) = self.line.get(self.pos) {
            self.pos += 1;
            let (next, step) = state.step(b, self.separator, self.protector);
            match (state, next) {
                (QuoteState::Unquoted, QuoteState::Quoted) => field.quoted = false,
                (QuoteState::MaybeEscapedQuote, QuoteState::Unquoted) => field.quoted = true,
                _ => {}
            }
            state = next;
            match step {
                Step::Append(byte) => field.bytes.push(byte),
                Step::Skip => {}
                Step::EndField => return Some(field),
            }
        }

        // End of line closes any open quote.
        if state != QuoteState::Unquoted {
            field.quoted = true;
        }
        self.done = true;
        Some(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str, sep: u8, prot: u8) -> Vec<(String, bool)> {
        FieldTokenizer::new(sep, prot)
            .fields(line.as_bytes())
            .map(|f| (String::from_utf8(f.bytes).unwrap(), f.quoted))
            .collect()
    }

    fn cells(line: &str) -> Vec<Cell> {
        FieldTokenizer::new(b',', b'"')
            .fields(line.as_bytes())
            .map(RawField::into_cell)
            .collect()
    }

    #[test]
    fn state_transitions() {
        use QuoteState::*;
        let (s, p) = (b',', b'"');
        assert_eq!(Unquoted.step(b',', s, p), (Unquoted, Step::EndField));
        assert_eq!(Unquoted.step(b'"', s, p), (Quoted, Step::Skip));
        assert_eq!(Unquoted.step(b'x', s, p), (Unquoted, Step::Append(b'x')));
        assert_eq!(Quoted.step(b',', s, p), (Quoted, Step::Append(b',')));
        assert_eq!(Quoted.step(b'"', s, p), (MaybeEscapedQuote, Step::Skip));
        assert_eq!(MaybeEscapedQuote.step(b'"', s, p), (Quoted, Step::Append(b'"')));
        assert_eq!(MaybeEscapedQuote.step(b',', s, p), (Unquoted, Step::EndField));
        assert_eq!(MaybeEscapedQuote.step(b'x', s, p), (Unquoted, Step::Append(b'x')));
    }

    #[test]
    fn plain_fields() {
        assert_eq!(
            split("a,b,,c", b',', b'"'),
            vec![
                ("a".into(), false),
                ("b".into(), false),
                ("".into(), false),
                ("c".into(), false)
            ]
        );
        assert_eq!(split("", b',', b'"'), vec![("".into(), false)]);
        assert_eq!(split("a,", b',', b'"').len(), 2);
    }

    #[test]
    fn separator_inside_quotes() {
        assert_eq!(
            split("01/03/2012,\"H (Mar, 12)\",26.75", b',', b'"'),
            vec![
                ("01/03/2012".into(), false),
                ("H (Mar, 12)".into(), true),
                ("26.75".into(), false)
            ]
        );
    }

    #[test]
    fn doubled_protector_is_one_literal() {
        assert_eq!(
            split("\"say \"\"hi\"\"\",x", b',', b'"'),
            vec![("say \"hi\"".into(), true), ("x".into(), false)]
        );
        // Escape at the very start of the quoted text.
        assert_eq!(split("\"\"\"a\"", b',', b'"'), vec![("\"a".into(), true)]);
    }

    #[test]
    fn quotes_in_the_middle_of_a_field() {
        assert_eq!(split("a\"b,c\"d", b',', b'"'), vec![("ab,cd".into(), true)]);
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        assert_eq!(
            split("1,\"a,b", b',', b'"'),
            vec![("1".into(), false), ("a,b".into(), true)]
        );
    }

    #[test]
    fn custom_separator_and_protector() {
        assert_eq!(
            split("01/03/2012;$H (Mar; 12)$;2584", b';', b'$'),
            vec![
                ("01/03/2012".into(), false),
                ("H (Mar; 12)".into(), true),
                ("2584".into(), false)
            ]
        );
    }

    #[test]
    fn count_matches_fields() {
        let tok = FieldTokenizer::new(b',', b'"');
        for line in ["a,b,c", "", "\"a,b\",c", "\"x\"\"\",y,", "a,\"b"] {
            assert_eq!(tok.count(line.as_bytes()), tok.fields(line.as_bytes()).count(), "{line}");
        }
        assert_eq!(tok.count(b"a,b,c,d,e,f"), 6);
    }

    #[test]
    fn type_inference() {
        assert_eq!(
            cells("1,\"1\", 2,2 ,abc,,1e3,-.5,\"\""),
            vec![
                Cell::Number(1.0),
                Cell::Text("1".into()),
                Cell::Number(2.0),
                Cell::Text("2 ".into()),
                Cell::Text("abc".into()),
                Cell::Text("".into()),
                Cell::Number(1000.0),
                Cell::Number(-0.5),
                Cell::Text("".into()),
            ]
        );
    }

    #[test]
    fn trailing_cr_is_stripped_once() {
        assert_eq!(cells("a\r"), vec![Cell::Text("a".into())]);
        assert_eq!(cells("1\r"), vec![Cell::Number(1.0)]);
        assert_eq!(cells("a\r\r"), vec![Cell::Text("a\r".into())]);
        assert_eq!(cells("\"q\"\r"), vec![Cell::Text("q".into())]);
    }

    #[test]
    fn strict_number_parse() {
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("\t7"), Some(7.0));
        assert_eq!(parse_number("7 "), None);
        assert_eq!(parse_number("1e"), None);
        assert_eq!(parse_number("01/03/2012"), None);
        assert_eq!(parse_number(" "), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn hexadecimal_floats() {
        assert_eq!(parse_number("0x10"), Some(16.0));
        assert_eq!(parse_number(" 0XfF"), Some(255.0));
        assert_eq!(parse_number("-0x1.8p1"), Some(-3.0));
        assert_eq!(parse_number("+0x.8"), Some(0.5));
        assert_eq!(parse_number("0x1p-2"), Some(0.25));
        assert_eq!(parse_number("0x1P+4"), Some(16.0));
        assert_eq!(parse_number("0x1p99999999999999999999"), Some(f64::INFINITY));
        for text in ["0x", "0x.", "0x1p", "0x1p+", "0xg", "0x1 ", "1x10", "0x1.2.3"] {
            assert_eq!(parse_number(text), None, "{text:?}");
        }
        assert_eq!(cells("0x10,\"0x10\""), vec![Cell::Number(16.0), Cell::Text("0x10".into())]);
    }
}
