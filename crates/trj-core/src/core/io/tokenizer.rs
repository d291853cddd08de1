use thiserror::Error;

/// A field that could not be converted to a number.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid number '{value}'")]
pub struct InvalidNumber {
    pub value: String,
}

/// Iterates over the non-empty fields of `line` separated by `sep`.
///
/// Runs of separators never produce empty fields. A whitespace separator splits on any
/// whitespace run, which also absorbs tabs and trailing `\r`.
pub fn fields(line: &str, sep: char) -> impl Iterator<Item = &str> {
    let whitespace = sep.is_whitespace();
    line.split(move |c: char| if whitespace { c.is_whitespace() } else { c == sep })
        .map(str::trim)
        .filter(|field| !field.is_empty())
}

/// Splits `line` into string tokens.
pub fn split_tokens(line: &str, sep: char) -> Vec<String> {
    fields(line, sep).map(str::to_string).collect()
}

/// Splits `line` and converts every field to `f64`.
///
/// # Errors
///
/// Returns [`InvalidNumber`] for the first field that does not parse; callers attach the
/// line number.
pub fn split_numeric(line: &str, sep: char) -> Result<Vec<f64>, InvalidNumber> {
    fields(line, sep).map(parse_f64).collect()
}

pub(crate) fn parse_f64(field: &str) -> Result<f64, InvalidNumber> {
    field.parse::<f64>().map_err(|_| InvalidNumber {
        value: field.to_string(),
    })
}

/// `2^63`, the first float beyond the `i64` range.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Parses an integer field. Float spellings (`3.0`, `1e3`) are truncated toward zero;
/// non-finite values and values outside the `i64` range are rejected.
pub(crate) fn parse_i64(field: &str) -> Result<i64, InvalidNumber> {
    let field = field.trim();
    if let Ok(value) = field.parse::<i64>() {
        return Ok(value);
    }
    let value = parse_f64(field)?.trunc();
    if (-I64_LIMIT..I64_LIMIT).contains(&value) {
        Ok(value as i64)
    } else {
        Err(InvalidNumber {
            value: field.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consecutive_separators_yield_no_empty_fields() {
        assert_eq!(
            split_numeric("  1   2\t0.5  0.25 0.125 \r", ' ').unwrap(),
            vec![1.0, 2.0, 0.5, 0.25, 0.125]
        );
        assert_eq!(split_numeric("1,,2, 3,", ',').unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn empty_line_yields_no_fields() {
        assert!(split_numeric("", ' ').unwrap().is_empty());
        assert!(split_tokens("   ", ' ').is_empty());
    }

    #[test]
    fn split_tokens_keeps_strings() {
        assert_eq!(split_tokens("id type xs ys zs", ' '), vec!["id", "type", "xs", "ys", "zs"]);
    }

    #[test]
    fn malformed_field_is_reported() {
        let err = split_numeric("1 1 abc 0.5 0.5", ' ').unwrap_err();
        assert_eq!(err.value, "abc");
    }

    #[test]
    fn scientific_notation_parses() {
        assert_eq!(split_numeric("1e-3 -2.5E2", ' ').unwrap(), vec![0.001, -250.0]);
    }

    #[test]
    fn integers_truncate_float_spellings() {
        assert_eq!(parse_i64("42"), Ok(42));
        assert_eq!(parse_i64("3.0"), Ok(3));
        assert_eq!(parse_i64("1e3"), Ok(1000));
        assert_eq!(parse_i64("2.9"), Ok(2));
        assert_eq!(parse_i64("-2.9"), Ok(-2));
        assert!(parse_i64("nan").is_err());
        assert!(parse_i64("inf").is_err());
        assert!(parse_i64("x").is_err());
    }

    #[test]
    fn integers_outside_i64_range_are_rejected() {
        assert_eq!(parse_i64("-9223372036854775808"), Ok(i64::MIN));
        assert_eq!(parse_i64("-9.223372036854775808e18"), Ok(i64::MIN));
        for field in ["99999999999999999999", "1e30", "-1e19", "9.223372036854775808e18"] {
            assert_eq!(
                parse_i64(field),
                Err(InvalidNumber {
                    value: field.to_string()
                })
            );
        }
    }
}
