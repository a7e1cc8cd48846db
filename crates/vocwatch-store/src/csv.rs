//! Minimal comma-separated codec for the dataset file.
//!
//! Quote-aware and CRLF-tolerant on the way in; quotes only where a field
//! needs it on the way out. Kept std-only: the dataset is one small flat
//! file with a fixed six-column schema.

use std::mem::take;

/// Parse CSV text into rows of fields.
///
/// Handles quoted fields with doubled-quote escapes and both LF and CRLF
/// line endings. Blank lines are dropped. An unterminated quote at EOF
/// flushes whatever was accumulated rather than erroring: the caller decides
/// what a malformed row means.
pub(crate) fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' => {
                if in_quotes {
                    if matches!(chars.peek(), Some('"')) {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                } else {
                    in_quotes = true;
                }
            }
            ',' if !in_quotes => row.push(take(&mut field)),
            '\n' | '\r' if !in_quotes => {
                if ch == '\r' && matches!(chars.peek(), Some('\n')) {
                    chars.next();
                }
                row.push(take(&mut field));
                if row.len() > 1 || !row[0].is_empty() {
                    rows.push(take(&mut row));
                } else {
                    row.clear();
                }
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !row.is_empty() {
        row.push(field);
        rows.push(row);
    }

    rows
}

fn needs_quotes(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

/// Append one CSV row to `out`, quoting fields that require it.
pub(crate) fn write_row(out: &mut String, row: &[&str]) {
    let mut first = true;
    for cell in row {
        if !first {
            out.push(',');
        }
        first = false;
        if needs_quotes(cell) {
            out.push('"');
            out.push_str(&cell.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(cell);
        }
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_rows() {
        let rows = parse_rows("a,b,c\nd,e,f\n");
        assert_eq!(rows, vec![vec!["a", "b", "c"], vec!["d", "e", "f"]]);
    }

    #[test]
    fn parse_quoted_field_with_comma_and_quote() {
        let rows = parse_rows("\"충전기, 고장\",\"he said \"\"hi\"\"\"\n");
        assert_eq!(rows, vec![vec!["충전기, 고장", "he said \"hi\""]]);
    }

    #[test]
    fn parse_tolerates_crlf_and_blank_lines() {
        let rows = parse_rows("a,b\r\n\r\nc,d\r\n");
        assert_eq!(rows, vec![vec!["a", "b"], vec!["c", "d"]]);
    }

    #[test]
    fn parse_keeps_newline_inside_quotes() {
        let rows = parse_rows("\"two\nlines\",x\n");
        assert_eq!(rows, vec![vec!["two\nlines", "x"]]);
    }

    #[test]
    fn parse_flushes_trailing_row_without_newline() {
        let rows = parse_rows("a,b");
        assert_eq!(rows, vec![vec!["a", "b"]]);
    }

    #[test]
    fn write_row_quotes_only_when_needed() {
        let mut out = String::new();
        write_row(&mut out, &["plain", "with,comma", "with\"quote"]);
        assert_eq!(out, "plain,\"with,comma\",\"with\"\"quote\"\n");
    }

    #[test]
    fn write_then_parse_preserves_korean_text() {
        let mut out = String::new();
        write_row(&mut out, &["테슬라, 전기차", "일렉링크 후기"]);
        let rows = parse_rows(&out);
        assert_eq!(rows, vec![vec!["테슬라, 전기차", "일렉링크 후기"]]);
    }
}
