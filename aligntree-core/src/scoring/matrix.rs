//! Score table file formats
//!
//! Two layouts are understood:
//!
//! * a dictionary literal keyed by symbol tuples,
//!   `{('A', 'A'): 4, ('A', 'R'): -1}`;
//! * the NCBI matrix layout used by BLOSUM/PAM files: `#` comments, a header
//!   row of column symbols, then one row per symbol.

use regex::Regex;
use std::collections::HashMap;

use super::ScoreTable;
use crate::error::{AlignError, Result};
use crate::types::Symbol;

/// Parse either layout, detected by the first non-blank, non-comment character.
pub fn parse_table(content: &str) -> Result<ScoreTable> {
    let first = content
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('#'));

    match first {
        Some(line) if line.starts_with('{') => parse_dict_literal(content),
        Some(_) => parse_ncbi(content),
        None => Err(AlignError::malformed(1, "score table is empty")),
    }
}

/// Parse a dictionary literal such as `{('A', 'A'): 4, ('A', 'C'): -2}`.
pub fn parse_dict_literal(content: &str) -> Result<ScoreTable> {
    let entry = Regex::new(r#"\(\s*['"](.)['"]\s*,\s*['"](.)['"]\s*\)\s*:\s*([+-]?\d+)"#)
        .map_err(|e| AlignError::malformed(0, e.to_string()))?;

    let open = content.find('{').unwrap_or(0);
    let preamble_ok = content[..open]
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'));
    if !preamble_ok || !content[open..].starts_with('{') || !content.trim_end().ends_with('}') {
        return Err(AlignError::malformed(
            line_of(content, open),
            "expected a dictionary enclosed in braces",
        ));
    }
    let close = content.rfind('}').unwrap_or(content.len());
    let body_start = open + 1;
    let body = &content[body_start..close];

    let mut scores = HashMap::new();
    let mut cursor = 0;
    for caps in entry.captures_iter(body) {
        let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((cursor, cursor));
        check_separator(content, body_start + cursor, &body[cursor..whole.0], scores.is_empty())?;

        let line = line_of(content, body_start + whole.0);
        let a = ascii_symbol(&caps[1], line)?;
        let b = ascii_symbol(&caps[2], line)?;
        let score: i32 = caps[3]
            .parse()
            .map_err(|_| AlignError::malformed(line, format!("score out of range: {}", &caps[3])))?;
        scores.insert((a, b), score);
        cursor = whole.1;
    }

    let rest = &body[cursor..];
    let tail = rest.trim();
    if !tail.is_empty() && tail != "," {
        return Err(AlignError::malformed(
            line_of(content, body_start + cursor + first_token(rest)),
            format!("unexpected content: {}", truncate(tail)),
        ));
    }
    if scores.is_empty() {
        return Err(AlignError::malformed(line_of(content, open), "dictionary has no entries"));
    }

    log::debug!("Parsed {} dictionary score entries", scores.len());
    Ok(ScoreTable::from_pairs(scores))
}

/// Parse an NCBI-style square matrix.
pub fn parse_ncbi(content: &str) -> Result<ScoreTable> {
    let mut columns: Option<Vec<Symbol>> = None;
    let mut table = ScoreTable::new();
    let mut rows = 0;

    for (index, raw) in content.lines().enumerate() {
        let line_num = index + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match &columns {
            None => {
                let header = tokens
                    .iter()
                    .map(|t| ascii_symbol(t, line_num))
                    .collect::<Result<Vec<_>>>()?;
                columns = Some(header);
            }
            Some(header) => {
                let row_symbol = ascii_symbol(tokens[0], line_num)?;
                let values = &tokens[1..];
                if values.len() != header.len() {
                    return Err(AlignError::malformed(
                        line_num,
                        format!(
                            "row '{}' has {} scores, header has {} columns",
                            row_symbol as char,
                            values.len(),
                            header.len()
                        ),
                    ));
                }
                for (&col_symbol, value) in header.iter().zip(values) {
                    let score: i32 = value.parse().map_err(|_| {
                        AlignError::malformed(line_num, format!("invalid score: {}", value))
                    })?;
                    table.insert(row_symbol, col_symbol, score);
                }
                rows += 1;
            }
        }
    }

    if rows == 0 {
        return Err(AlignError::malformed(content.lines().count().max(1), "matrix has no score rows"));
    }
    log::debug!("Parsed NCBI matrix with {} rows", rows);
    Ok(table)
}

fn check_separator(content: &str, offset: usize, gap_raw: &str, first: bool) -> Result<()> {
    let gap = gap_raw.trim();
    let ok = if first { gap.is_empty() } else { gap == "," };
    if ok {
        Ok(())
    } else {
        Err(AlignError::malformed(
            line_of(content, offset + first_token(gap_raw)),
            format!("unexpected content between entries: {}", truncate(gap)),
        ))
    }
}

/// Byte offset of the first character that is neither whitespace nor a comma.
fn first_token(text: &str) -> usize {
    text.find(|c: char| !c.is_whitespace() && c != ',').unwrap_or(0)
}

fn ascii_symbol(token: &str, line: usize) -> Result<Symbol> {
    match token.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(AlignError::malformed(line, format!("not a single ASCII symbol: {}", token))),
    }
}

fn line_of(content: &str, offset: usize) -> usize {
    content[..offset.min(content.len())].matches('\n').count() + 1
}

fn truncate(text: &str) -> String {
    text.chars().take(20).collect()
}
