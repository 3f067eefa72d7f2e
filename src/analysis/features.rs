// Feature vector parsing.
//
// Each input row carries its feature vector as a comma-separated string
// ("0.12, -3.4, 5e-2"). Parsing turns every row into a Vec<f64> and checks
// that all rows share one dimension, so the similarity and projection
// stages can treat the result as a dense matrix.

use std::collections::HashMap;

use super::error::{AnalysisError, Result};
use crate::db::models::RawVideoRow;

/// Parse one comma-separated vector string.
///
/// Whitespace around tokens is ignored. An empty (or whitespace-only)
/// string is a zero-length vector; the similarity stage rejects it later
/// as degenerate. Non-numeric and non-finite tokens are errors.
pub fn parse_vector(raw: &str) -> std::result::Result<Vec<f64>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .enumerate()
        .map(|(i, token)| {
            let token = token.trim();
            let value: f64 = token
                .parse()
                .map_err(|_| format!("component {i} is not a number: {token:?}"))?;
            if !value.is_finite() {
                return Err(format!("component {i} is not finite: {token:?}"));
            }
            Ok(value)
        })
        .collect()
}

/// Parse every row's feature vector and validate that all share a dimension.
///
/// The expected dimension is the most common row length (ties go to the
/// length seen first), so a single short or long row is the one reported
/// regardless of where it sits in the table.
pub fn parse_feature_matrix(rows: &[RawVideoRow]) -> Result<Vec<Vec<f64>>> {
    let vectors = rows
        .iter()
        .enumerate()
        .map(|(row, r)| {
            parse_vector(&r.feature_vector).map_err(|reason| AnalysisError::MalformedInput {
                row,
                content_id: r.content_id.clone(),
                reason,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let Some(expected) = modal_length(&vectors) else {
        return Ok(vectors);
    };

    if let Some((row, v)) = vectors
        .iter()
        .enumerate()
        .find(|(_, v)| v.len() != expected)
    {
        return Err(AnalysisError::MalformedInput {
            row,
            content_id: rows[row].content_id.clone(),
            reason: format!("expected {expected} components, found {}", v.len()),
        });
    }

    Ok(vectors)
}

/// Most common vector length; ties resolve to the earliest-seen length.
fn modal_length(vectors: &[Vec<f64>]) -> Option<usize> {
    let mut counts: HashMap<usize, usize> = HashMap::new();
    let mut first_seen: Vec<usize> = Vec::new();
    for v in vectors {
        let count = counts.entry(v.len()).or_insert(0);
        if *count == 0 {
            first_seen.push(v.len());
        }
        *count += 1;
    }

    // max_by_key keeps the last maximum, so walk in reverse to favour the first
    first_seen
        .into_iter()
        .rev()
        .max_by_key(|len| counts[len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, vector: &str) -> RawVideoRow {
        RawVideoRow {
            content_id: id.to_string(),
            actual_label: "news".to_string(),
            predicted_label: "news".to_string(),
            tvshow: "X".to_string(),
            feature_vector: vector.to_string(),
        }
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert_eq!(parse_vector("1, 2, 3").unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(parse_vector("  1.5,-2 ,3e1 ").unwrap(), vec![1.5, -2.0, 30.0]);
    }

    #[test]
    fn test_parse_empty_string_is_zero_length() {
        assert!(parse_vector("").unwrap().is_empty());
        assert!(parse_vector("   ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_rejects_garbage_and_non_finite() {
        assert!(parse_vector("1, abc, 3").is_err());
        assert!(parse_vector("1,,3").is_err());
        assert!(parse_vector("1, NaN").is_err());
        assert!(parse_vector("inf, 1").is_err());
    }

    #[test]
    fn test_matrix_consistent_rows() {
        let rows = vec![row("a", "1, 2, 3"), row("b", "4, 5, 6")];
        let m = parse_feature_matrix(&rows).unwrap();
        assert_eq!(m, vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_matrix_reports_short_row() {
        let rows = vec![row("a", "1, 2, 3"), row("b", "1, 2"), row("c", "7, 8, 9")];
        match parse_feature_matrix(&rows) {
            Err(AnalysisError::MalformedInput { row, content_id, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(content_id, "b");
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_matrix_reports_odd_row_even_when_first() {
        let rows = vec![row("a", "1, 2"), row("b", "1, 2, 3"), row("c", "7, 8, 9")];
        match parse_feature_matrix(&rows) {
            Err(AnalysisError::MalformedInput { row, .. }) => assert_eq!(row, 0),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_matrix_tie_prefers_first_length() {
        let rows = vec![row("a", "1, 2, 3"), row("b", "1, 2")];
        match parse_feature_matrix(&rows) {
            Err(AnalysisError::MalformedInput { row, .. }) => assert_eq!(row, 1),
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_matrix_unparseable_token_names_row() {
        let rows = vec![row("a", "1, 2"), row("b", "1, x")];
        match parse_feature_matrix(&rows) {
            Err(AnalysisError::MalformedInput { row, content_id, reason }) => {
                assert_eq!(row, 1);
                assert_eq!(content_id, "b");
                assert!(reason.contains("not a number"));
            }
            other => panic!("expected MalformedInput, got {other:?}"),
        }
    }
}
