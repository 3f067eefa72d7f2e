// Intra-group cosine distance.
//
// For a group of feature vectors we take the cosine distance of every
// unordered pair and average it. Norms are computed once per member, then
// each pair costs a single dot product.
//
// Cosine similarity is clamped to [0, 1] before it becomes a distance, so
// vectors pointing in opposite directions count as maximally distant (1.0)
// rather than 2.0. That keeps every emitted value inside [0, 1].
//
// Vectors are divided by their largest absolute component before any
// squaring. Cosine is scale-invariant, and the rescaled components sit in
// [-1, 1], so neither 1e200 nor 1e-200 inputs overflow or underflow.

use super::error::{AnalysisError, Result};

/// Cosine similarity between two equal-length vectors, clamped to [0, 1].
///
/// Returns `None` when either vector is zero-length or all zeros, since the
/// angle is undefined there.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> Option<f64> {
    let ua = unit_vector(a)?;
    let ub = unit_vector(b)?;
    Some(dot(&ua, &ub).clamp(0.0, 1.0))
}

/// `1 - cosine_similarity`, in [0, 1]. `None` for degenerate vectors.
pub fn cosine_distance(a: &[f64], b: &[f64]) -> Option<f64> {
    cosine_similarity(a, b).map(|s| 1.0 - s)
}

/// Mean cosine distance over all unordered pairs of `members` (row indices
/// into `matrix`).
///
/// A group with fewer than two members has no pairs; it scores 1.0 no
/// matter what its vector looks like. Otherwise every member must have a
/// non-zero component or the whole computation fails with `DegenerateVector`.
pub fn mean_pairwise_distance(matrix: &[Vec<f64>], members: &[usize]) -> Result<f64> {
    if members.len() < 2 {
        return Ok(1.0);
    }

    let units = members
        .iter()
        .map(|&row| unit_vector(&matrix[row]).ok_or(AnalysisError::DegenerateVector { row }))
        .collect::<Result<Vec<Vec<f64>>>>()?;

    let mut total = 0.0_f64;
    let mut pairs = 0_usize;
    for i in 0..units.len() {
        for j in (i + 1)..units.len() {
            total += 1.0 - dot(&units[i], &units[j]).clamp(0.0, 1.0);
            pairs += 1;
        }
    }

    Ok((total / pairs as f64).clamp(0.0, 1.0))
}

/// `v / |v|`, computed on `v / max|v_i|` so the norm stays representable.
/// `None` for an empty or all-zero vector.
fn unit_vector(v: &[f64]) -> Option<Vec<f64>> {
    let max_abs = v.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
    if max_abs == 0.0 {
        return None;
    }
    let scaled: Vec<f64> = v.iter().map(|x| x / max_abs).collect();
    // at least one component is exactly +-1, so norm >= 1
    let norm = dot(&scaled, &scaled).sqrt();
    Some(scaled.into_iter().map(|x| x / norm).collect())
}

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_and_proportional() {
        assert!((cosine_similarity(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]).unwrap() - 1.0).abs() < 1e-12);
        assert!(cosine_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal_distance_is_one() {
        let d = cosine_distance(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_opposite_clamps() {
        let d = cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((d - 1.0).abs() < 1e-12, "opposite vectors clamp to 1.0, got {d}");
    }

    #[test]
    fn test_cosine_zero_vector_is_none() {
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]).is_none());
        assert!(cosine_similarity(&[], &[]).is_none());
    }

    #[test]
    fn test_mean_singleton_is_one() {
        let m = vec![vec![0.001, 0.0], vec![500.0, 3.0]];
        assert_eq!(mean_pairwise_distance(&m, &[0]).unwrap(), 1.0);
        assert_eq!(mean_pairwise_distance(&m, &[1]).unwrap(), 1.0);
    }

    #[test]
    fn test_mean_singleton_zero_vector_still_one() {
        let m = vec![vec![0.0, 0.0]];
        assert_eq!(mean_pairwise_distance(&m, &[0]).unwrap(), 1.0);
    }

    #[test]
    fn test_mean_over_three_members() {
        // pairs: (a,b) orthogonal = 1, (a,c) identical = 0, (b,c) orthogonal = 1
        let m = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![2.0, 0.0]];
        let mean = mean_pairwise_distance(&m, &[0, 1, 2]).unwrap();
        assert!((mean - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_only_uses_members() {
        let m = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![3.0, 0.0]];
        let mean = mean_pairwise_distance(&m, &[0, 2]).unwrap();
        assert!(mean.abs() < 1e-12);
    }

    #[test]
    fn test_mean_zero_vector_is_degenerate() {
        let m = vec![vec![1.0, 0.0], vec![0.0, 0.0]];
        assert_eq!(
            mean_pairwise_distance(&m, &[0, 1]),
            Err(AnalysisError::DegenerateVector { row: 1 })
        );
    }

    #[test]
    fn test_huge_components_do_not_overflow() {
        let m = vec![vec![1e200, 1e200], vec![1e200, 0.0]];
        let mean = mean_pairwise_distance(&m, &[0, 1]).unwrap();
        let expected = 1.0 - 1.0 / 2.0_f64.sqrt();
        assert!((mean - expected).abs() < 1e-12, "got {mean}");

        let d = cosine_distance(&[f64::MAX, f64::MAX], &[f64::MAX, -f64::MAX]).unwrap();
        assert!((d - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_tiny_components_are_not_degenerate() {
        let m = vec![vec![1e-200, 1e-200], vec![1e-200, 0.0]];
        let mean = mean_pairwise_distance(&m, &[0, 1]).unwrap();
        let expected = 1.0 - 1.0 / 2.0_f64.sqrt();
        assert!((mean - expected).abs() < 1e-12, "got {mean}");

        let sim = cosine_similarity(&[5e-324, 0.0], &[5e-324, 0.0]).unwrap();
        assert!((sim - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_mean_zero_length_is_degenerate() {
        let m = vec![vec![], vec![]];
        assert!(matches!(
            mean_pairwise_distance(&m, &[0, 1]),
            Err(AnalysisError::DegenerateVector { row: 0 })
        ));
    }
}
