// VecDocs — embedding.rs
// Metric types, vector normalization and scoring.
// Author: d65v <https://github.com/d65v>

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::VecDocsError;

/// Supported similarity metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricType {
    /// Squared Euclidean distance (lower = closer)
    L2,
    /// Inner product (higher = closer)
    IP,
    /// Cosine similarity (higher = closer)
    Cosine,
}

impl MetricType {
    /// True when a larger score means a closer match.
    pub fn higher_is_better(&self) -> bool {
        !matches!(self, MetricType::L2)
    }

    /// Order two scores so that the better one sorts first.
    pub fn rank(&self, a: f32, b: f32) -> Ordering {
        let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
        if self.higher_is_better() {
            ord.reverse()
        } else {
            ord
        }
    }

    /// Range-search window check.
    ///
    /// For IP / COSINE a hit must satisfy `radius < s <= range_filter`,
    /// for L2 `range_filter <= d < radius`. Either bound may be absent.
    pub fn within_range(&self, score: f32, radius: Option<f32>, range_filter: Option<f32>) -> bool {
        if self.higher_is_better() {
            radius.map_or(true, |r| score > r) && range_filter.map_or(true, |f| score <= f)
        } else {
            radius.map_or(true, |r| score < r) && range_filter.map_or(true, |f| score >= f)
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MetricType::L2 => "L2",
            MetricType::IP => "IP",
            MetricType::Cosine => "COSINE",
        };
        f.write_str(s)
    }
}

impl FromStr for MetricType {
    type Err = VecDocsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L2" => Ok(MetricType::L2),
            "IP" => Ok(MetricType::IP),
            "COSINE" => Ok(MetricType::Cosine),
            other => Err(VecDocsError::InvalidParameter(format!(
                "unknown metric type '{}'",
                other
            ))),
        }
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

/// L2-normalize a vector (in-place copy). Returns a unit vector.
/// If the vector is all-zero, it is returned unchanged.
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let mag = magnitude(v);
    if mag < 1e-10 {
        return v.to_vec();
    }
    v.iter().map(|x| x / mag).collect()
}

/// Compute the L2 (Euclidean) magnitude (norm) of a vector.
#[inline]
pub fn magnitude(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

// ── Similarity / Distance ─────────────────────────────────────────────────────

/// Dot product of two equal-length vectors.
#[inline]
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let na = normalize(a);
    let nb = normalize(b);
    dot(&na, &nb).clamp(-1.0, 1.0)
}

/// Squared Euclidean distance. This is what an L2 search reports.
pub fn euclidean_distance_sq(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Score a candidate against a query under `metric`.
/// Use [`MetricType::rank`] to order the results.
pub fn score(metric: MetricType, query: &[f32], candidate: &[f32]) -> f32 {
    match metric {
        MetricType::L2 => euclidean_distance_sq(query, candidate),
        MetricType::IP => dot(query, candidate),
        MetricType::Cosine => cosine_similarity(query, candidate),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_vector() {
        let v = vec![3.0f32, 4.0];
        let n = normalize(&v);
        let mag = magnitude(&n);
        assert!((mag - 1.0).abs() < 1e-6, "magnitude should be ~1.0");
    }

    #[test]
    fn test_normalize_zero_vector() {
        let v = vec![0.0f32, 0.0, 0.0];
        let n = normalize(&v);
        assert_eq!(n, v, "zero vector should be returned unchanged");
    }

    #[test]
    fn test_cosine_orthogonal() {
        let s = cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]);
        assert!(s.abs() < 1e-6);
    }

    #[test]
    fn test_l2_is_squared() {
        let d = score(MetricType::L2, &[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - 25.0).abs() < 1e-5);
    }

    #[test]
    fn test_rank_direction() {
        assert_eq!(MetricType::IP.rank(0.9, 0.1), Ordering::Less);
        assert_eq!(MetricType::L2.rank(0.9, 0.1), Ordering::Greater);
    }

    #[test]
    fn test_within_range() {
        assert!(MetricType::IP.within_range(0.9, Some(0.8), Some(1.0)));
        assert!(!MetricType::IP.within_range(0.8, Some(0.8), Some(1.0)));
        assert!(MetricType::L2.within_range(0.9, Some(1.0), Some(0.8)));
        assert!(!MetricType::L2.within_range(1.0, Some(1.0), Some(0.8)));
        assert!(MetricType::Cosine.within_range(-1.0, None, None));
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("cosine".parse::<MetricType>().unwrap(), MetricType::Cosine);
        assert_eq!("L2".parse::<MetricType>().unwrap(), MetricType::L2);
        assert!("HAMMING".parse::<MetricType>().is_err());
        assert_eq!(MetricType::Cosine.to_string(), "COSINE");
    }
}
