use std::cmp::Ordering;

use crate::models::MovieId;

pub mod metrics;
pub mod validation;

pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot_product / (norm_a * norm_b)
    }
}

pub fn normalize_vector(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

/// Selects the `k` highest-scoring candidates. Ties are broken by catalog
/// position so the same inputs always produce the same ranking.
pub fn top_k_by_score(
    mut candidates: Vec<(MovieId, f32, usize)>,
    k: usize,
) -> Vec<(MovieId, f32)> {
    candidates.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then(a.2.cmp(&b.2))
    });
    candidates.truncate(k);
    candidates.into_iter().map(|(id, score, _)| (id, score)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);

        let a = vec![1.0, 1.0];
        let b = vec![1.0, 1.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_zero_vector() {
        let zero = vec![0.0, 0.0];
        let b = vec![1.0, 1.0];
        assert_eq!(cosine_similarity(&zero, &b), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_normalize_vector() {
        let mut v = vec![3.0, 4.0];
        normalize_vector(&mut v);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);

        let mut zero = vec![0.0, 0.0];
        normalize_vector(&mut zero);
        assert_eq!(zero, vec![0.0, 0.0]);
    }

    #[test]
    fn test_top_k_by_score() {
        let candidates = vec![(1, 0.1, 0), (2, 0.5, 1), (3, 0.3, 2), (4, 0.9, 3)];
        let top_2 = top_k_by_score(candidates, 2);
        assert_eq!(top_2, vec![(4, 0.9), (2, 0.5)]);
    }

    #[test]
    fn test_top_k_tie_break_is_catalog_order() {
        let candidates = vec![(7, 0.5, 4), (3, 0.5, 1), (9, 0.5, 2)];
        let top = top_k_by_score(candidates, 3);
        assert_eq!(top, vec![(3, 0.5), (9, 0.5), (7, 0.5)]);
    }
}
