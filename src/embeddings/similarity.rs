//! Similarity metrics for embeddings

/// Compute cosine similarity between two embedding vectors
///
/// Returns a value between -1.0 and 1.0, where:
/// - 1.0 = identical direction
/// - 0.0 = orthogonal vectors
/// - -1.0 = opposite vectors
///
/// # Panics
/// Panics if vectors have different dimensions
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(
        a.len(),
        b.len(),
        "Vectors must have same dimension: {} vs {}",
        a.len(),
        b.len()
    );

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    // rounding can push |cos| a hair past 1
    (dot_product / (magnitude_a * magnitude_b)).clamp(-1.0, 1.0)
}

/// Index and value of the maximum; the first index wins exact ties
pub fn argmax(values: &[f32]) -> Option<(usize, f32)> {
    values.iter().copied().enumerate().fold(None, |best, (i, v)| match best {
        Some((_, top)) if v <= top => best,
        _ => Some((i, v)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cosine_similarity_identical() {
        let a = vec![1.0, 2.0, 3.0];
        assert_relative_eq!(cosine_similarity(&a, &a), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert_relative_eq!(cosine_similarity(&a, &b), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_opposite() {
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![-1.0, -2.0, -3.0];
        assert_relative_eq!(cosine_similarity(&a, &b), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_cosine_similarity_stays_in_range() {
        let vectors = [
            vec![0.1, 0.2, 0.3],
            vec![1e-3, 7.0, -2.0],
            vec![-5.0, 0.0, 5.0],
            vec![0.0, 0.0, 0.0],
            vec![3.3, 3.3, 3.3],
        ];
        for a in &vectors {
            for b in &vectors {
                let sim = cosine_similarity(a, b);
                assert!((-1.0..=1.0).contains(&sim), "{} out of range", sim);
            }
        }
    }

    #[test]
    fn test_argmax_first_wins_ties() {
        assert_eq!(argmax(&[0.2, 0.9, 0.9, 0.1]), Some((1, 0.9)));
        assert_eq!(argmax(&[]), None);
        assert_eq!(argmax(&[-1.0]), Some((0, -1.0)));
    }

    #[test]
    #[should_panic(expected = "Vectors must have same dimension")]
    fn test_cosine_similarity_different_dimensions() {
        let a = vec![1.0, 2.0];
        let b = vec![1.0, 2.0, 3.0];
        cosine_similarity(&a, &b);
    }
}
