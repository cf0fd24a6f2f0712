use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use crate::dataset::store::{Dataset, TrainingExample};

/// Shuffles `examples` with a seeded generator and holds the first
/// `validation_size` out for validation.
///
/// The same seed and input order always produce the same split. A
/// `validation_size` larger than the corpus puts everything in validation.
pub fn split_train_validation(
    mut examples: Vec<TrainingExample>,
    validation_size: usize,
    seed: u64,
) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    examples.shuffle(&mut rng);

    let cut = validation_size.min(examples.len());
    let train = examples.split_off(cut);
    debug!(train = train.len(), validation = examples.len(), seed, "split dataset");

    Dataset {
        train,
        validation: examples,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn examples(n: usize) -> Vec<TrainingExample> {
        (0..n)
            .map(|i| TrainingExample {
                key: format!("doc{i:03}"),
                text: "A".to_string(),
                labels: vec![0],
            })
            .collect()
    }

    #[test]
    fn test_split_sizes() {
        let dataset = split_train_validation(examples(10), 3, 7);
        assert_eq!(dataset.validation.len(), 3);
        assert_eq!(dataset.train.len(), 7);
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = split_train_validation(examples(20), 5, 42);
        let b = split_train_validation(examples(20), 5, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_split_keeps_every_example_once() {
        let dataset = split_train_validation(examples(12), 4, 1);
        let mut keys: Vec<_> = dataset
            .train
            .iter()
            .chain(&dataset.validation)
            .map(|e| e.key.clone())
            .collect();
        keys.sort();
        let expected: Vec<_> = examples(12).into_iter().map(|e| e.key).collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_oversized_validation() {
        let dataset = split_train_validation(examples(2), 5, 0);
        assert!(dataset.train.is_empty());
        assert_eq!(dataset.validation.len(), 2);
    }
}
