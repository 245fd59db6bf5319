//! Injectable randomness for session draws and option shuffles.
//!
//! Everything random in the engine goes through [`RandomSource`], so tests can
//! pin exact permutations with [`ScriptedRandom`] or reproducible runs with
//! [`SeededRandom`].

use std::collections::VecDeque;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Source of random orderings.
pub trait RandomSource {
    /// Reorders `order` in place, every permutation equally likely.
    fn shuffle_indices(&mut self, order: &mut [usize]);
}

/// Returns a random permutation of `0..len`.
#[must_use]
pub fn permutation<R>(len: usize, rng: &mut R) -> Vec<usize>
where
    R: RandomSource + ?Sized,
{
    let mut order: Vec<usize> = (0..len).collect();
    rng.shuffle_indices(&mut order);
    order
}

/// Shuffles `items` in place using a permutation drawn from `rng`.
pub fn shuffle_in_place<T, R>(items: &mut Vec<T>, rng: &mut R)
where
    R: RandomSource + ?Sized,
{
    let order = permutation(items.len(), rng);
    let mut rank = vec![0; order.len()];
    for (position, &original) in order.iter().enumerate() {
        rank[original] = position;
    }

    let mut keyed: Vec<(usize, T)> = items
        .drain(..)
        .enumerate()
        .map(|(original, item)| (rank[original], item))
        .collect();
    keyed.sort_unstable_by_key(|(position, _)| *position);
    items.extend(keyed.into_iter().map(|(_, item)| item));
}

/// Thread-local OS-seeded generator. The default for real sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn shuffle_indices(&mut self, order: &mut [usize]) {
        order.shuffle(&mut rand::rng());
    }
}

/// Deterministic generator for reproducible runs.
#[derive(Debug, Clone)]
pub struct SeededRandom(StdRng);

impl SeededRandom {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl RandomSource for SeededRandom {
    fn shuffle_indices(&mut self, order: &mut [usize]) {
        order.shuffle(&mut self.0);
    }
}

/// Replays a fixed list of Fisher–Yates draws, so tests can name an exact
/// permutation.
///
/// For `i` from the last position down to 1, the next draw picks the slot
/// swapped with `i`. Draws larger than `i` are clamped to `i`. Once the script
/// is exhausted every draw returns `i`, leaving the remaining prefix untouched.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRandom {
    script: VecDeque<usize>,
}

impl ScriptedRandom {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = usize>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// A source that never reorders anything.
    #[must_use]
    pub fn identity() -> Self {
        Self::default()
    }
}

impl RandomSource for ScriptedRandom {
    fn shuffle_indices(&mut self, order: &mut [usize]) {
        for i in (1..order.len()).rev() {
            let j = self.script.pop_front().map_or(i, |v| v.min(i));
            order.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_script_keeps_order() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        shuffle_in_place(&mut items, &mut ScriptedRandom::identity());
        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn scripted_draws_give_exact_permutation() {
        // i=3 swaps with 0, i=2 swaps with 0, i=1 swaps with 0
        let mut rng = ScriptedRandom::new([0, 0, 0]);
        assert_eq!(permutation(4, &mut rng), vec![1, 2, 3, 0]);
    }

    #[test]
    fn seeded_permutation_is_reproducible_and_complete() {
        let a = permutation(10, &mut SeededRandom::new(7));
        let b = permutation(10, &mut SeededRandom::new(7));
        assert_eq!(a, b);

        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn seeded_source_shuffles_like_rand() {
        let mut expected: Vec<usize> = (0..10).collect();
        expected.shuffle(&mut StdRng::seed_from_u64(7));
        assert_eq!(permutation(10, &mut SeededRandom::new(7)), expected);
    }

    #[test]
    fn thread_random_yields_a_complete_permutation() {
        let mut order = permutation(20, &mut ThreadRandom);
        order.sort_unstable();
        assert_eq!(order, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn items_follow_the_drawn_permutation() {
        let mut items = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        // i=2 swaps with 0, i=1 swaps with 0: order [1, 2, 0]
        shuffle_in_place(&mut items, &mut ScriptedRandom::new([0, 0]));
        assert_eq!(items, vec!["b", "c", "a"]);
    }

    #[test]
    fn shuffle_of_empty_and_single_is_noop() {
        let mut empty: Vec<u8> = Vec::new();
        shuffle_in_place(&mut empty, &mut ThreadRandom);
        assert!(empty.is_empty());

        let mut one = vec![1];
        shuffle_in_place(&mut one, &mut ThreadRandom);
        assert_eq!(one, vec![1]);
    }
}
