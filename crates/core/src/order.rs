use rand::Rng;
use rand::seq::SliceRandom;

/// Sequence in which the entries of a pack are presented.
///
/// Always a permutation of `0..len`: either the identity or a shuffle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraversalOrder {
    indices: Vec<usize>,
}

impl TraversalOrder {
    /// Identity order `0, 1, .., len - 1`.
    #[must_use]
    pub fn identity(len: usize) -> Self {
        Self {
            indices: (0..len).collect(),
        }
    }

    /// Uniformly random permutation of `0..len`.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        let mut order = Self::identity(len);
        order.indices.shuffle(rng);
        order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Entry index presented at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    /// Position at which entry `index` is presented.
    #[must_use]
    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.indices.iter().position(|&i| i == index)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Returns true if this order is a permutation of `0..len`.
    #[must_use]
    pub fn is_permutation_of(&self, len: usize) -> bool {
        if self.indices.len() != len {
            return false;
        }
        let mut seen = vec![false; len];
        for &index in &self.indices {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn identity_is_sequential() {
        assert_eq!(TraversalOrder::identity(4).as_slice(), &[0, 1, 2, 3]);
        assert!(TraversalOrder::identity(0).is_empty());
    }

    #[test]
    fn position_of_finds_index() {
        let mut rng = StdRng::seed_from_u64(7);
        let order = TraversalOrder::shuffled(10, &mut rng);
        for index in 0..10 {
            let position = order.position_of(index).unwrap();
            assert_eq!(order.get(position), Some(index));
        }
        assert_eq!(order.position_of(10), None);
    }

    #[test]
    fn shuffle_reaches_every_permutation_of_three() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..600 {
            seen.insert(TraversalOrder::shuffled(3, &mut rng).as_slice().to_vec());
        }
        assert_eq!(seen.len(), 6);
    }

    #[test]
    fn detects_non_permutations() {
        let order = TraversalOrder {
            indices: vec![0, 2, 2],
        };
        assert!(!order.is_permutation_of(3));
        assert!(!TraversalOrder::identity(3).is_permutation_of(4));
    }

    proptest! {
        #[test]
        fn shuffled_is_always_a_permutation(len in 0usize..200, seed in any::<u64>()) {
            let mut rng = StdRng::seed_from_u64(seed);
            let order = TraversalOrder::shuffled(len, &mut rng);
            prop_assert!(order.is_permutation_of(len));
        }
    }
}
