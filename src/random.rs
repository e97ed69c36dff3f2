//! Random Source
//!
//! The random capability consumed by the resampler. Every sampling call takes
//! an explicit source, so a fixed seed reproduces a fixed ensemble and worker
//! threads never share a generator.
use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

/// Source of the two kinds of draws an ensemble round needs.
pub trait RandomSource {
    /// Draw an integer uniformly from `[low, high)`.
    fn uniform_int(&mut self, low: usize, high: usize) -> usize;

    /// Draw `k` distinct positions out of `0..n`, uniformly and without replacement.
    fn sample_without_replacement(&mut self, n: usize, k: usize) -> Vec<usize>;
}

impl<R: Rng> RandomSource for R {
    fn uniform_int(&mut self, low: usize, high: usize) -> usize {
        self.gen_range(low..high)
    }

    fn sample_without_replacement(&mut self, n: usize, k: usize) -> Vec<usize> {
        (0..n).choose_multiple(self, k)
    }
}

/// Derive one independent seed per round from a master seed.
///
/// Round `i` always receives the `i`th seed, whatever order rounds execute in.
pub fn round_seeds(seed: u64, rounds: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..rounds).map(|_| rng.gen::<u64>()).collect()
}

/// A source that replays recorded draws, for tests that pin exact samples.
#[cfg(test)]
pub(crate) mod scripted {
    use super::RandomSource;
    use std::collections::VecDeque;

    #[derive(Default)]
    pub(crate) struct ScriptedSource {
        ints: VecDeque<usize>,
        subsets: VecDeque<Vec<usize>>,
    }

    impl ScriptedSource {
        pub(crate) fn new(ints: Vec<usize>, subsets: Vec<Vec<usize>>) -> Self {
            ScriptedSource {
                ints: ints.into(),
                subsets: subsets.into(),
            }
        }

        pub(crate) fn is_exhausted(&self) -> bool {
            self.ints.is_empty() && self.subsets.is_empty()
        }
    }

    impl RandomSource for ScriptedSource {
        fn uniform_int(&mut self, low: usize, high: usize) -> usize {
            let v = self.ints.pop_front().expect("script ran out of integer draws");
            assert!(low <= v && v < high, "scripted draw {} outside [{}, {})", v, low, high);
            v
        }

        fn sample_without_replacement(&mut self, n: usize, k: usize) -> Vec<usize> {
            let v = self.subsets.pop_front().expect("script ran out of subset draws");
            assert_eq!(v.len(), k);
            assert!(v.iter().all(|i| *i < n));
            v
        }
    }
}
