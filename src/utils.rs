//! Common utilities used across the crate.
//!
//! Parallelism configuration shared by the binner. Components never manage
//! thread pools themselves; they run on the ambient `rayon` pool when
//! allowed to and sequentially otherwise.

use rayon::prelude::*;

// =============================================================================
// Parallelism Configuration
// =============================================================================

/// Whether parallel execution is allowed.
///
/// When `Parallel`, components may use `rayon` parallel iterators.
/// When `Sequential`, components must iterate on the calling thread.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Parallelism {
    Sequential,
    #[default]
    Parallel,
}

impl Parallelism {
    /// Returns `true` if parallel execution is allowed.
    #[inline]
    pub fn is_parallel(self) -> bool {
        matches!(self, Parallelism::Parallel)
    }

    /// Map every index in `0..n` and collect the results in index order.
    pub fn maybe_par_map<T, F>(self, n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        if self.is_parallel() {
            (0..n).into_par_iter().map(f).collect()
        } else {
            (0..n).map(f).collect()
        }
    }

    /// Visit consecutive `chunk_len`-sized chunks of `data` together with
    /// their chunk index.
    ///
    /// The last chunk may be shorter. `chunk_len` must be non-zero.
    pub fn maybe_par_chunks_mut<T, F>(self, data: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        if self.is_parallel() {
            data.par_chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk));
        } else {
            data.chunks_mut(chunk_len)
                .enumerate()
                .for_each(|(i, chunk)| f(i, chunk));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_preserves_order() {
        for p in [Parallelism::Sequential, Parallelism::Parallel] {
            let out = p.maybe_par_map(100, |i| i * 2);
            assert_eq!(out, (0..100).map(|i| i * 2).collect::<Vec<_>>());
        }
    }

    #[test]
    fn chunks_see_their_index() {
        for p in [Parallelism::Sequential, Parallelism::Parallel] {
            let mut data = vec![0usize; 10];
            p.maybe_par_chunks_mut(&mut data, 4, |i, chunk| chunk.fill(i));
            assert_eq!(data, vec![0, 0, 0, 0, 1, 1, 1, 1, 2, 2]);
        }
    }
}
