//! Portable parallel iteration
//!
//! With the `parallel` feature (on by default) these helpers run on rayon's
//! global pool; without it they fall back to plain iterators with the same
//! results.
//!
//! ## Usage
//!
//! ```ignore
//! use crate::core::parallel::*;
//!
//! // Parallel map over indices
//! let rows: Vec<usize> = parallel_map_indexed(100, |i| i * 2);
//!
//! // Fallible fold/reduce into an accumulator
//! let total = parallel_try_fold_reduce(&data, || 0, |acc, x| Ok(acc + x), |a, b| Ok(a + b))?;
//! ```

/// Check if parallel processing is available
#[inline]
pub fn is_parallel_available() -> bool {
    cfg!(feature = "parallel")
}

/// Number of worker threads that will be used
pub fn worker_threads() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Parallel map over a slice
#[cfg(feature = "parallel")]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter().map(f).collect()
}

/// Parallel map over a slice
#[cfg(not(feature = "parallel"))]
pub fn parallel_map<T, U, F>(data: &[T], f: F) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    data.iter().map(f).collect()
}

/// Parallel map over a range of indices
#[cfg(feature = "parallel")]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    U: Send,
    F: Fn(usize) -> U + Sync + Send,
{
    use rayon::prelude::*;
    (0..count).into_par_iter().map(f).collect()
}

/// Parallel map over a range of indices
#[cfg(not(feature = "parallel"))]
pub fn parallel_map_indexed<U, F>(count: usize, f: F) -> Vec<U>
where
    F: Fn(usize) -> U,
{
    (0..count).map(f).collect()
}

/// Fallible fold of a slice into per-thread accumulators, then reduce
///
/// `reduce` must be associative and `identity()` its neutral element; the
/// split points differ between runs, so only the rounding of the result
/// may vary.
#[cfg(feature = "parallel")]
pub fn parallel_try_fold_reduce<T, A, E, ID, F, R>(
    data: &[T],
    identity: ID,
    fold: F,
    reduce: R,
) -> Result<A, E>
where
    T: Sync,
    A: Send,
    E: Send,
    ID: Fn() -> A + Sync + Send,
    F: Fn(A, &T) -> Result<A, E> + Sync + Send,
    R: Fn(A, A) -> Result<A, E> + Sync + Send,
{
    use rayon::prelude::*;
    data.par_iter()
        .try_fold(&identity, |acc, item| fold(acc, item))
        .try_reduce(&identity, |a, b| reduce(a, b))
}

/// Fallible fold of a slice into per-thread accumulators, then reduce
#[cfg(not(feature = "parallel"))]
pub fn parallel_try_fold_reduce<T, A, E, ID, F, R>(
    data: &[T],
    identity: ID,
    fold: F,
    _reduce: R,
) -> Result<A, E>
where
    ID: Fn() -> A,
    F: Fn(A, &T) -> Result<A, E>,
    R: Fn(A, A) -> Result<A, E>,
{
    data.iter().try_fold(identity(), |acc, item| fold(acc, item))
}
