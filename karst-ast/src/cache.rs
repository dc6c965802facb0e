//  CACHE.rs
//    by Lut99
//
//  Created:
//    05 Mar 2025, 11:20:12
//  Last edited:
//    21 Aug 2025, 12:31:48
//  Auto updated?
//    Yes
//
//  Description:
//!   Defines the acyclic memoizing cache that powers the resolution
//!   chain: every key is computed at most once, and a key that is
//!   requested again while its own computation is still running is a
//!   dependency cycle.
//

use std::hash::Hash;

use crate::collections::{LinearMap, LinearSet};


/***** LIBRARY *****/
/// The error returned when a key is requested while it is already being computed.
///
/// Carries the offending key. Callers convert this into their own error type via a
/// [`From`]-implementation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Cycle<K> {
    /// The key whose computation depended on itself.
    pub key : K,
}

/// A memoizing cache over an acyclic dependency relation.
///
/// Keys are computed at most once; while a key's computation runs, it is marked in-progress, and
/// any re-request of it during that window fails with a [`Cycle`]. The in-progress mark is
/// removed again whether the computation succeeds or fails, so an error never leaves the cache
/// poisoned.
#[derive(Clone, Debug)]
pub struct AcyclicCache<K, V> {
    /// The completed computations.
    done : LinearMap<K, V>,
    /// The keys whose computation is currently running.
    busy : LinearSet<K>,
}

impl<K, V> Default for AcyclicCache<K, V> {
    #[inline]
    fn default() -> Self { Self::new() }
}

impl<K, V> AcyclicCache<K, V> {
    /// Constructor for an empty AcyclicCache.
    #[inline]
    pub fn new() -> Self {
        Self {
            done : LinearMap::new(),
            busy : LinearSet::new(),
        }
    }

    /// Returns the map of all completed computations, in completion order.
    #[inline]
    pub fn all(&self) -> &LinearMap<K, V> { &self.done }
}

impl<K: Clone + Eq + Hash, V: Clone> AcyclicCache<K, V> {
    /// Returns the cached value for the given key, if it has been computed already.
    #[inline]
    pub fn get(&self, key: &K) -> Option<&V> { self.done.get(key) }

    /// Returns the cached value for the given key, computing it first if necessary.
    ///
    /// The cache lives inside some context `ctx` that the computation itself also needs mutable
    /// access to, so instead of a `&mut self` receiver this function takes the context plus an
    /// accessor that projects the cache out of it. The cache is untouched while `compute` runs.
    ///
    /// # Arguments
    /// - `ctx`: The context holding both this cache and whatever `compute` needs.
    /// - `key`: The key to resolve.
    /// - `cache`: Projects this cache out of the context.
    /// - `compute`: Computes the value for a key that is not cached yet.
    ///
    /// # Returns
    /// The value for the key, cloned out of the cache.
    ///
    /// # Errors
    /// This function errors if the key is already being computed (a dependency cycle, reported as
    /// a [`Cycle`] converted into `E`), or if `compute` itself fails. In both cases the
    /// in-progress administration is rolled back.
    pub fn get_or_compute<C, E, F>(ctx: &mut C, key: K, cache: fn(&mut C) -> &mut Self, compute: F) -> Result<V, E>
    where
        E: From<Cycle<K>>,
        F: FnOnce(&mut C, &K) -> Result<V, E>,
    {
        {
            let this: &mut Self = cache(ctx);
            if let Some(value) = this.done.get(&key) {
                return Ok(value.clone());
            }
            if !this.busy.add(key.clone()) {
                return Err(E::from(Cycle{ key }));
            }
        }

        // The key is now marked in-progress; compute, then clear the mark on either path
        let result: Result<V, E> = compute(ctx, &key);
        let this: &mut Self = cache(ctx);
        this.busy.remove(&key);
        let value: V = result?;
        this.done.add(key, value.clone());
        Ok(value)
    }
}





/***** TESTS *****/
#[cfg(test)]
mod tests {
    use super::*;

    /// The error type the test computations fail with.
    #[derive(Debug, Eq, PartialEq)]
    enum TestError {
        Cycle(String),
        Broken,
    }
    impl From<Cycle<String>> for TestError {
        fn from(value: Cycle<String>) -> Self { Self::Cycle(value.key) }
    }

    /// A context with a cache and a computation counter.
    struct Context {
        cache    : AcyclicCache<String, usize>,
        computes : usize,
    }
    impl Context {
        fn new() -> Self {
            Self {
                cache    : AcyclicCache::new(),
                computes : 0,
            }
        }
    }

    #[test]
    fn test_cache_memoizes() {
        let mut ctx: Context = Context::new();
        for _ in 0..3 {
            let value: usize = AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |c, _| {
                c.computes += 1;
                Ok::<usize, TestError>(42)
            })
            .unwrap();
            assert_eq!(value, 42);
        }
        assert_eq!(ctx.computes, 1);
        assert_eq!(ctx.cache.all().len(), 1);
    }

    #[test]
    fn test_cache_detects_self_cycle() {
        let mut ctx: Context = Context::new();
        let res: Result<usize, TestError> = AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |c, _| {
            AcyclicCache::get_or_compute(c, "a".to_string(), |c| &mut c.cache, |_, _| Ok(1))
        });
        assert_eq!(res, Err(TestError::Cycle("a".to_string())));
    }

    #[test]
    fn test_cache_detects_transitive_cycle() {
        // a -> b -> a
        let mut ctx: Context = Context::new();
        let res: Result<usize, TestError> = AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |c, _| {
            AcyclicCache::get_or_compute(c, "b".to_string(), |c| &mut c.cache, |c, _| {
                AcyclicCache::get_or_compute(c, "a".to_string(), |c| &mut c.cache, |_, _| Ok(1))
            })
        });
        assert_eq!(res, Err(TestError::Cycle("a".to_string())));
    }

    #[test]
    fn test_cache_clears_busy_on_error() {
        let mut ctx: Context = Context::new();
        let res: Result<usize, TestError> =
            AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |_, _| Err(TestError::Broken));
        assert_eq!(res, Err(TestError::Broken));

        // The failed key is no longer in-progress, so a retry computes instead of cycling
        let res: Result<usize, TestError> =
            AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |_, _| Ok(7));
        assert_eq!(res, Ok(7));
    }

    #[test]
    fn test_cache_acyclic_dependencies_resolve() {
        // a -> b, where b is requested twice
        let mut ctx: Context = Context::new();
        let value: usize = AcyclicCache::get_or_compute(&mut ctx, "a".to_string(), |c| &mut c.cache, |c, _| {
            let one: usize = AcyclicCache::get_or_compute(c, "b".to_string(), |c| &mut c.cache, |c, _| {
                c.computes += 1;
                Ok::<usize, TestError>(21)
            })?;
            let two: usize = AcyclicCache::get_or_compute(c, "b".to_string(), |c| &mut c.cache, |c, _| {
                c.computes += 1;
                Ok::<usize, TestError>(21)
            })?;
            Ok::<usize, TestError>(one + two)
        })
        .unwrap();
        assert_eq!(value, 42);
        assert_eq!(ctx.computes, 1);
    }
}
