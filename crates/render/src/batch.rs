//! Bounded fan-out of block rendering.

/// Maps `items` through `f`, keeping input order. With the `parallel`
/// feature the work runs on a pool of at most `max_threads` threads.
#[cfg(feature = "parallel")]
pub(crate) fn map_bounded<T, R, F>(items: Vec<T>, max_threads: usize, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Send + Sync,
{
    use rayon::prelude::*;

    if items.len() < 2 || max_threads < 2 {
        return items.into_iter().map(f).collect();
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(max_threads)
        .build()
        .ok();

    if let Some(pool) = pool {
        pool.install(|| items.into_par_iter().map(&f).collect())
    } else {
        log::debug!("falling back to the global rayon pool");
        items.into_par_iter().map(&f).collect()
    }
}

#[cfg(not(feature = "parallel"))]
pub(crate) fn map_bounded<T, R, F>(items: Vec<T>, _max_threads: usize, f: F) -> Vec<R>
where
    F: Fn(T) -> R,
{
    items.into_iter().map(f).collect()
}
