//! Elementwise kernels
//!
//! Generic over the scalar type and the scalar operation. Each kernel reads its
//! inputs through [`BroadcastIter`] offsets and writes a contiguous output.
//!
//! When the `rayon` feature is enabled and the output is large enough, the
//! output is split into fixed-size chunks; every chunk positions its own copy
//! of each input iterator with [`BroadcastIter::starting_at`]. Chunks write
//! disjoint output ranges, so serial and parallel runs produce identical bits.

use crate::broadcast::BroadcastIter;
use crate::config::EngineConfig;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Output elements per parallel work item
const CHUNK_SIZE: usize = 4096;

/// Run `body(start, chunk)` over `out`, in parallel chunks when allowed
///
/// `start` is the output index of `chunk[0]`.
#[inline]
pub(crate) fn fill<T, F>(out: &mut [T], config: &EngineConfig, body: F)
where
    T: Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    #[cfg(feature = "rayon")]
    if config.should_parallelize(out.len()) {
        out.par_chunks_mut(CHUNK_SIZE)
            .enumerate()
            .for_each(|(i, chunk)| body(i * CHUNK_SIZE, chunk));
        return;
    }

    #[cfg(not(feature = "rayon"))]
    let _ = config;

    body(0, out);
}

/// `out[i] = f(a[offsets_i])`
pub(crate) fn unary<T, F>(out: &mut [T], a: &[T], a_idx: &BroadcastIter, f: F, config: &EngineConfig)
where
    T: Copy + Send + Sync,
    F: Fn(T) -> T + Sync,
{
    if a_idx.is_identity() {
        tracing::debug!(len = out.len(), "contiguous unary fast path");
        fill(out, config, |start, chunk| {
            for (o, &x) in chunk.iter_mut().zip(&a[start..]) {
                *o = f(x);
            }
        });
        return;
    }

    fill(out, config, |start, chunk| {
        let offsets = a_idx.clone().starting_at(start);
        for (o, ia) in chunk.iter_mut().zip(offsets) {
            *o = f(a[ia]);
        }
    });
}

/// `out[i] = f(a[a_offsets_i], b[b_offsets_i])`
pub(crate) fn binary<T, F>(
    out: &mut [T],
    (a, a_idx): (&[T], &BroadcastIter),
    (b, b_idx): (&[T], &BroadcastIter),
    f: F,
    config: &EngineConfig,
) where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    if a_idx.is_identity() && b_idx.is_identity() {
        tracing::debug!(len = out.len(), "contiguous binary fast path");
        fill(out, config, |start, chunk| {
            for ((o, &x), &y) in chunk.iter_mut().zip(&a[start..]).zip(&b[start..]) {
                *o = f(x, y);
            }
        });
        return;
    }

    fill(out, config, |start, chunk| {
        let a_offsets = a_idx.clone().starting_at(start);
        let b_offsets = b_idx.clone().starting_at(start);
        for ((o, ia), ib) in chunk.iter_mut().zip(a_offsets).zip(b_offsets) {
            *o = f(a[ia], b[ib]);
        }
    });
}

/// Left fold of `f` across any number of inputs
///
/// `out[i] = f(...f(f(x0, x1), x2)..., xn)` where `xk` is input `k` read at
/// its own broadcast offset for output index `i`.
pub(crate) fn fold<T, F>(out: &mut [T], inputs: &[(&[T], &BroadcastIter)], f: F, config: &EngineConfig)
where
    T: Copy + Send + Sync,
    F: Fn(T, T) -> T + Sync,
{
    let Some(((first, first_idx), rest)) = inputs.split_first() else {
        return;
    };

    fill(out, config, |start, chunk| {
        let offsets = BroadcastIter::clone(first_idx).starting_at(start);
        for (o, i) in chunk.iter_mut().zip(offsets) {
            *o = first[i];
        }

        for (data, idx) in rest {
            let offsets = BroadcastIter::clone(idx).starting_at(start);
            for (o, i) in chunk.iter_mut().zip(offsets) {
                *o = f(*o, data[i]);
            }
        }
    });
}
