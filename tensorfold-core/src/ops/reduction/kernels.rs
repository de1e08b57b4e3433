//! Accumulation kernels for runs of adjacent memory.
//!
//! Both kernels batch `N` elements at a time into `[U; N]` lane arrays so the
//! compiler can map each batch onto one vector register, and finish with a
//! scalar loop over whatever does not fill a whole batch.

use super::op::ReduceOp;
use crate::types::ElementCast;

#[inline(always)]
fn load_lanes<T, U, const N: usize>(values: &[T]) -> [U; N]
where
    T: ElementCast<U>,
    U: Copy + 'static,
{
    std::array::from_fn(|i| values[i].cast())
}

/// Folds every element of `x` into `*accumulator`.
///
/// The caller seeds `*accumulator` (normally with `init`). The vector lanes are
/// seeded with `init` as well; see the module docs of `op` for what this means
/// for seeds that are not an identity of `op`.
pub fn contiguous_reduce<T, U, O, const N: usize>(x: &[T], accumulator: &mut U, op: &O, init: U)
where
    T: ElementCast<U>,
    U: Copy + 'static,
    O: ReduceOp<U>,
{
    let mut lanes = [init; N];
    let mut batches = x.chunks_exact(N);
    for batch in &mut batches {
        lanes = op.combine_lanes(lanes, load_lanes::<T, U, N>(batch));
    }
    *accumulator = op.combine(*accumulator, op.fold_lanes(lanes));
    for &value in batches.remainder() {
        *accumulator = op.combine(*accumulator, value.cast());
    }
}

/// Accumulates `size` consecutive groups of `accumulator.len()` elements
/// position-wise: slot `j` receives `x[j]`, `x[j + stride]`, `x[j + 2 * stride]`, ...
///
/// The caller pre-fills `accumulator` with `init`. `x` must hold at least
/// `size * accumulator.len()` elements.
pub fn strided_reduce<T, U, O, const N: usize>(x: &[T], accumulator: &mut [U], size: usize, op: &O)
where
    T: ElementCast<U>,
    U: Copy + 'static,
    O: ReduceOp<U>,
{
    let stride = accumulator.len();
    if stride == 0 {
        return;
    }
    debug_assert!(x.len() >= size * stride);

    for group in x.chunks_exact(stride).take(size) {
        let mut acc_batches = accumulator.chunks_exact_mut(N);
        let mut x_batches = group.chunks_exact(N);
        for (acc, values) in (&mut acc_batches).zip(&mut x_batches) {
            let current: [U; N] = std::array::from_fn(|i| acc[i]);
            let updated = op.combine_lanes(current, load_lanes::<T, U, N>(values));
            acc.copy_from_slice(&updated);
        }
        for (acc, &value) in acc_batches
            .into_remainder()
            .iter_mut()
            .zip(x_batches.remainder())
        {
            *acc = op.combine(*acc, value.cast());
        }
    }
}
