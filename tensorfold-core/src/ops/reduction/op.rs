//! Combining operators for reductions.
//!
//! An operator folds values of the accumulator type `U` two at a time. The
//! kernels call it in three shapes: scalar (`combine`), lane-wise over a batch
//! of `N` accumulators (`combine_lanes`), and horizontally across the lanes of
//! one batch (`fold_lanes`). Only `combine` has to be written; the other two
//! default to it.
//!
//! # Requirements on `op` and `init`
//!
//! `combine` must be associative. Every plan except a sequential contiguous
//! run also reorders the inputs, so commutativity is needed for results to be
//! independent of the memory layout.
//!
//! Every output slot starts at `init`. Each call of the contiguous kernel also
//! seeds its `N` vector lanes with `init` before merging them into the slot,
//! so how often `init` enters a result depends on how many contiguous runs
//! feed that slot. That is harmless when `init` is an identity of `op` (`0`
//! for [`Sum`], `1` for [`Prod`], `-inf` for [`Max`]) but changes the result
//! for seeds that are not, e.g. `Sum` seeded with a non-zero offset.

use std::ops::{Add, Mul};

pub trait ReduceOp<U: Copy> {
    /// Combines the running accumulator with one more value.
    fn combine(&self, acc: U, value: U) -> U;

    /// Lane-wise `combine` of two batches.
    #[inline]
    fn combine_lanes<const N: usize>(&self, acc: [U; N], values: [U; N]) -> [U; N] {
        let mut out = acc;
        for (lane, value) in out.iter_mut().zip(values) {
            *lane = self.combine(*lane, value);
        }
        out
    }

    /// Horizontal fold of one batch into a single value. `N` is at least 1.
    #[inline]
    fn fold_lanes<const N: usize>(&self, lanes: [U; N]) -> U {
        let mut acc = lanes[0];
        for &lane in &lanes[1..] {
            acc = self.combine(acc, lane);
        }
        acc
    }
}

/// Addition. Identity: zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<U: Copy + Add<Output = U>> ReduceOp<U> for Sum {
    #[inline]
    fn combine(&self, acc: U, value: U) -> U {
        acc + value
    }
}

/// Multiplication. Identity: one.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prod;

impl<U: Copy + Mul<Output = U>> ReduceOp<U> for Prod {
    #[inline]
    fn combine(&self, acc: U, value: U) -> U {
        acc * value
    }
}

// NaN is the only value not equal to itself.
#[allow(clippy::eq_op)]
#[inline]
fn is_nan<U: PartialEq>(value: U) -> bool {
    value != value
}

/// Maximum. NaN propagates. Identity: the smallest value of the type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl<U: Copy + PartialOrd> ReduceOp<U> for Max {
    #[inline]
    fn combine(&self, acc: U, value: U) -> U {
        if value > acc || is_nan(value) {
            value
        } else {
            acc
        }
    }
}

/// Minimum. NaN propagates. Identity: the largest value of the type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl<U: Copy + PartialOrd> ReduceOp<U> for Min {
    #[inline]
    fn combine(&self, acc: U, value: U) -> U {
        if value < acc || is_nan(value) {
            value
        } else {
            acc
        }
    }
}

/// Logical and. Identity: `true`.
#[derive(Debug, Clone, Copy, Default)]
pub struct And;

impl ReduceOp<bool> for And {
    #[inline]
    fn combine(&self, acc: bool, value: bool) -> bool {
        acc && value
    }
}

/// Logical or. Identity: `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Or;

impl ReduceOp<bool> for Or {
    #[inline]
    fn combine(&self, acc: bool, value: bool) -> bool {
        acc || value
    }
}

/// Adapts any `Fn(U, U) -> U` closure into a [`ReduceOp`].
#[derive(Debug, Clone, Copy)]
pub struct FnOp<F>(pub F);

impl<U: Copy, F: Fn(U, U) -> U> ReduceOp<U> for FnOp<F> {
    #[inline]
    fn combine(&self, acc: U, value: U) -> U {
        (self.0)(acc, value)
    }
}
