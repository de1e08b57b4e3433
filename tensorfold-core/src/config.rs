//! Compile-time configuration of the reduction kernels.
//!
//! The engine has no runtime knobs. The only tunable is the vector width used
//! by the accumulation kernels, which is derived from the target features the
//! crate is compiled with.

use std::mem::size_of;

/// Width in bytes of the widest vector register the kernels are sized for.
#[cfg(target_feature = "avx512f")]
pub const VECTOR_BYTES: usize = 64;

/// Width in bytes of the widest vector register the kernels are sized for.
#[cfg(all(not(target_feature = "avx512f"), target_feature = "avx"))]
pub const VECTOR_BYTES: usize = 32;

/// Width in bytes of the widest vector register the kernels are sized for.
#[cfg(not(any(target_feature = "avx512f", target_feature = "avx")))]
pub const VECTOR_BYTES: usize = 16;

/// Upper bound on the number of lanes a kernel batches together.
pub const MAX_LANES: usize = 16;

/// Number of lanes `N` supported by both the input type `T` and the
/// accumulator type `U`.
///
/// Always a power of two in `1..=MAX_LANES`.
pub fn lane_width<T, U>() -> usize {
    let lanes_for = |bytes: usize| VECTOR_BYTES / bytes.max(1);
    let n = lanes_for(size_of::<T>())
        .min(lanes_for(size_of::<U>()))
        .clamp(1, MAX_LANES);
    // Round down to a power of two.
    1 << (usize::BITS - 1 - n.leading_zeros())
}
