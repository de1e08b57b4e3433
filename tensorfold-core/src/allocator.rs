//! Output storage allocation.
//!
//! Reductions own nothing but the output buffer they fill. The buffer is
//! reserved fallibly so that an unsatisfiable request surfaces as
//! [`TensorFoldError::OutOfMemory`] instead of aborting the process.

use std::mem::size_of;

use crate::error::TensorFoldError;

/// Allocates a buffer of `len` elements, every slot set to `fill`.
///
/// # Errors
/// Returns `TensorFoldError::OutOfMemory` if the byte size overflows `usize`
/// or the allocator cannot satisfy the request. Nothing is written in that case.
pub fn allocate_filled<U: Copy>(len: usize, fill: U) -> Result<Vec<U>, TensorFoldError> {
    let bytes = len
        .checked_mul(size_of::<U>())
        .ok_or(TensorFoldError::OutOfMemory { bytes: usize::MAX })?;

    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| TensorFoldError::OutOfMemory { bytes })?;
    buffer.resize(len, fill);
    Ok(buffer)
}
