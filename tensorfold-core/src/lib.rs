//! Reduction engine for strided n-dimensional tensors.
//!
//! A [`TensorView`] describes an arbitrary strided layout over borrowed
//! storage (transposed, broadcast, flipped or sliced). The functions in
//! [`ops::reduction`] fold such a view along any set of axes into a new
//! row-major [`Tensor`], choosing a memory access pattern from the layout.

pub mod allocator;
pub mod config;
pub mod error;
pub mod ops;
pub mod tensor;
pub mod types;

pub use error::TensorFoldError;
pub use ops::reduction::{reduce, reduce_into, reduce_keep_dims};
pub use tensor::{Layout, Tensor, TensorView};
pub use types::{DType, Element, ElementCast};

// Re-export traits required by public functions/structs
pub use num_traits;
