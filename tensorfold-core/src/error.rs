use thiserror::Error;

/// Custom error type for the TensorFold reduction engine.
#[derive(Error, Debug, PartialEq, Clone)] // PartialEq for easier testing
pub enum TensorFoldError {
    #[error("Invalid axis {axis} for tensor of rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("Axis {axis} appears more than once in the reduction axes")]
    DuplicateAxis { axis: usize },

    #[error("Rank mismatch: expected {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    #[error("Tensor creation error: data length {data_len} does not match shape {shape:?}")]
    TensorCreationError { data_len: usize, shape: Vec<usize> },

    #[error(
        "View reaches offsets {min_offset}..={max_offset} outside of a storage of {storage_len} elements"
    )]
    StorageOutOfBounds {
        min_offset: isize,
        max_offset: isize,
        storage_len: usize,
    },

    #[error("Layout with shape {shape:?} and strides {strides:?} addresses more elements or offsets than fit in isize")]
    LayoutOverflow { shape: Vec<usize>, strides: Vec<isize> },

    #[error("Shape mismatch: expected {expected:?}, got {actual:?} during operation {operation}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
        operation: String,
    },

    #[error("Invalid permutation: dims {dims:?} are not a valid permutation for rank {rank}")]
    InvalidPermutation { dims: Vec<usize>, rank: usize },

    #[error("Cannot broadcast shape {shape:?} to {target:?}")]
    BroadcastError {
        shape: Vec<usize>,
        target: Vec<usize>,
    },

    #[error("Slice error: {message}")]
    SliceError { message: String },

    #[error("Out of memory: failed to allocate {bytes} bytes")]
    OutOfMemory { bytes: usize },
}
