//! # Tensor Operations Module (`ops`)
//!
//! Operations are grouped into submodules by functionality. Today the only
//! one is [`reduction`], which folds a strided view along a set of axes.

pub mod reduction;
