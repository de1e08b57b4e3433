//! Classification of a reduction's memory access pattern.
//!
//! The planner looks at the input layout and the reduced axes once and picks
//! the cheapest of six ways to walk the input. The resulting
//! [`ReductionPlan`] also carries the reduced axes as a normalized loop nest
//! (merged where memory-adjacent) for the dispatcher to run.

use std::cmp::Ordering;

use super::utils::{process_reduction_axes, shapes_without_reduction_axes};
use crate::error::TensorFoldError;
use crate::tensor::Layout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReductionType {
    /// Every axis is reduced and the input is dense: one fold over the buffer.
    ContiguousAllReduce,

    /// Row-contiguous input whose innermost reduced run has stride 1:
    /// `N1 x R1 x N2 x R2 x ... x Nn x Rn`.
    ContiguousReduce,

    /// Row-contiguous input whose innermost reduced run is followed by
    /// non-reduced axes: `R1 x N1 x R2 x N2 x ... x Rn x Nn`.
    ContiguousStridedReduce,

    /// Arbitrary layout for the non-reduced axes, but the innermost reduced
    /// run is contiguous. Offsets are computed per output element and the
    /// body is a contiguous fold.
    GeneralContiguousReduce,

    /// Arbitrary outer layout, but the innermost reduced run sits right
    /// outside a contiguous block of output elements. Offsets are computed
    /// per block and the body is a strided fold.
    GeneralStridedReduce,

    /// Anything else: transpositions or broadcasts within the reduced axes.
    /// Every input element is visited individually.
    GeneralReduce,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReductionPlan {
    pub reduction_type: ReductionType,
    /// Extents of the reduced loop nest, outermost first.
    pub shape: Vec<usize>,
    /// Strides of the reduced loop nest, matching `shape`.
    pub strides: Vec<isize>,
}

impl ReductionPlan {
    fn new(reduction_type: ReductionType, shape: Vec<usize>, strides: Vec<isize>) -> Self {
        Self {
            reduction_type,
            shape,
            strides,
        }
    }

    fn from_type(reduction_type: ReductionType) -> Self {
        Self::new(reduction_type, Vec::new(), Vec::new())
    }
}

/// Computes the plan for reducing `axes` of a tensor laid out as `layout`.
///
/// # Errors
/// `InvalidAxis` or `DuplicateAxis` if `axes` is not a set of valid axes.
pub fn plan_reduction(layout: &Layout, axes: &[usize]) -> Result<ReductionPlan, TensorFoldError> {
    let axes = process_reduction_axes(layout.rank(), axes)?;
    Ok(get_reduction_plan(layout, &axes))
}

/// Plans a reduction over already validated, sorted `axes`.
pub(crate) fn get_reduction_plan(layout: &Layout, axes: &[usize]) -> ReductionPlan {
    let shape = &layout.shape;
    let strides = &layout.strides;

    if axes.len() == layout.rank() && layout.is_dense() {
        return ReductionPlan::from_type(ReductionType::ContiguousAllReduce);
    }

    if layout.is_row_contiguous() {
        // Merge runs of consecutive reduced axes.
        let mut runs: Vec<(usize, isize)> = Vec::with_capacity(axes.len());
        for (i, &axis) in axes.iter().enumerate() {
            let extent = shape[axis];
            let stride = strides[axis];
            match runs.last_mut() {
                Some(last) if axes[i - 1] + 1 == axis && extent > 1 => {
                    last.0 *= extent;
                    last.1 = stride;
                }
                _ => runs.push((extent, stride)),
            }
        }
        runs.retain(|&(extent, _)| extent != 1);
        if runs.is_empty() {
            // Only extent-1 axes are reduced: every output reads one element.
            runs.push((1, 1));
        }

        let (plan_shape, plan_strides): (Vec<usize>, Vec<isize>) = runs.into_iter().unzip();
        let reduction_type = if plan_strides[plan_strides.len() - 1] == 1 {
            ReductionType::ContiguousReduce
        } else {
            ReductionType::ContiguousStridedReduce
        };
        return ReductionPlan::new(reduction_type, plan_shape, plan_strides);
    }

    // Sort the reduced axes by stride, broadcast axes outermost, so that
    // memory-adjacent axes end up next to each other.
    let mut reductions: Vec<(usize, isize)> = axes
        .iter()
        .map(|&axis| (shape[axis], strides[axis]))
        .filter(|&(extent, _)| extent > 1)
        .collect();
    reductions.sort_by(|a, b| match (a.1 == 0, b.1 == 0) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => b.1.cmp(&a.1),
    });

    // Merge an axis into the one outside it when the outer stride is exactly
    // the span of the inner axis.
    let mut i = reductions.len();
    while i > 1 {
        i -= 1;
        let (inner_extent, inner_stride) = reductions[i];
        let (outer_extent, outer_stride) = reductions[i - 1];
        if (inner_extent as isize).checked_mul(inner_stride) == Some(outer_stride) {
            reductions.remove(i);
            reductions[i - 1] = (inner_extent * outer_extent, inner_stride);
        }
    }

    let (plan_shape, plan_strides): (Vec<usize>, Vec<isize>) = reductions.into_iter().unzip();
    let last_stride = match plan_strides.last() {
        Some(&stride) => stride,
        None => return ReductionPlan::new(ReductionType::GeneralReduce, plan_shape, plan_strides),
    };

    if last_stride == 1 {
        return ReductionPlan::new(ReductionType::GeneralContiguousReduce, plan_shape, plan_strides);
    }

    if last_stride > 1 {
        // Size of the row-contiguous block formed by the innermost
        // non-reduced axes. Consecutive outputs map to consecutive memory
        // inside it.
        let (kept_shape, kept_strides) = shapes_without_reduction_axes(layout, axes);
        let mut size = 1isize;
        for (&extent, &stride) in kept_shape.iter().zip(&kept_strides).rev() {
            if extent == 1 {
                continue;
            }
            if stride != size {
                break;
            }
            size *= extent as isize;
        }
        if size % last_stride == 0 {
            return ReductionPlan::new(ReductionType::GeneralStridedReduce, plan_shape, plan_strides);
        }
    }

    ReductionPlan::new(ReductionType::GeneralReduce, plan_shape, plan_strides)
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
