//! Entry points of the reduction engine.
//!
//! [`reduce_into`] validates the axes, allocates the output storage, asks the
//! planner how to walk the input and runs the matching combination of offset
//! computation, loop nest and accumulation kernel.

use log::{debug, trace};

use super::kernels::{contiguous_reduce, strided_reduce};
use super::op::ReduceOp;
use super::plan::{get_reduction_plan, ReductionPlan, ReductionType};
use super::utils::{process_reduction_axes, reduced_shape, shapes_without_reduction_axes};
use crate::allocator::allocate_filled;
use crate::config::lane_width;
use crate::error::TensorFoldError;
use crate::tensor::iter_utils::{elem_to_loc, nd_loop};
use crate::tensor::{Tensor, TensorView};
use crate::types::{Element, ElementCast};

/// Reduces `axes` of `input` into `output`.
///
/// `output` must already carry the reduced shape, either without the reduced
/// axes or with each of them kept at extent 1. Its storage is (re)allocated
/// here and every element is written; slots that receive no input hold `init`.
///
/// # Errors
/// * `InvalidAxis` / `DuplicateAxis` for an invalid axis set.
/// * `ShapeMismatch` if `output` has the wrong shape.
/// * `OutOfMemory` if the output storage cannot be allocated. `output` is
///   left untouched in that case.
pub fn reduce_into<T, U, O>(
    input: &TensorView<'_, T>,
    output: &mut Tensor<U>,
    axes: &[usize],
    init: U,
    op: O,
) -> Result<(), TensorFoldError>
where
    T: Element + ElementCast<U>,
    U: Element,
    O: ReduceOp<U>,
{
    let axes = process_reduction_axes(input.rank(), axes)?;

    let expected = reduced_shape(input.shape(), &axes, false);
    if output.shape() != expected.as_slice()
        && output.shape() != reduced_shape(input.shape(), &axes, true).as_slice()
    {
        return Err(TensorFoldError::ShapeMismatch {
            expected,
            actual: output.shape().to_vec(),
            operation: "reduce_into".to_string(),
        });
    }

    let mut out = allocate_filled(output.numel(), init)?;

    if input.numel() == 0 {
        debug!(
            "reduce {:?} -> {:?}: empty input of shape {:?}, output filled with init",
            T::DTYPE,
            U::DTYPE,
            input.shape()
        );
        output.set_data(out);
        return Ok(());
    }

    let plan = get_reduction_plan(input.layout(), &axes);
    let lanes = lane_width::<T, U>();
    debug!(
        "reduce {:?} -> {:?}: shape {:?} strides {:?} axes {:?} planned as {:?} ({} lanes of {}-byte input, {}-byte accumulator)",
        T::DTYPE,
        U::DTYPE,
        input.shape(),
        input.strides(),
        axes,
        plan.reduction_type,
        lanes,
        T::DTYPE.size_of(),
        U::DTYPE.size_of()
    );

    match lanes {
        16 => reduction_op::<T, U, O, 16>(input, &mut out, &axes, init, &op, plan),
        8 => reduction_op::<T, U, O, 8>(input, &mut out, &axes, init, &op, plan),
        4 => reduction_op::<T, U, O, 4>(input, &mut out, &axes, init, &op, plan),
        2 => reduction_op::<T, U, O, 2>(input, &mut out, &axes, init, &op, plan),
        _ => reduction_op::<T, U, O, 1>(input, &mut out, &axes, init, &op, plan),
    }

    output.set_data(out);
    Ok(())
}

/// Reduces `axes` of `input` into a new tensor without the reduced axes.
pub fn reduce<T, U, O>(
    input: &TensorView<'_, T>,
    axes: &[usize],
    init: U,
    op: O,
) -> Result<Tensor<U>, TensorFoldError>
where
    T: Element + ElementCast<U>,
    U: Element,
    O: ReduceOp<U>,
{
    let processed_axes = process_reduction_axes(input.rank(), axes)?;
    let mut output = Tensor::empty(reduced_shape(input.shape(), &processed_axes, false));
    reduce_into(input, &mut output, &processed_axes, init, op)?;
    Ok(output)
}

/// Like [`reduce`], but the reduced axes stay in the result with extent 1.
pub fn reduce_keep_dims<T, U, O>(
    input: &TensorView<'_, T>,
    axes: &[usize],
    init: U,
    op: O,
) -> Result<Tensor<U>, TensorFoldError>
where
    T: Element + ElementCast<U>,
    U: Element,
    O: ReduceOp<U>,
{
    let processed_axes = process_reduction_axes(input.rank(), axes)?;
    let mut output = Tensor::empty(reduced_shape(input.shape(), &processed_axes, true));
    reduce_into(input, &mut output, &processed_axes, init, op)?;
    Ok(output)
}

/// Executes `plan` with `N` vector lanes. `out` arrives filled with `init`.
fn reduction_op<T, U, O, const N: usize>(
    input: &TensorView<'_, T>,
    out: &mut [U],
    axes: &[usize],
    init: U,
    op: &O,
    plan: ReductionPlan,
) where
    T: Element + ElementCast<U>,
    U: Element,
    O: ReduceOp<U>,
{
    let data = input.data;
    let layout = input.layout();
    let base = layout.offset as isize;

    let ReductionPlan {
        reduction_type,
        shape: mut plan_shape,
        strides: mut plan_strides,
    } = plan;

    match reduction_type {
        ReductionType::ContiguousAllReduce => {
            let x = &data[layout.offset..layout.offset + layout.size()];
            contiguous_reduce::<T, U, O, N>(x, &mut out[0], op, init);
        }

        ReductionType::ContiguousReduce if plan_shape.len() == 1 => {
            let reduction_size = plan_shape[0];
            trace!("contiguous reduce: {} outputs of {} elements", out.len(), reduction_size);
            let runs = data[layout.offset..].chunks_exact(reduction_size);
            for (out_slot, run) in out.iter_mut().zip(runs) {
                contiguous_reduce::<T, U, O, N>(run, out_slot, op, init);
            }
        }

        ReductionType::ContiguousReduce | ReductionType::GeneralContiguousReduce => {
            let reduction_size = plan_shape.pop().unwrap_or(1);
            plan_strides.pop();
            trace!(
                "general contiguous reduce: runs of {} elements over loop nest {:?}",
                reduction_size,
                plan_shape
            );
            let (shape, strides) = shapes_without_reduction_axes(layout, axes);
            for (i, out_slot) in out.iter_mut().enumerate() {
                let offset = base + elem_to_loc(i, &shape, &strides);
                nd_loop(&plan_shape, &plan_strides, |extra| {
                    let start = (offset + extra) as usize;
                    contiguous_reduce::<T, U, O, N>(
                        &data[start..start + reduction_size],
                        out_slot,
                        op,
                        init,
                    );
                });
            }
        }

        ReductionType::ContiguousStridedReduce if plan_shape.len() == 1 => {
            let reduction_size = plan_shape[0];
            let reduction_stride = plan_strides[0] as usize;
            trace!(
                "contiguous strided reduce: {} blocks of {} outputs, {} groups each",
                out.len() / reduction_stride,
                reduction_stride,
                reduction_size
            );
            let groups = data[layout.offset..].chunks_exact(reduction_stride * reduction_size);
            for (block, x) in out.chunks_exact_mut(reduction_stride).zip(groups) {
                strided_reduce::<T, U, O, N>(x, block, reduction_size, op);
            }
        }

        ReductionType::ContiguousStridedReduce | ReductionType::GeneralStridedReduce => {
            let reduction_size = plan_shape.pop().unwrap_or(1);
            let reduction_stride = plan_strides.pop().unwrap_or(1) as usize;
            trace!(
                "general strided reduce: blocks of {} outputs, {} groups, loop nest {:?}",
                reduction_stride,
                reduction_size,
                plan_shape
            );
            let (shape, strides) = shapes_without_reduction_axes(layout, axes);
            let span = reduction_stride * reduction_size;
            for (b, block) in out.chunks_exact_mut(reduction_stride).enumerate() {
                let offset = base + elem_to_loc(b * reduction_stride, &shape, &strides);
                nd_loop(&plan_shape, &plan_strides, |extra| {
                    let start = (offset + extra) as usize;
                    strided_reduce::<T, U, O, N>(&data[start..start + span], block, reduction_size, op);
                });
            }
        }

        ReductionType::GeneralReduce => {
            trace!("general reduce: element-wise walk over loop nest {:?}", plan_shape);
            let (shape, strides) = shapes_without_reduction_axes(layout, axes);
            for (i, out_slot) in out.iter_mut().enumerate() {
                let offset = base + elem_to_loc(i, &shape, &strides);
                let mut val = init;
                nd_loop(&plan_shape, &plan_strides, |extra| {
                    val = op.combine(val, data[(offset + extra) as usize].cast());
                });
                *out_slot = val;
            }
        }
    }
}

#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;
