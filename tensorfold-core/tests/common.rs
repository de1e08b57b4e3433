use tensorfold_core::ops::reduction::reduced_shape;
use tensorfold_core::tensor::utils::{calculate_strides, inverse_permutation};
use tensorfold_core::types::Element;
use tensorfold_core::TensorView;

// Helpers are shared by several test crates; not every crate uses all of them.
#[allow(dead_code)]
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Owned storage plus the strided layout that presents it as a given logical
/// tensor.
#[allow(dead_code)]
pub struct Strided<T> {
    pub data: Vec<T>,
    pub shape: Vec<usize>,
    pub strides: Vec<isize>,
    pub offset: usize,
}

#[allow(dead_code)]
impl<T: Element> Strided<T> {
    pub fn view(&self) -> TensorView<'_, T> {
        TensorView::from_parts(&self.data, self.shape.clone(), self.strides.clone(), self.offset)
            .expect("Test layout is out of bounds")
    }

    fn from_view(view: &TensorView<'_, T>, data: Vec<T>) -> Self {
        Strided {
            data,
            shape: view.shape().to_vec(),
            strides: view.strides().to_vec(),
            offset: view.offset(),
        }
    }
}

/// `values` stored row-major.
#[allow(dead_code)]
pub fn row_major<T: Element>(values: &[T], shape: &[usize]) -> Strided<T> {
    Strided {
        data: values.to_vec(),
        shape: shape.to_vec(),
        strides: calculate_strides(shape),
        offset: 0,
    }
}

/// `values` stored row-major in the axis order `perm`, viewed back in the
/// logical axis order.
#[allow(dead_code)]
pub fn permuted<T: Element>(values: &[T], shape: &[usize], perm: &[usize]) -> Strided<T> {
    let logical = TensorView::contiguous(values, shape.to_vec()).expect("Test tensor creation failed");
    let physical = logical.permute(perm).expect("Invalid test permutation").to_contiguous();
    let physical_view = physical.view().expect("Test tensor has no storage");
    let view = physical_view
        .permute(&inverse_permutation(perm))
        .expect("Invalid test permutation");
    let data = physical.data().to_vec();
    Strided::from_view(&view, data)
}

/// `values` stored reversed along `axis`, viewed through a negative stride.
#[allow(dead_code)]
pub fn flipped<T: Element>(values: &[T], shape: &[usize], axis: usize) -> Strided<T> {
    let logical = TensorView::contiguous(values, shape.to_vec()).expect("Test tensor creation failed");
    let physical = logical.flip(axis).expect("Invalid test axis").to_contiguous();
    let physical_view = physical.view().expect("Test tensor has no storage");
    let view = physical_view.flip(axis).expect("Invalid test axis");
    let data = physical.data().to_vec();
    Strided::from_view(&view, data)
}

/// `values` embedded in a larger buffer whose last axis carries one `pad`
/// element on each side, viewed through a slice.
#[allow(dead_code)]
pub fn padded<T: Element>(values: &[T], shape: &[usize], pad: T) -> Strided<T> {
    let rank = shape.len();
    assert!(rank > 0, "padding needs at least one axis");
    let mut padded_shape = shape.to_vec();
    padded_shape[rank - 1] += 2;

    let inner = shape[rank - 1];
    let mut data = Vec::with_capacity(padded_shape.iter().product());
    if inner > 0 {
        for row in values.chunks_exact(inner) {
            data.push(pad);
            data.extend_from_slice(row);
            data.push(pad);
        }
    } else {
        let rows: usize = shape[..rank - 1].iter().product();
        data.resize(rows * 2, pad);
    }

    let padded_view = TensorView::contiguous(&data, padded_shape).expect("Test tensor creation failed");
    let view = padded_view.narrow(rank - 1, 1, inner).expect("Invalid test slice");
    let (shape, strides, offset) = (view.shape().to_vec(), view.strides().to_vec(), view.offset());
    Strided {
        data,
        shape,
        strides,
        offset,
    }
}

/// Element-by-element reduction of row-major `values`, visiting inputs in
/// logical order.
#[allow(dead_code)]
pub fn naive_reduce<T, F>(values: &[T], shape: &[usize], axes: &[usize], init: T, f: F) -> Vec<T>
where
    T: Copy,
    F: Fn(T, T) -> T,
{
    let out_shape = reduced_shape(shape, axes, false);
    let out_strides = calculate_strides(&out_shape);
    let mut out = vec![init; out_shape.iter().product()];

    for (flat, &value) in values.iter().enumerate() {
        let mut rem = flat;
        let mut out_index = 0usize;
        let mut out_axis = out_shape.len();
        for axis in (0..shape.len()).rev() {
            let coord = rem % shape[axis];
            rem /= shape[axis];
            if !axes.contains(&axis) {
                out_axis -= 1;
                out_index += coord * out_strides[out_axis] as usize;
            }
        }
        out[out_index] = f(out[out_index], value);
    }
    out
}
