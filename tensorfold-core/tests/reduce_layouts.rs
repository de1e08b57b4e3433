use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tensorfold_core::ops::reduction::{
    plan_reduction, reduce, reduce_keep_dims, FnOp, Max, Min, ReductionType, Sum,
};
use tensorfold_core::TensorFoldError;

mod common;
use common::{flipped, init_logger, naive_reduce, padded, permuted, row_major, Strided};

const SHAPE: [usize; 3] = [4, 6, 5];

fn values(n: usize) -> Vec<f64> {
    // Integer valued so that sums are exact in any order.
    (0..n).map(|i| ((i * 7) % 23) as f64 - 11.0).collect()
}

fn all_axis_sets(rank: usize) -> Vec<Vec<usize>> {
    (0..1usize << rank)
        .map(|mask| (0..rank).filter(|axis| mask & (1 << axis) != 0).collect())
        .collect()
}

fn layouts(values: &[f64], shape: &[usize]) -> Vec<(&'static str, Strided<f64>)> {
    vec![
        ("row_major", row_major(values, shape)),
        ("permuted_102", permuted(values, shape, &[1, 0, 2])),
        ("permuted_201", permuted(values, shape, &[2, 0, 1])),
        ("flipped_last", flipped(values, shape, 2)),
        ("flipped_first", flipped(values, shape, 0)),
        ("padded", padded(values, shape, f64::NAN)),
    ]
}

#[test]
fn test_every_layout_matches_reference() -> Result<(), TensorFoldError> {
    init_logger();
    let data = values(SHAPE.iter().product());
    let mut seen = HashSet::new();

    for (name, storage) in layouts(&data, &SHAPE) {
        let view = storage.view();
        assert_eq!(view.to_contiguous().data(), data.as_slice(), "layout {}", name);

        for axes in all_axis_sets(SHAPE.len()) {
            seen.insert(plan_reduction(view.layout(), &axes)?.reduction_type);

            let sum = reduce(&view, &axes, 0.0f64, Sum)?;
            let expected = naive_reduce(&data, &SHAPE, &axes, 0.0, |a, b| a + b);
            assert_eq!(sum.data(), expected.as_slice(), "sum, layout {}, axes {:?}", name, axes);

            let max = reduce(&view, &axes, f64::NEG_INFINITY, Max)?;
            let expected = naive_reduce(&data, &SHAPE, &axes, f64::NEG_INFINITY, f64::max);
            assert_eq!(max.data(), expected.as_slice(), "max, layout {}, axes {:?}", name, axes);
        }
    }

    let all_types: HashSet<ReductionType> = [
        ReductionType::ContiguousAllReduce,
        ReductionType::ContiguousReduce,
        ReductionType::ContiguousStridedReduce,
        ReductionType::GeneralContiguousReduce,
        ReductionType::GeneralStridedReduce,
        ReductionType::GeneralReduce,
    ]
    .into_iter()
    .collect();
    assert_eq!(seen, all_types);
    Ok(())
}

#[test]
fn test_forced_plans() -> Result<(), TensorFoldError> {
    let data = values(SHAPE.iter().product());
    let rm = row_major(&data, &SHAPE);
    let perm = permuted(&data, &SHAPE, &[1, 0, 2]);
    let flip = flipped(&data, &SHAPE, 2);

    let cases = [
        (&rm, vec![0, 1, 2], ReductionType::ContiguousAllReduce),
        (&rm, vec![2], ReductionType::ContiguousReduce),
        (&rm, vec![0], ReductionType::ContiguousStridedReduce),
        (&perm, vec![2], ReductionType::GeneralContiguousReduce),
        (&perm, vec![0], ReductionType::GeneralStridedReduce),
        (&flip, vec![2], ReductionType::GeneralReduce),
    ];
    for (storage, axes, reduction_type) in cases {
        let view = storage.view();
        assert_eq!(plan_reduction(view.layout(), &axes)?.reduction_type, reduction_type);
        let result = reduce(&view, &axes, 0.0f64, Sum)?;
        let expected = naive_reduce(&data, &SHAPE, &axes, 0.0, |a, b| a + b);
        assert_eq!(result.data(), expected.as_slice(), "{:?}", reduction_type);
    }
    Ok(())
}

#[test]
fn test_sequential_order_on_contiguous_runs() -> Result<(), TensorFoldError> {
    // "Keep the right operand" is associative but not commutative, so it
    // reveals the visiting order.
    let data = values(SHAPE.iter().product());
    let storage = row_major(&data, &SHAPE);
    let view = storage.view();
    let last = |_acc: f64, value: f64| value;

    for axes in [vec![2], vec![0], vec![1, 2], vec![0, 1, 2]] {
        let result = reduce(&view, &axes, 0.0f64, FnOp(last))?;
        let expected = naive_reduce(&data, &SHAPE, &axes, 0.0, last);
        assert_eq!(result.data(), expected.as_slice(), "axes {:?}", axes);
    }
    Ok(())
}

#[test]
fn test_broadcast_inputs() -> Result<(), TensorFoldError> {
    let data = values(30);
    let base = row_major(&data, &[1, 6, 5]);
    let view = base.view();
    let expanded = view.expand(&SHAPE)?;
    let logical = expanded.to_contiguous();

    for axes in all_axis_sets(SHAPE.len()) {
        let result = reduce(&expanded, &axes, 0.0f64, Sum)?;
        let expected = naive_reduce(logical.data(), &SHAPE, &axes, 0.0, |a, b| a + b);
        assert_eq!(result.data(), expected.as_slice(), "axes {:?}", axes);
    }
    Ok(())
}

#[test]
fn test_keep_dims_matches_squeezed() -> Result<(), TensorFoldError> {
    let data = values(SHAPE.iter().product());
    let storage = permuted(&data, &SHAPE, &[2, 0, 1]);
    let view = storage.view();

    let kept = reduce_keep_dims(&view, &[0, 2], f64::INFINITY, Min)?;
    let squeezed = reduce(&view, &[0, 2], f64::INFINITY, Min)?;
    assert_eq!(kept.shape(), &[1, 6, 1]);
    assert_eq!(squeezed.shape(), &[6]);
    assert_eq!(kept.data(), squeezed.data());
    Ok(())
}

fn random_layout(rng: &mut StdRng, data: &[f64], shape: &[usize]) -> Strided<f64> {
    let rank = shape.len();
    match rng.gen_range(0..4) {
        0 => row_major(data, shape),
        1 => {
            let mut perm: Vec<usize> = (0..rank).collect();
            perm.shuffle(rng);
            permuted(data, shape, &perm)
        }
        2 => flipped(data, shape, rng.gen_range(0..rank)),
        _ => padded(data, shape, f64::NAN),
    }
}

#[test]
fn test_random_layouts_match_reference() -> Result<(), TensorFoldError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let rank = rng.gen_range(1..=4);
        let shape: Vec<usize> = (0..rank).map(|_| rng.gen_range(0..=5)).collect();
        let n: usize = shape.iter().product();
        let data: Vec<f64> = (0..n).map(|_| rng.gen_range(-50..50) as f64).collect();
        let storage = random_layout(&mut rng, &data, &shape);
        let view = storage.view();

        let axes: Vec<usize> = (0..rank).filter(|_| rng.gen_bool(0.5)).collect();
        let result = reduce(&view, &axes, 0.0f64, Sum)?;
        let expected = naive_reduce(&data, &shape, &axes, 0.0, |a, b| a + b);
        assert_eq!(
            result.data(),
            expected.as_slice(),
            "shape {:?}, strides {:?}, axes {:?}",
            view.shape(),
            view.strides(),
            axes
        );
    }
    Ok(())
}
