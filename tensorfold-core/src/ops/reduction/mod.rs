// src/ops/reduction/mod.rs
// Reduction engine: operators, planner, kernels and dispatcher.

pub mod dispatch;
pub mod kernels;
pub mod op;
pub mod plan;
pub mod utils;

pub use dispatch::{reduce, reduce_into, reduce_keep_dims};
pub use op::{And, FnOp, Max, Min, Or, Prod, ReduceOp, Sum};
pub use plan::{plan_reduction, ReductionPlan, ReductionType};
pub use utils::reduced_shape;
