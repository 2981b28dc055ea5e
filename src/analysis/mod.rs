//! Client-side aggregation over filtered graduate records.

pub mod aggregator;
pub mod crosstab;

pub use aggregator::*;
pub use crosstab::build_crosstab;
