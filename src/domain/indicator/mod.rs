//! Technical indicator implementations.
//!
//! Indicators take plain value slices and return one output per input, aligned
//! by index with the source series.

pub mod ema;
