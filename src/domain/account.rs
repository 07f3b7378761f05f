//! Account state sampled once per evaluation cycle.

/// Read-only for the whole cycle; fills within a cycle are not reflected.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    pub balance: f64,
    pub currency: String,
}
