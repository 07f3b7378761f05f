//! Risk-based position sizing.
//!
//! risk_money = balance * risk_fraction
//! pip_value_per_lot = contract_size * point
//! raw_lots = risk_money / ((stop_distance / point) * pip_value_per_lot)
//!
//! Lots are floored to the volume step so the sized trade never risks more than
//! the budget, then clamped up to the smallest tradable volume.

use crate::domain::symbol::SymbolSpec;
use std::fmt;

pub const FALLBACK_VOLUME: f64 = 0.01;

/// Slack for `raw / step` landing a hair under an integer after float division.
const STEP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    MissingSymbolSpec,
    NonPositiveStopDistance,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::MissingSymbolSpec => write!(f, "symbol specification unavailable"),
            FallbackReason::NonPositiveStopDistance => write!(f, "stop distance is not positive"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizingBasis {
    RiskBased,
    Fallback(FallbackReason),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingOutcome {
    pub volume: f64,
    pub basis: SizingBasis,
}

impl SizingOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.basis, SizingBasis::Fallback(_))
    }
}

pub fn size_position(
    stop_distance: f64,
    balance: f64,
    risk_fraction: f64,
    spec: Option<&SymbolSpec>,
) -> SizingOutcome {
    let Some(spec) = spec else {
        return fallback(FallbackReason::MissingSymbolSpec);
    };
    // NaN distances land here too
    if !(stop_distance > 0.0) {
        return fallback(FallbackReason::NonPositiveStopDistance);
    }

    let point = spec.effective_point();
    let step = spec.effective_volume_step();

    let risk_money = balance * risk_fraction;
    let pip_value_per_lot = spec.effective_contract_size() * point;
    let points = stop_distance / point;
    let raw_lots = risk_money / (points * pip_value_per_lot);

    let floored = floor_to_step(raw_lots.max(0.0), step);
    let minimum = ceil_to_step(spec.min_volume, step).max(step);

    SizingOutcome {
        volume: round_to_step_precision(floored.max(minimum), step),
        basis: SizingBasis::RiskBased,
    }
}

fn fallback(reason: FallbackReason) -> SizingOutcome {
    SizingOutcome {
        volume: FALLBACK_VOLUME,
        basis: SizingBasis::Fallback(reason),
    }
}

fn floor_to_step(value: f64, step: f64) -> f64 {
    (value / step + STEP_TOLERANCE).floor() * step
}

fn ceil_to_step(value: f64, step: f64) -> f64 {
    (value / step - STEP_TOLERANCE).ceil() * step
}

/// Snaps onto the step grid, then trims float noise to the step's own decimals.
fn round_to_step_precision(value: f64, step: f64) -> f64 {
    let snapped = (value / step).round() * step;
    let scale = 10f64.powi(step_decimals(step));
    (snapped * scale).round() / scale
}

/// Decimal places of `step` as written: 0.25 -> 2, 0.025 -> 3, 1 -> 0.
fn step_decimals(step: f64) -> i32 {
    (0..=10)
        .find(|&d| {
            let scaled = step * 10f64.powi(d);
            (scaled - scaled.round()).abs() < STEP_TOLERANCE * scaled.max(1.0)
        })
        .unwrap_or(10)
}
