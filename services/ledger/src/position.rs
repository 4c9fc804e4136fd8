//! Position state and the weighted-average-cost application rule.
//!
//! A position is a signed `size` (positive = long) and a signed cash
//! `notional` (negative when net premium was paid, positive when
//! received). Applying a trade leg splits on the sign relationship
//! between the existing size and the delta; the split is surfaced to
//! callers as [`TradeOutcome`].

use serde::{Deserialize, Serialize};
use types::errors::MathError;
use types::numeric::Fixed;

/// Open position at one market key.
///
/// Invariant: `size == 0` implies `notional == 0` — a fully closed
/// position retains no dust.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub size: Fixed,
    pub notional: Fixed,
}

impl Position {
    pub const FLAT: Position = Position {
        size: Fixed::ZERO,
        notional: Fixed::ZERO,
    };

    pub fn is_flat(&self) -> bool {
        self.size.is_zero()
    }

    /// Average cost per contract; zero for a flat position.
    pub fn average_cost(&self) -> Result<Fixed, MathError> {
        if self.is_flat() {
            Ok(Fixed::ZERO)
        } else {
            self.notional.div(self.size)
        }
    }
}

/// How a trade leg interacted with the existing position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeOutcome {
    /// Opened or grew the position in its current direction.
    Extend,
    /// Closed part of the position; the remainder keeps its pro-rated cost.
    PartialClose,
    /// Closed the position exactly; notional is forced to zero.
    FullClose,
    /// Closed the position and opened the excess in the other direction at
    /// the trade's own per-unit price.
    CloseAndFlip,
}

/// Result of applying one trade leg to a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub outcome: TradeOutcome,
    /// Cash realized by the closed portion (zero for `Extend`).
    pub realized: Fixed,
    /// The position after the leg.
    pub position: Position,
}

/// Apply `(size_delta, notional_delta)` to `existing` under the
/// weighted-average-cost rule.
///
/// Opposing trades realize the pro-rata share of the old notional plus
/// the matching share of the incoming notional; a flip carries the
/// unmatched remainder of the incoming notional into the new position.
/// All pro-rata splits truncate toward zero; a position that lands on
/// exactly zero size has its notional forced to zero.
pub fn apply(
    existing: Position,
    size_delta: Fixed,
    notional_delta: Fixed,
) -> Result<Applied, MathError> {
    let size = existing.size;
    let same_direction =
        size.is_zero() || size_delta.is_zero() || (size.is_positive() == size_delta.is_positive());

    if same_direction {
        let new_size = size.add(size_delta)?;
        let position = if new_size.is_zero() {
            Position::FLAT
        } else {
            Position {
                size: new_size,
                notional: existing.notional.add(notional_delta)?,
            }
        };
        // A no-op leg on a flat position realizes its notional directly
        // rather than stranding cash basis on zero size.
        let realized = if new_size.is_zero() {
            existing.notional.add(notional_delta)?
        } else {
            Fixed::ZERO
        };
        return Ok(Applied {
            outcome: TradeOutcome::Extend,
            realized,
            position,
        });
    }

    let closing = size_delta.abs().min(size.abs());
    // Share of the old notional released by the closed contracts, and the
    // share of the incoming notional that matches them.
    let released = existing.notional.mul_div(closing, size.abs())?;
    let matched = notional_delta.mul_div(closing, size_delta.abs())?;
    let realized = released.add(matched)?;

    if closing < size.abs() {
        // Partial close: remainder keeps its pro-rated cost basis.
        let position = Position {
            size: size.add(size_delta)?,
            notional: existing.notional.sub(released)?,
        };
        return Ok(Applied {
            outcome: TradeOutcome::PartialClose,
            realized,
            position,
        });
    }

    if size_delta.abs() == size.abs() {
        return Ok(Applied {
            outcome: TradeOutcome::FullClose,
            realized,
            position: Position::FLAT,
        });
    }

    // Flip: the excess opens in the trade's direction carrying the
    // unmatched slice of the incoming notional.
    let position = Position {
        size: size.add(size_delta)?,
        notional: notional_delta.sub(matched)?,
    };
    Ok(Applied {
        outcome: TradeOutcome::CloseAndFlip,
        realized,
        position,
    })
}
