//! Stock reconciliation rules for the loan lifecycle.
//!
//! An item's `stock` counter must always equal its shelf quantity minus the
//! sum of quantities of its outstanding (borrowed) loans. Every loan mutation
//! maps to exactly one [`StockAdjustment`], computed here and applied by the
//! repository inside the same database transaction as the loan write.

use crate::models::loan::LoanStatus;

/// The stock movement a loan mutation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockAdjustment {
    /// No stock movement
    Unchanged,
    /// Take `n` units off the shelf; fails when fewer than `n` are available
    Reserve(i32),
    /// Put `n` units back on the shelf
    Release(i32),
}

impl StockAdjustment {
    /// Signed effect on the stock counter
    pub fn delta(&self) -> i64 {
        match *self {
            StockAdjustment::Unchanged => 0,
            StockAdjustment::Reserve(n) => -(n as i64),
            StockAdjustment::Release(n) => n as i64,
        }
    }
}

/// Adjustment for creating a loan with the given status and quantity.
///
/// A loan created already returned is a historical record and moves nothing.
pub fn on_checkout(status: LoanStatus, quantity: i32) -> StockAdjustment {
    match status {
        LoanStatus::Borrowed => StockAdjustment::Reserve(quantity),
        LoanStatus::Returned => StockAdjustment::Unchanged,
    }
}

/// Adjustment for a status transition on an existing loan.
///
/// Re-submitting the current status is a no-op, so status updates are
/// idempotent and a retried return can never release stock twice.
pub fn on_transition(from: LoanStatus, to: LoanStatus, quantity: i32) -> StockAdjustment {
    match (from, to) {
        (LoanStatus::Returned, LoanStatus::Borrowed) => StockAdjustment::Reserve(quantity),
        (LoanStatus::Borrowed, LoanStatus::Returned) => StockAdjustment::Release(quantity),
        _ => StockAdjustment::Unchanged,
    }
}

/// Adjustment for amending the quantity of a borrowed loan.
pub fn on_amendment(from_quantity: i32, to_quantity: i32) -> StockAdjustment {
    let diff = to_quantity - from_quantity;
    if diff > 0 {
        StockAdjustment::Reserve(diff)
    } else if diff < 0 {
        StockAdjustment::Release(-diff)
    } else {
        StockAdjustment::Unchanged
    }
}

/// Adjustment for deleting a loan record.
///
/// A borrowed loan gives its units back before the record disappears.
pub fn on_removal(status: LoanStatus, quantity: i32) -> StockAdjustment {
    match status {
        LoanStatus::Borrowed => StockAdjustment::Release(quantity),
        LoanStatus::Returned => StockAdjustment::Unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use LoanStatus::{Borrowed, Returned};
    use StockAdjustment::{Release, Reserve, Unchanged};

    #[test]
    fn checkout_reserves_only_borrowed_loans() {
        assert_eq!(on_checkout(Borrowed, 3), Reserve(3));
        assert_eq!(on_checkout(Returned, 3), Unchanged);
    }

    #[test]
    fn transition_same_status_is_idempotent() {
        assert_eq!(on_transition(Borrowed, Borrowed, 4), Unchanged);
        assert_eq!(on_transition(Returned, Returned, 4), Unchanged);
    }

    #[test]
    fn returning_releases_and_reborrowing_reserves() {
        assert_eq!(on_transition(Borrowed, Returned, 4), Release(4));
        assert_eq!(on_transition(Returned, Borrowed, 4), Reserve(4));
    }

    #[test]
    fn amendment_moves_only_the_difference() {
        assert_eq!(on_amendment(2, 5), Reserve(3));
        assert_eq!(on_amendment(5, 2), Release(3));
        assert_eq!(on_amendment(5, 5), Unchanged);
    }

    #[test]
    fn removal_releases_outstanding_units() {
        assert_eq!(on_removal(Borrowed, 2), Release(2));
        assert_eq!(on_removal(Returned, 2), Unchanged);
    }

    /// Walk a loan through its whole lifecycle and check the books balance:
    /// stock plus outstanding units must equal the starting stock after every
    /// step, and end-of-life stock must equal the starting stock.
    #[test]
    fn lifecycle_keeps_stock_consistent() {
        let initial = 10i64;
        let mut stock = initial;
        let mut outstanding = 0i64;

        let mut apply = |adj: StockAdjustment, qty_after: i64, stock: &mut i64| {
            *stock += adj.delta();
            outstanding = qty_after;
            assert_eq!(*stock + outstanding, initial);
        };

        // create borrowed with quantity 4
        apply(on_checkout(Borrowed, 4), 4, &mut stock);
        // amend 4 -> 6
        apply(on_amendment(4, 6), 6, &mut stock);
        // amend 6 -> 1
        apply(on_amendment(6, 1), 1, &mut stock);
        // return
        apply(on_transition(Borrowed, Returned, 1), 0, &mut stock);
        // borrow again
        apply(on_transition(Returned, Borrowed, 1), 1, &mut stock);
        // delete while borrowed
        apply(on_removal(Borrowed, 1), 0, &mut stock);

        assert_eq!(stock, initial);
    }

    #[test]
    fn deltas_match_adjustments() {
        assert_eq!(Reserve(3).delta(), -3);
        assert_eq!(Release(3).delta(), 3);
        assert_eq!(Unchanged.delta(), 0);
    }
}
