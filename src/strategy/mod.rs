//! Reusable selection strategies and filters.
//!
//! Both are pure functions over candidate sets and hold no state, so the
//! same strategy can serve any number of machines.
//!
//! - [`selection`]: narrows one definition's candidates into its contribution
//! - [`filter`]: narrows an assembled set for queries and diagnostics

pub mod filter;
pub mod selection;

pub use filter::Filter;
pub use selection::{SelectFn, Selection};

use std::cmp::Ordering;

/// Compare two state orders. An unordered side (0) compares equal to anything.
pub(crate) fn compare_orders(left: i64, right: i64) -> Ordering {
    if left == 0 || right == 0 {
        Ordering::Equal
    } else {
        left.cmp(&right)
    }
}
