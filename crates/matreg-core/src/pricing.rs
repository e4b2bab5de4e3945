//! # Price Categorization
//!
//! Derives the display tier of a material from its buy price.
//!
//! ```text
//!   price < 100.00            → Invalid (< 100)
//!   100.00 ≤ price < 500.00   → Budget (100-499)
//!   500.00 ≤ price < 1000.00  → Standard (500-999)
//!   price ≥ 1000.00           → Premium (1000+)
//! ```
//!
//! The registries store the label next to the price and recompute it on
//! every write that touches the price. `Invalid` is unreachable for stored
//! materials because of the price floor, but is still computed correctly.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

const BUDGET_FLOOR: Money = Money::from_cents(10_000);
const STANDARD_FLOOR: Money = Money::from_cents(50_000);
const PREMIUM_FLOOR: Money = Money::from_cents(100_000);

/// Price tier of a material.
///
/// Variants are declared in ascending order so `Ord` follows the tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PriceCategory {
    Invalid,
    Budget,
    Standard,
    Premium,
}

impl PriceCategory {
    /// Human-readable label, as stored and as returned by the API.
    pub const fn label(&self) -> &'static str {
        match self {
            PriceCategory::Invalid => "Invalid (< 100)",
            PriceCategory::Budget => "Budget (100-499)",
            PriceCategory::Standard => "Standard (500-999)",
            PriceCategory::Premium => "Premium (1000+)",
        }
    }

    /// Reverse of [`PriceCategory::label`], used when reading stored rows.
    pub fn from_label(label: &str) -> Option<Self> {
        [
            PriceCategory::Invalid,
            PriceCategory::Budget,
            PriceCategory::Standard,
            PriceCategory::Premium,
        ]
        .into_iter()
        .find(|c| c.label() == label)
    }
}

impl fmt::Display for PriceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categorizes a buy price.
///
/// ## Example
/// ```rust
/// use matreg_core::money::Money;
/// use matreg_core::pricing::{categorize, PriceCategory};
///
/// assert_eq!(categorize(Money::from_cents(49_999)), PriceCategory::Budget);
/// assert_eq!(categorize(Money::from_cents(50_000)), PriceCategory::Standard);
/// ```
pub fn categorize(buy_price: Money) -> PriceCategory {
    if buy_price < BUDGET_FLOOR {
        PriceCategory::Invalid
    } else if buy_price < STANDARD_FLOOR {
        PriceCategory::Budget
    } else if buy_price < PREMIUM_FLOOR {
        PriceCategory::Standard
    } else {
        PriceCategory::Premium
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
