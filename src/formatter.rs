//! Display formatting for fee values
//!
//! One fixed rule per unit and network:
//!
//! | unit   | kind    | rendering              |
//! |--------|---------|------------------------|
//! | Fiat   | any     | `$142.50`              |
//! | Native | Evm     | `45 gwei`              |
//! | Native | Bitcoin | `12.3 sat/vB`          |
//! | Native | Solana  | `2841 TPS`             |
//!
//! Fiat is a presentation choice only: the value is printed as a currency
//! amount as-is. No price lookup or conversion happens here or anywhere else
//! in the crate, so a fiat figure is only meaningful if the host already
//! holds a fiat-denominated value.
//!
//! Negative or non-finite input is rendered with the plain `f64` formatting
//! instead of the rule, so formatting never fails.

use crate::types::{AggregateSample, CryptoKind, DisplayUnit};

/// Currency symbol used for fiat rendering
pub const FIAT_SYMBOL: &str = "$";

/// Formats `value` for display
///
/// # Example
/// ```
/// use network_fee_sdk::formatter::format;
/// use network_fee_sdk::{CryptoKind, DisplayUnit};
///
/// assert_eq!(format(45.0, CryptoKind::Evm, DisplayUnit::Native), "45 gwei");
/// assert_eq!(format(142.5, CryptoKind::Evm, DisplayUnit::Fiat), "$142.50");
/// ```
pub fn format(value: f64, kind: CryptoKind, unit: DisplayUnit) -> String {
    let in_range = value.is_finite() && value >= 0.0;

    match unit {
        DisplayUnit::Fiat if in_range => format!("{}{:.2}", FIAT_SYMBOL, value),
        DisplayUnit::Fiat => format!("{}{}", FIAT_SYMBOL, value),
        DisplayUnit::Native if !in_range => format!("{} {}", value, kind.native_unit()),
        DisplayUnit::Native => match kind {
            CryptoKind::Evm | CryptoKind::Solana => {
                format!("{:.0} {}", value, kind.native_unit())
            }
            CryptoKind::Bitcoin => format!("{:.1} {}", value, kind.native_unit()),
        },
    }
}

/// Formats every field of a sample as `(label, text)` pairs
pub fn format_sample(sample: &AggregateSample, unit: DisplayUnit) -> Vec<(&'static str, String)> {
    sample
        .fields()
        .into_iter()
        .map(|(label, value, kind)| (label, format(value, kind, unit)))
        .collect()
}
