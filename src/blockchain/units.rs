//! Conversion between raw token integers and display strings, and the
//! staking pre-approval check.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::blockchain::types::{GatewayError, GatewayResult};

/// Allowance above which staking counts as pre-approved. Raw base units,
/// compared before any decimal rescaling.
pub const APPROVAL_THRESHOLD: U256 = U256::from_limbs([100_000_000, 0, 0, 0]);

/// Render a raw amount with `decimals` places, trimming trailing zeros but
/// keeping at least one fractional digit (`"1000.0"`, `"1.5"`).
pub fn display_units(raw: U256, decimals: u8) -> GatewayResult<String> {
    let formatted = format_units(raw, decimals).map_err(|e| GatewayError::InvalidAmount {
        amount: raw.to_string(),
        reason: e.to_string(),
    })?;

    Ok(trim_fraction(&formatted))
}

fn trim_fraction(formatted: &str) -> String {
    match formatted.split_once('.') {
        Some((whole, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                format!("{whole}.0")
            } else {
                format!("{whole}.{fraction}")
            }
        }
        None => format!("{formatted}.0"),
    }
}

/// Parse a display amount such as `"12.5"` into raw base units.
pub fn parse_display(amount: &str, decimals: u8) -> GatewayResult<U256> {
    let invalid = |reason: String| GatewayError::InvalidAmount {
        amount: amount.to_string(),
        reason,
    };

    let trimmed = amount.trim();
    if trimmed.starts_with('-') {
        return Err(invalid("amount must not be negative".to_string()));
    }

    parse_units(trimmed, decimals)
        .map(|units| units.get_absolute())
        .map_err(|e| invalid(e.to_string()))
}

/// Whether an allowance is large enough to skip the approval step.
pub fn is_pre_approved(allowance: U256) -> bool {
    allowance > APPROVAL_THRESHOLD
}
