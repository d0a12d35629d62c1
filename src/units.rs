use anyhow::{anyhow, Result};
use ethers::types::{Address, H256, U256};
use ethers::utils::{format_units, parse_units, to_checksum};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::TOKEN_DECIMALS;

/// Parses a human amount such as `"1,250,000.5"` into an 18-decimal fixed-point
/// integer. Thousands separators are ignored; signs, exponents and more than 18
/// fractional digits are rejected.
pub fn parse_token_amount(input: &str) -> Result<U256> {
    let cleaned = strip_separators(input);
    let (whole, fraction) = match cleaned.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (cleaned.as_str(), ""),
    };

    if whole.is_empty() && fraction.is_empty() {
        return Err(anyhow!("`{}` is not an amount", input));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(anyhow!("`{}` is not an amount", input));
    }
    if fraction.len() > TOKEN_DECIMALS as usize {
        return Err(anyhow!(
            "`{}` has more than {} decimal places",
            input,
            TOKEN_DECIMALS
        ));
    }

    let normalized = match (whole.is_empty(), fraction.is_empty()) {
        (true, _) => format!("0.{}", fraction),
        (false, true) => whole.to_string(),
        (false, false) => format!("{}.{}", whole, fraction),
    };

    let amount: U256 = parse_units(normalized, TOKEN_DECIMALS)
        .map_err(|err| anyhow!("unable to scale `{}`: {:?}", input, err))?
        .into();
    Ok(amount)
}

/// Renders an 18-decimal fixed-point integer without trailing zeros.
pub fn format_token_amount(amount: U256) -> String {
    let formatted = match format_units(amount, TOKEN_DECIMALS) {
        Ok(formatted) => formatted,
        // U256 always fits 18 decimals, keep the raw value if it somehow does not
        Err(_) => return amount.to_string(),
    };

    if formatted.contains('.') {
        formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        formatted
    }
}

/// Parses a form amount for arithmetic, ignoring thousands separators.
pub fn parse_decimal(input: &str) -> Option<Decimal> {
    strip_separators(input).parse::<Decimal>().ok()
}

/// Converts a derived decimal (e.g. a minimum output) into the string form
/// accepted by [`parse_token_amount`], truncating past 18 decimals.
pub fn decimal_to_amount_string(value: Decimal) -> String {
    value
        .round_dp_with_strategy(TOKEN_DECIMALS, RoundingStrategy::ToZero)
        .normalize()
        .to_string()
}

/// `0x1234...abcd`, using the checksummed form of the address.
pub fn format_address(address: Address) -> String {
    let checksummed = to_checksum(&address, None);
    format!("{}...{}", &checksummed[..6], &checksummed[checksummed.len() - 4..])
}

pub fn format_tx_hash(hash: H256) -> String {
    format!("0x{}", hex::encode(hash.as_bytes()))
}

fn strip_separators(input: &str) -> String {
    input.trim().replace(',', "")
}
