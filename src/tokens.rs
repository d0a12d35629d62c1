use anyhow::{Context, Result};
use ethers::types::Address;

use crate::constants::{BTC_ADDRESS, ETH_ADDRESS, TOKEN_DECIMALS, USDC_ADDRESS, USDT_ADDRESS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub symbol: &'static str,
    pub name: &'static str,
    address: &'static str,
    pub decimals: u32,
    /// Display-only balance; the desk never reads real holdings for this table.
    pub mock_balance: &'static str,
}

impl Token {
    pub fn address(&self) -> Result<Address> {
        self.address
            .parse()
            .context(format!("malformed address for token {}", self.symbol))
    }
}

pub const TOKENS: [Token; 4] = [
    Token {
        symbol: "USDT",
        name: "Tether USD",
        address: USDT_ADDRESS,
        decimals: TOKEN_DECIMALS,
        mock_balance: "1,250,000",
    },
    Token {
        symbol: "ETH",
        name: "Ethereum",
        address: ETH_ADDRESS,
        decimals: TOKEN_DECIMALS,
        mock_balance: "456.78",
    },
    Token {
        symbol: "BTC",
        name: "Bitcoin",
        address: BTC_ADDRESS,
        decimals: TOKEN_DECIMALS,
        mock_balance: "12.45",
    },
    Token {
        symbol: "USDC",
        name: "USD Coin",
        address: USDC_ADDRESS,
        decimals: TOKEN_DECIMALS,
        mock_balance: "890,000",
    },
];

/// Exact, case-sensitive symbol lookup.
pub fn find_token(symbol: &str) -> Option<&'static Token> {
    TOKENS.iter().find(|token| token.symbol == symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table() {
        for token in TOKENS.iter() {
            assert!(token.address().is_ok(), "{} has a bad address", token.symbol);
            assert_eq!(token.decimals, 18);
        }

        assert_eq!(find_token("ETH").map(|t| t.name), Some("Ethereum"));
        assert_eq!(
            find_token("USDT").unwrap().address().unwrap(),
            USDT_ADDRESS.parse::<Address>().unwrap()
        );
        assert!(find_token("DOGE").is_none());
        assert!(find_token("eth").is_none());
    }
}
