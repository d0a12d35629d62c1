use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

pub const DEFAULT_SEPOLIA_RPC_URL: &str = "https://sepolia.infura.io/v3/demo";
pub const DEFAULT_MAINNET_RPC_URL: &str = "https://mainnet.infura.io/v3/demo";

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;
pub const MAINNET_CHAIN_ID: u64 = 1;

pub const USDT_ADDRESS: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
pub const USDC_ADDRESS: &str = "0xA0b86a33E6441b8c4C8C0E4b8c4C8C0E4b8c4C8C";
pub const ETH_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const BTC_ADDRESS: &str = "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599";

/// Every token on the desk is treated as an 18-decimal asset.
pub const TOKEN_DECIMALS: u32 = 18;

/// Quoted rate used for every preview; there is no price feed.
pub const MOCK_RATE: Decimal = dec!(2451.45);

/// Share of the estimated output the trader is guaranteed to receive (5% slippage).
pub const MIN_OUTPUT_RATIO: Decimal = dec!(0.95);

pub const DEADLINE_WINDOW_SECS: u64 = 60 * 60; // 1 hour expiry

/// Advisory only, shown under the amount field.
pub const MINIMUM_TRADE_SIZE: &str = "100,000";

pub const DEFAULT_POLLING_FREQUENCY_SECS: u64 = 10;
