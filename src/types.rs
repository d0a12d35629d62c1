use ethers::abi::Address;
use ethers::types::{H256, U256};
use serde::Serialize;

pub type TradeId = U256;

/// Arguments of `createTrade`, already resolved to addresses and 18-decimal amounts.
#[derive(Debug, PartialEq, Clone)]
pub struct TradeRequest {
    pub from_token: Address,
    pub to_token: Address,
    pub from_amount: U256,
    pub min_to_amount: U256,
    pub deadline: u64, // unix seconds
}

/// Fixed gas for write calls, sent as legacy transactions instead of
/// estimating EIP-1559 fees.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct LegacyGas {
    pub gas_limit: U256,
    pub gas_price: U256, // wei
}

/// On-chain trade as returned by `getTradeInfo`.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeRecord {
    pub trader: Address,
    pub from_token: Address,
    pub to_token: Address,
    pub from_amount: u8,
    pub to_amount: u8,
    pub price: u8,
    pub is_executed: bool,
    pub is_private: bool,
    pub timestamp: U256,
    pub deadline: U256,
}

/// A mined write call.
#[derive(Debug, PartialEq, Clone)]
pub struct Confirmation {
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<U256>,
    /// Only set for `createTrade`, decoded from the `TradeCreated` log.
    pub trade_id: Option<TradeId>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum TradeEvent {
    #[serde(rename_all = "camelCase")]
    Created {
        trade_id: TradeId,
        trader: Address,
        from_token: Address,
        to_token: Address,
    },
    #[serde(rename_all = "camelCase")]
    Executed {
        trade_id: TradeId,
        trader: Address,
        from_amount: u32,
        to_amount: u32,
    },
}

pub type BlockNumber = u64;
