//! In-memory collaborators for exercising the desk without a node.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::sync::{Arc, Mutex};

use crate::ethereum_client::ContractGateway;
use crate::notifier::Notifier;
use crate::types::{Confirmation, TradeId, TradeRecord, TradeRequest};

#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    CreateTrade(TradeRequest),
    ExecuteTrade(TradeId),
    CancelTrade(TradeId),
    GetBalance(Address, Address),
    GetTradeInfo(TradeId),
}

#[derive(Default)]
struct FakeState {
    calls: Vec<GatewayCall>,
    failing: bool,
    balance: u8,
    trade: Option<TradeRecord>,
}

/// Records every call; answers with canned values or fails them all.
#[derive(Clone, Default)]
pub struct FakeGateway {
    state: Arc<Mutex<FakeState>>,
}

impl FakeGateway {
    pub fn failing() -> Self {
        let gateway = Self::default();
        gateway.state.lock().unwrap().failing = true;
        gateway
    }

    pub fn with_balance(self, balance: u8) -> Self {
        self.state.lock().unwrap().balance = balance;
        self
    }

    pub fn with_trade(self, trade: TradeRecord) -> Self {
        self.state.lock().unwrap().trade = Some(trade);
        self
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.state.lock().unwrap().calls.clone()
    }

    fn record(&self, call: GatewayCall) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.failing {
            Err(anyhow!("execution reverted"))
        } else {
            Ok(())
        }
    }

    fn confirmation(&self, trade_id: Option<TradeId>) -> Confirmation {
        Confirmation {
            tx_hash: H256::repeat_byte(0x42),
            block_number: Some(1),
            gas_used: Some(U256::from(21_000)),
            trade_id,
        }
    }
}

#[async_trait]
impl ContractGateway for FakeGateway {
    async fn create_trade(&self, request: &TradeRequest) -> Result<Confirmation> {
        self.record(GatewayCall::CreateTrade(request.clone()))?;
        Ok(self.confirmation(Some(U256::from(self.calls().len()))))
    }

    async fn execute_trade(&self, trade_id: TradeId) -> Result<Confirmation> {
        self.record(GatewayCall::ExecuteTrade(trade_id))?;
        Ok(self.confirmation(None))
    }

    async fn cancel_trade(&self, trade_id: TradeId) -> Result<Confirmation> {
        self.record(GatewayCall::CancelTrade(trade_id))?;
        Ok(self.confirmation(None))
    }

    async fn get_balance(&self, user: Address, token: Address) -> Result<u8> {
        self.record(GatewayCall::GetBalance(user, token))?;
        Ok(self.state.lock().unwrap().balance)
    }

    async fn get_trade_info(&self, trade_id: TradeId) -> Result<TradeRecord> {
        self.record(GatewayCall::GetTradeInfo(trade_id))?;
        self.state
            .lock()
            .unwrap()
            .trade
            .clone()
            .ok_or(anyhow!("trade {} does not exist", trade_id))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Success(String),
    Error(String),
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn success(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Success(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push(Notification::Error(message.to_string()));
    }
}

pub fn trader() -> Address {
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap()
}
