use ethers::types::Address;
use log::{debug, error};

use crate::error::DeskError;
use crate::ethereum_client::ContractGateway;
use crate::notifier::Notifier;
use crate::tokens::find_token;
use crate::types::{Confirmation, TradeId, TradeRecord, TradeRequest};
use crate::units::{format_token_amount, parse_token_amount};

/// Maps user actions onto gateway calls and tracks the outcome of the last one.
///
/// Write calls require a connected account, notify on both outcomes and hand
/// the error back to the caller. Reads never fail: they fall back to `0` or
/// `None`. Calls are neither queued nor deduplicated.
pub struct TradeDesk<G, N> {
    gateway: G,
    notifier: N,
    account: Option<Address>,
    is_loading: bool,
    error: Option<String>,
}

impl<G: ContractGateway, N: Notifier> TradeDesk<G, N> {
    pub fn new(gateway: G, notifier: N, account: Option<Address>) -> Self {
        Self {
            gateway,
            notifier,
            account,
            is_loading: false,
            error: None,
        }
    }

    #[cfg(test)]
    pub fn set_account(&mut self, account: Option<Address>) {
        self.account = account;
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    #[cfg(test)]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Like the write calls' own check, but tells the user before failing.
    pub fn require_wallet(&self) -> Result<(), DeskError> {
        if self.is_connected() {
            return Ok(());
        }
        self.notifier.error("Please connect your wallet first");
        Err(DeskError::WalletNotConnected)
    }

    pub async fn create_trade(
        &mut self,
        from_token: &str,
        to_token: &str,
        from_amount: &str,
        min_to_amount: &str,
        deadline: u64,
    ) -> Result<Confirmation, DeskError> {
        if !self.is_connected() {
            return Err(DeskError::WalletNotConnected);
        }

        self.begin();
        let result = match build_trade_request(
            from_token,
            to_token,
            from_amount,
            min_to_amount,
            deadline,
        ) {
            Ok(request) => {
                debug!(
                    "submitting createTrade: {} {} for at least {} {}, deadline {}",
                    format_token_amount(request.from_amount),
                    from_token,
                    format_token_amount(request.min_to_amount),
                    to_token,
                    request.deadline
                );
                self.gateway
                    .create_trade(&request)
                    .await
                    .map_err(DeskError::remote)
            }
            Err(err) => Err(err),
        };
        self.settle(
            result,
            "Trade created successfully!",
            "Failed to create trade",
        )
    }

    pub async fn execute_trade(&mut self, trade_id: TradeId) -> Result<Confirmation, DeskError> {
        if !self.is_connected() {
            return Err(DeskError::WalletNotConnected);
        }

        self.begin();
        let result = self
            .gateway
            .execute_trade(trade_id)
            .await
            .map_err(DeskError::remote);
        self.settle(
            result,
            "Trade executed successfully!",
            "Failed to execute trade",
        )
    }

    pub async fn cancel_trade(&mut self, trade_id: TradeId) -> Result<Confirmation, DeskError> {
        if !self.is_connected() {
            return Err(DeskError::WalletNotConnected);
        }

        self.begin();
        let result = self
            .gateway
            .cancel_trade(trade_id)
            .await
            .map_err(DeskError::remote);
        self.settle(
            result,
            "Trade canceled successfully!",
            "Failed to cancel trade",
        )
    }

    pub async fn get_balance(&self, symbol: &str) -> u8 {
        let user = match self.account {
            Some(user) => user,
            None => return 0,
        };
        let token = match find_token(symbol).map(|token| token.address()) {
            Some(Ok(token)) => token,
            _ => return 0,
        };

        match self.gateway.get_balance(user, token).await {
            Ok(balance) => balance,
            Err(err) => {
                error!("Error getting balance: {:?}", err);
                0
            }
        }
    }

    pub async fn get_trade_info(&self, trade_id: TradeId) -> Option<TradeRecord> {
        match self.gateway.get_trade_info(trade_id).await {
            Ok(record) => Some(record),
            Err(err) => {
                error!("Error getting trade info: {:?}", err);
                None
            }
        }
    }

    fn begin(&mut self) {
        if let Some(previous) = self.error.take() {
            debug!("clearing earlier failure: {}", previous);
        }
        self.is_loading = true;
    }

    fn settle(
        &mut self,
        result: Result<Confirmation, DeskError>,
        success_message: &str,
        fallback_message: &str,
    ) -> Result<Confirmation, DeskError> {
        debug_assert!(self.is_loading, "settle without begin");
        self.is_loading = false;

        match &result {
            Ok(_) => self.notifier.success(success_message),
            Err(err) => {
                let message = match err.to_string() {
                    message if message.is_empty() => fallback_message.to_string(),
                    message => message,
                };
                self.notifier.error(&message);
                self.error = Some(message);
            }
        }

        result
    }
}

fn build_trade_request(
    from_token: &str,
    to_token: &str,
    from_amount: &str,
    min_to_amount: &str,
    deadline: u64,
) -> Result<TradeRequest, DeskError> {
    let resolve = |symbol: &str| {
        find_token(symbol)
            .and_then(|token| token.address().ok())
            .ok_or(DeskError::InvalidToken(symbol.to_string()))
    };
    let amount = |input: &str| {
        parse_token_amount(input).map_err(|_| DeskError::InvalidAmount(input.to_string()))
    };

    let request = TradeRequest {
        from_token: resolve(from_token)?,
        to_token: resolve(to_token)?,
        from_amount: amount(from_amount)?,
        min_to_amount: amount(min_to_amount)?,
        deadline,
    };

    if request.from_amount.is_zero() {
        return Err(DeskError::InvalidAmount(from_amount.to_string()));
    }

    Ok(request)
}
