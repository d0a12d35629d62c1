use rust_decimal::Decimal;

use crate::constants::{DEADLINE_WINDOW_SECS, MIN_OUTPUT_RATIO, MOCK_RATE, TOKEN_DECIMALS};
use crate::desk::TradeDesk;
use crate::error::DeskError;
use crate::ethereum_client::ContractGateway;
use crate::notifier::Notifier;
use crate::types::Confirmation;
use crate::units::{decimal_to_amount_string, parse_decimal};

#[derive(Debug, Clone, PartialEq)]
pub struct TradePreview {
    pub from_token: String,
    pub to_token: String,
    pub rate: Decimal,
    pub estimated_output: Decimal,
    pub privacy_level: &'static str,
}

impl TradePreview {
    pub fn estimated_output_display(&self) -> String {
        format!("~{:.4} {}", self.estimated_output, self.to_token)
    }

    pub fn rate_display(&self) -> String {
        format!("{} {}/{}", self.rate, self.from_token, self.to_token)
    }
}

/// The `createTrade` arguments a valid form produces.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeOrder {
    pub from_token: String,
    pub to_token: String,
    pub from_amount: String,
    pub min_to_amount: String,
    pub deadline: u64,
}

/// Trading form state. The privacy flag only changes what is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeForm {
    pub from_token: String,
    pub to_token: String,
    pub amount: String,
    pub is_private: bool,
}

impl Default for TradeForm {
    fn default() -> Self {
        Self {
            from_token: "USDT".to_string(),
            to_token: "ETH".to_string(),
            amount: String::new(),
            is_private: true,
        }
    }
}

impl TradeForm {
    pub fn toggle_privacy(&mut self) {
        self.is_private = !self.is_private;
    }

    pub fn mode_label(&self) -> &'static str {
        if self.is_private {
            "Private Mode"
        } else {
            "Standard Mode"
        }
    }

    /// `None` until the amount field holds a number.
    pub fn preview(&self) -> Option<TradePreview> {
        let amount = parse_decimal(&self.amount)?;
        Some(TradePreview {
            from_token: self.from_token.clone(),
            to_token: self.to_token.clone(),
            rate: MOCK_RATE,
            estimated_output: amount.checked_div(MOCK_RATE)?,
            privacy_level: if self.is_private { "Maximum" } else { "Standard" },
        })
    }

    /// Checks the form and derives the minimum output and deadline at `now`.
    pub fn order(&self, now: u64) -> Result<TradeOrder, DeskError> {
        if self.from_token == self.to_token {
            return Err(DeskError::InvalidToken(self.to_token.clone()));
        }

        let amount = parse_decimal(&self.amount)
            .filter(|amount| amount.is_sign_positive() && !amount.is_zero())
            .filter(|amount| amount.scale() <= TOKEN_DECIMALS)
            .ok_or(DeskError::InvalidAmount(self.amount.clone()))?;
        let estimated_output = amount
            .checked_div(MOCK_RATE)
            .ok_or(DeskError::InvalidAmount(self.amount.clone()))?;
        let min_to_amount = estimated_output
            .checked_mul(MIN_OUTPUT_RATIO)
            .ok_or(DeskError::InvalidAmount(self.amount.clone()))?;

        Ok(TradeOrder {
            from_token: self.from_token.clone(),
            to_token: self.to_token.clone(),
            from_amount: decimal_to_amount_string(amount),
            min_to_amount: decimal_to_amount_string(min_to_amount),
            deadline: now + DEADLINE_WINDOW_SECS,
        })
    }

    /// Validates locally, then submits through the desk. The amount is cleared
    /// only when the trade was mined.
    pub async fn submit<G: ContractGateway, N: Notifier>(
        &mut self,
        desk: &mut TradeDesk<G, N>,
        now: u64,
    ) -> Result<Confirmation, DeskError> {
        desk.require_wallet()?;

        let order = match self.order(now) {
            Ok(order) => order,
            Err(err) => {
                let message = match &err {
                    DeskError::InvalidAmount(_) => "Please enter a valid amount".to_string(),
                    other => other.to_string(),
                };
                desk.notifier().error(&message);
                return Err(err);
            }
        };

        let confirmation = desk
            .create_trade(
                &order.from_token,
                &order.to_token,
                &order.from_amount,
                &order.min_to_amount,
                order.deadline,
            )
            .await?;

        self.amount.clear();
        Ok(confirmation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{trader, FakeGateway, GatewayCall, Notification, RecordingNotifier};
    use crate::units::parse_token_amount;
    use ethers::types::U256;
    use rust_decimal_macros::dec;

    const NOW: u64 = 1_700_000_000;

    fn form(amount: &str) -> TradeForm {
        TradeForm {
            amount: amount.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_preview() {
        assert_eq!(form("").preview(), None);
        assert_eq!(form("abc").preview(), None);

        let preview = form("100,000").preview().expect("preview");
        assert_eq!(preview.rate, dec!(2451.45));
        assert_eq!(preview.rate_display(), "2451.45 USDT/ETH");
        assert_eq!(preview.estimated_output_display(), "~40.7922 ETH");
        assert_eq!(preview.privacy_level, "Maximum");

        let mut standard = form("2451.45");
        standard.toggle_privacy();
        let preview = standard.preview().expect("preview");
        assert_eq!(preview.estimated_output, dec!(1));
        assert_eq!(preview.privacy_level, "Standard");
        assert_eq!(standard.mode_label(), "Standard Mode");
    }

    #[test]
    fn test_order() {
        let order = form("100000").order(NOW).expect("order");
        assert_eq!(order.from_amount, "100000");
        assert_eq!(order.deadline, NOW + 3600);

        let expected_min = dec!(100000) / dec!(2451.45) * dec!(0.95);
        assert_eq!(order.min_to_amount, decimal_to_amount_string(expected_min));
        assert!(order.min_to_amount.starts_with("38.752"));

        let order = form("4902.9").order(NOW).expect("order");
        assert_eq!(order.min_to_amount, "1.9");
    }

    #[test]
    fn test_order_validation() {
        for amount in ["", "0", "-5", "0.000", "many", "1.0000000000000000001"] {
            assert_eq!(
                form(amount).order(NOW),
                Err(DeskError::InvalidAmount(amount.to_string())),
                "amount {:?}",
                amount
            );
        }

        let mut same_token = form("10");
        same_token.to_token = "USDT".to_string();
        assert_eq!(
            same_token.order(NOW),
            Err(DeskError::InvalidToken("USDT".to_string()))
        );
    }

    #[tokio::test]
    async fn test_submit_without_wallet() {
        let gateway = FakeGateway::default();
        let notifier = RecordingNotifier::default();
        let mut desk = TradeDesk::new(gateway.clone(), notifier.clone(), None);
        let mut form = form("100000");

        assert_eq!(
            form.submit(&mut desk, NOW).await,
            Err(DeskError::WalletNotConnected)
        );
        assert!(gateway.calls().is_empty());
        assert_eq!(
            notifier.notifications(),
            vec![Notification::Error("Please connect your wallet first".into())]
        );
        assert_eq!(form.amount, "100000");
    }

    #[tokio::test]
    async fn test_submit_rejects_non_positive_amount() {
        let gateway = FakeGateway::default();
        let notifier = RecordingNotifier::default();
        let mut desk = TradeDesk::new(gateway.clone(), notifier.clone(), Some(trader()));

        for amount in ["0", "-1"] {
            let mut form = form(amount);
            assert!(matches!(
                form.submit(&mut desk, NOW).await,
                Err(DeskError::InvalidAmount(_))
            ));
        }

        assert!(gateway.calls().is_empty());
        assert_eq!(
            notifier.notifications(),
            vec![
                Notification::Error("Please enter a valid amount".into()),
                Notification::Error("Please enter a valid amount".into()),
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_rejects_excess_precision() {
        let gateway = FakeGateway::default();
        let notifier = RecordingNotifier::default();
        let mut desk = TradeDesk::new(gateway.clone(), notifier.clone(), Some(trader()));
        let mut trade_form = form("1.0000000000000000001");

        assert_eq!(
            trade_form.submit(&mut desk, NOW).await,
            Err(DeskError::InvalidAmount("1.0000000000000000001".into()))
        );
        assert!(gateway.calls().is_empty());
        assert_eq!(
            notifier.notifications(),
            vec![Notification::Error("Please enter a valid amount".into())]
        );

        let order = form("1.000000000000000001").order(NOW).expect("order");
        assert_eq!(order.from_amount, "1.000000000000000001");
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_amount() {
        let gateway = FakeGateway::failing();
        let mut desk = TradeDesk::new(gateway.clone(), RecordingNotifier::default(), Some(trader()));
        let mut form = form("250");

        assert!(form.submit(&mut desk, NOW).await.is_err());
        assert_eq!(form.amount, "250");
        assert_eq!(gateway.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_usdt_to_eth_end_to_end() {
        let gateway = FakeGateway::default();
        let notifier = RecordingNotifier::default();
        let mut desk = TradeDesk::new(gateway.clone(), notifier.clone(), None);
        let mut form = TradeForm::default();

        desk.set_account(Some(trader()));
        assert!(desk.is_connected());

        form.from_token = "USDT".to_string();
        form.to_token = "ETH".to_string();
        form.amount = "100000".to_string();

        let preview = form.preview().expect("preview");
        assert_eq!(preview.rate, dec!(2451.45));
        assert!(preview.estimated_output_display().starts_with("~40.79"));

        let confirmation = form.submit(&mut desk, NOW).await.expect("submit");
        assert!(confirmation.trade_id.is_some());
        assert_eq!(form.amount, "");
        assert_eq!(form.preview(), None);

        let calls = gateway.calls();
        assert_eq!(calls.len(), 1);
        let request = match &calls[0] {
            GatewayCall::CreateTrade(request) => request,
            other => panic!("unexpected call {:?}", other),
        };
        assert_eq!(request.from_amount, U256::from(100_000) * U256::exp10(18));
        assert_eq!(request.deadline, NOW + 3600);
        // 0.95 * 100000 / 2451.45 ≈ 38.7525750 ETH
        let lower = parse_token_amount("38.7525").unwrap();
        let upper = parse_token_amount("38.7526").unwrap();
        assert!(request.min_to_amount > lower && request.min_to_amount < upper);
        assert_eq!(
            notifier.notifications(),
            vec![Notification::Success("Trade created successfully!".into())]
        );
    }
}
