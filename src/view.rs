//! Terminal rendering of the desk: header, trading form, wallet panel and
//! trade history. Views only read state.

use ethers::types::Address;

use crate::constants::MINIMUM_TRADE_SIZE;
use crate::form::{TradeForm, TradePreview};
use crate::market::{RecentTrade, RECENT_TRADES};
use crate::output;
use crate::tokens::{find_token, Token, TOKENS};
use crate::types::{Confirmation, TradeEvent, TradeRecord};
use crate::units::{format_address, format_tx_hash};

pub fn header(network: &str) {
    println!("Private OTC Desk  [{network}]");
    println!("Institutional Trading Desk");
    println!("Execute large token swaps directly against the desk contract");
}

pub fn token_table() {
    output::section("Tokens");
    for token in TOKENS.iter() {
        println!("{}", token_line(token));
    }
}

fn token_line(token: &Token) -> String {
    format!(
        "{:<6} {:<12} {:>12}  {} decimals",
        token.symbol, token.name, token.mock_balance, token.decimals
    )
}

pub fn trading_form(form: &TradeForm) {
    output::section(&format!("Execute Trade ({})", form.mode_label()));
    output::key_value("From", token_label(&form.from_token));
    output::key_value("To", token_label(&form.to_token));
    output::key_value(&format!("Amount ({})", form.from_token), &form.amount);
    output::note(&format!(
        "Minimum trade size: {} {}",
        MINIMUM_TRADE_SIZE, form.from_token
    ));

    if let Some(preview) = form.preview() {
        trade_preview(&preview);
    }
}

pub fn trade_preview(preview: &TradePreview) {
    output::section("Trade Preview");
    output::key_value("Estimated Rate", preview.rate_display());
    output::key_value("You'll Receive", preview.estimated_output_display());
    output::key_value("Privacy Level", preview.privacy_level);
}

pub fn wallet_panel(address: Option<Address>) {
    match address {
        Some(address) => {
            output::section("Wallet Connected");
            output::key_value("Address", format_address(address));
            output::key_value("Full address", format!("{:?}", address));
            output::ok("Connected");
        }
        None => {
            output::section("Connect Wallet");
            output::warn("No wallet connected; set WALLET_PRIVATE_KEY to trade");
        }
    }
}

pub fn recent_trades() {
    output::section("Recent Large Trades");
    for trade in RECENT_TRADES.iter() {
        println!("{}", recent_trade_line(trade));
    }
}

fn recent_trade_line(trade: &RecentTrade) -> String {
    let mut line = format!(
        "{:<9} Amount: ${:<10} ${:>10}  {}",
        trade.pair, trade.amount, trade.price, trade.status
    );
    if let Some(pnl) = trade.pnl {
        line.push(' ');
        line.push_str(pnl);
    }
    line
}

pub fn confirmation(confirmation: &Confirmation) {
    output::key_value("Transaction", format_tx_hash(confirmation.tx_hash));
    if let Some(block_number) = confirmation.block_number {
        output::key_value("Block", block_number);
    }
    if let Some(gas_used) = confirmation.gas_used {
        output::key_value("Gas used", gas_used);
    }
    if let Some(trade_id) = confirmation.trade_id {
        output::key_value("Trade ID", trade_id);
    }
}

pub fn trade_record(trade_id: &str, record: &TradeRecord) {
    output::section(&format!("Trade {trade_id}"));
    output::key_value("Trader", format_address(record.trader));
    output::key_value("From token", token_by_address(record.from_token));
    output::key_value("To token", token_by_address(record.to_token));
    output::key_value("From amount", record.from_amount);
    output::key_value("To amount", record.to_amount);
    output::key_value("Price", record.price);
    output::key_value("Executed", record.is_executed);
    output::key_value("Private", record.is_private);
    output::key_value("Timestamp", timestamp(record.timestamp.low_u64()));
    output::key_value("Deadline", timestamp(record.deadline.low_u64()));
}

pub fn trade_event(event: &TradeEvent) {
    match event {
        TradeEvent::Created {
            trade_id,
            trader,
            from_token,
            to_token,
        } => println!(
            "TradeCreated  #{trade_id} by {} {} -> {}",
            format_address(*trader),
            token_by_address(*from_token),
            token_by_address(*to_token)
        ),
        TradeEvent::Executed {
            trade_id,
            trader,
            from_amount,
            to_amount,
        } => println!(
            "TradeExecuted #{trade_id} by {} {from_amount} -> {to_amount}",
            format_address(*trader)
        ),
    }
}

/// The contract reports balances as a raw `uint8`, shown unscaled.
pub fn balance(symbol: &str, balance: u8) {
    output::key_value(symbol, balance);
}

fn token_label(symbol: &str) -> String {
    match find_token(symbol) {
        Some(token) => format!("{} ({}, balance {})", token.symbol, token.name, token.mock_balance),
        None => symbol.to_string(),
    }
}

fn token_by_address(address: Address) -> String {
    TOKENS
        .iter()
        .find(|token| token.address().ok() == Some(address))
        .map(|token| token.symbol.to_string())
        .unwrap_or_else(|| format_address(address))
}

fn timestamp(seconds: u64) -> String {
    i64::try_from(seconds)
        .ok()
        .and_then(|seconds| chrono::DateTime::from_timestamp(seconds, 0))
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| seconds.to_string())
}
