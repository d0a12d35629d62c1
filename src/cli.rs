//! Command-line interface definitions.

use clap::{Args, Parser, Subcommand};
use ethers::types::U256;

use crate::form::TradeForm;
use crate::types::TradeId;

/// otc-desk - submit and track OTC swap orders against the desk contract.
#[derive(Parser, Debug)]
#[command(name = "otc-desk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported tokens and their balances
    Tokens,

    /// Show the quote for a trade without submitting it
    Preview(TradeArgs),

    /// Submit a trade to the desk contract and wait until it is mined
    Trade(TradeArgs),

    /// Execute an open trade
    Execute(TradeIdArg),

    /// Cancel an open trade
    Cancel(TradeIdArg),

    /// Read the wallet's desk balance for a token (all tokens if omitted)
    Balance {
        /// Token symbol, e.g. USDT
        symbol: Option<String>,
    },

    /// Read a trade from the contract
    TradeInfo {
        #[arg(value_parser = parse_trade_id)]
        trade_id: TradeId,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show recent large trades
    Recent,

    /// Show the connected wallet
    Wallet {
        /// Drop the configured key for this session and show the disconnected panel
        #[arg(long)]
        disconnect: bool,
    },

    /// Follow TradeCreated and TradeExecuted events
    Watch {
        /// First block to scan (defaults to STARTING_BLOCK_NUMBER, then the latest block)
        #[arg(long)]
        from_block: Option<u64>,
    },
}

#[derive(Args, Debug)]
pub struct TradeArgs {
    /// Token to sell
    #[arg(long, default_value = "USDT")]
    pub from: String,

    /// Token to buy
    #[arg(long, default_value = "ETH")]
    pub to: String,

    /// Amount of the sold token, e.g. 100,000
    #[arg(long)]
    pub amount: String,

    /// Display the trade in standard instead of private mode
    #[arg(long)]
    pub standard: bool,
}

impl TradeArgs {
    pub fn form(&self) -> TradeForm {
        let mut form = TradeForm {
            from_token: self.from.to_ascii_uppercase(),
            to_token: self.to.to_ascii_uppercase(),
            amount: self.amount.clone(),
            ..Default::default()
        };
        if self.standard {
            form.toggle_privacy();
        }
        form
    }
}

#[derive(Args, Debug)]
pub struct TradeIdArg {
    #[arg(value_parser = parse_trade_id)]
    pub trade_id: TradeId,
}

fn parse_trade_id(value: &str) -> Result<TradeId, String> {
    U256::from_dec_str(value.trim()).map_err(|_| format!("`{}` is not a trade id", value))
}
