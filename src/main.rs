use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;
use crate::cli::{Cli, Command};

mod configuration;
use crate::configuration::Configuration;

mod ethereum_client;
use crate::ethereum_client::EthereumClient;

mod desk;
use crate::desk::TradeDesk;

mod constants;
mod error;
use crate::error::DeskError;

mod form;
mod market;
mod notifier;
mod output;
mod tokens;
mod types;
mod units;
mod view;
mod wallet;

#[cfg(test)]
mod testing;

use crate::notifier::TerminalNotifier;
use crate::tokens::TOKENS;
use crate::wallet::WalletSession;

type Desk = TradeDesk<EthereumClient, TerminalNotifier>;

/// Every command is a single action: build the configuration once, run the
/// action against the desk contract, report its outcome and exit.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        if !already_reported(&err) {
            error!("{:#}", err);
        }
        std::process::exit(1);
    }
}

/// Desk errors reach the terminal through the notifier before they get here.
fn already_reported(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DeskError>().is_some()
}

async fn run(cli: Cli) -> Result<()> {
    let config = Configuration::get_from_environment()?;
    info!("configuration loaded: {:?}", config);

    view::header(config.active_chain()?.name);

    match cli.command {
        Command::Tokens => view::token_table(),
        Command::Recent => view::recent_trades(),
        Command::Wallet { disconnect } => {
            let mut session = WalletSession::from_configuration(&config)?;
            if disconnect {
                session.disconnect();
            }
            view::wallet_panel(session.address());
        }
        Command::Preview(args) => {
            let form = args.form();
            view::trading_form(&form);
            if form.preview().is_none() {
                output::warn("Enter a numeric amount to see a preview");
            }
        }
        Command::Trade(args) => {
            let mut desk = connect_desk(&config)?;
            let mut form = args.form();
            view::trading_form(&form);

            let confirmation = form.submit(&mut desk, now()).await?;
            view::confirmation(&confirmation);
        }
        Command::Execute(arg) => {
            let mut desk = connect_desk(&config)?;
            desk.require_wallet()?;
            let confirmation = desk.execute_trade(arg.trade_id).await?;
            view::confirmation(&confirmation);
        }
        Command::Cancel(arg) => {
            let mut desk = connect_desk(&config)?;
            desk.require_wallet()?;
            let confirmation = desk.cancel_trade(arg.trade_id).await?;
            view::confirmation(&confirmation);
        }
        Command::Balance { symbol } => {
            let desk = connect_desk(&config)?;
            view::wallet_panel(desk.account());

            output::section("Desk Balances");
            match symbol {
                Some(symbol) => {
                    let symbol = symbol.to_ascii_uppercase();
                    view::balance(&symbol, desk.get_balance(&symbol).await);
                }
                None => {
                    for token in TOKENS.iter() {
                        view::balance(token.symbol, desk.get_balance(token.symbol).await);
                    }
                }
            }
        }
        Command::TradeInfo { trade_id, json } => {
            let desk = connect_desk(&config)?;
            match desk.get_trade_info(trade_id).await {
                Some(record) if json => println!("{}", serde_json::to_string_pretty(&record)?),
                Some(record) => view::trade_record(&trade_id.to_string(), &record),
                None => output::warn(&format!("Trade {} is unavailable", trade_id)),
            }
        }
        Command::Watch { from_block } => {
            let client = EthereumClient::new(&config, None)?;
            tokio::select! {
                result = watch_trade_events(&client, &config, from_block) => result?,
                _ = tokio::signal::ctrl_c() => info!("stopped watching"),
            }
        }
    }

    Ok(())
}

fn connect_desk(config: &Configuration) -> Result<Desk> {
    let session = WalletSession::from_configuration(config)?;
    let client = EthereumClient::new(config, session.signer().cloned())?;
    Ok(TradeDesk::new(client, TerminalNotifier, session.address()))
}

#[tracing::instrument(skip(client, config))]
async fn watch_trade_events(
    client: &EthereumClient,
    config: &Configuration,
    from_block: Option<u64>,
) -> Result<()> {
    let mut starting_block_number = match from_block.or(config.starting_block_number) {
        Some(block_number) => block_number,
        None => client.get_latest_block_number().await?,
    };

    output::section(&format!("Trade events from block {}", starting_block_number));

    loop {
        let current_block_number = client.get_latest_block_number().await?;

        if current_block_number >= starting_block_number {
            for event in client
                .get_trade_events(starting_block_number, current_block_number)
                .await?
            {
                info!("trade event - {:?}", event);
                view::trade_event(&event);
            }

            starting_block_number = current_block_number + 1;
        }

        tokio::time::sleep(Duration::from_secs(config.polling_frequency_secs)).await;
    }
}

fn now() -> u64 {
    u64::try_from(chrono::Utc::now().timestamp()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_desk_errors_are_not_reported_twice() {
        let err: anyhow::Error = DeskError::RemoteCall("execution reverted".into()).into();
        assert!(already_reported(&err));
        assert!(already_reported(&DeskError::WalletNotConnected.into()));

        assert!(!already_reported(&anyhow!("Error fetching latest block number.")));
        let config_error = anyhow!("invalid OTC_NETWORK").context("configuration");
        assert!(!already_reported(&config_error));
    }
}
