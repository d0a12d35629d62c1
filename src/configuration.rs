use anyhow::{anyhow, Context, Result};
use ethers::types::{Address, U256};
use ethers::utils::parse_units;
use log::debug;
use std::env;
use url::Url;

use crate::constants::{
    DEFAULT_CONTRACT_ADDRESS, DEFAULT_MAINNET_RPC_URL, DEFAULT_POLLING_FREQUENCY_SECS,
    DEFAULT_SEPOLIA_RPC_URL, MAINNET_CHAIN_ID, SEPOLIA_CHAIN_ID,
};
use crate::types::LegacyGas;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Network {
    Sepolia,
    Mainnet,
}

impl Network {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "sepolia" => Ok(Self::Sepolia),
            "mainnet" => Ok(Self::Mainnet),
            other => Err(anyhow!(
                "unsupported network `{}`, expected `sepolia` or `mainnet`",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    pub network: Network,
    pub name: &'static str,
    pub chain_id: u64,
    pub rpc_url: Url,
}

/// Built once at startup and shared read-only afterwards.
#[derive(Clone, PartialEq)]
pub struct Configuration {
    pub network: Network,
    pub chains: Vec<Chain>,
    pub contract_address: Address,
    pub wallet_private_key: Option<String>,
    pub polling_frequency_secs: u64,
    pub starting_block_number: Option<u64>,
    pub legacy_gas: Option<LegacyGas>,
}

impl Configuration {
    pub fn get_from_environment() -> Result<Self> {
        let network = Network::parse(
            &collect_optional_environment_variable("OTC_NETWORK")?
                .unwrap_or("sepolia".to_string()),
        )?;

        let sepolia_rpc_url = collect_optional_environment_variable("SEPOLIA_RPC_URL")?
            .unwrap_or(DEFAULT_SEPOLIA_RPC_URL.to_string());
        let mainnet_rpc_url = collect_optional_environment_variable("MAINNET_RPC_URL")?
            .unwrap_or(DEFAULT_MAINNET_RPC_URL.to_string());

        let chains = vec![
            Chain {
                network: Network::Sepolia,
                name: "Sepolia",
                chain_id: SEPOLIA_CHAIN_ID,
                rpc_url: Url::parse(&sepolia_rpc_url)
                    .context(format!("`SEPOLIA_RPC_URL` is not a url: {}", sepolia_rpc_url))?,
            },
            Chain {
                network: Network::Mainnet,
                name: "Ethereum",
                chain_id: MAINNET_CHAIN_ID,
                rpc_url: Url::parse(&mainnet_rpc_url)
                    .context(format!("`MAINNET_RPC_URL` is not a url: {}", mainnet_rpc_url))?,
            },
        ];

        let contract_address = collect_optional_environment_variable("OTC_CONTRACT_ADDRESS")?
            .unwrap_or(DEFAULT_CONTRACT_ADDRESS.to_string())
            .parse()
            .context("`OTC_CONTRACT_ADDRESS` is not an address")?;

        let wallet_private_key = collect_optional_environment_variable("WALLET_PRIVATE_KEY")?
            .filter(|key| !key.trim().is_empty());

        let polling_frequency_secs =
            collect_optional_environment_variable("POLLING_FREQUENCY_SECS")?
                .map(|var| var.parse::<u64>())
                .transpose()?
                .unwrap_or(DEFAULT_POLLING_FREQUENCY_SECS);

        let starting_block_number =
            match collect_optional_environment_variable("STARTING_BLOCK_NUMBER")? {
                Some(block_num) => block_num.parse::<u64>().ok(),
                None => None,
            };

        let legacy_gas = match (
            collect_optional_environment_variable("GAS_LIMIT")?,
            collect_optional_environment_variable("GAS_PRICE_GWEI")?,
        ) {
            (Some(gas_limit), Some(gas_price)) => Some(LegacyGas {
                gas_limit: U256::from_dec_str(gas_limit.trim())
                    .map_err(|_| anyhow!("`GAS_LIMIT` is not an integer: {}", gas_limit))?,
                gas_price: parse_units(gas_price.trim(), "gwei")
                    .map_err(|err| anyhow!("`GAS_PRICE_GWEI` is not a gwei amount: {:?}", err))?
                    .into(),
            }),
            (None, None) => None,
            _ => return Err(anyhow!("`GAS_LIMIT` and `GAS_PRICE_GWEI` must be set together")),
        };

        Ok(Self {
            network,
            chains,
            contract_address,
            wallet_private_key,
            polling_frequency_secs,
            starting_block_number,
            legacy_gas,
        })
    }

    pub fn active_chain(&self) -> Result<&Chain> {
        self.chains
            .iter()
            .find(|chain| chain.network == self.network)
            .ok_or(anyhow!("no chain configured for {:?}", self.network))
    }
}

// The private key must never end up in logs.
impl std::fmt::Debug for Configuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Configuration")
            .field("network", &self.network)
            .field("chains", &self.chains)
            .field("contract_address", &self.contract_address)
            .field(
                "wallet_private_key",
                &self.wallet_private_key.as_ref().map(|_| "<redacted>"),
            )
            .field("polling_frequency_secs", &self.polling_frequency_secs)
            .field("starting_block_number", &self.starting_block_number)
            .field("legacy_gas", &self.legacy_gas)
            .finish()
    }
}

fn collect_optional_environment_variable(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            debug!(
                "environment variable {} not set but it wasn't required",
                key
            );
            Ok(None)
        }
    }
}
