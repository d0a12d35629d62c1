use anyhow::{anyhow, Result};
use ethers::prelude::*;
use log::info;

use crate::configuration::Configuration;

/// The signer the desk trades with. The desk only ever reads its address;
/// signing happens inside the gateway's middleware.
#[derive(Debug, Clone, Default)]
pub struct WalletSession {
    signer: Option<LocalWallet>,
}

impl WalletSession {
    pub fn from_configuration(config: &Configuration) -> Result<Self> {
        let mut session = Self::default();
        if let Some(private_key) = &config.wallet_private_key {
            session.connect(private_key, config.active_chain()?.chain_id)?;
        }
        Ok(session)
    }

    pub fn connect(&mut self, private_key: &str, chain_id: u64) -> Result<()> {
        let key = private_key.trim();
        let key = key.strip_prefix("0x").unwrap_or(key);
        // never echo the key back in the error
        let signer = key
            .parse::<LocalWallet>()
            .map_err(|_| anyhow!("`WALLET_PRIVATE_KEY` is not a valid private key"))?
            .with_chain_id(chain_id);

        info!("wallet connected: {:?}", signer.address());
        self.signer = Some(signer);
        Ok(())
    }

    pub fn disconnect(&mut self) {
        if let Some(signer) = self.signer.take() {
            info!("wallet disconnected: {:?}", signer.address());
        }
    }

    pub fn address(&self) -> Option<Address> {
        self.signer.as_ref().map(|signer| signer.address())
    }

    pub fn is_connected(&self) -> bool {
        self.signer.is_some()
    }

    pub fn signer(&self) -> Option<&LocalWallet> {
        self.signer.as_ref()
    }
}
