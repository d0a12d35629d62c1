use crate::configuration::Configuration;
use crate::types::{
    BlockNumber, Confirmation, LegacyGas, TradeEvent, TradeId, TradeRecord, TradeRequest,
};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use ethers::abi::{Detokenize, RawLog};
use ethers::contract::builders::ContractCall;
use ethers::prelude::*;
use log::{debug, error, info};
use std::sync::Arc;

abigen!(
    RawOtcDesk,
    "./abis/OtcDesk.json",
    event_derives(serde::Deserialize, serde::Serialize),
);

type SigningClient<P> = SignerMiddleware<Provider<P>, LocalWallet>;

pub type OtcDeskReader<P> = RawOtcDesk<Provider<P>>;
pub type OtcDeskWriter<P> = RawOtcDesk<SigningClient<P>>;

type TradeInfoTuple = (
    Address,
    Address,
    Address,
    u8,
    u8,
    u8,
    bool,
    bool,
    U256,
    U256,
);

/// The contract calls the desk is allowed to make.
///
/// Writes resolve once the transaction is mined; a reverted receipt is an
/// error. Nothing here retries.
#[async_trait]
pub trait ContractGateway: Send + Sync {
    async fn create_trade(&self, request: &TradeRequest) -> Result<Confirmation>;
    async fn execute_trade(&self, trade_id: TradeId) -> Result<Confirmation>;
    async fn cancel_trade(&self, trade_id: TradeId) -> Result<Confirmation>;
    async fn get_balance(&self, user: Address, token: Address) -> Result<u8>;
    async fn get_trade_info(&self, trade_id: TradeId) -> Result<TradeRecord>;
}

pub struct EthereumClient<P = Http> {
    inner_client: Provider<P>,
    contract_address: Address,
    reader: OtcDeskReader<P>,
    writer: Option<OtcDeskWriter<P>>,
    legacy_gas: Option<LegacyGas>,
}

impl EthereumClient {
    pub fn new(config: &Configuration, signer: Option<LocalWallet>) -> Result<Self> {
        let chain = config.active_chain()?;
        let provider = Provider::<Http>::try_from(chain.rpc_url.as_str())
            .context(format!("unable to build provider for {}", chain.name))?;

        debug!(
            "contract client ready for {} at {:?} (signer: {}, legacy gas: {:?})",
            chain.name,
            config.contract_address,
            signer.is_some(),
            config.legacy_gas
        );

        Ok(Self::with_provider(
            provider,
            config.contract_address,
            signer.map(|signer| signer.with_chain_id(chain.chain_id)),
            config.legacy_gas,
        ))
    }
}

impl<P: JsonRpcClient + Clone + 'static> EthereumClient<P> {
    pub fn with_provider(
        provider: Provider<P>,
        contract_address: Address,
        signer: Option<LocalWallet>,
        legacy_gas: Option<LegacyGas>,
    ) -> Self {
        let reader = RawOtcDesk::new(contract_address, Arc::new(provider.clone()));
        let writer = signer.map(|signer| {
            let client = SignerMiddleware::new(provider.clone(), signer);
            RawOtcDesk::new(contract_address, Arc::new(client))
        });

        Self {
            inner_client: provider,
            contract_address,
            reader,
            writer,
            legacy_gas,
        }
    }

    fn writer(&self) -> Result<&OtcDeskWriter<P>> {
        self.writer
            .as_ref()
            .ok_or(anyhow!("no signer configured for write calls"))
    }

    pub async fn get_latest_block_number(&self) -> Result<BlockNumber> {
        Ok(self
            .inner_client
            .get_block_number()
            .await
            .context("Error fetching latest block number.")?
            .as_u64())
    }

    /// `TradeCreated` and `TradeExecuted` logs in `[from_block, to_block]`, in chain order.
    pub async fn get_trade_events(
        &self,
        from_block: BlockNumber,
        to_block: BlockNumber,
    ) -> Result<Vec<TradeEvent>> {
        let created = self
            .reader
            .trade_created_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query_with_meta()
            .await
            .map_err(|err| anyhow!("TradeCreated query failed: {}", err))?;
        let executed = self
            .reader
            .trade_executed_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query_with_meta()
            .await
            .map_err(|err| anyhow!("TradeExecuted query failed: {}", err))?;

        let mut events: Vec<((U64, U256), TradeEvent)> = created
            .iter()
            .map(|(event, meta)| ((meta.block_number, meta.log_index), TradeEvent::from(event)))
            .chain(
                executed
                    .iter()
                    .map(|(event, meta)| ((meta.block_number, meta.log_index), TradeEvent::from(event))),
            )
            .collect();
        events.sort_by_key(|(position, _)| *position);

        Ok(events.into_iter().map(|(_, event)| event).collect())
    }

    fn confirmation(&self, receipt: &TransactionReceipt) -> Confirmation {
        Confirmation {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|number| number.as_u64()),
            gas_used: receipt.gas_used,
            trade_id: trade_id_from_receipt(self.contract_address, receipt),
        }
    }

    fn with_gas<D: Detokenize>(
        &self,
        call: ContractCall<SigningClient<P>, D>,
    ) -> ContractCall<SigningClient<P>, D> {
        match self.legacy_gas {
            Some(gas) => call.legacy().gas(gas.gas_limit).gas_price(gas.gas_price),
            None => call,
        }
    }
}

async fn send_and_confirm<P: JsonRpcClient + 'static, D: Detokenize>(
    call: ContractCall<SigningClient<P>, D>,
    operation: &str,
) -> Result<TransactionReceipt> {
    let pending = call
        .send()
        .await
        .map_err(|err| anyhow!("{} was not submitted: {}", operation, err))?;
    let tx_hash: TxHash = *pending;
    info!("{} submitted in transaction {:?}", operation, tx_hash);

    let receipt = pending
        .await
        .context(format!("{} receipt unavailable for {:?}", operation, tx_hash))?;

    confirmed_receipt(operation, tx_hash, receipt)
}

/// A missing receipt means the node dropped the transaction; status 0 means it reverted.
fn confirmed_receipt(
    operation: &str,
    tx_hash: TxHash,
    receipt: Option<TransactionReceipt>,
) -> Result<TransactionReceipt> {
    let receipt =
        receipt.ok_or(anyhow!("{} transaction {:?} was dropped", operation, tx_hash))?;

    if receipt.status != Some(U64::one()) {
        return Err(anyhow!("{} transaction {:?} reverted", operation, tx_hash));
    }

    info!(
        "{} mined in block {:?}",
        operation,
        receipt.block_number.unwrap_or_default()
    );

    Ok(receipt)
}

#[async_trait]
impl<P: JsonRpcClient + Clone + 'static> ContractGateway for EthereumClient<P> {
    async fn create_trade(&self, request: &TradeRequest) -> Result<Confirmation> {
        let call = self.with_gas(self.writer()?.create_trade(
            request.from_token,
            request.to_token,
            request.from_amount,
            request.min_to_amount,
            request.deadline.into(),
        ));

        match send_and_confirm(call, "createTrade").await {
            Ok(receipt) => Ok(self.confirmation(&receipt)),
            Err(err) => {
                error!("Error creating trade: {:?}", err);
                Err(err)
            }
        }
    }

    async fn execute_trade(&self, trade_id: TradeId) -> Result<Confirmation> {
        let call = self.with_gas(self.writer()?.execute_trade(trade_id));

        match send_and_confirm(call, "executeTrade").await {
            Ok(receipt) => Ok(self.confirmation(&receipt)),
            Err(err) => {
                error!("Error executing trade {}: {:?}", trade_id, err);
                Err(err)
            }
        }
    }

    async fn cancel_trade(&self, trade_id: TradeId) -> Result<Confirmation> {
        let call = self.with_gas(self.writer()?.cancel_trade(trade_id));

        match send_and_confirm(call, "cancelTrade").await {
            Ok(receipt) => Ok(self.confirmation(&receipt)),
            Err(err) => {
                error!("Error canceling trade {}: {:?}", trade_id, err);
                Err(err)
            }
        }
    }

    async fn get_balance(&self, user: Address, token: Address) -> Result<u8> {
        self.reader
            .get_balance(user, token)
            .call()
            .await
            .map_err(|err| {
                error!("Error getting balance: {:?}", err);
                anyhow!("getBalance failed: {}", err)
            })
    }

    async fn get_trade_info(&self, trade_id: TradeId) -> Result<TradeRecord> {
        self.reader
            .get_trade_info(trade_id)
            .call()
            .await
            .map(Into::into)
            .map_err(|err| {
                error!("Error getting trade info: {:?}", err);
                anyhow!("getTradeInfo failed: {}", err)
            })
    }
}

fn trade_id_from_receipt(contract_address: Address, receipt: &TransactionReceipt) -> Option<TradeId> {
    receipt
        .logs
        .iter()
        .filter(|log| log.address == contract_address)
        .find_map(|log| {
            let raw_log = RawLog {
                topics: log.topics.clone(),
                data: log.data.to_vec(),
            };
            <TradeCreatedFilter as EthEvent>::decode_log(&raw_log).ok()
        })
        .map(|event| event.trade_id)
}

impl From<TradeInfoTuple> for TradeRecord {
    fn from(
        (
            trader,
            from_token,
            to_token,
            from_amount,
            to_amount,
            price,
            is_executed,
            is_private,
            timestamp,
            deadline,
        ): TradeInfoTuple,
    ) -> Self {
        Self {
            trader,
            from_token,
            to_token,
            from_amount,
            to_amount,
            price,
            is_executed,
            is_private,
            timestamp,
            deadline,
        }
    }
}

impl From<&TradeCreatedFilter> for TradeEvent {
    fn from(raw_event: &TradeCreatedFilter) -> Self {
        Self::Created {
            trade_id: raw_event.trade_id,
            trader: raw_event.trader,
            from_token: raw_event.from_token,
            to_token: raw_event.to_token,
        }
    }
}

impl From<&TradeExecutedFilter> for TradeEvent {
    fn from(raw_event: &TradeExecutedFilter) -> Self {
        Self::Executed {
            trade_id: raw_event.trade_id,
            trader: raw_event.trader,
            from_amount: raw_event.from_amount,
            to_amount: raw_event.to_amount,
        }
    }
}
