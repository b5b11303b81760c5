//! JSON transaction scripts replayed against in-memory collaborators.
//!
//! A script seeds balances, then submits actions in order. A payload string
//! of the form `$tx:N` is replaced by the hash of the script's N-th
//! transaction, so later steps can confirm or cancel earlier handshakes.

use std::path::Path;

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use bill_engine::{
    action_from_json, decode_log, DecodedLog, EngineConfig, FinanceEngine, Receipt, TxContext,
};
use bill_nullables::{NullAssetLedger, NullClock, NullStore};
use bill_types::{Address, AssetClass, Timestamp, TxHash};

const TX_REF_PREFIX: &str = "$tx:";

#[derive(Clone, Debug, Deserialize)]
pub struct Script {
    /// Block time of the first transaction, in unix seconds.
    #[serde(default)]
    pub start_time: u64,
    #[serde(default)]
    pub balances: Vec<Genesis>,
    pub txs: Vec<ScriptTx>,
}

/// An opening balance.
#[derive(Clone, Debug, Deserialize)]
pub struct Genesis {
    pub class: AssetClass,
    pub symbol: String,
    pub address: Address,
    pub amount: u128,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScriptTx {
    /// Seconds to move the clock forward before this transaction.
    #[serde(default)]
    pub advance: u64,
    pub action: String,
    pub payload: Value,
}

#[derive(Clone, Debug, Serialize)]
pub struct TxOutcome {
    pub index: usize,
    pub action: String,
    pub tx_hash: TxHash,
    pub time: Timestamp,
    #[serde(flatten)]
    pub result: Outcome,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok { receipt: Receipt, logs: Vec<DecodedLog> },
    Err { error: String },
}

impl Script {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        serde_json::from_str(&content).with_context(|| format!("parsing script {}", path.display()))
    }
}

/// Replace every `$tx:N` string inside `value` with the hash of transaction N.
fn resolve_refs(value: Value, hashes: &[TxHash]) -> anyhow::Result<Value> {
    Ok(match value {
        Value::String(s) => match s.strip_prefix(TX_REF_PREFIX) {
            Some(n) => {
                let index: usize = n
                    .parse()
                    .with_context(|| format!("bad transaction reference {s:?}"))?;
                let hash = hashes.get(index).ok_or_else(|| {
                    anyhow!("reference {s:?} points past the replayed transactions")
                })?;
                serde_json::to_value(hash)?
            }
            None => Value::String(s),
        },
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| resolve_refs(v, hashes))
                .collect::<anyhow::Result<_>>()?,
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| Ok((k, resolve_refs(v, hashes)?)))
                .collect::<anyhow::Result<_>>()?,
        ),
        other => other,
    })
}

/// Run every transaction of `script` in order. Failed actions are reported,
/// not fatal; a malformed script is.
pub fn replay(script: Script, config: EngineConfig) -> anyhow::Result<Vec<TxOutcome>> {
    let engine = FinanceEngine::new(NullStore::new(), NullAssetLedger::new(), config);
    for g in &script.balances {
        engine
            .ledger()
            .mint(g.class, &g.symbol, &g.address, g.amount)
            .with_context(|| format!("seeding {} {} for {}", g.amount, g.symbol, g.address))?;
    }

    let clock = NullClock::new(script.start_time);
    let mut hashes = Vec::with_capacity(script.txs.len());
    let mut outcomes = Vec::with_capacity(script.txs.len());

    for (index, tx) in script.txs.into_iter().enumerate() {
        clock.advance(tx.advance);
        let payload =
            resolve_refs(tx.payload, &hashes).with_context(|| format!("transaction {index}"))?;
        let action = action_from_json(&tx.action, payload)
            .with_context(|| format!("transaction {index}"))?;
        let ctx = TxContext::for_action(&action, index as u64, clock.now())?
            .with_height(index as u64 + 1);
        hashes.push(ctx.tx_hash);

        let result = match engine.execute(&ctx, action) {
            Ok(receipt) => {
                let logs = receipt.logs.iter().map(decode_log).collect::<Result<Vec<_>, _>>()?;
                info!(index, action = %tx.action, tx = %ctx.tx_hash, "applied");
                Outcome::Ok { receipt, logs }
            }
            Err(e) => {
                warn!(index, action = %tx.action, error = %e, "rejected");
                Outcome::Err { error: e.to_string() }
            }
        };
        outcomes.push(TxOutcome {
            index,
            action: tx.action,
            tx_hash: ctx.tx_hash,
            time: ctx.block_time,
            result,
        });
    }
    Ok(outcomes)
}
