//! # Deployed token records
//!
//! Append-only history of successfully deployed tokens, persisted through a
//! minimal byte-string key/value boundary ([`RecordStorage`]). Records are
//! kept most-recent-first under the fixed `"deployedTokens"` key, serialized
//! as one JSON array — the payload shape browsers kept in local storage.
//!
//! Records are immutable: exactly one is created per succeeded deployment
//! attempt, none are ever updated, and deletion is not an operation of this
//! design.

mod storage;

pub use storage::{JsonFileStorage, MemoryStorage, RecordStorage, StorageError};

use std::time::{SystemTime, UNIX_EPOCH};

use alloy_primitives::{Address, ChainId, TxHash};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// Storage key the record list is persisted under.
pub const STORE_KEY: &str = "deployedTokens";

/// One deployed token. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub id: Uuid,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: String,
    pub contract_address: Address,
    pub owner_address: Address,
    pub chain_id: ChainId,
    pub network_name: String,
    pub tx_hash: TxHash,
    /// Unix timestamp in milliseconds.
    pub created_at: u64,
}

impl DeploymentRecord {
    /// Build a record for a confirmed deployment, stamped with a fresh id and
    /// the current time.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
        total_supply: impl Into<String>,
        contract_address: Address,
        owner_address: Address,
        chain_id: ChainId,
        network_name: impl Into<String>,
        tx_hash: TxHash,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            symbol: symbol.into(),
            decimals,
            total_supply: total_supply.into(),
            contract_address,
            owner_address,
            chain_id,
            network_name: network_name.into(),
            tx_hash,
            created_at: unix_millis(),
        }
    }
}

fn unix_millis() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or_default()
}

/// Most-recent-first record history over a [`RecordStorage`] backend.
#[derive(Clone, Debug)]
pub struct DeploymentRecordStore<S> {
    storage: S,
}

impl<S: RecordStorage> DeploymentRecordStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Prepend a record and persist the whole list.
    ///
    /// Fails only when the underlying storage is unavailable.
    pub fn append(&self, record: DeploymentRecord) -> Result<(), StorageError> {
        let mut records = self.list();
        records.insert(0, record);
        let payload = serde_json::to_vec(&records)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        self.storage.write(STORE_KEY, &payload)
    }

    /// All persisted records, most-recent-first.
    ///
    /// A missing, unreadable or corrupt payload yields an empty list — the
    /// history view must never crash over bad storage.
    pub fn list(&self) -> Vec<DeploymentRecord> {
        let payload = match self.storage.read(STORE_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(%err, "deployment record storage unreadable");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&payload) {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "corrupt deployment record payload, treating as empty");
                Vec::new()
            }
        }
    }
}
