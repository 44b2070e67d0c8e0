use std::sync::Arc;

use alloy_primitives::{Address, ChainId};
use parking_lot::Mutex;
use serde::Serialize;
use tokenmint_networks::NetworkKind;
use tracing::{debug, warn};

use crate::{
    error::{ProviderError, WalletError},
    provider::{WalletEvent, WalletProvider},
};

/// Connection lifecycle of the wallet session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionState {
    Disconnected,
    /// Transient: an access request is outstanding, no account yet.
    Connecting,
    Connected,
}

/// Read-only snapshot of the wallet connection.
///
/// Invariant: `account` and `chain_id` are both present exactly when `state`
/// is [`ConnectionState::Connected`], and both absent otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Session {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
    pub state: ConnectionState,
}

impl Session {
    const DISCONNECTED: Self =
        Self { account: None, chain_id: None, state: ConnectionState::Disconnected };

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Mainnet/testnet classification of the connected chain.
    pub fn network_kind(&self) -> NetworkKind {
        tokenmint_networks::network_kind(self.chain_id)
    }

    /// Display name of the connected chain.
    pub fn network_name(&self) -> String {
        tokenmint_networks::network_name(self.chain_id)
    }
}

struct SessionInner {
    session: Session,
    /// Bumped whenever the (connection, chain) binding changes. Chain-bound
    /// objects built downstream must be discarded and rebuilt when the epoch
    /// they were created under no longer matches.
    epoch: u64,
    pump_started: bool,
}

/// Authoritative owner of the wallet connection state.
///
/// Cloneable handle; all clones share one session. The session is the sole
/// writer of the [`Session`] triple: consumers read snapshots, external
/// wallet notifications are folded in through the two `handle_*` entry
/// points, and `connect`/`disconnect` are the only other mutators. No
/// partially updated triple is ever observable.
#[derive(Clone)]
pub struct WalletSession {
    provider: Arc<dyn WalletProvider>,
    inner: Arc<Mutex<SessionInner>>,
    /// Serializes connect attempts so two concurrent calls cannot race two
    /// access requests against the wallet.
    connect_lock: Arc<tokio::sync::Mutex<()>>,
}

impl WalletSession {
    pub fn new(provider: Arc<dyn WalletProvider>) -> Self {
        Self {
            provider,
            inner: Arc::new(Mutex::new(SessionInner {
                session: Session::DISCONNECTED,
                epoch: 0,
                pump_started: false,
            })),
            connect_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Current snapshot of the connection triple.
    pub fn snapshot(&self) -> Session {
        self.inner.lock().session
    }

    /// Identity of the current (connection, chain) binding.
    pub fn epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    /// Request wallet access and resolve the active chain.
    ///
    /// Fails with [`WalletError::Unavailable`] when no wallet interface is
    /// reachable and [`WalletError::Rejected`] when the user or provider
    /// declines; in both cases the session stays `Disconnected`. Concurrent
    /// calls coalesce: the second caller waits for the first handshake and
    /// receives the already-connected snapshot.
    pub async fn connect(&self) -> Result<Session, WalletError> {
        if !self.provider.is_available() {
            return Err(WalletError::Unavailable);
        }

        let _serialized = self.connect_lock.lock().await;

        // A concurrent call may have completed the handshake while we waited.
        let current = self.snapshot();
        if current.is_connected() {
            return Ok(current);
        }

        self.inner.lock().session.state = ConnectionState::Connecting;

        match self.handshake().await {
            Ok((account, chain_id)) => {
                {
                    let mut inner = self.inner.lock();
                    inner.session = Session {
                        account: Some(account),
                        chain_id: Some(chain_id),
                        state: ConnectionState::Connected,
                    };
                    inner.epoch += 1;
                }
                self.start_event_pump();
                debug!(%account, chain_id, "wallet connected");
                Ok(self.snapshot())
            }
            Err(ProviderError::Unavailable) => {
                self.inner.lock().session = Session::DISCONNECTED;
                Err(WalletError::Unavailable)
            }
            Err(err) => {
                self.inner.lock().session = Session::DISCONNECTED;
                warn!(%err, "wallet connection failed");
                Err(WalletError::Rejected { reason: err.to_string() })
            }
        }
    }

    async fn handshake(&self) -> Result<(Address, ChainId), ProviderError> {
        let accounts = self.provider.request_accounts().await?;
        let account = accounts
            .first()
            .copied()
            .ok_or_else(|| ProviderError::Rejected("wallet granted no accounts".to_string()))?;
        let chain_id = self.provider.chain_id().await?;
        Ok((account, chain_id))
    }

    /// Clear the local connection state.
    ///
    /// The wallet extension owns the actual connection, so the event pump
    /// keeps running and a later external reconnect is still observable.
    pub fn disconnect(&self) {
        let mut inner = self.inner.lock();
        inner.session = Session::DISCONNECTED;
        inner.epoch += 1;
        debug!("wallet disconnected");
    }

    /// Fold an external `accountsChanged` notification into the session.
    ///
    /// An empty list means access was revoked and behaves as
    /// [`WalletSession::disconnect`]. An account switch updates the account
    /// in place; it does not imply a network switch, so chain id and
    /// connection state are untouched.
    pub fn handle_accounts_changed(&self, accounts: &[Address]) {
        let Some(&next) = accounts.first() else {
            self.disconnect();
            return;
        };
        let mut inner = self.inner.lock();
        if !inner.session.is_connected() {
            // Nothing is bound to an account yet; the next connect will pick
            // up whatever the wallet reports.
            debug!(%next, "ignoring account switch while disconnected");
            return;
        }
        if inner.session.account != Some(next) {
            debug!(%next, "wallet account switched");
            inner.session.account = Some(next);
        }
    }

    /// Fold an external `chainChanged` notification into the session.
    ///
    /// Bumps the epoch: wallet extensions keep stale chain bindings alive
    /// across a switch, so every chain-bound object downstream must be
    /// discarded and rebuilt. Unparsable payloads are logged and ignored.
    pub fn handle_chain_changed(&self, chain_id_hex: &str) {
        let Some(chain_id) = parse_chain_id_hex(chain_id_hex) else {
            warn!(payload = chain_id_hex, "ignoring unparsable chainChanged notification");
            return;
        };
        let mut inner = self.inner.lock();
        if !inner.session.is_connected() {
            debug!(chain_id, "ignoring chain switch while disconnected");
            return;
        }
        if inner.session.chain_id != Some(chain_id) {
            inner.session.chain_id = Some(chain_id);
            inner.epoch += 1;
            debug!(chain_id, epoch = inner.epoch, "wallet chain switched; rebuild chain-bound state");
        }
    }

    /// Forward provider notifications into the handlers. Started once, on the
    /// first successful connect, and deliberately never stopped.
    fn start_event_pump(&self) {
        {
            let mut inner = self.inner.lock();
            if inner.pump_started {
                return;
            }
            inner.pump_started = true;
        }
        let mut events = self.provider.subscribe();
        let session = self.clone();
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    WalletEvent::AccountsChanged(accounts) => {
                        session.handle_accounts_changed(&accounts)
                    }
                    WalletEvent::ChainChanged(hex) => session.handle_chain_changed(&hex),
                }
            }
        });
    }
}

/// Parse a `chainChanged` payload (`"0xaa36a7"`), with or without the prefix.
fn parse_chain_id_hex(payload: &str) -> Option<ChainId> {
    let digits = payload.strip_prefix("0x").or_else(|| payload.strip_prefix("0X"))?;
    ChainId::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;
    use alloy_primitives::address;
    use std::time::Duration;

    const ALICE: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
    const BOB: Address = address!("0x70997970C51812dc3A010C7d01b50e0d17dc79C8");

    fn session_with(provider: MockProvider) -> WalletSession {
        WalletSession::new(Arc::new(provider))
    }

    #[tokio::test]
    async fn connect_without_wallet_fails_unavailable() {
        let session = session_with(MockProvider::unavailable());

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::Unavailable));
        assert_eq!(session.snapshot(), Session::DISCONNECTED);
    }

    #[tokio::test]
    async fn connect_happy_path() {
        let session = session_with(MockProvider::new().with_accounts(vec![ALICE]).with_chain(1));

        let snapshot = session.connect().await.unwrap();
        assert_eq!(snapshot.account, Some(ALICE));
        assert_eq!(snapshot.chain_id, Some(1));
        assert_eq!(snapshot.state, ConnectionState::Connected);
        assert_eq!(snapshot.network_kind(), NetworkKind::Mainnet);
        assert_eq!(snapshot.network_name(), "Ethereum Mainnet");
    }

    #[tokio::test]
    async fn rejected_connect_reverts_to_disconnected() {
        let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
        provider.reject_next_accounts("User rejected the request");
        let session = session_with(provider);

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::Rejected { .. }));
        assert_eq!(session.snapshot(), Session::DISCONNECTED);
    }

    #[tokio::test]
    async fn empty_account_grant_is_a_rejection() {
        let session = session_with(MockProvider::new().with_chain(1));

        let err = session.connect().await.unwrap_err();
        assert!(matches!(err, WalletError::Rejected { .. }));
        assert_eq!(session.snapshot(), Session::DISCONNECTED);
    }

    #[tokio::test]
    async fn concurrent_connects_coalesce() {
        let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
        let session = session_with(provider.clone());

        let (first, second) = tokio::join!(session.connect(), session.connect());
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first, second);
        assert_eq!(session.snapshot().state, ConnectionState::Connected);
        // Only one access request ever reached the wallet.
        assert_eq!(provider.account_request_count(), 1);
    }

    #[tokio::test]
    async fn revoked_accounts_disconnect_from_any_state() {
        let session = session_with(MockProvider::new().with_accounts(vec![ALICE]).with_chain(1));
        session.connect().await.unwrap();

        session.handle_accounts_changed(&[]);
        assert_eq!(session.snapshot(), Session::DISCONNECTED);

        // Idempotent when already disconnected.
        session.handle_accounts_changed(&[]);
        assert_eq!(session.snapshot(), Session::DISCONNECTED);
    }

    #[tokio::test]
    async fn account_switch_keeps_chain_and_state() {
        let session = session_with(MockProvider::new().with_accounts(vec![ALICE]).with_chain(1));
        session.connect().await.unwrap();
        let epoch = session.epoch();

        session.handle_accounts_changed(&[BOB]);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.account, Some(BOB));
        assert_eq!(snapshot.chain_id, Some(1));
        assert_eq!(snapshot.state, ConnectionState::Connected);
        // An account switch is not a chain switch.
        assert_eq!(session.epoch(), epoch);
    }

    #[tokio::test]
    async fn account_switch_while_disconnected_is_ignored() {
        let session = session_with(MockProvider::new());

        session.handle_accounts_changed(&[BOB]);
        assert_eq!(session.snapshot(), Session::DISCONNECTED);
    }

    #[tokio::test]
    async fn chain_switch_updates_chain_and_bumps_epoch() {
        let session = session_with(MockProvider::new().with_accounts(vec![ALICE]).with_chain(1));
        session.connect().await.unwrap();
        let epoch = session.epoch();

        session.handle_chain_changed("0xaa36a7");
        let snapshot = session.snapshot();
        assert_eq!(snapshot.chain_id, Some(11155111));
        assert_eq!(snapshot.account, Some(ALICE));
        assert_eq!(snapshot.network_kind(), NetworkKind::Testnet);
        assert_eq!(session.epoch(), epoch + 1);
    }

    #[tokio::test]
    async fn unparsable_chain_payload_is_ignored() {
        let session = session_with(MockProvider::new().with_accounts(vec![ALICE]).with_chain(1));
        session.connect().await.unwrap();
        let before = session.snapshot();
        let epoch = session.epoch();

        session.handle_chain_changed("not-a-chain-id");
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.epoch(), epoch);
    }

    #[tokio::test]
    async fn event_pump_folds_provider_notifications() {
        let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
        let session = session_with(provider.clone());
        session.connect().await.unwrap();

        provider.emit(WalletEvent::ChainChanged("0x89".to_string()));
        wait_for(&session, |s| s.chain_id == Some(137)).await;

        provider.emit(WalletEvent::AccountsChanged(vec![]));
        wait_for(&session, |s| s.state == ConnectionState::Disconnected).await;
    }

    #[tokio::test]
    async fn disconnect_keeps_listening_for_external_events() {
        let provider = MockProvider::new().with_accounts(vec![ALICE]).with_chain(1);
        let session = session_with(provider.clone());
        session.connect().await.unwrap();
        session.disconnect();

        // Reconnect and make sure the (single) pump still drives handlers.
        session.connect().await.unwrap();
        provider.emit(WalletEvent::ChainChanged("0x38".to_string()));
        wait_for(&session, |s| s.chain_id == Some(56)).await;
    }

    #[test]
    fn parses_chain_id_payloads() {
        assert_eq!(parse_chain_id_hex("0x1"), Some(1));
        assert_eq!(parse_chain_id_hex("0xaa36a7"), Some(11155111));
        assert_eq!(parse_chain_id_hex("0Xaa36a7"), Some(11155111));
        assert_eq!(parse_chain_id_hex("aa36a7"), None);
        assert_eq!(parse_chain_id_hex("0xzz"), None);
        assert_eq!(parse_chain_id_hex(""), None);
    }

    /// Poll the session until `pred` holds or a generous deadline passes.
    async fn wait_for(session: &WalletSession, pred: impl Fn(&Session) -> bool) {
        for _ in 0..100 {
            if pred(&session.snapshot()) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("session never reached the expected state: {:?}", session.snapshot());
    }
}
