//! Scripted catalog gateway for tests.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::domain::{AuthToken, CollectionKind, SubscriptionTier, WineId};
use crate::error::Result;
use crate::port::outbound::gateway::{
    CatalogGateway, LoginResponse, RegisterResponse, RoleChangeResponse, WineRecord,
};

/// A recorded gateway invocation, including the token it was made with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Login {
        email: String,
    },
    Register {
        email: String,
    },
    SetRole {
        tier: SubscriptionTier,
        token: String,
    },
    FetchMembers {
        kind: CollectionKind,
        token: String,
    },
    AddMember {
        kind: CollectionKind,
        id: WineId,
        token: String,
    },
    RemoveMember {
        kind: CollectionKind,
        id: WineId,
        token: String,
    },
    RateWine {
        id: WineId,
        score: u8,
    },
}

/// Gateway double with scripted responses and full call recording.
///
/// Unscripted calls succeed with benign defaults (empty collections, a
/// `"mock-token"` login), so tests only script what they assert on.
/// `gate_next_fetch` lets a test hold a fetch open to exercise
/// completion-order races deterministically.
#[derive(Default)]
pub struct MockGateway {
    calls: Mutex<Vec<GatewayCall>>,
    login_results: Mutex<VecDeque<Result<LoginResponse>>>,
    register_results: Mutex<VecDeque<Result<RegisterResponse>>>,
    role_results: Mutex<VecDeque<Result<RoleChangeResponse>>>,
    fetch_results: Mutex<VecDeque<Result<Vec<WineId>>>>,
    add_results: Mutex<VecDeque<Result<()>>>,
    remove_results: Mutex<VecDeque<Result<()>>>,
    fetch_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    add_gates: Mutex<VecDeque<oneshot::Receiver<()>>>,
    wines: Mutex<Vec<WineRecord>>,
}

impl MockGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_login(&self, result: Result<LoginResponse>) {
        self.login_results.lock().push_back(result);
    }

    /// Script a login that succeeds with the given raw token.
    pub fn script_login_token(&self, token: &str) {
        self.script_login(Ok(LoginResponse {
            token: Some(token.to_string()),
        }));
    }

    pub fn script_register(&self, result: Result<RegisterResponse>) {
        self.register_results.lock().push_back(result);
    }

    pub fn script_role_change(&self, result: Result<RoleChangeResponse>) {
        self.role_results.lock().push_back(result);
    }

    pub fn script_fetch(&self, result: Result<Vec<WineId>>) {
        self.fetch_results.lock().push_back(result);
    }

    pub fn script_add(&self, result: Result<()>) {
        self.add_results.lock().push_back(result);
    }

    pub fn script_remove(&self, result: Result<()>) {
        self.remove_results.lock().push_back(result);
    }

    /// Hold the next fetch open until the returned sender fires (or is
    /// dropped). Gates apply to fetches in issue order.
    pub fn gate_next_fetch(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.fetch_gates.lock().push_back(rx);
        tx
    }

    /// Hold the next add open, to observe the optimistic state while the
    /// mutation is pending.
    pub fn gate_next_add(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.add_gates.lock().push_back(rx);
        tx
    }

    pub fn set_wines(&self, wines: Vec<WineRecord>) {
        *self.wines.lock() = wines;
    }

    #[must_use]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl CatalogGateway for MockGateway {
    async fn login(&self, email: &str, _password: &str) -> Result<LoginResponse> {
        self.record(GatewayCall::Login {
            email: email.to_string(),
        });
        self.login_results.lock().pop_front().unwrap_or(Ok(LoginResponse {
            token: Some("mock-token".to_string()),
        }))
    }

    async fn register(
        &self,
        email: &str,
        _password: &str,
        full_name: &str,
    ) -> Result<RegisterResponse> {
        self.record(GatewayCall::Register {
            email: email.to_string(),
        });
        self.register_results
            .lock()
            .pop_front()
            .unwrap_or(Ok(RegisterResponse {
                id: Some("mock-id".to_string()),
                email: email.to_string(),
                full_name: Some(full_name.to_string()),
                role: Some("User".to_string()),
                is_active: Some(true),
            }))
    }

    async fn set_membership_role(
        &self,
        tier: SubscriptionTier,
        token: &AuthToken,
    ) -> Result<RoleChangeResponse> {
        self.record(GatewayCall::SetRole {
            tier,
            token: token.expose().to_string(),
        });
        self.role_results
            .lock()
            .pop_front()
            .unwrap_or(Ok(RoleChangeResponse::default()))
    }

    async fn fetch_members(
        &self,
        kind: CollectionKind,
        token: &AuthToken,
    ) -> Result<Vec<WineId>> {
        self.record(GatewayCall::FetchMembers {
            kind,
            token: token.expose().to_string(),
        });

        let gate = self.fetch_gates.lock().pop_front();
        let result = self
            .fetch_results
            .lock()
            .pop_front()
            .unwrap_or(Ok(Vec::new()));

        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn add_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()> {
        self.record(GatewayCall::AddMember {
            kind,
            id: id.clone(),
            token: token.expose().to_string(),
        });

        let gate = self.add_gates.lock().pop_front();
        let result = self.add_results.lock().pop_front().unwrap_or(Ok(()));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }

    async fn remove_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()> {
        self.record(GatewayCall::RemoveMember {
            kind,
            id: id.clone(),
            token: token.expose().to_string(),
        });
        self.remove_results.lock().pop_front().unwrap_or(Ok(()))
    }

    async fn list_wines(&self) -> Result<Vec<WineRecord>> {
        Ok(self.wines.lock().clone())
    }

    async fn wine_of_month(&self) -> Result<WineRecord> {
        self.wines
            .lock()
            .first()
            .cloned()
            .ok_or_else(|| crate::error::RemoteError::new(404, "no wines scripted").into())
    }

    async fn wine_by_id(&self, id: &WineId) -> Result<WineRecord> {
        self.wines
            .lock()
            .iter()
            .find(|wine| wine.id.as_deref() == Some(id.as_str()))
            .cloned()
            .ok_or_else(|| crate::error::RemoteError::new(404, "wine not found").into())
    }

    async fn rate_wine(
        &self,
        id: &WineId,
        score: u8,
        _review: &str,
        _token: &AuthToken,
    ) -> Result<()> {
        self.record(GatewayCall::RateWine {
            id: id.clone(),
            score,
        });
        Ok(())
    }
}
