//! Catalog gateway port.
//!
//! This is the primary integration point with the remote catalog service.
//! Every operation that needs authentication takes the token as an
//! explicit parameter; the gateway never reads session state itself.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::domain::{AuthToken, CollectionKind, SubscriptionTier, WineId};
use crate::error::Result;

/// Successful login response. The token is the only field the contract
/// guarantees; everything else rides along in the body and is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Successful registration response. Registration does not return a
/// usable session; the caller follows up with a login.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Response to a subscription tier change. Some deployments rotate the
/// token so the new role is reflected in its claims.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleChangeResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// A catalog wine record as returned by the `/Wine` endpoints.
///
/// The backend's field naming is inconsistent across deployments, hence
/// the aliases. Only `id` is load-bearing for the core; the rest is
/// display material for consumers.
#[derive(Debug, Clone, Deserialize)]
pub struct WineRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default, alias = "bodega", alias = "wineryName")]
    pub winery: Option<String>,
    #[serde(default, alias = "anio_cosecha")]
    pub year: Option<i32>,
    #[serde(default, alias = "precio_promedio")]
    pub price: Option<f64>,
    #[serde(default)]
    pub rating: Option<f64>,
}

/// Accept ids serialized as either strings or numbers.
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Operations against the remote catalog service.
///
/// Implementations normalize success and error shapes: callers only ever
/// see typed responses or a [`RemoteError`](crate::error::RemoteError) /
/// [`AuthError`](crate::error::AuthError).
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// Exchange credentials for a bearer token.
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse>;

    /// Create an account. Does not log the user in.
    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<RegisterResponse>;

    /// Change the user's subscription tier.
    async fn set_membership_role(
        &self,
        tier: SubscriptionTier,
        token: &AuthToken,
    ) -> Result<RoleChangeResponse>;

    /// Fetch the member ids of a collection, normalized to plain ids in
    /// server order.
    async fn fetch_members(
        &self,
        kind: CollectionKind,
        token: &AuthToken,
    ) -> Result<Vec<WineId>>;

    /// Add a wine to a collection. A 2xx with an empty body is success.
    async fn add_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()>;

    /// Remove a wine from a collection.
    async fn remove_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()>;

    /// Fetch the full catalog listing.
    async fn list_wines(&self) -> Result<Vec<WineRecord>>;

    /// Fetch the featured wine of the month.
    async fn wine_of_month(&self) -> Result<WineRecord>;

    /// Fetch a single wine's detail record.
    async fn wine_by_id(&self, id: &WineId) -> Result<WineRecord>;

    /// Submit a rating and review for a wine.
    async fn rate_wine(
        &self,
        id: &WineId,
        score: u8,
        review: &str,
        token: &AuthToken,
    ) -> Result<()>;
}
