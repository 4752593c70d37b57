//! Reqwest-backed catalog gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::{AuthToken, CollectionKind, SubscriptionTier, WineId};
use crate::error::{RemoteError, Result};
use crate::port::outbound::gateway::{
    CatalogGateway, LoginResponse, RegisterResponse, RoleChangeResponse, WineRecord,
};

use super::normalize;

/// HTTP client for the wine catalog service.
///
/// Stateless: the bearer token is always supplied by the caller. All
/// non-2xx responses and transport failures are normalized to
/// [`RemoteError`] before leaving this module.
pub struct HttpCatalogGateway {
    client: Client,
    base_url: String,
}

impl HttpCatalogGateway {
    /// Create a gateway against `base_url` with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn bearer(request: RequestBuilder, token: &AuthToken) -> RequestBuilder {
        request.bearer_auth(token.expose())
    }

    /// Resolve a response to `Ok` on 2xx, or a [`RemoteError`] carrying
    /// the server's message on anything else.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::new(status.as_u16(), extract_message(status, &body)).into())
    }

    /// Read a 2xx response as JSON, treating an empty or undecodable body
    /// as an implicit success marker.
    async fn lenient_json(response: Response) -> Value {
        let text = response.text().await.unwrap_or_default();
        serde_json::from_str(&text).unwrap_or_else(|_| {
            if !text.trim().is_empty() {
                warn!(body = %text, "response body is not valid JSON, treating as empty");
            }
            Value::Null
        })
    }
}

/// Pull a human-readable message out of an error body: a JSON `message`
/// or `title` field when present, else the raw text.
fn extract_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["message", "title"] {
            if let Some(message) = value.get(key).and_then(Value::as_str) {
                return message.to_string();
            }
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body.to_string()
    }
}

#[async_trait]
impl CatalogGateway for HttpCatalogGateway {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.url("User/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> Result<RegisterResponse> {
        let response = self
            .client
            .post(self.url("User/Register"))
            .json(&serde_json::json!({
                "email": email,
                "password": password,
                "fullName": full_name,
            }))
            .send()
            .await?;

        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn set_membership_role(
        &self,
        tier: SubscriptionTier,
        token: &AuthToken,
    ) -> Result<RoleChangeResponse> {
        let path = match tier {
            SubscriptionTier::Sommelier => "User/upgrade-to-sommelier",
            SubscriptionTier::User => "User/downgrade-to-user",
        };

        let response = Self::bearer(self.client.put(self.url(path)), token)
            .send()
            .await?;
        let response = Self::check(response).await?;

        // 2xx with an empty body still means the tier changed.
        let body = Self::lenient_json(response).await;
        Ok(serde_json::from_value(body).unwrap_or_default())
    }

    async fn fetch_members(
        &self,
        kind: CollectionKind,
        token: &AuthToken,
    ) -> Result<Vec<WineId>> {
        let url = self.url(&format!("WineUser/{}", kind.list_segment()));
        debug!(%kind, url = %url, "fetching collection members");

        let response = Self::bearer(self.client.get(url), token).send().await?;
        let response = Self::check(response).await?;

        let body = Self::lenient_json(response).await;
        let ids = normalize::member_ids(&body);
        debug!(%kind, count = ids.len(), "fetched collection members");
        Ok(ids)
    }

    async fn add_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()> {
        let url = self.url(&format!("WineUser/{id}/{}", kind.endpoint_segment()));
        let response = Self::bearer(self.client.post(url), token).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn remove_member(
        &self,
        kind: CollectionKind,
        id: &WineId,
        token: &AuthToken,
    ) -> Result<()> {
        let url = self.url(&format!("WineUser/{id}/{}", kind.endpoint_segment()));
        let response = Self::bearer(self.client.delete(url), token).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn list_wines(&self) -> Result<Vec<WineRecord>> {
        let response = self.client.get(self.url("Wine/all-wines")).send().await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn wine_of_month(&self) -> Result<WineRecord> {
        let response = self
            .client
            .get(self.url("Wine/wine-of-month"))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn wine_by_id(&self, id: &WineId) -> Result<WineRecord> {
        let response = self
            .client
            .get(self.url(&format!("Wine/{id}")))
            .send()
            .await?;
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }

    async fn rate_wine(
        &self,
        id: &WineId,
        score: u8,
        review: &str,
        token: &AuthToken,
    ) -> Result<()> {
        let response = Self::bearer(
            self.client.post(self.url(&format!("Wine/{id}/rate"))),
            token,
        )
        .json(&serde_json::json!({ "score": score, "review": review }))
        .send()
        .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_field_wins_over_raw_body() {
        let message = extract_message(
            StatusCode::BAD_REQUEST,
            r#"{"message": "bad credentials", "detail": "x"}"#,
        );
        assert_eq!(message, "bad credentials");
    }

    #[test]
    fn title_field_is_second_choice() {
        // ASP.NET ProblemDetails bodies carry `title`, not `message`.
        let message = extract_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"title": "An error occurred", "status": 500}"#,
        );
        assert_eq!(message, "An error occurred");
    }

    #[test]
    fn raw_text_when_not_json() {
        let message = extract_message(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(message, "upstream down");
    }

    #[test]
    fn empty_body_falls_back_to_status() {
        let message = extract_message(StatusCode::NOT_FOUND, "");
        assert!(message.contains("404"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let gateway =
            HttpCatalogGateway::new("https://api.example.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.url("User/login"), "https://api.example.com/User/login");
    }
}
