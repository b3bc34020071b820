use reqwest::Response;
use types::{PublicKeyResponse, PushSubscriptionJson, PushUnsubscribeRequest};

use crate::{platform::PushServerApi, ClientError};

/// [`PushServerApi`] over HTTP against the site server.
pub struct HttpPushServerApi {
    client: reqwest::Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl HttpPushServerApi {
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: None,
        }
    }

    /// Subscriptions saved with a token are attributed to that admin.
    pub fn with_bearer_token(mut self, token: &str) -> Self {
        self.bearer_token = Some(token.to_string());
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        match &self.bearer_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

async fn ensure_success(res: Response) -> Result<Response, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    Err(ClientError::Network(format!("server answered {}: {}", status, body)))
}

impl PushServerApi for HttpPushServerApi {
    async fn public_key(&self) -> Result<String, ClientError> {
        let res = self
            .request(reqwest::Method::GET, "/push/public-key")
            .send()
            .await?;
        let body: PublicKeyResponse = ensure_success(res).await?.json().await?;
        Ok(body.public_key)
    }

    async fn save_subscription(&self, subscription: &PushSubscriptionJson) -> Result<(), ClientError> {
        let res = self
            .request(reqwest::Method::POST, "/push/subscribe")
            .json(subscription)
            .send()
            .await?;
        ensure_success(res).await?;
        Ok(())
    }

    async fn delete_subscription(&self, endpoint: &str) -> Result<(), ClientError> {
        let res = self
            .request(reqwest::Method::DELETE, "/push/subscribe")
            .json(&PushUnsubscribeRequest {
                endpoint: endpoint.to_string(),
            })
            .send()
            .await?;
        ensure_success(res).await?;
        Ok(())
    }
}
