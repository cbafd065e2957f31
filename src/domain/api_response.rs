use crate::domain::{AuthToken, SubscriptionId};
use reqwest::StatusCode;
use serde_json::{Value, json};

/// What came back from one API call: the status and the body as JSON.
///
/// The API answers with `{ "success": bool, "data": { ... } }`. A body
/// that does not parse as JSON is kept as `{ "error": "<raw text>" }`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    status: StatusCode,
    body: Value,
}

impl ApiResponse {
    pub async fn from_response(response: reqwest::Response) -> Result<Self, reqwest::Error> {
        let status = response.status();
        let text = response.text().await?;
        Ok(Self::from_parts(status, &text))
    }

    pub fn from_parts(status: StatusCode, text: &str) -> Self {
        let body = serde_json::from_str(text).unwrap_or_else(|_| json!({ "error": text }));
        Self { status, body }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    /// `true` only when the body carries `"success": true`.
    pub fn is_success(&self) -> bool {
        self.body
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.body
            .pointer("/data/token")
            .and_then(Value::as_str)
            .and_then(AuthToken::parse)
    }

    pub fn created_subscription_id(&self) -> Option<SubscriptionId> {
        self.body
            .pointer("/data/subscription/_id")
            .and_then(SubscriptionId::from_json)
    }

    /// The listed subscriptions, found either directly under `data` or
    /// under `data.subscriptions`.
    pub fn subscriptions(&self) -> Option<&Vec<Value>> {
        let data = self.body.get("data")?;
        data.as_array()
            .or_else(|| data.get("subscriptions").and_then(Value::as_array))
    }

    pub fn find_subscription(&self, id: &SubscriptionId) -> Option<&Value> {
        self.subscriptions()?.iter().find(|item| {
            item.get("_id")
                .and_then(SubscriptionId::from_json)
                .is_some_and(|item_id| &item_id == id)
        })
    }

    pub fn pretty(&self) -> String {
        serde_json::to_string_pretty(&self.body).unwrap_or_else(|_| self.body.to_string())
    }
}
