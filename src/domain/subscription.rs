use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(&self) -> &str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Yearly => "yearly",
        }
    }
}

/// Payload for `POST /subscriptions`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRequest {
    pub name: String,
    pub price: f64,
    pub currency: String,
    pub frequency: Frequency,
    pub category: String,
    pub payment_method: String,
    pub start_date: NaiveDate,
}

impl SubscriptionRequest {
    /// The fixed Spotify subscription every run creates.
    pub fn sample(start_date: NaiveDate) -> Self {
        Self {
            name: "Spotify".into(),
            price: 9.99,
            currency: "USD".into(),
            frequency: Frequency::Monthly,
            category: "music".into(),
            payment_method: "credit card".into(),
            start_date,
        }
    }
}

/// Partial payload for `PATCH /subscriptions/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SubscriptionUpdate {
    pub fn sample() -> Self {
        Self {
            price: Some(12.99),
            category: Some("premium music".into()),
        }
    }
}

/// Identifier the API assigns to a created subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionId(String);

impl SubscriptionId {
    /// Accepts string or numeric ids, both kept in their textual form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(Self(s.clone())),
            serde_json::Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl AsRef<str> for SubscriptionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
