use crate::domain::{ApiResponse, SubscriptionId, SubscriptionRequest, SubscriptionUpdate};
use serde_json::Value;

pub const CREATED_SUBSCRIPTION_IS_LISTED: &str = "created subscription is listed";
pub const UPDATE_ACCEPTED: &str = "update accepted";
pub const UPDATED_SUBSCRIPTION_IS_LISTED: &str = "updated subscription is listed";
pub const DELETE_ACCEPTED: &str = "delete accepted";
pub const DELETED_SUBSCRIPTION_IS_GONE: &str = "deleted subscription is gone";
pub const UNAUTHENTICATED_REQUEST_IS_REJECTED: &str = "unauthenticated request is rejected";

// Prices travel as JSON numbers, 9.99 has no exact binary representation
const PRICE_TOLERANCE: f64 = 1e-6;

/// The verdict of one observation made during a run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckOutcome {
    pub fn pass(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: true,
            detail: detail.into(),
        }
    }

    pub fn fail(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed: false,
            detail: detail.into(),
        }
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let verdict = if self.passed { "PASS" } else { "FAIL" };
        write!(f, "[{}] {}: {}", verdict, self.name, self.detail)
    }
}

pub fn created_subscription_is_listed(
    list: &ApiResponse,
    id: &SubscriptionId,
    expected: &SubscriptionRequest,
) -> CheckOutcome {
    let item = match listed_item(CREATED_SUBSCRIPTION_IS_LISTED, list, id) {
        Ok(item) => item,
        Err(outcome) => return outcome,
    };

    let mut mismatches = Vec::new();
    compare_str(item, "name", &expected.name, &mut mismatches);
    compare_price(item, expected.price, &mut mismatches);
    compare_str(item, "currency", &expected.currency, &mut mismatches);
    compare_str(item, "frequency", expected.frequency.as_str(), &mut mismatches);
    compare_str(item, "category", &expected.category, &mut mismatches);
    compare_str(item, "paymentMethod", &expected.payment_method, &mut mismatches);

    verdict(CREATED_SUBSCRIPTION_IS_LISTED, id, mismatches)
}

pub fn updated_subscription_is_listed(
    list: &ApiResponse,
    id: &SubscriptionId,
    update: &SubscriptionUpdate,
) -> CheckOutcome {
    let item = match listed_item(UPDATED_SUBSCRIPTION_IS_LISTED, list, id) {
        Ok(item) => item,
        Err(outcome) => return outcome,
    };

    let mut mismatches = Vec::new();
    if let Some(price) = update.price {
        compare_price(item, price, &mut mismatches);
    }
    if let Some(category) = &update.category {
        compare_str(item, "category", category, &mut mismatches);
    }

    verdict(UPDATED_SUBSCRIPTION_IS_LISTED, id, mismatches)
}

pub fn deleted_subscription_is_gone(list: &ApiResponse, id: &SubscriptionId) -> CheckOutcome {
    if !list.is_success() || list.subscriptions().is_none() {
        return CheckOutcome::fail(
            DELETED_SUBSCRIPTION_IS_GONE,
            format!("listing did not succeed (status {})", list.status()),
        );
    }
    match list.find_subscription(id) {
        Some(_) => CheckOutcome::fail(
            DELETED_SUBSCRIPTION_IS_GONE,
            format!("subscription {} is still listed", id),
        ),
        None => CheckOutcome::pass(
            DELETED_SUBSCRIPTION_IS_GONE,
            format!("subscription {} is no longer listed", id),
        ),
    }
}

pub fn unauthenticated_request_is_rejected(response: &ApiResponse) -> CheckOutcome {
    let rejected = !response.status().is_success() || !response.is_success();
    let leaked_data = response
        .subscriptions()
        .is_some_and(|items| !items.is_empty());
    match (rejected, leaked_data) {
        (true, false) => CheckOutcome::pass(
            UNAUTHENTICATED_REQUEST_IS_REJECTED,
            format!("rejected with status {}", response.status()),
        ),
        (_, true) => CheckOutcome::fail(
            UNAUTHENTICATED_REQUEST_IS_REJECTED,
            format!(
                "subscription data was returned without a token (status {})",
                response.status()
            ),
        ),
        (false, false) => CheckOutcome::fail(
            UNAUTHENTICATED_REQUEST_IS_REJECTED,
            format!("request was accepted (status {})", response.status()),
        ),
    }
}

/// Whether a best-effort mutation reported `success: true`.
pub fn request_accepted(name: &'static str, response: &ApiResponse) -> CheckOutcome {
    if response.is_success() {
        CheckOutcome::pass(name, format!("status {}", response.status()))
    } else {
        CheckOutcome::fail(
            name,
            format!("API did not report success (status {})", response.status()),
        )
    }
}

pub fn request_not_completed(name: &'static str, error: &reqwest::Error) -> CheckOutcome {
    CheckOutcome::fail(name, format!("request could not be completed: {}", error))
}

fn listed_item<'a>(
    name: &'static str,
    list: &'a ApiResponse,
    id: &SubscriptionId,
) -> Result<&'a Value, CheckOutcome> {
    if !list.is_success() {
        return Err(CheckOutcome::fail(
            name,
            format!("listing did not succeed (status {})", list.status()),
        ));
    }
    list.find_subscription(id)
        .ok_or_else(|| CheckOutcome::fail(name, format!("subscription {} is not listed", id)))
}

fn compare_str(item: &Value, field: &str, expected: &str, mismatches: &mut Vec<String>) {
    match item.get(field).and_then(Value::as_str) {
        Some(actual) if actual == expected => {}
        Some(actual) => mismatches.push(format!("{} is {:?}, expected {:?}", field, actual, expected)),
        None => mismatches.push(format!("{} is missing", field)),
    }
}

fn compare_price(item: &Value, expected: f64, mismatches: &mut Vec<String>) {
    match item.get("price").and_then(Value::as_f64) {
        Some(actual) if (actual - expected).abs() < PRICE_TOLERANCE => {}
        Some(actual) => mismatches.push(format!("price is {}, expected {}", actual, expected)),
        None => mismatches.push("price is missing".to_string()),
    }
}

fn verdict(name: &'static str, id: &SubscriptionId, mismatches: Vec<String>) -> CheckOutcome {
    if mismatches.is_empty() {
        CheckOutcome::pass(name, format!("subscription {} matches", id))
    } else {
        CheckOutcome::fail(
            name,
            format!("subscription {}: {}", id, mismatches.join(", ")),
        )
    }
}
