use serde_json::{Value, json};
use std::sync::LazyLock;
use subscription_tracker_e2e::configuration::{CheckMode, get_configuration};
use subscription_tracker_e2e::scenario::Scenario;
use subscription_tracker_e2e::telemetry::{get_subscriber, init_subscriber};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, Request, ResponseTemplate};

pub const TOKEN: &str = "test-token";
pub const BEARER: &str = "Bearer test-token";
pub const SUBSCRIPTION_ID: &str = "65f1c0ffee0000000000abcd";

// Ensure that the `tracing` stack is only initialised once using `LazyLock`
static TRACING: LazyLock<()> = LazyLock::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();
    // We cannot assign the output of `get_subscriber` to a variable based on the
    // value of `TEST_LOG` because the sink is part of the type returned by
    // `get_subscriber`, therefore they are not the same type.
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Matches requests that carry no `Authorization` header at all.
pub struct WithoutAuthorization;

impl wiremock::Match for WithoutAuthorization {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key("Authorization")
    }
}

/// A mock standing in for the Subscription Tracker API.
pub struct TestApi {
    pub server: MockServer,
}

impl TestApi {
    pub fn scenario(&self, check_mode: CheckMode) -> Scenario {
        scenario_against(&self.server.uri(), check_mode)
    }

    /// Sign-up, sign-in and create all succeed, each exactly once.
    pub async fn mount_fatal_steps(&self) {
        sign_up()
            .respond_with(success(201, json!({ "user": { "_id": "user-1" } })))
            .expect(1)
            .mount(&self.server)
            .await;
        sign_in()
            .respond_with(success(200, json!({ "token": TOKEN })))
            .expect(1)
            .mount(&self.server)
            .await;
        create_subscription()
            .respond_with(success(
                201,
                json!({ "subscription": spotify(9.99, "music") }),
            ))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// One listing per call, served in order.
    pub async fn mount_listings(&self, listings: Vec<ResponseTemplate>) {
        for listing in listings {
            list_subscriptions()
                .respond_with(listing)
                .up_to_n_times(1)
                .expect(1)
                .mount(&self.server)
                .await;
        }
    }

    pub async fn mount_update(&self, response: ResponseTemplate) {
        update_subscription()
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_delete(&self, response: ResponseTemplate) {
        delete_subscription()
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    pub async fn mount_unauthenticated_listing(&self, response: ResponseTemplate) {
        unauthenticated_listing()
            .respond_with(response)
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// An API that behaves the way the harness expects from start to end.
    pub async fn mount_happy_path(&self) {
        self.mount_fatal_steps().await;
        self.mount_listings(vec![
            listed(json!([spotify(9.99, "music")])),
            listed(json!([spotify(12.99, "premium music")])),
            listed(json!([])),
        ])
        .await;
        self.mount_update(success(200, json!({ "subscription": spotify(12.99, "premium music") })))
            .await;
        self.mount_delete(success(200, json!({}))).await;
        self.mount_unauthenticated_listing(failure(401, "Unauthorized"))
            .await;
    }
}

pub async fn spawn_api() -> TestApi {
    // The first time `initialize` is invoked the code in `TRACING` is executed.
    // All other invocations will instead skip execution.
    LazyLock::force(&TRACING);

    TestApi {
        server: MockServer::start().await,
    }
}

pub fn scenario_against(base_url: &str, check_mode: CheckMode) -> Scenario {
    LazyLock::force(&TRACING);

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.api.base_url = base_url.to_string();
        c.api.timeout_milliseconds = Some(2_000);
        c.checks.mode = check_mode;
        c
    };
    Scenario::build(configuration).expect("Failed to build scenario.")
}

pub fn sign_up() -> MockBuilder {
    Mock::given(method("POST")).and(path("/auth/sign-up"))
}

pub fn sign_in() -> MockBuilder {
    Mock::given(method("POST")).and(path("/auth/sign-in"))
}

pub fn create_subscription() -> MockBuilder {
    Mock::given(method("POST"))
        .and(path("/subscriptions"))
        .and(header("Authorization", BEARER))
}

pub fn list_subscriptions() -> MockBuilder {
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(header("Authorization", BEARER))
}

pub fn update_subscription() -> MockBuilder {
    Mock::given(method("PATCH"))
        .and(path(format!("/subscriptions/{}", SUBSCRIPTION_ID)))
        .and(header("Authorization", BEARER))
}

pub fn delete_subscription() -> MockBuilder {
    Mock::given(method("DELETE"))
        .and(path(format!("/subscriptions/{}", SUBSCRIPTION_ID)))
        .and(header("Authorization", BEARER))
}

pub fn unauthenticated_listing() -> MockBuilder {
    Mock::given(method("GET"))
        .and(path("/subscriptions"))
        .and(WithoutAuthorization)
}

pub fn success(status: u16, data: Value) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "success": true, "data": data }))
}

pub fn failure(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({ "success": false, "message": message }))
}

pub fn listed(items: Value) -> ResponseTemplate {
    success(200, items)
}

pub fn spotify(price: f64, category: &str) -> Value {
    json!({
        "_id": SUBSCRIPTION_ID,
        "name": "Spotify",
        "price": price,
        "currency": "USD",
        "frequency": "monthly",
        "category": category,
        "paymentMethod": "credit card",
        "status": "active"
    })
}
