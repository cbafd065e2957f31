use crate::api_client::ApiClient;
use crate::checks::{self, CheckOutcome};
use crate::configuration::{CheckMode, Settings};
use crate::domain::{ApiResponse, SubscriptionRequest, SubscriptionUpdate, TestUser};
use crate::utils::error_chain_fmt;
use anyhow::Context;
use chrono::Utc;
use std::future::Future;

/// A run aborted at one of its three fatal steps.
#[derive(thiserror::Error)]
pub enum ScenarioError {
    #[error("Sign up failed, cannot continue.")]
    SignUpFailed(#[source] anyhow::Error),
    #[error("Sign in failed, cannot continue.")]
    SignInFailed(#[source] anyhow::Error),
    #[error("Create subscription failed, cannot continue.")]
    CreateSubscriptionFailed(#[source] anyhow::Error),
}

impl std::fmt::Debug for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Everything observed by a run that made it past the fatal steps.
#[derive(Debug)]
pub struct RunReport {
    check_mode: CheckMode,
    checks: Vec<CheckOutcome>,
}

impl RunReport {
    fn new(check_mode: CheckMode) -> Self {
        Self {
            check_mode,
            checks: Vec::new(),
        }
    }

    fn record(&mut self, outcome: CheckOutcome) {
        if outcome.passed {
            tracing::info!(check = outcome.name, detail = %outcome.detail, "Check passed");
        } else {
            tracing::warn!(check = outcome.name, detail = %outcome.detail, "Check failed");
        }
        println!("{}", outcome);
        self.checks.push(outcome);
    }

    pub fn checks(&self) -> &[CheckOutcome] {
        &self.checks
    }

    pub fn check(&self, name: &str) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.name == name)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.checks.iter().filter(|c| !c.passed)
    }

    /// Failed checks only count against the run when checks are enforced.
    pub fn is_acceptable(&self) -> bool {
        match self.check_mode {
            CheckMode::Observe => true,
            CheckMode::Enforce => self.failed_checks().next().is_none(),
        }
    }
}

/// The fixed sequence of calls one harness run makes against the API.
#[derive(Debug)]
pub struct Scenario {
    api_client: ApiClient,
    test_user: TestUser,
    subscription: SubscriptionRequest,
    update: SubscriptionUpdate,
    check_mode: CheckMode,
}

impl Scenario {
    pub fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let api_client = configuration
            .api
            .client()
            .context("Failed to build the HTTP client.")?;
        let test_user = TestUser::generate(&configuration.test_user)
            .map_err(anyhow::Error::msg)
            .context("Invalid test user settings.")?;
        Ok(Self {
            api_client,
            test_user,
            subscription: SubscriptionRequest::sample(Utc::now().date_naive()),
            update: SubscriptionUpdate::sample(),
            check_mode: configuration.checks.mode,
        })
    }

    pub fn test_user(&self) -> &TestUser {
        &self.test_user
    }

    pub fn subscription(&self) -> &SubscriptionRequest {
        &self.subscription
    }

    #[tracing::instrument(
        name = "Running the end-to-end scenario",
        skip(self),
        fields(
            base_url = %self.api_client.base_url(),
            user_email = %self.test_user.email
        )
    )]
    pub async fn run(&self) -> Result<RunReport, ScenarioError> {
        let api = &self.api_client;

        fatal_step("Sign Up", api.sign_up(&self.test_user))
            .await
            .map_err(ScenarioError::SignUpFailed)?;

        let token = fatal_step("Sign In", api.sign_in(&self.test_user))
            .await
            .and_then(|response| {
                response
                    .token()
                    .context("The sign-in response carries no token.")
            })
            .map_err(ScenarioError::SignInFailed)?;

        let subscription_id = fatal_step(
            "Create Subscription",
            api.create_subscription(&token, &self.subscription),
        )
        .await
        .and_then(|response| {
            response
                .created_subscription_id()
                .context("The create response carries no subscription id.")
        })
        .map_err(ScenarioError::CreateSubscriptionFailed)?;

        let mut report = RunReport::new(self.check_mode);

        let listed = best_effort_step("Get Subscriptions", api.get_subscriptions(&token)).await;
        report.record(evaluate(
            checks::CREATED_SUBSCRIPTION_IS_LISTED,
            listed,
            |list| checks::created_subscription_is_listed(list, &subscription_id, &self.subscription),
        ));

        let updated = best_effort_step(
            "Update Subscription",
            api.update_subscription(&token, &subscription_id, &self.update),
        )
        .await;
        report.record(evaluate(checks::UPDATE_ACCEPTED, updated, |response| {
            checks::request_accepted(checks::UPDATE_ACCEPTED, response)
        }));

        let listed = best_effort_step("Get Subscriptions", api.get_subscriptions(&token)).await;
        report.record(evaluate(
            checks::UPDATED_SUBSCRIPTION_IS_LISTED,
            listed,
            |list| checks::updated_subscription_is_listed(list, &subscription_id, &self.update),
        ));

        let deleted = best_effort_step(
            "Delete Subscription",
            api.delete_subscription(&token, &subscription_id),
        )
        .await;
        report.record(evaluate(checks::DELETE_ACCEPTED, deleted, |response| {
            checks::request_accepted(checks::DELETE_ACCEPTED, response)
        }));

        let listed = best_effort_step("Get Subscriptions", api.get_subscriptions(&token)).await;
        report.record(evaluate(
            checks::DELETED_SUBSCRIPTION_IS_GONE,
            listed,
            |list| checks::deleted_subscription_is_gone(list, &subscription_id),
        ));

        let probed = best_effort_step(
            "Unauthorized Request Test",
            api.get_subscriptions_unauthenticated(),
        )
        .await;
        report.record(evaluate(
            checks::UNAUTHENTICATED_REQUEST_IS_REJECTED,
            probed,
            checks::unauthenticated_request_is_rejected,
        ));

        section("All tests complete!");
        let failed = report.failed_checks().count();
        println!(
            "{} of {} checks passed.",
            report.checks().len() - failed,
            report.checks().len()
        );

        Ok(report)
    }
}

fn section(title: &str) {
    println!("\n====================");
    println!("{}", title);
    println!("====================");
}

/// A step the rest of the run depends on: anything but `success: true`
/// is an error.
async fn fatal_step<F>(title: &str, call: F) -> Result<ApiResponse, anyhow::Error>
where
    F: Future<Output = Result<ApiResponse, reqwest::Error>>,
{
    section(title);
    let response = call
        .await
        .with_context(|| format!("{} request could not be completed.", title))?;
    println!("{}", response.pretty());
    if !response.is_success() {
        anyhow::bail!(
            "The API did not report success (status {}).",
            response.status()
        );
    }
    Ok(response)
}

/// A step whose failure gets reported while the run carries on.
async fn best_effort_step<F>(title: &str, call: F) -> Result<ApiResponse, reqwest::Error>
where
    F: Future<Output = Result<ApiResponse, reqwest::Error>>,
{
    section(title);
    match call.await {
        Ok(response) => {
            println!("{}", response.pretty());
            Ok(response)
        }
        Err(e) => {
            tracing::error!(
                error.cause_chain = ?e,
                error.message = %e,
                "{} request could not be completed. Continuing.",
                title
            );
            println!("Request failed: {}", e);
            Err(e)
        }
    }
}

fn evaluate<C>(
    name: &'static str,
    result: Result<ApiResponse, reqwest::Error>,
    check: C,
) -> CheckOutcome
where
    C: FnOnce(&ApiResponse) -> CheckOutcome,
{
    match result {
        Ok(response) => check(&response),
        Err(e) => checks::request_not_completed(name, &e),
    }
}
