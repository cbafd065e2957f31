use crate::domain::{
    ApiResponse, AuthToken, SubscriptionId, SubscriptionRequest, SubscriptionUpdate, TestUser,
};
use anyhow::Context;
use reqwest::{Client, Url};
use secrecy::ExposeSecret;
use std::time::Duration;

/// Thin wrapper over the Subscription Tracker REST API.
///
/// Every call returns the parsed [`ApiResponse`] no matter the status
/// code. Only transport failures surface as `Err`.
#[derive(Clone, Debug)]
pub struct ApiClient {
    base_url: String,
    subscriptions_url: Url,
    http_client: Client,
}

#[derive(serde::Serialize)]
struct SignUpRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

impl ApiClient {
    pub fn new(
        base_url: String,
        user_agent: &str,
        timeout: Option<Duration>,
    ) -> Result<Self, anyhow::Error> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let subscriptions_url = Url::parse(&format!("{}/subscriptions", base_url))
            .with_context(|| format!("{} is not a valid API base url.", base_url))?;
        if subscriptions_url.cannot_be_a_base() {
            anyhow::bail!("{} cannot be used as an API base url.", base_url);
        }
        let mut builder = Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;
        Ok(Self {
            base_url,
            subscriptions_url,
            http_client,
        })
    }

    /// `/subscriptions/{id}` with the id escaped as a single path segment.
    fn subscription_url(&self, subscription_id: &SubscriptionId) -> Url {
        let mut url = self.subscriptions_url.clone();
        // Never fails: `new` rejects cannot-be-a-base urls
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(subscription_id.as_ref());
        }
        url
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[tracing::instrument(name = "Signing up", skip(self, user), fields(user_email = %user.email))]
    pub async fn sign_up(&self, user: &TestUser) -> Result<ApiResponse, reqwest::Error> {
        let url = format!("{}/auth/sign-up", self.base_url);
        let request_body = SignUpRequest {
            name: user.name.as_ref(),
            email: user.email.as_ref(),
            password: user.password.expose_secret(),
        };
        let response = self.http_client.post(&url).json(&request_body).send().await?;
        ApiResponse::from_response(response).await
    }

    #[tracing::instrument(name = "Signing in", skip(self, user), fields(user_email = %user.email))]
    pub async fn sign_in(&self, user: &TestUser) -> Result<ApiResponse, reqwest::Error> {
        let url = format!("{}/auth/sign-in", self.base_url);
        let request_body = SignInRequest {
            email: user.email.as_ref(),
            password: user.password.expose_secret(),
        };
        let response = self.http_client.post(&url).json(&request_body).send().await?;
        ApiResponse::from_response(response).await
    }

    #[tracing::instrument(name = "Creating a subscription", skip(self, token))]
    pub async fn create_subscription(
        &self,
        token: &AuthToken,
        subscription: &SubscriptionRequest,
    ) -> Result<ApiResponse, reqwest::Error> {
        let url = format!("{}/subscriptions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(token.expose_secret())
            .json(subscription)
            .send()
            .await?;
        ApiResponse::from_response(response).await
    }

    #[tracing::instrument(name = "Listing subscriptions", skip(self, token))]
    pub async fn get_subscriptions(
        &self,
        token: &AuthToken,
    ) -> Result<ApiResponse, reqwest::Error> {
        let url = format!("{}/subscriptions", self.base_url);
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        ApiResponse::from_response(response).await
    }

    #[tracing::instrument(
        name = "Updating a subscription",
        skip(self, token, subscription_id),
        fields(subscription_id = %subscription_id)
    )]
    pub async fn update_subscription(
        &self,
        token: &AuthToken,
        subscription_id: &SubscriptionId,
        update: &SubscriptionUpdate,
    ) -> Result<ApiResponse, reqwest::Error> {
        let url = self.subscription_url(subscription_id);
        let response = self
            .http_client
            .patch(url)
            .bearer_auth(token.expose_secret())
            .json(update)
            .send()
            .await?;
        ApiResponse::from_response(response).await
    }

    #[tracing::instrument(
        name = "Deleting a subscription",
        skip(self, token, subscription_id),
        fields(subscription_id = %subscription_id)
    )]
    pub async fn delete_subscription(
        &self,
        token: &AuthToken,
        subscription_id: &SubscriptionId,
    ) -> Result<ApiResponse, reqwest::Error> {
        let url = self.subscription_url(subscription_id);
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        ApiResponse::from_response(response).await
    }

    /// Lists subscriptions without any credentials. The API should refuse.
    #[tracing::instrument(name = "Listing subscriptions without a token", skip(self))]
    pub async fn get_subscriptions_unauthenticated(&self) -> Result<ApiResponse, reqwest::Error> {
        let url = format!("{}/subscriptions", self.base_url);
        let response = self.http_client.get(&url).send().await?;
        ApiResponse::from_response(response).await
    }
}
