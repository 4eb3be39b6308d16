//! [`CardProcessor`] backed by the Stripe REST API.

use super::card::{CardProcessor, IntentRequest, PaymentIntent};
use super::retry::RetryPolicy;
use super::PaymentError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://api.stripe.com";

pub struct StripeProcessor {
    http: reqwest::Client,
    api_base: String,
    secret_key: String,
    retry: RetryPolicy,
}

#[derive(Deserialize)]
struct IntentBody {
    id: String,
    client_secret: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

enum Attempt {
    Done(Result<PaymentIntent, PaymentError>),
    Retry(String),
}

impl StripeProcessor {
    /// `request_timeout` bounds each HTTP attempt. The coordinator bounds the whole call,
    /// so pass [`RetryPolicy::attempt_timeout`] of that deadline to leave room for retries.
    pub fn new(
        api_base: impl Into<String>,
        secret_key: impl Into<String>,
        retry: RetryPolicy,
        request_timeout: Duration,
    ) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| PaymentError::Provider(format!("http client init failed: {e}")))?;
        Ok(Self {
            http,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            secret_key: secret_key.into(),
            retry,
        })
    }

    async fn attempt(
        &self,
        url: &str,
        request: &IntentRequest,
        form: &[(&str, String)],
    ) -> Attempt {
        let sent = self
            .http
            .post(url)
            .bearer_auth(&self.secret_key)
            .header("Idempotency-Key", &request.idempotency_key)
            .form(form)
            .send()
            .await;
        let response = match sent {
            Ok(response) => response,
            Err(e) => return Attempt::Retry(e.to_string()),
        };
        let status = response.status();
        if status.is_success() {
            return Attempt::Done(
                response
                    .json::<IntentBody>()
                    .await
                    .map(|body| PaymentIntent {
                        id: body.id,
                        client_secret: body.client_secret,
                    })
                    .map_err(|e| PaymentError::Provider(format!("unreadable response: {e}"))),
            );
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error.message,
            Err(_) => status.to_string(),
        };
        if status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS {
            Attempt::Retry(message)
        } else {
            Attempt::Done(Err(PaymentError::Provider(message)))
        }
    }
}

#[async_trait]
impl CardProcessor for StripeProcessor {
    async fn create_intent(&self, request: &IntentRequest) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.api_base);
        let mut form = vec![
            ("amount", request.amount_minor.to_string()),
            ("currency", request.currency.clone()),
        ];
        if let Some(order_id) = request.order_id {
            form.push(("metadata[orderId]", order_id.0.to_string()));
        }

        let mut attempt = 1;
        loop {
            debug!(attempt, amount = request.amount_minor, "Creating payment intent");
            match self.attempt(&url, request, &form).await {
                Attempt::Done(result) => return result,
                Attempt::Retry(message) if self.retry.should_retry(attempt) => {
                    warn!(attempt, error = %message, "Payment intent attempt failed, retrying");
                    tokio::time::sleep(self.retry.delay_for_attempt(attempt)).await;
                    attempt += 1;
                }
                Attempt::Retry(message) => return Err(PaymentError::Provider(message)),
            }
        }
    }
}
