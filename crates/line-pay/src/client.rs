//! LINE Pay online API client.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::PayConfig;
use crate::error::PayError;
use crate::signing::{
    new_nonce, sign_request, AUTHORIZATION_HEADER, CHANNEL_ID_HEADER, NONCE_HEADER,
};
use crate::types::{
    ApiResponse, ConfirmPaymentInfo, ConfirmRequest, PaymentDetail, PaymentRequest,
    RequestPaymentInfo, CURRENCY, SUCCESS_RETURN_CODE,
};

/// Client for the LINE Pay online API (v3).
///
/// Every call is signed with a fresh nonce. Calls are not retried.
///
/// # Examples
///
/// ```no_run
/// # use line_pay::{PayClient, PayConfig, PaymentRequest, Product};
/// # async fn example() -> Result<(), line_pay::PayError> {
/// let client = PayClient::new(PayConfig::new(false, "1234567890", "channel-secret"))?;
///
/// let product = Product {
///     id: None,
///     name: "monthly plan".to_string(),
///     image_url: None,
///     quantity: 1,
///     original_price: None,
///     price: 70,
/// };
/// let request = PaymentRequest::single_product(
///     70,
///     "order-1",
///     product,
///     "https://example.com/pay/confirm",
///     "https://example.com/pay/cancel",
/// );
///
/// let info = client.request_payment(&request).await?;
/// println!("Pay at {}", info.payment_url.web);
///
/// let confirmed = client.confirm_payment(info.transaction_id, 70).await?;
/// println!("Confirmed order {}", confirmed.order_id);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PayClient {
    http_client: reqwest::Client,
    config: PayConfig,
}

impl PayClient {
    /// # Errors
    ///
    /// Returns `PayError::Configuration` if the HTTP client cannot be built.
    pub fn new(config: PayConfig) -> Result<Self, PayError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PayError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &PayConfig {
        &self.config
    }

    /// Reserve a payment (`POST /v3/payments/request`).
    ///
    /// The returned payment URLs are shown to the user; the transaction id is
    /// needed to confirm the payment afterwards.
    pub async fn request_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<RequestPaymentInfo, PayError> {
        self.post("/v3/payments/request", request).await
    }

    /// Complete a payment the user approved
    /// (`POST /v3/payments/{transactionId}/confirm`).
    pub async fn confirm_payment(
        &self,
        transaction_id: u64,
        amount: u64,
    ) -> Result<ConfirmPaymentInfo, PayError> {
        let body = ConfirmRequest {
            amount,
            currency: CURRENCY.to_string(),
        };
        let path = format!("/v3/payments/{}/confirm", transaction_id);
        self.post(&path, &body).await
    }

    /// Look up a completed transaction (`GET /v3/payments`).
    pub async fn payment_details(&self, transaction_id: u64) -> Result<Vec<PaymentDetail>, PayError> {
        let query = format!("transactionId={}", transaction_id);
        self.get("/v3/payments", &query).await
    }

    async fn post<B, T>(&self, api_path: &str, body: &B) -> Result<T, PayError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        // The signed bytes and the sent bytes must be identical.
        let body = serde_json::to_string(body).map_err(PayError::Serialization)?;
        let url = format!("{}{}", self.config.base_url(), api_path);

        self.execute(Method::POST, url, api_path, body.clone(), Some(body))
            .await
    }

    async fn get<T: DeserializeOwned>(&self, api_path: &str, query: &str) -> Result<T, PayError> {
        let mut url = format!("{}{}", self.config.base_url(), api_path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(query);
        }

        self.execute(Method::GET, url, api_path, query.to_string(), None)
            .await
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: String,
        api_path: &str,
        signed_content: String,
        body: Option<String>,
    ) -> Result<T, PayError> {
        let nonce = new_nonce();
        let signature = sign_request(
            self.config.channel_secret(),
            api_path,
            &signed_content,
            &nonce,
        )?;

        let mut request = self
            .http_client
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(CHANNEL_ID_HEADER, &self.config.channel_id)
            .header(AUTHORIZATION_HEADER, signature)
            .header(NONCE_HEADER, &nonce);
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(method = %method, api_path, status = status.as_u16(), "LINE Pay response");

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            return Err(PayError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> =
            serde_json::from_slice(&bytes).map_err(|e| PayError::InvalidResponse {
                message: format!("Failed to decode response body: {}", e),
            })?;

        if envelope.return_code != SUCCESS_RETURN_CODE {
            warn!(
                api_path,
                return_code = %envelope.return_code,
                return_message = %envelope.return_message,
                "LINE Pay rejected request"
            );
            return Err(PayError::Rejected {
                code: envelope.return_code,
                message: envelope.return_message,
            });
        }

        envelope.info.ok_or_else(|| PayError::InvalidResponse {
            message: "Successful response without info".to_string(),
        })
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
