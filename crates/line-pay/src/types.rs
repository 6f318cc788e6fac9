//! Request and response bodies of the online API.

use serde::{Deserialize, Serialize};

/// Currency used for every payment.
pub const CURRENCY: &str = "TWD";

/// `returnCode` of a successful call.
pub const SUCCESS_RETURN_CODE: &str = "0000";

/// Where the user is sent after approving the payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfirmUrlType {
    /// Redirect the user's browser to `confirmUrl`
    Client,
    /// Call `confirmUrl` from the gateway
    Server,
    /// No redirect
    None,
}

/// Body of `POST /v3/payments/request`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub amount: u64,
    pub currency: String,
    pub order_id: String,
    pub packages: Vec<Package>,
    pub redirect_urls: RedirectUrls,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<u64>,
    pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectUrls {
    pub confirm_url_type: ConfirmUrlType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confirm_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_url: Option<String>,
}

impl PaymentRequest {
    /// Request for a single package holding a single product.
    ///
    /// The package amount equals the order amount and the user is redirected
    /// client-side to `confirm_url` once the payment is approved.
    pub fn single_product(
        amount: u64,
        order_id: impl Into<String>,
        product: Product,
        confirm_url: impl Into<String>,
        cancel_url: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency: CURRENCY.to_string(),
            order_id: order_id.into(),
            packages: vec![Package {
                id: "1".to_string(),
                amount,
                name: None,
                products: vec![product],
            }],
            redirect_urls: RedirectUrls {
                confirm_url_type: ConfirmUrlType::Client,
                confirm_url: Some(confirm_url.into()),
                cancel_url: Some(cancel_url.into()),
            },
        }
    }
}

/// Body of `POST /v3/payments/{transactionId}/confirm`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmRequest {
    pub amount: u64,
    pub currency: String,
}

/// Common envelope of every online API response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub return_code: String,
    #[serde(default)]
    pub return_message: String,
    pub info: Option<T>,
}

/// `info` of a successful payment request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestPaymentInfo {
    pub payment_url: PaymentUrl,
    pub transaction_id: u64,
    #[serde(default)]
    pub payment_access_token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUrl {
    pub web: String,
    pub app: String,
}

/// `info` of a successful confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentInfo {
    pub order_id: String,
    pub transaction_id: u64,
    #[serde(default)]
    pub pay_info: Vec<PayInfo>,
}

/// One funding source used for a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayInfo {
    /// e.g. `BALANCE`, `CREDIT_CARD`
    pub method: String,
    pub amount: u64,
}

/// One entry of `GET /v3/payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetail {
    pub transaction_id: u64,
    #[serde(default)]
    pub order_id: Option<String>,
    #[serde(default)]
    pub transaction_date: Option<String>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub pay_info: Vec<PayInfo>,
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
