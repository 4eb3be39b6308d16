//! Request handlers. Each one extracts input, calls a client or the payment
//! coordinator, and maps the error; no business rules live here.

use super::error::ApiError;
use super::state::AppState;
use crate::framework::ActorClient;
use crate::model::{
    Category, Order, OrderDraft, OrderId, Product, ProductId, User, UserCreate, UserId,
};
use crate::payments::{
    CardIntent, CardPaymentRequest, MobileMoneyPayment, MobileMoneyPaymentRequest, WebhookAck,
};
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Serialize;

type ApiResult<T> = Result<Json<T>, ApiError>;

const FETCH_PRODUCTS: &str = "Error fetching products";
const FETCH_PRODUCT: &str = "Error fetching product";
const CREATE_ORDER: &str = "Error creating order";
const FETCH_ORDER: &str = "Error fetching order";
const CREATE_INTENT: &str = "Error creating payment intent";
const MPESA_PAYMENT: &str = "Error processing M-Pesa payment";
const WEBHOOK: &str = "Webhook error";
const CREATE_USER: &str = "Error creating user";
const FETCH_USER: &str = "Error fetching user";

fn parse_id<I: From<u32>>(raw: &str, what: &str) -> Result<I, ApiError> {
    raw.trim()
        .parse::<u32>()
        .map(I::from)
        .map_err(|_| ApiError::bad_request(format!("Invalid {what} id")))
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Vec<Product>> {
    let products = state
        .catalog
        .list_all()
        .await
        .map_err(|e| ApiError::from_catalog(FETCH_PRODUCTS, e))?;
    Ok(Json(products))
}

/// Unknown categories yield an empty list.
pub async fn products_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> ApiResult<Vec<Product>> {
    let Some(category) = Category::parse(&category) else {
        return Ok(Json(Vec::new()));
    };
    let products = state
        .catalog
        .list_by_category(category)
        .await
        .map_err(|e| ApiError::from_catalog(FETCH_PRODUCTS, e))?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Product> {
    let id: ProductId = parse_id(&id, "product")?;
    state
        .catalog
        .get(id)
        .await
        .map_err(|e| ApiError::from_catalog(FETCH_PRODUCT, e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product not found"))
}

pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let Json(draft) = payload
        .map_err(|e| ApiError::bad_request(format!("{CREATE_ORDER}: {}", e.body_text())))?;
    if let Some(user_id) = draft.user_id {
        let user = state
            .users
            .get(user_id)
            .await
            .map_err(|e| ApiError::from_user(CREATE_ORDER, e))?;
        if user.is_none() {
            return Err(ApiError::bad_request(format!(
                "{CREATE_ORDER}: unknown user {user_id}"
            )));
        }
    }

    let id = state
        .orders
        .create_order(draft)
        .await
        .map_err(|e| ApiError::from_order(CREATE_ORDER, e))?;
    let order = state
        .orders
        .get(id)
        .await
        .map_err(|e| ApiError::from_order(CREATE_ORDER, e))?
        .ok_or_else(|| {
            ApiError::internal(CREATE_ORDER, format!("{id} vanished after creation"))
        })?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Order> {
    let id: OrderId = parse_id(&id, "order")?;
    state
        .orders
        .get(id)
        .await
        .map_err(|e| ApiError::from_order(FETCH_ORDER, e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Order not found"))
}

pub async fn create_payment_intent(
    State(state): State<AppState>,
    payload: Result<Json<CardPaymentRequest>, JsonRejection>,
) -> ApiResult<CardIntent> {
    let Json(request) = payload?;
    let intent = state
        .payments
        .create_card_intent(request)
        .await
        .map_err(|e| ApiError::from_payment(CREATE_INTENT, e))?;
    Ok(Json(intent))
}

pub async fn mpesa_payment(
    State(state): State<AppState>,
    payload: Result<Json<MobileMoneyPaymentRequest>, JsonRejection>,
) -> ApiResult<MobileMoneyPayment> {
    let Json(request) = payload?;
    let payment = state
        .payments
        .pay_with_mobile_money(request)
        .await
        .map_err(|e| ApiError::from_payment(MPESA_PAYMENT, e))?;
    Ok(Json(payment))
}

/// Takes the raw body so the signature can be checked over the exact bytes sent.
pub async fn payment_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<WebhookAck> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok());
    let outcome = state
        .webhooks
        .handle(signature, &body)
        .await
        .map_err(|e| ApiError::from_payment(WEBHOOK, e))?;
    Ok(Json(outcome.ack()))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigView {
    pub card_enabled: bool,
    pub publishable_key: Option<String>,
}

pub async fn payment_config(State(state): State<AppState>) -> Json<PaymentConfigView> {
    Json(PaymentConfigView {
        card_enabled: state.payments.card_enabled(),
        publishable_key: state.publishable_key.clone(),
    })
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(params) = payload?;
    let id = state
        .users
        .create_user(params)
        .await
        .map_err(|e| ApiError::from_user(CREATE_USER, e))?;
    let user = state
        .users
        .get(id)
        .await
        .map_err(|e| ApiError::from_user(CREATE_USER, e))?
        .ok_or_else(|| {
            ApiError::internal(CREATE_USER, format!("{id} vanished after creation"))
        })?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id: UserId = parse_id(&id, "user")?;
    state
        .users
        .get(id)
        .await
        .map_err(|e| ApiError::from_user(FETCH_USER, e))?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}

pub async fn user_orders(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Order>> {
    let id: UserId = parse_id(&id, "user")?;
    if state
        .users
        .get(id)
        .await
        .map_err(|e| ApiError::from_user(FETCH_USER, e))?
        .is_none()
    {
        return Err(ApiError::not_found("User not found"));
    }
    let orders = state
        .orders
        .orders_for_user(id)
        .await
        .map_err(|e| ApiError::from_order(FETCH_ORDER, e))?;
    Ok(Json(orders))
}
