//! JSON endpoints over the signing service.
//!
//! Successful responses are wrapped as `{"data": ...}`, failures as `{"errors": [...]}`.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::Method;
use axum::routing::{get, post};
use axum::{Json, Router};
use libchainsign::errors::Error as CoreError;
use libchainsign::{DeviceInfo, SignedData, SigningService};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::ApiError;

type SharedService = Arc<SigningService>;

/// Builds the router for every `/api/v0` endpoint.
pub fn router(service: SharedService) -> Router {
    Router::new()
        .route("/api/v0/health", get(health))
        .route("/api/v0/devices", get(list_devices).post(create_device))
        .route("/api/v0/new", post(create_device))
        .route("/api/v0/devices/{id}", get(get_device))
        .route("/api/v0/devices/{id}/sign", post(sign_with_device))
        .route("/api/v0/sign", post(sign_data))
        .fallback(unknown_route)
        .method_not_allowed_fallback(wrong_method)
        .with_state(service)
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

/// Request body for device creation. The label is optional.
#[derive(Debug, Deserialize)]
pub struct CreateDeviceRequest {
    pub algorithm: String,
    #[serde(default)]
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub struct SignRequest {
    pub data: String,
}

/// Request body of the flat signing route, which names the device in the body.
#[derive(Debug, Deserialize)]
pub struct SignDataRequest {
    pub id: Uuid,
    pub data: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeviceResponse {
    pub id: Uuid,
    pub label: String,
    pub algorithm: String,
    /// PEM-encoded `SubjectPublicKeyInfo`.
    pub public_key: String,
}

impl TryFrom<DeviceInfo> for DeviceResponse {
    type Error = ApiError;

    fn try_from(info: DeviceInfo) -> Result<Self, Self::Error> {
        Ok(Self {
            id: info.id,
            public_key: info.public_key.to_pem()?,
            algorithm: info.algorithm.to_string(),
            label: info.label,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignResponse {
    /// Base64 signature, exactly as produced by the device.
    pub signature: String,
    /// The canonical bytes that were signed.
    pub signed_data: String,
}

impl TryFrom<SignedData> for SignResponse {
    type Error = ApiError;

    fn try_from(signed: SignedData) -> Result<Self, Self::Error> {
        let text = |bytes: Vec<u8>| {
            String::from_utf8(bytes).map_err(|e| ApiError::Internal(e.to_string()))
        };

        Ok(Self {
            signature: text(signed.signature)?,
            signed_data: text(signed.data)?,
        })
    }
}

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

fn respond<T>(data: T) -> ApiResult<T> {
    Ok(Json(Envelope { data }))
}

/// Runs CPU-bound core work (key generation, signing) off the async worker threads.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, CoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
        .map_err(ApiError::from)
}

fn device_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, ApiError> {
    path.map(|Path(id)| id)
        .map_err(|e| ApiError::BadRequest(format!("invalid device id: {}", e.body_text())))
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(body)| body)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
    pub version: String,
}

async fn health() -> ApiResult<Health> {
    respond(Health {
        status: "pass".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
    })
}

async fn create_device(
    State(service): State<SharedService>,
    body: Result<Json<CreateDeviceRequest>, JsonRejection>,
) -> ApiResult<DeviceResponse> {
    let request = json_body(body)?;

    let info = blocking(move || service.create_device(&request.algorithm, &request.label)).await?;
    info!(device = %info.id, algorithm = %info.algorithm, label = %info.label, "created signature device");

    respond(info.try_into()?)
}

async fn list_devices(State(service): State<SharedService>) -> ApiResult<Vec<DeviceResponse>> {
    let devices = service
        .list_devices()
        .into_iter()
        .map(DeviceResponse::try_from)
        .collect::<Result<_, _>>()?;

    respond(devices)
}

async fn get_device(
    State(service): State<SharedService>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<DeviceResponse> {
    let id = device_id(path)?;
    respond(service.get_device(&id)?.try_into()?)
}

async fn sign_with_device(
    State(service): State<SharedService>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<SignRequest>, JsonRejection>,
) -> ApiResult<SignResponse> {
    let id = device_id(path)?;
    let request = json_body(body)?;
    sign(service, id, request.data).await
}

async fn sign_data(
    State(service): State<SharedService>,
    body: Result<Json<SignDataRequest>, JsonRejection>,
) -> ApiResult<SignResponse> {
    let request = json_body(body)?;
    sign(service, request.id, request.data).await
}

async fn sign(service: SharedService, id: Uuid, data: String) -> ApiResult<SignResponse> {
    let signed = blocking(move || service.sign_data(&id, data.as_bytes())).await?;
    debug!(device = %id, counter = signed.counter, "signed data");

    respond(signed.try_into()?)
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("no such route".to_owned())
}

async fn wrong_method(method: Method) -> ApiError {
    ApiError::MethodNotAllowed(method.to_string())
}
