use std::fmt;

use actix_web::http::Method;
use actix_web::web::{post, resource, to, Bytes, ServiceConfig};
use actix_web::{HttpRequest, HttpResponse, Result as HttpResult};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use pools::algorithm::{PoolError, PoolStore};

pub mod pool;

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    InvalidJson,
    Pool(PoolError),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::InvalidJson => write!(f, "Invalid JSON input"),
            ApiError::Pool(PoolError::InvalidInput(_)) => write!(f, "Invalid payload format"),
            ApiError::Pool(PoolError::NotFound(_)) => write!(f, "Pool not found"),
        }
    }
}

impl From<PoolError> for ApiError {
    fn from(error: PoolError) -> Self {
        ApiError::Pool(error)
    }
}

impl ApiError {
    pub fn to_response(&self) -> HttpResponse {
        let builder = match self {
            ApiError::InvalidJson => {
                warn!("Rejected request: undecodable body");
                HttpResponse::BadRequest
            }
            ApiError::Pool(PoolError::InvalidInput(message)) => {
                warn!("Rejected request: {}", message);
                HttpResponse::BadRequest
            }
            ApiError::Pool(PoolError::NotFound(id)) => {
                debug!("Pool {} not found", id);
                HttpResponse::NotFound
            }
        };

        builder().json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

pub struct AppState {
    pools: PoolStore,
}

impl AppState {
    pub fn new() -> AppState {
        AppState {
            pools: PoolStore::new(),
        }
    }

    pub fn pools(&self) -> &PoolStore {
        &self.pools
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub async fn method_not_allowed(request: HttpRequest) -> HttpResult<HttpResponse> {
    debug!("{} {} is not allowed", request.method(), request.path());

    Ok(HttpResponse::MethodNotAllowed().json(ErrorResponse {
        error: "Only POST allowed".to_string(),
    }))
}

pub async fn unknown_endpoint(request: HttpRequest, body: Bytes) -> HttpResult<HttpResponse> {
    if request.method() != Method::POST {
        return method_not_allowed(request).await;
    }

    if serde_json::from_slice::<serde_json::Value>(&body).is_err() {
        return Ok(ApiError::InvalidJson.to_response());
    }

    Ok(HttpResponse::NotFound().json(ErrorResponse {
        error: "Unknown endpoint".to_string(),
    }))
}

pub fn routes(cfg: &mut ServiceConfig) {
    cfg.service(
        resource("/pool")
            .route(post().to(pool::write_pool))
            .default_service(to(method_not_allowed)),
    )
    .service(
        resource("/query")
            .route(post().to(pool::query_pool))
            .default_service(to(method_not_allowed)),
    )
    .default_service(to(unknown_endpoint));
}
