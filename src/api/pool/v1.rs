use std::sync::Arc;

use actix_web::web::{Bytes, Data};
use actix_web::{HttpResponse, Result};

use log::debug;
use serde::{Deserialize, Serialize};

use pools::algorithm::WriteStatus;

use super::{QueryPayload, WritePayload};
use crate::api::{ApiError, AppState};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct WriteResponse {
    status: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct QueryResponse {
    // a missing order statistic drops the key, NaN goes out as null
    #[serde(skip_serializing_if = "Option::is_none")]
    quantile: Option<f64>,
    count: usize,
}

// Route Handlers
pub async fn write_pool(appstate: Data<Arc<AppState>>, body: Bytes) -> Result<HttpResponse> {
    let payload = match WritePayload::parse(&body) {
        Ok(payload) => payload,
        Err(error) => return Ok(error.to_response()),
    };

    let outcome = appstate.pools().append_or_create(payload.id, &payload.values);

    match outcome.status {
        WriteStatus::Created => {
            debug!("Created pool {} with {} values", payload.id, outcome.count);

            Ok(HttpResponse::Created().json(WriteResponse {
                status: "inserted".to_string(),
            }))
        }
        WriteStatus::Appended => {
            debug!(
                "Appended {} values to pool {}, now {} values",
                payload.values.len(),
                payload.id,
                outcome.count
            );

            Ok(HttpResponse::Ok().json(WriteResponse {
                status: "appended".to_string(),
            }))
        }
    }
}

pub async fn query_pool(appstate: Data<Arc<AppState>>, body: Bytes) -> Result<HttpResponse> {
    let payload = match QueryPayload::parse(&body) {
        Ok(payload) => payload,
        Err(error) => return Ok(error.to_response()),
    };

    match appstate.pools().query(payload.id, payload.percentile) {
        Ok(outcome) => Ok(HttpResponse::Ok().json(QueryResponse {
            quantile: outcome.quantile,
            count: outcome.count,
        })),
        Err(error) => Ok(ApiError::from(error).to_response()),
    }
}
