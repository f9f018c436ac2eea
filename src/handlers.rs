use actix_web::{web, HttpResponse, Result};
use serde_json::Value;

use crate::error::ServiceError;
use crate::models::{HealthResponse, HistoryResponse, PredictRequest, PredictResponse};
use crate::service::PredictionService;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        log::debug!("rejected request body: {}", err);
        ServiceError::MalformedBody.into()
    }))
    .service(web::resource("/api/health").route(web::get().to(health)))
    .service(web::resource("/api/predict").route(web::post().to(predict)))
    .service(web::resource("/api/history").route(web::get().to(history)));
}

pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        message: "Fake Review Detector API is running".to_string(),
    })
}

pub async fn predict(
    service: web::Data<PredictionService>,
    body: web::Json<Value>,
) -> Result<HttpResponse, ServiceError> {
    let request = parse_request(body.into_inner())?;
    let prediction = service.predict(request.review).await?;
    Ok(HttpResponse::Ok().json(PredictResponse::from(prediction)))
}

/// Empty bodies (`null`, `{}`, `[]`, `""`, `0`, `false`) count as no data.
fn parse_request(body: Value) -> Result<PredictRequest, ServiceError> {
    let empty = match &body {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    };
    if empty {
        return Err(ServiceError::MalformedBody);
    }
    serde_json::from_value(body).map_err(|err| {
        log::debug!("rejected request body: {}", err);
        ServiceError::MalformedBody
    })
}

pub async fn history(service: web::Data<PredictionService>) -> Result<HttpResponse, ServiceError> {
    let history = service.history().await?;
    Ok(HttpResponse::Ok().json(HistoryResponse {
        history,
        status: "success".to_string(),
    }))
}
