use axum::{
    extract::{FromRequest, Request, State},
    http::{header, HeaderMap},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{collections::HashMap, time::Instant};

use crate::{error::AppError, handlers::AppState, metrics};

pub const PREDICT_ENDPOINT: &str = "/api/predict_home_price";

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub estimated_price: f64,
}

/// Validated prediction parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRequest {
    pub location: String,
    pub total_sqft: f64,
    pub bhk: i64,
    pub bath: i64,
}

impl PriceRequest {
    /// Validate raw request fields.
    ///
    /// Numbers may arrive as JSON numbers or as strings (form fields are
    /// always strings).
    pub fn from_fields(fields: &Map<String, Value>) -> Result<Self, AppError> {
        let total_sqft = parse_float(fields, "total_sqft")?;
        let location = parse_string(fields, "location")?;
        let bhk = parse_int(fields, "bhk")?;
        let bath = parse_int(fields, "bath")?;

        if location.is_empty() {
            return Err(AppError::InvalidRequestParameter(
                "Location is required".to_string(),
            ));
        }

        Ok(Self {
            location,
            total_sqft,
            bhk,
            bath,
        })
    }
}

/// Handle /api/predict_home_price (GET and POST)
///
/// Parameters come from a JSON body, form fields, or the query string on GET.
pub async fn predict_home_price(
    State(state): State<AppState>,
    request: Request,
) -> Result<Json<PredictResponse>, AppError> {
    let start = Instant::now();
    metrics::record_request(PREDICT_ENDPOINT);

    let result = predict(&state, request).await;

    metrics::record_duration(PREDICT_ENDPOINT, start.elapsed());
    if let Err(err) = &result {
        metrics::record_error(PREDICT_ENDPOINT, err.error_type());
    }

    result.map(|estimated_price| Json(PredictResponse { estimated_price }))
}

async fn predict(state: &AppState, request: Request) -> Result<f64, AppError> {
    let fields = read_fields(request).await?;
    let params = PriceRequest::from_fields(&fields)?;

    tracing::info!(
        total_sqft = params.total_sqft,
        location = %params.location,
        bhk = params.bhk,
        bath = params.bath,
        "Received price request"
    );

    let estimator = state.store.current();
    if estimator.location_index(&params.location).is_none() {
        metrics::record_unknown_location();
    }

    let price = estimator.estimate(&params.location, params.total_sqft, params.bhk, params.bath)?;

    tracing::info!(estimated_price = price, "Estimated price");
    Ok(price)
}

/// Collect request parameters into one JSON object regardless of encoding
async fn read_fields(request: Request) -> Result<Map<String, Value>, AppError> {
    if is_json_content(request.headers()) {
        let Json(body) = Json::<Value>::from_request(request, &())
            .await
            .map_err(|rejection| {
                AppError::InvalidRequestParameter(format!(
                    "Invalid JSON body: {}",
                    rejection.body_text()
                ))
            })?;

        return match body {
            Value::Object(fields) => Ok(fields),
            _ => Err(AppError::InvalidRequestParameter(
                "JSON body must be an object".to_string(),
            )),
        };
    }

    // GET/HEAD read the query string, other methods a urlencoded body
    let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
        .await
        .map_err(|rejection| {
            AppError::InvalidRequestParameter(format!(
                "Invalid form parameters: {}",
                rejection.body_text()
            ))
        })?;

    Ok(fields
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

/// `application/json` or any `application/*+json` media type
fn is_json_content(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn required<'a>(fields: &'a Map<String, Value>, name: &str) -> Result<&'a Value, AppError> {
    match fields.get(name) {
        None | Some(Value::Null) => Err(AppError::InvalidRequestParameter(format!(
            "Missing required parameter: {}",
            name
        ))),
        Some(value) => Ok(value),
    }
}

fn invalid(name: &str, expected: &str) -> AppError {
    AppError::InvalidRequestParameter(format!(
        "Invalid value for parameter '{}': expected {}",
        name, expected
    ))
}

fn parse_float(fields: &Map<String, Value>, name: &str) -> Result<f64, AppError> {
    let parsed = match required(fields, name)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(name, "a finite number"))
}

fn parse_int(fields: &Map<String, Value>, name: &str) -> Result<i64, AppError> {
    let parsed = match required(fields, name)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_number)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| invalid(name, "an integer"))
}

/// Accept floats like `3.0` for integer fields, reject `2.5`
fn whole_number(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

fn parse_string(fields: &Map<String, Value>, name: &str) -> Result<String, AppError> {
    match required(fields, name)? {
        Value::String(s) => Ok(s.clone()),
        _ => Err(invalid(name, "a string")),
    }
}
