use super::{ApiJson, AppState};
use crate::calculator::{self, painting, wood, CalculatorOptions};
use crate::error::Result;
use crate::leads::{self, PaintingRequest, WoodRequest};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, instrument};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/calculator/options", get(options))
        .route("/api/calculator-painting", post(painting_estimate))
        .route("/api/calculator-wood", post(wood_estimate))
}

#[derive(Debug, Serialize)]
pub struct EstimateSent<T> {
    pub success: bool,
    pub message: &'static str,
    pub estimate: T,
}

async fn options() -> Json<CalculatorOptions> {
    Json(calculator::options())
}

/// Totals are recomputed from the selections, never taken from the form.
#[instrument(skip_all)]
async fn painting_estimate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<PaintingRequest>,
) -> Result<Json<EstimateSent<painting::PaintingEstimate>>> {
    request.customer.validate()?;
    let estimate = painting::estimate(&request.input);
    info!(
        "Painting estimate {} for {}",
        estimate.grand_total_formatted,
        request.customer.email.as_deref().unwrap_or_default()
    );

    let lead = leads::painting_lead(&request.customer, &estimate, &state.config.mail.company_inbox);
    leads::deliver(state.notifier.as_ref(), &lead).await?;
    Ok(Json(EstimateSent {
        success: true,
        message: "Estimates sent successfully",
        estimate,
    }))
}

#[instrument(skip_all)]
async fn wood_estimate(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<WoodRequest>,
) -> Result<Json<EstimateSent<wood::WoodEstimate>>> {
    request.customer.validate()?;
    let estimate = wood::estimate(&request.input)?;
    info!(
        "Wood estimate {} for {}",
        estimate.total_formatted,
        request.customer.email.as_deref().unwrap_or_default()
    );

    let lead = leads::wood_lead(&request.customer, &estimate, &state.config.mail.company_inbox);
    leads::deliver(state.notifier.as_ref(), &lead).await?;
    Ok(Json(EstimateSent {
        success: true,
        message: "Estimates sent successfully",
        estimate,
    }))
}
