use axum::Json;

use zuruu_flows::tools::adherence::{AdherenceInput, AdherenceSummary, calculate};
use zuruu_flows::tools::units::{Conversion, ConversionRequest, convert_request};

use crate::error::ApiError;

pub async fn adherence_summary(
    Json(input): Json<AdherenceInput>,
) -> Result<Json<AdherenceSummary>, ApiError> {
    Ok(Json(calculate(&input)?))
}

pub async fn convert_units(
    Json(request): Json<ConversionRequest>,
) -> Result<Json<Conversion>, ApiError> {
    Ok(Json(convert_request(&request)?))
}
