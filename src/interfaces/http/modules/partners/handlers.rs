//! Partner API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    Json,
};
use uuid::Uuid;

use super::dto::{PartnerDto, PartnerPromoCodeLimitDto, SetPartnerPromoCodeLimitRequest};
use crate::application::PartnerService;
use crate::interfaces::http::common::{domain_error, ApiError, ApiResponse, ValidatedJson};

/// Partner handler state
#[derive(Clone)]
pub struct PartnerHandlerState {
    pub service: Arc<PartnerService>,
}

#[utoipa::path(
    get,
    path = "/api/v1/partners",
    tag = "Partners",
    responses(
        (status = 200, description = "All partners with their limit history", body = ApiResponse<Vec<PartnerDto>>)
    )
)]
pub async fn list_partners(
    State(state): State<PartnerHandlerState>,
) -> Result<Json<ApiResponse<Vec<PartnerDto>>>, ApiError<Vec<PartnerDto>>> {
    let partners = state.service.list_partners().await.map_err(domain_error)?;
    let dtos = partners.iter().map(PartnerDto::from_domain).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/v1/partners/{id}",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "Partner ID")),
    responses(
        (status = 200, description = "Partner", body = ApiResponse<PartnerDto>),
        (status = 404, description = "Partner not found")
    )
)]
pub async fn get_partner(
    State(state): State<PartnerHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PartnerDto>>, ApiError<PartnerDto>> {
    let partner = state.service.get_partner(id).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PartnerDto::from_domain(&partner))))
}

#[utoipa::path(
    get,
    path = "/api/v1/partners/{id}/limits/{limit_id}",
    tag = "Partners",
    params(
        ("id" = Uuid, Path, description = "Partner ID"),
        ("limit_id" = Uuid, Path, description = "Promo code limit ID")
    ),
    responses(
        (status = 200, description = "Promo code limit", body = ApiResponse<PartnerPromoCodeLimitDto>),
        (status = 404, description = "Partner or limit not found")
    )
)]
pub async fn get_partner_limit(
    State(state): State<PartnerHandlerState>,
    Path((id, limit_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<PartnerPromoCodeLimitDto>>, ApiError<PartnerPromoCodeLimitDto>> {
    let limit = state
        .service
        .get_partner_limit(id, limit_id)
        .await
        .map_err(domain_error)?;
    Ok(Json(ApiResponse::success(PartnerPromoCodeLimitDto::from_domain(&limit))))
}

#[utoipa::path(
    post,
    path = "/api/v1/partners/{id}/limits",
    tag = "Partners",
    params(("id" = Uuid, Path, description = "Partner ID")),
    request_body = SetPartnerPromoCodeLimitRequest,
    responses(
        (status = 201, description = "Limit assigned", body = ApiResponse<PartnerPromoCodeLimitDto>,
            headers(("Location" = String, description = "URI of the new limit"))),
        (status = 400, description = "Partner not active, invalid limit or malformed body"),
        (status = 404, description = "Partner not found")
    )
)]
pub async fn set_partner_promo_code_limit(
    State(state): State<PartnerHandlerState>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<SetPartnerPromoCodeLimitRequest>,
) -> Result<
    (
        StatusCode,
        [(header::HeaderName, String); 1],
        Json<ApiResponse<PartnerPromoCodeLimitDto>>,
    ),
    ApiError<PartnerPromoCodeLimitDto>,
> {
    let limit = state
        .service
        .set_promo_code_limit(id, body.limit, body.end_date)
        .await
        .map_err(domain_error)?;

    let location = format!("/api/v1/partners/{}/limits/{}", id, limit.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(ApiResponse::success(PartnerPromoCodeLimitDto::from_domain(&limit))),
    ))
}
