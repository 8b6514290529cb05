// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{
    error::{ApiError, ErrorBody},
    ledger,
    models::{ContractResponse, CreateCarRequest, SellCarRequest, SUBMITTED_ACK},
    state::AppState,
};

#[utoipa::path(
    get,
    path = "/api/ListCars",
    tag = "Cars",
    responses(
        (status = 200, body = ContractResponse),
        (status = 404, description = "Application identity is not enrolled", body = ErrorBody),
        (status = 502, description = "Ledger network rejected or did not answer", body = ErrorBody)
    )
)]
pub async fn list_cars(State(state): State<AppState>) -> Result<Json<ContractResponse>, ApiError> {
    let payload = ledger::evaluate(&state, "ListCars", &[]).await?;
    Ok(Json(ContractResponse::from_payload(payload)))
}

#[utoipa::path(
    get,
    path = "/api/GetCarById/{id}",
    params(
        ("id" = String, Path, description = "Ledger key of the car")
    ),
    tag = "Cars",
    responses(
        (status = 200, body = ContractResponse),
        (status = 404, description = "Application identity is not enrolled", body = ErrorBody),
        (status = 502, description = "Ledger network rejected or did not answer", body = ErrorBody)
    )
)]
pub async fn get_car_by_id(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<ContractResponse>, ApiError> {
    let payload = ledger::evaluate(&state, "GetCarById", &[id]).await?;
    Ok(Json(ContractResponse::from_payload(payload)))
}

#[utoipa::path(
    post,
    path = "/api/CreateCar/",
    request_body = CreateCarRequest,
    tag = "Cars",
    responses(
        (status = 200, description = "Transaction committed", body = String, content_type = "text/plain"),
        (status = 404, description = "Application identity is not enrolled", body = ErrorBody),
        (status = 502, description = "Transaction was not endorsed or not committed", body = ErrorBody)
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<&'static str, ApiError> {
    ledger::submit(&state, "CreateCar", &request.into_args()).await?;
    Ok(SUBMITTED_ACK)
}

#[utoipa::path(
    post,
    path = "/api/DeliverToDealer/{id}",
    params(
        ("id" = String, Path, description = "Ledger key of the car")
    ),
    tag = "Cars",
    responses(
        (status = 200, description = "Transaction committed", body = String, content_type = "text/plain"),
        (status = 404, description = "Application identity is not enrolled", body = ErrorBody),
        (status = 502, description = "Transaction was not endorsed or not committed", body = ErrorBody)
    )
)]
pub async fn deliver_to_dealer(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<&'static str, ApiError> {
    ledger::submit(&state, "DeliverToDealer", &[id]).await?;
    Ok(SUBMITTED_ACK)
}

#[utoipa::path(
    post,
    path = "/api/SellCar/{id}",
    params(
        ("id" = String, Path, description = "Ledger key of the car")
    ),
    request_body = SellCarRequest,
    tag = "Cars",
    responses(
        (status = 200, description = "Transaction committed", body = String, content_type = "text/plain"),
        (status = 404, description = "Application identity is not enrolled", body = ErrorBody),
        (status = 502, description = "Transaction was not endorsed or not committed", body = ErrorBody)
    )
)]
pub async fn sell_car(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SellCarRequest>,
) -> Result<&'static str, ApiError> {
    ledger::submit(&state, "SellCar", &[id, request.new_buyer]).await?;
    Ok(SUBMITTED_ACK)
}
