// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    error::ErrorBody,
    models::{ContractResponse, CreateCarRequest, SellCarRequest},
    state::AppState,
};

pub mod cars;
pub mod health;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/api/ListCars", get(cars::list_cars))
        .route("/api/GetCarById/{id}", get(cars::get_car_by_id))
        .route("/api/CreateCar/", post(cars::create_car))
        .route("/api/CreateCar", post(cars::create_car))
        .route("/api/DeliverToDealer/{id}", post(cars::deliver_to_dealer))
        .route("/api/SellCar/{id}", post(cars::sell_car))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        cars::list_cars,
        cars::get_car_by_id,
        cars::create_car,
        cars::deliver_to_dealer,
        cars::sell_car,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            CreateCarRequest,
            SellCarRequest,
            ContractResponse,
            ErrorBody,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Cars", description = "carApp chaincode operations"),
        (name = "Health", description = "Liveness and readiness checks")
    )
)]
struct ApiDoc;
