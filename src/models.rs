// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. All types derive `ToSchema`
//! for the OpenAPI document served at `/docs`.
//!
//! Contract results are passed through verbatim: the chaincode already returns
//! JSON text, and the gateway wraps it as a string without re-parsing it.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Acknowledgement returned once a submitted transaction has committed.
pub const SUBMITTED_ACK: &str = "Transaction has been submitted";

/// Body of `POST /api/CreateCar/`. Fields are forwarded to the contract in
/// declaration order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CreateCarRequest {
    /// Ledger key of the car
    pub id: String,
    pub name: String,
    pub model: String,
    pub colour: String,
}

impl CreateCarRequest {
    /// Arguments of the `CreateCar` transaction.
    pub fn into_args(self) -> Vec<String> {
        vec![self.id, self.name, self.model, self.colour]
    }
}

/// Body of `POST /api/SellCar/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SellCarRequest {
    /// Owner recorded on the car after the sale
    pub new_buyer: String,
}

/// Result of a read-only contract call.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ContractResponse {
    /// Contract result decoded as UTF-8 text
    pub response: String,
}

impl ContractResponse {
    pub fn from_payload(payload: Vec<u8>) -> Self {
        let response = match String::from_utf8(payload) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };
        Self { response }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_car_args_keep_field_order() {
        let request: CreateCarRequest = serde_json::from_str(
            r#"{"colour":"Black","model":"BMW","name":"testManik","id":"c1"}"#,
        )
        .unwrap();

        assert_eq!(request.into_args(), vec!["c1", "testManik", "BMW", "Black"]);
    }

    #[test]
    fn create_car_requires_every_field() {
        let missing = serde_json::from_str::<CreateCarRequest>(r#"{"id":"c1","name":"n","model":"m"}"#);
        assert!(missing.is_err());
    }

    #[test]
    fn sell_car_reads_camel_case_buyer() {
        let request: SellCarRequest = serde_json::from_str(r#"{"newBuyer":"Alice"}"#).unwrap();
        assert_eq!(request.new_buyer, "Alice");

        let snake = serde_json::from_str::<SellCarRequest>(r#"{"new_buyer":"Alice"}"#);
        assert!(snake.is_err());
    }

    #[test]
    fn contract_response_wraps_payload_text() {
        let body = ContractResponse::from_payload(br#"[{"Key":"c1"}]"#.to_vec());
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"response":"[{\"Key\":\"c1\"}]"}"#
        );
    }

    #[test]
    fn invalid_utf8_is_replaced_not_rejected() {
        let body = ContractResponse::from_payload(vec![b'o', b'k', 0xff]);
        assert_eq!(body.response, "ok\u{fffd}");
    }
}
