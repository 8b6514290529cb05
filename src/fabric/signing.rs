// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! ECDSA signing with wallet keys.
//!
//! Fabric identities use P-256 keys. Peers and the CA reject signatures whose
//! `s` value lies in the upper half of the curve order, so every signature is
//! normalised to low-S before DER encoding.

use p256::{
    ecdsa::{signature::Signer, Signature, SigningKey, VerifyingKey},
    pkcs8::DecodePrivateKey,
    SecretKey,
};

use super::FabricError;

/// Signs payloads on behalf of a wallet identity.
#[derive(Clone)]
pub struct IdentitySigner {
    key: SigningKey,
}

impl IdentitySigner {
    /// Parse a PKCS#8 (`PRIVATE KEY`) or SEC1 (`EC PRIVATE KEY`) PEM key.
    pub fn from_pem(pem: &str) -> Result<Self, FabricError> {
        let key = SigningKey::from_pkcs8_pem(pem)
            .or_else(|_| SecretKey::from_sec1_pem(pem).map(SigningKey::from))
            .map_err(|e| FabricError::InvalidCredentials(format!("Invalid private key: {e}")))?;
        Ok(Self { key })
    }

    /// SHA-256 ECDSA signature over `message`, DER encoded, low-S.
    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        let signature: Signature = self.key.sign(message);
        let signature = signature.normalize_s().unwrap_or(signature);
        signature.to_der().as_bytes().to_vec()
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        *self.key.verifying_key()
    }
}
