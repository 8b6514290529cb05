// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fabric CA client over the CA's REST API.
//!
//! - `POST /api/v1/enroll`: basic auth with the enrollment id and secret,
//!   body carries a PKCS#10 CSR for a key generated here. The private key
//!   never leaves this process.
//! - `POST /api/v1/register`: authenticated with a token signed by the
//!   registrar's wallet key.

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use rcgen::{Certificate, CertificateParams, DistinguishedName, DnType};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use url::Url;

use super::{
    signing::IdentitySigner, CertificateAuthority, Enrollment, EnrollmentRequest, FabricError,
    RegistrationRequest,
};
use crate::{connection::CaConfig, identity::X509Identity};

/// Fabric CA client built from a connection profile entry.
#[derive(Debug, Clone)]
pub struct FabricCaClient {
    http: reqwest::Client,
    base_url: Url,
    ca_name: Option<String>,
}

#[derive(Serialize)]
struct EnrollBody<'a> {
    certificate_request: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caname: Option<&'a str>,
}

#[derive(Serialize)]
struct RegisterBody<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    role: &'a str,
    affiliation: &'a str,
    max_enrollments: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    caname: Option<&'a str>,
}

#[derive(Deserialize)]
struct CaResponse<T> {
    #[serde(default)]
    success: bool,
    result: Option<T>,
    #[serde(default)]
    errors: Vec<CaMessage>,
}

#[derive(Deserialize)]
struct CaMessage {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct EnrollResult {
    #[serde(rename = "Cert")]
    cert: String,
}

#[derive(Deserialize)]
struct RegisterResult {
    secret: String,
}

impl FabricCaClient {
    /// Build a client for `ca`, trusting its `tlsCACerts` unless
    /// `httpOptions.verify` is false.
    pub fn from_profile(ca: &CaConfig) -> Result<Self, FabricError> {
        let base_url = Url::parse(&ca.url).map_err(|e| FabricError::InvalidUrl(e.to_string()))?;

        let mut builder = reqwest::Client::builder();
        if ca.http_options.verify {
            let bundle = match &ca.tls_ca_certs {
                Some(certs) => certs
                    .pem_bundle()
                    .map_err(|e| FabricError::Tls(e.to_string()))?,
                None => None,
            };
            if let Some(bundle) = bundle {
                let roots = reqwest::Certificate::from_pem_bundle(bundle.as_bytes())
                    .map_err(|e| FabricError::Tls(e.to_string()))?;
                for root in roots {
                    builder = builder.add_root_certificate(root);
                }
            }
        } else {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder
            .build()
            .map_err(|e| FabricError::Tls(e.to_string()))?;

        Ok(Self {
            http,
            base_url,
            ca_name: ca.ca_name.clone(),
        })
    }

    fn endpoint(&self, method: &str) -> Result<Url, FabricError> {
        self.base_url
            .join(&format!("api/v1/{method}"))
            .map_err(|e| FabricError::InvalidUrl(e.to_string()))
    }
}

#[async_trait]
impl CertificateAuthority for FabricCaClient {
    async fn enroll(&self, request: &EnrollmentRequest) -> Result<Enrollment, FabricError> {
        let (csr, private_key) = generate_csr(&request.enrollment_id)?;
        let body = EnrollBody {
            certificate_request: &csr,
            caname: self.ca_name.as_deref(),
        };

        tracing::debug!(enrollment_id = %request.enrollment_id, url = %self.base_url, "Enrolling with CA");
        let response = self
            .http
            .post(self.endpoint("enroll")?)
            .basic_auth(&request.enrollment_id, Some(&request.secret))
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let result: EnrollResult = parse_ca_response(status, &bytes)?;

        let certificate = Base64::decode_vec(&result.cert)
            .map_err(|e| FabricError::Encoding(format!("certificate is not base64: {e}")))
            .and_then(|bytes| {
                String::from_utf8(bytes)
                    .map_err(|e| FabricError::Encoding(format!("certificate is not PEM: {e}")))
            })?;

        Ok(Enrollment {
            certificate,
            private_key,
        })
    }

    async fn register(
        &self,
        registrar: &X509Identity,
        request: &RegistrationRequest,
    ) -> Result<String, FabricError> {
        let signer = IdentitySigner::from_pem(registrar.private_key())?;
        let url = self.endpoint("register")?;
        let body = serde_json::to_vec(&RegisterBody {
            id: &request.enrollment_id,
            role: &request.role,
            affiliation: &request.affiliation,
            max_enrollments: request.max_enrollments,
            caname: self.ca_name.as_deref(),
        })
        .map_err(|e| FabricError::Encoding(e.to_string()))?;

        let token = auth_token(&signer, registrar.certificate(), "POST", url.path(), &body);

        tracing::debug!(enrollment_id = %request.enrollment_id, "Registering with CA");
        let response = self
            .http
            .post(url)
            .header(reqwest::header::AUTHORIZATION, token)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        let result: RegisterResult = parse_ca_response(status, &bytes)?;
        Ok(result.secret)
    }
}

/// Generate a P-256 key and a CSR with `common_name` as subject CN.
///
/// Returns `(csr_pem, pkcs8_private_key_pem)`.
fn generate_csr(common_name: &str) -> Result<(String, String), FabricError> {
    let mut params = CertificateParams::new(Vec::<String>::new());
    params.alg = &rcgen::PKCS_ECDSA_P256_SHA256;
    let mut subject = DistinguishedName::new();
    subject.push(DnType::CommonName, common_name);
    params.distinguished_name = subject;

    let key_and_request =
        Certificate::from_params(params).map_err(|e| FabricError::Encoding(e.to_string()))?;
    let csr = key_and_request
        .serialize_request_pem()
        .map_err(|e| FabricError::Encoding(e.to_string()))?;
    Ok((csr, key_and_request.serialize_private_key_pem()))
}

/// Token for authenticated CA calls: `b64(cert).b64(sig)` where the signature
/// covers `method.b64(path).b64(body).b64(cert)`.
fn auth_token(
    signer: &IdentitySigner,
    certificate_pem: &str,
    method: &str,
    path: &str,
    body: &[u8],
) -> String {
    let cert = Base64::encode_string(certificate_pem.as_bytes());
    let signed = format!(
        "{method}.{}.{}.{cert}",
        Base64::encode_string(path.as_bytes()),
        Base64::encode_string(body)
    );
    let signature = Base64::encode_string(&signer.sign(signed.as_bytes()));
    format!("{cert}.{signature}")
}

/// Unwrap the CA's `{success, result, errors}` envelope.
fn parse_ca_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> Result<T, FabricError> {
    let parsed: CaResponse<T> = serde_json::from_slice(body).map_err(|_| FabricError::Ca {
        code: i64::from(status),
        message: String::from_utf8_lossy(body).trim().to_string(),
    })?;

    if let Some(error) = parsed.errors.into_iter().next() {
        return Err(FabricError::Ca {
            code: error.code,
            message: error.message,
        });
    }
    if !parsed.success || !(200..300).contains(&status) {
        return Err(FabricError::Ca {
            code: i64::from(status),
            message: "request was not successful".to_string(),
        });
    }
    parsed
        .result
        .ok_or_else(|| FabricError::Encoding("CA response has no result".to_string()))
}
