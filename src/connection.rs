// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fabric common connection profile.
//!
//! Only the parts the client needs are modelled: the client organisation,
//! its peers and its certificate authorities. Unknown keys are ignored so
//! profiles generated by the test network load unchanged.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

/// Errors raised while loading or querying a connection profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("failed to read connection profile {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid connection profile: {0}")]
    Json(#[from] serde_json::Error),

    #[error("organization {0} is not defined in the connection profile")]
    MissingOrganization(String),

    #[error("certificate authority {0} is not defined in the connection profile")]
    MissingCertificateAuthority(String),

    #[error("peer {0} is not defined in the connection profile")]
    MissingPeer(String),

    #[error("organization {0} has no peers")]
    NoPeers(String),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionProfile {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub client: Option<ClientSection>,
    #[serde(default)]
    pub organizations: HashMap<String, Organization>,
    #[serde(default)]
    pub peers: HashMap<String, PeerConfig>,
    #[serde(default)]
    pub certificate_authorities: HashMap<String, CaConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSection {
    pub organization: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub mspid: String,
    #[serde(default)]
    pub peers: Vec<String>,
    #[serde(default)]
    pub certificate_authorities: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerConfig {
    pub url: String,
    #[serde(default, rename = "tlsCACerts")]
    pub tls_ca_certs: Option<TlsCaCerts>,
    #[serde(default)]
    pub grpc_options: GrpcOptions,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GrpcOptions {
    #[serde(default, rename = "ssl-target-name-override")]
    pub ssl_target_name_override: Option<String>,
    #[serde(default, rename = "hostnameOverride")]
    pub hostname_override: Option<String>,
}

impl GrpcOptions {
    /// Name the peer's TLS certificate is issued for, if it differs from the URL host.
    pub fn tls_server_name(&self) -> Option<&str> {
        self.ssl_target_name_override
            .as_deref()
            .or(self.hostname_override.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaConfig {
    pub url: String,
    #[serde(default)]
    pub ca_name: Option<String>,
    #[serde(default, rename = "tlsCACerts")]
    pub tls_ca_certs: Option<TlsCaCerts>,
    #[serde(default)]
    pub http_options: HttpOptions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpOptions {
    #[serde(default = "default_verify")]
    pub verify: bool,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            verify: default_verify(),
        }
    }
}

fn default_verify() -> bool {
    true
}

/// TLS roots, either inline PEM (a string or a list of strings) or a file path.
#[derive(Debug, Clone, Deserialize)]
pub struct TlsCaCerts {
    #[serde(default)]
    pub pem: Option<PemSource>,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PemSource {
    One(String),
    Many(Vec<String>),
}

impl TlsCaCerts {
    /// All configured roots concatenated into one PEM bundle.
    pub fn pem_bundle(&self) -> Result<Option<String>, ProfileError> {
        let mut bundle = match &self.pem {
            Some(PemSource::One(pem)) => pem.clone(),
            Some(PemSource::Many(pems)) => pems.join("\n"),
            None => String::new(),
        };

        if let Some(path) = &self.path {
            let from_file = fs::read_to_string(path).map_err(|source| ProfileError::Io {
                path: path.clone(),
                source,
            })?;
            if !bundle.is_empty() && !bundle.ends_with('\n') {
                bundle.push('\n');
            }
            bundle.push_str(&from_file);
        }

        Ok((!bundle.trim().is_empty()).then_some(bundle))
    }
}

impl ConnectionProfile {
    /// Read and parse a profile from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// The organisation this client belongs to.
    ///
    /// Falls back to the only organisation when the `client` section is absent.
    pub fn client_organization(&self) -> Result<(&str, &Organization), ProfileError> {
        match &self.client {
            Some(client) => self
                .organizations
                .get_key_value(&client.organization)
                .map(|(name, org)| (name.as_str(), org))
                .ok_or_else(|| ProfileError::MissingOrganization(client.organization.clone())),
            None => {
                let mut orgs = self.organizations.iter();
                match (orgs.next(), orgs.next()) {
                    (Some((name, org)), None) => Ok((name.as_str(), org)),
                    _ => Err(ProfileError::MissingOrganization("<client>".to_string())),
                }
            }
        }
    }

    pub fn certificate_authority(&self, name: &str) -> Result<&CaConfig, ProfileError> {
        self.certificate_authorities
            .get(name)
            .ok_or_else(|| ProfileError::MissingCertificateAuthority(name.to_string()))
    }

    /// The peer the gateway session connects to: the client organisation's first peer.
    pub fn gateway_peer(&self) -> Result<(&str, &PeerConfig), ProfileError> {
        let (org_name, org) = self.client_organization()?;
        let peer_name = org
            .peers
            .first()
            .ok_or_else(|| ProfileError::NoPeers(org_name.to_string()))?;
        let peer = self
            .peers
            .get(peer_name)
            .ok_or_else(|| ProfileError::MissingPeer(peer_name.clone()))?;
        Ok((peer_name.as_str(), peer))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const ORG1_PROFILE: &str = r#"{
        "name": "test-network-org1",
        "version": "1.0.0",
        "client": {
            "organization": "Org1",
            "connection": { "timeout": { "peer": { "endorser": "300" } } }
        },
        "organizations": {
            "Org1": {
                "mspid": "Org1MSP",
                "peers": ["peer0.org1.example.com"],
                "certificateAuthorities": ["ca.org1.example.com"]
            }
        },
        "peers": {
            "peer0.org1.example.com": {
                "url": "grpcs://localhost:7051",
                "tlsCACerts": { "pem": "-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n" },
                "grpcOptions": {
                    "ssl-target-name-override": "peer0.org1.example.com",
                    "hostnameOverride": "peer0.org1.example.com"
                }
            }
        },
        "certificateAuthorities": {
            "ca.org1.example.com": {
                "url": "https://localhost:7054",
                "caName": "ca-org1",
                "tlsCACerts": { "pem": ["-----BEGIN CERTIFICATE-----\nMIIB\n-----END CERTIFICATE-----\n"] },
                "httpOptions": { "verify": false }
            }
        }
    }"#;

    #[test]
    fn parses_test_network_profile() {
        let profile = ConnectionProfile::from_json(ORG1_PROFILE).unwrap();
        assert_eq!(profile.name, "test-network-org1");

        let (org_name, org) = profile.client_organization().unwrap();
        assert_eq!(org_name, "Org1");
        assert_eq!(org.mspid, "Org1MSP");

        let ca = profile.certificate_authority("ca.org1.example.com").unwrap();
        assert_eq!(ca.url, "https://localhost:7054");
        assert_eq!(ca.ca_name.as_deref(), Some("ca-org1"));
        assert!(!ca.http_options.verify);
        let bundle = ca.tls_ca_certs.as_ref().unwrap().pem_bundle().unwrap();
        assert!(bundle.unwrap().starts_with("-----BEGIN CERTIFICATE-----"));
    }

    #[test]
    fn gateway_peer_is_first_peer_of_client_org() {
        let profile = ConnectionProfile::from_json(ORG1_PROFILE).unwrap();
        let (name, peer) = profile.gateway_peer().unwrap();
        assert_eq!(name, "peer0.org1.example.com");
        assert_eq!(peer.url, "grpcs://localhost:7051");
        assert_eq!(
            peer.grpc_options.tls_server_name(),
            Some("peer0.org1.example.com")
        );
    }

    #[test]
    fn missing_ca_is_reported_by_name() {
        let profile = ConnectionProfile::from_json(ORG1_PROFILE).unwrap();
        let err = profile.certificate_authority("ca.org2.example.com").unwrap_err();
        assert!(matches!(err, ProfileError::MissingCertificateAuthority(name) if name == "ca.org2.example.com"));
    }

    #[test]
    fn http_verify_defaults_to_true() {
        let profile = ConnectionProfile::from_json(
            r#"{"name":"n","certificateAuthorities":{"ca":{"url":"https://ca:7054"}}}"#,
        )
        .unwrap();
        assert!(profile.certificate_authority("ca").unwrap().http_options.verify);
    }

    #[test]
    fn single_organization_is_used_without_client_section() {
        let profile = ConnectionProfile::from_json(
            r#"{"name":"n","organizations":{"Org2":{"mspid":"Org2MSP","peers":[]}}}"#,
        )
        .unwrap();
        let (name, _) = profile.client_organization().unwrap();
        assert_eq!(name, "Org2");
        assert!(matches!(profile.gateway_peer(), Err(ProfileError::NoPeers(org)) if org == "Org2"));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = ConnectionProfile::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ProfileError::Io { .. }));
    }
}
