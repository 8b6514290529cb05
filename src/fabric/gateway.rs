// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fabric Gateway client (gRPC).
//!
//! Sessions talk to the gateway service of the client organisation's first
//! peer. The peer performs discovery, endorsement and ordering on the
//! client's behalf; the client only builds and signs proposals, signs the
//! prepared transaction and waits for its commit status.

use std::{future::Future, time::Duration};

use async_trait::async_trait;
use http::uri::PathAndQuery;
use prost::Message;
use tonic::{
    client::Grpc,
    codec::ProstCodec,
    transport::{Certificate, Channel, ClientTlsConfig, Endpoint},
};
use url::Url;

use super::{
    proposal::{build_proposal, serialize_creator, sign_proposal, Invocation, TransactionContext},
    protos::{
        paths, CommitStatusRequest, CommitStatusResponse, EndorseRequest, EndorseResponse,
        EvaluateRequest, EvaluateResponse, Response, SignedCommitStatusRequest, SubmitRequest,
        SubmitResponse, TX_VALIDATION_VALID,
    },
    signing::IdentitySigner,
    DiscoveryOptions, FabricError, LedgerConnector, LedgerSession, SessionRequest, SubmitReceipt,
};
use crate::connection::PeerConfig;

/// Peer responses at or above this status are failures.
const RESPONSE_ERROR_THRESHOLD: i32 = 400;

/// Opens gRPC sessions to the gateway peer named in the connection profile.
#[derive(Debug, Clone)]
pub struct GrpcConnector {
    timeout: Duration,
}

impl GrpcConnector {
    /// `timeout` bounds connecting and every individual ledger operation.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Where and how to dial a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PeerTarget {
    uri: String,
    tls: Option<PeerTls>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PeerTls {
    ca_pem: String,
    domain: String,
}

fn resolve_target(
    peer_name: &str,
    peer: &PeerConfig,
    discovery: DiscoveryOptions,
) -> Result<PeerTarget, FabricError> {
    let url = Url::parse(&peer.url).map_err(|e| FabricError::InvalidUrl(format!("{}: {e}", peer.url)))?;
    let secure = match url.scheme() {
        "grpcs" | "https" => true,
        "grpc" | "http" => false,
        other => {
            return Err(FabricError::InvalidUrl(format!(
                "unsupported scheme {other} for peer {peer_name}"
            )))
        }
    };
    let original_host = url
        .host_str()
        .ok_or_else(|| FabricError::InvalidUrl(format!("peer {peer_name} has no host")))?;
    let port = url
        .port()
        .ok_or_else(|| FabricError::InvalidUrl(format!("peer {peer_name} has no port")))?;

    let host = if discovery.as_localhost {
        "localhost"
    } else {
        original_host
    };
    let scheme = if secure { "https" } else { "http" };
    let uri = format!("{scheme}://{host}:{port}");

    let tls = if secure {
        let ca_pem = match &peer.tls_ca_certs {
            Some(certs) => certs.pem_bundle()?,
            None => None,
        }
        .ok_or_else(|| FabricError::Tls(format!("peer {peer_name} has no tlsCACerts")))?;
        let domain = peer
            .grpc_options
            .tls_server_name()
            .unwrap_or(original_host)
            .to_string();
        Some(PeerTls { ca_pem, domain })
    } else {
        None
    };

    Ok(PeerTarget { uri, tls })
}

#[async_trait]
impl LedgerConnector for GrpcConnector {
    async fn connect(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<Box<dyn LedgerSession>, FabricError> {
        let (peer_name, peer) = request.profile.gateway_peer()?;
        let (_, organization) = request.profile.client_organization()?;
        let target = resolve_target(peer_name, peer, request.discovery)?;
        let signer = IdentitySigner::from_pem(request.identity.private_key())?;

        let mut endpoint = Endpoint::from_shared(target.uri.clone())
            .map_err(|e| FabricError::InvalidUrl(e.to_string()))?
            .connect_timeout(self.timeout);
        if let Some(tls) = target.tls {
            endpoint = endpoint.tls_config(
                ClientTlsConfig::new()
                    .ca_certificate(Certificate::from_pem(tls.ca_pem))
                    .domain_name(tls.domain),
            )?;
        }

        tracing::debug!(peer = %peer_name, uri = %target.uri, "Connecting to gateway peer");
        let channel = tokio::time::timeout(self.timeout, endpoint.connect())
            .await
            .map_err(|_| FabricError::Timeout(self.timeout))??;

        let target_organizations = if request.discovery.enabled {
            Vec::new()
        } else {
            vec![organization.mspid.clone()]
        };

        Ok(Box::new(GrpcSession {
            grpc: Grpc::new(channel),
            signer,
            creator: serialize_creator(request.identity),
            channel: request.channel.to_string(),
            contract: request.contract.to_string(),
            target_organizations,
            timeout: self.timeout,
            peer: peer_name.to_string(),
        }))
    }
}

/// One identity's connection to the gateway peer.
pub struct GrpcSession {
    grpc: Grpc<Channel>,
    signer: IdentitySigner,
    creator: Vec<u8>,
    channel: String,
    contract: String,
    target_organizations: Vec<String>,
    timeout: Duration,
    peer: String,
}

impl GrpcSession {
    fn invocation<'a>(&'a self, function: &'a str, args: &'a [String]) -> Invocation<'a> {
        Invocation {
            channel: &self.channel,
            contract: &self.contract,
            function,
            args,
        }
    }

    async fn deadline<T>(
        &self,
        operation: impl Future<Output = Result<T, FabricError>>,
    ) -> Result<T, FabricError> {
        tokio::time::timeout(self.timeout, operation)
            .await
            .map_err(|_| FabricError::Timeout(self.timeout))?
    }

    async fn unary<Req, Resp>(&self, path: &'static str, request: Req) -> Result<Resp, FabricError>
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let mut grpc = self.grpc.clone();
        grpc.ready()
            .await
            .map_err(|e| FabricError::Transport(e.to_string()))?;
        let codec: ProstCodec<Req, Resp> = ProstCodec::default();
        let response = grpc
            .unary(
                tonic::Request::new(request),
                PathAndQuery::from_static(path),
                codec,
            )
            .await
            .map_err(FabricError::from_status)?;
        Ok(response.into_inner())
    }
}

fn check_response(response: &Response) -> Result<(), FabricError> {
    if response.status >= RESPONSE_ERROR_THRESHOLD {
        return Err(FabricError::Endorsement(format!(
            "chaincode returned status {}: {}",
            response.status, response.message
        )));
    }
    Ok(())
}

#[async_trait]
impl LedgerSession for GrpcSession {
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, FabricError> {
        self.deadline(async {
            let context = TransactionContext::new(self.creator.clone())?;
            let proposal = build_proposal(&context, &self.invocation(function, args));
            let request = EvaluateRequest {
                transaction_id: context.transaction_id.clone(),
                channel_id: self.channel.clone(),
                proposed_transaction: Some(sign_proposal(&proposal, &self.signer)),
                target_organizations: self.target_organizations.clone(),
            };

            let response: EvaluateResponse = self.unary(paths::EVALUATE, request).await?;
            let result = response
                .result
                .ok_or_else(|| FabricError::Endorsement("empty evaluate response".to_string()))?;
            check_response(&result)?;
            tracing::debug!(tx_id = %context.transaction_id, function, "Transaction evaluated");
            Ok(result.payload)
        })
        .await
    }

    async fn submit(&self, function: &str, args: &[String]) -> Result<SubmitReceipt, FabricError> {
        self.deadline(async {
            let context = TransactionContext::new(self.creator.clone())?;
            let transaction_id = context.transaction_id.clone();
            let proposal = build_proposal(&context, &self.invocation(function, args));

            let endorsed: EndorseResponse = self
                .unary(
                    paths::ENDORSE,
                    EndorseRequest {
                        transaction_id: transaction_id.clone(),
                        channel_id: self.channel.clone(),
                        proposed_transaction: Some(sign_proposal(&proposal, &self.signer)),
                        endorsing_organizations: self.target_organizations.clone(),
                    },
                )
                .await?;
            let mut envelope = endorsed.prepared_transaction.ok_or_else(|| {
                FabricError::Endorsement("gateway returned no prepared transaction".to_string())
            })?;
            envelope.signature = self.signer.sign(&envelope.payload);

            let _: SubmitResponse = self
                .unary(
                    paths::SUBMIT,
                    SubmitRequest {
                        transaction_id: transaction_id.clone(),
                        channel_id: self.channel.clone(),
                        prepared_transaction: Some(envelope),
                    },
                )
                .await?;

            let status_request = CommitStatusRequest {
                transaction_id: transaction_id.clone(),
                channel_id: self.channel.clone(),
                identity: self.creator.clone(),
            }
            .encode_to_vec();
            let status: CommitStatusResponse = self
                .unary(
                    paths::COMMIT_STATUS,
                    SignedCommitStatusRequest {
                        signature: self.signer.sign(&status_request),
                        request: status_request,
                    },
                )
                .await?;

            if status.result != TX_VALIDATION_VALID {
                return Err(FabricError::Commit {
                    transaction_id,
                    code: status.result,
                });
            }

            tracing::debug!(tx_id = %transaction_id, block = status.block_number, function, "Transaction committed");
            Ok(SubmitReceipt {
                transaction_id,
                block_number: status.block_number,
            })
        })
        .await
    }

    async fn close(self: Box<Self>) {
        tracing::debug!(peer = %self.peer, "Closing gateway session");
    }
}
