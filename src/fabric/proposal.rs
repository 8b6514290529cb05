// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transaction proposal construction.
//!
//! A proposal names the channel, the chaincode and the invocation arguments,
//! and is bound to the creator identity and a random nonce. The transaction id
//! is `hex(sha256(nonce || creator))`, as peers recompute and check it.

use prost::Message;
use ring::rand::{SecureRandom, SystemRandom};
use sha2::{Digest, Sha256};

use super::{
    protos::{
        ChaincodeHeaderExtension, ChaincodeId, ChaincodeInput, ChaincodeInvocationSpec,
        ChaincodeProposalPayload, ChaincodeSpec, ChannelHeader, Header, Proposal,
        SerializedIdentity, SignatureHeader, SignedProposal, HEADER_TYPE_ENDORSER_TRANSACTION,
    },
    signing::IdentitySigner,
    FabricError,
};
use crate::identity::X509Identity;

const NONCE_LENGTH: usize = 24;

/// Serialized `msp.SerializedIdentity` of a wallet identity.
pub fn serialize_creator(identity: &X509Identity) -> Vec<u8> {
    SerializedIdentity {
        mspid: identity.msp_id.clone(),
        id_bytes: identity.certificate().as_bytes().to_vec(),
    }
    .encode_to_vec()
}

/// Nonce, creator and derived transaction id of one transaction.
#[derive(Debug, Clone)]
pub struct TransactionContext {
    pub transaction_id: String,
    pub nonce: Vec<u8>,
    pub creator: Vec<u8>,
}

impl TransactionContext {
    pub fn new(creator: Vec<u8>) -> Result<Self, FabricError> {
        let mut nonce = vec![0u8; NONCE_LENGTH];
        SystemRandom::new()
            .fill(&mut nonce)
            .map_err(|_| FabricError::Encoding("failed to generate nonce".to_string()))?;
        Ok(Self::with_nonce(creator, nonce))
    }

    pub fn with_nonce(creator: Vec<u8>, nonce: Vec<u8>) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&nonce);
        hasher.update(&creator);
        let transaction_id = hex::encode(hasher.finalize());
        Self {
            transaction_id,
            nonce,
            creator,
        }
    }
}

/// A chaincode function call: name followed by string arguments.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub channel: &'a str,
    pub contract: &'a str,
    pub function: &'a str,
    pub args: &'a [String],
}

/// Build the unsigned proposal for `invocation`.
pub fn build_proposal(context: &TransactionContext, invocation: &Invocation<'_>) -> Proposal {
    let chaincode_id = ChaincodeId {
        name: invocation.contract.to_string(),
        ..Default::default()
    };

    let channel_header = ChannelHeader {
        r#type: HEADER_TYPE_ENDORSER_TRANSACTION,
        timestamp: Some(now_timestamp()),
        channel_id: invocation.channel.to_string(),
        tx_id: context.transaction_id.clone(),
        extension: ChaincodeHeaderExtension {
            chaincode_id: Some(chaincode_id.clone()),
        }
        .encode_to_vec(),
        ..Default::default()
    };

    let signature_header = SignatureHeader {
        creator: context.creator.clone(),
        nonce: context.nonce.clone(),
    };

    let header = Header {
        channel_header: channel_header.encode_to_vec(),
        signature_header: signature_header.encode_to_vec(),
    };

    let args = std::iter::once(invocation.function.as_bytes().to_vec())
        .chain(invocation.args.iter().map(|arg| arg.as_bytes().to_vec()))
        .collect();

    let invocation_spec = ChaincodeInvocationSpec {
        chaincode_spec: Some(ChaincodeSpec {
            chaincode_id: Some(chaincode_id),
            input: Some(ChaincodeInput {
                args,
                ..Default::default()
            }),
            ..Default::default()
        }),
    };

    let payload = ChaincodeProposalPayload {
        input: invocation_spec.encode_to_vec(),
        ..Default::default()
    };

    Proposal {
        header: header.encode_to_vec(),
        payload: payload.encode_to_vec(),
        extension: Vec::new(),
    }
}

/// Encode and sign a proposal.
pub fn sign_proposal(proposal: &Proposal, signer: &IdentitySigner) -> SignedProposal {
    let proposal_bytes = proposal.encode_to_vec();
    let signature = signer.sign(&proposal_bytes);
    SignedProposal {
        proposal_bytes,
        signature,
    }
}

fn now_timestamp() -> prost_types::Timestamp {
    let now = chrono::Utc::now();
    prost_types::Timestamp {
        seconds: now.timestamp(),
        nanos: now.timestamp_subsec_nanos() as i32,
    }
}
