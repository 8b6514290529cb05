// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Recording fakes for the Fabric traits.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use super::{
    CertificateAuthority, Enrollment, EnrollmentRequest, FabricError, LedgerConnector,
    LedgerSession, RegistrationRequest, SessionRequest, SubmitReceipt,
};
use crate::identity::{
    tests::{TEST_CERT, TEST_KEY},
    X509Identity,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCall {
    Evaluate { function: String, args: Vec<String> },
    Submit { function: String, args: Vec<String> },
}

#[derive(Debug, Clone, Default)]
pub struct LedgerLog {
    pub connects: usize,
    pub closes: usize,
    pub open_now: usize,
    pub max_open: usize,
    pub calls: Vec<LedgerCall>,
    /// `(msp_id, channel, contract)` of every session opened.
    pub sessions: Vec<(String, String, String)>,
}

#[derive(Debug, Clone)]
enum Behaviour {
    Succeed,
    FailCalls(String),
    FailConnect(String),
}

/// Connector whose sessions record every call and return a canned result.
#[derive(Debug, Clone)]
pub struct RecordingConnector {
    log: Arc<Mutex<LedgerLog>>,
    result: Vec<u8>,
    behaviour: Behaviour,
    delay: Option<Duration>,
}

impl RecordingConnector {
    pub fn returning(result: impl Into<Vec<u8>>) -> Self {
        Self {
            log: Arc::default(),
            result: result.into(),
            behaviour: Behaviour::Succeed,
            delay: None,
        }
    }

    /// Sessions open, but every evaluate/submit fails.
    pub fn failing_calls(message: impl Into<String>) -> Self {
        Self {
            behaviour: Behaviour::FailCalls(message.into()),
            ..Self::returning(Vec::new())
        }
    }

    /// `connect` itself fails.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self {
            behaviour: Behaviour::FailConnect(message.into()),
            ..Self::returning(Vec::new())
        }
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn log(&self) -> LedgerLog {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl LedgerConnector for RecordingConnector {
    async fn connect(
        &self,
        request: SessionRequest<'_>,
    ) -> Result<Box<dyn LedgerSession>, FabricError> {
        if let Behaviour::FailConnect(message) = &self.behaviour {
            return Err(FabricError::Transport(message.clone()));
        }

        {
            let mut log = self.log.lock().unwrap();
            log.connects += 1;
            log.open_now += 1;
            log.max_open = log.max_open.max(log.open_now);
            log.sessions.push((
                request.identity.msp_id.clone(),
                request.channel.to_string(),
                request.contract.to_string(),
            ));
        }

        Ok(Box::new(RecordingSession {
            connector: self.clone(),
        }))
    }
}

struct RecordingSession {
    connector: RecordingConnector,
}

impl RecordingSession {
    async fn record(&self, call: LedgerCall) -> Result<(), FabricError> {
        self.connector.log.lock().unwrap().calls.push(call);
        if let Some(delay) = self.connector.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.connector.behaviour {
            Behaviour::FailCalls(message) => Err(FabricError::Endorsement(message.clone())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerSession for RecordingSession {
    async fn evaluate(&self, function: &str, args: &[String]) -> Result<Vec<u8>, FabricError> {
        self.record(LedgerCall::Evaluate {
            function: function.to_string(),
            args: args.to_vec(),
        })
        .await?;
        Ok(self.connector.result.clone())
    }

    async fn submit(&self, function: &str, args: &[String]) -> Result<SubmitReceipt, FabricError> {
        self.record(LedgerCall::Submit {
            function: function.to_string(),
            args: args.to_vec(),
        })
        .await?;
        Ok(SubmitReceipt {
            transaction_id: "tx-1".to_string(),
            block_number: 7,
        })
    }

    async fn close(self: Box<Self>) {
        let mut log = self.connector.log.lock().unwrap();
        log.closes += 1;
        log.open_now -= 1;
    }
}

#[derive(Debug, Clone, Default)]
pub struct CaLog {
    pub enrollments: Vec<String>,
    pub registrations: Vec<(String, String)>,
}

/// Certificate authority that issues fixed PEM credentials.
#[derive(Debug, Clone, Default)]
pub struct FakeCertificateAuthority {
    log: Arc<Mutex<CaLog>>,
    failure: Option<String>,
}

impl FakeCertificateAuthority {
    pub fn rejecting(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn log(&self) -> CaLog {
        self.log.lock().unwrap().clone()
    }
}

#[async_trait]
impl CertificateAuthority for FakeCertificateAuthority {
    async fn enroll(&self, request: &EnrollmentRequest) -> Result<Enrollment, FabricError> {
        self.log
            .lock()
            .unwrap()
            .enrollments
            .push(request.enrollment_id.clone());
        if let Some(message) = &self.failure {
            return Err(FabricError::Ca {
                code: 20,
                message: message.clone(),
            });
        }
        Ok(Enrollment {
            certificate: TEST_CERT.to_string(),
            private_key: TEST_KEY.to_string(),
        })
    }

    async fn register(
        &self,
        registrar: &X509Identity,
        request: &RegistrationRequest,
    ) -> Result<String, FabricError> {
        self.log.lock().unwrap().registrations.push((
            registrar.msp_id.clone(),
            request.enrollment_id.clone(),
        ));
        if let Some(message) = &self.failure {
            return Err(FabricError::Ca {
                code: 0,
                message: message.clone(),
            });
        }
        Ok(format!("{}-secret", request.enrollment_id))
    }
}
