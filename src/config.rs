// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Command line arguments for the three binaries. Every option has a default
//! and can also be set through the environment (or a `.env` file), so the
//! tools run without arguments against the Fabric test network.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `CONNECTION_PROFILE` | Fabric connection profile (JSON), relative to the working directory | `../test-network/.../connection-org1.json` |
//! | `WALLET_DIR` | Directory holding `<principal>.id` files | `wallet` |
//! | `CA_NAME` | Certificate authority entry in the profile | `ca.org1.example.com` |
//! | `MSP_ID` | Membership service provider of enrolled identities | `Org1MSP` |
//! | `ADMIN_ID` | Administrative principal | `admin` |
//! | `ADMIN_SECRET` | Enrollment secret of the admin | `adminpw` |
//! | `APP_USER_ID` | Principal the gateway acts as | `appUser` |
//! | `APP_USER_AFFILIATION` | Affiliation used when registering the app user | `org1.department1` |
//! | `CHANNEL_NAME` | Channel the contract is deployed to | `carchannel` |
//! | `CONTRACT_NAME` | Chaincode name | `carApp` |
//! | `DISCOVERY_ENABLED` | Let the gateway pick endorsers across orgs | `true` |
//! | `DISCOVERY_AS_LOCALHOST` | Rewrite peer hosts to `localhost` | `true` |
//! | `LEDGER_TIMEOUT_SECS` | Per-call deadline for ledger operations, at least 1 | `30` |
//! | `HOST` | Server bind address | `127.0.0.1` |
//! | `PORT` | Server bind port | `8080` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{net::SocketAddr, path::PathBuf, time::Duration};

use clap::{Args, Parser, ValueEnum};

use crate::fabric::DiscoveryOptions;

/// Default location of the test-network connection profile for Org1.
pub const DEFAULT_CONNECTION_PROFILE: &str =
    "../test-network/organizations/peerOrganizations/org1.example.com/connection-org1.json";

/// Default wallet directory, relative to the working directory.
pub const DEFAULT_WALLET_DIR: &str = "wallet";

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings shared by every binary: where the network description and the
/// wallet live, and which organisation identities belong to.
#[derive(Args, Debug, Clone)]
pub struct NetworkArgs {
    /// Path to the Fabric connection profile
    #[arg(long, env = "CONNECTION_PROFILE", default_value = DEFAULT_CONNECTION_PROFILE)]
    pub connection_profile: PathBuf,

    /// Directory of the file-system wallet
    #[arg(long, env = "WALLET_DIR", default_value = DEFAULT_WALLET_DIR)]
    pub wallet_dir: PathBuf,

    /// Name of the certificate authority entry in the connection profile
    #[arg(long, env = "CA_NAME", default_value = "ca.org1.example.com")]
    pub ca_name: String,

    /// MSP identifier recorded in enrolled identities
    #[arg(long, env = "MSP_ID", default_value = "Org1MSP")]
    pub msp_id: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

/// Arguments of the `enroll-admin` tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "enroll-admin")]
#[command(about = "Enroll the CA administrator and store it in the wallet")]
pub struct EnrollArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Administrative principal to enroll
    #[arg(long, env = "ADMIN_ID", default_value = "admin")]
    pub admin_id: String,

    /// Enrollment secret of the administrative principal
    #[arg(long, env = "ADMIN_SECRET", default_value = "adminpw", hide_env_values = true)]
    pub admin_secret: String,
}

/// Arguments of the `register-user` tool.
#[derive(Parser, Debug, Clone)]
#[command(name = "register-user")]
#[command(about = "Register and enroll the application user using the admin identity")]
pub struct RegisterArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Wallet label of the registrar (must already be enrolled)
    #[arg(long, env = "ADMIN_ID", default_value = "admin")]
    pub admin_id: String,

    /// Application principal to register
    #[arg(long, env = "APP_USER_ID", default_value = "appUser")]
    pub app_user: String,

    /// Affiliation of the application principal
    #[arg(long, env = "APP_USER_AFFILIATION", default_value = "org1.department1")]
    pub affiliation: String,
}

/// Arguments of the `car-gateway` HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "car-gateway")]
#[command(about = "HTTP gateway for the carApp chaincode")]
pub struct GatewayArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Address to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Wallet label of the identity used for transactions
    #[arg(long, env = "APP_USER_ID", default_value = "appUser")]
    pub app_user: String,

    /// Channel the contract is deployed to
    #[arg(long, env = "CHANNEL_NAME", default_value = "carchannel")]
    pub channel: String,

    /// Chaincode name
    #[arg(long, env = "CONTRACT_NAME", default_value = "carApp")]
    pub contract: String,

    /// Allow endorsement by any organisation the gateway discovers
    #[arg(long, env = "DISCOVERY_ENABLED", default_value_t = true, action = clap::ArgAction::Set)]
    pub discovery_enabled: bool,

    /// Rewrite peer host names to localhost (docker test networks)
    #[arg(long, env = "DISCOVERY_AS_LOCALHOST", default_value_t = true, action = clap::ArgAction::Set)]
    pub discovery_as_localhost: bool,

    /// Deadline for a single ledger operation, in seconds
    #[arg(
        long,
        env = "LEDGER_TIMEOUT_SECS",
        default_value_t = 30,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub ledger_timeout_secs: u64,
}

impl GatewayArgs {
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }

    /// Split the arguments into the per-request settings handlers need.
    pub fn settings(&self) -> GatewaySettings {
        GatewaySettings {
            connection_profile: self.network.connection_profile.clone(),
            wallet_dir: self.network.wallet_dir.clone(),
            app_user: self.app_user.clone(),
            channel: self.channel.clone(),
            contract: self.contract.clone(),
            discovery: DiscoveryOptions {
                enabled: self.discovery_enabled,
                as_localhost: self.discovery_as_localhost,
            },
        }
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }
}

/// Values every request needs to resolve its identity and open a session.
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub connection_profile: PathBuf,
    pub wallet_dir: PathBuf,
    pub app_user: String,
    pub channel: String,
    pub contract: String,
    pub discovery: DiscoveryOptions,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Command, CommandFactory};

    /// Declared default of `id`, read from the command definition so that
    /// variables set in the test environment cannot mask it.
    fn default_of(command: &Command, id: &str) -> String {
        let arg = command
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .unwrap_or_else(|| panic!("no argument {id}"));
        let values: Vec<_> = arg
            .get_default_values()
            .iter()
            .map(|v| v.to_string_lossy().into_owned())
            .collect();
        values.join(",")
    }

    #[test]
    fn gateway_defaults_match_test_network() {
        let command = GatewayArgs::command();

        assert_eq!(default_of(&command, "app_user"), "appUser");
        assert_eq!(default_of(&command, "channel"), "carchannel");
        assert_eq!(default_of(&command, "contract"), "carApp");
        assert_eq!(default_of(&command, "wallet_dir"), DEFAULT_WALLET_DIR);
        assert_eq!(
            default_of(&command, "connection_profile"),
            DEFAULT_CONNECTION_PROFILE
        );
        assert_eq!(default_of(&command, "discovery_enabled"), "true");
        assert_eq!(default_of(&command, "discovery_as_localhost"), "true");
        assert_eq!(default_of(&command, "host"), "127.0.0.1");
        assert_eq!(default_of(&command, "port"), "8080");
        assert_eq!(default_of(&command, "ledger_timeout_secs"), "30");
    }

    #[test]
    fn gateway_arguments_read_documented_variables() {
        let command = GatewayArgs::command();
        let env_of = |id: &str| {
            command
                .get_arguments()
                .find(|arg| arg.get_id() == id)
                .and_then(|arg| arg.get_env())
                .map(|env| env.to_string_lossy().into_owned())
        };

        assert_eq!(env_of("connection_profile").as_deref(), Some("CONNECTION_PROFILE"));
        assert_eq!(env_of("wallet_dir").as_deref(), Some("WALLET_DIR"));
        assert_eq!(env_of("ledger_timeout_secs").as_deref(), Some("LEDGER_TIMEOUT_SECS"));
    }

    #[test]
    fn bind_address_and_timeout_follow_flags() {
        let args = GatewayArgs::try_parse_from([
            "car-gateway",
            "--host",
            "0.0.0.0",
            "--port",
            "3000",
            "--ledger-timeout-secs",
            "5",
        ])
        .unwrap();

        assert_eq!(args.bind_addr().unwrap(), "0.0.0.0:3000".parse().unwrap());
        assert_eq!(args.ledger_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn zero_ledger_timeout_is_rejected() {
        let err = GatewayArgs::try_parse_from(["car-gateway", "--ledger-timeout-secs", "0"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn gateway_flags_override_defaults() {
        let args = GatewayArgs::try_parse_from([
            "car-gateway",
            "--channel",
            "mychannel",
            "--discovery-as-localhost",
            "false",
            "--port",
            "9000",
        ])
        .unwrap();

        let settings = args.settings();
        assert_eq!(settings.channel, "mychannel");
        assert!(!settings.discovery.as_localhost);
        assert!(settings.discovery.enabled);
        assert_eq!(args.port, 9000);
    }

    #[test]
    fn enroll_defaults_use_admin_principal() {
        let command = EnrollArgs::command();
        assert_eq!(default_of(&command, "admin_id"), "admin");
        assert_eq!(default_of(&command, "admin_secret"), "adminpw");
        assert_eq!(default_of(&command, "ca_name"), "ca.org1.example.com");
        assert_eq!(default_of(&command, "msp_id"), "Org1MSP");
        assert_eq!(default_of(&command, "log_format"), "pretty");
    }

    #[test]
    fn register_defaults_target_app_user() {
        let command = RegisterArgs::command();
        assert_eq!(default_of(&command, "app_user"), "appUser");
        assert_eq!(default_of(&command, "affiliation"), "org1.department1");
        assert_eq!(default_of(&command, "admin_id"), "admin");
    }
}
