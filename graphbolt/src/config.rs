// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection configuration and credential hooks
//!
//! The engine consumes this configuration at connect time. TLS, socket and
//! rendering plumbing belong to the engine itself; what lives here is the
//! identity/trust surface the client owns, including the two callback hooks:
//! a password supplier and an unverified-host decision.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Supplies a credential string when the engine needs one mid-handshake
pub type PasswordCallback = Arc<dyn Fn() -> String + Send + Sync>;

/// Decides what to do with a host whose identity could not be verified.
/// Arguments are the host and its reported fingerprint.
pub type UnverifiedHostCallback = Arc<dyn Fn(&str, &str) -> HostVerification + Send + Sync>;

/// Decision for an unverified host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostVerification {
    /// Abort the connection
    Reject,
    /// Accept for this session only
    AcceptOnce,
    /// Accept and record the host as trusted
    Trust,
}

/// Flags applied when connecting by URI
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Allow an unencrypted channel
    pub insecure: bool,
    /// Ignore credentials embedded in the URI
    pub no_uri_credentials: bool,
    /// Ignore only the password embedded in the URI
    pub no_uri_password: bool,
}

impl ConnectOptions {
    pub fn insecure() -> Self {
        Self {
            insecure: true,
            ..Self::default()
        }
    }
}

/// Connection configuration bundle
#[derive(Clone, Default)]
pub struct Config {
    client_id: Option<String>,
    username: Option<String>,
    password: Option<String>,
    known_hosts_file: Option<PathBuf>,
    trust_known_hosts: bool,
    max_pipelined_requests: Option<usize>,
    tls_ca_file: Option<PathBuf>,
    tls_ca_dir: Option<PathBuf>,
    password_callback: Option<PasswordCallback>,
    unverified_host_callback: Option<UnverifiedHostCallback>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client_id(mut self, id: impl Into<String>) -> Self {
        self.client_id = Some(id.into());
        self
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_known_hosts_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.known_hosts_file = Some(file.into());
        self
    }

    pub fn with_trust_known_hosts(mut self, trust: bool) -> Self {
        self.trust_known_hosts = trust;
        self
    }

    pub fn with_max_pipelined_requests(mut self, n: usize) -> Self {
        self.max_pipelined_requests = Some(n);
        self
    }

    pub fn with_tls_ca_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.tls_ca_file = Some(file.into());
        self
    }

    pub fn with_tls_ca_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.tls_ca_dir = Some(dir.into());
        self
    }

    /// Install a credential supplier invoked synchronously by the engine
    /// when a password is needed and none was configured
    pub fn with_password_callback(
        mut self,
        callback: impl Fn() -> String + Send + Sync + 'static,
    ) -> Self {
        self.password_callback = Some(Arc::new(callback));
        self
    }

    /// Install the decision hook for hosts that fail verification
    pub fn with_unverified_host_callback(
        mut self,
        callback: impl Fn(&str, &str) -> HostVerification + Send + Sync + 'static,
    ) -> Self {
        self.unverified_host_callback = Some(Arc::new(callback));
        self
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn known_hosts_file(&self) -> Option<&Path> {
        self.known_hosts_file.as_deref()
    }

    pub fn trust_known_hosts(&self) -> bool {
        self.trust_known_hosts
    }

    /// Pipelining window; engines fall back to their own default when unset
    pub fn max_pipelined_requests(&self) -> Option<usize> {
        self.max_pipelined_requests
    }

    pub fn tls_ca_file(&self) -> Option<&Path> {
        self.tls_ca_file.as_deref()
    }

    pub fn tls_ca_dir(&self) -> Option<&Path> {
        self.tls_ca_dir.as_deref()
    }

    /// Resolve the password: the configured literal wins, otherwise the
    /// callback is consulted
    pub fn resolve_password(&self) -> Option<String> {
        if self.password.is_some() {
            return self.password.clone();
        }
        self.password_callback.as_ref().map(|callback| callback())
    }

    /// Decide what to do with an unverified host. Without a hook installed
    /// the host is rejected.
    pub fn verify_host(&self, host: &str, fingerprint: &str) -> HostVerification {
        match &self.unverified_host_callback {
            Some(callback) => callback(host, fingerprint),
            None => HostVerification::Reject,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("client_id", &self.client_id)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<set>"))
            .field("known_hosts_file", &self.known_hosts_file)
            .field("trust_known_hosts", &self.trust_known_hosts)
            .field("max_pipelined_requests", &self.max_pipelined_requests)
            .field("tls_ca_file", &self.tls_ca_file)
            .field("tls_ca_dir", &self.tls_ca_dir)
            .field("password_callback", &self.password_callback.is_some())
            .field(
                "unverified_host_callback",
                &self.unverified_host_callback.is_some(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_round_trip() {
        let config = Config::new()
            .with_client_id("app/1.0")
            .with_username("neo")
            .with_trust_known_hosts(true)
            .with_max_pipelined_requests(4);
        assert_eq!(config.client_id(), Some("app/1.0"));
        assert_eq!(config.username(), Some("neo"));
        assert!(config.trust_known_hosts());
        assert_eq!(config.max_pipelined_requests(), Some(4));
    }

    #[test]
    fn test_password_literal_wins_over_callback() {
        let config = Config::new()
            .with_password("literal")
            .with_password_callback(|| "from-callback".to_string());
        assert_eq!(config.resolve_password().as_deref(), Some("literal"));

        let callback_only = Config::new().with_password_callback(|| "from-callback".to_string());
        assert_eq!(
            callback_only.resolve_password().as_deref(),
            Some("from-callback")
        );
    }

    #[test]
    fn test_unverified_host_defaults_to_reject() {
        let config = Config::new();
        assert_eq!(
            config.verify_host("example.com", "ab:cd"),
            HostVerification::Reject
        );

        let trusting =
            Config::new().with_unverified_host_callback(|_, _| HostVerification::AcceptOnce);
        assert_eq!(
            trusting.verify_host("example.com", "ab:cd"),
            HostVerification::AcceptOnce
        );
    }
}
