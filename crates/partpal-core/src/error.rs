// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the partpal assistant.

use std::time::Duration;

use thiserror::Error;

use crate::types::Service;

/// The primary error type used across adapter traits, the transcript and the
/// turn producer.
#[derive(Debug, Error)]
pub enum PartpalError {
    /// Configuration errors (missing credential, invalid header value).
    #[error("configuration error: {0}")]
    Config(String),

    /// An external collaborator failed (network, auth, quota, malformed reply).
    #[error("{service} error: {message}")]
    Upstream {
        service: Service,
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An external collaborator did not answer within the per-call bound.
    #[error("{service} timed out after {duration:?}")]
    Timeout { service: Service, duration: Duration },

    /// Attempted append of a turn with no user text, no assistant payload
    /// and no audio.
    #[error("invalid turn: a turn must carry user text, an assistant payload or audio")]
    InvalidTurn,

    /// Input media the collaborators cannot accept.
    #[error("unsupported media: {0}")]
    UnsupportedMedia(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl PartpalError {
    /// Builds an [`PartpalError::Upstream`] without an underlying source.
    pub fn upstream(service: Service, message: impl Into<String>) -> Self {
        PartpalError::Upstream {
            service,
            message: message.into(),
            source: None,
        }
    }

    /// Builds an [`PartpalError::Upstream`] from a transport error.
    ///
    /// The request URL is dropped from `reqwest`-style errors by callers
    /// before they get here; this only formats and boxes.
    pub fn upstream_with_source<E>(service: Service, context: &str, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        PartpalError::Upstream {
            service,
            message: format!("{context}: {err}"),
            source: Some(Box::new(err)),
        }
    }

    /// True for failures of an external collaborator, including timeouts.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            PartpalError::Upstream { .. } | PartpalError::Timeout { .. }
        )
    }

    /// The collaborator involved, if this is an upstream failure.
    pub fn service(&self) -> Option<Service> {
        match self {
            PartpalError::Upstream { service, .. } | PartpalError::Timeout { service, .. } => {
                Some(*service)
            }
            _ => None,
        }
    }

    /// Short human-readable cause suitable for embedding in a transcript turn.
    ///
    /// Upstream errors drop the service prefix since the surrounding turn
    /// text already names the action that failed.
    pub fn cause(&self) -> String {
        match self {
            PartpalError::Upstream { message, .. } => message.clone(),
            PartpalError::Timeout { duration, .. } => {
                format!("no response within {}s", duration.as_secs())
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display_names_service() {
        let err = PartpalError::upstream(Service::Catalog, "API returned 500");
        assert_eq!(err.to_string(), "catalog error: API returned 500");
        assert_eq!(err.cause(), "API returned 500");
    }

    #[test]
    fn timeout_is_upstream() {
        let err = PartpalError::Timeout {
            service: Service::Speech,
            duration: Duration::from_secs(20),
        };
        assert!(err.is_upstream());
        assert_eq!(err.service(), Some(Service::Speech));
        assert_eq!(err.cause(), "no response within 20s");
        assert_eq!(err.to_string(), "speech timed out after 20s");
    }

    #[test]
    fn invalid_turn_is_not_upstream() {
        let err = PartpalError::InvalidTurn;
        assert!(!err.is_upstream());
        assert!(err.service().is_none());
    }

    #[test]
    fn upstream_with_source_keeps_source() {
        let io = std::io::Error::other("connection reset");
        let err = PartpalError::upstream_with_source(Service::Generation, "HTTP request failed", io);
        assert_eq!(err.cause(), "HTTP request failed: connection reset");
        match err {
            PartpalError::Upstream { source, .. } => assert!(source.is_some()),
            other => panic!("expected Upstream, got {other:?}"),
        }
    }
}
