//! Host platform geolocation abstraction.
//!
//! The acquirer never talks to a device directly. Hosts implement
//! [`GeolocationPlatform`] over whatever location service they have; tests
//! implement it with fakes.
//!
//! Callback-style platforms ("call one of these two functions later") can
//! use [`position_request`] to turn the pair of callbacks into the single
//! future the trait expects.

use futures::future::BoxFuture;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::geo::GeoPoint;

use super::types::{LocationOptions, PermissionState};

/// Failure reported by the platform's position request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Position request failed (code {code}): {message}")]
pub struct PlatformPositionError {
    /// Platform error code (1 = denied, 2 = unavailable, 3 = timeout).
    pub code: u16,
    /// Platform-provided detail, for logs only.
    pub message: String,
}

impl PlatformPositionError {
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Failure of the optional permission query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PermissionQueryError {
    /// The platform has no permission query capability.
    #[error("Permission query is not supported")]
    Unsupported,

    /// The query exists but failed.
    #[error("Permission query failed: {0}")]
    Failed(String),
}

/// Device location capability of the host platform.
///
/// Implementations must be `Send + Sync` so one platform can back several
/// acquirers across tasks.
pub trait GeolocationPlatform: Send + Sync {
    /// Whether any location capability exists.
    fn is_supported(&self) -> bool;

    /// Ask whether location permission is already decided.
    ///
    /// The default reports the query as unsupported.
    fn query_permission(&self) -> BoxFuture<'_, Result<PermissionState, PermissionQueryError>> {
        Box::pin(async { Err(PermissionQueryError::Unsupported) })
    }

    /// Issue one position request.
    ///
    /// The returned future resolves exactly once, with either a position or
    /// the platform's failure.
    fn current_position(
        &self,
        options: &LocationOptions,
    ) -> BoxFuture<'static, Result<GeoPoint, PlatformPositionError>>;
}

/// Error code used when a responder is dropped without answering.
pub const CODE_ABANDONED: u16 = 0;

/// Sending half of a callback-style position request.
///
/// Consuming either method answers the request, so at most one outcome can
/// ever be delivered. Dropping the responder resolves the request as an
/// unknown failure.
#[derive(Debug)]
pub struct PositionResponder {
    tx: oneshot::Sender<Result<GeoPoint, PlatformPositionError>>,
}

impl PositionResponder {
    /// Deliver a position.
    pub fn succeed(self, location: GeoPoint) {
        // Receiver gone means the request was abandoned; nothing to do
        let _ = self.tx.send(Ok(location));
    }

    /// Deliver a failure code.
    pub fn fail(self, code: u16, message: impl Into<String>) {
        let _ = self
            .tx
            .send(Err(PlatformPositionError::new(code, message)));
    }
}

/// Create a callback-style request: a responder for the platform side and
/// the future to return from [`GeolocationPlatform::current_position`].
pub fn position_request() -> (
    PositionResponder,
    BoxFuture<'static, Result<GeoPoint, PlatformPositionError>>,
) {
    let (tx, rx) = oneshot::channel();
    let future: BoxFuture<'static, _> = Box::pin(async move {
        rx.await.unwrap_or_else(|_| {
            Err(PlatformPositionError::new(
                CODE_ABANDONED,
                "position request dropped without a response",
            ))
        })
    });
    (PositionResponder { tx }, future)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_responder_success() {
        let (responder, future) = position_request();
        responder.succeed(GeoPoint::new(1.0, 2.0));
        assert_eq!(future.await, Ok(GeoPoint::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn test_responder_failure() {
        let (responder, future) = position_request();
        responder.fail(3, "took too long");
        let err = future.await.unwrap_err();
        assert_eq!(err.code, 3);
        assert_eq!(err.message, "took too long");
    }

    #[tokio::test]
    async fn test_dropped_responder_resolves_as_abandoned() {
        let (responder, future) = position_request();
        drop(responder);
        let err = future.await.unwrap_err();
        assert_eq!(err.code, CODE_ABANDONED);
    }

    #[test]
    fn test_answer_after_request_dropped_is_harmless() {
        let (responder, future) = position_request();
        drop(future);
        responder.succeed(GeoPoint::new(0.0, 0.0));
    }
}
