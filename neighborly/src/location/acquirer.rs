//! One-shot device location acquisition.
//!
//! # Protocol
//!
//! ```text
//! request_location
//!   ├─ no location capability ────────────────► Failed { Unsupported }
//!   ├─ permission query says denied ──────────► Failed { PermissionDenied }
//!   │  (query missing or failing: continue)
//!   └─ platform position request
//!        ├─ position ─────────────────────────► Succeeded { location }
//!        └─ failure code ─────────────────────► Failed { kind(code) }
//! ```
//!
//! The acquirer never retries. A caller seeing `Failed` decides whether to
//! ask again.
//!
//! # Teardown
//!
//! Platform requests cannot be cancelled. After [`LocationAcquirer::detach`]
//! a late answer is discarded without touching the state. Dropping the
//! future returned by `request_location` mid-flight returns the state to
//! `Idle` so the consumer is not stuck in `Detecting`.

use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::sync::watch;

use crate::geo::GeoPoint;

use super::platform::{GeolocationPlatform, PermissionQueryError};
use super::types::{DetectionState, LocationErrorKind, LocationOptions, PermissionState};

/// Why a `request_location` call did not yield a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AcquireError {
    /// Acquisition ran and failed; the state is now `Failed { kind }`.
    #[error(transparent)]
    Location(#[from] LocationErrorKind),

    /// A request is already in flight for this acquirer.
    #[error("A location request is already in progress")]
    InFlight,

    /// The acquirer was torn down.
    #[error("Location acquirer has been detached")]
    Detached,
}

#[derive(Debug)]
struct AcquirerInner {
    /// Incremented on every request start; identifies the live request.
    generation: u64,
    detached: bool,
}

/// Drives a [`DetectionState`] for one consumer.
///
/// # Example
///
/// ```ignore
/// let acquirer = LocationAcquirer::new(Arc::new(platform));
/// let mut states = acquirer.subscribe();
///
/// match acquirer.request_location(LocationOptions::default()).await {
///     Ok(location) => selector.set_detected_location(Some(location)),
///     Err(AcquireError::Location(kind)) => show_error(kind),
///     Err(_) => {}
/// }
/// ```
pub struct LocationAcquirer<P: ?Sized> {
    platform: Arc<P>,
    defaults: LocationOptions,
    inner: Mutex<AcquirerInner>,
    state_tx: watch::Sender<DetectionState>,
}

impl<P: ?Sized> std::fmt::Debug for LocationAcquirer<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationAcquirer")
            .field("defaults", &self.defaults)
            .field("inner", &self.inner)
            .field("state", &*self.state_tx.borrow())
            .finish_non_exhaustive()
    }
}

impl<P: GeolocationPlatform + ?Sized> LocationAcquirer<P> {
    /// Create an acquirer with default options.
    pub fn new(platform: Arc<P>) -> Self {
        Self::with_defaults(platform, LocationOptions::default())
    }

    /// Create an acquirer whose [`request`](Self::request) uses `defaults`.
    pub fn with_defaults(platform: Arc<P>, defaults: LocationOptions) -> Self {
        let (state_tx, _) = watch::channel(DetectionState::Idle);
        Self {
            platform,
            defaults,
            inner: Mutex::new(AcquirerInner {
                generation: 0,
                detached: false,
            }),
            state_tx,
        }
    }

    /// Current state.
    pub fn state(&self) -> DetectionState {
        *self.state_tx.borrow()
    }

    /// Receive every state change.
    pub fn subscribe(&self) -> watch::Receiver<DetectionState> {
        self.state_tx.subscribe()
    }

    /// Options used by [`request`](Self::request).
    pub fn default_options(&self) -> LocationOptions {
        self.defaults
    }

    /// Request a location with the default options.
    pub async fn request(&self) -> Result<GeoPoint, AcquireError> {
        self.request_location(self.defaults).await
    }

    /// Request the device location.
    ///
    /// Rejected with [`AcquireError::InFlight`] while another request is
    /// `Detecting`, and with [`AcquireError::Detached`] after teardown.
    pub async fn request_location(
        &self,
        options: LocationOptions,
    ) -> Result<GeoPoint, AcquireError> {
        let mut guard = self.begin()?;

        let outcome = self.acquire(&options).await;

        guard.completed = true;
        self.finish(guard.generation, outcome)
    }

    /// Return to `Idle`, discarding the last result.
    ///
    /// Returns false (and does nothing) while a request is in flight or
    /// after detach.
    pub fn reset(&self) -> bool {
        let inner = self.inner.lock();
        if inner.detached || self.state().is_detecting() {
            return false;
        }
        self.state_tx.send_replace(DetectionState::Idle);
        true
    }

    /// Tear down: no further state changes, including from a request that
    /// is still waiting on the platform.
    pub fn detach(&self) {
        let mut inner = self.inner.lock();
        if !inner.detached {
            inner.detached = true;
            tracing::debug!(generation = inner.generation, "Location acquirer detached");
        }
    }

    pub fn is_detached(&self) -> bool {
        self.inner.lock().detached
    }

    fn begin(&self) -> Result<InFlightGuard<'_, P>, AcquireError> {
        let mut inner = self.inner.lock();
        if inner.detached {
            return Err(AcquireError::Detached);
        }
        if self.state().is_detecting() {
            tracing::debug!("Location request ignored, one is already in flight");
            return Err(AcquireError::InFlight);
        }

        inner.generation += 1;
        self.state_tx.send_replace(DetectionState::Detecting);
        tracing::debug!(generation = inner.generation, "Location detection started");

        Ok(InFlightGuard {
            acquirer: self,
            generation: inner.generation,
            completed: false,
        })
    }

    async fn acquire(&self, options: &LocationOptions) -> Result<GeoPoint, LocationErrorKind> {
        if !self.platform.is_supported() {
            return Err(LocationErrorKind::Unsupported);
        }

        match self.platform.query_permission().await {
            Ok(PermissionState::Denied) => {
                // Known denial: skip the position request
                return Err(LocationErrorKind::PermissionDenied);
            }
            Ok(state) => {
                tracing::debug!(permission = ?state, "Location permission state");
            }
            Err(PermissionQueryError::Unsupported) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Permission query failed, requesting position anyway");
            }
        }

        tracing::debug!(
            high_accuracy = options.high_accuracy,
            timeout_ms = options.timeout_ms,
            max_cache_age_ms = options.max_cache_age_ms,
            "Requesting device position"
        );

        self.platform
            .current_position(options)
            .await
            .map_err(|e| {
                tracing::debug!(code = e.code, detail = %e.message, "Platform position error");
                LocationErrorKind::from_platform_code(e.code)
            })
    }

    fn finish(
        &self,
        generation: u64,
        outcome: Result<GeoPoint, LocationErrorKind>,
    ) -> Result<GeoPoint, AcquireError> {
        let inner = self.inner.lock();
        if inner.detached || inner.generation != generation {
            tracing::debug!(generation, "Discarding location result after teardown");
            return Err(AcquireError::Detached);
        }

        match outcome {
            Ok(location) => {
                tracing::info!(lat = location.lat, lng = location.lng, "Location detected");
                self.state_tx
                    .send_replace(DetectionState::Succeeded { location });
                Ok(location)
            }
            Err(error_kind) => {
                tracing::warn!(kind = error_kind.as_str(), "Location detection failed");
                self.state_tx
                    .send_replace(DetectionState::Failed { error_kind });
                Err(AcquireError::Location(error_kind))
            }
        }
    }

    /// Called when a request future is dropped before finishing.
    fn abandon(&self, generation: u64) {
        let inner = self.inner.lock();
        if inner.detached || inner.generation != generation {
            return;
        }
        if self.state().is_detecting() {
            tracing::debug!(generation, "Location request abandoned");
            self.state_tx.send_replace(DetectionState::Idle);
        }
    }
}

/// Returns the state to `Idle` if a request future is dropped mid-flight.
struct InFlightGuard<'a, P: GeolocationPlatform + ?Sized> {
    acquirer: &'a LocationAcquirer<P>,
    generation: u64,
    completed: bool,
}

impl<P: GeolocationPlatform + ?Sized> Drop for InFlightGuard<'_, P> {
    fn drop(&mut self) {
        if !self.completed {
            self.acquirer.abandon(self.generation);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::platform::{position_request, PlatformPositionError, PositionResponder};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Platform whose answers are fixed up front.
    struct FakePlatform {
        supported: bool,
        permission: Result<PermissionState, PermissionQueryError>,
        position: Result<GeoPoint, PlatformPositionError>,
        position_calls: AtomicUsize,
        last_options: Mutex<Option<LocationOptions>>,
    }

    impl FakePlatform {
        fn answering(position: Result<GeoPoint, PlatformPositionError>) -> Self {
            Self {
                supported: true,
                permission: Err(PermissionQueryError::Unsupported),
                position,
                position_calls: AtomicUsize::new(0),
                last_options: Mutex::new(None),
            }
        }

        fn with_permission(
            mut self,
            permission: Result<PermissionState, PermissionQueryError>,
        ) -> Self {
            self.permission = permission;
            self
        }

        fn calls(&self) -> usize {
            self.position_calls.load(Ordering::SeqCst)
        }
    }

    impl GeolocationPlatform for FakePlatform {
        fn is_supported(&self) -> bool {
            self.supported
        }

        fn query_permission(
            &self,
        ) -> BoxFuture<'_, Result<PermissionState, PermissionQueryError>> {
            let answer = self.permission.clone();
            Box::pin(async move { answer })
        }

        fn current_position(
            &self,
            options: &LocationOptions,
        ) -> BoxFuture<'static, Result<GeoPoint, PlatformPositionError>> {
            self.position_calls.fetch_add(1, Ordering::SeqCst);
            *self.last_options.lock() = Some(*options);
            let answer = self.position.clone();
            Box::pin(async move { answer })
        }
    }

    /// Platform that parks each request until the test answers it.
    #[derive(Default)]
    struct ManualPlatform {
        pending: Mutex<Vec<PositionResponder>>,
    }

    impl ManualPlatform {
        fn take_responder(&self) -> PositionResponder {
            self.pending.lock().remove(0)
        }
    }

    impl GeolocationPlatform for ManualPlatform {
        fn is_supported(&self) -> bool {
            true
        }

        fn current_position(
            &self,
            _options: &LocationOptions,
        ) -> BoxFuture<'static, Result<GeoPoint, PlatformPositionError>> {
            let (responder, future) = position_request();
            self.pending.lock().push(responder);
            future
        }
    }

    const SEOUL: GeoPoint = GeoPoint::new(37.5665, 126.9780);

    async fn wait_until_detecting<P: GeolocationPlatform + ?Sized>(acquirer: &LocationAcquirer<P>) {
        let mut rx = acquirer.subscribe();
        rx.wait_for(|s| s.is_detecting()).await.unwrap();
    }

    #[tokio::test]
    async fn test_success_transitions_to_succeeded() {
        let platform = Arc::new(FakePlatform::answering(Ok(SEOUL)));
        let acquirer = LocationAcquirer::new(Arc::clone(&platform));

        assert_eq!(acquirer.state(), DetectionState::Idle);
        let result = acquirer.request_location(LocationOptions::default()).await;

        assert_eq!(result, Ok(SEOUL));
        assert_eq!(acquirer.state(), DetectionState::Succeeded { location: SEOUL });
        assert_eq!(platform.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_platform_fails_immediately() {
        let mut fake = FakePlatform::answering(Ok(SEOUL));
        fake.supported = false;
        let platform = Arc::new(fake);
        let acquirer = LocationAcquirer::new(Arc::clone(&platform));

        let result = acquirer.request().await;

        assert_eq!(
            result,
            Err(AcquireError::Location(LocationErrorKind::Unsupported))
        );
        assert_eq!(
            acquirer.state().error_kind(),
            Some(LocationErrorKind::Unsupported)
        );
        assert_eq!(platform.calls(), 0);
    }

    #[tokio::test]
    async fn test_denied_permission_skips_position_request() {
        let platform = Arc::new(
            FakePlatform::answering(Ok(SEOUL)).with_permission(Ok(PermissionState::Denied)),
        );
        let acquirer = LocationAcquirer::new(Arc::clone(&platform));

        let result = acquirer.request().await;

        assert_eq!(
            result,
            Err(AcquireError::Location(LocationErrorKind::PermissionDenied))
        );
        assert_eq!(
            acquirer.state(),
            DetectionState::Failed {
                error_kind: LocationErrorKind::PermissionDenied
            }
        );
        assert_eq!(platform.calls(), 0, "Position must not be requested");
    }

    #[tokio::test]
    async fn test_failed_permission_query_still_requests_position() {
        let platform = Arc::new(
            FakePlatform::answering(Ok(SEOUL))
                .with_permission(Err(PermissionQueryError::Failed("boom".into()))),
        );
        let acquirer = LocationAcquirer::new(Arc::clone(&platform));

        assert_eq!(acquirer.request().await, Ok(SEOUL));
        assert_eq!(platform.calls(), 1);
    }

    #[tokio::test]
    async fn test_prompt_and_granted_proceed() {
        for permission in [PermissionState::Prompt, PermissionState::Granted] {
            let platform =
                Arc::new(FakePlatform::answering(Ok(SEOUL)).with_permission(Ok(permission)));
            let acquirer = LocationAcquirer::new(Arc::clone(&platform));

            assert_eq!(acquirer.request().await, Ok(SEOUL));
            assert_eq!(platform.calls(), 1);
        }
    }

    #[tokio::test]
    async fn test_platform_failure_codes_map_to_kinds() {
        let cases = [
            (1, LocationErrorKind::PermissionDenied),
            (2, LocationErrorKind::PositionUnavailable),
            (3, LocationErrorKind::Timeout),
            (99, LocationErrorKind::Unknown),
        ];

        for (code, expected) in cases {
            let platform = Arc::new(FakePlatform::answering(Err(PlatformPositionError::new(
                code, "failed",
            ))));
            let acquirer = LocationAcquirer::new(platform);

            assert_eq!(
                acquirer.request().await,
                Err(AcquireError::Location(expected))
            );
            assert_eq!(acquirer.state().error_kind(), Some(expected));
        }
    }

    #[tokio::test]
    async fn test_options_passed_to_platform() {
        let platform = Arc::new(FakePlatform::answering(Ok(SEOUL)));
        let options = LocationOptions::default()
            .with_high_accuracy(false)
            .with_timeout_ms(2500);
        let acquirer = LocationAcquirer::with_defaults(Arc::clone(&platform), options);

        acquirer.request().await.unwrap();

        assert_eq!(*platform.last_options.lock(), Some(options));
    }

    #[tokio::test]
    async fn test_concurrent_request_rejected_while_detecting() {
        let platform = Arc::new(ManualPlatform::default());
        let acquirer = Arc::new(LocationAcquirer::new(Arc::clone(&platform)));

        let first = {
            let acquirer = Arc::clone(&acquirer);
            tokio::spawn(async move { acquirer.request().await })
        };
        wait_until_detecting(&acquirer).await;

        assert_eq!(acquirer.request().await, Err(AcquireError::InFlight));
        assert_eq!(platform.pending.lock().len(), 1, "No duplicate request");

        platform.take_responder().succeed(SEOUL);
        assert_eq!(first.await.unwrap(), Ok(SEOUL));
        assert_eq!(acquirer.state().location(), Some(SEOUL));
    }

    #[tokio::test]
    async fn test_new_request_allowed_after_failure() {
        let platform = Arc::new(ManualPlatform::default());
        let acquirer = Arc::new(LocationAcquirer::new(Arc::clone(&platform)));

        let first = {
            let acquirer = Arc::clone(&acquirer);
            tokio::spawn(async move { acquirer.request().await })
        };
        wait_until_detecting(&acquirer).await;
        platform.take_responder().fail(3, "timeout");
        assert_eq!(
            first.await.unwrap(),
            Err(AcquireError::Location(LocationErrorKind::Timeout))
        );

        let second = {
            let acquirer = Arc::clone(&acquirer);
            tokio::spawn(async move { acquirer.request().await })
        };
        wait_until_detecting(&acquirer).await;
        platform.take_responder().succeed(SEOUL);
        assert_eq!(second.await.unwrap(), Ok(SEOUL));
    }

    #[tokio::test]
    async fn test_late_result_after_detach_is_ignored() {
        let platform = Arc::new(ManualPlatform::default());
        let acquirer = Arc::new(LocationAcquirer::new(Arc::clone(&platform)));

        let pending = {
            let acquirer = Arc::clone(&acquirer);
            tokio::spawn(async move { acquirer.request().await })
        };
        wait_until_detecting(&acquirer).await;

        acquirer.detach();
        platform.take_responder().succeed(SEOUL);

        assert_eq!(pending.await.unwrap(), Err(AcquireError::Detached));
        assert_eq!(acquirer.state(), DetectionState::Detecting);
        assert_eq!(acquirer.request().await, Err(AcquireError::Detached));
        assert!(!acquirer.reset());
    }

    #[tokio::test]
    async fn test_dropped_request_returns_to_idle() {
        let platform = Arc::new(ManualPlatform::default());
        let acquirer = Arc::new(LocationAcquirer::new(Arc::clone(&platform)));

        let pending = {
            let acquirer = Arc::clone(&acquirer);
            tokio::spawn(async move { acquirer.request().await })
        };
        wait_until_detecting(&acquirer).await;

        pending.abort();
        let _ = pending.await;

        assert_eq!(acquirer.state(), DetectionState::Idle);
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle() {
        let platform = Arc::new(FakePlatform::answering(Ok(SEOUL)));
        let acquirer = LocationAcquirer::new(platform);

        acquirer.request().await.unwrap();
        assert!(acquirer.reset());
        assert_eq!(acquirer.state(), DetectionState::Idle);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let platform = Arc::new(FakePlatform::answering(Ok(SEOUL)));
        let acquirer = LocationAcquirer::new(platform);
        let rx = acquirer.subscribe();

        acquirer.request().await.unwrap();

        assert_eq!(*rx.borrow(), DetectionState::Succeeded { location: SEOUL });
    }
}
