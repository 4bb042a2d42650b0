//! Location resolution
//!
//! One attempt runs `Idle → Acquiring → ReverseGeocoding → Resolved`, or
//! stops at `Failed` when no position can be had. A geocoder failure never
//! fails the attempt; the record degrades to coordinates only.
//!
//! At most one attempt is in flight per resolver. Concurrent callers join it
//! and all receive the same outcome. The attempt runs on its own task, so a
//! caller that stops waiting does not cancel the underlying calls.

pub mod state;

use crate::config::Config;
use crate::eligibility::ServiceArea;
use crate::error::{ResolutionError, Result as CrateResult};
use crate::geo::http::HttpGeocoder;
use crate::geo::GeocodingGateway;
use crate::position::{DevicePosition, PositionOptions, PositionSource};
use crate::record::{LocationRecord, Resolution};
use crate::store::{LocationStore, PersistedLocationState};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn, Instrument};

pub use state::ResolverState;

/// Result of one resolution attempt
pub type Outcome = Result<Resolution, ResolutionError>;

/// Timeouts and hints for each attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverOptions {
    pub position: PositionOptions,
    /// Upper bound on the reverse-geocoding step
    pub geocode_timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            position: PositionOptions::default(),
            geocode_timeout: Duration::from_secs(crate::config::defaults::DEFAULT_GEOCODING_TIMEOUT_SECS),
        }
    }
}

impl From<&Config> for ResolverOptions {
    fn from(config: &Config) -> Self {
        Self {
            position: PositionOptions::from(&config.position),
            geocode_timeout: Duration::from_secs(config.geocoding.timeout_secs),
        }
    }
}

/// Orchestrates position, geocoding, eligibility and persistence
pub struct LocationResolver<P, G, S> {
    inner: Arc<Inner<P, G, S>>,
}

impl<P, G, S> Clone for LocationResolver<P, G, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

struct Inner<P, G, S> {
    position: P,
    geocoder: G,
    store: S,
    service_area: ServiceArea,
    options: ResolverOptions,
    state_tx: watch::Sender<ResolverState>,
    /// Receiver for the attempt currently running, if any
    in_flight: Mutex<Option<watch::Receiver<Option<Outcome>>>>,
    /// Mirror of what the store holds for this session
    session: Mutex<PersistedLocationState>,
}

impl<P, G, S> LocationResolver<P, G, S>
where
    P: PositionSource + 'static,
    G: GeocodingGateway + 'static,
    S: LocationStore + 'static,
{
    /// Create a resolver, seeding the last known location from `store`
    pub fn new(position: P, geocoder: G, store: S, service_area: ServiceArea, options: ResolverOptions) -> Self {
        let session = match store.load() {
            Ok(state) => state,
            Err(e) => {
                warn!("Could not load persisted location state: {}", e);
                PersistedLocationState::default()
            }
        };

        let (state_tx, _) = watch::channel(ResolverState::Idle);

        Self {
            inner: Arc::new(Inner {
                position,
                geocoder,
                store,
                service_area,
                options,
                state_tx,
                in_flight: Mutex::new(None),
                session: Mutex::new(session),
            }),
        }
    }

    /// Run a resolution attempt, or join the one already running
    pub async fn resolve(&self) -> Outcome {
        let mut rx = {
            let mut slot = self.inner.in_flight.lock().await;
            // A closed channel means the task died without clearing the slot
            match slot.as_ref().filter(|rx| rx.has_changed().is_ok()) {
                Some(rx) => {
                    debug!("Joining in-flight resolution attempt");
                    rx.clone()
                }
                None => {
                    let (tx, rx) = watch::channel(None);
                    *slot = Some(rx.clone());

                    let inner = Arc::clone(&self.inner);
                    let span = tracing::info_span!("resolve", attempt = %uuid::Uuid::new_v4());
                    tokio::spawn(
                        async move {
                            let outcome = inner.run_attempt().await;
                            inner.in_flight.lock().await.take();
                            let _ = tx.send(Some(outcome));
                        }
                        .instrument(span),
                    );
                    rx
                }
            }
        };

        let settled = match rx.wait_for(Option::is_some).await {
            Ok(value) => value.clone(),
            Err(_) => None,
        };

        settled.unwrap_or_else(|| {
            Err(ResolutionError::position_unavailable(
                "Resolution attempt ended without a result",
            ))
        })
    }

    /// Last resolved location, with a verdict against the current service area
    pub async fn last_known(&self) -> Option<Resolution> {
        let session = self.inner.session.lock().await;
        session
            .last_record
            .clone()
            .map(|record| Resolution::evaluate(record, &self.inner.service_area))
    }

    /// Remember that the user skipped location setup
    ///
    /// The last record is kept as-is.
    pub async fn skip_setup(&self) {
        let mut session = self.inner.session.lock().await;
        session.setup_skipped = true;
        info!("Location setup skipped");
        self.inner.persist(&session);
    }

    /// Whether the user skipped location setup
    pub async fn is_setup_skipped(&self) -> bool {
        self.inner.session.lock().await.setup_skipped
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<ResolverState> {
        self.inner.state_tx.subscribe()
    }

    /// Current state
    pub fn state(&self) -> ResolverState {
        self.inner.state_tx.borrow().clone()
    }

    /// Service area verdicts are computed against
    pub fn service_area(&self) -> &ServiceArea {
        &self.inner.service_area
    }
}

/// Resolver wired to real device and geocoder backends
pub type DeviceResolver<S> = LocationResolver<DevicePosition, HttpGeocoder, S>;

impl<S: LocationStore + 'static> DeviceResolver<S> {
    /// Build from config, with the given position source and store
    pub fn from_config(config: &Config, position: DevicePosition, store: S) -> CrateResult<Self> {
        let geocoder = HttpGeocoder::from_config(&config.geocoding)?;
        if !geocoder.is_configured() {
            warn!("No geocoding endpoint configured, locations will be coordinates only");
        }

        Ok(Self::new(
            position,
            geocoder,
            store,
            config.service_area.clone(),
            ResolverOptions::from(config),
        ))
    }
}

impl<P, G, S> Inner<P, G, S>
where
    P: PositionSource,
    G: GeocodingGateway,
    S: LocationStore,
{
    fn publish(&self, state: ResolverState) {
        debug!(state = state.name(), "Resolver transition");
        self.state_tx.send_replace(state);
    }

    async fn run_attempt(&self) -> Outcome {
        self.publish(ResolverState::Acquiring);

        let options = self.options.position;
        let acquired = tokio::time::timeout(options.timeout, self.position.get_current_position(options))
            .await
            .unwrap_or_else(|_| {
                Err(ResolutionError::timeout(format!(
                    "No position fix within {}ms",
                    options.timeout.as_millis()
                )))
            });

        let coordinate = match acquired {
            Ok(coordinate) => coordinate,
            Err(err) => {
                warn!("Position acquisition failed: {}", err);
                self.publish(ResolverState::Failed(err.clone()));
                return Err(err);
            }
        };

        self.publish(ResolverState::ReverseGeocoding);

        let geocoded = tokio::time::timeout(self.options.geocode_timeout, self.geocoder.reverse_geocode(coordinate))
            .await
            .unwrap_or_else(|_| {
                Err(ResolutionError::network(format!(
                    "Geocoder did not answer within {}ms",
                    self.options.geocode_timeout.as_millis()
                )))
            });

        let record = match geocoded {
            Ok(address) => LocationRecord::full(coordinate, address),
            Err(err) => {
                warn!("Reverse geocoding failed, using coordinates only: {}", err);
                LocationRecord::degraded(coordinate)
            }
        };

        let resolution = Resolution::evaluate(record, &self.service_area);
        info!(
            quality = %resolution.record.resolution_quality,
            within_service_area = resolution.verdict.within_service_area,
            "Resolved {}",
            resolution.record.formatted_address
        );

        self.publish(ResolverState::Resolved(resolution.clone()));

        let mut session = self.session.lock().await;
        session.last_record = Some(resolution.record.clone());
        self.persist(&session);

        Ok(resolution)
    }

    /// Best-effort write; failures are logged, never returned
    fn persist(&self, state: &PersistedLocationState) {
        if let Err(e) = self.store.save(state) {
            warn!("Could not persist location state: {}", e);
        }
    }
}
