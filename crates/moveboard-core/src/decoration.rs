//! Decorative background images for rectangles.
//!
//! Each new rectangle may get a random photo as its background. The lookup
//! runs on a background thread; results are queued and only applied when the
//! host polls on its own event thread. Removing a rectangle cancels its
//! lookup, and a result for a cancelled lookup is dropped on the floor.

use crate::shapes::RectId;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, channel};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default photo catalog.
pub const DEFAULT_PHOTO_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/photos";

/// Decoration lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecorationError {
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("Photo catalog is empty")]
    EmptyCatalog,
}

/// Source of decorative image URLs.
pub trait PhotoSource: Send + Sync {
    /// Pick one image URL. May block.
    fn random_photo_url(&self) -> Result<String, DecorationError>;
}

/// Outcome of a lookup, delivered by [`DecorationManager::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecorationEvent {
    Loaded { id: RectId, url: String },
    Failed { id: RectId, error: DecorationError },
}

type Outcome = (RectId, Result<String, DecorationError>);

/// Runs one lookup per rectangle, bound to the rectangle's lifetime.
pub struct DecorationManager {
    source: Option<Arc<dyn PhotoSource>>,
    /// Cancellation flags of lookups still in flight.
    pending: HashMap<RectId, Arc<AtomicBool>>,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl Default for DecorationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DecorationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecorationManager")
            .field("enabled", &self.source.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl DecorationManager {
    /// Create a manager with no photo source; requests are ignored.
    pub fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            source: None,
            pending: HashMap::new(),
            tx,
            rx,
        }
    }

    /// Create a manager that fetches from `source`.
    pub fn with_source(source: Arc<dyn PhotoSource>) -> Self {
        let mut manager = Self::new();
        manager.source = Some(source);
        manager
    }

    /// Install or remove the photo source for future requests.
    pub fn set_source(&mut self, source: Option<Arc<dyn PhotoSource>>) {
        self.source = source;
    }

    pub fn is_enabled(&self) -> bool {
        self.source.is_some()
    }

    /// Whether a lookup for `id` is still in flight.
    pub fn is_pending(&self, id: RectId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Start a lookup for a new rectangle. Returns false when disabled.
    pub fn request(&mut self, id: RectId) -> bool {
        let Some(source) = self.source.clone() else {
            return false;
        };
        self.cancel(id);

        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let tx = self.tx.clone();

        thread::spawn(move || {
            if flag.load(Ordering::Acquire) {
                return;
            }
            let result = source.random_photo_url();
            if !flag.load(Ordering::Acquire) {
                // The manager may already be gone; nothing left to notify.
                let _ = tx.send((id, result));
            }
        });

        self.pending.insert(id, cancelled);
        log::debug!("Requested decoration for rectangle {}", id);
        true
    }

    /// Cancel the lookup for a rectangle, if one is running.
    pub fn cancel(&mut self, id: RectId) {
        if let Some(flag) = self.pending.remove(&id) {
            flag.store(true, Ordering::Release);
            log::debug!("Cancelled decoration for rectangle {}", id);
        }
    }

    /// Cancel every running lookup.
    pub fn cancel_all(&mut self) {
        for (_, flag) in self.pending.drain() {
            flag.store(true, Ordering::Release);
        }
    }

    /// Collect finished lookups without blocking.
    pub fn poll(&mut self) -> Vec<DecorationEvent> {
        let mut events = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            events.extend(self.accept(outcome));
        }
        events
    }

    /// Block until every pending lookup has finished or `timeout` elapses.
    ///
    /// Lookups still running at the deadline stay pending and can be picked
    /// up by a later [`DecorationManager::poll`].
    pub fn wait(&mut self, timeout: Duration) -> Vec<DecorationEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.poll();
        while !self.pending.is_empty() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => events.extend(self.accept(outcome)),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        events
    }

    fn accept(&mut self, (id, result): Outcome) -> Option<DecorationEvent> {
        // Cancelled lookups were removed from `pending` already.
        self.pending.remove(&id)?;
        Some(match result {
            Ok(url) => DecorationEvent::Loaded { id, url },
            Err(error) => DecorationEvent::Failed { id, error },
        })
    }
}

impl Drop for DecorationManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(feature = "http")]
pub use http_source::HttpPhotoSource;

#[cfg(feature = "http")]
mod http_source {
    use super::{DecorationError, PhotoSource};
    use rand::Rng;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Photo {
        url: String,
    }

    /// Picks a random photo from a JSON catalog served over HTTP.
    ///
    /// The catalog is an array of objects with at least a `url` field.
    pub struct HttpPhotoSource {
        client: reqwest::blocking::Client,
        endpoint: String,
    }

    impl HttpPhotoSource {
        pub fn new(endpoint: impl Into<String>) -> Self {
            Self {
                client: reqwest::blocking::Client::new(),
                endpoint: endpoint.into(),
            }
        }

        pub fn endpoint(&self) -> &str {
            &self.endpoint
        }
    }

    impl PhotoSource for HttpPhotoSource {
        fn random_photo_url(&self) -> Result<String, DecorationError> {
            let response = self
                .client
                .get(&self.endpoint)
                .send()
                .and_then(reqwest::blocking::Response::error_for_status)
                .map_err(|e| DecorationError::Request(e.to_string()))?;
            let photos: Vec<Photo> = response
                .json()
                .map_err(|e| DecorationError::InvalidCatalog(e.to_string()))?;
            if photos.is_empty() {
                return Err(DecorationError::EmptyCatalog);
            }
            let index = rand::rng().random_range(0..photos.len());
            Ok(photos[index].url.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct FixedSource(Result<String, DecorationError>);

    impl PhotoSource for FixedSource {
        fn random_photo_url(&self) -> Result<String, DecorationError> {
            self.0.clone()
        }
    }

    /// Blocks every lookup until the test releases the gate.
    struct GatedSource {
        gate: Mutex<Receiver<()>>,
    }

    impl PhotoSource for GatedSource {
        fn random_photo_url(&self) -> Result<String, DecorationError> {
            let gate = self.gate.lock().map_err(|e| DecorationError::Request(e.to_string()))?;
            gate.recv().map_err(|e| DecorationError::Request(e.to_string()))?;
            Ok("https://example.test/late.png".to_string())
        }
    }

    /// Each call sleeps longer than the previous one.
    struct StaggeredSource {
        calls: AtomicUsize,
    }

    impl PhotoSource for StaggeredSource {
        fn random_photo_url(&self) -> Result<String, DecorationError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(20 + 150 * call as u64));
            Ok(format!("https://example.test/{call}.png"))
        }
    }

    const WAIT: Duration = Duration::from_secs(5);

    #[test]
    fn test_disabled_manager_ignores_requests() {
        let mut manager = DecorationManager::new();
        assert!(!manager.request(RectId::from_raw(1)));
        assert!(manager.poll().is_empty());
    }

    #[test]
    fn test_loaded() {
        let source = FixedSource(Ok("https://example.test/1.png".to_string()));
        let mut manager = DecorationManager::with_source(Arc::new(source));
        let id = RectId::from_raw(1);

        assert!(manager.request(id));
        let events = manager.wait(WAIT);
        assert_eq!(
            events,
            vec![DecorationEvent::Loaded {
                id,
                url: "https://example.test/1.png".to_string()
            }]
        );
        assert!(!manager.is_pending(id));
    }

    #[test]
    fn test_failed() {
        let source = FixedSource(Err(DecorationError::EmptyCatalog));
        let mut manager = DecorationManager::with_source(Arc::new(source));
        let id = RectId::from_raw(2);
        manager.request(id);
        let events = manager.wait(WAIT);
        assert_eq!(
            events,
            vec![DecorationEvent::Failed {
                id,
                error: DecorationError::EmptyCatalog
            }]
        );
    }

    #[test]
    fn test_cancelled_result_is_dropped() {
        let (release, gate) = channel();
        let source = GatedSource {
            gate: Mutex::new(gate),
        };
        let mut manager = DecorationManager::with_source(Arc::new(source));
        let id = RectId::from_raw(3);

        manager.request(id);
        manager.cancel(id);
        assert!(!manager.is_pending(id));
        release.send(()).unwrap();

        thread::sleep(Duration::from_millis(50));
        assert!(manager.poll().is_empty());
        assert!(manager.wait(Duration::from_millis(50)).is_empty());
    }

    #[test]
    fn test_wait_collects_every_pending_lookup() {
        let source = StaggeredSource {
            calls: AtomicUsize::new(0),
        };
        let mut manager = DecorationManager::with_source(Arc::new(source));
        let ids: Vec<_> = (1..=3).map(RectId::from_raw).collect();
        for &id in &ids {
            manager.request(id);
        }

        let events = manager.wait(WAIT);
        assert_eq!(events.len(), 3);
        assert!(events.iter().all(|event| matches!(event, DecorationEvent::Loaded { .. })));
        assert!(ids.iter().all(|&id| !manager.is_pending(id)));
    }

    #[test]
    fn test_wait_timeout_leaves_lookup_pending() {
        let (release, gate) = channel();
        let source = GatedSource {
            gate: Mutex::new(gate),
        };
        let mut manager = DecorationManager::with_source(Arc::new(source));
        let id = RectId::from_raw(4);

        manager.request(id);
        assert!(manager.wait(Duration::from_millis(50)).is_empty());
        assert!(manager.is_pending(id));

        release.send(()).unwrap();
        let events = manager.wait(WAIT);
        assert!(matches!(events.as_slice(), [DecorationEvent::Loaded { .. }]));
    }
}
