//! Data-fetch resources.
//!
//! A [`Resource`] holds the request state behind one screen of the
//! dashboard: the last good response, whether a request is running, and a
//! user-facing error message. Each fetch runs on its own task and owns a
//! [`CancellationToken`]. Starting a new fetch cancels the previous token
//! under the same lock a finishing fetch must take to write its result, so a
//! slow superseded response can never overwrite a newer one.
//!
//! Resources may share a [`ResponseCache`]. Cache-aware loads return a live
//! entry without touching the network; [`Resource::refetch`] always goes to
//! the network and repopulates the cache.

mod cache;
mod fetchers;

pub use cache::{DEFAULT_TTL, ResponseCache};
pub use fetchers::{
    DashboardFetch, OrderFetch, OrdersFetch, ProductFetch, ProductsFetch, ProfileFetch,
};

use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::gateway::ApiError;

/// Shortest period [`Resource::spawn_revalidation`] will tick at.
pub const MIN_REVALIDATION_PERIOD: Duration = Duration::from_millis(10);

/// One kind of request a [`Resource`] can run.
pub trait Fetch: Send + Sync + 'static {
    /// Parameters of a request. Serialized to build cache keys.
    type Filters: Clone + Debug + Serialize + Send + Sync + 'static;
    /// Decoded response.
    type Output: Clone + Send + Sync + 'static;

    fn fetch(
        &self,
        filters: Self::Filters,
    ) -> impl Future<Output = Result<Self::Output, ApiError>> + Send;

    /// Message shown to the user when a fetch fails.
    fn failure_message() -> &'static str;
}

/// What the view sees.
#[derive(Debug, Clone)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            is_loading: false,
            error: None,
        }
    }
}

/// Completion handle for one fetch.
///
/// Dropping it does not cancel the fetch.
#[derive(Debug)]
#[must_use = "await the handle to wait for the fetch to settle"]
pub struct FetchHandle {
    task: JoinHandle<()>,
}

impl FetchHandle {
    /// Wait until the fetch has settled or been cancelled.
    pub async fn settled(self) {
        if let Err(e) = self.task.await {
            if e.is_panic() {
                warn!(error = %e, "Fetch task panicked");
            }
        }
    }
}

/// Request state container for one kind of data.
///
/// Dropping the resource cancels any fetch still in flight and stops
/// background revalidation.
pub struct Resource<F: Fetch> {
    inner: Arc<Inner<F>>,
}

struct Inner<F: Fetch> {
    fetcher: F,
    cache: Option<ResponseCache<F::Output>>,
    shutdown: CancellationToken,
    slot: Mutex<Slot<F>>,
}

struct Slot<F: Fetch> {
    state: ResourceState<F::Output>,
    filters: F::Filters,
    in_flight: Option<CancellationToken>,
    last_fetch: Option<Instant>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Serve from cache when possible.
    Load,
    /// Always hit the network.
    Refresh,
}

impl<F: Fetch> Resource<F> {
    /// Create an idle resource. Nothing is fetched until [`load`](Self::load).
    #[must_use]
    pub fn new(fetcher: F, filters: F::Filters) -> Self {
        Self::build(fetcher, filters, None)
    }

    /// Create an idle resource backed by `cache`.
    #[must_use]
    pub fn with_cache(fetcher: F, filters: F::Filters, cache: ResponseCache<F::Output>) -> Self {
        Self::build(fetcher, filters, Some(cache))
    }

    fn build(fetcher: F, filters: F::Filters, cache: Option<ResponseCache<F::Output>>) -> Self {
        Self {
            inner: Arc::new(Inner {
                fetcher,
                cache,
                shutdown: CancellationToken::new(),
                slot: Mutex::new(Slot {
                    state: ResourceState::default(),
                    filters,
                    in_flight: None,
                    last_fetch: None,
                }),
            }),
        }
    }

    /// Create a resource and start loading straight away.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mount(fetcher: F, filters: F::Filters) -> (Self, FetchHandle) {
        let resource = Self::new(fetcher, filters);
        let handle = resource.load();
        (resource, handle)
    }

    /// Like [`mount`](Self::mount), backed by `cache`.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn mount_cached(
        fetcher: F,
        filters: F::Filters,
        cache: ResponseCache<F::Output>,
    ) -> (Self, FetchHandle) {
        let resource = Self::with_cache(fetcher, filters, cache);
        let handle = resource.load();
        (resource, handle)
    }

    /// Load the current filters, serving a live cache entry if there is one.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn load(&self) -> FetchHandle {
        let filters = self.filters();
        self.start(filters, Mode::Load)
    }

    /// Switch to `filters` and load them, serving from cache if possible.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn set_filters(&self, filters: F::Filters) -> FetchHandle {
        self.start(filters, Mode::Load)
    }

    /// Fetch `filters` from the network, bypassing and then repopulating the
    /// cache.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn refetch(&self, filters: F::Filters) -> FetchHandle {
        self.start(filters, Mode::Refresh)
    }

    /// Cancel the fetch in flight, if any. Its result will be ignored.
    pub fn cancel(&self) {
        let mut slot = self.inner.slot.lock();
        if let Some(token) = slot.in_flight.take() {
            token.cancel();
            slot.state.is_loading = false;
            debug!("Fetch cancelled");
        }
    }

    /// Copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ResourceState<F::Output> {
        self.inner.slot.lock().state.clone()
    }

    /// Filters of the latest fetch.
    #[must_use]
    pub fn filters(&self) -> F::Filters {
        self.inner.slot.lock().filters.clone()
    }

    /// When the last network fetch succeeded.
    #[must_use]
    pub fn last_fetch(&self) -> Option<Instant> {
        self.inner.slot.lock().last_fetch
    }

    /// Whether the data is older than `max_age` or was never fetched from
    /// the network.
    #[must_use]
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.last_fetch().is_none_or(|at| at.elapsed() >= max_age)
    }

    /// Patch the current data in place after a successful mutation.
    ///
    /// Does nothing while there is no data.
    pub fn mutate(&self, patch: impl FnOnce(&mut F::Output)) {
        let mut slot = self.inner.slot.lock();
        if let Some(data) = slot.state.data.as_mut() {
            patch(data);
        }
    }

    /// Drop every entry of the backing cache.
    pub fn clear_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.clear();
            debug!("Resource cache cleared");
        }
    }

    /// The fetcher, for issuing related mutations.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.inner.fetcher
    }

    /// Refetch the current filters every `period` whenever the data is stale.
    ///
    /// With a cache the data is stale once its cache entry has expired;
    /// without one, once the last network fetch is older than `period`. The
    /// task stops when the resource is dropped. Periods shorter than
    /// [`MIN_REVALIDATION_PERIOD`] are raised to it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn_revalidation(&self, period: Duration) -> JoinHandle<()> {
        let period = period.max(MIN_REVALIDATION_PERIOD);
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                tokio::select! {
                    () = inner.shutdown.cancelled() => break,
                    _ = ticks.tick() => {
                        if inner.needs_revalidation(period) {
                            debug!("Revalidating stale resource");
                            let filters = inner.slot.lock().filters.clone();
                            let _ = Inner::start(&inner, filters, Mode::Refresh);
                        }
                    }
                }
            }
        })
    }

    fn start(&self, filters: F::Filters, mode: Mode) -> FetchHandle {
        Inner::start(&self.inner, filters, mode)
    }
}

impl<F: Fetch> Inner<F> {
    fn start(this: &Arc<Self>, filters: F::Filters, mode: Mode) -> FetchHandle {
        let token = this.shutdown.child_token();
        {
            let mut slot = this.slot.lock();
            if let Some(previous) = slot.in_flight.replace(token.clone()) {
                previous.cancel();
                debug!("Superseded in-flight fetch");
            }
            slot.filters = filters.clone();
            slot.state.is_loading = true;
        }

        let inner = Arc::clone(this);
        let task = tokio::spawn(async move { inner.run(token, filters, mode).await });
        FetchHandle { task }
    }

    async fn run(&self, token: CancellationToken, filters: F::Filters, mode: Mode) {
        let key = self
            .cache
            .as_ref()
            .and_then(|_| ResponseCache::<F::Output>::key(&filters));

        if mode == Mode::Load {
            if let (Some(cache), Some(key)) = (&self.cache, &key) {
                if let Some(hit) = cache.get(key).await {
                    debug!(key = %key, "Cache hit");
                    self.settle(&token, Ok(hit), false);
                    return;
                }
            }
        }

        let result = tokio::select! {
            biased;
            () = token.cancelled() => {
                debug!("Fetch dropped after cancellation");
                return;
            }
            result = self.fetcher.fetch(filters) => result,
        };

        let fresh = match (&result, &self.cache, key) {
            (Ok(data), Some(cache), Some(key)) => Some((cache, key, data.clone())),
            _ => None,
        };

        // Only a fetch that was still current when it settled may populate
        // the shared cache.
        if self.settle(&token, result, true) {
            if let Some((cache, key, data)) = fresh {
                cache.insert(key, data).await;
            }
        }
    }

    /// Apply a result unless its fetch was cancelled. Returns whether it was
    /// applied.
    fn settle(
        &self,
        token: &CancellationToken,
        result: Result<F::Output, ApiError>,
        network: bool,
    ) -> bool {
        let mut slot = self.slot.lock();
        if token.is_cancelled() {
            debug!("Ignoring result of cancelled fetch");
            return false;
        }

        slot.in_flight = None;
        slot.state.is_loading = false;
        match result {
            Ok(data) => {
                slot.state.data = Some(data);
                slot.state.error = None;
                if network {
                    slot.last_fetch = Some(Instant::now());
                }
            }
            Err(ApiError::Cancelled) => debug!("Fetch cancelled"),
            Err(e) => {
                warn!(error = %e, "{}", F::failure_message());
                slot.state.error = Some(F::failure_message().to_owned());
            }
        }
        true
    }

    fn needs_revalidation(&self, period: Duration) -> bool {
        let slot = self.slot.lock();
        if slot.in_flight.is_some() {
            return false;
        }
        match &self.cache {
            Some(cache) => ResponseCache::<F::Output>::key(&slot.filters)
                .is_none_or(|key| !cache.contains(&key)),
            None => slot.last_fetch.is_none_or(|at| at.elapsed() >= period),
        }
    }
}

impl<F: Fetch> Drop for Resource<F> {
    fn drop(&mut self) {
        self.inner.shutdown.cancel();
    }
}

impl<F: Fetch> Debug for Resource<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let slot = self.inner.slot.lock();
        f.debug_struct("Resource")
            .field("filters", &slot.filters)
            .field("is_loading", &slot.state.is_loading)
            .field("has_data", &slot.state.data.is_some())
            .field("error", &slot.state.error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::{HashMap, VecDeque};
    use std::sync::atomic::{AtomicUsize, Ordering};

    use tokio::sync::oneshot;

    use super::*;

    /// Fetcher whose responses are released by the test, one gate per call.
    #[derive(Default)]
    struct Gated {
        gates: Mutex<HashMap<u32, VecDeque<oneshot::Receiver<Result<String, ApiError>>>>>,
    }

    impl Gated {
        fn gate(&self, filters: u32) -> oneshot::Sender<Result<String, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().entry(filters).or_default().push_back(rx);
            tx
        }
    }

    impl Fetch for Gated {
        type Filters = u32;
        type Output = String;

        async fn fetch(&self, filters: u32) -> Result<String, ApiError> {
            let rx = self
                .gates
                .lock()
                .get_mut(&filters)
                .and_then(VecDeque::pop_front)
                .unwrap();
            rx.await.unwrap_or(Err(ApiError::Cancelled))
        }

        fn failure_message() -> &'static str {
            "Failed to load"
        }
    }

    /// Fetcher that answers immediately and counts calls.
    #[derive(Default)]
    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl Fetch for Counting {
        type Filters = Option<String>;
        type Output = usize;

        async fn fetch(&self, _filters: Option<String>) -> Result<usize, ApiError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                Err(ApiError::NotFound("gone".to_owned()))
            } else {
                Ok(n)
            }
        }

        fn failure_message() -> &'static str {
            "Failed to load dashboard"
        }
    }

    #[tokio::test]
    async fn test_mount_sets_loading_synchronously() {
        let fetcher = Gated::default();
        let tx = fetcher.gate(1);
        let (resource, handle) = Resource::mount(fetcher, 1);

        assert!(resource.snapshot().is_loading);

        tx.send(Ok("one".to_owned())).unwrap();
        handle.settled().await;

        let state = resource.snapshot();
        assert!(!state.is_loading);
        assert_eq!(state.data.as_deref(), Some("one"));
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_superseded_response_is_ignored() {
        let fetcher = Gated::default();
        let first_tx = fetcher.gate(1);
        let second_tx = fetcher.gate(2);
        let resource = Resource::new(fetcher, 0);

        let first = resource.refetch(1);
        tokio::task::yield_now().await;
        let second = resource.refetch(2);

        second_tx.send(Ok("second".to_owned())).unwrap();
        second.settled().await;
        let _ = first_tx.send(Ok("first".to_owned()));
        first.settled().await;

        let state = resource.snapshot();
        assert_eq!(state.data.as_deref(), Some("second"));
        assert!(!state.is_loading);
        assert_eq!(resource.filters(), 2);
    }

    #[tokio::test]
    async fn test_cancelled_fetch_does_not_clear_loading_of_successor() {
        let fetcher = Gated::default();
        let first_tx = fetcher.gate(1);
        let _second_tx = fetcher.gate(2);
        let resource = Resource::new(fetcher, 0);

        let first = resource.refetch(1);
        let _second = resource.refetch(2);
        let _ = first_tx.send(Ok("first".to_owned()));
        first.settled().await;

        let state = resource.snapshot();
        assert!(state.is_loading);
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_data() {
        let fetcher = Gated::default();
        let ok_tx = fetcher.gate(1);
        let err_tx = fetcher.gate(2);
        let resource = Resource::new(fetcher, 0);

        let handle = resource.refetch(1);
        ok_tx.send(Ok("good".to_owned())).unwrap();
        handle.settled().await;

        let handle = resource.refetch(2);
        err_tx
            .send(Err(ApiError::NotFound("missing".to_owned())))
            .unwrap();
        handle.settled().await;

        let state = resource.snapshot();
        assert_eq!(state.data.as_deref(), Some("good"));
        assert_eq!(state.error.as_deref(), Some("Failed to load"));
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn test_drop_cancels_in_flight() {
        let fetcher = Gated::default();
        let tx = fetcher.gate(1);
        let (resource, handle) = Resource::mount(fetcher, 1);

        drop(resource);
        handle.settled().await;
        assert!(tx.is_closed());
    }

    #[tokio::test]
    async fn test_cache_hit_skips_network() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(Duration::from_secs(60));

        let fetcher = Counting {
            calls: calls.clone(),
            fail: false,
        };
        let (first, handle) = Resource::mount_cached(fetcher, None, cache.clone());
        handle.settled().await;
        assert_eq!(first.snapshot().data, Some(1));

        let fetcher = Counting {
            calls: calls.clone(),
            fail: false,
        };
        let (second, handle) = Resource::mount_cached(fetcher, None, cache.clone());
        handle.settled().await;
        assert_eq!(second.snapshot().data, Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(second.last_fetch().is_none());
    }

    #[tokio::test]
    async fn test_cache_expiry_fetches_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(Duration::from_millis(100));
        let fetcher = Counting {
            calls: calls.clone(),
            fail: false,
        };
        let (resource, handle) = Resource::mount_cached(fetcher, None, cache);
        handle.settled().await;

        resource.load().settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(200)).await;
        resource.load().settled().await;
        resource.load().settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(resource.snapshot().data, Some(2));
    }

    #[tokio::test]
    async fn test_refetch_bypasses_cache_and_clear_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(Duration::from_secs(60));
        let fetcher = Counting {
            calls: calls.clone(),
            fail: false,
        };
        let (resource, handle) = Resource::mount_cached(fetcher, None, cache);
        handle.settled().await;

        resource.refetch(None).settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        resource.load().settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        resource.clear_cache();
        resource.load().settled().await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_failures_are_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(Duration::from_secs(60));
        let fetcher = Counting {
            calls: calls.clone(),
            fail: true,
        };
        let (resource, handle) = Resource::mount_cached(fetcher, None, cache);
        handle.settled().await;
        resource.load().settled().await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            resource.snapshot().error.as_deref(),
            Some("Failed to load dashboard")
        );
    }

    /// Fetcher that is superseded in the same poll that completes it.
    struct SupersededOnCompletion {
        token: CancellationToken,
    }

    impl Fetch for SupersededOnCompletion {
        type Filters = u32;
        type Output = String;

        async fn fetch(&self, _filters: u32) -> Result<String, ApiError> {
            self.token.cancel();
            Ok("old".to_owned())
        }

        fn failure_message() -> &'static str {
            "Failed to load"
        }
    }

    #[tokio::test]
    async fn test_superseded_result_never_reaches_cache() {
        let token = CancellationToken::new();
        let cache = ResponseCache::new(Duration::from_secs(60));
        let fetcher = SupersededOnCompletion {
            token: token.clone(),
        };
        let resource = Resource::with_cache(fetcher, 1, cache.clone());

        resource.inner.run(token, 1, Mode::Refresh).await;

        let key = ResponseCache::<String>::key(&1_u32).unwrap();
        assert!(cache.get(&key).await.is_none());
        assert!(resource.snapshot().data.is_none());
    }

    #[tokio::test]
    async fn test_same_filters_refetch_caches_latest_only() {
        let fetcher = Gated::default();
        let first_tx = fetcher.gate(1);
        let second_tx = fetcher.gate(1);
        let cache = ResponseCache::new(Duration::from_secs(60));
        let resource = Resource::with_cache(fetcher, 1, cache.clone());

        let first = resource.refetch(1);
        tokio::task::yield_now().await;
        let second = resource.refetch(1);

        second_tx.send(Ok("second".to_owned())).unwrap();
        second.settled().await;
        let _ = first_tx.send(Ok("first".to_owned()));
        first.settled().await;

        let key = ResponseCache::<String>::key(&1_u32).unwrap();
        assert_eq!(cache.get(&key).await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_zero_revalidation_period_is_clamped() {
        let (resource, handle) = Resource::mount(Counting::default(), None);
        handle.settled().await;

        let task = resource.spawn_revalidation(Duration::ZERO);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!task.is_finished());

        drop(resource);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_mutate_patches_data() {
        let (resource, handle) = Resource::mount(Counting::default(), None);
        handle.settled().await;

        resource.mutate(|n| *n += 10);
        assert_eq!(resource.snapshot().data, Some(11));
    }

    #[tokio::test]
    async fn test_revalidation_refreshes_expired_entry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let cache = ResponseCache::new(Duration::from_millis(50));
        let fetcher = Counting {
            calls: calls.clone(),
            fail: false,
        };
        let (resource, handle) = Resource::mount_cached(fetcher, None, cache);
        handle.settled().await;

        let task = resource.spawn_revalidation(Duration::from_millis(80));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(calls.load(Ordering::SeqCst) >= 2);

        drop(resource);
        tokio::time::timeout(Duration::from_secs(1), task)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_staleness() {
        let resource = Resource::new(Counting::default(), None);
        assert!(resource.is_stale(Duration::from_secs(60)));

        resource.load().settled().await;
        assert!(!resource.is_stale(Duration::from_secs(60)));
        assert!(resource.is_stale(Duration::ZERO));
    }
}
