//! Keyed request de-duplication.
//!
//! Each key maps to one shared future. The first caller creates it; every
//! caller that arrives while it is in flight awaits the same future; once it
//! resolves, later callers get the stored value without a new round trip.
//! A failed fetch is handed to everyone already waiting on it and then
//! evicted, so the next trigger starts a fresh request.
//!
//! The map is guarded by a `std::sync::Mutex`. The lookup-or-insert happens
//! under a single lock acquisition; awaiting always happens after the guard
//! is dropped.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, trace};

use crate::error::FetchError;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V, FetchError>>>;

pub struct RequestCache<K, V>
where
    V: Clone,
{
    slots: Mutex<HashMap<K, SharedFetch<V>>>,
}

impl<K, V> RequestCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Return the value for `key`, calling `fetch` only if nothing is cached
    /// or in flight for it.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, fetch: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, FetchError>> + Send + 'static,
    {
        let (shared, started) = {
            let mut slots = self.lock();
            match slots.get(&key) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let shared = fetch().boxed().shared();
                    slots.insert(key.clone(), shared.clone());
                    (shared, true)
                }
            }
        };

        if started {
            debug!(?key, "request cache: fetching");
        } else {
            trace!(?key, "request cache: joined existing request");
        }

        let result = shared.clone().await;

        if let Err(e) = &result {
            let mut slots = self.lock();
            // Only evict our own failed future; a refetch may already have
            // replaced it.
            if slots.get(&key).is_some_and(|s| s.ptr_eq(&shared)) {
                debug!(?key, error = %e, "request cache: evicting failed request");
                slots.remove(&key);
            }
        }

        result
    }

    /// The resolved value for `key`, if any. Never starts a request.
    pub fn peek(&self, key: &K) -> Option<Result<V, FetchError>> {
        self.lock().get(key).and_then(|s| s.peek().cloned())
    }

    /// Forget a resolved value so the next call fetches again. Requests still
    /// in flight are left alone so their waiters keep sharing them.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut slots = self.lock();
        let resolved = slots.get(key).is_some_and(|s| s.peek().is_some());
        if resolved {
            slots.remove(key);
        }
        resolved
    }

    /// Number of keys cached or in flight.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<K, SharedFetch<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<K, V> Default for RequestCache<K, V>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::oneshot;

    fn counting_fetch(
        calls: &Arc<AtomicUsize>,
        result: Result<String, FetchError>,
    ) -> impl Future<Output = Result<String, FetchError>> + Send + 'static {
        calls.fetch_add(1, Ordering::SeqCst);
        async move { result }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_fetch() {
        let cache: RequestCache<String, String> = RequestCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let first = cache.get_or_fetch("films/1".to_string(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                let _ = release_rx.await;
                Ok("A New Hope".to_string())
            }
        });
        let second = cache.get_or_fetch("films/1".to_string(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok("should not run".to_string()) }
        });
        let release = async {
            tokio::task::yield_now().await;
            let _ = release_tx.send(());
        };

        let (a, b, ()) = tokio::join!(first, second, release);
        assert_eq!(a.unwrap(), "A New Hope");
        assert_eq!(b.unwrap(), "A New Hope");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn resolved_value_is_served_from_cache() {
        let cache: RequestCache<String, String> = RequestCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let v = cache
                .get_or_fetch("planets/1".into(), || {
                    counting_fetch(&calls, Ok("Tatooine".into()))
                })
                .await;
            assert_eq!(v.unwrap(), "Tatooine");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.peek(&"planets/1".into()), Some(Ok("Tatooine".into())));
    }

    #[tokio::test]
    async fn failure_is_evicted_and_next_call_refetches() {
        let cache: RequestCache<String, String> = RequestCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = "starships/9".to_string();

        let err = cache
            .get_or_fetch(key.clone(), || {
                counting_fetch(&calls, Err(FetchError::Network("refused".into())))
            })
            .await
            .unwrap_err();
        assert_eq!(err, FetchError::Network("refused".into()));
        assert!(cache.is_empty());

        let ok = cache
            .get_or_fetch(key.clone(), || counting_fetch(&calls, Ok("X-wing".into())))
            .await;
        assert_eq!(ok.unwrap(), "X-wing");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let cache: RequestCache<String, String> = RequestCache::new();
        let calls = Arc::new(AtomicUsize::new(0));

        let (a, b) = tokio::join!(
            cache.get_or_fetch("films/1".into(), || {
                counting_fetch(&calls, Err(FetchError::Decode("bad".into())))
            }),
            cache.get_or_fetch("films/2".into(), || {
                counting_fetch(&calls, Ok("The Empire Strikes Back".into()))
            }),
        );
        assert!(a.is_err());
        assert_eq!(b.unwrap(), "The Empire Strikes Back");
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_a_new_fetch() {
        let cache: RequestCache<String, String> = RequestCache::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let key = "people/?page=1&search=luke".to_string();

        cache
            .get_or_fetch(key.clone(), || counting_fetch(&calls, Ok("v1".into())))
            .await
            .unwrap();
        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));

        let v = cache
            .get_or_fetch(key.clone(), || counting_fetch(&calls, Ok("v2".into())))
            .await;
        assert_eq!(v.unwrap(), "v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
