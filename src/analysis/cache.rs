// src/analysis/cache.rs — Keyed at-most-once-in-flight memoization
//
// Per key: Unrequested -> Pending -> {Ready, Failed}. Ready and Failed are
// terminal for the life of the cache. Only the transition out of Pending
// writes; late writers find a terminal slot and leave it alone.

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use thiserror::Error;

use crate::infra::errors::ProviderError;

type SharedResult<V> = Shared<BoxFuture<'static, Result<V, ProviderError>>>;

enum Slot<V> {
    Pending(SharedResult<V>),
    Ready(V),
    Failed,
}

/// Snapshot of one key's state.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<V> {
    Miss,
    Pending,
    Hit(V),
    HitFailure,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The producer for this request failed. Every caller joined to the
    /// same in-flight request sees the same error.
    #[error(transparent)]
    Provider(ProviderError),

    /// An earlier request for this key failed; the producer was not called.
    #[error("a previous request for this key failed")]
    CachedFailure,
}

pub struct KeyedCache<K, V> {
    name: &'static str,
    slots: Arc<Mutex<HashMap<K, Slot<V>>>>,
}

impl<K, V> KeyedCache<K, V>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, key: &K) -> CacheLookup<V> {
        match lock(&self.slots).get(key) {
            None => CacheLookup::Miss,
            Some(Slot::Pending(_)) => CacheLookup::Pending,
            Some(Slot::Ready(value)) => CacheLookup::Hit(value.clone()),
            Some(Slot::Failed) => CacheLookup::HitFailure,
        }
    }

    pub fn len(&self) -> usize {
        lock(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the terminal entry for `key`, join the in-flight request, or
    /// start one with `producer`. `producer` is invoked at most once per key
    /// for the lifetime of the cache.
    pub async fn fetch<F, Fut>(&self, key: K, producer: F) -> Result<V, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, ProviderError>> + Send + 'static,
    {
        let in_flight = {
            let mut slots = lock(&self.slots);
            match slots.get(&key) {
                Some(Slot::Ready(value)) => {
                    tracing::debug!("{} cache hit for {:?}", self.name, key);
                    return Ok(value.clone());
                }
                Some(Slot::Failed) => {
                    tracing::debug!("{} cache holds a failure for {:?}", self.name, key);
                    return Err(FetchError::CachedFailure);
                }
                Some(Slot::Pending(shared)) => {
                    tracing::debug!("{} request for {:?} already in flight", self.name, key);
                    shared.clone()
                }
                None => {
                    tracing::debug!("{} cache miss for {:?}", self.name, key);
                    let shared = self.start(key.clone(), producer());
                    slots.insert(key, Slot::Pending(shared.clone()));
                    shared
                }
            }
        };
        in_flight.await.map_err(FetchError::Provider)
    }

    // Producers run on their own task and settle the slot there, so the key
    // leaves Pending even when every caller has gone away.
    fn start<Fut>(&self, key: K, work: Fut) -> SharedResult<V>
    where
        Fut: Future<Output = Result<V, ProviderError>> + Send + 'static,
    {
        let slots = Arc::clone(&self.slots);
        let task_key = key.clone();
        let name = self.name;
        let handle = tokio::spawn(async move {
            let result = match AssertUnwindSafe(work).catch_unwind().await {
                Ok(result) => result,
                Err(_) => {
                    tracing::warn!("{name} request for {task_key:?} panicked");
                    Err(ProviderError::unavailable(name, "request panicked"))
                }
            };
            settle(&slots, &task_key, &result);
            result
        });

        let slots = Arc::clone(&self.slots);
        async move {
            match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!("{name} request for {key:?} aborted: {e}");
                    let message = format!("request aborted: {e}");
                    let result = Err(ProviderError::unavailable(name, message));
                    settle(&slots, &key, &result);
                    result
                }
            }
        }
        .boxed()
        .shared()
    }
}

fn lock<K, V>(slots: &Mutex<HashMap<K, Slot<V>>>) -> MutexGuard<'_, HashMap<K, Slot<V>>> {
    slots.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn settle<K: Eq + Hash, V: Clone>(
    slots: &Mutex<HashMap<K, Slot<V>>>,
    key: &K,
    result: &Result<V, ProviderError>,
) {
    let mut slots = lock(slots);
    if let Some(slot) = slots.get_mut(key) {
        if matches!(slot, Slot::Pending(_)) {
            *slot = match result {
                Ok(value) => Slot::Ready(value.clone()),
                Err(_) => Slot::Failed,
            };
        }
    }
}
