//! List cache with a single refresh operation
//!
//! Screens never re-fetch lists ad hoc. They read a [`ListCache`], and any
//! mutating action calls [`ListCache::invalidate`] so the next refresh is
//! known to be required.

use chrono::{DateTime, Utc};
use std::future::Future;

use crate::ClientResult;

#[derive(Debug, Clone)]
pub struct ListCache<T> {
    items: Vec<T>,
    stale: bool,
    refreshed_at: Option<DateTime<Utc>>,
}

impl<T> Default for ListCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ListCache<T> {
    /// Empty cache, stale until the first refresh
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            stale: true,
            refreshed_at: None,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }

    /// Mark the contents out of date
    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    /// Store a freshly fetched list
    pub fn replace(&mut self, items: Vec<T>) {
        self.items = items;
        self.stale = false;
        self.refreshed_at = Some(Utc::now());
    }

    /// Fetch and replace the whole list.
    ///
    /// On failure the previous items are kept and the cache stays stale.
    pub async fn refresh<F, Fut>(&mut self, fetch: F) -> ClientResult<&[T]>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        match fetch().await {
            Ok(items) => {
                self.replace(items);
                Ok(&self.items)
            }
            Err(e) => {
                self.stale = true;
                Err(e)
            }
        }
    }

    /// Refresh only when stale
    pub async fn ensure_fresh<F, Fut>(&mut self, fetch: F) -> ClientResult<&[T]>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<Vec<T>>>,
    {
        if self.stale {
            self.refresh(fetch).await
        } else {
            Ok(&self.items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ClientError;

    #[tokio::test]
    async fn test_refresh_replaces_items() {
        let mut cache = ListCache::new();
        assert!(cache.is_stale());
        assert!(cache.refreshed_at().is_none());

        let items = cache.refresh(|| async { Ok(vec![1, 2, 3]) }).await.unwrap();
        assert_eq!(items, &[1, 2, 3]);
        assert!(!cache.is_stale());
        assert!(cache.refreshed_at().is_some());

        cache.refresh(|| async { Ok(vec![4]) }).await.unwrap();
        assert_eq!(cache.items(), &[4]);
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_old_items() {
        let mut cache = ListCache::new();
        cache.replace(vec!["a"]);

        let err = cache
            .refresh(|| async { Err(ClientError::Internal("boom".into())) })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));
        assert_eq!(cache.items(), &["a"]);
        assert!(cache.is_stale());
    }

    #[tokio::test]
    async fn test_ensure_fresh_skips_fetch_until_invalidated() {
        let mut cache = ListCache::new();
        cache.replace(vec![1]);

        cache
            .ensure_fresh(|| async {
                let fetched: ClientResult<Vec<i32>> =
                    Err(ClientError::Internal("fresh cache must not fetch".into()));
                fetched
            })
            .await
            .unwrap();
        assert_eq!(cache.items(), &[1]);

        cache.invalidate();
        cache.ensure_fresh(|| async { Ok(vec![2]) }).await.unwrap();
        assert_eq!(cache.items(), &[2]);
    }
}
