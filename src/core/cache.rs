use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// Process-wide memo of provider responses, shared between clones.
#[derive(Clone)]
pub struct Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Arc<Mutex<HashMap<K, V>>>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, key: &K) -> Option<V> {
        let value = self.inner.lock().await.get(key).cloned();
        debug!(?key, hit = value.is_some(), "Cache lookup");
        value
    }

    pub async fn put(&self, key: K, value: V) {
        debug!(?key, "Cache put");
        self.inner.lock().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }
}

impl<K, V> Default for Cache<K, V>
where
    K: Eq + Hash + Debug + Send + Sync,
    V: Clone + Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_clones_share_entries() {
        let cache = Cache::<String, u32>::new();
        let shared = cache.clone();

        assert!(cache.get(&"HDFCBANK.NS".to_string()).await.is_none());

        shared.put("HDFCBANK.NS".to_string(), 1650).await;

        assert_eq!(cache.get(&"HDFCBANK.NS".to_string()).await, Some(1650));
        assert!(cache.get(&"INFY.NS".to_string()).await.is_none());
        assert_eq!(cache.len().await, 1);
    }
}
