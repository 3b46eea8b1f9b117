use super::Value;
use crate::Result;

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Produces the value behind a [`Lazy`].
#[async_trait]
pub trait LazyLoad: Send + Sync + 'static {
    async fn load(&self) -> Result<Value>;
}

/// A value loaded on first access.
///
/// The result loader hands these out for collection properties when lazy
/// loading is enabled. Clones share the loaded value; the loader runs at most
/// once.
#[derive(Clone)]
pub struct Lazy {
    inner: Arc<LazyInner>,
}

struct LazyInner {
    loader: Box<dyn LazyLoad>,
    value: OnceCell<Value>,
}

impl Lazy {
    pub fn new(loader: impl LazyLoad) -> Lazy {
        Lazy {
            inner: Arc::new(LazyInner {
                loader: Box::new(loader),
                value: OnceCell::new(),
            }),
        }
    }

    /// Returns the value, loading it on first call.
    pub async fn get(&self) -> Result<&Value> {
        self.inner
            .value
            .get_or_try_init(|| async {
                tracing::trace!("loading lazy value");
                self.inner.loader.load().await
            })
            .await
    }

    /// Loads the value and returns a copy of it.
    pub async fn load(&self) -> Result<Value> {
        self.get().await.cloned()
    }

    /// Returns the value if it has already been loaded.
    pub fn peek(&self) -> Option<&Value> {
        self.inner.value.get()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.value.initialized()
    }

    pub fn ptr_eq(&self, other: &Lazy) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for Lazy {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        match (self.peek(), other.peek()) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl core::fmt::Debug for Lazy {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("Lazy")
            .field("value", &self.peek())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl LazyLoad for Counting {
        async fn load(&self) -> Result<Value> {
            let n = self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Value::I32(n as i32))
        }
    }

    #[tokio::test]
    async fn loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let lazy = Lazy::new(Counting(calls.clone()));
        assert!(!lazy.is_loaded());
        assert_eq!(lazy.peek(), None);

        let alias = lazy.clone();
        assert_eq!(lazy.get().await.unwrap(), &Value::I32(0));
        assert_eq!(alias.get().await.unwrap(), &Value::I32(0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(alias.is_loaded());
    }
}
