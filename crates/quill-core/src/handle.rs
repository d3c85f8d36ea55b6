//! Late-bound database handle
//!
//! The HTTP listener comes up before the database is reachable. Handlers share
//! a [`DatabaseHandle`] that stays `NotReady` until startup installs the
//! connected store exactly once.

use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};

enum HandleState<D: ?Sized> {
    NotReady,
    Ready(Arc<D>),
}

/// Shared access point to a store that may not be connected yet
pub struct DatabaseHandle<D: ?Sized> {
    state: RwLock<HandleState<D>>,
}

impl<D: ?Sized> DatabaseHandle<D> {
    /// Create a handle in the `NotReady` state
    pub fn new() -> Self {
        Self {
            state: RwLock::new(HandleState::NotReady),
        }
    }

    /// Create a handle that is already ready
    pub fn ready(db: Arc<D>) -> Self {
        Self {
            state: RwLock::new(HandleState::Ready(db)),
        }
    }

    /// Get the store, or `DatabaseNotReady` if it was never installed
    pub fn acquire(&self) -> Result<Arc<D>> {
        // state is replaced in a single assignment, a poisoned lock still holds a whole value
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        match &*state {
            HandleState::Ready(db) => Ok(Arc::clone(db)),
            HandleState::NotReady => Err(Error::DatabaseNotReady),
        }
    }

    /// Install the store; only the first call succeeds
    pub fn set(&self, db: Arc<D>) -> Result<()> {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if matches!(*state, HandleState::Ready(_)) {
            return Err(Error::DatabaseAlreadyReady);
        }
        *state = HandleState::Ready(db);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        matches!(*state, HandleState::Ready(_))
    }
}

impl<D: ?Sized> Default for DatabaseHandle<D> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_before_set_fails() {
        let handle: DatabaseHandle<String> = DatabaseHandle::new();

        assert!(!handle.is_ready());
        assert!(matches!(handle.acquire(), Err(Error::DatabaseNotReady)));
    }

    #[test]
    fn test_set_then_acquire() {
        let handle = DatabaseHandle::new();
        handle.set(Arc::new("db".to_string())).unwrap();

        assert!(handle.is_ready());
        assert_eq!(handle.acquire().unwrap().as_str(), "db");
    }

    #[test]
    fn test_second_set_is_rejected() {
        let handle = DatabaseHandle::new();
        handle.set(Arc::new(1)).unwrap();

        let err = handle.set(Arc::new(2)).unwrap_err();
        assert!(matches!(err, Error::DatabaseAlreadyReady));
        assert_eq!(*handle.acquire().unwrap(), 1);
    }

    #[test]
    fn test_unsized_store() {
        let handle: DatabaseHandle<dyn Fn() -> u8 + Send + Sync> = DatabaseHandle::new();
        handle.set(Arc::new(|| 7u8)).unwrap();

        assert_eq!((handle.acquire().unwrap())(), 7);
    }

    #[test]
    fn test_concurrent_readers_see_whole_states() {
        let handle = Arc::new(DatabaseHandle::new());

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let handle = Arc::clone(&handle);
                std::thread::spawn(move || {
                    for _ in 0..1_000 {
                        match handle.acquire() {
                            Ok(value) => assert_eq!(*value, 42),
                            Err(err) => assert!(matches!(err, Error::DatabaseNotReady)),
                        }
                    }
                })
            })
            .collect();

        handle.set(Arc::new(42u32)).unwrap();

        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(*handle.acquire().unwrap(), 42);
    }
}
