//! Ambient display target and its scoped override
//!
//! Some capture mechanisms (X11) pick the display to talk to from
//! process-wide state rather than from an argument. [`DisplayTarget`]
//! describes that state for a strategy: where it lives ([`TargetStore`]) and
//! which value to fall back to when nothing is configured.
//!
//! [`DisplayTarget::scope`] returns a [`TargetScope`] guard. While the guard
//! is alive the store's lock is held and the requested target is in effect;
//! dropping the guard restores the previous value, including "unset". Drop
//! runs on every exit path, so an early `?` return from a failed capture
//! still restores the target.
//!
//! # Critical section
//!
//! The environment is shared by every thread in the process. All writes made
//! through [`EnvTargetStore`] happen while holding one process-wide lock, and
//! the lock stays held across the capture call that reads the value.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard, const_mutex};

/// Guards every environment write made by [`EnvTargetStore`].
static ENV_TARGET_LOCK: Mutex<()> = const_mutex(());

/// Storage for an ambient display target
pub trait TargetStore: Send + Sync {
    /// Name of the setting (e.g. `DISPLAY`), used in logs
    fn key(&self) -> &str;

    /// Current value; `None` when unset
    fn get(&self) -> Option<String>;

    /// Replaces the value; `None` unsets it
    fn set(&self, value: Option<&str>);

    /// Lock serializing save/set/restore sequences on this store
    fn lock(&self) -> &Mutex<()>;
}

/// Target stored in a process environment variable
#[derive(Debug, Clone)]
pub struct EnvTargetStore {
    var: String,
}

impl EnvTargetStore {
    /// Creates a store backed by the named environment variable
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl TargetStore for EnvTargetStore {
    fn key(&self) -> &str {
        &self.var
    }

    fn get(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }

    fn set(&self, value: Option<&str>) {
        // SAFETY: environment writes only happen through this store while
        // ENV_TARGET_LOCK is held (see `TargetScope`), and the capture path
        // is single-threaded.
        unsafe {
            match value {
                Some(value) => std::env::set_var(&self.var, value),
                None => std::env::remove_var(&self.var),
            }
        }
    }

    fn lock(&self) -> &Mutex<()> {
        &ENV_TARGET_LOCK
    }
}

/// Target stored in memory, for tests and embedders that thread the target
/// through explicitly
#[derive(Debug, Default)]
pub struct MemoryTargetStore {
    key:   String,
    value: Mutex<Option<String>>,
    lock:  Mutex<()>,
}

impl MemoryTargetStore {
    /// Creates an in-memory store with an initial value
    pub fn new(key: impl Into<String>, initial: Option<&str>) -> Self {
        Self {
            key:   key.into(),
            value: Mutex::new(initial.map(str::to_string)),
            lock:  Mutex::new(()),
        }
    }
}

impl TargetStore for MemoryTargetStore {
    fn key(&self) -> &str {
        &self.key
    }

    fn get(&self) -> Option<String> {
        self.value.lock().clone()
    }

    fn set(&self, value: Option<&str>) {
        *self.value.lock() = value.map(str::to_string);
    }

    fn lock(&self) -> &Mutex<()> {
        &self.lock
    }
}

/// The ambient display target a strategy reads, plus its fallback value
#[derive(Clone)]
pub struct DisplayTarget {
    store:    Arc<dyn TargetStore>,
    fallback: String,
}

impl DisplayTarget {
    /// Creates a target description
    pub fn new(store: Arc<dyn TargetStore>, fallback: impl Into<String>) -> Self {
        Self {
            store,
            fallback: fallback.into(),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &Arc<dyn TargetStore> {
        &self.store
    }

    /// Value applied when nothing is configured
    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Current ambient value, treating empty strings as unset
    pub fn current(&self) -> Option<String> {
        self.store.get().filter(|v| !v.trim().is_empty())
    }

    /// The target a capture would address right now without any override
    pub fn effective(&self) -> String {
        self.current().unwrap_or_else(|| self.fallback.clone())
    }

    /// Enters a scope in which `override_target` (or, with no override and no
    /// ambient value, the fallback) is in effect.
    ///
    /// The returned guard holds the store's lock until dropped.
    pub fn scope(&self, override_target: Option<&str>) -> TargetScope<'_> {
        let guard = self.store.lock().lock();
        let previous = self.store.get();

        let replacement = match override_target {
            Some(target) => Some(target),
            None if self.current().is_none() => Some(self.fallback.as_str()),
            None => None,
        };

        let restore = replacement.map(|target| {
            tracing::debug!(
                key = self.store.key(),
                target,
                previous = previous.as_deref(),
                "Applying display target for this call"
            );
            self.store.set(Some(target));
            previous
        });

        TargetScope {
            store: self.store.as_ref(),
            restore,
            _guard: guard,
        }
    }
}

impl std::fmt::Debug for DisplayTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayTarget")
            .field("key", &self.store.key())
            .field("fallback", &self.fallback)
            .finish()
    }
}

/// Guard returned by [`DisplayTarget::scope`]
///
/// Restores the saved value on drop, then releases the lock.
pub struct TargetScope<'a> {
    store:   &'a dyn TargetStore,
    /// `Some(previous)` when this scope changed the target
    restore: Option<Option<String>>,
    _guard:  MutexGuard<'a, ()>,
}

impl TargetScope<'_> {
    /// True when entering the scope changed the ambient value
    pub fn changed_target(&self) -> bool {
        self.restore.is_some()
    }
}

impl Drop for TargetScope<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.restore.take() {
            tracing::debug!(
                key = self.store.key(),
                restored = previous.as_deref(),
                "Restoring display target"
            );
            self.store.set(previous.as_deref());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_target(initial: Option<&str>) -> DisplayTarget {
        DisplayTarget::new(Arc::new(MemoryTargetStore::new("DISPLAY", initial)), ":0")
    }

    #[test]
    fn test_override_is_restored() {
        let target = memory_target(Some(":1"));

        {
            let scope = target.scope(Some(":5"));
            assert!(scope.changed_target());
            assert_eq!(target.store().get().as_deref(), Some(":5"));
        }

        assert_eq!(target.store().get().as_deref(), Some(":1"));
    }

    #[test]
    fn test_override_restores_unset() {
        let target = memory_target(None);

        {
            let _scope = target.scope(Some(":2"));
            assert_eq!(target.store().get().as_deref(), Some(":2"));
        }

        assert_eq!(target.store().get(), None);
    }

    #[test]
    fn test_fallback_applied_when_unset() {
        let target = memory_target(None);

        {
            let scope = target.scope(None);
            assert!(scope.changed_target());
            assert_eq!(target.store().get().as_deref(), Some(":0"));
        }

        assert_eq!(target.store().get(), None);
    }

    #[test]
    fn test_fallback_applied_when_empty() {
        let target = memory_target(Some(""));

        {
            let _scope = target.scope(None);
            assert_eq!(target.store().get().as_deref(), Some(":0"));
        }

        // Restored to the exact previous value, not to "unset"
        assert_eq!(target.store().get().as_deref(), Some(""));
    }

    #[test]
    fn test_ambient_value_left_alone() {
        let target = memory_target(Some(":3"));

        let scope = target.scope(None);
        assert!(!scope.changed_target());
        assert_eq!(target.store().get().as_deref(), Some(":3"));
        drop(scope);

        assert_eq!(target.store().get().as_deref(), Some(":3"));
    }

    #[test]
    fn test_restored_when_caller_returns_early() {
        fn failing_call(target: &DisplayTarget) -> Result<(), String> {
            let _scope = target.scope(Some(":7"));
            let outcome: Result<(), String> = Err("capture failed".to_string());
            outcome?;
            Ok(())
        }

        let target = memory_target(Some(":1"));
        assert!(failing_call(&target).is_err());
        assert_eq!(target.store().get().as_deref(), Some(":1"));
    }

    #[test]
    fn test_scope_holds_lock() {
        let target = memory_target(None);

        let scope = target.scope(None);
        assert!(target.store().lock().try_lock().is_none());
        drop(scope);
        assert!(target.store().lock().try_lock().is_some());
    }

    #[test]
    fn test_effective_target() {
        assert_eq!(memory_target(None).effective(), ":0");
        assert_eq!(memory_target(Some("  ")).effective(), ":0");
        assert_eq!(memory_target(Some(":4")).effective(), ":4");
    }

    #[test]
    fn test_env_store_round_trip() {
        const VAR: &str = "SCREENGRAB_TEST_AMBIENT_TARGET";
        temp_env::with_var_unset(VAR, || {
            let target = DisplayTarget::new(Arc::new(EnvTargetStore::new(VAR)), ":0");

            {
                let _scope = target.scope(Some(":9"));
                assert_eq!(std::env::var(VAR).as_deref(), Ok(":9"));
            }

            assert!(std::env::var(VAR).is_err());
        });
    }
}
