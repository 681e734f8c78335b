//! Guarded mutation of process environment variables.
//!
//! Every change takes a global re-entrant mutex and hands back an
//! [`EnvVarGuard`] that puts the previous value back (or removes the
//! variable) when dropped. Guards for the same key restore in LIFO order.
//! Tests that read `%env.NAME%` macros from the real environment should also
//! be marked `#[serial]`, since the lock only covers each mutation.
//!
//! # Examples
//!
//! ```
//! use cfgtree_test_helpers::env;
//!
//! let _runtime = env::set_var("RUNTIME", "/root");
//! assert_eq!(std::env::var("RUNTIME").ok().as_deref(), Some("/root"));
//! ```

use std::env;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::sync::LazyLock;

use parking_lot::{ReentrantMutex, ReentrantMutexGuard};

static ENV_MUTEX: LazyLock<ReentrantMutex<()>> = LazyLock::new(ReentrantMutex::default);

/// Puts an environment variable back to its earlier state on drop.
#[must_use = "dropping restores the prior value"]
pub struct EnvVarGuard {
    key: String,
    original: Option<OsString>,
}

impl fmt::Debug for EnvVarGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvVarGuard")
            .field("key", &self.key)
            .field("had_original", &self.original.is_some())
            .finish()
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        let _lock = ENV_MUTEX.lock();
        match self.original.take() {
            // SAFETY: `ENV_MUTEX` is held.
            Some(value) => unsafe { env::set_var(&self.key, value) },
            // SAFETY: `ENV_MUTEX` is held.
            None => unsafe { env::remove_var(&self.key) },
        }
    }
}

/// Holds the environment lock, and any guards created under it, until dropped.
///
/// Guards are restored before the lock is released.
#[must_use = "dropping releases the environment lock and restores guards"]
pub struct EnvScope {
    guards: Vec<EnvVarGuard>,
    _lock: ReentrantMutexGuard<'static, ()>,
}

impl fmt::Debug for EnvScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvScope")
            .field("guards", &self.guards)
            .finish_non_exhaustive()
    }
}

impl Drop for EnvScope {
    fn drop(&mut self) {
        while let Some(guard) = self.guards.pop() {
            drop(guard);
        }
    }
}

fn mutate<F>(key: String, change: F) -> EnvVarGuard
where
    F: FnOnce(&str),
{
    let _lock = ENV_MUTEX.lock();
    let original = env::var_os(&key);
    change(&key);
    EnvVarGuard { key, original }
}

/// Set `key` to `value` until the guard is dropped.
pub fn set_var<K, V>(key: K, value: V) -> EnvVarGuard
where
    K: Into<String>,
    V: AsRef<OsStr>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::set_var(k, value.as_ref()) })
}

/// Unset `key` until the guard is dropped.
pub fn remove_var<K>(key: K) -> EnvVarGuard
where
    K: Into<String>,
{
    // SAFETY: `mutate` holds `ENV_MUTEX` while the closure runs.
    mutate(key.into(), |k| unsafe { env::remove_var(k) })
}

/// Set every `(key, value)` pair and keep the environment locked until the
/// returned scope is dropped.
///
/// A `None` value unsets the key.
///
/// # Examples
///
/// ```
/// use cfgtree_test_helpers::env;
///
/// let scope = env::scope([("RUNTIME", Some("/root")), ("SOURCE", None)]);
/// assert!(std::env::var("SOURCE").is_err());
/// drop(scope);
/// ```
pub fn scope<I, K, V>(vars: I) -> EnvScope
where
    I: IntoIterator<Item = (K, Option<V>)>,
    K: Into<String>,
    V: AsRef<OsStr>,
{
    let lock = ENV_MUTEX.lock();
    let guards = vars
        .into_iter()
        .map(|(key, value)| match value {
            Some(value) => set_var(key, value),
            None => remove_var(key),
        })
        .collect();
    EnvScope {
        guards,
        _lock: lock,
    }
}

#[cfg(test)]
mod tests;
