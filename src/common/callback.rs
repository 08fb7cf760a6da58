use std::fmt;
use std::sync::OnceLock;

/// Optional handler slot shared between an endpoint and its receive loop.
///
/// A handler is registered at most once; invoking an empty slot is a valid
/// no-op. This replaces the invoke-if-not-null pattern with an explicit
/// state: either no handler was ever registered, or exactly one was and it
/// is invoked synchronously on the receive loop.
///
/// # Examples
///
/// ```
/// use relaynet::Callback;
///
/// let callback: Callback<u32> = Callback::new();
/// callback.invoke(1); // no handler yet, nothing happens
///
/// assert!(callback.set(|n| println!("got {n}")));
/// assert!(!callback.set(|_| {})); // second registration is rejected
/// callback.invoke(2);
/// ```
pub struct Callback<A> {
    slot: OnceLock<Box<dyn Fn(A) + Send + Sync>>,
}

impl<A> Callback<A> {
    pub fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    /// Registers the handler. Returns `false` when one is already
    /// registered; the existing handler stays in place.
    pub fn set<F>(&self, handler: F) -> bool
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        self.slot.set(Box::new(handler)).is_ok()
    }

    /// Returns `true` once a handler has been registered.
    pub fn is_set(&self) -> bool {
        self.slot.get().is_some()
    }

    /// Invokes the handler synchronously; a no-op when none is registered.
    pub fn invoke(&self, arg: A) {
        if let Some(handler) = self.slot.get() {
            handler(arg);
        }
    }
}

impl<A> Default for Callback<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Callback<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback")
            .field("set", &self.is_set())
            .finish()
    }
}
