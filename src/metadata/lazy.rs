//! Deferred, overridable single-slot values.
//!
//! Every resolvable attribute of a member object is a [`LazyValue`]. Members built by hand start
//! with a known value, members loaded from a table start with a thunk that reads the backing row
//! on first access.
//!
//! # Thread Safety
//!
//! The initialize-once transition is guarded: the pending thunk sits behind a mutex, so racing
//! first reads evaluate it exactly once. The value itself sits behind a reader-writer lock and
//! a write always wins, even over a thunk that is being evaluated at the same moment.

use std::{
    fmt,
    sync::{Mutex, RwLock},
};

type Thunk<T> = Box<dyn FnOnce() -> T + Send>;

/// A value that is either known, or computed on first read by a thunk.
///
/// ```rust
/// use cilgraph::metadata::lazy::LazyValue;
///
/// let name = LazyValue::from_thunk(|| "Changed".to_string());
/// assert!(!name.is_initialized());
/// assert_eq!(name.get(), "Changed");
///
/// name.set("Closed".to_string());
/// assert_eq!(name.get(), "Closed");
/// ```
pub struct LazyValue<T> {
    value: RwLock<Option<T>>,
    thunk: Mutex<Option<Thunk<T>>>,
}

impl<T: Clone + Default> LazyValue<T> {
    /// Creates an initialized value
    pub fn from_value(value: T) -> Self {
        LazyValue {
            value: RwLock::new(Some(value)),
            thunk: Mutex::new(None),
        }
    }

    /// Creates a value that is computed by `thunk` on first read
    pub fn from_thunk<F>(thunk: F) -> Self
    where
        F: FnOnce() -> T + Send + 'static,
    {
        LazyValue {
            value: RwLock::new(None),
            thunk: Mutex::new(Some(Box::new(thunk))),
        }
    }

    /// Returns true once the value has been read or written
    pub fn is_initialized(&self) -> bool {
        read_lock!(self.value).is_some()
    }

    /// Returns the value, evaluating the pending thunk if this is the first read.
    ///
    /// The thunk runs at most once over the lifetime of this cell.
    pub fn get(&self) -> T {
        if let Some(value) = read_lock!(self.value).as_ref() {
            return value.clone();
        }

        let mut pending = lock!(self.thunk);
        if let Some(value) = read_lock!(self.value).as_ref() {
            return value.clone();
        }

        let computed = match pending.take() {
            Some(thunk) => thunk(),
            None => T::default(),
        };

        let mut slot = write_lock!(self.value);
        match slot.as_ref() {
            // Written while the thunk was running
            Some(written) => written.clone(),
            None => {
                *slot = Some(computed.clone());
                computed
            }
        }
    }

    /// Overrides the value, discarding a pending thunk
    pub fn set(&self, value: T) {
        *write_lock!(self.value) = Some(value);

        // A reader evaluating the thunk holds the lock; it drops the thunk itself
        if let Ok(mut pending) = self.thunk.try_lock() {
            pending.take();
        }
    }

    /// Mutates the value in place, evaluating the pending thunk first if needed
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let current = self.get();
        let mut slot = write_lock!(self.value);
        match slot.as_mut() {
            Some(value) => f(value),
            None => {
                let mut value = current;
                f(&mut value);
                *slot = Some(value);
            }
        }
    }
}

impl<T: Clone + Default> Default for LazyValue<T> {
    fn default() -> Self {
        LazyValue::from_value(T::default())
    }
}

impl<T: Clone + Default> From<T> for LazyValue<T> {
    fn from(value: T) -> Self {
        LazyValue::from_value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for LazyValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value.try_read() {
            Ok(guard) => match guard.as_ref() {
                Some(value) => f.debug_tuple("LazyValue").field(value).finish(),
                None => f.write_str("LazyValue(<pending>)"),
            },
            Err(_) => f.write_str("LazyValue(<locked>)"),
        }
    }
}
