/// Acquires a mutex guard.
///
/// ```rust, ignore
///  let mut pending = lock!(self.thunk);
/// ```
macro_rules! lock {
    ($mutex:expr) => {
        $mutex.lock().expect("mutex poisoned")
    };
}

/// Acquires a read guard on an `RwLock` holding member state.
///
/// Lock poisoning means a writer panicked while holding the guard, the member is unusable
/// from then on.
///
/// ```rust, ignore
///  let map = read_lock!(self.image).upgrade();
/// ```
macro_rules! read_lock {
    ($rwlock:expr) => {
        $rwlock.read().expect("member lock poisoned")
    };
}

/// Acquires a write guard on an `RwLock` holding member state.
///
/// ```rust, ignore
///  *write_lock!(self.image) = Weak::new();
/// ```
macro_rules! write_lock {
    ($rwlock:expr) => {
        $rwlock.write().expect("member lock poisoned")
    };
}
