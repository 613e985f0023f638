//! Observable latest-value cells.
//!
//! A [`Property`] always holds a value, and every subscriber can read the
//! latest one or await the next change. It is the building block for
//! `StickerInfo` fields and for flags shared between view-models.

use tokio::sync::watch;

/// Observable value with a single owner that writes and any number of
/// readers that observe.
pub struct Property<T> {
    sender: watch::Sender<T>,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        let (sender, _receiver) = watch::channel(value);
        Self { sender }
    }

    /// Replace the value and notify subscribers, even if it is unchanged.
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Subscribe to changes. The receiver starts out seeing the current
    /// value as already observed.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }

    /// Borrow the current value.
    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.sender.borrow()
    }
}

impl<T: Clone> Property<T> {
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }
}

impl<T: PartialEq> Property<T> {
    /// Store `value` only when it differs from the current one.
    ///
    /// Returns `true` when subscribers were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        })
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Property").field(&*self.sender.borrow()).finish()
    }
}
