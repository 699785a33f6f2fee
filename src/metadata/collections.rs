//! One-to-many ownership between member objects.
//!
//! An [`OwnedCollection`] lives inside its owner and holds the owned members (a type's methods,
//! a map's events, a member's custom attributes). Items point back at their owner through a
//! weak reference that the collection maintains: [`OwnedCollection::push`] attaches,
//! [`OwnedCollection::remove`] detaches.
//!
//! Collections of row-backed owners start out with a thunk that gathers the items from the
//! tables on first access.

use std::{
    fmt,
    sync::{Arc, Weak},
};

use crate::{metadata::lazy::LazyValue, Error, Result};

/// Implemented by members that can be owned by an `O`.
pub trait OwnedItem<O>: Send + Sync {
    /// Returns true if this item currently belongs to a live owner
    fn has_owner(&self) -> bool;

    /// Sets or clears the owner back-reference
    fn set_owner(&self, owner: Option<Weak<O>>);
}

/// The members owned by one `O`
pub struct OwnedCollection<O, T> {
    owner: Weak<O>,
    items: LazyValue<Vec<Arc<T>>>,
}

impl<O, T> OwnedCollection<O, T>
where
    T: OwnedItem<O> + 'static,
{
    /// Creates an empty collection bound to `owner`
    pub fn new(owner: Weak<O>) -> Self {
        OwnedCollection {
            owner,
            items: LazyValue::from_value(Vec::new()),
        }
    }

    /// Creates a collection whose items are gathered by `loader` on first access
    pub fn from_thunk<F>(owner: Weak<O>, loader: F) -> Self
    where
        F: FnOnce() -> Vec<Arc<T>> + Send + 'static,
    {
        OwnedCollection {
            owner,
            items: LazyValue::from_thunk(loader),
        }
    }

    /// The owner of this collection, `None` once it has been dropped
    pub fn owner(&self) -> Option<Arc<O>> {
        self.owner.upgrade()
    }

    /// A snapshot of the items, in order
    pub fn items(&self) -> Vec<Arc<T>> {
        self.items.get()
    }

    /// Returns true once the items have been gathered or modified
    pub fn is_loaded(&self) -> bool {
        self.items.is_initialized()
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.get().len()
    }

    /// Returns true if the collection has no items
    pub fn is_empty(&self) -> bool {
        self.items.get().is_empty()
    }

    /// Returns true if `item` is part of this collection
    pub fn contains(&self, item: &Arc<T>) -> bool {
        self.items
            .get()
            .iter()
            .any(|existing| Arc::ptr_eq(existing, item))
    }

    /// Appends `item` and makes this collection's owner its owner.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `item` already has an owner
    pub fn push(&self, item: Arc<T>) -> Result<()> {
        if item.has_owner() {
            return Err(Error::InvalidArgument(
                "Member is already owned, remove it from its current owner first".to_string(),
            ));
        }

        item.set_owner(Some(self.owner.clone()));
        self.items.update(|items| items.push(item));
        Ok(())
    }

    /// Removes `item` and clears its owner. Returns false if it was not part of this collection.
    pub fn remove(&self, item: &Arc<T>) -> bool {
        let mut removed = false;
        self.items.update(|items| {
            if let Some(position) = items.iter().position(|existing| Arc::ptr_eq(existing, item)) {
                items.remove(position);
                removed = true;
            }
        });

        if removed {
            item.set_owner(None);
        }

        removed
    }
}

impl<O, T> fmt::Debug for OwnedCollection<O, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OwnedCollection")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    struct Parent {
        children: OwnedCollection<Parent, Child>,
    }

    #[derive(Default)]
    struct Child {
        parent: RwLock<Option<Weak<Parent>>>,
    }

    impl OwnedItem<Parent> for Child {
        fn has_owner(&self) -> bool {
            read_lock!(self.parent)
                .as_ref()
                .is_some_and(|parent| parent.upgrade().is_some())
        }

        fn set_owner(&self, owner: Option<Weak<Parent>>) {
            *write_lock!(self.parent) = owner;
        }
    }

    fn parent() -> Arc<Parent> {
        Arc::new_cyclic(|weak| Parent {
            children: OwnedCollection::new(weak.clone()),
        })
    }

    #[test]
    fn push_attaches() {
        let parent = parent();
        let child = Arc::new(Child::default());

        parent.children.push(child.clone()).unwrap();
        assert!(child.has_owner());
        assert!(parent.children.contains(&child));
        assert_eq!(parent.children.len(), 1);
        assert!(Arc::ptr_eq(&parent.children.owner().unwrap(), &parent));
    }

    #[test]
    fn push_rejects_owned() {
        let first = parent();
        let second = parent();
        let child = Arc::new(Child::default());

        first.children.push(child.clone()).unwrap();
        assert!(matches!(
            second.children.push(child.clone()),
            Err(Error::InvalidArgument(_))
        ));
        assert!(second.children.is_empty());
    }

    #[test]
    fn remove_detaches() {
        let first = parent();
        let second = parent();
        let child = Arc::new(Child::default());

        first.children.push(child.clone()).unwrap();
        assert!(first.children.remove(&child));
        assert!(!first.children.remove(&child));
        assert!(!child.has_owner());

        second.children.push(child.clone()).unwrap();
        assert!(second.children.contains(&child));
        assert!(!first.children.contains(&child));
    }

    #[test]
    fn lazy_items() {
        let preloaded = Arc::new(Child::default());
        let parent = {
            let preloaded = preloaded.clone();
            Arc::new_cyclic(|weak: &Weak<Parent>| Parent {
                children: OwnedCollection::from_thunk(weak.clone(), move || vec![preloaded]),
            })
        };

        assert!(!parent.children.is_loaded());
        let extra = Arc::new(Child::default());
        parent.children.push(extra.clone()).unwrap();

        let items = parent.children.items();
        assert_eq!(items.len(), 2);
        assert!(Arc::ptr_eq(&items[0], &preloaded));
        assert!(Arc::ptr_eq(&items[1], &extra));
    }

    #[test]
    fn owner_dropped() {
        let child = Arc::new(Child::default());
        {
            let parent = parent();
            parent.children.push(child.clone()).unwrap();
        }

        // The collection held the child, not the other way around
        assert!(!child.has_owner());
    }
}
