//! Object identities: stable, comparable keys for guard entries.

use core::fmt;
use std::rc::Rc;
use std::sync::Arc;

/// Identity of an object for the lifetime of that object.
///
/// Identities derived from `Rc`/`Arc`/references are allocation addresses.
/// Runtimes with their own object ids can build one with `from_raw`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct ObjectId(usize);

impl ObjectId {
    /// Pairing used when a detector call names no paired object.
    pub const UNPAIRED: ObjectId = ObjectId(usize::MAX);

    /// Value stored by the simple guard for a marked identity.
    pub const GUARD_MARK: ObjectId = ObjectId(usize::MAX - 1);

    #[inline]
    pub const fn from_raw(raw: usize) -> Self {
        ObjectId(raw)
    }

    #[inline]
    pub const fn as_raw(self) -> usize {
        self.0
    }

    /// True for the two reserved sentinel values.
    #[inline]
    pub const fn is_reserved(self) -> bool {
        self.0 >= usize::MAX - 1
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ObjectId::UNPAIRED => f.write_str("ObjectId(unpaired)"),
            ObjectId::GUARD_MARK => f.write_str("ObjectId(guard-mark)"),
            ObjectId(raw) => write!(f, "ObjectId({:#x})", raw),
        }
    }
}

/// Anything that can name the object a guard is keyed on.
pub trait Identity {
    fn object_id(&self) -> ObjectId;
}

impl Identity for ObjectId {
    #[inline]
    fn object_id(&self) -> ObjectId {
        *self
    }
}

impl<T: ?Sized> Identity for Rc<T> {
    #[inline]
    fn object_id(&self) -> ObjectId {
        ObjectId(Rc::as_ptr(self) as *const () as usize)
    }
}

impl<T: ?Sized> Identity for Arc<T> {
    #[inline]
    fn object_id(&self) -> ObjectId {
        ObjectId(Arc::as_ptr(self) as *const () as usize)
    }
}

impl<T: Identity + ?Sized> Identity for &T {
    #[inline]
    fn object_id(&self) -> ObjectId {
        (**self).object_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Invariant: clones of one `Rc` share an identity; distinct allocations do not.
    #[test]
    fn rc_identity_follows_allocation() {
        let a = Rc::new(vec![1, 2, 3]);
        let b = a.clone();
        let c = Rc::new(vec![1, 2, 3]);
        assert_eq!(a.object_id(), b.object_id());
        assert_ne!(a.object_id(), c.object_id());
        assert_eq!((&a).object_id(), a.object_id());
    }

    /// Invariant: unsized pointees (trait objects, slices) still yield the data address.
    #[test]
    fn unsized_rc_identity() {
        let s: Rc<str> = Rc::from("abc");
        let d: Rc<dyn core::fmt::Debug> = Rc::new(5u8);
        assert_eq!(s.object_id(), s.clone().object_id());
        assert_eq!(d.object_id(), d.clone().object_id());
        assert!(!s.object_id().is_reserved());
    }

    /// Invariant: the two sentinels are distinct and reserved.
    #[test]
    fn sentinels_are_reserved() {
        assert_ne!(ObjectId::UNPAIRED, ObjectId::GUARD_MARK);
        assert!(ObjectId::UNPAIRED.is_reserved());
        assert!(ObjectId::GUARD_MARK.is_reserved());
        assert!(!ObjectId::from_raw(42).is_reserved());
        assert_eq!(format!("{:?}", ObjectId::UNPAIRED), "ObjectId(unpaired)");
        assert_eq!(format!("{:?}", ObjectId::from_raw(16)), "ObjectId(0x10)");
    }

    /// Invariant: `Arc` identity is shared across clones.
    #[test]
    fn arc_identity_follows_allocation() {
        let a = Arc::new(1u32);
        assert_eq!(a.object_id(), Arc::clone(&a).object_id());
        assert_ne!(a.object_id(), Arc::new(1u32).object_id());
    }
}
