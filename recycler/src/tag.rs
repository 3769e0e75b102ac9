use alloc::string::String;
use alloc::sync::Arc;
use core::any::Any;
use core::fmt;

trait TagValue: Any + fmt::Debug + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq_value(&self, other: &dyn TagValue) -> bool;
}

impl<T: Any + PartialEq + fmt::Debug + Send + Sync> TagValue for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq_value(&self, other: &dyn TagValue) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }
}

/// An opaque, equality-comparable value attached to an item for later lookup.
///
/// Two tags are equal when they wrap the same Rust type and the wrapped values compare equal.
/// `Tag::from("a")` and `Tag::from(String::from("a"))` are therefore different tags.
#[derive(Clone)]
pub struct Tag(Arc<dyn TagValue>);

impl Tag {
    pub fn new<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self(Arc::new(value))
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0.eq_value(&*other.0)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.0).finish()
    }
}

impl From<&'static str> for Tag {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl From<u64> for Tag {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}
