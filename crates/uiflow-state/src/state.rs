use std::fmt;
use std::sync::Arc;

use crate::StateTag;

/// Envelope observed by the view: the data plus how to render it.
///
/// Replaced as a whole on every change. Tag-only transitions keep the same
/// data allocation, which is how [`observe_data`](crate::UiStateOwner::observe_data)
/// tells them apart from data writes.
pub struct UiState<T> {
    data: Arc<T>,
    tag: StateTag,
}

impl<T> UiState<T> {
    pub fn new(data: T, tag: StateTag) -> Self {
        Self {
            data: Arc::new(data),
            tag,
        }
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn shared_data(&self) -> &Arc<T> {
        &self.data
    }

    pub fn tag(&self) -> &StateTag {
        &self.tag
    }

    pub(crate) fn with_data(&self, data: T) -> Self {
        Self {
            data: Arc::new(data),
            tag: self.tag.clone(),
        }
    }

    pub(crate) fn with_tag(&self, tag: StateTag) -> Self {
        Self {
            data: self.data.clone(),
            tag,
        }
    }
}

impl<T> Clone for UiState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl<T: PartialEq> PartialEq for UiState<T> {
    fn eq(&self, other: &Self) -> bool {
        self.tag == other.tag && (Arc::ptr_eq(&self.data, &other.data) || self.data == other.data)
    }
}

impl<T: fmt::Debug> fmt::Debug for UiState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiState")
            .field("data", &self.data)
            .field("tag", &self.tag)
            .finish()
    }
}
