use std::sync::Arc;

use uiflow_core::Observable;

use crate::{StateTag, UiState};

/// Handle given to mutation blocks.
///
/// Every data write is published immediately with the current tag.
pub struct StateUpdater<T: 'static> {
    state: Observable<UiState<T>>,
}

impl<T> Clone for StateUpdater<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<T: Send + Sync + 'static> StateUpdater<T> {
    pub(crate) fn new(state: Observable<UiState<T>>) -> Self {
        Self { state }
    }

    pub fn data(&self) -> Arc<T> {
        self.state.get().shared_data().clone()
    }

    pub fn tag(&self) -> StateTag {
        self.state.get().tag().clone()
    }

    /// Replaces the data with `f(current)`.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        self.state.update(|state| state.with_data(f(state.data())));
    }

    pub fn set(&self, data: T) {
        self.state.update(|state| state.with_data(data));
    }

    /// Sets the tag. Re-setting `Content` or `Loading` over itself is not
    /// published.
    pub fn set_tag(&self, tag: StateTag) {
        self.state.try_update(|state| {
            let unchanged = matches!(
                (state.tag(), &tag),
                (StateTag::Content, StateTag::Content) | (StateTag::Loading, StateTag::Loading)
            );
            if unchanged {
                return None;
            }
            log::trace!("state tag {:?} -> {:?}", state.tag(), tag);
            Some((state.with_tag(tag), ()))
        });
    }
}
