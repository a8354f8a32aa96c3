use std::fmt;
use std::sync::Arc;

/// How a renderer should treat the data of a [`UiState`](crate::UiState).
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StateTag {
    #[default]
    Content,
    Loading,
    /// Carries the failure; the data next to it is the last known value.
    Error(StateError),
}

impl StateTag {
    pub fn is_content(&self) -> bool {
        matches!(self, StateTag::Content)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, StateTag::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, StateTag::Error(_))
    }

    pub fn error(&self) -> Option<&StateError> {
        match self {
            StateTag::Error(e) => Some(e),
            _ => None,
        }
    }
}

/// Shared, cloneable cause of a failed mutation.
///
/// Two `StateError`s compare equal only when they come from the same failure.
#[derive(Clone)]
pub struct StateError(Arc<anyhow::Error>);

impl StateError {
    pub fn new(cause: impl Into<anyhow::Error>) -> Self {
        Self(Arc::new(cause.into()))
    }

    pub fn cause(&self) -> &anyhow::Error {
        &self.0
    }

    /// The original error value, if it was an `E`.
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        self.0.downcast_ref::<E>()
    }

    /// Whether the mutation panicked rather than returning an error.
    pub fn is_panic(&self) -> bool {
        self.downcast_ref::<uiflow_core::Error>()
            .is_some_and(|e| matches!(e, uiflow_core::Error::Panicked { .. }))
    }
}

impl PartialEq for StateError {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("StateError").field(&self.0).finish()
    }
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#}", self.0)
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let cause: &(dyn std::error::Error + Send + Sync + 'static) = &**self.0;
        Some(cause)
    }
}
