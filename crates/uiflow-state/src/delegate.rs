/// Implements [`UiStateOwner`](crate::UiStateOwner) and
/// [`MutableUiStateOwner`](crate::MutableUiStateOwner) for an owner type by
/// forwarding to one of its fields.
///
/// ```rust
/// use uiflow_state::*;
///
/// #[derive(Clone, Default)]
/// struct Profile {
///     name: String,
/// }
///
/// struct ProfileModel {
///     state: StateHandler<Profile>,
/// }
///
/// delegate_ui_state!(ProfileModel => state: Profile);
///
/// let model = ProfileModel { state: StateHandler::default() };
/// model.update_sync(|s| {
///     s.update(|p| Profile { name: format!("{}!", p.name) });
///     Ok(())
/// });
/// assert_eq!(model.peek().name, "!");
/// ```
#[macro_export]
macro_rules! delegate_ui_state {
    ($owner:ty => $field:ident : $data:ty) => {
        impl $crate::UiStateOwner<$data> for $owner {
            fn state(&self) -> $crate::UiState<$data> {
                $crate::UiStateOwner::state(&self.$field)
            }

            fn observe_state(
                &self,
                f: impl Fn(&$crate::UiState<$data>) + Send + Sync + 'static,
            ) -> $crate::Subscription {
                $crate::UiStateOwner::observe_state(&self.$field, f)
            }

            fn observe_data(
                &self,
                f: impl Fn(&$data) + Send + Sync + 'static,
            ) -> $crate::Subscription {
                $crate::UiStateOwner::observe_data(&self.$field, f)
            }
        }

        impl $crate::MutableUiStateOwner<$data> for $owner {
            fn update_sync<F>(&self, mutator: F)
            where
                F: FnOnce(&$crate::StateUpdater<$data>) -> $crate::anyhow::Result<()>,
            {
                $crate::MutableUiStateOwner::update_sync(&self.$field, mutator)
            }

            fn update_async<F, Fut>(
                &self,
                show_loading: bool,
                mutator: F,
            ) -> impl ::std::future::Future<Output = ()>
            where
                F: FnOnce($crate::StateUpdater<$data>) -> Fut,
                Fut: ::std::future::Future<Output = $crate::anyhow::Result<()>>,
            {
                $crate::MutableUiStateOwner::update_async(&self.$field, show_loading, mutator)
            }

            fn run_catching<Fut>(
                &self,
                show_loading: bool,
                block: Fut,
            ) -> impl ::std::future::Future<Output = ()>
            where
                Fut: ::std::future::Future<Output = $crate::anyhow::Result<()>>,
            {
                $crate::MutableUiStateOwner::run_catching(&self.$field, show_loading, block)
            }
        }
    };
}
