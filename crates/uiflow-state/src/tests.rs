#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Arc;
    use std::task::{Context, Poll, Waker};

    use parking_lot::Mutex;

    use crate::*;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct SampleState {
        name: String,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        count: u32,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("invalid name: {0}")]
    struct InvalidName(String);

    fn record<T: Send + Sync + 'static>(
        owner: &impl UiStateOwner<T>,
    ) -> (Arc<Mutex<Vec<UiState<T>>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sub = owner.observe_state({
            let seen = seen.clone();
            move |state| seen.lock().push(state.clone())
        });
        (seen, sub)
    }

    fn tags<T>(seen: &Mutex<Vec<UiState<T>>>) -> Vec<StateTag> {
        seen.lock().iter().map(|s| s.tag().clone()).collect()
    }

    /// Suspends once before completing.
    struct YieldNow(bool);

    impl Future for YieldNow {
        type Output = ();

        fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
            if self.0 {
                Poll::Ready(())
            } else {
                self.0 = true;
                cx.waker().wake_by_ref();
                Poll::Pending
            }
        }
    }

    fn yield_now() -> YieldNow {
        YieldNow(false)
    }

    #[test]
    fn test_initial_envelope_emitted_once() {
        let handler = StateHandler::new(SampleState::default());
        let (seen, _sub) = record(&handler);

        assert_eq!(
            *seen.lock(),
            vec![UiState::new(SampleState::default(), StateTag::Content)]
        );
    }

    #[test]
    fn test_initial_custom_tag() {
        let handler = StateHandler::with_tag(SampleState::default(), StateTag::Loading);
        let (seen, _sub) = record(&handler);

        assert_eq!(tags(&seen), vec![StateTag::Loading]);
        assert_eq!(seen.lock()[0].data(), &SampleState::default());
    }

    #[test]
    fn test_update_sync_counter() {
        let handler = StateHandler::new(Counter { count: 0 });

        handler.update_sync(|s| {
            s.update(|c| Counter { count: c.count + 5 });
            Ok(())
        });

        assert_eq!(handler.state(), UiState::new(Counter { count: 5 }, StateTag::Content));
    }

    #[test]
    fn test_update_sync_publishes_every_write() {
        let handler = StateHandler::new(Counter { count: 0 });
        let (seen, _sub) = record(&handler);

        handler.update_sync(|s| {
            s.set(Counter { count: 1 });
            s.update(|c| Counter { count: c.count * 10 });
            assert_eq!(s.data().count, 10);
            Ok(())
        });

        let counts: Vec<u32> = seen.lock().iter().map(|s| s.data().count).collect();
        assert_eq!(counts, vec![0, 1, 10]);
        assert!(seen.lock().iter().all(|s| s.tag().is_content()));
    }

    // The container overwrites the tag on a normal return.
    #[test]
    fn test_update_sync_ok_overrides_block_tag() {
        let handler = StateHandler::new(SampleState::default());
        let (seen, _sub) = record(&handler);

        handler.update_sync(|s| {
            s.set_tag(StateTag::Error(StateError::new(InvalidName("x".into()))));
            s.set(SampleState { name: "new name".into() });
            Ok(())
        });

        let final_state = seen.lock().last().cloned().unwrap();
        assert_eq!(final_state.data().name, "new name");
        assert!(final_state.tag().is_content());
        assert!(tags(&seen)[1].is_error());
    }

    #[test]
    fn test_update_sync_error_is_captured() {
        let handler = StateHandler::new(SampleState { name: "kept".into() });

        handler.update_sync(|_| Err(InvalidName("".into()).into()));

        let state = handler.state();
        let error = state.tag().error().expect("error tag");
        assert!(error.downcast_ref::<InvalidName>().is_some());
        assert_eq!(error.to_string(), "invalid name: ");
        assert!(!error.is_panic());
        assert_eq!(state.data().name, "kept");
    }

    #[test]
    fn test_update_sync_keeps_writes_before_failure() {
        let handler = StateHandler::new(Counter { count: 1 });

        handler.update_sync(|s| {
            s.set(Counter { count: 2 });
            anyhow::bail!("late failure")
        });

        assert_eq!(handler.peek().count, 2);
        assert!(handler.state().tag().is_error());
    }

    #[test]
    fn test_update_sync_panic_is_captured() {
        let handler = StateHandler::new(Counter { count: 0 });

        handler.update_sync(|_| panic!("mutator exploded"));

        let state = handler.state();
        let error = state.tag().error().expect("error tag");
        assert!(error.is_panic());
        assert_eq!(error.to_string(), "mutation panicked: mutator exploded");
    }

    #[test]
    fn test_update_async_without_loading() {
        let handler = StateHandler::new(SampleState::default());
        let (seen, _sub) = record(&handler);

        pollster::block_on(handler.update_async(false, |s| async move {
            yield_now().await;
            s.update(|d| SampleState { name: format!("{}new name", d.name) });
            Ok(())
        }));

        assert_eq!(seen.lock().len(), 2);
        assert_eq!(seen.lock()[1].data().name, "new name");
        assert!(!tags(&seen).contains(&StateTag::Loading));
    }

    #[test]
    fn test_update_async_shows_loading_then_content() {
        let handler = StateHandler::new(SampleState::default());
        let (seen, _sub) = record(&handler);

        pollster::block_on(handler.update_async(true, |s| async move {
            assert!(s.tag().is_loading());
            yield_now().await;
            s.set(SampleState { name: "new name".into() });
            Ok(())
        }));

        assert_eq!(
            tags(&seen),
            vec![
                StateTag::Content,
                StateTag::Loading,
                StateTag::Loading,
                StateTag::Content
            ]
        );
        assert_eq!(seen.lock()[2].data().name, "new name");
    }

    #[test]
    fn test_update_async_error_after_loading() {
        let handler = StateHandler::new(SampleState::default());
        let (seen, _sub) = record(&handler);

        pollster::block_on(handler.update_async(true, |_| async {
            yield_now().await;
            Err(InvalidName("async".into()).into())
        }));

        let tags = tags(&seen);
        assert_eq!(tags.len(), 3);
        assert!(tags[1].is_loading());
        let error = tags[2].error().expect("error tag");
        assert_eq!(
            error.downcast_ref::<InvalidName>().map(|e| e.0.as_str()),
            Some("async")
        );
    }

    #[test]
    fn test_update_async_panic_is_captured() {
        let handler = StateHandler::new(Counter { count: 0 });

        pollster::block_on(handler.update_async(false, |s| async move {
            yield_now().await;
            if s.data().count == 0 {
                panic!("division by zero");
            }
            Ok(())
        }));

        assert!(handler.state().tag().error().is_some_and(StateError::is_panic));
    }

    #[test]
    fn test_update_async_dropped_mid_flight_stays_loading() {
        let handler = StateHandler::new(Counter { count: 0 });

        {
            let mut fut = Box::pin(handler.update_async(true, |_| async {
                yield_now().await;
                Ok(())
            }));
            let mut cx = Context::from_waker(Waker::noop());
            assert!(fut.as_mut().poll(&mut cx).is_pending());
        }

        assert!(handler.state().tag().is_loading());
    }

    #[test]
    fn test_run_catching_transitions_only_the_tag() {
        let handler = StateHandler::new(Counter { count: 3 });
        let (seen, _sub) = record(&handler);
        let before = handler.peek();

        pollster::block_on(handler.run_catching(true, async {
            yield_now().await;
            Ok(())
        }));

        assert_eq!(
            tags(&seen),
            vec![StateTag::Content, StateTag::Loading, StateTag::Content]
        );
        assert!(Arc::ptr_eq(&before, &handler.peek()));
    }

    #[test]
    fn test_run_catching_error_without_loading() {
        let handler = StateHandler::new(Counter { count: 3 });
        let (seen, _sub) = record(&handler);

        pollster::block_on(handler.run_catching(false, async {
            Err(InvalidName("side effect".into()).into())
        }));

        let tags = tags(&seen);
        assert_eq!(tags.len(), 2);
        assert!(tags[1].is_error());
        assert_eq!(handler.peek().count, 3);
    }

    #[test]
    fn test_run_catching_panic_is_captured() {
        let handler = StateHandler::new(Counter { count: 3 });
        let before = handler.peek();

        pollster::block_on(handler.run_catching(true, async {
            yield_now().await;
            if before.count == 3 {
                panic!("socket closed");
            }
            Ok(())
        }));

        let error = handler.state().tag().error().cloned().unwrap();
        assert!(error.is_panic());
        assert_eq!(error.to_string(), "mutation panicked: socket closed");
        assert!(Arc::ptr_eq(&before, &handler.peek()));
    }

    #[test]
    fn test_observer_panic_does_not_abort_mutation() {
        let handler = StateHandler::new(Counter { count: 0 });
        let _view_sub = handler.observe_data(|c: &Counter| {
            if c.count == 1 {
                panic!("view bug");
            }
        });
        let (seen, _sub) = record(&handler);

        handler.update_sync(|s| {
            s.set(Counter { count: 1 });
            s.set(Counter { count: 2 });
            Ok(())
        });

        assert_eq!(handler.peek().count, 2);
        assert!(handler.state().tag().is_content());
        let counts: Vec<u32> = seen.lock().iter().map(|s| s.data().count).collect();
        assert_eq!(counts, vec![0, 1, 2]);
    }

    #[test]
    fn test_recovers_from_error_on_next_success() {
        let handler = StateHandler::new(Counter { count: 0 });

        handler.update_sync(|_| anyhow::bail!("first"));
        assert!(handler.state().tag().is_error());

        handler.update_sync(|s| {
            s.set(Counter { count: 1 });
            Ok(())
        });
        assert!(handler.state().tag().is_content());
    }

    #[test]
    fn test_observe_data_skips_tag_only_changes() {
        let handler = StateHandler::new(Counter { count: 0 });
        let seen = Arc::new(Mutex::new(Vec::new()));
        let _sub = handler.observe_data({
            let seen = seen.clone();
            move |c: &Counter| seen.lock().push(c.count)
        });

        pollster::block_on(handler.run_catching(true, async { Ok(()) }));
        handler.update_sync(|_| anyhow::bail!("nope"));
        handler.update_sync(|s| {
            s.set(Counter { count: 4 });
            Ok(())
        });

        assert_eq!(*seen.lock(), vec![0, 4]);
    }

    #[test]
    fn test_observe_data_subscribers_are_independent() {
        let handler = StateHandler::new(Counter { count: 0 });
        handler.update_sync(|s| {
            s.set(Counter { count: 1 });
            Ok(())
        });

        let first = Arc::new(Mutex::new(Vec::new()));
        let _a = handler.observe_data({
            let first = first.clone();
            move |c: &Counter| first.lock().push(c.count)
        });
        let second = Arc::new(Mutex::new(Vec::new()));
        let _b = handler.view().observe_data({
            let second = second.clone();
            move |c: &Counter| second.lock().push(c.count)
        });

        assert_eq!(*first.lock(), vec![1]);
        assert_eq!(*second.lock(), vec![1]);
    }

    #[test]
    fn test_view_tracks_handler() {
        let handler = StateHandler::new(SampleState::default());
        let view = handler.view();
        let (seen, _sub) = record(&view);

        handler.update_sync(|s| {
            s.set(SampleState { name: "shared".into() });
            Ok(())
        });

        assert_eq!(view.peek().name, "shared");
        assert_eq!(seen.lock().len(), 2);
    }

    struct NameModel {
        state: StateHandler<SampleState>,
    }

    crate::delegate_ui_state!(NameModel => state: SampleState);

    impl NameModel {
        fn rename(&self, name: &str) {
            let name = name.to_string();
            self.update_sync(move |s| {
                if name.is_empty() {
                    return Err(InvalidName(name).into());
                }
                s.set(SampleState { name });
                Ok(())
            });
        }
    }

    #[test]
    fn test_delegated_owner_forwards() {
        let model = NameModel {
            state: StateHandler::default(),
        };
        let (seen, _sub) = record(&model);

        model.rename("delegated");
        assert_eq!(model.peek().name, "delegated");

        model.rename("");
        assert!(model.state().tag().is_error());

        pollster::block_on(model.update_async(true, |s| async move {
            s.set(SampleState { name: "async".into() });
            Ok(())
        }));
        assert_eq!(UiStateOwner::state(&model).data().name, "async");
        assert!(tags(&seen).last().is_some_and(StateTag::is_content));
    }

    #[test]
    fn test_handler_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StateHandler<Counter>>();
        assert_send_sync::<StateView<Counter>>();
        assert_send_sync::<StateUpdater<Counter>>();
    }
}
