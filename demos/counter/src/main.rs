use std::thread;
use std::time::Duration;

use uiflow_event::{EventHandler, OneShot};
use uiflow_state::{
    MutableUiStateOwner, StateHandler, StateTag, UiState, UiStateOwner, delegate_ui_state,
};

#[derive(Clone, Debug, Default)]
struct CounterState {
    count: i32,
    history: Vec<i32>,
}

impl CounterState {
    fn step(&self, by: i32) -> Self {
        let mut history = self.history.clone();
        history.push(self.count);
        Self {
            count: self.count + by,
            history,
        }
    }
}

#[derive(Clone, Debug)]
enum CounterEvent {
    Toast(String),
}

struct CounterModel {
    state: StateHandler<CounterState>,
    events: EventHandler<OneShot<CounterEvent>>,
}

delegate_ui_state!(CounterModel => state: CounterState);

impl CounterModel {
    fn new() -> Self {
        Self {
            state: StateHandler::default(),
            events: EventHandler::new(),
        }
    }

    fn increment(&self) {
        self.update_sync(|s| {
            s.update(|c| c.step(1));
            Ok(())
        });
    }

    fn decrement(&self) {
        self.update_sync(|s| {
            if s.data().count == 0 {
                anyhow::bail!("counter can't go below zero");
            }
            s.update(|c| c.step(-1));
            Ok(())
        });
    }

    async fn sync_remote(&self) {
        let events = self.events.clone();
        self.run_catching(true, async move {
            // Stand-in for network latency.
            thread::sleep(Duration::from_millis(50));
            events.send(OneShot::new(CounterEvent::Toast("synced".into())));
            Ok(())
        })
        .await;
    }
}

fn render(state: &UiState<CounterState>) {
    match state.tag() {
        StateTag::Content => println!("count = {}", state.data().count),
        StateTag::Loading => println!("count = {} (syncing...)", state.data().count),
        StateTag::Error(e) => println!("count = {} [error: {e}]", state.data().count),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let model = CounterModel::new();
    let _view = model.observe_state(render);
    let _toasts = model.events.receive_events(|event| match event.into_payload() {
        CounterEvent::Toast(msg) => println!("toast: {msg}"),
    });

    model.decrement();
    model.increment();
    model.increment();
    pollster::block_on(model.sync_remote());
    model.decrement();

    log::info!("history: {:?}", model.peek().history);
    Ok(())
}
