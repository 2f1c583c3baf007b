use std::rc::Rc;

use dioxus::prelude::*;
use tract_shared::bus::{Emitter, EventBus};
use tract_shared::state::{DashboardState, SharedState};

/// State and event bus shared by every page, provided once at the root.
///
/// `DashboardState` lives outside the signal system so map callbacks can
/// mutate it directly; `revision` is bumped after each change to re-render.
#[derive(Clone)]
pub struct AppContext {
    pub state: SharedState,
    pub bus: Rc<Emitter>,
    pub revision: Signal<u64>,
}

impl AppContext {
    pub fn new() -> Self {
        AppContext {
            state: DashboardState::new().shared(),
            bus: Rc::new(Emitter::new()),
            revision: Signal::new(0),
        }
    }

    /// Subscribe the calling component to state changes.
    pub fn track(&self) {
        let _ = self.revision.read();
    }

    pub fn bump(&self) {
        let mut revision = self.revision;
        let _ = revision.try_write().map(|mut r| *r += 1);
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut DashboardState) -> R) -> R {
        let out = f(&mut self.state.borrow_mut());
        self.bump();
        out
    }

    pub fn read<R>(&self, f: impl FnOnce(&DashboardState) -> R) -> R {
        f(&self.state.borrow())
    }

    pub fn event_bus(&self) -> Rc<dyn EventBus> {
        self.bus.clone()
    }
}
