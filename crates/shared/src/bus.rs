use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::models::Side;

/// Name of the hover event a pane's layer handlers produce.
pub fn hovered_event(side: Side) -> String {
    format!("tract-{side}-hovered")
}

pub trait EventBus {
    fn emit(&self, event: &str, payload: Option<&str>);
}

pub type Handler = Rc<dyn Fn(Option<&str>)>;

/// Minimal single-threaded publish/subscribe bus.
#[derive(Default)]
pub struct Emitter {
    handlers: RefCell<HashMap<String, Vec<Handler>>>,
}

impl Emitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&self, event: &str, handler: impl Fn(Option<&str>) + 'static) {
        self.handlers
            .borrow_mut()
            .entry(event.to_string())
            .or_default()
            .push(Rc::new(handler));
    }

    /// Drop every handler registered for `event`.
    pub fn clear(&self, event: &str) {
        self.handlers.borrow_mut().remove(event);
    }

    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers.borrow().get(event).map_or(0, Vec::len)
    }
}

impl EventBus for Emitter {
    fn emit(&self, event: &str, payload: Option<&str>) {
        // Snapshot so handlers may subscribe or emit re-entrantly.
        let handlers: Vec<Handler> = match self.handlers.borrow().get(event) {
            Some(list) => list.clone(),
            None => return,
        };
        for handler in handlers {
            handler(payload);
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let handlers = self.handlers.borrow();
        let mut events: Vec<_> = handlers.keys().collect();
        events.sort();
        f.debug_struct("Emitter").field("events", &events).finish()
    }
}
