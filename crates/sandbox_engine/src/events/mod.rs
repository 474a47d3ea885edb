//! World notification events
//!
//! Every mutating registry operation emits a typed event so UI, input, and
//! persistence collaborators can react without polling. Handlers are
//! registered up front and dispatched synchronously, in call order, on the
//! host's frame/input thread.

use crate::renderable::ResourceKey;
use crate::world::InstanceId;

/// Notification emitted by the placement registry
///
/// Payloads carry the instance id and the operation's resulting state.
#[derive(Debug, Clone, PartialEq)]
pub enum WorldEvent {
    /// An entry was placed into the world
    Placed {
        /// New entry id
        id: InstanceId,
        /// Resource the entry renders
        key: ResourceKey,
        /// World position
        x: f32,
        /// World position
        y: f32,
        /// Assigned draw-order index
        z_index: u32,
    },
    /// An entry was removed and its renderable returned to the pool
    Removed {
        /// Removed entry id
        id: InstanceId,
        /// Resource the entry rendered
        key: ResourceKey,
    },
    /// An entry moved
    Moved {
        /// Entry id
        id: InstanceId,
        /// New world position
        x: f32,
        /// New world position
        y: f32,
    },
    /// An entry rotated
    Rotated {
        /// Entry id
        id: InstanceId,
        /// New rotation in radians
        radians: f32,
    },
    /// An entry's scale changed
    Scaled {
        /// Entry id
        id: InstanceId,
        /// New X scale factor
        sx: f32,
        /// New Y scale factor
        sy: f32,
    },
    /// An entry's collision flag was toggled
    CollisionChanged {
        /// Entry id
        id: InstanceId,
        /// Whether collision is now enabled
        enabled: bool,
    },
    /// The selected entry changed
    SelectionChanged {
        /// Previously selected entry, if any
        previous: Option<InstanceId>,
        /// Newly selected entry, if any
        current: Option<InstanceId>,
    },
    /// The world was cleared
    Cleared {
        /// Number of entries removed
        removed: usize,
    },
}

/// Handler for world notifications
pub trait WorldListener {
    /// Called for every emitted event, in emission order
    fn on_world_event(&mut self, event: &WorldEvent);
}

/// Registration and synchronous dispatch of world listeners
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn WorldListener>>,
}

impl EventDispatcher {
    /// Create a dispatcher with no listeners
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener; it receives every subsequent event
    pub fn subscribe(&mut self, listener: Box<dyn WorldListener>) {
        self.listeners.push(listener);
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver an event to every listener, in registration order
    pub fn emit(&mut self, event: &WorldEvent) {
        for listener in &mut self.listeners {
            listener.on_world_event(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingListener {
        log: Rc<RefCell<Vec<WorldEvent>>>,
    }

    impl WorldListener for RecordingListener {
        fn on_world_event(&mut self, event: &WorldEvent) {
            self.log.borrow_mut().push(event.clone());
        }
    }

    #[test]
    fn test_dispatch_in_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(Box::new(RecordingListener { log: log.clone() }));

        let id = InstanceId::from_raw(1);
        dispatcher.emit(&WorldEvent::Moved { id, x: 1.0, y: 2.0 });
        dispatcher.emit(&WorldEvent::Rotated { id, radians: 0.5 });

        let events = log.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], WorldEvent::Moved { id, x: 1.0, y: 2.0 });
        assert_eq!(events[1], WorldEvent::Rotated { id, radians: 0.5 });
    }

    #[test]
    fn test_all_listeners_notified() {
        let first = Rc::new(RefCell::new(Vec::new()));
        let second = Rc::new(RefCell::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(Box::new(RecordingListener { log: first.clone() }));
        dispatcher.subscribe(Box::new(RecordingListener { log: second.clone() }));

        dispatcher.emit(&WorldEvent::Cleared { removed: 3 });

        assert_eq!(first.borrow().len(), 1);
        assert_eq!(second.borrow().len(), 1);
    }
}
