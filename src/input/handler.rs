use crate::{
    constants::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR},
    core::geo::Point,
    input::events::{InputEvent, KeyCode, MapEvent},
    prelude::HashMap,
};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Weak};

/// Events held between calls to [`EventManager::process_events`]; beyond
/// this the oldest are dropped.
pub const MAX_PENDING_EVENTS: usize = 256;

/// What an input event asks the viewport to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Drag delta in pixels; only the signs are used
    Pan { dx: f64, dy: f64 },
    /// Extent multiplier
    Zoom { factor: f64 },
}

/// Drag tracking between pointer down and pointer up
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DragState {
    armed: bool,
    last: Point,
}

impl DragState {
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn arm(&mut self, position: Point) {
        self.armed = true;
        self.last = position;
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }

    /// Delta since the last recorded position, which becomes `position`.
    /// `None` while disarmed.
    pub fn track(&mut self, position: Point) -> Option<Point> {
        if !self.armed {
            return None;
        }
        let delta = position.subtract(&self.last);
        self.last = position;
        Some(delta)
    }
}

/// Event listener callback type
pub type EventCallback = Arc<dyn Fn(&MapEvent) + Send + Sync>;

type ListenerMap = HashMap<u64, (&'static str, EventCallback)>;

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    listeners: ListenerMap,
}

/// Event management system for the map.
///
/// Listeners live exactly as long as the [`Subscription`] returned by
/// [`EventManager::on`].
#[derive(Default)]
pub struct EventManager {
    registry: Arc<Mutex<ListenerRegistry>>,
    /// Event queue for processing
    event_queue: VecDeque<MapEvent>,
}

impl EventManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener for one event kind (see [`MapEvent::kind`]),
    /// or `"*"` for all events
    pub fn on<F>(&self, event_type: &'static str, callback: F) -> Subscription
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        let mut id = 0;
        if let Ok(mut registry) = self.registry.lock() {
            id = registry.next_id;
            registry.next_id += 1;
            registry
                .listeners
                .insert(id, (event_type, Arc::new(callback)));
        }
        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Emit an event to the queue, evicting the oldest one when full
    pub fn emit(&mut self, event: MapEvent) {
        if self.event_queue.len() >= MAX_PENDING_EVENTS {
            if let Some(dropped) = self.event_queue.pop_front() {
                log::debug!("event queue full, dropping {}", dropped.kind());
            }
        }
        self.event_queue.push_back(event);
    }

    /// Dispatch all queued events to their listeners and return them
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        let events: Vec<_> = self.event_queue.drain(..).collect();

        for event in &events {
            // Callbacks run unlocked so they may drop their own subscription.
            let callbacks: Vec<EventCallback> = match self.registry.lock() {
                Ok(registry) => registry
                    .listeners
                    .values()
                    .filter(|(kind, _)| *kind == "*" || *kind == event.kind())
                    .map(|(_, callback)| callback.clone())
                    .collect(),
                Err(_) => Vec::new(),
            };

            for callback in callbacks {
                callback(event);
            }
        }

        events
    }

    /// Get number of pending events
    pub fn pending_events(&self) -> usize {
        self.event_queue.len()
    }

    /// Number of live listeners
    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .map(|registry| registry.listeners.len())
            .unwrap_or(0)
    }
}

/// Scoped listener registration; dropping it removes the listener
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Subscription {
    /// Removes the listener now
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut registry) = registry.lock() {
                registry.listeners.remove(&self.id);
            }
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Input handler that tracks drags and turns events into viewport actions
#[derive(Debug, Clone)]
pub struct InputHandler {
    pub enabled: bool,
    drag: DragState,
    pub zoom_in_key: KeyCode,
    pub zoom_out_key: KeyCode,
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_zoom_factors(ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR)
    }

    pub fn with_zoom_factors(zoom_in_factor: f64, zoom_out_factor: f64) -> Self {
        Self {
            enabled: true,
            drag: DragState::default(),
            zoom_in_key: KeyCode::Control,
            zoom_out_key: KeyCode::Shift,
            zoom_in_factor,
            zoom_out_factor,
        }
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    /// Handle one input event, producing at most one action
    pub fn handle_event(&mut self, event: InputEvent) -> Option<Action> {
        if !self.enabled {
            return None;
        }

        match event {
            InputEvent::PointerDown { position } => {
                self.drag.arm(position);
                None
            }
            InputEvent::PointerMove { position } => self
                .drag
                .track(position)
                .map(|delta| Action::Pan {
                    dx: delta.x,
                    dy: delta.y,
                }),
            InputEvent::PointerUp => {
                self.drag.disarm();
                None
            }
            InputEvent::KeyPress { key } if key == self.zoom_in_key => Some(Action::Zoom {
                factor: self.zoom_in_factor,
            }),
            InputEvent::KeyPress { key } if key == self.zoom_out_key => Some(Action::Zoom {
                factor: self.zoom_out_factor,
            }),
            InputEvent::KeyPress { .. } => None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
