use crate::{
    core::{config::MapConfig, viewport::Viewport},
    data::{region::Region, source::ViewportQuery},
    input::{Action, EventManager, InputEvent, InputHandler, MapEvent, Subscription},
    rendering::{renderer::FrameStats, surface::Surface, Renderer},
    Result,
};

/// A redraw request, tagged with the view it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawTicket {
    generation: u64,
    viewport: Viewport,
}

impl RedrawTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Geometry request parameters for this redraw
    pub fn query(&self) -> ViewportQuery {
        ViewportQuery::from(&self.viewport)
    }
}

/// What became of a completed redraw
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// Drawn and presented
    Presented(FrameStats),
    /// Dropped: the view moved on or a newer frame is already on screen
    Stale,
    /// Fetch or draw failed; the previous frame stays visible
    Failed(String),
}

/// The map state machine: viewport, input tracking and renderer.
///
/// `Map` never awaits anything itself. Callers turn input into
/// [`RedrawTicket`]s, fetch geometry for each ticket however they like, and
/// hand the result back through [`Map::complete_redraw`], which decides
/// whether the frame is still current.
///
/// Map events are queued until [`Map::process_events`] runs. [`MapSession`]
/// does this every loop; callers driving a `Map` by hand should do the same,
/// since the queue keeps only the newest
/// [`MAX_PENDING_EVENTS`](crate::input::handler::MAX_PENDING_EVENTS).
///
/// [`MapSession`]: crate::runtime::MapSession
pub struct Map {
    viewport: Viewport,
    input: InputHandler,
    renderer: Renderer,
    events: EventManager,
    next_generation: u64,
    presented_generation: Option<u64>,
}

impl Map {
    /// Creates a map; fails if the render surface cannot be created
    pub fn new(config: &MapConfig) -> Result<Self> {
        config.validate()?;
        let map = Self {
            viewport: config.viewport.build(),
            input: InputHandler::with_zoom_factors(
                config.viewport.zoom_in_factor,
                config.viewport.zoom_out_factor,
            ),
            renderer: Renderer::from_config(&config.render)?,
            events: EventManager::new(),
            next_generation: 0,
            presented_generation: None,
        };
        log::debug!("map created with {:?}", map.viewport);
        Ok(map)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn input_handler(&self) -> &InputHandler {
        &self.input
    }

    pub fn input_handler_mut(&mut self) -> &mut InputHandler {
        &mut self.input
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// The visible frame
    pub fn front(&self) -> &Surface {
        self.renderer.front()
    }

    /// Generation of the frame currently on screen
    pub fn presented_generation(&self) -> Option<u64> {
        self.presented_generation
    }

    /// Register a map event listener; it lives as long as the subscription
    pub fn on<F>(&self, event_type: &'static str, callback: F) -> Subscription
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.events.on(event_type, callback)
    }

    /// Dispatch queued map events to listeners
    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.events.process_events()
    }

    /// Feeds one input event; returns a redraw request when the view changed
    pub fn handle_event(&mut self, event: InputEvent) -> Option<RedrawTicket> {
        let action = self.input.handle_event(event)?;
        self.apply(action)
    }

    /// Applies a viewport action; returns a redraw request when it took effect
    pub fn apply(&mut self, action: Action) -> Option<RedrawTicket> {
        let changed = match action {
            Action::Pan { dx, dy } => self.viewport.pan_by_gesture(dx, dy),
            Action::Zoom { factor } => self.viewport.zoom(factor),
        };
        if !changed {
            return None;
        }

        self.events.emit(MapEvent::ViewChanged {
            viewport: self.viewport.clone(),
        });
        Some(self.request_redraw())
    }

    pub fn pan_by_gesture(&mut self, dx: f64, dy: f64) -> Option<RedrawTicket> {
        self.apply(Action::Pan { dx, dy })
    }

    pub fn zoom(&mut self, factor: f64) -> Option<RedrawTicket> {
        self.apply(Action::Zoom { factor })
    }

    /// Issues a redraw for the current view
    pub fn request_redraw(&mut self) -> RedrawTicket {
        self.next_generation += 1;
        RedrawTicket {
            generation: self.next_generation,
            viewport: self.viewport.clone(),
        }
    }

    /// Whether a ticket still describes what should be on screen
    pub fn is_current(&self, ticket: &RedrawTicket) -> bool {
        ticket.viewport == self.viewport
            && self
                .presented_generation
                .map_or(true, |presented| ticket.generation > presented)
    }

    /// Hands back the geometry fetched for `ticket`.
    ///
    /// Stale results are dropped; failures leave the previous frame on screen
    /// and never touch the viewport.
    pub fn complete_redraw(
        &mut self,
        ticket: RedrawTicket,
        fetched: Result<Vec<Region>>,
    ) -> FrameOutcome {
        if !self.is_current(&ticket) {
            log::debug!("discarding stale frame {}", ticket.generation);
            self.events.emit(MapEvent::FrameDiscarded {
                generation: ticket.generation,
            });
            return FrameOutcome::Stale;
        }

        let drawn = fetched.and_then(|regions| self.renderer.render(&ticket.viewport, &regions));
        match drawn {
            Ok(stats) => {
                log::info!(
                    "presented frame {} ({} regions, {} rings)",
                    ticket.generation,
                    stats.regions,
                    stats.rings_drawn
                );
                self.presented_generation = Some(ticket.generation);
                self.events.emit(MapEvent::FramePresented {
                    generation: ticket.generation,
                    regions: stats.regions,
                });
                FrameOutcome::Presented(stats)
            }
            Err(e) => {
                log::warn!("frame {} not drawn: {}", ticket.generation, e);
                self.events.emit(MapEvent::FetchFailed {
                    generation: ticket.generation,
                    message: e.to_string(),
                });
                FrameOutcome::Failed(e.to_string())
            }
        }
    }
}
