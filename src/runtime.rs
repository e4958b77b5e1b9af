//! Async driver for a [`Map`]
//!
//! A [`MapSession`] owns the map and a geometry source. It consumes input
//! events from a channel, keeps one fetch in flight per redraw request, and
//! publishes every presented frame through a watch channel. Fetches may
//! resolve in any order; [`Map::complete_redraw`] drops the ones that no
//! longer match the view.

use crate::{
    core::{
        config::MapConfig,
        map::{FrameOutcome, Map, RedrawTicket},
        viewport::Viewport,
    },
    data::{region::Region, source::GeometrySource},
    input::InputEvent,
    MapError, Result,
};
use futures::{future::BoxFuture, stream::FuturesUnordered, FutureExt, StreamExt};
use image::RgbaImage;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
};

/// A presented frame as seen by consumers of the session
#[derive(Debug, Clone)]
pub struct Frame {
    pub generation: u64,
    pub viewport: Viewport,
    pub image: Arc<RgbaImage>,
}

type PendingFetch = BoxFuture<'static, (RedrawTicket, Result<Vec<Region>>)>;

/// Owns a map and drives redraws against a geometry source
pub struct MapSession<S> {
    map: Map,
    source: Arc<S>,
}

impl<S: GeometrySource + 'static> MapSession<S> {
    pub fn new(map: Map, source: S) -> Self {
        Self {
            map,
            source: Arc::new(source),
        }
    }

    pub fn from_config(config: &MapConfig, source: S) -> Result<Self> {
        Ok(Self::new(Map::new(config)?, source))
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    /// Spawns the session on the current tokio runtime.
    ///
    /// The task ends once every [`SessionHandle`] is dropped and the
    /// outstanding fetches have settled; it yields the map back.
    pub fn spawn(self) -> (SessionHandle, JoinHandle<Map>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (frame_tx, frame_rx) = watch::channel(None);

        let task = tokio::spawn(self.run(event_rx, frame_tx));
        let handle = SessionHandle {
            events: event_tx,
            frames: frame_rx,
        };
        (handle, task)
    }

    /// Runs until `events` closes, then drains in-flight fetches
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<InputEvent>,
        frames: watch::Sender<Option<Frame>>,
    ) -> Map {
        log::info!("map session started");
        let mut pending: FuturesUnordered<PendingFetch> = FuturesUnordered::new();
        let initial = self.map.request_redraw();
        pending.push(self.fetch(initial));

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Some(ticket) = self.map.handle_event(event) {
                            pending.push(self.fetch(ticket));
                        }
                    }
                    None => break,
                },
                Some((ticket, fetched)) = pending.next(), if !pending.is_empty() => {
                    self.complete(ticket, fetched, &frames);
                }
            }
            self.map.process_events();
        }

        while let Some((ticket, fetched)) = pending.next().await {
            self.complete(ticket, fetched, &frames);
        }
        self.map.process_events();

        log::info!("map session stopped");
        self.map
    }

    fn fetch(&self, ticket: RedrawTicket) -> PendingFetch {
        let source = self.source.clone();
        async move {
            let fetched = source.fetch(ticket.query()).await;
            (ticket, fetched)
        }
        .boxed()
    }

    fn complete(
        &mut self,
        ticket: RedrawTicket,
        fetched: Result<Vec<Region>>,
        frames: &watch::Sender<Option<Frame>>,
    ) {
        let generation = ticket.generation();
        let viewport = ticket.viewport().clone();

        if let FrameOutcome::Presented(_) = self.map.complete_redraw(ticket, fetched) {
            frames.send_replace(Some(Frame {
                generation,
                viewport,
                image: Arc::new(self.map.front().image().clone()),
            }));
        }
    }
}

/// Client side of a running session
#[derive(Debug, Clone)]
pub struct SessionHandle {
    events: mpsc::UnboundedSender<InputEvent>,
    frames: watch::Receiver<Option<Frame>>,
}

impl SessionHandle {
    /// Queue an input event
    pub fn send(&self, event: InputEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| MapError::SessionClosed)
    }

    /// The most recent presented frame
    pub fn latest_frame(&self) -> Option<Frame> {
        self.frames.borrow().clone()
    }

    /// Whether a frame arrived since the last `latest_frame_if_new` or `changed`
    pub fn has_new_frame(&self) -> bool {
        self.frames.has_changed().unwrap_or(false)
    }

    /// Returns the latest frame only if it has not been seen yet
    pub fn latest_frame_if_new(&mut self) -> Option<Frame> {
        if !self.has_new_frame() {
            return None;
        }
        self.frames.borrow_and_update().clone()
    }

    /// Waits for the next presented frame
    pub async fn changed(&mut self) -> Result<Frame> {
        loop {
            self.frames
                .changed()
                .await
                .map_err(|_| MapError::SessionClosed)?;
            if let Some(frame) = self.frames.borrow_and_update().clone() {
                return Ok(frame);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.events.is_closed()
    }
}
