use async_trait::async_trait;
use geocanvas::{
    Frame, GeometrySource, InputEvent, KeyCode, LatLng, MapBuilder, MapError, MapSession, Point,
    Region, SessionHandle, ViewportQuery,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

type Reply = oneshot::Sender<geocanvas::Result<Vec<Region>>>;

/// Geometry source whose responses are released by the test, in any order
struct GatedSource {
    requests: mpsc::UnboundedSender<(ViewportQuery, Reply)>,
}

impl GatedSource {
    fn new() -> (Self, mpsc::UnboundedReceiver<(ViewportQuery, Reply)>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

#[async_trait]
impl GeometrySource for GatedSource {
    async fn fetch(&self, query: ViewportQuery) -> geocanvas::Result<Vec<Region>> {
        let (reply, response) = oneshot::channel();
        self.requests
            .send((query, reply))
            .map_err(|_| MapError::Fetch("test harness gone".to_string()))?;
        response
            .await
            .map_err(|_| MapError::Fetch("reply dropped".to_string()))?
    }
}

const WAIT: Duration = Duration::from_secs(5);

async fn next_request(
    requests: &mut mpsc::UnboundedReceiver<(ViewportQuery, Reply)>,
) -> (ViewportQuery, Reply) {
    tokio::time::timeout(WAIT, requests.recv())
        .await
        .expect("no fetch issued")
        .expect("session stopped")
}

async fn next_frame(handle: &mut SessionHandle) -> Frame {
    tokio::time::timeout(WAIT, handle.changed())
        .await
        .expect("no frame presented")
        .expect("session stopped")
}

fn island_at(query: &ViewportQuery) -> Region {
    let (lat, lng) = (query.lat - 20.0, query.lon + 20.0);
    Region::new(
        "Atlantis",
        vec![vec![
            LatLng::new(lat, lng),
            LatLng::new(lat, lng + 30.0),
            LatLng::new(lat - 30.0, lng + 30.0),
            LatLng::new(lat - 30.0, lng),
        ]],
    )
}

fn drag(handle: &SessionHandle, from: Point, to: &[Point]) {
    handle
        .send(InputEvent::PointerDown { position: from })
        .unwrap();
    for position in to {
        handle
            .send(InputEvent::PointerMove {
                position: *position,
            })
            .unwrap();
    }
    handle.send(InputEvent::PointerUp).unwrap();
}

fn counter(map: &geocanvas::Map, kind: &'static str) -> (Arc<AtomicUsize>, geocanvas::Subscription) {
    let count = Arc::new(AtomicUsize::new(0));
    let sink = count.clone();
    let subscription = map.on(kind, move |_| {
        sink.fetch_add(1, Ordering::SeqCst);
    });
    (count, subscription)
}

/// A response for an older view that arrives after a newer one must not
/// replace the newer frame
#[tokio::test]
async fn test_late_response_for_old_view_is_discarded() {
    let map = MapBuilder::new().with_size(200, 100).build().unwrap();
    let (discarded, _subscription) = counter(&map, "framediscarded");
    let (source, mut requests) = GatedSource::new();
    let (mut handle, task) = MapSession::new(map, source).spawn();

    let (initial, reply) = next_request(&mut requests).await;
    assert_eq!(initial.lon, -20.0);
    reply.send(Ok(vec![])).unwrap();
    assert_eq!(next_frame(&mut handle).await.generation, 1);

    // two westward steps: view A then view B
    drag(
        &handle,
        Point::new(50.0, 50.0),
        &[Point::new(60.0, 50.0), Point::new(70.0, 50.0)],
    );
    let first = next_request(&mut requests).await;
    let second = next_request(&mut requests).await;
    let (view_a, view_b) = if first.0.lon > second.0.lon {
        (first, second)
    } else {
        (second, first)
    };
    assert_eq!(view_a.0.lon, -21.0);
    assert_eq!(view_b.0.lon, -22.0);

    view_b.1.send(Ok(vec![island_at(&view_b.0)])).unwrap();
    let frame = next_frame(&mut handle).await;
    assert_eq!(frame.generation, 3);
    assert_eq!(frame.viewport.center_lng(), -22.0);

    view_a.1.send(Ok(vec![island_at(&view_a.0)])).unwrap();
    drop(handle);
    let map = tokio::time::timeout(WAIT, task).await.unwrap().unwrap();

    assert_eq!(map.presented_generation(), Some(3));
    assert_eq!(map.viewport().center_lng(), -22.0);
    assert_eq!(map.front().image(), frame.image.as_ref());
    assert_eq!(discarded.load(Ordering::SeqCst), 1);
}

/// A failed fetch leaves the previous frame on screen and keeps the view
#[tokio::test]
async fn test_failed_fetch_keeps_previous_frame() {
    let map = MapBuilder::new().with_size(200, 100).build().unwrap();
    let (failed, _subscription) = counter(&map, "fetchfailed");
    let (source, mut requests) = GatedSource::new();
    let (mut handle, task) = MapSession::new(map, source).spawn();

    let (initial, reply) = next_request(&mut requests).await;
    reply.send(Ok(vec![island_at(&initial)])).unwrap();
    let frame = next_frame(&mut handle).await;

    handle
        .send(InputEvent::KeyPress {
            key: KeyCode::Control,
        })
        .unwrap();
    let (zoomed, reply) = next_request(&mut requests).await;
    assert!((zoomed.pov_width - 190.0).abs() < 1e-9);
    reply
        .send(Err(MapError::Fetch("HTTP 503".to_string())))
        .unwrap();

    drop(handle);
    let map = tokio::time::timeout(WAIT, task).await.unwrap().unwrap();

    assert_eq!(map.presented_generation(), Some(1));
    assert!((map.viewport().extent_width() - 190.0).abs() < 1e-9);
    assert_eq!(map.front().image(), frame.image.as_ref());
    assert_eq!(failed.load(Ordering::SeqCst), 1);
}

/// The session keeps going after the very first fetch fails
#[tokio::test]
async fn test_recovers_after_initial_failure() {
    let map = MapBuilder::new().with_size(200, 100).build().unwrap();
    let (source, mut requests) = GatedSource::new();
    let (mut handle, task) = MapSession::new(map, source).spawn();

    let (_, reply) = next_request(&mut requests).await;
    reply
        .send(Err(MapError::Fetch("connection refused".to_string())))
        .unwrap();
    assert!(handle.latest_frame().is_none());

    handle
        .send(InputEvent::KeyPress { key: KeyCode::Shift })
        .unwrap();
    let (zoomed, reply) = next_request(&mut requests).await;
    assert!((zoomed.pov_width - 210.0).abs() < 1e-9);
    reply.send(Ok(vec![island_at(&zoomed)])).unwrap();

    let frame = next_frame(&mut handle).await;
    assert_eq!(frame.generation, 2);
    assert!((frame.viewport.extent_width() - 210.0).abs() < 1e-9);

    drop(handle);
    tokio::time::timeout(WAIT, task).await.unwrap().unwrap();
}

/// Zooming in at the minimum width issues no further requests
#[tokio::test]
async fn test_no_fetch_when_view_does_not_change() {
    let map = MapBuilder::new()
        .with_size(100, 50)
        .with_initial_view(LatLng::new(10.0, 10.0), 1.0, 0.5)
        .build()
        .unwrap();
    let (source, mut requests) = GatedSource::new();
    let (handle, task) = MapSession::new(map, source).spawn();

    let (_, reply) = next_request(&mut requests).await;
    reply.send(Ok(vec![])).unwrap();

    handle
        .send(InputEvent::KeyPress {
            key: KeyCode::Control,
        })
        .unwrap();
    handle
        .send(InputEvent::KeyPress {
            key: KeyCode::Other(65),
        })
        .unwrap();
    drop(handle);

    let map = tokio::time::timeout(WAIT, task).await.unwrap().unwrap();
    assert_eq!(map.viewport().extent_width(), 1.0);
    assert!(requests.try_recv().is_err());
}
