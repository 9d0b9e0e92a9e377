//! Request routing for the board endpoints

use crate::{ingress, Error, ServerConfig, SetPriorityRequest};
use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;
use tracing::debug;
use workgrid_core::ActivityLookup;
use workgrid_sync::{HostDispatcher, Hub};

/// State shared by every connection
pub struct WebState {
    /// The replication hub being served
    pub hub: Arc<Hub>,
    /// Marshals write jobs onto the owning thread
    pub dispatcher: Arc<dyn HostDispatcher>,
    /// Optional activity provider for display-only enrichment
    pub activity: Option<Arc<dyn ActivityLookup + Send + Sync>>,
    /// Server configuration (client hints)
    pub config: ServerConfig,
}

/// Route one request to its handler
///
/// Generic over the body type so tests can drive it with `Full<Bytes>`
/// while the server drives it with `hyper::body::Incoming`.
pub async fn handle_request<B>(
    state: Arc<WebState>,
    req: Request<B>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = match (&method, path.as_str()) {
        (&Method::GET, "/board/revision") => revision(&state),
        (&Method::GET, "/board/state") => board_state(&state),
        (&Method::GET, "/board/config") => client_config(&state),
        (&Method::POST, "/board/priority") => set_priority(&state, req).await,
        _ => text(StatusCode::NOT_FOUND, "not found"),
    };

    debug!(%method, %path, status = response.status().as_u16(), "handled request");
    Ok(response)
}

fn revision(state: &WebState) -> Response<Full<Bytes>> {
    json_value(
        StatusCode::OK,
        &serde_json::json!({ "revision": state.hub.revision() }),
    )
}

fn client_config(state: &WebState) -> Response<Full<Bytes>> {
    json_value(
        StatusCode::OK,
        &serde_json::json!({ "pollIntervalMs": state.config.poll_interval_ms }),
    )
}

fn board_state(state: &WebState) -> Response<Full<Bytes>> {
    // Before the first publish there is no state; clients treat `{}` as
    // "nothing yet" and keep polling.
    let Some(snapshot) = state.hub.latest_snapshot() else {
        return json_text(StatusCode::OK, "{}".to_string());
    };

    // Display-only enrichment on the outward-facing copy.
    let body = match &state.activity {
        Some(lookup) => serde_json::to_string(&snapshot.with_activity(lookup.as_ref())),
        None => serde_json::to_string(snapshot.as_ref()),
    };

    match body {
        Ok(body) => json_text(StatusCode::OK, body),
        Err(err) => text(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("serialization failed: {err}"),
        ),
    }
}

async fn set_priority<B>(state: &WebState, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => return text(StatusCode::BAD_REQUEST, format!("unreadable body: {err}")),
    };

    let request = match SetPriorityRequest::parse(&body).and_then(|r| {
        r.validate()?;
        Ok(r)
    }) {
        Ok(request) => request,
        Err(err) => return text(StatusCode::BAD_REQUEST, err.to_string()),
    };

    match ingress::submit(state.dispatcher.as_ref(), request) {
        // Accepted, not applied: the owning thread runs the write on its own
        // schedule and the polling loop surfaces the outcome.
        Ok(()) => text(StatusCode::ACCEPTED, ""),
        Err(Error::Dispatch(err)) => text(StatusCode::SERVICE_UNAVAILABLE, err.to_string()),
        Err(err) => text(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

fn json_value(status: StatusCode, value: &serde_json::Value) -> Response<Full<Bytes>> {
    json_text(status, value.to_string())
}

fn json_text(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "application/json")
        .body(Full::new(Bytes::from(body)))
        .expect("static response parts")
}

fn text(status: StatusCode, body: impl Into<String>) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header(hyper::header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Full::new(Bytes::from(body.into())))
        .expect("static response parts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use workgrid_core::{
        CategoryId, Delta, GroupId, RawCapture, RawCategory, RawCell, RawGroup, RawWorker,
        WorkerId,
    };
    use workgrid_sync::{HostJob, SimulationHost};

    /// Records priority writes and echoes them back as deltas would
    #[derive(Default)]
    struct RecordingHost {
        writes: Vec<(GroupId, WorkerId, CategoryId, i32)>,
    }

    impl SimulationHost for RecordingHost {
        fn capture(&mut self) -> RawCapture {
            RawCapture::new(true)
        }

        fn apply_priority(
            &mut self,
            group: GroupId,
            worker: WorkerId,
            category: &CategoryId,
            priority: i32,
        ) -> workgrid_sync::Result<()> {
            self.writes.push((group, worker, category.clone(), priority));
            Ok(())
        }
    }

    /// Runs each job synchronously against the recording host
    struct ImmediateDispatcher {
        host: Mutex<RecordingHost>,
    }

    impl HostDispatcher for ImmediateDispatcher {
        fn dispatch(&self, job: HostJob) -> workgrid_sync::Result<()> {
            job(&mut *self.host.lock().unwrap());
            Ok(())
        }
    }

    fn test_state() -> (Arc<WebState>, Arc<ImmediateDispatcher>) {
        let dispatcher = Arc::new(ImmediateDispatcher {
            host: Mutex::new(RecordingHost::default()),
        });
        let state = Arc::new(WebState {
            hub: Arc::new(Hub::new().unwrap()),
            dispatcher: dispatcher.clone(),
            activity: None,
            config: ServerConfig::default(),
        });
        (state, dispatcher)
    }

    fn get(path: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Full::new(Bytes::new()))
            .unwrap()
    }

    fn post(path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn body_string(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn sample_capture() -> RawCapture {
        let mut capture = RawCapture::new(true);
        capture
            .categories
            .push(RawCategory::new("Cooking", "Cooking", "Cook"));
        let mut group = RawGroup::new(GroupId::new(1), "Base");
        let mut worker = RawWorker::new(WorkerId::new(7), "Ada");
        worker
            .cells
            .insert(CategoryId::new("Cooking"), RawCell::with_priority(1));
        group.workers.push(worker);
        capture.groups.push(group);
        capture
    }

    fn wait_for_revision(hub: &Hub, at_least: u64) {
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while hub.revision() < at_least {
            assert!(std::time::Instant::now() < deadline, "revision timeout");
            std::thread::sleep(std::time::Duration::from_millis(5));
        }
    }

    #[tokio::test]
    async fn test_revision_endpoint() {
        let (state, _) = test_state();
        let response = handle_request(state.clone(), get("/board/revision"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"revision":0}"#);
    }

    #[tokio::test]
    async fn test_state_endpoint_before_first_publish() {
        let (state, _) = test_state();
        let response = handle_request(state, get("/board/state")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "{}");
    }

    #[tokio::test]
    async fn test_state_endpoint_serves_snapshot() {
        let (state, _) = test_state();
        state.hub.request_resync(sample_capture());
        wait_for_revision(&state.hub, 1);
        state.hub.notify(Delta::priority_changed(WorkerId::new(7), "Cooking", 3));
        wait_for_revision(&state.hub, 2);

        let response = handle_request(state, get("/board/state")).await.unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(json["revision"], 2);
        assert_eq!(
            json["groups"][0]["workers"][0]["cells"]["Cooking"]["priority"],
            3
        );
    }

    #[tokio::test]
    async fn test_set_priority_accepted_and_dispatched() {
        let (state, dispatcher) = test_state();
        let response = handle_request(
            state,
            post(
                "/board/priority",
                r#"{"groupId":1,"workerId":7,"categoryId":"Cooking","priority":2}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);

        let host = dispatcher.host.lock().unwrap();
        assert_eq!(
            host.writes,
            vec![(
                GroupId::new(1),
                WorkerId::new(7),
                CategoryId::new("Cooking"),
                2
            )]
        );
    }

    #[tokio::test]
    async fn test_set_priority_rejects_bad_range() {
        let (state, dispatcher) = test_state();
        let response = handle_request(
            state,
            post(
                "/board/priority",
                r#"{"groupId":1,"workerId":7,"categoryId":"Cooking","priority":9}"#,
            ),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(dispatcher.host.lock().unwrap().writes.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (state, _) = test_state();
        let response = handle_request(state, get("/board/unknown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_config_endpoint() {
        let (state, _) = test_state();
        let response = handle_request(state, get("/board/config")).await.unwrap();
        assert_eq!(body_string(response).await, r#"{"pollIntervalMs":1000}"#);
    }
}
