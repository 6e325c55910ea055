//! In-process stand-in for the inference service.

use actix_web::dev::ServerHandle;
use actix_web::http::StatusCode;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::{SocketAddr, TcpListener};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use url::Url;

use crate::config::InferenceConfig;

#[derive(Clone, Debug)]
pub struct StubReply {
    status: u16,
    content_type: &'static str,
    body: String,
    delay: Option<Duration>,
}

impl StubReply {
    pub fn json(body: Value) -> Self {
        Self {
            status: 200,
            content_type: "application/json",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self {
            status,
            content_type: "text/plain",
            body: body.to_string(),
            delay: None,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

struct StubState {
    // The last reply repeats once the script runs out.
    replies: Mutex<VecDeque<StubReply>>,
    hits: AtomicUsize,
    last_body: Mutex<Option<Value>>,
    last_content_type: Mutex<Option<String>>,
}

impl StubState {
    fn next_reply(&self) -> StubReply {
        let mut replies = self.replies.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap_or_else(|| StubReply::text(500, "no reply scripted"))
        }
    }
}

async fn reply(state: web::Data<StubState>, req: HttpRequest, body: web::Bytes) -> HttpResponse {
    state.hits.fetch_add(1, Ordering::SeqCst);
    *state.last_body.lock().unwrap() = serde_json::from_slice(&body).ok();
    *state.last_content_type.lock().unwrap() = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(String::from);

    let reply = state.next_reply();
    if let Some(delay) = reply.delay {
        actix_web::rt::time::sleep(delay).await;
    }

    HttpResponse::build(StatusCode::from_u16(reply.status).unwrap())
        .content_type(reply.content_type)
        .body(reply.body)
}

pub struct StubInference {
    addr: SocketAddr,
    state: web::Data<StubState>,
    _handle: ServerHandle,
}

impl StubInference {
    pub async fn start(replies: Vec<StubReply>) -> Self {
        let state = web::Data::new(StubState {
            replies: Mutex::new(replies.into()),
            hits: AtomicUsize::new(0),
            last_body: Mutex::new(None),
            last_content_type: Mutex::new(None),
        });

        let app_state = state.clone();
        let server = HttpServer::new(move || {
            App::new()
                .app_data(app_state.clone())
                .route("/predict", web::post().to(reply))
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        let server = server.run();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        Self {
            addr,
            state,
            _handle: handle,
        }
    }

    pub fn url(&self) -> String {
        format!("http://{}/predict", self.addr)
    }

    pub fn hits(&self) -> usize {
        self.state.hits.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Value> {
        self.state.last_body.lock().unwrap().clone()
    }

    pub fn last_content_type(&self) -> Option<String> {
        self.state.last_content_type.lock().unwrap().clone()
    }
}

/// A URL on a local port nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/predict", port)
}

pub fn inference_config(url: &str, timeout_ms: u64) -> InferenceConfig {
    InferenceConfig {
        url: Url::parse(url).unwrap(),
        timeout: Duration::from_millis(timeout_ms),
        connect_timeout: Duration::from_millis(timeout_ms.min(1_000)),
    }
}
