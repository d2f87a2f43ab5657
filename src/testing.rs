//! In-process stand-in for the classification service, used by tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};

/// One multipart field received by the fake prediction endpoint.
#[derive(Debug, Clone)]
pub struct ReceivedUpload {
    pub field: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Default)]
struct Shared {
    predict_status: AtomicU16,
    train_status: AtomicU16,
    train_delay_ms: AtomicU64,
    train_calls: AtomicUsize,
    uploads: Mutex<Vec<ReceivedUpload>>,
}

/// Fake service answering `/predict` with an HTML table built from the
/// uploaded CSV and `/train` with a plain-text success message.
pub struct FakeService {
    addr: SocketAddr,
    shared: Arc<Shared>,
}

impl FakeService {
    pub async fn start() -> Self {
        let shared = Arc::new(Shared::default());
        let app = Router::new()
            .route("/predict", post(predict))
            .route("/train", get(train))
            .with_state(Arc::clone(&shared));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, shared }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make `/predict` answer with the given status.
    pub fn fail_with(&self, status: u16) {
        self.shared.predict_status.store(status, Ordering::SeqCst);
    }

    /// Make `/train` answer with the given status.
    pub fn fail_training_with(&self, status: u16) {
        self.shared.train_status.store(status, Ordering::SeqCst);
    }

    pub fn delay_training(&self, delay: Duration) {
        self.shared
            .train_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn train_calls(&self) -> usize {
        self.shared.train_calls.load(Ordering::SeqCst)
    }

    pub fn last_upload(&self) -> Option<ReceivedUpload> {
        self.shared.uploads.lock().unwrap().last().cloned()
    }

    /// Render a CSV body the way the service renders its predictions.
    pub fn render_table(csv: &str) -> String {
        let mut lines = csv.lines();
        let header = lines.next().unwrap_or_default();

        let mut html = String::from(
            "<html><body><h2>Predictions</h2><table border=\"1\" class=\"dataframe table table-hover\">\n<thead><tr>",
        );
        for cell in header.split(',') {
            html.push_str(&format!("<th>{cell}</th>"));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for line in lines.filter(|l| !l.trim().is_empty()) {
            html.push_str("<tr>");
            for cell in line.split(',') {
                html.push_str(&format!("<td>{cell}</td>"));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table></body></html>");
        html
    }
}

async fn predict(State(shared): State<Arc<Shared>>, mut multipart: Multipart) -> Response {
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
        shared.uploads.lock().unwrap().push(ReceivedUpload {
            field: name,
            file_name,
            content_type,
            bytes,
        });
    }

    let status = shared.predict_status.load(Ordering::SeqCst);
    if status != 0 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }

    let upload = shared
        .uploads
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find(|u| u.field == "file")
        .cloned();
    match upload {
        Some(upload) => {
            Html(FakeService::render_table(&String::from_utf8_lossy(&upload.bytes)))
                .into_response()
        }
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn train(State(shared): State<Arc<Shared>>) -> Response {
    shared.train_calls.fetch_add(1, Ordering::SeqCst);
    let delay = shared.train_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    let status = shared.train_status.load(Ordering::SeqCst);
    if status != 0 {
        return StatusCode::from_u16(status).unwrap().into_response();
    }
    "Training is successful".into_response()
}

/// Base URL of a port nothing listens on.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}
