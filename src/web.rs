//! Browser front end: a random meme page and a custom meme form.
//!
//! ## Routes
//!
//! | Method | Path | Response |
//! |---|---|---|
//! | GET | `/` | random image + random quote, rendered as a meme page |
//! | GET | `/create` | form with `image_url`, `body`, `author` |
//! | POST | `/create` | downloads `image_url`, captions it, renders the meme page |
//! | GET | `/memes/*` | generated files from the output directory |
//!
//! Quote and image pools are loaded once at startup. Meme generation is
//! CPU-bound and runs on the blocking pool. A downloaded image lives in a
//! [`tempfile::NamedTempFile`] owned by the request and is deleted when the
//! request finishes, whether or not generation succeeded.
//!
//! Pages are rendered with [maud](https://maud.lambda.xyz/).

use crate::caption::{CompositionError, Compositor};
use crate::generate;
use crate::quote::Quote;
use crate::resources::Resources;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use maud::{DOCTYPE, Markup, html};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// URL prefix generated memes are served under.
pub const MEMES_ROUTE: &str = "/memes";

#[derive(Error, Debug)]
pub enum WebError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Meme generation failed: {0}")]
    Generation(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WebError {
    fn status(&self) -> StatusCode {
        match self {
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::Generation(_) | WebError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}");
        } else {
            tracing::warn!("{self}");
        }
        (status, error_page(status, &self.to_string())).into_response()
    }
}

/// Shared, read-only server state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppData>,
}

struct AppData {
    resources: Resources,
    quotes: Vec<Quote>,
    images: Vec<PathBuf>,
    client: reqwest::Client,
}

impl AppState {
    /// Load the quote and image pools.
    pub fn load(resources: Resources) -> Self {
        let quotes = generate::quote_pool(&resources);
        let images = generate::image_pool(&resources);
        tracing::info!("Loaded {} quotes and {} images", quotes.len(), images.len());
        Self {
            inner: Arc::new(AppData {
                resources,
                quotes,
                images,
                client: reqwest::Client::new(),
            }),
        }
    }

    pub fn quote_count(&self) -> usize {
        self.inner.quotes.len()
    }

    pub fn image_count(&self) -> usize {
        self.inner.images.len()
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    image_url: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    author: String,
}

pub fn router(state: AppState) -> Router {
    let output_dir = state.inner.resources.output_directory();
    Router::new()
        .route("/", get(random_meme))
        .route("/create", get(meme_form).post(create_meme))
        .nest_service(MEMES_ROUTE, ServeDir::new(output_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind `addr` and serve until the process is stopped.
pub async fn serve(resources: Resources, addr: &str) -> Result<(), WebError> {
    let app = router(AppState::load(resources));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn random_meme(State(state): State<AppState>) -> Result<Markup, WebError> {
    let mut rng = StdRng::from_entropy();
    let image = state.inner.images.choose(&mut rng).cloned();
    let quote = state.inner.quotes.choose(&mut rng).cloned();
    let (Some(image), Some(quote)) = (image, quote) else {
        return Err(WebError::NotFound("No quotes or images found.".into()));
    };

    let data = Arc::clone(&state.inner);
    let path = run_blocking(move || {
        Compositor::with_rng(&data.resources, rng).make_meme(
            Some(&image),
            quote.body(),
            quote.author(),
        )
    })
    .await?;
    Ok(meme_page(&meme_url(&path)))
}

async fn meme_form() -> Markup {
    form_page()
}

async fn create_meme(
    State(state): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Markup, WebError> {
    let image_url = form.image_url.trim().to_string();
    let body = form.body.trim().to_string();
    let author = form.author.trim().to_string();
    if image_url.is_empty() || body.is_empty() || author.is_empty() {
        return Err(WebError::BadRequest(
            "Image URL, body, and author are required.".into(),
        ));
    }

    let response = state
        .inner
        .client
        .get(&image_url)
        .send()
        .await
        .map_err(|e| WebError::BadRequest(format!("Request error: {e}")))?;
    if !response.status().is_success() {
        return Err(WebError::BadRequest(
            "Could not retrieve image from URL.".into(),
        ));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(|e| WebError::BadRequest(format!("Request error: {e}")))?;

    let mut download = tempfile::Builder::new()
        .prefix("memeforge-")
        .suffix(".jpg")
        .tempfile()?;
    download.write_all(&bytes)?;
    tracing::debug!(
        "Downloaded {} bytes from {image_url} to {}",
        bytes.len(),
        download.path().display()
    );

    let data = Arc::clone(&state.inner);
    // `download` moves into the job and is deleted when the job ends.
    let path = run_blocking(move || {
        Compositor::new(&data.resources).make_meme(Some(download.path()), &body, &author)
    })
    .await?;
    Ok(meme_page(&meme_url(&path)))
}

async fn run_blocking<F>(job: F) -> Result<PathBuf, WebError>
where
    F: FnOnce() -> Result<PathBuf, CompositionError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| WebError::Generation(e.to_string()))?
        .map_err(|e| WebError::Generation(e.to_string()))
}

/// Public URL of a file written to the output directory.
fn meme_url(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("{MEMES_ROUTE}/{name}")
}

// ============================================================================
// Pages
// ============================================================================

fn layout(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
            }
            body {
                nav {
                    a href="/" { "Random" }
                    " | "
                    a href="/create" { "Create" }
                }
                main { (content) }
            }
        }
    }
}

fn meme_page(src: &str) -> Markup {
    layout(
        "Meme",
        html! {
            img src=(src) alt="Generated meme";
        },
    )
}

fn form_page() -> Markup {
    layout(
        "Create a meme",
        html! {
            form action="/create" method="post" {
                label for="image_url" { "Image URL" }
                input type="url" id="image_url" name="image_url" required;
                label for="body" { "Quote" }
                input type="text" id="body" name="body" required;
                label for="author" { "Author" }
                input type="text" id="author" name="author" required;
                button type="submit" { "Create Meme" }
            }
        },
    )
}

fn error_page(status: StatusCode, message: &str) -> Markup {
    layout(
        status.canonical_reason().unwrap_or("Error"),
        html! {
            h1 { (status.as_u16()) " " (status.canonical_reason().unwrap_or("Error")) }
            p { (message) }
        },
    )
}
