//! HTTP client for the card store.
//!
//! The store is a trivial key-value endpoint: `GET /` returns the deck as
//! wire text, `PUT /` replaces it. Each request runs on its own thread and
//! resolves into exactly one completion event on the session channel, so
//! the UI thread never blocks and concurrent saves stay independent.

use std::sync::mpsc::Sender;
use std::thread;

use reqwest::blocking::Client;
use reqwest::header;
use thiserror::Error;

use crate::state::{Event, StoreRequest};

/// Fixed store endpoint. The tool has no configuration surface.
pub const STORE_URL: &str = "http://localhost:3000/";

/// Why a deck fetch failed. The tag doubles as the question text of the
/// pseudo-card the session falls back to.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("the store endpoint address is not a valid URL")]
    BadUrl,
    #[error("the store answered with status {0}")]
    BadStatus(u16),
    #[error("the store response body could not be read")]
    BadBody,
    #[error("the store could not be reached")]
    NetworkError,
    #[error("the store request timed out")]
    Timeout,
}

impl FetchError {
    /// Short stable tag shown to the user as the pseudo-card question.
    pub fn tag(&self) -> &'static str {
        match self {
            FetchError::BadUrl => "BadUrl",
            FetchError::BadStatus(_) => "BadStatus",
            FetchError::BadBody => "BadBody",
            FetchError::NetworkError => "NetworkError",
            FetchError::Timeout => "Timeout",
        }
    }

    fn classify(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_builder() {
            FetchError::BadUrl
        } else if let Some(status) = error.status() {
            FetchError::BadStatus(status.as_u16())
        } else if error.is_decode() {
            FetchError::BadBody
        } else {
            FetchError::NetworkError
        }
    }
}

/// Executes store requests off the UI thread and reports completions as
/// ordinary session events. Requests are never cancelled or retried.
pub struct StoreClient {
    endpoint: String,
    client: Client,
    events: Sender<Event>,
    ctx: egui::Context,
}

impl StoreClient {
    /// `ctx` is only used to wake the UI up when a completion arrives.
    pub fn new(endpoint: impl Into<String>, events: Sender<Event>, ctx: egui::Context) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: Client::new(),
            events,
            ctx,
        }
    }

    pub fn dispatch(&self, request: StoreRequest) {
        match request {
            StoreRequest::Fetch => self.fetch_deck(),
            StoreRequest::Put(body) => self.put_deck(body),
        }
    }

    fn fetch_deck(&self) {
        let client = self.client.clone();
        let url = self.endpoint.clone();
        let events = self.events.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            let event = match fetch_text(&client, &url) {
                Ok(body) => {
                    log::info!("deck fetched ({} bytes)", body.len());
                    Event::DeckLoaded(body)
                }
                Err(error) => {
                    log::warn!("deck fetch failed: {error}");
                    Event::DeckLoadFailed(error)
                }
            };

            // The receiver only goes away on shutdown.
            if events.send(event).is_ok() {
                ctx.request_repaint();
            }
        });
    }

    fn put_deck(&self, body: String) {
        let client = self.client.clone();
        let url = self.endpoint.clone();
        let events = self.events.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            let result = put_text(&client, &url, body);
            match &result {
                Ok(()) => log::info!("deck saved"),
                Err(error) => log::warn!("deck save failed: {error}"),
            }

            if events.send(Event::StoreWriteCompleted(result)).is_ok() {
                ctx.request_repaint();
            }
        });
    }
}

fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .send()
        .map_err(|error| FetchError::classify(&error))?;

    if !response.status().is_success() {
        return Err(FetchError::BadStatus(response.status().as_u16()));
    }

    response.text().map_err(|error| {
        if error.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::BadBody
        }
    })
}

/// Write errors are deliberately unclassified: saves are fire-and-forget
/// and the result is only ever logged.
fn put_text(client: &Client, url: &str, body: String) -> Result<(), String> {
    let response = client
        .put(url)
        .header(header::CONTENT_TYPE, "text/plain")
        .body(body)
        .send()
        .map_err(|error| error.to_string())?;

    response
        .error_for_status()
        .map(|_| ())
        .map_err(|error| error.to_string())
}
