// src/infrastructure/http.rs

use std::cell::RefCell;
use std::rc::Rc;

use html_escape::decode_html_entities;
use lol_html::{element, text, HtmlRewriter, OutputSink, Settings};
use reqwest::{header, StatusCode};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, trace};

use crate::domain::error::DomainError;

/// Sent with every page request
pub const USER_AGENT: &str = "bookmarks";

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("failed to fetch page: {0}")]
    Status(StatusCode),

    #[error("title not found")]
    TitleNotFound,

    #[error("fetch cancelled")]
    Cancelled,
}

impl From<FetchError> for DomainError {
    fn from(err: FetchError) -> Self {
        DomainError::CannotFetchTitle(err.to_string())
    }
}

/// Retrieves a page and extracts the text of its first `<title>` element
#[derive(Debug, Clone, Default)]
pub struct TitleFetcher {
    client: reqwest::Client,
}

impl TitleFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `url` and return its trimmed title.
    ///
    /// The body is scanned as it arrives and reading stops at the first
    /// title. Cancelling `cancel` aborts the request in flight.
    #[instrument(skip(self, cancel), level = "debug")]
    pub async fn fetch_title(
        &self,
        cancel: &CancellationToken,
        url: &str,
    ) -> Result<String, FetchError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Title fetch cancelled");
                Err(FetchError::Cancelled)
            }
            result = self.scan_page(url) => result,
        }
    }

    async fn scan_page(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("Unexpected status {}", status);
            return Err(FetchError::Status(status));
        }

        let mut scanner = TitleScanner::new();
        while let Some(chunk) = response.chunk().await? {
            trace!("Scanning {} bytes", chunk.len());
            if let Some(title) = scanner.feed(&chunk) {
                debug!("Found title '{}'", title);
                return Ok(title);
            }
        }
        scanner.finish().ok_or(FetchError::TitleNotFound)
    }
}

/// Progress of the single forward pass over the document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum ScanState {
    #[default]
    Scanning,
    /// Inside a `<title>` element, collecting its text node
    InTitle(String),
    Found(String),
}

impl ScanState {
    fn enter_title(&mut self) {
        if !matches!(self, ScanState::Found(_)) {
            *self = ScanState::InTitle(String::new());
        }
    }

    fn push_text(&mut self, text: &str, last_in_node: bool) {
        let ScanState::InTitle(buf) = self else {
            return;
        };
        buf.push_str(text);
        if !last_in_node {
            return;
        }
        let raw = std::mem::take(buf);
        *self = if raw.is_empty() {
            // an empty element has no text token; keep looking
            ScanState::Scanning
        } else {
            ScanState::Found(decode_html_entities(&raw).trim().to_string())
        };
    }

    fn found(&self) -> Option<&str> {
        match self {
            ScanState::Found(title) => Some(title),
            _ => None,
        }
    }
}

struct Discard;

impl OutputSink for Discard {
    fn handle_chunk(&mut self, _: &[u8]) {}
}

/// Incremental `<title>` extractor over arbitrary byte chunks.
///
/// Only the title element and its text are observed; the rest of the token
/// stream passes through untouched and nothing is buffered.
pub struct TitleScanner {
    state: Rc<RefCell<ScanState>>,
    rewriter: HtmlRewriter<'static, Discard>,
    failed: bool,
}

impl TitleScanner {
    pub fn new() -> Self {
        let state = Rc::new(RefCell::new(ScanState::default()));
        let on_start = Rc::clone(&state);
        let on_text = Rc::clone(&state);

        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![
                    element!("title", move |_el| {
                        on_start.borrow_mut().enter_title();
                        Ok(())
                    }),
                    text!("title", move |chunk| {
                        on_text
                            .borrow_mut()
                            .push_text(chunk.as_str(), chunk.last_in_text_node());
                        Ok(())
                    }),
                ],
                ..Settings::default()
            },
            Discard,
        );

        Self {
            state,
            rewriter,
            failed: false,
        }
    }

    /// Feed the next body chunk; returns the title once it is complete
    pub fn feed(&mut self, chunk: &[u8]) -> Option<String> {
        if let Some(title) = self.title() {
            return Some(title);
        }
        if self.failed {
            return None;
        }
        if let Err(e) = self.rewriter.write(chunk) {
            debug!("Tokenizer stopped: {}", e);
            self.failed = true;
        }
        self.title()
    }

    /// Signal end of input; a title still being collected is completed
    pub fn finish(self) -> Option<String> {
        if let Some(title) = self.title() {
            return Some(title);
        }
        let state = Rc::clone(&self.state);
        if !self.failed {
            if let Err(e) = self.rewriter.end() {
                debug!("Tokenizer stopped at end of input: {}", e);
            }
        }
        let title = state.borrow().found().map(str::to_string);
        title
    }

    fn title(&self) -> Option<String> {
        self.state.borrow().found().map(str::to_string)
    }
}

impl Default for TitleScanner {
    fn default() -> Self {
        Self::new()
    }
}
