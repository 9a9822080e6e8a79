/*
[INPUT]:  Bound client, list endpoint and pagination parameters
[OUTPUT]: Pages of typed results with before/after continuation tracking
[POS]:    HTTP layer - cursor-based pagination over list endpoints
[UPDATE]: When pagination headers or query encoding change
*/

use std::marker::PhantomData;

use reqwest::Method;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::http::{CoinbaseClient, RequestEnvelope, Result};

/// Which continuation token a page request follows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Older results, driven by the `after` token
    Next,
    /// Newer results, driven by the `before` token
    Prev,
}

/// Cursor lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    HasMore,
    /// Terminal: no further requests are issued
    Exhausted,
}

/// Continuation tokens, page size and static filters of one list operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaginationParams {
    pub before: Option<String>,
    pub after: Option<String>,
    pub limit: Option<u32>,
    /// Additional query parameters, kept in insertion order
    pub extra: Vec<(String, String)>,
}

impl PaginationParams {
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn add_extra_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra.push((key.into(), value.into()));
    }

    fn token(&self, direction: Direction) -> Option<&str> {
        match direction {
            Direction::Next => self.after.as_deref(),
            Direction::Prev => self.before.as_deref(),
        }
    }

    /// Query string for a request in `direction`, empty if there is nothing to send
    pub fn encode(&self, direction: Direction) -> String {
        let mut query = url::form_urlencoded::Serializer::new(String::new());

        if let Some(token) = self.token(direction).filter(|t| !t.is_empty()) {
            let name = match direction {
                Direction::Next => "after",
                Direction::Prev => "before",
            };
            query.append_pair(name, token);
        }
        if let Some(limit) = self.limit {
            query.append_pair("limit", &limit.to_string());
        }
        for (key, value) in &self.extra {
            query.append_pair(key, value);
        }

        query.finish()
    }

    /// No continuation token left for `direction`
    pub fn is_done(&self, direction: Direction) -> bool {
        self.token(direction).is_none_or(str::is_empty)
    }
}

/// Stateful pager over a list endpoint returning JSON arrays of `T`
///
/// Borrowing `&mut self` per page keeps at most one request in flight.
#[derive(Debug)]
pub struct Cursor<'a, T> {
    client: &'a CoinbaseClient,
    method: Method,
    path: String,
    body: Option<String>,
    pagination: PaginationParams,
    state: CursorState,
    _item: PhantomData<fn() -> T>,
}

impl<'a, T: DeserializeOwned> Cursor<'a, T> {
    pub fn new(
        client: &'a CoinbaseClient,
        method: Method,
        path: impl Into<String>,
        pagination: PaginationParams,
    ) -> Self {
        Self {
            client,
            method,
            path: path.into(),
            body: None,
            pagination,
            state: CursorState::HasMore,
            _item: PhantomData,
        }
    }

    /// Serialized body sent unchanged with every page request
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn has_more(&self) -> bool {
        self.state == CursorState::HasMore
    }

    pub fn pagination(&self) -> &PaginationParams {
        &self.pagination
    }

    /// Fetch the page following the `after` token
    pub async fn next_page(&mut self, cancel: &CancellationToken) -> Result<Vec<T>> {
        self.page(cancel, Direction::Next).await
    }

    /// Fetch the page preceding the `before` token
    pub async fn prev_page(&mut self, cancel: &CancellationToken) -> Result<Vec<T>> {
        self.page(cancel, Direction::Prev).await
    }

    async fn page(&mut self, cancel: &CancellationToken, direction: Direction) -> Result<Vec<T>> {
        if self.state == CursorState::Exhausted {
            return Ok(Vec::new());
        }

        let envelope = RequestEnvelope {
            method: self.method.clone(),
            path: self.page_path(direction),
            body: self.body.clone(),
        };

        let (meta, items) = match self.client.execute::<Vec<T>>(cancel, &envelope).await {
            Ok(page) => page,
            Err(err) => {
                self.state = CursorState::Exhausted;
                return Err(err);
            }
        };

        self.pagination.before = meta.before().map(str::to_string);
        self.pagination.after = meta.after().map(str::to_string);

        if self.pagination.is_done(direction) {
            self.state = CursorState::Exhausted;
        }

        debug!(
            path = %self.path,
            ?direction,
            items = items.len(),
            state = ?self.state,
            "cursor page fetched"
        );

        Ok(items)
    }

    fn page_path(&self, direction: Direction) -> String {
        let query = self.pagination.encode(direction);
        if query.is_empty() {
            return self.path.clone();
        }
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{separator}{query}", self.path)
    }
}

impl CoinbaseClient {
    /// Open a cursor over a `GET` list endpoint
    pub fn cursor<T: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        pagination: PaginationParams,
    ) -> Cursor<'_, T> {
        Cursor::new(self, Method::GET, path, pagination)
    }
}
