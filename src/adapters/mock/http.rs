//! Mock HTTP client for testing.
//!
//! Provides a configurable mock that can return predefined responses,
//! queued per-URL responses, or responses computed from the incoming
//! request, while recording every request for verification.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::traits::{FormParams, HttpClient, HttpError, Response};

/// A recorded HTTP request for verification in tests.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    /// Request URL
    pub url: String,
    /// Form parameters in submission order
    pub params: FormParams,
}

impl RecordedRequest {
    /// Value of the first parameter with the given key, if any.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Configuration for a mock response.
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return a successful response
    Success(Response),
    /// Return an error
    Error(HttpError),
}

type Responder = Arc<dyn Fn(&RecordedRequest) -> MockResponse + Send + Sync>;

/// Mock HTTP client for testing.
///
/// Responses are resolved in order: a registered responder function, then
/// a queued one-shot response, then a sticky per-URL response. URLs match
/// exactly first, then by prefix. Requests with no configured response
/// fail with [`HttpError::Other`].
#[derive(Clone, Default)]
pub struct MockHttpClient {
    sticky: Arc<Mutex<HashMap<String, MockResponse>>>,
    queued: Arc<Mutex<HashMap<String, VecDeque<MockResponse>>>>,
    responders: Arc<Mutex<HashMap<String, Responder>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockHttpClient {
    /// Create a new mock HTTP client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a sticky response for a URL (exact or prefix match).
    pub fn set_response(&self, url: &str, response: MockResponse) {
        self.sticky
            .lock()
            .unwrap()
            .insert(url.to_string(), response);
    }

    /// Queue a one-shot response for a URL; queued responses are consumed
    /// in FIFO order before any sticky response is considered.
    pub fn push_response(&self, url: &str, response: MockResponse) {
        self.queued
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Register a function computing the response from the request.
    pub fn set_responder<F>(&self, url: &str, responder: F)
    where
        F: Fn(&RecordedRequest) -> MockResponse + Send + Sync + 'static,
    {
        self.responders
            .lock()
            .unwrap()
            .insert(url.to_string(), Arc::new(responder));
    }

    /// Get all recorded requests.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Recorded requests whose URL contains the given fragment.
    pub fn requests_to(&self, fragment: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url.contains(fragment))
            .collect()
    }

    fn lookup<T: Clone>(map: &HashMap<String, T>, url: &str) -> Option<T> {
        if let Some(found) = map.get(url) {
            return Some(found.clone());
        }
        map.iter()
            .find(|(pattern, _)| url.starts_with(pattern.as_str()))
            .map(|(_, v)| v.clone())
    }

    fn resolve(&self, request: &RecordedRequest) -> Option<MockResponse> {
        if let Some(responder) = Self::lookup(&self.responders.lock().unwrap(), &request.url) {
            return Some(responder(request));
        }

        {
            let mut queued = self.queued.lock().unwrap();
            if let Some(queue) = queued.get_mut(&request.url) {
                if let Some(response) = queue.pop_front() {
                    return Some(response);
                }
            }
        }

        Self::lookup(&self.sticky.lock().unwrap(), &request.url)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn post_form(&self, url: &str, params: &FormParams) -> Result<Response, HttpError> {
        let request = RecordedRequest {
            url: url.to_string(),
            params: params.clone(),
        };
        self.requests.lock().unwrap().push(request.clone());

        match self.resolve(&request) {
            Some(MockResponse::Success(response)) => Ok(response),
            Some(MockResponse::Error(err)) => Err(err),
            None => Err(HttpError::Other(format!("No mock response for URL: {}", url))),
        }
    }
}
