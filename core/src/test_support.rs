//! Recording stub transport for unit tests.
//!
//! Canned responses are pushed FIFO; every executed request is recorded so
//! tests can assert on exact methods, paths, and call counts — including
//! that an operation issued zero requests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::entity::Entity;
use crate::error::Error;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub struct StubTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    calls: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, status: u16, body: &str) {
        self.responses.lock().unwrap().push_back(HttpResponse {
            status,
            body: body.to_string(),
        });
    }

    pub fn calls(&self) -> Vec<HttpRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for StubTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, Error> {
        self.calls.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Error::Transport("no stubbed response left".to_string()))
    }
}

/// An entity with full credentials pointed at a fake host.
pub fn entity(stub: Arc<StubTransport>) -> Entity {
    Entity::new(stub, "k", Some("t".to_string()))
        .unwrap()
        .with_base_url("http://localhost:3000/1")
}
