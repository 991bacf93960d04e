//! In-memory transport that records requests and answers from a closure

use super::client::{RawResponse, RequestDescriptor, Transport};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Mutex;

type Responder = Box<dyn Fn(&RequestDescriptor) -> RawResponse + Send + Sync>;

pub(crate) struct RecordingTransport {
    responder: Responder,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl RecordingTransport {
    pub(crate) fn new(
        responder: impl Fn(&RequestDescriptor) -> RawResponse + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: RequestDescriptor) -> Result<RawResponse> {
        let response = (self.responder)(&request);
        self.requests.lock().unwrap().push(request);
        Ok(response)
    }
}
