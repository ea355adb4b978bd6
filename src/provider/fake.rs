//! Scripted upstreams used by unit tests.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use serde_json::Value;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpListener,
};

use crate::{
    error::{UpstreamCode, UpstreamError},
    provider::{FetchOptions, Upstream},
};

#[derive(Default)]
pub(crate) struct FakeUpstream {
    routes: Mutex<HashMap<String, Vec<Result<Value, UpstreamError>>>>,
    calls: Mutex<Vec<(String, FetchOptions)>>,
    delay: Duration,
}

impl FakeUpstream {
    pub fn new() -> Self {
        FakeUpstream::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a response for `url`. The last queued response keeps being
    /// served once the queue is drained down to it.
    pub fn respond(&self, url: &str, result: Result<Value, UpstreamError>) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_owned())
            .or_default()
            .push(result);
    }

    pub fn ok(&self, url: &str, value: Value) {
        self.respond(url, Ok(value));
    }

    pub fn fail(&self, url: &str, code: UpstreamCode) {
        self.respond(url, Err(UpstreamError::new(url, code)));
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(called, _)| called == url)
            .count()
    }

    pub fn last_options(&self, url: &str) -> Option<FetchOptions> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(called, _)| called == url)
            .map(|(_, options)| options.clone())
    }

    fn next(&self, url: &str) -> Result<Value, UpstreamError> {
        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(UpstreamError::new(url, UpstreamCode::Status(404))),
        }
    }
}

impl Upstream for FakeUpstream {
    async fn fetch(
        &self,
        url: &str,
        options: FetchOptions,
    ) -> Result<Value, UpstreamError> {
        self.calls.lock().unwrap().push((url.to_owned(), options));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        self.next(url)
    }
}

/// Starts a local HTTP/1.1 listener that answers every request with
/// `status` and `body` after `delay`. Returns its base URL.
pub(crate) async fn serve(status: u16, body: &str, delay: Duration) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    let body = body.to_owned();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let body = body.clone();
            tokio::spawn(async move {
                let mut request = [0_u8; 4096];
                let _ = socket.read(&mut request).await;
                tokio::time::sleep(delay).await;

                let response = format!(
                    "HTTP/1.1 {} Local\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    format!("http://{}", address)
}
