//! Background I/O worker and request execution
//!
//! A [`Transport`] owns one dedicated thread running a current-thread tokio
//! runtime. Work submitted through [`Transport::submit`] runs on that thread;
//! callers get a [`PendingRequest`] they can block on or await.

use crate::core::progress::{format_bytes, Progress, Next};
use crate::error::ScopeError;
use crate::platform::config::HttpClientConfig;
use futures_util::StreamExt;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::thread::{self, JoinHandle};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Status and raw (still compressed) body of a completed request
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

/// Result of an operation running on the transport worker.
///
/// Resolves exactly once. If the transport stops before the operation
/// completes, it resolves to [`ScopeError::TransportStopped`].
#[derive(Debug)]
pub struct PendingRequest<T> {
    rx: oneshot::Receiver<Result<T, ScopeError>>,
}

impl<T> PendingRequest<T> {
    /// A request that already failed, e.g. during construction
    pub(crate) fn failed(error: ScopeError) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(Err(error));
        Self { rx }
    }

    /// Block the calling thread until the operation resolves.
    ///
    /// # Panics
    ///
    /// Panics when called from within an async runtime; `.await` the request
    /// there instead.
    pub fn wait(self) -> Result<T, ScopeError> {
        self.rx.blocking_recv().unwrap_or(Err(ScopeError::TransportStopped))
    }
}

impl<T> Future for PendingRequest<T> {
    type Output = Result<T, ScopeError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(ScopeError::TransportStopped)))
    }
}

/// Owned I/O execution context
pub struct Transport {
    http: Client,
    handle: Handle,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Transport {
    /// Build the HTTP client and start the worker thread
    pub fn start(config: HttpClientConfig) -> Result<Self, ScopeError> {
        // Bodies are gunzipped by the response decoder, not by reqwest
        let mut builder = ClientBuilder::new();

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(proxy_url) = &config.proxy_url {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let http = builder.build()?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let handle = runtime.handle().clone();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let worker = thread::Builder::new()
            .name("vimeo-transport".to_string())
            .spawn(move || {
                debug!("Transport worker started");
                runtime.block_on(async {
                    // Resolves on stop() or when the sender is dropped
                    let _ = shutdown_rx.await;
                });
                // Dropping the runtime drops every task still in flight
                drop(runtime);
                debug!("Transport worker stopped");
            })?;

        Ok(Self {
            http,
            handle,
            shutdown: Mutex::new(Some(shutdown_tx)),
            worker: Mutex::new(Some(worker)),
        })
    }

    /// HTTP client shared by all requests of this transport
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// Whether the worker is still accepting work
    pub fn is_running(&self) -> bool {
        lock(&self.worker).is_some()
    }

    /// Run `task` on the worker thread
    pub fn submit<T, F>(&self, task: F) -> PendingRequest<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T, ScopeError>> + Send + 'static,
    {
        if !self.is_running() {
            return PendingRequest::failed(ScopeError::TransportStopped);
        }

        let (tx, rx) = oneshot::channel();
        self.handle.spawn(async move {
            // The caller may have dropped its PendingRequest
            let _ = tx.send(task.await);
        });
        PendingRequest { rx }
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// Idempotent. Once this returns, no submitted task runs any further.
    pub fn stop(&self) {
        if let Some(shutdown) = lock(&self.shutdown).take() {
            let _ = shutdown.send(());
        }

        let Some(worker) = lock(&self.worker).take() else {
            return;
        };

        if worker.thread().id() == thread::current().id() {
            warn!("Transport stopped from its own worker thread, not joining");
            return;
        }

        if worker.join().is_err() {
            warn!("Transport worker panicked");
        }
        info!("Transport stopped");
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Execute `request`, collecting the body and consulting `on_progress` at
/// every checkpoint: before sending, once headers arrive and after each body
/// chunk. [`Next::Abort`] ends the operation with [`ScopeError::Cancelled`].
pub async fn fetch<P>(http: &Client, request: reqwest::Request, on_progress: P) -> Result<RawResponse, ScopeError>
where
    P: Fn(&Progress) -> Next,
{
    let url = request.url().clone();
    let mut progress = Progress::new(0);

    checkpoint(&on_progress, &progress)?;

    debug!("GET {}", url);
    let response = http.execute(request).await?;
    let status = response.status();

    progress.set_total(response.content_length().unwrap_or(0));
    checkpoint(&on_progress, &progress)?;

    let mut stream = response.bytes_stream();
    let mut body = Vec::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        body.extend_from_slice(&chunk);
        progress.update(body.len() as u64);
        checkpoint(&on_progress, &progress)?;
    }

    if progress.total_size > 0 && !progress.is_complete() {
        warn!("Body from {} ended at {:.0}% of its announced length", url, progress.percent);
    }

    debug!(
        "Response {} from {}: {} in {:?}",
        status,
        url,
        format_bytes(body.len() as u64),
        progress.elapsed()
    );

    Ok(RawResponse { status, body })
}

fn checkpoint<P>(on_progress: &P, progress: &Progress) -> Result<(), ScopeError>
where
    P: Fn(&Progress) -> Next,
{
    match on_progress(progress) {
        Next::Continue => Ok(()),
        Next::Abort => {
            debug!("Operation aborted at {} bytes", progress.received_size);
            Err(ScopeError::Cancelled)
        }
    }
}
