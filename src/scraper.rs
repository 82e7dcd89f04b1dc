use std::collections::VecDeque;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use anyhow::{bail, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::codegen;
use crate::dom::Browser;
use crate::parser::scrape_url;
use crate::schema::{APIEndpoint, GenerateResult};

pub const DEFAULT_WORKERS: usize = 4;

/// Batch stats returned after completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    pub total: usize,
    pub ok: usize,
    pub errors: usize,
}

impl RunStats {
    pub fn from_results(results: &[GenerateResult]) -> Self {
        let ok = results.iter().filter(|r| r.is_ok()).count();
        Self {
            total: results.len(),
            ok,
            errors: results.len() - ok,
        }
    }
}

/// What a worker tells the dispatcher.
enum WorkerEvent {
    /// Browser is up, send the first job.
    Ready(usize),
    /// Job done, send the next one.
    Finished(usize, GenerateResult),
}

/// Scrape every endpoint and render its types on a fixed pool of workers.
///
/// Each worker launches its own browser with `launch` and keeps it for its whole life;
/// the browser is dropped (and its process ended) when the worker exits. Workers own a
/// one-slot job channel; the dispatcher loop hands out the next endpoint whenever a worker
/// reports in, and closes that channel once the queue is empty. Results come back in
/// completion order. A failed endpoint is recorded in its result and never stops the
/// batch. Endpoints still queued or in flight after every worker has exited are reported
/// as failures too, so every endpoint gets exactly one result.
pub async fn generate_all<B, F>(
    endpoints: Vec<APIEndpoint>,
    workers: usize,
    package: &str,
    launch: F,
) -> Result<Vec<GenerateResult>>
where
    B: Browser + 'static,
    F: Fn() -> Result<B> + Send + Sync + 'static,
{
    if endpoints.is_empty() {
        bail!("no endpoints discovered");
    }

    let total = endpoints.len();
    let workers = workers.clamp(1, total);
    info!(endpoints = total, workers, "Generating types");

    let mut queue: VecDeque<APIEndpoint> = endpoints.into();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send events, the dispatcher loop below answers them
    let (event_tx, mut event_rx) = mpsc::channel::<WorkerEvent>(workers * 2);
    let launch = Arc::new(launch);

    let mut job_txs = Vec::with_capacity(workers);
    let mut handles = Vec::with_capacity(workers);
    for id in 0..workers {
        let (job_tx, job_rx) = mpsc::channel::<APIEndpoint>(1);
        job_txs.push(Some(job_tx));
        let launch = Arc::clone(&launch);
        let events = event_tx.clone();
        let package = package.to_string();
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(id, launch.as_ref(), job_rx, &events, &package)
        }));
    }

    // Drop our copy so event_rx closes when all workers finish
    drop(event_tx);

    let mut in_flight: Vec<Option<APIEndpoint>> = vec![None; workers];
    let mut results = Vec::with_capacity(total);
    while let Some(event) = event_rx.recv().await {
        let id = match event {
            WorkerEvent::Ready(id) => id,
            WorkerEvent::Finished(id, result) => {
                in_flight[id] = None;
                if let Some(err) = &result.error {
                    warn!(endpoint = %result.endpoint.name, error = %err, "Endpoint failed");
                }
                results.push(result);
                pb.inc(1);
                id
            }
        };

        let Some(endpoint) = queue.pop_front() else {
            // Closing the job channel tells the worker to exit
            job_txs[id] = None;
            continue;
        };
        let Some(job_tx) = &job_txs[id] else {
            queue.push_front(endpoint);
            continue;
        };
        in_flight[id] = Some(endpoint.clone());
        let sent = job_tx.send(endpoint).await;
        if let Err(mpsc::error::SendError(endpoint)) = sent {
            in_flight[id] = None;
            job_txs[id] = None;
            queue.push_front(endpoint);
        }
    }
    pb.finish_and_clear();

    for handle in handles {
        if let Err(e) = handle.await {
            warn!(error = %e, "Worker panicked");
        }
    }

    for endpoint in in_flight.into_iter().flatten() {
        results.push(GenerateResult::failed(endpoint, "worker stopped before finishing"));
    }
    // Anything still queued was never picked up
    for endpoint in queue {
        results.push(GenerateResult::failed(endpoint, "no browser worker available"));
    }

    let stats = RunStats::from_results(&results);
    info!(total = stats.total, ok = stats.ok, errors = stats.errors, "Generation finished");
    Ok(results)
}

fn run_worker<B, F>(
    id: usize,
    launch: &F,
    mut jobs: mpsc::Receiver<APIEndpoint>,
    events: &mpsc::Sender<WorkerEvent>,
    package: &str,
) where
    B: Browser,
    F: Fn() -> Result<B>,
{
    let browser = match launch() {
        Ok(browser) => browser,
        Err(e) => {
            warn!(worker = id, error = %e, "Browser launch failed, worker exiting");
            return;
        }
    };

    if events.blocking_send(WorkerEvent::Ready(id)).is_err() {
        return;
    }
    while let Some(endpoint) = jobs.blocking_recv() {
        info!(worker = id, endpoint = %endpoint.name, "Processing");
        let result = generate_guarded(&browser, endpoint, package);
        if events.blocking_send(WorkerEvent::Finished(id, result)).is_err() {
            break;
        }
    }
}

/// [`generate_one`], with a panic turned into a failed result so the worker keeps going.
fn generate_guarded<B: Browser>(browser: &B, endpoint: APIEndpoint, package: &str) -> GenerateResult {
    let fallback = endpoint.clone();
    match panic::catch_unwind(AssertUnwindSafe(|| generate_one(browser, endpoint, package))) {
        Ok(result) => result,
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".into());
            warn!(endpoint = %fallback.name, panic = %message, "Scrape panicked");
            GenerateResult::failed(fallback, format!("panicked: {}", message))
        }
    }
}

/// Scrape one endpoint page and render its code. The rendered module is the schema's
/// category, or `package` when the path yields none.
pub fn generate_one<B: Browser>(browser: &B, mut endpoint: APIEndpoint, package: &str) -> GenerateResult {
    let schema = match scrape_url(browser, &endpoint.url) {
        Ok(schema) => schema,
        Err(e) => return GenerateResult::failed(endpoint, format!("{:#}", e)),
    };

    let module = if schema.category.is_empty() { package } else { schema.category.as_str() };
    let code = codegen::render(&schema, module);
    if !schema.category.is_empty() {
        endpoint.category = schema.category.clone();
    }

    GenerateResult {
        endpoint,
        schema: Some(schema),
        code: Some(code),
        error: None,
    }
}

// ── Tests ──
