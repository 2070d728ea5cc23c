//! CallBreach CLI
//!
//! ```text
//! callbreach                  read candidate lines / flow JSON from stdin
//! callbreach simulate <key>   score a simulation dataset
//! callbreach datasets         list dataset keys
//! ```
//!
//! Policy comes from `CALLBREACH_POLICY_FILE`, `CALLBREACH_SIMULATION`
//! selects a dataset for the stdin mode as well.

use std::error::Error;

use sysinfo::System;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, error::TrySendError};

use callbreach_core::constants::{APP_NAME, APP_VERSION};
use callbreach_core::logic::capture::{cancel_pair, collect_window, CaptureEvent};
use callbreach_core::logic::exposure::Flow;
use callbreach_core::logic::session::{report_for_dataset, ExposureReport, ScanSession, SessionError};
use callbreach_core::logic::signal::DeviceContext;
use callbreach_core::logic::simulation;
use callbreach_core::{ExposureError, ExposurePolicy};

type CliResult<T> = Result<T, Box<dyn Error>>;

#[tokio::main]
async fn main() -> CliResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let policy = ExposurePolicy::from_env()?;
    let args: Vec<String> = std::env::args().skip(1).collect();

    let report = match args.first().map(String::as_str) {
        Some("datasets") => {
            for key in simulation::DATASETS {
                println!("{}", key);
            }
            return Ok(());
        }
        Some("simulate") => {
            let key = args.get(1).ok_or("usage: callbreach simulate <dataset>")?;
            report_for_dataset(key, &policy)?
        }
        Some(other) => return Err(format!("unknown command: {}", other).into()),
        None if policy.is_simulation() => ScanSession::new(policy)?.close()?,
        None => scan_stdin(policy).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// One scan over stdin: `candidate:` lines go to the window, `{...}` lines are flows
async fn scan_stdin(policy: ExposurePolicy) -> CliResult<ExposureReport> {
    let mut session = ScanSession::new(policy)?;
    let settings = session.policy().capture.clone();

    let (tx, rx) = mpsc::channel(settings.max_candidates.max(1));
    let (flow_tx, mut flow_rx) = mpsc::channel::<Flow>(settings.max_findings.max(1));
    let (cancel, signal) = cancel_pair();

    let reader = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('{') {
                match serde_json::from_str::<Flow>(line) {
                    Ok(flow) => {
                        if !queue_flow(&flow_tx, flow) {
                            break;
                        }
                    }
                    Err(e) => log::warn!("Skipping bad flow line: {}", e),
                }
            } else if tx.send(CaptureEvent::Candidate(line.to_string())).await.is_err() {
                break;
            }
        }
        if tx.send(CaptureEvent::Close).await.is_err() {
            log::debug!("Capture window already closed at end of input");
        }
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut closed = collect_window(rx, settings, signal).await?;
    reader.abort();

    while let Ok(flow) = flow_rx.try_recv() {
        match session.add_flow(&flow) {
            Ok(_) => {}
            Err(SessionError::Input(e @ ExposureError::CapacityExceeded { .. })) => {
                log::warn!("Dropping remaining flows: {}", e);
                break;
            }
            Err(SessionError::Input(e @ ExposureError::MalformedInput(_))) => {
                log::warn!("Skipping flow: {}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    closed.record = closed.record.with_device(device_context());

    Ok(session.complete_window(closed)?)
}

/// Queue a flow without waiting; a full queue drops it. False once the
/// receiving side is gone.
fn queue_flow(flow_tx: &mpsc::Sender<Flow>, flow: Flow) -> bool {
    match flow_tx.try_send(flow) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            log::warn!(
                "Flow queue full ({} flows), dropping flow line",
                flow_tx.max_capacity()
            );
            true
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

/// Host facts that stand in for the browser's device fingerprint
fn device_context() -> DeviceContext {
    let mut sys = System::new();
    sys.refresh_cpu();
    sys.refresh_memory();

    let cores = sys.cpus().len() as u32;
    let memory_gb = sys.total_memory() as f32 / (1024.0 * 1024.0 * 1024.0);
    let offset_min = chrono::Local::now().offset().local_minus_utc() / 60;

    DeviceContext {
        core_count: (cores > 0).then_some(cores),
        memory_gb: (memory_gb > 0.0).then_some(memory_gb),
        pixel_ratio: None,
        timezone_offset_min: Some(offset_min),
    }
}
