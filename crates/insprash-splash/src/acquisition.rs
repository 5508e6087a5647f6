use std::sync::{Arc, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use insprash_config::FallbackSet;
use rand::seq::IndexedRandom;
use tokio::sync::oneshot;

use crate::service::TextService;

/// Outcome of one acquisition cycle, tagged with where the text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionResult {
    Generated(String),
    Fallback(String),
}

impl AcquisitionResult {
    pub fn text(&self) -> &str {
        match self {
            AcquisitionResult::Generated(t) | AcquisitionResult::Fallback(t) => t,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            AcquisitionResult::Generated(t) | AcquisitionResult::Fallback(t) => t,
        }
    }

    pub fn is_generated(&self) -> bool {
        matches!(self, AcquisitionResult::Generated(_))
    }

    /// Short label for logs.
    pub fn source(&self) -> &'static str {
        match self {
            AcquisitionResult::Generated(_) => "generated",
            AcquisitionResult::Fallback(_) => "fallback",
        }
    }
}

/// Single-assignment result cell shared by the racing parties.
///
/// The first [`Verdict::decide`] wins; every later one is rejected and
/// changes nothing.
#[derive(Debug, Default)]
pub struct Verdict {
    cell: OnceLock<AcquisitionResult>,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `result` if nothing was decided yet. Returns whether it won.
    pub fn decide(&self, result: AcquisitionResult) -> bool {
        self.cell.set(result).is_ok()
    }

    /// The decided result, deciding `fallback()` first if nobody has.
    pub fn settle(&self, fallback: impl FnOnce() -> AcquisitionResult) -> AcquisitionResult {
        self.cell.get_or_init(fallback).clone()
    }

    pub fn get(&self) -> Option<&AcquisitionResult> {
        self.cell.get()
    }
}

/// Fetches a message from a [`TextService`] within a latency bound, or
/// falls back to a random local phrase.
pub struct TextAcquisition {
    service: Option<Arc<dyn TextService>>,
    fallbacks: FallbackSet,
}

impl TextAcquisition {
    pub fn new(service: Arc<dyn TextService>, fallbacks: FallbackSet) -> Self {
        Self { service: Some(service), fallbacks }
    }

    /// An acquisition that never calls a service.
    pub fn disabled(fallbacks: FallbackSet) -> Self {
        Self { service: None, fallbacks }
    }

    pub fn is_enabled(&self) -> bool {
        self.service.is_some()
    }

    pub fn fallbacks(&self) -> &FallbackSet {
        &self.fallbacks
    }

    /// Runs one acquisition cycle.
    ///
    /// The service call runs on its own OS thread so a hung request never
    /// blocks the async runtime. This future completes within `timeout` (plus
    /// scheduling slack) whatever the service does; a call that finishes late
    /// is discarded and its thread is left to end on its own.
    pub async fn acquire(&self, prompt: &str, timeout: Duration) -> AcquisitionResult {
        let Some(service) = self.service.clone() else {
            log::debug!("text generation disabled; using a fallback phrase");
            return AcquisitionResult::Fallback(self.pick());
        };

        let started = Instant::now();
        let verdict = Arc::new(Verdict::new());
        let (done_tx, done_rx) = oneshot::channel::<()>();

        let worker_verdict = Arc::clone(&verdict);
        let worker_prompt = prompt.to_owned();
        let spawned = thread::Builder::new()
            .name("insprash-generate".to_string())
            .spawn(move || {
                match service.generate(&worker_prompt) {
                    Ok(text) => {
                        let text = text.trim().to_string();
                        if !worker_verdict.decide(AcquisitionResult::Generated(text)) {
                            log::debug!(
                                "generated text arrived after {:?}; discarded",
                                started.elapsed()
                            );
                        }
                    }
                    Err(e) => log::warn!("text generation failed: {e}"),
                }
                // Nobody listens any more once the timeout won.
                let _ = done_tx.send(());
            });

        if let Err(e) = spawned {
            log::warn!("could not start generation worker: {e}");
            return AcquisitionResult::Fallback(self.pick());
        }

        match tokio::time::timeout(timeout, done_rx).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => log::warn!("generation worker ended without reporting"),
            Err(_) => {
                if verdict.decide(AcquisitionResult::Fallback(self.pick())) {
                    log::info!("text generation timed out after {timeout:?}");
                }
            }
        }

        let result = verdict.settle(|| AcquisitionResult::Fallback(self.pick()));
        log::debug!("acquisition settled as {} in {:?}", result.source(), started.elapsed());
        result
    }

    /// Uniformly random fallback phrase.
    pub fn pick(&self) -> String {
        self.fallbacks
            .phrases()
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| self.fallbacks.first().to_string())
    }
}
