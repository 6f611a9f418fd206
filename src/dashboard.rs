//! Owner of the catalogs, selectors and upload session.
//!
//! The dashboard routes backend replies from its [`BackendWorker`] through the
//! session's staleness checks, keeps the [`ViewState`] in step with the
//! session, and produces a [`DashboardSnapshot`] for whatever renders it.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::backend::{Backend, BackendError, BackendUrls};
use crate::catalog::{Algorithm, Catalogs, DecisionEntry, MetricSet, Scenario};
use crate::config::AppConfig;
use crate::scoring::{self, MetricRow, RADAR_PAIR, RadarComparison};
use crate::session::{
    BackendWorker, InputChanged, SelectedFile, SessionError, SessionJob, SessionMessage, Toast,
    UploadSession, UploadStatus,
};
use crate::tusimple::{self, TuSimpleRecord};
use crate::view::{self, SliceSource, ViewEvent, ViewState};

/// Scene text shown while metadata is missing.
pub const SCENE_PENDING: &str = "分析中...";

pub struct Dashboard {
    catalogs: Arc<Catalogs>,
    view: ViewState,
    session: UploadSession,
    worker: BackendWorker,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub view: ViewState,
    pub scene_label: String,
    pub slice: SliceSource,
    pub best: Option<Algorithm>,
    pub best_metrics: Option<MetricSet>,
    pub decision: Option<DecisionEntry>,
    pub line_rows: Vec<MetricRow>,
    pub radar: Option<RadarComparison>,
    pub global_radar: Vec<MetricRow>,
    pub input_image_url: Option<String>,
    pub output_image_url: Option<String>,
    pub preview: Option<PreviewSummary>,
    pub status: UploadStatus,
    pub message: String,
    pub toast: Option<Toast>,
    pub tusimple: TuSimpleRecord,
}

/// Name and thumbnail size of the locally selected file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewSummary {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
}

impl Dashboard {
    pub fn new(
        catalogs: Arc<Catalogs>,
        config: &AppConfig,
        backend: Arc<dyn Backend>,
    ) -> Result<Self, BackendError> {
        let urls = BackendUrls::new(config.backend.trimmed_base_url())?;
        Ok(Self {
            catalogs,
            view: ViewState::with_normalize(config.session.normalize_by_default),
            session: UploadSession::new(urls, config.session.toast_duration()),
            worker: BackendWorker::new(backend),
        })
    }

    pub fn catalogs(&self) -> &Catalogs {
        &self.catalogs
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn session(&self) -> &UploadSession {
        &self.session
    }

    pub fn backend(&self) -> &Arc<dyn Backend> {
        self.worker.backend()
    }

    /// Apply a selector change made by the operator.
    ///
    /// Input changes go through the session so the image URLs and the
    /// metadata fetch follow the view.
    pub fn dispatch(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SelectInput(input) => self.select_input(input),
            event => self.reduce_view(event),
        }
    }

    pub fn select_scenario(&mut self, scenario: Scenario) {
        self.dispatch(ViewEvent::SelectScenario(scenario));
    }

    pub fn toggle_normalize(&mut self) {
        self.dispatch(ViewEvent::ToggleNormalize);
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        self.session.select_file(file);
    }

    /// Start uploading the selected file.
    pub fn upload(&mut self) -> Result<(), SessionError> {
        let ticket = self.session.upload()?;
        self.worker.submit(SessionJob::Upload(ticket));
        Ok(())
    }

    /// Show an input uploaded earlier and fetch its metadata.
    pub fn select_input(&mut self, input: impl Into<String>) {
        if let Some(changed) = self.session.select_input(input) {
            self.on_input_changed(changed);
        }
    }

    /// Drain finished backend jobs without blocking.
    pub fn poll(&mut self) -> usize {
        let mut applied = 0;
        while let Some(message) = self.worker.try_recv() {
            self.apply_message(message);
            applied += 1;
        }
        applied
    }

    /// Block until no backend job is outstanding or `timeout` elapses.
    ///
    /// Returns `true` when everything settled.
    pub fn wait_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.worker.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!("{} backend jobs still running", self.worker.in_flight());
                return false;
            }
            if let Some(message) = self.worker.recv_timeout(remaining) {
                self.apply_message(message);
            }
        }
        true
    }

    pub fn pending_jobs(&self) -> usize {
        self.worker.in_flight()
    }

    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let catalogs = self.catalogs.as_ref();
        let slice = self.view.metrics_slice(catalogs);
        let best = self.view.best_algorithm(catalogs).ok();
        let scene_label = self
            .session
            .metadata()
            .and_then(|metadata| metadata.scene.clone())
            .unwrap_or_else(|| SCENE_PENDING.to_string());
        DashboardSnapshot {
            view: self.view.clone(),
            scene_label,
            slice: self.view.slice_source(catalogs),
            best,
            best_metrics: best.and_then(|algorithm| slice.metrics.get(algorithm).copied()),
            decision: self.view.decision(catalogs).entry().cloned(),
            line_rows: scoring::metric_rows(slice.metrics, self.view.normalize),
            radar: scoring::radar_pair_rows(slice.metrics, RADAR_PAIR.0, RADAR_PAIR.1),
            global_radar: scoring::global_radar_rows(catalogs.performance.global()),
            input_image_url: self.session.input_image_url().map(String::from),
            output_image_url: self.session.output_image_url().map(String::from),
            preview: self.session.preview().map(|preview| {
                let (width, height) = preview.dimensions();
                PreviewSummary {
                    file_name: preview.source_name().to_string(),
                    width,
                    height,
                }
            }),
            status: self.session.status(),
            message: self.session.message().to_string(),
            toast: self.session.toast().cloned(),
            tusimple: tusimple::preview_for(
                self.view.scenario,
                self.view.current_input.as_deref(),
            ),
        }
    }

    fn apply_message(&mut self, message: SessionMessage) {
        match message {
            SessionMessage::Uploaded { token, result } => {
                if let Some(changed) = self.session.apply_upload(token, result) {
                    self.on_input_changed(changed);
                }
            }
            SessionMessage::MetadataLoaded { ticket, result } => {
                let metadata = self.session.apply_metadata(&ticket, result).cloned();
                if let Some(metadata) = metadata {
                    self.reduce_view(ViewEvent::MetadataArrived(metadata));
                }
            }
        }
    }

    fn on_input_changed(&mut self, changed: InputChanged) {
        let ticket = self.session.begin_metadata(&changed.input);
        self.reduce_view(ViewEvent::SelectInput(changed.input));
        self.worker.submit(SessionJob::Metadata(ticket));
    }

    fn reduce_view(&mut self, event: ViewEvent) {
        self.view = view::reduce(self.view.clone(), event);
    }
}
