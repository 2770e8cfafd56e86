//! Analysis sessions: one user's resume, job URL and latest result.
//!
//! Every change that invalidates a running analysis bumps the session's
//! sequence number. A run carries the ticket it was started with and its
//! outcome is committed only while that ticket is still current, so the
//! latest request always wins and stale results are dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::Url;
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::analysis::errors::ErrorKind;
use crate::analysis::pipeline::AnalysisPipeline;
use crate::models::resume::ResumeSummary;
use crate::models::{AnalysisReport, ResumeFile};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum AnalysisState {
    Idle,
    Uploading,
    Analyzing,
    Ready(Box<AnalysisReport>),
    Failed(ErrorKind),
}

/// Sequence number an analysis run was started with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisTicket(u64);

/// An upload in progress: the ticket it bumped to and the state it replaced.
#[derive(Debug, Clone)]
pub struct PendingUpload {
    ticket: AnalysisTicket,
    previous: AnalysisState,
}

/// Everything a spawned run needs, captured at submission time.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub ticket: AnalysisTicket,
    pub resume: ResumeFile,
    pub url: Url,
}

#[derive(Debug)]
pub struct AnalysisSession {
    id: Uuid,
    resume: Option<ResumeFile>,
    job_url: Option<Url>,
    sequence: u64,
    state: AnalysisState,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            resume: None,
            job_url: None,
            sequence: 0,
            state: AnalysisState::Idle,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// True when nothing touched the session for at least `ttl` before `now`.
    pub fn is_idle_for(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        (now - self.updated_at)
            .to_std()
            .is_ok_and(|age| age >= ttl)
    }

    fn bump(&mut self) -> AnalysisTicket {
        self.sequence += 1;
        self.updated_at = Utc::now();
        AnalysisTicket(self.sequence)
    }

    /// Marks an upload in progress and supersedes any running analysis.
    /// The returned handle goes back to [`abort_upload`](Self::abort_upload)
    /// if the upload is rejected.
    pub fn begin_upload(&mut self) -> PendingUpload {
        let ticket = self.bump();
        let previous = std::mem::replace(&mut self.state, AnalysisState::Uploading);
        PendingUpload { ticket, previous }
    }

    /// Restores the state from before a rejected upload. An analysis that
    /// was running has been superseded, so that case lands on `Idle`.
    ///
    /// When the session moved on during the upload (a job URL started a new
    /// run, another upload began) the current state already describes it and
    /// is left alone.
    pub fn abort_upload(&mut self, upload: PendingUpload) {
        if upload.ticket.0 != self.sequence {
            return;
        }
        self.state = match upload.previous {
            AnalysisState::Analyzing | AnalysisState::Uploading => AnalysisState::Idle,
            other => other,
        };
        self.updated_at = Utc::now();
    }

    /// Replaces the resume. Any previous result no longer applies.
    pub fn set_resume(&mut self, resume: ResumeFile) {
        self.resume = Some(resume);
        self.bump();
        self.state = AnalysisState::Idle;
    }

    /// Drops the resume. Returns whether there was one.
    pub fn remove_resume(&mut self) -> bool {
        let removed = self.resume.take().is_some();
        self.bump();
        self.state = AnalysisState::Idle;
        removed
    }

    /// Stores the job URL and, when a resume is present, starts a new run.
    pub fn submit_job_url(&mut self, url: Url) -> Option<PendingAnalysis> {
        self.job_url = Some(url.clone());
        self.updated_at = Utc::now();

        let resume = self.resume.clone()?;
        let ticket = self.bump();
        self.state = AnalysisState::Analyzing;
        Some(PendingAnalysis {
            ticket,
            resume,
            url,
        })
    }

    /// Applies a finished run. Returns `false` when the ticket is stale and
    /// the outcome was discarded.
    pub fn commit(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisReport, ErrorKind>,
    ) -> bool {
        if ticket.0 != self.sequence {
            return false;
        }
        self.state = match outcome {
            Ok(report) => AnalysisState::Ready(Box::new(report)),
            Err(kind) => AnalysisState::Failed(kind),
        };
        self.updated_at = Utc::now();
        true
    }

    pub fn view(&self) -> SessionView {
        let message = match &self.state {
            AnalysisState::Failed(kind) => Some(kind.user_message()),
            _ => None,
        };
        SessionView {
            id: self.id,
            state: self.state.clone(),
            message,
            resume: self.resume.as_ref().map(ResumeFile::summary),
            job_url: self.job_url.as_ref().map(Url::to_string),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub state: AnalysisState,
    /// User-facing notice when the last analysis failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub resume: Option<ResumeSummary>,
    pub job_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

/// In-memory session map shared across handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, AnalysisSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> SessionView {
        let session = AnalysisSession::new();
        let view = session.view();
        self.sessions.write().await.insert(session.id(), session);
        info!(session_id = %view.id, "Session created");
        view
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionView> {
        self.sessions.read().await.get(&id).map(AnalysisSession::view)
    }

    /// Drops a session and its resume. Returns whether it existed.
    pub async fn remove(&self, id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&id).is_some();
        if removed {
            info!(session_id = %id, "Session deleted");
        }
        removed
    }

    /// Drops every session idle for at least `ttl`. Returns how many went.
    pub async fn evict_idle(&self, ttl: Duration) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_idle_for(ttl, now));
        before - sessions.len()
    }

    /// Runs `f` against the session under the write lock.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut AnalysisSession) -> R) -> Option<R> {
        self.sessions.write().await.get_mut(&id).map(f)
    }

    pub async fn commit(
        &self,
        id: Uuid,
        ticket: AnalysisTicket,
        outcome: Result<AnalysisReport, ErrorKind>,
    ) -> bool {
        self.update(id, |session| session.commit(ticket, outcome))
            .await
            .unwrap_or(false)
    }
}

/// Evicts idle sessions every `period` until the runtime shuts down.
pub fn spawn_session_sweeper(store: SessionStore, ttl: Duration, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let evicted = store.evict_idle(ttl).await;
            if evicted > 0 {
                info!(evicted, "Evicted idle sessions");
            }
        }
    })
}

/// Runs the pipeline in the background and commits the outcome to the session.
pub fn spawn_analysis(
    store: SessionStore,
    pipeline: AnalysisPipeline,
    session_id: Uuid,
    pending: PendingAnalysis,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let outcome = pipeline
            .run(&pending.resume, &pending.url)
            .await
            .map_err(|e| {
                error!(%session_id, error = %e, "Analysis failed");
                e.kind()
            });

        if store.commit(session_id, pending.ticket, outcome).await {
            debug!(%session_id, "Analysis committed");
        } else {
            debug!(%session_id, "Discarded stale analysis result");
        }
    })
}
