//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::analysis::errors::{AnalysisError, ValidationError};
use crate::analysis::session::{spawn_analysis, AnalysisSession, SessionView};
use crate::analysis::validation::{validate_job_url, validate_resume_upload};
use crate::errors::AppError;
use crate::models::resume::MAX_RESUME_BYTES;
use crate::models::{AnalysisReport, AnalysisResult, JobPosting, ResumeFile, Suggestion};
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
const JOB_URL_FIELD: &str = "job_url";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchRequest {
    pub resume_text: String,
    pub posting: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub result: AnalysisResult,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
pub struct JobUrlRequest {
    pub url: String,
}

/// Resume part of a multipart body, before validation.
struct ResumeUpload {
    file_name: String,
    content_type: Option<String>,
    data: Bytes,
}

impl ResumeUpload {
    fn validate(self) -> Result<ResumeFile, ValidationError> {
        validate_resume_upload(&self.file_name, self.content_type.as_deref(), self.data)
    }
}

#[derive(Default)]
struct AnalysisForm {
    resume: Option<ResumeUpload>,
    job_url: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyses
///
/// One-shot analysis: multipart `resume` file plus `job_url` field.
/// Both inputs are validated before any extraction or fetching starts.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_form(&mut multipart).await?;

    let resume = form
        .resume
        .ok_or(ValidationError::MissingField(RESUME_FIELD))?
        .validate()?;
    let url = validate_job_url(form.job_url.as_deref().unwrap_or_default())?;

    let report = state.pipeline.run(&resume, &url).await?;
    Ok(Json(report))
}

/// POST /api/v1/match
///
/// Pure matching on text the caller already has: no extraction, no fetch.
pub async fn handle_match(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<MatchResponse>, AppError> {
    let (result, suggestions) = state
        .pipeline
        .evaluate(&request.resume_text, &request.posting)
        .map_err(AnalysisError::from)?;

    Ok(Json(MatchResponse {
        result,
        suggestions,
    }))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionView>) {
    let view = state.sessions.create().await;
    (StatusCode::CREATED, Json(view))
}

/// GET /api/v1/sessions/:id
///
/// Clients poll this while the state is `analyzing`.
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// DELETE /api/v1/sessions/:id
///
/// Drops the session and its resume. A run still in flight commits nowhere.
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// PUT /api/v1/sessions/:id/resume
///
/// Replaces the session's resume. A rejected upload leaves the session as it
/// was, except that an analysis already running is superseded.
pub async fn handle_upload_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<SessionView>, AppError> {
    let upload = state
        .sessions
        .update(id, AnalysisSession::begin_upload)
        .await
        .ok_or_else(|| session_not_found(id))?;

    let uploaded = async {
        let form = read_form(&mut multipart).await?;
        let resume = form
            .resume
            .ok_or(ValidationError::MissingField(RESUME_FIELD))?
            .validate()?;
        Ok::<_, AppError>(resume)
    }
    .await;

    match uploaded {
        Ok(resume) => {
            info!(
                session_id = %id,
                file = resume.file_name(),
                bytes = resume.size(),
                "Resume uploaded"
            );
            state
                .sessions
                .update(id, |session| {
                    session.set_resume(resume);
                    session.view()
                })
                .await
                .map(Json)
                .ok_or_else(|| session_not_found(id))
        }
        Err(err) => {
            warn!(session_id = %id, error = %err, "Resume upload rejected");
            state
                .sessions
                .update(id, |session| session.abort_upload(upload))
                .await;
            Err(err)
        }
    }
}

/// DELETE /api/v1/sessions/:id/resume
pub async fn handle_remove_resume(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    state
        .sessions
        .update(id, |session| {
            if session.remove_resume() {
                info!(session_id = %id, "Resume removed");
            }
            session.view()
        })
        .await
        .map(Json)
        .ok_or_else(|| session_not_found(id))
}

/// PUT /api/v1/sessions/:id/job-url
///
/// Stores the job URL. When the session has a resume an analysis starts in
/// the background and the session moves to `analyzing`.
pub async fn handle_submit_job_url(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<JobUrlRequest>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let url = validate_job_url(&request.url)?;

    let (pending, view) = state
        .sessions
        .update(id, |session| {
            let pending = session.submit_job_url(url);
            (pending, session.view())
        })
        .await
        .ok_or_else(|| session_not_found(id))?;

    if let Some(pending) = pending {
        info!(session_id = %id, url = %pending.url, "Analysis started");
        spawn_analysis(state.sessions.clone(), state.pipeline.clone(), id, pending);
    }

    Ok((StatusCode::ACCEPTED, Json(view)))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}

/// Reads the `resume` and `job_url` parts. Unknown parts are ignored.
async fn read_form(multipart: &mut Multipart) -> Result<AnalysisForm, AppError> {
    let mut form = AnalysisForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(RESUME_FIELD) => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(multipart_error)?;
                form.resume = Some(ResumeUpload {
                    file_name,
                    content_type,
                    data,
                });
            }
            Some(JOB_URL_FIELD) => {
                form.job_url = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Bodies over the request limit surface as the same size error as an
/// oversized file that made it through.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ValidationError::FileTooLarge {
            max: MAX_RESUME_BYTES,
        }
        .into()
    } else {
        AppError::Validation(format!("Invalid multipart body: {}", err.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, Response, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::analysis::fakes::{pdf_bytes, sample_posting, FakeExtractor, FakeFetcher, RESUME_TEXT};
    use crate::analysis::{AnalysisPipeline, SessionStore};
    use crate::config::Config;
    use crate::matching::{KeywordMatcher, SkillsTaxonomy};
    use crate::models::resume::MAX_RESUME_BYTES;
    use crate::routes::{build_router, MULTIPART_OVERHEAD};
    use crate::state::AppState;

    const BOUNDARY: &str = "resumatch-test-boundary";

    fn app_with(extractor: FakeExtractor, fetcher: FakeFetcher) -> Router {
        let config = Config {
            port: 0,
            rust_log: "info".to_string(),
            fetch_timeout: Duration::from_secs(1),
            fetch_user_agent: "resumatch-test".to_string(),
            extra_skills: Vec::new(),
            session_ttl: Duration::from_secs(3600),
        };
        let pipeline = AnalysisPipeline::new(
            Arc::new(extractor),
            Arc::new(fetcher),
            Arc::new(KeywordMatcher::new(Arc::new(SkillsTaxonomy::builtin()))),
            Arc::new(SkillsTaxonomy::builtin()),
        );
        build_router(AppState {
            config,
            pipeline,
            sessions: SessionStore::new(),
        })
    }

    fn app() -> Router {
        app_with(
            FakeExtractor::text(RESUME_TEXT),
            FakeFetcher::posting(sample_posting()),
        )
    }

    fn multipart_body(file: Option<(&str, &str, &[u8])>, job_url: Option<&str>) -> Body {
        let mut body = Vec::new();
        if let Some((name, mime, data)) = file {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"resume\"; \
                     filename=\"{name}\"\r\nContent-Type: {mime}\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        if let Some(url) = job_url {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"job_url\"\r\n\r\n{url}\r\n"
                )
                .as_bytes(),
            );
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Body::from(body)
    }

    fn multipart_request(method: &str, uri: &str, body: Body) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(body)
            .unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response<Body>) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        (status, json_body(response).await)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), empty_request("GET", "/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "resumatch-api");
    }

    #[tokio::test]
    async fn test_match_endpoint_scores_text() {
        let request = json_request(
            "POST",
            "/api/v1/match",
            json!({
                "resumeText": "Agile coach focused on Team Leadership",
                "posting": {
                    "title": "Scrum Master",
                    "keywords": ["Agile", "Scrum", "Team Leadership"]
                }
            }),
        );
        let (status, body) = send(&app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["keywordMatch"], 67);
        assert_eq!(body["result"]["keywords"]["missing"], json!(["Scrum"]));
        assert_eq!(body["suggestions"][0]["category"], "critical");
    }

    #[tokio::test]
    async fn test_match_endpoint_rejects_empty_resume() {
        let request = json_request(
            "POST",
            "/api/v1/match",
            json!({ "resumeText": "", "posting": { "keywords": ["Agile"] } }),
        );
        let (status, body) = send(&app(), request).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
        assert_eq!(
            body["error"]["message"],
            "There was an error analyzing your resume. Please try again."
        );
    }

    #[tokio::test]
    async fn test_one_shot_analysis() {
        let (mime, data) = pdf_bytes();
        let body = multipart_body(
            Some(("resume.pdf", mime, data)),
            Some("https://jobs.example.com/pm"),
        );
        let (status, body) = send(&app(), multipart_request("POST", "/api/v1/analyses", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"]["keywordMatch"], 67);
        assert_eq!(body["posting"]["url"], "https://jobs.example.com/pm");
        assert!(body["analyzedAt"].is_string());
    }

    #[tokio::test]
    async fn test_one_shot_rejects_unsupported_file_type() {
        let body = multipart_body(
            Some(("photo.png", "image/png", b"\x89PNG")),
            Some("https://jobs.example.com/pm"),
        );
        let (status, body) = send(&app(), multipart_request("POST", "/api/v1/analyses", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["error"]["message"]
            .as_str()
            .unwrap()
            .starts_with("Invalid file type"));
    }

    #[tokio::test]
    async fn test_one_shot_rejects_malformed_url() {
        let (mime, data) = pdf_bytes();
        let body = multipart_body(Some(("resume.pdf", mime, data)), Some("not a url"));
        let (status, body) = send(&app(), multipart_request("POST", "/api/v1/analyses", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Invalid URL. Please enter a valid URL for the job posting."
        );
    }

    #[tokio::test]
    async fn test_one_shot_requires_both_inputs() {
        let body = multipart_body(None, Some("https://jobs.example.com/pm"));
        let (status, _) = send(&app(), multipart_request("POST", "/api/v1/analyses", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (mime, data) = pdf_bytes();
        let body = multipart_body(Some(("resume.pdf", mime, data)), None);
        let (status, body) = send(&app(), multipart_request("POST", "/api/v1/analyses", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "URL required. Please enter a job posting URL.");
    }

    #[tokio::test]
    async fn test_one_shot_fetch_failure_is_generic() {
        let app = app_with(FakeExtractor::text(RESUME_TEXT), FakeFetcher::status(404));
        let (mime, data) = pdf_bytes();
        let body = multipart_body(
            Some(("resume.pdf", mime, data)),
            Some("https://jobs.example.com/pm"),
        );
        let (status, body) = send(&app, multipart_request("POST", "/api/v1/analyses", body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"]["code"], "ANALYSIS_FAILED");
    }

    #[tokio::test]
    async fn test_unknown_session_is_not_found() {
        let uri = format!("/api/v1/sessions/{}", uuid::Uuid::new_v4());
        let (status, body) = send(&app(), empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_session_flow_reaches_ready() {
        let app = app();

        let (status, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["state"]["status"], "idle");
        let id = created["id"].as_str().unwrap().to_string();

        let (mime, data) = pdf_bytes();
        let upload = multipart_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/resume"),
            multipart_body(Some(("resume.pdf", mime, data)), None),
        );
        let (status, uploaded) = send(&app, upload).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(uploaded["state"]["status"], "idle");
        assert_eq!(uploaded["resume"]["fileName"], "resume.pdf");

        let submit = json_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/job-url"),
            json!({ "url": "https://jobs.example.com/pm" }),
        );
        let (status, submitted) = send(&app, submit).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(submitted["state"]["status"], "analyzing");

        let mut ready = Value::Null;
        for _ in 0..50 {
            let (_, view) = send(&app, empty_request("GET", &format!("/api/v1/sessions/{id}"))).await;
            if view["state"]["status"] == "ready" {
                ready = view;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ready["state"]["detail"]["result"]["keywordMatch"], 67);
    }

    #[tokio::test]
    async fn test_job_url_without_resume_stays_idle() {
        let app = app();
        let (_, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        let id = created["id"].as_str().unwrap().to_string();

        let submit = json_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/job-url"),
            json!({ "url": "https://jobs.example.com/pm" }),
        );
        let (status, view) = send(&app, submit).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(view["state"]["status"], "idle");
        assert_eq!(view["jobUrl"], "https://jobs.example.com/pm");
    }

    #[tokio::test]
    async fn test_rejected_upload_keeps_session_unchanged() {
        let app = app();
        let (_, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        let id = created["id"].as_str().unwrap().to_string();

        let upload = multipart_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/resume"),
            multipart_body(Some(("notes.txt", "text/plain", b"hello")), None),
        );
        let (status, _) = send(&app, upload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, view) = send(&app, empty_request("GET", &format!("/api/v1/sessions/{id}"))).await;
        assert_eq!(view["state"]["status"], "idle");
        assert!(view["resume"].is_null());
    }

    #[tokio::test]
    async fn test_body_over_limit_is_file_too_large() {
        let app = app();
        let (_, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        let id = created["id"].as_str().unwrap().to_string();

        let oversized = vec![b'%'; MAX_RESUME_BYTES + MULTIPART_OVERHEAD + 1];
        let upload = multipart_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/resume"),
            multipart_body(Some(("resume.pdf", "application/pdf", oversized.as_slice())), None),
        );
        let (status, body) = send(&app, upload).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(
            body["error"]["message"],
            "File too large. Please upload a file smaller than 5MB."
        );

        let (_, view) = send(&app, empty_request("GET", &format!("/api/v1/sessions/{id}"))).await;
        assert_eq!(view["state"]["status"], "idle");
    }

    #[tokio::test]
    async fn test_delete_session() {
        let app = app();
        let (_, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        let uri = format!("/api/v1/sessions/{}", created["id"].as_str().unwrap());

        let response = app.clone().oneshot(empty_request("DELETE", &uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let (status, _) = send(&app, empty_request("GET", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_remove_resume() {
        let app = app();
        let (_, created) = send(&app, empty_request("POST", "/api/v1/sessions")).await;
        let id = created["id"].as_str().unwrap().to_string();

        let (mime, data) = pdf_bytes();
        let upload = multipart_request(
            "PUT",
            &format!("/api/v1/sessions/{id}/resume"),
            multipart_body(Some(("resume.pdf", mime, data)), None),
        );
        send(&app, upload).await;

        let (status, view) =
            send(&app, empty_request("DELETE", &format!("/api/v1/sessions/{id}/resume"))).await;
        assert_eq!(status, StatusCode::OK);
        assert!(view["resume"].is_null());
    }
}
