use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ApplicationId, Decision, UserId};
use super::intake::NewApplication;
use super::repository::{ApplicationRepository, ApplicationStatusView, RepositoryError};
use super::service::{LoanApplicationService, ServiceError};

/// Router builder exposing the loan workflow endpoints.
pub fn loan_router<R>(service: Arc<LoanApplicationService<R>>) -> Router
where
    R: ApplicationRepository + 'static,
{
    Router::new()
        .route("/api/v1/loans/types", get(loan_types_handler::<R>))
        .route(
            "/api/v1/loans/applications",
            post(create_handler::<R>).get(list_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id",
            get(fetch_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id/submit",
            post(submit_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id/review",
            post(review_handler::<R>),
        )
        .route(
            "/api/v1/loans/applications/:application_id/decision",
            post(decision_handler::<R>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuery {
    user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DecisionRequest {
    decision: Decision,
}

pub(crate) async fn loan_types_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    (StatusCode::OK, axum::Json(service.loan_types())).into_response()
}

pub(crate) async fn create_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    axum::Json(submission): axum::Json<NewApplication>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.create(submission) {
        Ok(application) => {
            let view = ApplicationStatusView::from_application(&application);
            (StatusCode::CREATED, axum::Json(view)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    Query(query): Query<ListQuery>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    let result = match query.user_id {
        Some(user_id) => service.list_by_user(&UserId(user_id)),
        None => service.list_all(),
    };

    match result {
        Ok(applications) => (StatusCode::OK, axum::Json(applications)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn fetch_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.get(&ApplicationId(application_id)) {
        Ok(application) => (StatusCode::OK, axum::Json(application)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.submit(&ApplicationId(application_id)).await {
        Ok(application) => {
            let payload = json!({
                "success": true,
                "message": "Application submitted successfully",
                "status": application.status.label(),
                "risk_score": application.risk_score(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    Path(application_id): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service.review(&ApplicationId(application_id)).await {
        Ok(outcome) => {
            let payload = json!({
                "success": true,
                "message": "Application review completed",
                "risk": outcome.risk,
                "fraud": outcome.fraud,
                "documents": outcome.documents,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn decision_handler<R>(
    State(service): State<Arc<LoanApplicationService<R>>>,
    Path(application_id): Path<String>,
    axum::Json(request): axum::Json<DecisionRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
{
    match service
        .decide(&ApplicationId(application_id), request.decision)
        .await
    {
        Ok(application) => {
            let payload = json!({
                "success": true,
                "message": format!("Application {} successfully", application.status.label()),
                "status": application.status.label(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: ServiceError) -> Response {
    let status = match &error {
        ServiceError::ApplicationNotFound | ServiceError::CreditReportNotFound => {
            StatusCode::NOT_FOUND
        }
        ServiceError::InvalidState { .. } => StatusCode::CONFLICT,
        ServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::ReviewFailed(_) => StatusCode::BAD_GATEWAY,
        ServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        ServiceError::Repository(_) | ServiceError::Credit(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}
