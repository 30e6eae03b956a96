use crate::helpers::app_state::AppState;
use actix_web::{web, HttpResponse, Result};
use phoneverify_agents::{derive_agent_statuses, PipelineError, PipelineObserver};
use shared_types::{
    AgentLog, AgentType, ErrorResponse, LogStatus, ValidationErrorResponse, ValidationRequest,
    ValidationResponse,
};
use tracing::{error, warn};

pub async fn validate_phone(
    state: web::Data<AppState>,
    request: web::Json<ValidationRequest>,
) -> Result<HttpResponse> {
    let request = request.into_inner();

    // Bad input is rejected before configuration problems are reported
    if let Err(err) = extractors::validate_request(&request.phone_number, &request.country_code) {
        return Ok(bad_request(&PipelineError::from(err)));
    }

    let pipeline = match state.pipeline() {
        Ok(pipeline) => pipeline,
        Err(err) => {
            state.stats.on_failure(&err);
            return Ok(fatal_response(&err));
        }
    };

    match pipeline.run_isolated(request).await {
        Ok(report) => Ok(HttpResponse::Ok().json(ValidationResponse::from(report))),
        Err(err @ PipelineError::RequestValidation(_)) => Ok(bad_request(&err)),
        Err(err) => Ok(fatal_response(&err)),
    }
}

fn bad_request(err: &PipelineError) -> HttpResponse {
    warn!("Rejected validation request: {}", err);
    HttpResponse::BadRequest().json(ErrorResponse {
        error: err.to_string(),
    })
}

fn fatal_response(err: &PipelineError) -> HttpResponse {
    error!("Validation pipeline failed: {}", err);
    let logs = vec![AgentLog::new(
        AgentType::Orchestrator,
        format!("Pipeline error: {}", err),
        LogStatus::Error,
    )];
    HttpResponse::InternalServerError().json(ValidationErrorResponse {
        error: err.to_string(),
        agents: derive_agent_statuses(&logs, true),
        logs,
    })
}
