use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{ReportClassroomRequest, ReportResponse};
use crate::routes::{error_response, AppState};
use crate::services::ProviderError;

/// Configure report routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/reports", web::post().to(report_classroom));
}

/// POST /api/reports
///
/// Forwards a "classroom not listed" report to the configured mail sink.
async fn report_classroom(
    state: web::Data<AppState>,
    req: web::Json<ReportClassroomRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let Some(sink) = &state.reports else {
        return error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            "unavailable",
            "Report delivery is not configured",
        );
    };

    let report = req.into_inner();
    let report_id = uuid::Uuid::new_v4().to_string();

    match sink.submit(&report).await {
        Ok(()) => {
            tracing::info!(
                "Report {} submitted for {} {}",
                report_id,
                report.building,
                report.room_number
            );
            HttpResponse::Ok().json(ReportResponse {
                success: true,
                report_id,
            })
        }
        Err(e) => {
            tracing::error!("Failed to submit report {}: {}", report_id, e);
            let status = match e {
                ProviderError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::BAD_GATEWAY,
            };
            error_response(status, "report_failed", "Failed to send report")
        }
    }
}
