use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;
use crate::models::{
    ClassroomRecord, CreateClassroomRequest, MessageResponse, SearchParams, UpdateClassroomRequest,
};
use crate::routes::{directory_error_response, error_response, AppState};

/// Configure classroom directory routes
///
/// The search routes are registered before `/classrooms/{id}` so that
/// `search` is never taken for a classroom id.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/classrooms", web::get().to(list_classrooms))
        .route("/classrooms", web::post().to(create_classroom))
        .route("/classrooms/search", web::get().to(search_classrooms))
        .route("/classrooms/search/{query}", web::get().to(search_classrooms_by_path))
        .route("/classrooms/{id}", web::get().to(get_classroom))
        .route("/classrooms/{id}", web::put().to(update_classroom))
        .route("/classrooms/{id}", web::delete().to(delete_classroom));
}

/// GET /api/classrooms
async fn list_classrooms(state: web::Data<AppState>) -> impl Responder {
    let classrooms = state.directory.list_all().await;
    HttpResponse::Ok().json(classrooms)
}

/// GET /api/classrooms/{id}
async fn get_classroom(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.directory.get(&id).await {
        Some(classroom) => HttpResponse::Ok().json(classroom),
        None => error_response(StatusCode::NOT_FOUND, "not_found", "Classroom not found"),
    }
}

/// GET /api/classrooms/search?q={query}&favorites={id,id}
///
/// A missing or blank `q` lists every classroom, favorites first.
async fn search_classrooms(
    state: web::Data<AppState>,
    params: web::Query<SearchParams>,
) -> impl Responder {
    let query = params.q.as_deref().unwrap_or("");
    run_search(&state, query, &params).await
}

/// GET /api/classrooms/search/{query}?favorites={id,id}
async fn search_classrooms_by_path(
    state: web::Data<AppState>,
    path: web::Path<String>,
    params: web::Query<SearchParams>,
) -> impl Responder {
    run_search(&state, &path, &params).await
}

async fn run_search(state: &AppState, query: &str, params: &SearchParams) -> HttpResponse {
    let favorites = params.favorite_set();
    let results: Vec<ClassroomRecord> = state.directory.search(query, &favorites).await;

    tracing::debug!("Search {:?} matched {} classrooms", query, results.len());

    HttpResponse::Ok().json(results)
}

/// POST /api/classrooms
async fn create_classroom(
    state: web::Data<AppState>,
    req: web::Json<CreateClassroomRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    match state.directory.create(req.into_inner().into()).await {
        Ok(classroom) => HttpResponse::Created().json(classroom),
        Err(e) => {
            tracing::error!("Error adding classroom: {}", e);
            directory_error_response(&e)
        }
    }
}

/// PUT /api/classrooms/{id}
async fn update_classroom(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateClassroomRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return error_response(StatusCode::BAD_REQUEST, "validation_failed", errors.to_string());
    }

    let id = path.into_inner();

    match state.directory.update(&id, req.into_inner().into()).await {
        Ok(classroom) => HttpResponse::Ok().json(classroom),
        Err(e) => {
            tracing::error!("Error updating classroom {}: {}", id, e);
            directory_error_response(&e)
        }
    }
}

/// DELETE /api/classrooms/{id}
async fn delete_classroom(state: web::Data<AppState>, path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();

    match state.directory.delete(&id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Classroom deleted successfully".to_string(),
        }),
        Err(e) => {
            tracing::error!("Error deleting classroom {}: {}", id, e);
            directory_error_response(&e)
        }
    }
}
