use actix_web::{delete, get, post, web, HttpRequest, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    middleware::get_request_id,
    models::dto::{
        request::{GameSetupRequest, SelectAnswerRequest},
        response::MessageResponse,
    },
};

#[post("/api/sessions")]
pub async fn create_session(
    state: web::Data<AppState>,
    request: web::Json<GameSetupRequest>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    // Category ids are checked against the list when it is available.
    let known = state.trivia_service.fetch_categories().await.ok();
    let params = request
        .into_inner()
        .to_question_params(state.config.question_amount, known.as_ref())?;

    log::info!(
        "Starting session for {:?} (request {})",
        params,
        get_request_id(&req).unwrap_or_default()
    );
    let view = state.session_service.start_session(params).await?;
    Ok(HttpResponse::Created().json(view))
}

#[get("/api/sessions/{id}")]
pub async fn get_session(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.get_session(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

/// `answer` must be one of the view's `answers[].text`; anything else leaves
/// the session unchanged.
#[post("/api/sessions/{id}/answer")]
pub async fn select_answer(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    request: web::Json<SelectAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    request.validate()?;
    let view = state
        .session_service
        .select_answer(&id, &request.answer)
        .await?;
    Ok(HttpResponse::Ok().json(view))
}

#[post("/api/sessions/{id}/play-again")]
pub async fn play_again(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let view = state.session_service.play_again(&id).await?;
    Ok(HttpResponse::Ok().json(view))
}

#[delete("/api/sessions/{id}")]
pub async fn exit_to_setup(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    state.session_service.exit_to_setup(&id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse {
        message: "Session closed".to_string(),
    }))
}
