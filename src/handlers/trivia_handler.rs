use actix_web::{get, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::response::SetupOptions};

#[get("/api/categories")]
pub async fn get_categories(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let categories = state.trivia_service.fetch_categories().await?;
    Ok(HttpResponse::Ok().json(categories))
}

/// Setup form options. A failed category fetch still renders the form, just
/// without category options.
#[get("/api/setup")]
pub async fn get_setup_options(state: web::Data<AppState>) -> HttpResponse {
    let options = match state.trivia_service.fetch_categories().await {
        Ok(data) => SetupOptions::new(data.trivia_categories, None),
        Err(err) => {
            log::warn!("Categories unavailable for setup form: {}", err);
            SetupOptions::new(Vec::new(), Some(err.to_string()))
        }
    };
    HttpResponse::Ok().json(options)
}
