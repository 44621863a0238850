use actix_web::{get, http::header, http::StatusCode, web, HttpRequest, HttpResponse};

use crate::{app_state::AppState, errors::AppError};

/// Maps `/api/proxy/<path>?<query>` onto the upstream host, keeping path and
/// query untouched.
pub fn rewrite_target(upstream_host: &str, path: &str, query: &str) -> String {
    let host = upstream_host.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if query.is_empty() {
        format!("{}/{}", host, path)
    } else {
        format!("{}/{}?{}", host, path, query)
    }
}

#[get("/api/proxy/{path:.*}")]
pub async fn proxy(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: HttpRequest,
) -> Result<HttpResponse, AppError> {
    let target = rewrite_target(
        &state.config.trivia_upstream_host,
        &path.into_inner(),
        req.query_string(),
    );
    log::debug!("proxy -> {}", target);

    let upstream = state.http_client.get(&target).send().await.map_err(|e| {
        log::error!("Proxy request to {} failed: {}", target, e);
        AppError::from(e)
    })?;

    let status =
        StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let content_type = upstream
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = upstream.bytes().await?;

    let mut response = HttpResponse::build(status);
    if let Some(content_type) = content_type {
        response.insert_header((header::CONTENT_TYPE, content_type));
    }
    Ok(response.body(body.to_vec()))
}
