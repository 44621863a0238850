use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use trivia_server::{
    app_state::AppState, config::Config, handlers, middleware::RequestIdMiddleware,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env();
    let bind_addr = (config.web_server_host.clone(), config.web_server_port);

    log::info!(
        "starting HTTP server on {}:{} (upstream {}, questions via {})",
        bind_addr.0,
        bind_addr.1,
        config.trivia_upstream_host,
        config.trivia_api_base
    );

    let sweep_interval = config.session_sweep_interval();
    let state = AppState::new(config).map_err(std::io::Error::other)?;
    state.session_service.spawn_idle_sweeper(sweep_interval);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "DELETE"])
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::default())
            .wrap(cors)
            .configure(handlers::configure)
    })
    .bind(bind_addr)?
    .run()
    .await
}
