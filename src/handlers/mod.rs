pub mod health_handler;
pub mod proxy_handler;
pub mod session_handler;
pub mod trivia_handler;

use actix_web::web;

pub use health_handler::{health_check, health_check_live};
pub use proxy_handler::proxy;
pub use session_handler::{create_session, exit_to_setup, get_session, play_again, select_answer};
pub use trivia_handler::{get_categories, get_setup_options};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check)
        .service(health_check_live)
        .service(get_categories)
        .service(get_setup_options)
        .service(create_session)
        .service(get_session)
        .service(select_answer)
        .service(play_again)
        .service(exit_to_setup)
        .service(proxy);
}
