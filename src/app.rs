use actix_web::web;

use crate::{api, hooks, ui};

/// GitHub caps webhook payloads at 25 MB.
const MAX_PAYLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(ui::index))
        .service(
            web::resource("/webhook")
                .app_data(web::PayloadConfig::new(MAX_PAYLOAD_BYTES))
                .route(web::post().to(hooks::webhook)),
        )
        .route("/api/actions", web::get().to(api::actions))
        .route("/health", web::get().to(api::health));
}
