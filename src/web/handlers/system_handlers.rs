// src/web/handlers/system_handlers.rs
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::web::types::{ServerConfig, TextResponse};

pub async fn health_handler(config: &State<ServerConfig>) -> Json<TextResponse> {
    let template_present = config.template_path.exists();
    info!("Health check, template present: {}", template_present);

    let message = if template_present {
        "OK".to_string()
    } else {
        format!("OK (template missing: {})", config.template_path.display())
    };
    Json(TextResponse::success(message))
}
