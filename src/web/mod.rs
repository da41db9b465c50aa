// src/web/mod.rs

pub mod handlers;
pub mod types;

pub use types::*;

use anyhow::Result;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::http::{Header, Status};
use rocket::serde::json::Json;
use rocket::{catchers, get, options, post, routes, Build, Request, Response, Rocket, State};
use tracing::info;

use crate::types::FormInput;

// CORS Fairing
pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Add CORS headers to responses",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, GET, OPTIONS",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new(
            "Access-Control-Expose-Headers",
            "Content-Disposition",
        ));
    }
}

#[post("/generate", data = "<input>")]
pub async fn generate_resume(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Result<DocxResponse, ApiError> {
    handlers::generate_resume_handler(input, config).await
}

#[post("/preview", data = "<input>")]
pub async fn preview_resume(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Result<Json<DataResponse<PreviewData>>, ApiError> {
    handlers::preview_resume_handler(input, config).await
}

#[post("/validate", data = "<input>")]
pub async fn validate_resume(
    input: Json<FormInput>,
    config: &State<ServerConfig>,
) -> Json<DataResponse<ValidationData>> {
    handlers::validate_resume_handler(input, config).await
}

#[post("/sample")]
pub async fn sample_resume(config: &State<ServerConfig>) -> Result<DocxResponse, ApiError> {
    handlers::sample_resume_handler(config).await
}

#[get("/health")]
pub async fn health(config: &State<ServerConfig>) -> Json<TextResponse> {
    handlers::health_handler(config).await
}

#[options("/<_..>")]
pub async fn options() -> Status {
    Status::Ok
}

// Error catchers
#[rocket::catch(400)]
pub fn bad_request() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Invalid request format".to_string(),
        "BAD_REQUEST".to_string(),
        vec!["Check your request JSON format".to_string()],
    ))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Request body does not match the form input shape".to_string(),
        "UNPROCESSABLE_ENTITY".to_string(),
        vec![
            "Send an object with optional `counts` and `fields` keys".to_string(),
            "Field values must be strings or numbers".to_string(),
        ],
    ))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<StandardErrorResponse> {
    Json(StandardErrorResponse::new(
        "Internal server error".to_string(),
        "INTERNAL_ERROR".to_string(),
        vec!["Try again in a few moments".to_string()],
    ))
}

pub fn build_rocket(config: ServerConfig) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(config)
        .register("/api", catchers![bad_request, unprocessable, internal_error])
        .mount(
            "/api",
            routes![
                generate_resume,
                preview_resume,
                validate_resume,
                sample_resume,
                health,
                options,
            ],
        )
}

// Main server start function
pub async fn start_web_server(config: ServerConfig, port: u16) -> Result<()> {
    info!("Starting resume builder API server on port {}", port);
    info!("Template: {}", config.template_path.display());

    let figment = rocket::Config::figment()
        .merge(("port", port))
        .merge(("address", "0.0.0.0"));

    build_rocket(config)
        .configure(figment)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Server failed: {}", e))?;

    Ok(())
}
