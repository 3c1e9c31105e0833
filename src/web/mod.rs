// src/web/mod.rs
//! HTTP side of the bot: Telegram webhook receiver and a health probe

pub mod types;

pub use types::*;

use crate::core::config_manager::ServerConfig;
use crate::core::TelegramClient;
use crate::delivery::DeliveryAdapter;
use crate::types::Update;
use anyhow::{Context, Result};
use rocket::figment::Figment;
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::serde::json::Json;
use rocket::{catchers, get, post, routes, Build, Request, Rocket, State};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const SECRET_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

/// Passes when the webhook secret is unset or the request carries it
pub struct TelegramOrigin;

#[rocket::async_trait]
impl<'r> FromRequest<'r> for TelegramOrigin {
    type Error = &'static str;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let settings = match req.guard::<&State<WebhookSettings>>().await {
            Outcome::Success(settings) => settings,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, "webhook settings missing"))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        match settings.secret.as_deref() {
            None => Outcome::Success(TelegramOrigin),
            Some(expected) if req.headers().get_one(SECRET_HEADER) == Some(expected) => {
                Outcome::Success(TelegramOrigin)
            }
            Some(_) => {
                warn!("Rejected webhook call without a valid secret token");
                Outcome::Error((Status::Unauthorized, "invalid secret token"))
            }
        }
    }
}

#[post("/", format = "json", data = "<update>")]
pub async fn telegram_update(
    update: Json<Update>,
    _origin: TelegramOrigin,
    bot: &State<Arc<DeliveryAdapter>>,
) -> Status {
    let update = update.into_inner();
    debug!("Webhook update {}", update.update_id);
    // Telegram only needs the acknowledgement; the command runs on its own task
    let _ = bot.inner().spawn_update(update);
    Status::Ok
}

#[get("/health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

#[rocket::catch(400)]
pub fn bad_request() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Invalid update payload", "BAD_REQUEST"))
}

#[rocket::catch(401)]
pub fn unauthorized() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Missing or invalid secret token", "UNAUTHORIZED"))
}

#[rocket::catch(422)]
pub fn unprocessable() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Update could not be parsed", "UNPROCESSABLE"))
}

#[rocket::catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new("Internal server error", "INTERNAL_ERROR"))
}

pub fn build_rocket(
    figment: Figment,
    server: &ServerConfig,
    adapter: Arc<DeliveryAdapter>,
) -> Rocket<Build> {
    let webhook_path = normalize_mount(&server.webhook_path);

    rocket::custom(figment)
        .manage(adapter)
        .manage(WebhookSettings {
            secret: server.webhook_secret.clone(),
        })
        .register("/", catchers![bad_request, unauthorized, unprocessable, internal_error])
        .mount("/", routes![health])
        .mount(webhook_path, routes![telegram_update])
}

/// Serve the webhook until rocket shuts down
pub async fn start_web_server(
    server: &ServerConfig,
    adapter: Arc<DeliveryAdapter>,
    client: &TelegramClient,
) -> Result<()> {
    let figment = rocket::Config::figment()
        .merge(("address", server.address.clone()))
        .merge(("port", server.port));

    if let Some(public_url) = &server.public_url {
        let url = format!(
            "{}{}",
            public_url.trim_end_matches('/'),
            normalize_mount(&server.webhook_path)
        );
        client
            .set_webhook(&url, server.webhook_secret.as_deref())
            .await
            .context("Failed to register webhook")?;
    }

    info!(
        "Listening on {}:{}, webhook at {}",
        server.address, server.port, server.webhook_path
    );

    build_rocket(figment, server, adapter)
        .launch()
        .await
        .map_err(|e| anyhow::anyhow!("Web server stopped with an error: {}", e))?;

    Ok(())
}

fn normalize_mount(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
