use actix_cors::Cors;
use actix_web::middleware::{DefaultHeaders, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::application::aggregate_service::AggregateService;
use crate::application::feed_service::FeedService;
use crate::application::profile_service::ProfileService;
use crate::data::store::FeedStore;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::security::JwtKeys;
use crate::presentation::handlers;
use crate::presentation::middleware::RequestTracing;

pub async fn start_rest_server<S: FeedStore>(
    config: AppConfig,
    feed: FeedService<S>,
    aggregates: AggregateService<S>,
    profiles: ProfileService<S>,
    keys: JwtKeys,
) -> anyhow::Result<()> {
    let bind_address = (config.host.clone(), config.port);
    info!(host = %bind_address.0, port = bind_address.1, "HTTP server starting");

    let feed = web::Data::new(feed);
    let aggregates = web::Data::new(aggregates);
    let profiles = web::Data::new(profiles);
    let keys = web::Data::new(keys);

    HttpServer::new(move || {
        let cors = build_cors(&config.cors_origins);

        App::new()
            .wrap(Logger::default())
            .wrap(RequestTracing)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .app_data(feed.clone())
            .app_data(aggregates.clone())
            .app_data(profiles.clone())
            .app_data(keys.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .configure(handlers::configure::<S>),
            )
    })
    .bind(bind_address)?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

/// `*` opens the API to any origin without credentials; explicit origins
/// may send cookies and auth headers.
fn build_cors(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT"])
        .allowed_headers(vec![
            actix_web::http::header::CONTENT_TYPE,
            actix_web::http::header::AUTHORIZATION,
        ])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors.supports_credentials(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
    })
}
