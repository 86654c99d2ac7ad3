mod admin;
mod advisors;
mod appointments;
mod auth;
mod config;
mod database;
mod error;
mod feedback;
mod models;
mod notifications;
mod protocol;
mod push;
mod rate_limit;
mod schema;
#[cfg(test)]
mod testing;
mod users;
mod utils;
mod validation;

use actix_cors::Cors;
use actix_web::{
    get,
    middleware::{from_fn, DefaultHeaders, Logger},
    web, App, HttpResponse, HttpServer,
};
use anyhow::Context;
use chrono::Utc;
use diesel::{r2d2::ConnectionManager, PgConnection};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use crate::{
    config::Config,
    error::{json_error_handler, path_error_handler, query_error_handler},
    protocol::SimpleResponse,
    push::PushClient,
    rate_limit::{limit_by_ip, IpRateLimiter},
};

pub type DbPool = r2d2::Pool<ConnectionManager<PgConnection>>;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = database::build_pool(&config.database_url, config.db_pool_size)?;
    {
        let mut conn = pool.get().context("Failed to connect to the database")?;
        database::migrations::run(&mut *conn)?;
    }

    let pool = web::Data::new(pool);
    let push = web::Data::new(PushClient::new(config.push.clone())?);
    let limiter = web::Data::new(IpRateLimiter::new(&config.rate_limit)?);
    rate_limit::spawn_cleanup(limiter.clone());
    let bind = config.bind_addr();
    let config = web::Data::new(config);

    tracing::info!(
        host = %bind.0,
        port = bind.1,
        push_enabled = config.push.enabled,
        "starting advising server"
    );

    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(push.clone())
            .app_data(limiter.clone())
            .app_data(config.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(security_headers())
            .wrap(cors(&config.cors_origin))
            .wrap(Logger::default())
            .configure(routes)
    })
    .bind(bind)?
    .run()
    .await?;

    Ok(())
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(
            web::scope("/api")
                .wrap(from_fn(limit_by_ip))
                .service(web::scope("/auth").configure(auth::config))
                .service(web::scope("/users").configure(users::config))
                .service(web::scope("/advisors").configure(advisors::config))
                .service(web::scope("/appointments").configure(appointments::config))
                .service(web::scope("/notifications").configure(notifications::config))
                .service(web::scope("/feedback").configure(feedback::config))
                .service(web::scope("/admin").configure(admin::config)),
        )
        .default_service(web::to(not_found));
}

#[get("/health")]
async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "OK",
        "message": "Server is running",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(SimpleResponse::err("Route not found"))
}

/// `*` allows any origin, otherwise a comma separated allow-list.
fn cors(origins: &str) -> Cors {
    let cors = Cors::default()
        .allow_any_method()
        .allow_any_header()
        .max_age(3600);

    if origins.trim() == "*" {
        return cors.allow_any_origin();
    }
    origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .fold(cors.supports_credentials(), |cors, origin| {
            cors.allowed_origin(origin)
        })
}

fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "SAMEORIGIN"))
        .add(("Referrer-Policy", "no-referrer"))
}
