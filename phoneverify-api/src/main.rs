use actix_cors::Cors;
use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use tracing_subscriber::prelude::*;

use phoneverify_api::config::ApiConfig;
use phoneverify_api::{handlers, AppState};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "PhoneVerify validation service"
    }))
}

#[get("/health")]
async fn health(state: web::Data<AppState>) -> impl Responder {
    match state.config.read() {
        Ok(config) => HttpResponse::Ok().json(serde_json::json!({
            "status": "healthy",
            "mode": config.pipeline.mode.as_str()
        })),
        Err(_) => HttpResponse::InternalServerError().json(serde_json::json!({
            "status": "unhealthy"
        })),
    }
}

#[get("/settings")]
async fn get_settings(state: web::Data<AppState>) -> impl Responder {
    handlers::settings::get_settings(state).await
}

#[post("/settings/api-keys")]
async fn update_api_keys(
    state: web::Data<AppState>,
    request: web::Json<shared_types::UpdateApiKeysRequest>,
) -> impl Responder {
    handlers::settings::update_api_keys(state, request).await
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long)]
    log_file_path: Option<String>,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if let Some(log_path) = args.log_file_path {
        let log_path = std::path::Path::new(&log_path);
        let file_appender = tracing_appender::rolling::never(
            log_path.parent().unwrap_or(std::path::Path::new(".")),
            log_path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("phoneverify-api.log")),
        );
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        std::mem::forget(guard);

        tracing_subscriber::registry()
            .with(env_filter.clone())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(true)
                    .with_writer(std::io::stdout),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let (config, config_path) = ApiConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    tracing::info!("Loaded config from {:?}", config_path);

    let (host, port) = if let Some(server_config) = &config.server {
        (server_config.host.clone(), server_config.port)
    } else {
        ("127.0.0.1".to_string(), 8080)
    };
    let allowed_origins = config
        .cors
        .as_ref()
        .map(|cors| cors.allowed_origins.clone())
        .unwrap_or_default();

    tracing::info!(
        "Pipeline mode: {}, model: {}",
        config.pipeline.mode.as_str(),
        config.llm.model
    );
    if config.pipeline.mode == phoneverify_agents::PipelineMode::Llm && config.llm_api_key().is_none() {
        tracing::warn!("No LLM API key configured; validations will fail until one is set");
    }

    let state = AppState::new(config, config_path);

    tracing::info!("Starting server on {}:{}", host, port);

    let server = HttpServer::new(move || {
        let cors = if allowed_origins.is_empty() {
            Cors::default().allow_any_origin()
        } else {
            allowed_origins
                .iter()
                .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        }
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec!["Authorization", "Accept", "Content-Type"])
        .max_age(3600);

        App::new()
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .app_data(handlers::json_config())
            .service(hello)
            .service(health)
            .service(get_settings)
            .service(update_api_keys)
            .route("/api/validate", web::post().to(handlers::validation::validate_phone))
            .route("/api/stats", web::get().to(handlers::stats::get_stats))
            .route("/api/countries", web::get().to(handlers::countries::list_countries))
    })
    .bind((host.as_str(), port))?
    .run();

    let handle = server.handle();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            return;
        }

        tracing::info!("Ctrl+C received, shutting down...");
        handle.stop(true).await;
    });

    server.await?;
    Ok(())
}
