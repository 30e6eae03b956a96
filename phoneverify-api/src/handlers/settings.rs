use crate::config::ApiKeysConfig;
use crate::helpers::app_state::AppState;
use actix_web::{web, HttpResponse, Result};
use shared_types::{ApiKeyConfig, SettingsResponse, UpdateApiKeysRequest};
use tracing::info;

/// Keeps the first six characters and caps the masked form at 40
fn mask_api_key(key: &str) -> String {
    if key.len() <= 6 {
        return key.to_string();
    }
    let visible: String = key.chars().take(6).collect();
    let hidden = key.chars().count().saturating_sub(6);
    let masked = format!("{}{}", visible, "*".repeat(hidden));
    if masked.chars().count() > 40 {
        format!("{}...", masked.chars().take(37).collect::<String>())
    } else {
        masked
    }
}

pub async fn get_settings(state: web::Data<AppState>) -> Result<HttpResponse> {
    let config = state.config.read().map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!(
            "Failed to acquire config read lock: {}",
            e
        ))
    })?;

    let llm_key = config.llm_api_key();
    let response = SettingsResponse {
        config_file_path: state.config_path.to_string_lossy().to_string(),
        api_keys: vec![ApiKeyConfig {
            name: "llm".to_string(),
            key: llm_key.map(mask_api_key),
            is_configured: llm_key.is_some(),
        }],
        pipeline_mode: config.pipeline.mode.as_str().to_string(),
        llm_model: config.llm.model.clone(),
    };

    Ok(HttpResponse::Ok().json(response))
}

/// An empty key clears the stored one
pub async fn update_api_keys(
    state: web::Data<AppState>,
    request: web::Json<UpdateApiKeysRequest>,
) -> Result<HttpResponse> {
    let req = request.into_inner();

    let mut config = state.config.write().map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!(
            "Failed to acquire config write lock: {}",
            e
        ))
    })?;

    if let Some(key) = req.llm_api_key {
        let key = Some(key.trim().to_string()).filter(|k| !k.is_empty());
        config.api_keys = Some(ApiKeysConfig { llm_api_key: key });
    }

    config.save_to(&state.config_path).map_err(|e| {
        actix_web::error::ErrorInternalServerError(format!("Failed to write config file: {}", e))
    })?;

    info!("Updated API keys in settings");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "path": state.config_path.to_string_lossy()
    })))
}
