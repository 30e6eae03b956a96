pub mod countries;
pub mod settings;
pub mod stats;
pub mod validation;

use actix_web::{error::InternalError, web, HttpResponse};
use shared_types::ErrorResponse;

/// Malformed bodies get the same `{error}` shape as other rejections
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid request body: {}", err),
        });
        InternalError::from_response(err, response).into()
    })
}
