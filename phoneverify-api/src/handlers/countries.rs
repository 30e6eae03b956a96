use actix_web::{HttpResponse, Result};
use shared_types::supported_countries;

pub async fn list_countries() -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(supported_countries()))
}
