use crate::helpers::app_state::AppState;
use actix_web::{web, HttpResponse, Result};

pub async fn get_stats(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(state.stats.snapshot()))
}
