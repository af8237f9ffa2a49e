//! HTTP inbound adapter exposing the clinic REST endpoints.

use actix_web::web;

pub mod error;
pub mod health;
pub mod records;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use crate::domain::ApiResult;

/// Register every `/api/v1` route plus the JSON and path error handlers.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler));
    users::configure(cfg);
    records::configure(cfg);
}
