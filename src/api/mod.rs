mod chain;
mod health;
pub mod models;
mod nodes;
mod tx;

use actix_web::HttpResponse;
use actix_web::web::{self, ServiceConfig};

use crate::error::LedgerError;
pub use models::AppState;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .service(health::health_check)
            .service(chain::get_chain)
            .service(chain::validate_chain)
            .service(chain::mine_block)
            .service(tx::post_transaction)
            .service(tx::get_pending)
            .service(nodes::register_nodes)
            .service(nodes::list_nodes)
            .service(nodes::resolve_consensus),
    );
}

/// Caller mistakes are 400s; anything else is on us.
fn error_response(e: &LedgerError) -> HttpResponse {
    if e.is_client_error() {
        HttpResponse::BadRequest().body(e.to_string())
    } else {
        HttpResponse::InternalServerError().body(e.to_string())
    }
}
