use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::error_response;
use super::models::{AppState, ConsensusResponse, NodesResponse, RegisterNodesRequest};
use crate::consensus::resolve;
use crate::error::LedgerError;

/// Register peer replicas. Addresses are normalized to host:port.
#[post("/nodes/")]
pub async fn register_nodes(
    state: web::Data<AppState>,
    body: web::Json<RegisterNodesRequest>,
) -> impl Responder {
    let Some(addresses) = body.into_inner().nodes else {
        let e = LedgerError::MalformedRequest("no nodes given".into());
        warn!("POST /nodes/ - {}", e);
        return error_response(&e);
    };

    let registered = {
        let mut nodes = state.nodes.lock().expect("mutex poisoned");
        nodes.register(&addresses)
    };

    match registered {
        Ok(nodes) => {
            info!("POST /nodes/ - {} peers known", nodes.len());
            HttpResponse::Created().json(NodesResponse {
                message: Some("Peers registered"),
                nodes,
            })
        }
        Err(e) => {
            warn!("POST /nodes/ - {}", e);
            error_response(&e)
        }
    }
}

#[get("/nodes/")]
pub async fn list_nodes(state: web::Data<AppState>) -> impl Responder {
    let nodes = state.nodes.lock().expect("mutex poisoned").addresses();
    HttpResponse::Ok().json(NodesResponse {
        message: None,
        nodes,
    })
}

/// Adopt the longest valid chain among registered peers.
#[post("/consensus/")]
pub async fn resolve_consensus(state: web::Data<AppState>) -> impl Responder {
    let peers = state.nodes.lock().expect("mutex poisoned").addresses();
    let resolution = resolve(&state.ledger, &peers, &state.fetcher).await;

    let message = if resolution.replaced {
        "The chain was replaced by the longest valid chain"
    } else {
        "The local chain is already the longest"
    };
    HttpResponse::Ok().json(ConsensusResponse {
        message,
        replaced: resolution.replaced,
        chain: resolution.chain,
    })
}
