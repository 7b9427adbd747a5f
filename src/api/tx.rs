use actix_web::{HttpResponse, Responder, get, post, web};
use log::{debug, info, warn};

use super::error_response;
use super::models::{AppState, NewTxResponse, PendingResponse};
use crate::transaction::NewTransactionRequest;

/// Queue a transaction for the next block.
#[post("/transactions/")]
pub async fn post_transaction(
    state: web::Data<AppState>,
    body: web::Json<NewTransactionRequest>,
) -> impl Responder {
    let tx = match body.into_inner().into_transaction() {
        Ok(tx) => tx,
        Err(e) => {
            warn!("POST /transactions/ - rejected: {}", e);
            return error_response(&e);
        }
    };

    let queued = {
        let mut ledger = state.ledger.lock().expect("mutex poisoned");
        let queued = ledger.queue_transaction(tx.sender.clone(), tx.receiver.clone(), tx.amount);
        debug!("POST /transactions/ - pending pool size {}", ledger.pending().len());
        queued
    };

    match queued {
        Ok(index) => {
            info!(
                "POST /transactions/ - {} -> {} ({}) queued for block {}",
                tx.sender, tx.receiver, tx.amount, index
            );
            HttpResponse::Created().json(NewTxResponse {
                message: format!("This transaction will be added to block {index}"),
                index,
            })
        }
        Err(e) => error_response(&e),
    }
}

/// List transactions waiting for the next block.
#[get("/transactions/pending/")]
pub async fn get_pending(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(PendingResponse {
        size: ledger.pending().len(),
        transactions: ledger.pending(),
    })
}
