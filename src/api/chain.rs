use actix_web::{HttpResponse, Responder, get, post, web};
use log::{info, warn};

use super::error_response;
use super::models::{AppState, MineResponse, ValidateResponse};
use crate::blockchain::ChainValidator;
use crate::consensus::ChainSnapshot;

/// Get the full blockchain. Peers fetch this during consensus.
#[get("/chain/")]
pub async fn get_chain(state: web::Data<AppState>) -> impl Responder {
    let ledger = state.ledger.lock().expect("mutex poisoned");
    HttpResponse::Ok().json(ChainSnapshot::of(ledger.chain()))
}

/// Validate the local chain. Hashing runs on a snapshot, off the lock and
/// on the blocking pool.
#[get("/validate/")]
pub async fn validate_chain(state: web::Data<AppState>) -> impl Responder {
    let chain = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.chain().to_vec()
    };
    let validity = match web::block(move || ChainValidator::validate(&chain)).await {
        Ok(validity) => validity,
        Err(e) => {
            warn!("GET /validate/ - worker failed: {}", e);
            return HttpResponse::InternalServerError().body("validation worker failed");
        }
    };

    let message = if validity.valid {
        "The blockchain is valid"
    } else {
        "The blockchain is not valid"
    };
    HttpResponse::Ok().json(ValidateResponse {
        message,
        valid: validity.valid,
        first_invalid_index: validity.first_invalid_index,
    })
}

/// Mine a new block from the pending pool. The proof search runs on the
/// blocking pool so request workers stay free.
#[post("/mine/")]
pub async fn mine_block(state: web::Data<AppState>) -> impl Responder {
    let worker = state.clone();
    match web::block(move || worker.miner.mine(&worker.ledger)).await {
        Ok(Ok(block)) => {
            info!("POST /mine/ - block #{} sealed", block.index);
            HttpResponse::Ok().json(MineResponse {
                message: "Congratulations, you just mined a block",
                block,
            })
        }
        Ok(Err(e)) => {
            warn!("POST /mine/ - {}", e);
            error_response(&e)
        }
        Err(e) => {
            warn!("POST /mine/ - worker failed: {}", e);
            HttpResponse::InternalServerError().body("mining worker failed")
        }
    }
}
