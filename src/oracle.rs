//! On-chain queries for the state-oracle contract.
//!
//! Reads `getProofParams()` so the tool proves exactly the accounts and
//! slots the deployed oracle is watching, instead of trusting CLI input to
//! stay in sync with the contract.

use num_bigint::BigUint;

use crate::error::{ProofGenError, Result};
use crate::header::keccak256;
use crate::normalize::{normalize_address, normalize_bytes};
use crate::rpc::RpcClient;

const METHOD: &str = "eth_call";

const POOL_SLOT_COUNT: usize = 2;
const STETH_SLOT_COUNT: usize = 6;
const PARAM_WORDS: usize = 2 + POOL_SLOT_COUNT + STETH_SLOT_COUNT;

/// Targets of one proof run: the two accounts and their storage slots.
///
/// Slots are kept as hex quantity strings, which is the form the proof
/// fetcher sends on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofParams {
    pub pool_address: [u8; 20],
    pub steth_address: [u8; 20],
    pub pool_slots: Vec<String>,
    pub steth_slots: Vec<String>,
}

/// Call `getProofParams()` on the oracle contract.
///
/// The ABI return layout is ten static 32-byte words: pool address, stETH
/// address, two pool slots, six stETH slots.
pub async fn fetch_proof_params(client: &RpcClient, contract: &str) -> Result<ProofParams> {
    let digest = keccak256(b"getProofParams()");
    let selector = &digest[..4];
    let to = format!("0x{}", hex::encode(normalize_address(contract)?));

    let result = client
        .call(
            METHOD,
            serde_json::json!([{"to": to, "data": format!("0x{}", hex::encode(selector))}, "latest"]),
        )
        .await?;

    let raw = normalize_bytes(
        result
            .as_str()
            .ok_or_else(|| ProofGenError::missing_field(METHOD, "result"))?,
    )?;

    let params = params_from_words(&raw)?;
    tracing::info!(
        pool = %format!("0x{}", hex::encode(params.pool_address)),
        steth = %format!("0x{}", hex::encode(params.steth_address)),
        "read proof params from oracle contract"
    );
    Ok(params)
}

fn params_from_words(raw: &[u8]) -> Result<ProofParams> {
    if raw.len() != PARAM_WORDS * 32 {
        return Err(ProofGenError::format(
            "getProofParams return data",
            format!("{} bytes", raw.len()),
        ));
    }

    let word = |i: usize| &raw[i * 32..(i + 1) * 32];

    let address = |i: usize| -> Result<[u8; 20]> {
        let w = word(i);
        if w[..12].iter().any(|b| *b != 0) {
            return Err(ProofGenError::format(
                "address word",
                format!("0x{}", hex::encode(w)),
            ));
        }
        let mut out = [0u8; 20];
        out.copy_from_slice(&w[12..]);
        Ok(out)
    };

    let slot = |i: usize| format!("0x{:x}", BigUint::from_bytes_be(word(i)));

    Ok(ProofParams {
        pool_address: address(0)?,
        steth_address: address(1)?,
        pool_slots: (2..2 + POOL_SLOT_COUNT).map(&slot).collect(),
        steth_slots: (2 + POOL_SLOT_COUNT..PARAM_WORDS).map(&slot).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_words() -> Vec<u8> {
        let mut raw = Vec::new();
        for tag in [0x11u8, 0x22] {
            raw.extend_from_slice(&[0u8; 12]);
            raw.extend_from_slice(&[tag; 20]);
        }
        for slot in 0u8..8 {
            let mut w = [0u8; 32];
            w[31] = slot;
            raw.extend_from_slice(&w);
        }
        raw
    }

    #[test]
    fn words_decode_into_params() {
        let params = params_from_words(&sample_words()).unwrap();
        assert_eq!(params.pool_address, [0x11; 20]);
        assert_eq!(params.steth_address, [0x22; 20]);
        assert_eq!(params.pool_slots, vec!["0x0", "0x1"]);
        assert_eq!(
            params.steth_slots,
            vec!["0x2", "0x3", "0x4", "0x5", "0x6", "0x7"]
        );
    }

    #[test]
    fn short_return_data_is_rejected() {
        assert!(params_from_words(&[0u8; 64]).is_err());
    }

    #[test]
    fn dirty_address_padding_is_rejected() {
        let mut raw = sample_words();
        raw[0] = 0xff;
        assert!(params_from_words(&raw).is_err());
    }
}
