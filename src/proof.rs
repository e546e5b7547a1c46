//! Account and storage proof fetching via `eth_getProof`.
//!
//! Every proof node arrives as a hex string and is decoded into a structured
//! trie node (branch: 17 entries, extension/leaf: 2). Nodes are treated as
//! opaque values here: never interpreted, only re-encoded at composition
//! time. Node order within a path and slot order across paths are both
//! load-bearing and preserved exactly as returned.

use serde_json::Value;

use crate::error::{ProofGenError, Result};
use crate::normalize::{normalize_bytes, to_hex_string};
use crate::rlp::{self, Item};
use crate::rpc::RpcClient;

const METHOD: &str = "eth_getProof";

/// One Merkle-Patricia path, root-first, leaf-last.
pub type ProofPath = Vec<Item>;

/// The account's own trie path plus one storage path per requested slot,
/// keyed by request position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProof {
    pub account: ProofPath,
    pub storage: Vec<ProofPath>,
}

/// Fetch the Merkle proof for `address` and its `slots` at a concrete block.
///
/// Slots may be decimal or hex strings; both are sent as canonical hex
/// quantities. The address is sent lowercase as the node expects.
pub async fn fetch_account_proof(
    client: &RpcClient,
    block_number: u64,
    address: &[u8; 20],
    slots: &[String],
) -> Result<AccountProof> {
    let address_hex = format!("0x{}", hex::encode(address));
    let hex_slots = slots
        .iter()
        .map(|s| to_hex_string(s))
        .collect::<Result<Vec<_>>>()?;

    let result = client
        .call(
            METHOD,
            serde_json::json!([address_hex, hex_slots, format!("0x{:x}", block_number)]),
        )
        .await?;

    let proof = proof_from_response(&result)?;
    tracing::info!(
        address = %address_hex,
        account_nodes = proof.account.len(),
        storage_paths = proof.storage.len(),
        "fetched account proof"
    );
    Ok(proof)
}

/// Structurally validate and decode an `eth_getProof` result payload.
pub fn proof_from_response(result: &Value) -> Result<AccountProof> {
    let obj = result
        .as_object()
        .ok_or_else(|| ProofGenError::missing_field(METHOD, "proof object"))?;

    let account = decode_proof_nodes(
        obj.get("accountProof")
            .and_then(|v| v.as_array())
            .ok_or_else(|| ProofGenError::missing_field(METHOD, "accountProof"))?,
    )?;

    let entries = obj
        .get("storageProof")
        .and_then(|v| v.as_array())
        .ok_or_else(|| ProofGenError::missing_field(METHOD, "storageProof"))?;

    let mut storage = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let nodes = entry
            .get("proof")
            .and_then(|v| v.as_array())
            .ok_or_else(|| {
                ProofGenError::missing_field(METHOD, format!("storageProof[{}].proof", i))
            })?;
        storage.push(decode_proof_nodes(nodes)?);
    }

    Ok(AccountProof { account, storage })
}

/// Hex-decode then RLP-decode each node, keeping order.
fn decode_proof_nodes(nodes: &[Value]) -> Result<ProofPath> {
    nodes
        .iter()
        .map(|node| {
            let hex_str = node
                .as_str()
                .ok_or_else(|| ProofGenError::format("proof node", node.to_string()))?;
            rlp::decode(&normalize_bytes(hex_str)?)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // RLP for ["cat", "dog"] and ["do", 0x80], standing in for trie nodes.
    const NODE_A: &str = "0xc88363617483646f67";
    const NODE_B: &str = "0xc582646f8180";

    fn sample_response() -> Value {
        serde_json::json!({
            "address": "0x602c71e4dac47a042ee7f46e0aee17f94a3ba0b6",
            "accountProof": [NODE_A, NODE_B],
            "balance": "0x0",
            "storageProof": [
                {"key": "0x0", "value": "0x1", "proof": [NODE_B, NODE_A]}
            ]
        })
    }

    #[test]
    fn nodes_decode_in_order() {
        let proof = proof_from_response(&sample_response()).unwrap();

        assert_eq!(proof.account.len(), 2);
        assert_eq!(
            proof.account[0],
            Item::List(vec![Item::bytes(*b"cat"), Item::bytes(*b"dog")])
        );
        assert_eq!(
            proof.account[1],
            Item::List(vec![Item::bytes(*b"do"), Item::bytes(vec![0x80])])
        );

        // storage path order mirrors the response, not the account path
        assert_eq!(proof.storage.len(), 1);
        assert_eq!(proof.storage[0][0], proof.account[1]);
        assert_eq!(proof.storage[0][1], proof.account[0]);
    }

    #[test]
    fn missing_storage_proof_fails_early() {
        let mut resp = sample_response();
        resp.as_object_mut().unwrap().remove("storageProof");
        match proof_from_response(&resp) {
            Err(ProofGenError::MissingField { field, .. }) => assert_eq!(field, "storageProof"),
            other => panic!("expected MissingField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn slot_entry_without_proof_fails() {
        let resp = serde_json::json!({
            "accountProof": [NODE_A],
            "storageProof": [{"key": "0x0", "value": "0x1"}]
        });
        match proof_from_response(&resp) {
            Err(ProofGenError::MissingField { field, .. }) => {
                assert_eq!(field, "storageProof[0].proof")
            }
            other => panic!("expected MissingField, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn malformed_node_hex_is_a_format_error() {
        let resp = serde_json::json!({
            "accountProof": ["0xabc"],
            "storageProof": []
        });
        assert!(matches!(
            proof_from_response(&resp),
            Err(ProofGenError::Format { .. })
        ));
    }
}
