//! Fixture-driven tests for the whole pipeline: node response JSON through
//! normalization, structural validation, and RLP composition, without a live
//! endpoint.

use serde_json::Value;

use steth_proofgen::header::header_from_block;
use steth_proofgen::proof::proof_from_response;
use steth_proofgen::rlp::{self, Item};
use steth_proofgen::{compose, ProofGenError};

// RLP encodings of ["cat", "dog"] and ["do", 0x80], standing in for trie
// nodes. The pipeline never interprets node contents.
const NODE_A: &str = "0xc88363617483646f67";
const NODE_B: &str = "0xc582646f8180";

fn sample_block() -> serde_json::Map<String, Value> {
    let block = serde_json::json!({
        "parentHash": format!("0x{}", "11".repeat(32)),
        "sha3Uncles": format!("0x{}", "22".repeat(32)),
        "miner": format!("0x{}", "33".repeat(20)),
        "stateRoot": format!("0x{}", "44".repeat(32)),
        "transactionsRoot": format!("0x{}", "55".repeat(32)),
        "receiptsRoot": format!("0x{}", "66".repeat(32)),
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "difficulty": "0x02",
        "number": "0x10",
        "gasLimit": "0x5208",
        "gasUsed": "0x00",
        "timestamp": "0x05",
        "extraData": "0x",
        "mixHash": format!("0x{}", "77".repeat(32)),
        "nonce": "0x0000000000000042",
        "transactions": [],
    });
    match block {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn proof_response(account_nodes: &[&str], slot_nodes: &[&str]) -> Value {
    serde_json::json!({
        "accountProof": account_nodes,
        "balance": "0x0",
        "storageProof": [{"key": "0x0", "value": "0x1", "proof": slot_nodes}]
    })
}

#[test]
fn responses_compose_into_the_contract_bundle() {
    let (block_number, header) = header_from_block(&sample_block()).unwrap();
    assert_eq!(block_number, 16);

    let pool = proof_from_response(&proof_response(&[NODE_A, NODE_B], &[NODE_B, NODE_A])).unwrap();
    let steth = proof_from_response(&proof_response(&[NODE_B], &[NODE_A])).unwrap();

    let (header_blob, proofs_blob) = compose(
        &header,
        &pool.account,
        &steth.account,
        &pool.storage,
        &steth.storage,
    );

    // header blob: one list of exactly 15 byte strings
    let header_items = rlp::decode(&header_blob).unwrap();
    let fields = header_items.as_list().unwrap();
    assert_eq!(fields.len(), 15);
    assert_eq!(fields[8], Item::bytes(vec![0x10])); // resolved number

    // proofs blob: pool account, steth account, pool storage, steth storage
    let decoded = rlp::decode(&proofs_blob).unwrap();
    let paths = decoded.as_list().unwrap();
    assert_eq!(paths.len(), 4);

    let node_a = rlp::decode(&hex::decode(&NODE_A[2..]).unwrap()).unwrap();
    let node_b = rlp::decode(&hex::decode(&NODE_B[2..]).unwrap()).unwrap();

    assert_eq!(paths[0], Item::List(vec![node_a.clone(), node_b.clone()]));
    assert_eq!(paths[1], Item::List(vec![node_b.clone()]));
    assert_eq!(paths[2], Item::List(vec![node_b.clone(), node_a.clone()]));
    assert_eq!(paths[3], Item::List(vec![node_a.clone()]));
}

#[test]
fn proofs_blob_bytes_are_canonical() {
    let (_, header) = header_from_block(&sample_block()).unwrap();
    let no_slots = |account_nodes: &[&str]| {
        serde_json::json!({
            "accountProof": account_nodes,
            "balance": "0x0",
            "storageProof": []
        })
    };
    let pool = proof_from_response(&no_slots(&[NODE_A])).unwrap();
    let steth = proof_from_response(&no_slots(&[NODE_B])).unwrap();

    let (_, proofs_blob) = compose(
        &header,
        &pool.account,
        &steth.account,
        &pool.storage,
        &steth.storage,
    );

    // [[node_a], [node_b]] assembled by hand: each path re-encodes its node
    // byte-for-byte and wraps it in a list.
    let expected = format!("d1c9{}c6{}", &NODE_A[2..], &NODE_B[2..]);
    assert_eq!(hex::encode(&proofs_blob), expected);
}

#[test]
fn malformed_proof_response_aborts_before_composition() {
    let resp = serde_json::json!({
        "accountProof": [NODE_A],
        "balance": "0x0"
    });
    assert!(matches!(
        proof_from_response(&resp),
        Err(ProofGenError::MissingField { .. })
    ));
}
