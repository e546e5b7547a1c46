//! Proof bundle composition.
//!
//! Produces the two byte blobs the oracle contract's `submitState` entry
//! point takes: the RLP-encoded header and one RLP list holding, in order,
//! the pool account path, the stETH account path, then every pool storage
//! path and every stETH storage path in request order. The concatenation
//! order is a fixed contract with the verifier.

use crate::header::BlockHeader;
use crate::proof::ProofPath;
use crate::rlp::{self, Item};

/// Assemble `(header_blob, proofs_blob)`.
///
/// Each path is re-encoded from its decoded structural form, so the output
/// is canonical regardless of how the node formatted its hex.
pub fn compose(
    header: &BlockHeader,
    pool_account: &ProofPath,
    steth_account: &ProofPath,
    pool_storage: &[ProofPath],
    steth_storage: &[ProofPath],
) -> (Vec<u8>, Vec<u8>) {
    let header_blob = rlp::encode(&header.to_rlp_item());

    let mut paths = Vec::with_capacity(2 + pool_storage.len() + steth_storage.len());
    paths.push(path_item(pool_account));
    paths.push(path_item(steth_account));
    paths.extend(pool_storage.iter().map(|p| path_item(p)));
    paths.extend(steth_storage.iter().map(|p| path_item(p)));
    let proofs_blob = rlp::encode(&Item::List(paths));

    (header_blob, proofs_blob)
}

fn path_item(path: &ProofPath) -> Item {
    Item::List(path.to_vec())
}
