//! Proof generation for the stETH/StableSwap state oracle.
//!
//! Assembles the verifiable bundle the oracle contract's `submitState` entry
//! point consumes: an RLP-encoded 15-field block header plus an RLP list of
//! Merkle-Patricia account and storage proof paths for the Curve pool and
//! stETH token contracts. The bundle is produced byte-exact and canonically
//! ordered; verification itself happens on-chain.
//!
//! Every run is stateless and sequential: header first, then both proofs
//! pinned to the block number the header resolved to. Any failure aborts the
//! run with a typed [`error::ProofGenError`]; no partial bundle is ever
//! returned.

pub mod compose;
pub mod error;
pub mod header;
pub mod normalize;
pub mod oracle;
pub mod proof;
pub mod rlp;
pub mod rpc;

pub use compose::compose;
pub use error::{ProofGenError, Result};
pub use header::{fetch_header, BlockHeader};
pub use normalize::BlockSelector;
pub use oracle::ProofParams;
pub use proof::{fetch_account_proof, AccountProof, ProofPath};
pub use rpc::RpcClient;

/// Everything one proof-generation run produces.
#[derive(Debug, Clone)]
pub struct ProofData {
    pub block_number: u64,
    pub header: BlockHeader,
    pub pool_proof: AccountProof,
    pub steth_proof: AccountProof,
}

impl ProofData {
    /// The `(header_blob, proofs_blob)` pair for `submitState`.
    pub fn to_blobs(&self) -> (Vec<u8>, Vec<u8>) {
        compose(
            &self.header,
            &self.pool_proof.account,
            &self.steth_proof.account,
            &self.pool_proof.storage,
            &self.steth_proof.storage,
        )
    }
}

/// Run the full pipeline against one block.
///
/// The proofs are fetched at the concrete number the header resolved to, so
/// a `latest` selector cannot leave the header and proofs straddling two
/// different chain heads.
pub async fn generate_proof_data(
    client: &RpcClient,
    selector: BlockSelector,
    params: &ProofParams,
) -> Result<ProofData> {
    let (block_number, header) = header::fetch_header(client, selector).await?;

    let pool_proof = proof::fetch_account_proof(
        client,
        block_number,
        &params.pool_address,
        &params.pool_slots,
    )
    .await?;

    let steth_proof = proof::fetch_account_proof(
        client,
        block_number,
        &params.steth_address,
        &params.steth_slots,
    )
    .await?;

    Ok(ProofData {
        block_number,
        header,
        pool_proof,
        steth_proof,
    })
}
