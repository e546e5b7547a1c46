//! Block header assembly.
//!
//! Projects the 15 header fields out of an `eth_getBlockByNumber` response in
//! the exact order the verifying contract's decoder expects. The order is a
//! wire contract: never reorder or filter these.

use serde_json::{Map, Value};

use crate::error::{ProofGenError, Result};
use crate::normalize::{normalize_bytes, parse_hex_u64, BlockSelector};
use crate::rlp::{self, Item};
use crate::rpc::RpcClient;

const METHOD: &str = "eth_getBlockByNumber";

/// Header fields in verifier order.
pub const BLOCK_HEADER_FIELDS: [&str; 15] = [
    "parentHash",
    "sha3Uncles",
    "miner",
    "stateRoot",
    "transactionsRoot",
    "receiptsRoot",
    "logsBloom",
    "difficulty",
    "number",
    "gasLimit",
    "gasUsed",
    "timestamp",
    "extraData",
    "mixHash",
    "nonce",
];

/// The 15 canonical header byte fields, in verifier order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockHeader {
    fields: Vec<Vec<u8>>,
}

impl BlockHeader {
    /// Build a header from 15 canonical byte fields, already in verifier
    /// order.
    pub fn new(fields: Vec<Vec<u8>>) -> Result<Self> {
        if fields.len() != BLOCK_HEADER_FIELDS.len() {
            return Err(ProofGenError::format(
                "header field count",
                fields.len().to_string(),
            ));
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[Vec<u8>] {
        &self.fields
    }

    /// The header as an RLP list of 15 byte strings.
    pub fn to_rlp_item(&self) -> Item {
        Item::List(self.fields.iter().map(|f| Item::bytes(f.clone())).collect())
    }
}

/// Fetch a block and assemble its header, returning the resolved concrete
/// block number alongside (`latest`/`earliest` selectors resolve here).
pub async fn fetch_header(
    client: &RpcClient,
    selector: BlockSelector,
) -> Result<(u64, BlockHeader)> {
    let result = client
        .call(METHOD, serde_json::json!([selector.as_param(), true]))
        .await?;

    let block = result
        .as_object()
        .ok_or_else(|| ProofGenError::missing_field(METHOD, "block object"))?;

    let (number, header) = header_from_block(block)?;
    tracing::info!(number, "assembled block header");
    Ok((number, header))
}

/// Project the header out of a block object and cross-check it against the
/// block hash the node reported.
///
/// The hash check pins the assembled header to the block the proofs will be
/// fetched for: if keccak256 of our RLP encoding differs from the node's
/// `hash`, the bundle would be internally inconsistent and we abort.
pub fn header_from_block(block: &Map<String, Value>) -> Result<(u64, BlockHeader)> {
    let mut fields = Vec::with_capacity(BLOCK_HEADER_FIELDS.len());
    for name in BLOCK_HEADER_FIELDS {
        let raw = block
            .get(name)
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProofGenError::missing_field(METHOD, name))?;
        fields.push(normalize_bytes(raw)?);
    }
    let header = BlockHeader { fields };

    let number = parse_hex_u64(
        block
            .get("number")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ProofGenError::missing_field(METHOD, "number"))?,
    )?;

    if let Some(reported) = block.get("hash").and_then(|v| v.as_str()) {
        let computed = keccak256(&rlp::encode(&header.to_rlp_item()));
        if normalize_bytes(reported)? != computed {
            return Err(ProofGenError::BlockMismatch {
                reported: reported.to_string(),
                computed: format!("0x{}", hex::encode(computed)),
            });
        }
    }

    Ok((number, header))
}

pub(crate) fn keccak256(data: &[u8]) -> [u8; 32] {
    use tiny_keccak::{Hasher, Keccak};
    let mut keccak = Keccak::v256();
    keccak.update(data);
    let mut out = [0u8; 32];
    keccak.finalize(&mut out);
    out
}
