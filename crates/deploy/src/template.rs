use alloy_json_abi::JsonAbi;
use alloy_primitives::Bytes;
use serde::{Deserialize, Serialize};

/// Token name baked into this build.
pub const TOKEN_NAME: &str = "TokenMint";
/// Token symbol baked into this build.
pub const TOKEN_SYMBOL: &str = "TMT";
/// Token decimals baked into this build.
pub const TOKEN_DECIMALS: u8 = 18;
/// Total supply baked into this build, as a decimal string.
pub const TOKEN_TOTAL_SUPPLY: &str = "50000000000";

/// Fixed deployment template: compiled contract artifact plus the token
/// parameters it was compiled with.
///
/// The parameters are configuration, not request input — the deployer ships
/// one pre-agreed contract and its constructor takes only the owner address.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenTemplate {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    /// Decimal string; multiplied by `10^decimals` inside the contract.
    pub total_supply: String,
    pub bytecode: Bytes,
    pub abi: JsonAbi,
}

/// The subset of a compiler artifact (`artifacts/<Contract>.json`) the
/// template needs.
#[derive(Deserialize)]
struct Artifact {
    abi: JsonAbi,
    bytecode: Bytes,
}

impl TokenTemplate {
    /// Template with this build's fixed token parameters and the given
    /// compiled artifact.
    pub fn fixed(abi: JsonAbi, bytecode: Bytes) -> Self {
        Self {
            name: TOKEN_NAME.to_string(),
            symbol: TOKEN_SYMBOL.to_string(),
            decimals: TOKEN_DECIMALS,
            total_supply: TOKEN_TOTAL_SUPPLY.to_string(),
            bytecode,
            abi,
        }
    }

    /// Parse a compiler artifact JSON (`{ "abi": [...], "bytecode": "0x..." }`)
    /// into a template with the fixed parameters.
    pub fn from_artifact(json: &str) -> Result<Self, serde_json::Error> {
        let Artifact { abi, bytecode } = serde_json::from_str(json)?;
        Ok(Self::fixed(abi, bytecode))
    }
}
