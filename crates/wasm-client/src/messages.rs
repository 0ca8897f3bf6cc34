//! Message shapes exchanged with the chain boundary

use serde::{Deserialize, Serialize};
use wasmswap_core::{Address, BlockHeight, TxHash, Uint128};

/// Native coin amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Uint128,
}

impl Coin {
    pub fn new(amount: impl Into<Uint128>, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.into(),
        }
    }
}

/// Transaction fee: coins paid plus the gas limit, both as strings on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    #[serde(with = "gas_string")]
    pub gas: u64,
}

mod gas_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(gas: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&gas.to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// `/cosmwasm.wasm.v1.MsgExecuteContract` as handed to the signer.
///
/// `msg` is the contract's JSON execute message; the signer encodes it to
/// UTF-8 bytes when building the protobuf message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteContract {
    pub sender: Address,
    pub contract: Address,
    pub msg: serde_json::Value,
    #[serde(default)]
    pub funds: Vec<Coin>,
}

impl ExecuteContract {
    pub const TYPE_URL: &'static str = "/cosmwasm.wasm.v1.MsgExecuteContract";

    /// UTF-8 JSON bytes of the execute message
    pub fn msg_bytes(&self) -> Vec<u8> {
        self.msg.to_string().into_bytes()
    }
}

/// Result of a broadcast (or a later lookup) of an included transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcastResponse {
    pub tx_hash: TxHash,
    pub height: BlockHeight,
    pub code: u32,
    #[serde(default)]
    pub codespace: String,
    #[serde(default)]
    pub raw_log: String,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub gas_used: u64,
}

impl BroadcastResponse {
    /// Delivered but rejected by the chain (any non-zero result code)
    pub fn is_deliver_tx_failure(&self) -> bool {
        self.code != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_std_fee_wire_shape() {
        let fee = StdFee {
            amount: vec![Coin::new(1_000u128, "ujuno")],
            gas: 480_000,
        };
        let json = serde_json::to_value(&fee).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "amount": [{ "denom": "ujuno", "amount": "1000" }],
                "gas": "480000"
            })
        );
        let back: StdFee = serde_json::from_value(json).unwrap();
        assert_eq!(back, fee);
    }

    #[test]
    fn test_execute_contract_msg_bytes() {
        let msg = ExecuteContract {
            sender: Address::new("juno1sender"),
            contract: Address::new("juno1pool"),
            msg: serde_json::json!({ "claim": {} }),
            funds: vec![],
        };
        assert_eq!(msg.msg_bytes(), br#"{"claim":{}}"#.to_vec());
    }

    #[test]
    fn test_deliver_failure_by_code() {
        let mut resp = BroadcastResponse {
            tx_hash: TxHash::new("ABC"),
            height: 10,
            code: 0,
            codespace: String::new(),
            raw_log: "[]".into(),
            gas_wanted: 0,
            gas_used: 0,
        };
        assert!(!resp.is_deliver_tx_failure());
        resp.code = 5;
        assert!(resp.is_deliver_tx_failure());
    }
}
