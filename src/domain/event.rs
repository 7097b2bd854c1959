//! Decoded chain inputs: block headers, events, transactions and contract executions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, Attributes, BlockHeight, ChainId, TimeMs};

/// Header of the block an input was included in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockHeader {
    pub height: BlockHeight,
    pub chain_id: ChainId,
    pub time: DateTime<Utc>,
}

impl BlockHeader {
    pub fn time_ms(&self) -> TimeMs {
        TimeMs::from(self.time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

impl EventAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A single ABCI event with its ordered attribute list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainEvent {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl ChainEvent {
    pub fn new(kind: impl Into<String>, attributes: Vec<EventAttribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    pub fn attributes(&self) -> Attributes {
        Attributes::from_event_attributes(&self.attributes)
    }
}

/// A transaction and every event it emitted, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
    pub block: BlockHeader,
    #[serde(default)]
    pub events: Vec<ChainEvent>,
}

/// An event delivered on its own, together with its block context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockEvent {
    pub block: BlockHeader,
    pub event: ChainEvent,
}

/// A decoded `MsgExecuteContract` with its JSON payload left untyped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractExecution {
    pub block: BlockHeader,
    pub sender: Address,
    pub contract: Address,
    pub msg: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct BondMsg {
    bond: BondPayload,
}

#[derive(Debug, Default, Deserialize)]
struct BondPayload {
    #[serde(rename = "ref", default)]
    referral: Option<String>,
}

/// A contract execution whose payload is `{"bond": {"ref": ...}}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondExecution {
    pub block: BlockHeader,
    pub sender: Address,
    pub referral: Option<String>,
}

impl ContractExecution {
    /// Decode the payload as a bond message. Returns `None` for any other message.
    pub fn as_bond(&self) -> Option<BondExecution> {
        let decoded: BondMsg = serde_json::from_value(self.msg.clone()).ok()?;
        Some(BondExecution {
            block: self.block.clone(),
            sender: self.sender.clone(),
            referral: decoded.bond.referral,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn header() -> BlockHeader {
        BlockHeader {
            height: BlockHeight::new(100),
            chain_id: ChainId::new("osmosis-1"),
            time: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    fn execution(msg: serde_json::Value) -> ContractExecution {
        ContractExecution {
            block: header(),
            sender: Address::new("osmo1sender"),
            contract: Address::new("osmo1contract"),
            msg,
        }
    }

    #[test]
    fn test_bond_with_referral_decodes() {
        let bond = execution(json!({"bond": {"ref": "osmo1friend"}}))
            .as_bond()
            .unwrap();
        assert_eq!(bond.sender, Address::new("osmo1sender"));
        assert_eq!(bond.referral.as_deref(), Some("osmo1friend"));
    }

    #[test]
    fn test_bond_without_referral_decodes() {
        let bond = execution(json!({"bond": {}})).as_bond().unwrap();
        assert_eq!(bond.referral, None);
    }

    #[test]
    fn test_non_bond_message_is_none() {
        assert!(execution(json!({"unbond": {"amount": "5"}})).as_bond().is_none());
    }

    #[test]
    fn test_event_type_field_name() {
        let event: ChainEvent = serde_json::from_value(json!({
            "type": "transfer",
            "attributes": [{"key": "amount", "value": "5uosmo"}]
        }))
        .unwrap();
        assert_eq!(event.kind, "transfer");
        assert_eq!(event.attributes().get("amount"), Some("5uosmo"));
    }

    #[test]
    fn test_block_time_ms() {
        assert_eq!(header().time_ms().as_i64(), header().time.timestamp_millis());
    }
}
