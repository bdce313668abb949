//! # Interface Definitions
//!
//! The ABI-like document a contract is bound against. The import is kept as
//! raw JSON and handed to providers untouched; the core only reads the
//! `raw.abi` array, one entry at a time.

use crate::errors::AbiError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

// =============================================================================
// ENTRY KIND
// =============================================================================

/// Kind of an interface-definition entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// `type == "function"`.
    Function,
    /// `type == "event"`.
    Event,
    /// Constructor, fallback, error, receive or anything unknown.
    Other,
}

// =============================================================================
// ABI PARAM
// =============================================================================

/// One input or output parameter of an entry.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiParam {
    /// Parameter name (may be empty).
    #[serde(default)]
    pub name: String,
    /// Solidity type, e.g. `uint256`.
    #[serde(rename = "type", default)]
    pub param_type: String,
    /// Indexed flag for event params.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
    /// Tuple components.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<AbiParam>,
}

// =============================================================================
// INTERFACE DEFINITION ENTRY
// =============================================================================

/// One entry of the ABI array.
///
/// Entries are externally supplied: names may repeat (overloads) and `type`
/// may hold values this crate does not know.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterfaceDefinitionEntry {
    /// Raw entry type (`function`, `event`, ...).
    #[serde(rename = "type", default)]
    pub entry_type: String,
    /// Function or event name.
    #[serde(default)]
    pub name: String,
    /// `view`, `pure`, `nonpayable`, `payable`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<String>,
    /// Legacy constant flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constant: Option<bool>,
    /// Event signature (text or topic hash).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// Inputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<AbiParam>,
    /// Outputs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<AbiParam>,
}

impl InterfaceDefinitionEntry {
    /// Creates a function entry.
    pub fn function(name: impl Into<String>, state_mutability: impl Into<String>) -> Self {
        Self {
            entry_type: "function".to_string(),
            name: name.into(),
            state_mutability: Some(state_mutability.into()),
            ..Self::default()
        }
    }

    /// Creates an event entry carrying a signature.
    pub fn event(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Self {
            entry_type: "event".to_string(),
            name: name.into(),
            signature: Some(signature.into()),
            ..Self::default()
        }
    }

    /// Sets the legacy `constant` flag.
    #[must_use]
    pub fn with_constant(mut self, constant: bool) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Classifies the entry by its `type`.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        match self.entry_type.as_str() {
            "function" => EntryKind::Function,
            "event" => EntryKind::Event,
            _ => EntryKind::Other,
        }
    }

    /// Returns true for `view` functions or `constant: true`.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.state_mutability.as_deref() == Some("view") || self.constant == Some(true)
    }
}

// =============================================================================
// INTERFACE IMPORT
// =============================================================================

/// Interface import: `{ raw: { abi: [...] } }`.
///
/// Anything else inside `raw` (bytecode, networks, ...) is preserved for the
/// provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceImport {
    /// Raw build artifact.
    #[serde(default)]
    pub raw: Value,
}

impl InterfaceImport {
    /// Creates an import holding only an ABI array.
    #[must_use]
    pub fn new(entries: &[InterfaceDefinitionEntry]) -> Self {
        Self {
            raw: json!({ "abi": entries }),
        }
    }

    /// Wraps a parsed `{ raw: ... }` document.
    ///
    /// Never fails: a document without `raw` yields an import with no ABI.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(mut map) => Self {
                raw: map.remove("raw").unwrap_or(Value::Null),
            },
            _ => Self::default(),
        }
    }

    /// Parses a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`AbiError::Json`] if the text is not valid JSON.
    pub fn from_json_str(s: &str) -> Result<Self, AbiError> {
        Ok(Self::from_value(serde_json::from_str(s)?))
    }

    /// Raw ABI array, if present.
    #[must_use]
    pub fn abi_values(&self) -> Option<&Vec<Value>> {
        self.raw.get("abi").and_then(Value::as_array)
    }

    /// Returns true if the import carries an ABI array.
    #[must_use]
    pub fn has_abi(&self) -> bool {
        self.abi_values().is_some()
    }

    /// Decodes the ABI array.
    ///
    /// Entries that are not objects of the expected shape are skipped.
    #[must_use]
    pub fn entries(&self) -> Vec<InterfaceDefinitionEntry> {
        let Some(values) = self.abi_values() else {
            return Vec::new();
        };
        values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                match serde_json::from_value::<InterfaceDefinitionEntry>(value.clone()) {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        debug!(index, error = %e, "Skipping malformed ABI entry");
                        None
                    }
                }
            })
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind() {
        assert_eq!(
            InterfaceDefinitionEntry::function("f", "view").kind(),
            EntryKind::Function
        );
        assert_eq!(
            InterfaceDefinitionEntry::event("E", "E()").kind(),
            EntryKind::Event
        );
        let ctor = InterfaceDefinitionEntry {
            entry_type: "constructor".to_string(),
            ..Default::default()
        };
        assert_eq!(ctor.kind(), EntryKind::Other);
    }

    #[test]
    fn test_is_read_only() {
        assert!(InterfaceDefinitionEntry::function("a", "view").is_read_only());
        assert!(InterfaceDefinitionEntry::function("b", "nonpayable")
            .with_constant(true)
            .is_read_only());
        assert!(!InterfaceDefinitionEntry::function("c", "pure").is_read_only());
    }

    #[test]
    fn test_from_json_str_parses_artifact() {
        let doc = r#"{
            "raw": {
                "abi": [
                    {"type": "function", "name": "balanceOf", "stateMutability": "view",
                     "inputs": [{"name": "owner", "type": "address"}],
                     "outputs": [{"name": "", "type": "uint256"}]},
                    {"type": "event", "name": "Transfer",
                     "signature": "Transfer(address,address,uint256)"}
                ],
                "bytecode": "0x6080"
            }
        }"#;
        let import = InterfaceImport::from_json_str(doc).unwrap();
        let entries = import.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].name, "balanceOf");
        assert_eq!(entries[0].inputs[0].param_type, "address");
        assert_eq!(entries[1].signature.as_deref(), Some("Transfer(address,address,uint256)"));
        assert_eq!(import.raw["bytecode"], "0x6080");
    }

    #[test]
    fn test_malformed_entries_are_skipped() {
        let import = InterfaceImport::from_value(json!({
            "raw": { "abi": [42, {"type": "function", "name": "ok"}, {"name": []}] }
        }));
        let entries = import.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "ok");
    }

    #[test]
    fn test_missing_abi_is_empty() {
        let import = InterfaceImport::from_value(json!({ "raw": {} }));
        assert!(!import.has_abi());
        assert!(import.entries().is_empty());

        let import = InterfaceImport::from_value(json!("not an object"));
        assert!(import.entries().is_empty());
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(matches!(
            InterfaceImport::from_json_str("{raw"),
            Err(AbiError::Json(_))
        ));
    }

    #[test]
    fn test_new_round_trips_entries() {
        let entries = vec![InterfaceDefinitionEntry::function("transfer", "nonpayable")];
        let import = InterfaceImport::new(&entries);
        assert_eq!(import.entries(), entries);
    }
}
