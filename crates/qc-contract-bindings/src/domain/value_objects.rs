//! # Value Objects
//!
//! Immutable domain primitives for contract binding.
//! These types represent concepts that are defined by their value, not identity.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

// =============================================================================
// PROVIDER TYPE
// =============================================================================

/// Identity of a provider implementation.
///
/// The name is used verbatim when short module syntax synthesizes registry
/// keys (`<provider name><declaration name>`), and as the lookup key for
/// per-provider instance options.
///
/// Equality, ordering and hashing go by [`ProviderType::name`], so
/// `Custom("Vechain")` and `Vechain` are the same provider type.
#[derive(Clone, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProviderType {
    /// Ethereum JSON-RPC compatible chains.
    Ethereum,
    /// VeChain Thor.
    Vechain,
    /// Any other provider, identified by name.
    Custom(String),
}

impl ProviderType {
    /// Returns the provider type name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Vechain => "Vechain",
            Self::Custom(name) => name,
        }
    }
}

impl PartialEq for ProviderType {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for ProviderType {}

impl Hash for ProviderType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialOrd for ProviderType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProviderType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name().cmp(other.name())
    }
}

impl From<String> for ProviderType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Ethereum" => Self::Ethereum,
            "Vechain" => Self::Vechain,
            _ => Self::Custom(name),
        }
    }
}

impl From<&str> for ProviderType {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<ProviderType> for String {
    fn from(provider_type: ProviderType) -> Self {
        provider_type.name().to_string()
    }
}

impl fmt::Debug for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProviderType({})", self.name())
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// TOPIC HASH (32 bytes)
// =============================================================================

/// A 32-byte log topic (Keccak-256 of an event signature).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct TopicHash(pub [u8; 32]);

impl TopicHash {
    /// The zero topic.
    pub const ZERO: Self = Self([0u8; 32]);

    /// Creates a topic from a 32-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parses a `0x`-prefixed (or bare) 64 digit hex string.
    #[must_use]
    pub fn from_hex(s: &str) -> Option<Self> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).ok()?;
        Some(Self(bytes))
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for TopicHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for TopicHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for TopicHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TopicHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid topic: {s}")))
    }
}

// =============================================================================
// TOPIC SIGNATURE
// =============================================================================

/// Derived identifier for one event definition.
///
/// Correlates on-chain log topics to event names. Built from the `signature`
/// field of an event ABI entry: a 32-byte hex value is taken as the topic
/// itself, anything else is treated as the canonical text signature
/// (`Transfer(address,address,uint256)`) and hashed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TopicSignature {
    signature: String,
    topic: TopicHash,
}

impl TopicSignature {
    /// Derives a topic signature.
    #[must_use]
    pub fn new(signature: impl Into<String>) -> Self {
        let signature = signature.into();
        let topic = TopicHash::from_hex(&signature).unwrap_or_else(|| {
            let digest = Keccak256::digest(signature.as_bytes());
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&digest);
            TopicHash(bytes)
        });
        Self { signature, topic }
    }

    /// The signature as it appeared in the ABI.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The log topic (topic0) for this event.
    #[must_use]
    pub fn topic(&self) -> TopicHash {
        self.topic
    }

    /// Returns true if a log's first topic belongs to this event.
    #[must_use]
    pub fn matches(&self, topic0: &TopicHash) -> bool {
        self.topic == *topic0
    }
}

impl From<&TopicSignature> for TopicHash {
    fn from(signature: &TopicSignature) -> Self {
        signature.topic
    }
}

// =============================================================================
// TOPIC FILTER
// =============================================================================

/// Positional topic filter for log queries.
///
/// Each position holds a set of alternatives (OR); positions combine with AND.
/// An empty position matches any topic.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TopicFilter {
    positions: Vec<Vec<TopicHash>>,
}

impl TopicFilter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new position holding `value`.
    #[must_use]
    pub fn topic(mut self, value: impl Into<TopicHash>) -> Self {
        self.positions.push(vec![value.into()]);
        self
    }

    /// Opens a new position that matches anything.
    #[must_use]
    pub fn any(mut self) -> Self {
        self.positions.push(Vec::new());
        self
    }

    /// Adds an alternative to the current position.
    #[must_use]
    pub fn or(mut self, value: impl Into<TopicHash>) -> Self {
        match self.positions.last_mut() {
            Some(current) => current.push(value.into()),
            None => self.positions.push(vec![value.into()]),
        }
        self
    }

    /// Same as [`TopicFilter::topic`].
    #[must_use]
    pub fn and(self, value: impl Into<TopicHash>) -> Self {
        self.topic(value)
    }

    /// Returns the positions.
    #[must_use]
    pub fn get(&self) -> &[Vec<TopicHash>] {
        &self.positions
    }

    /// Returns true if the log topics satisfy every position.
    #[must_use]
    pub fn matches(&self, topics: &[TopicHash]) -> bool {
        self.positions.iter().enumerate().all(|(i, alternatives)| {
            alternatives.is_empty()
                || topics
                    .get(i)
                    .is_some_and(|topic| alternatives.contains(topic))
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
