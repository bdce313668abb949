//! # Bound Contract
//!
//! The composed runtime value: an entity shape, a provider instance, and the
//! tables derived from the interface import.
//!
//! Ingestion and stub derivation are implemented here and cannot be replaced
//! by a provider. Everything else a provider offers is reached through the
//! passthrough methods. All tables are written once in [`BoundContract::assemble`]
//! and only read afterwards.

use crate::config::ProviderInstanceOptions;
use crate::dispatch;
use crate::domain::abi::{InterfaceDefinitionEntry, InterfaceImport};
use crate::domain::entities::{
    DispatchKind, EventFilterOptions, EventStub, MemberBinding, MemberOptions, MethodStub, StubKind,
    StubTables,
};
use crate::domain::services::{build_topics, derive_stubs};
use crate::domain::value_objects::{ProviderType, TopicSignature};
use crate::errors::{DispatchError, ProviderError};
use crate::ports::inbound::ContractEntity;
use crate::ports::outbound::{ContractProvider, EventHandle, EventQueryResult, MethodReference};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A contract bound to one provider instance.
pub struct BoundContract {
    key: String,
    name: String,
    provider_type: ProviderType,
    entity: Arc<dyn ContractEntity>,
    provider: Box<dyn ContractProvider>,
    import: InterfaceImport,
    abi: Vec<InterfaceDefinitionEntry>,
    topics: HashMap<String, TopicSignature>,
    stubs: StubTables,
    members: HashMap<String, MemberBinding>,
}

impl BoundContract {
    /// Composes a bound contract.
    ///
    /// Hands the import to the provider, ingests topics and, when
    /// `dynamic_stubs` is set, derives the method and event stub tables.
    pub(crate) fn assemble(
        key: String,
        name: String,
        entity: Arc<dyn ContractEntity>,
        provider: Box<dyn ContractProvider>,
        import: InterfaceImport,
        dynamic_stubs: bool,
    ) -> Self {
        let provider_type = provider.provider_type();
        provider.on_import(&import);

        let abi = import.entries();
        let topics = build_topics(&abi);
        let stubs = if dynamic_stubs {
            derive_stubs(&abi, &topics)
        } else {
            StubTables::default()
        };
        let members = entity
            .members()
            .into_iter()
            .map(|member| (member.property.clone(), member))
            .collect();

        debug!(
            contract = %name,
            provider = %provider_type,
            entries = abi.len(),
            topics = topics.len(),
            methods = stubs.methods.len(),
            events = stubs.events.len(),
            "Contract assembled"
        );

        Self {
            key,
            name,
            provider_type,
            entity,
            provider,
            import,
            abi,
            topics,
            stubs,
            members,
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Registry key the contract was bound under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Declaration name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Provider type of the underlying provider instance.
    #[must_use]
    pub fn provider_type(&self) -> &ProviderType {
        &self.provider_type
    }

    /// The interface import as supplied.
    #[must_use]
    pub fn import(&self) -> &InterfaceImport {
        &self.import
    }

    /// Decoded ABI entries.
    #[must_use]
    pub fn abi(&self) -> &[InterfaceDefinitionEntry] {
        &self.abi
    }

    /// Topic signatures by event name.
    #[must_use]
    pub fn topics(&self) -> &HashMap<String, TopicSignature> {
        &self.topics
    }

    /// Topic signature of one event.
    #[must_use]
    pub fn topic(&self, event: &str) -> Option<&TopicSignature> {
        self.topics.get(event)
    }

    /// Dynamic method stubs.
    #[must_use]
    pub fn methods(&self) -> &HashMap<String, MethodStub> {
        &self.stubs.methods
    }

    /// Dynamic event stubs.
    #[must_use]
    pub fn events(&self) -> &HashMap<String, EventStub> {
        &self.stubs.events
    }

    /// Classification of a dynamic method stub.
    #[must_use]
    pub fn stub_kind(&self, method: &str) -> Option<StubKind> {
        self.stubs.methods.get(method).map(|stub| stub.kind)
    }

    /// Statically declared member.
    #[must_use]
    pub fn member(&self, property: &str) -> Option<&MemberBinding> {
        self.members.get(property)
    }

    /// The entity, downcast to its concrete type.
    #[must_use]
    pub fn entity<T: ContractEntity>(&self) -> Option<&T> {
        self.entity.as_any().downcast_ref::<T>()
    }

    /// The provider instance.
    #[must_use]
    pub fn provider(&self) -> &dyn ContractProvider {
        self.provider.as_ref()
    }

    // =========================================================================
    // DECLARED MEMBERS
    // =========================================================================

    fn lookup(&self, property: &str) -> Result<&MemberBinding, DispatchError> {
        self.members
            .get(property)
            .ok_or_else(|| DispatchError::UnknownMember(property.to_string()))
    }

    /// Dispatches a statically declared member.
    ///
    /// For `events` members the first argument, when present and not null,
    /// is decoded as call-time [`EventFilterOptions`].
    ///
    /// # Errors
    ///
    /// `UnknownMember` if nothing is declared under `property`, otherwise
    /// whatever the dispatch primitive returns.
    pub async fn invoke(&self, property: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let member = self.lookup(property)?;
        let options = &member.options;
        match member.kind {
            DispatchKind::Read => dispatch::read(self, property, args, options).await,
            DispatchKind::Write => dispatch::write(self, property, args, options).await,
            DispatchKind::Event => dispatch::get_event(self, property, options),
            DispatchKind::Events => {
                let overrides = match args.first() {
                    Some(Value::Null) | None => None,
                    Some(value) => Some(
                        serde_json::from_value::<EventFilterOptions>(value.clone())
                            .map_err(|e| DispatchError::InvalidOverrides(e.to_string()))?,
                    ),
                };
                dispatch::get_events(self, property, options, overrides.as_ref()).await
            }
            DispatchKind::Method => dispatch::get_method(self, property, options),
        }
    }

    /// Runs a declared `events` member with typed call-time overrides.
    ///
    /// # Errors
    ///
    /// `UnknownMember`, `KindMismatch` for non-`events` members, or the
    /// provider error.
    pub async fn query_events(
        &self,
        property: &str,
        overrides: Option<&EventFilterOptions>,
    ) -> Result<EventQueryResult, DispatchError> {
        let member = self.lookup(property)?;
        if member.kind != DispatchKind::Events {
            return Err(DispatchError::KindMismatch {
                property: property.to_string(),
                expected: DispatchKind::Events.as_str(),
                actual: member.kind.as_str(),
            });
        }
        dispatch::get_events(self, property, &member.options, overrides).await
    }

    // =========================================================================
    // DYNAMIC STUBS
    // =========================================================================

    /// Calls a dynamic method stub.
    ///
    /// # Errors
    ///
    /// `UnknownStub` if the ABI derived no method of that name.
    pub async fn call(&self, method: &str, args: &[Value]) -> Result<Value, DispatchError> {
        let stub = self
            .stubs
            .methods
            .get(method)
            .ok_or_else(|| DispatchError::UnknownStub(method.to_string()))?;
        let options = MemberOptions::default();
        match stub.kind {
            StubKind::Read => dispatch::read(self, &stub.name, args, &options).await,
            StubKind::Write => dispatch::write(self, &stub.name, args, &options).await,
        }
    }

    /// Calls a dynamic event stub.
    ///
    /// # Errors
    ///
    /// `UnknownStub` if the ABI derived no event of that name.
    pub fn event(&self, event: &str) -> Result<EventHandle, DispatchError> {
        let stub = self
            .stubs
            .events
            .get(event)
            .ok_or_else(|| DispatchError::UnknownStub(event.to_string()))?;
        dispatch::get_event(self, &stub.name, &MemberOptions::default())
    }

    // =========================================================================
    // PROVIDER CAPABILITY
    // =========================================================================

    /// See [`ContractProvider::call_method`].
    pub async fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, ProviderError> {
        self.provider.call_method(name, args).await
    }

    /// See [`ContractProvider::get_event`].
    pub fn get_event(&self, name: &str) -> Result<EventHandle, ProviderError> {
        self.provider.get_event(name)
    }

    /// See [`ContractProvider::get_events`].
    pub async fn get_events(
        &self,
        name: &str,
        options: &EventFilterOptions,
    ) -> Result<EventQueryResult, ProviderError> {
        self.provider.get_events(name, options).await
    }

    /// See [`ContractProvider::get_method`].
    pub fn get_method(&self, name: &str) -> Result<MethodReference, ProviderError> {
        self.provider.get_method(name)
    }

    /// See [`ContractProvider::connect`].
    pub fn connect(&self) -> Result<(), ProviderError> {
        self.provider.connect()
    }

    /// See [`ContractProvider::set_instance_options`].
    pub fn set_instance_options(&self, options: &ProviderInstanceOptions) {
        self.provider.set_instance_options(options);
    }
}

impl fmt::Debug for BoundContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundContract")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("provider_type", &self.provider_type)
            .field("abi_entries", &self.abi.len())
            .field("topics", &self.topics.len())
            .field("methods", &self.stubs.methods.len())
            .field("events", &self.stubs.events.len())
            .field("members", &self.members.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProviderPlugin;
    use crate::ports::inbound::EmptyEntity;
    use crate::ports::outbound::ProviderPlugin;
    use serde_json::json;
    use std::any::Any;

    struct Token;

    impl ContractEntity for Token {
        fn members(&self) -> Vec<MemberBinding> {
            vec![
                MemberBinding::read("balance").named("balanceOf"),
                MemberBinding::write("transfer"),
                MemberBinding::event("Transfer"),
                MemberBinding::events(
                    "transfers",
                    EventFilterOptions::named("Transfer").from_block(0),
                ),
                MemberBinding::method("transferRef").named("transfer"),
            ]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn token_import() -> InterfaceImport {
        InterfaceImport::new(&[
            InterfaceDefinitionEntry::function("balanceOf", "view"),
            InterfaceDefinitionEntry::function("transfer", "nonpayable"),
            InterfaceDefinitionEntry::event("Transfer", "Transfer(address,address,uint256)"),
        ])
    }

    fn assemble(
        entity: Arc<dyn ContractEntity>,
        dynamic: bool,
    ) -> (InMemoryProviderPlugin, BoundContract) {
        let plugin = InMemoryProviderPlugin::new("A");
        let contract = BoundContract::assemble(
            "Token".to_string(),
            "Token".to_string(),
            entity,
            plugin.instantiate(),
            token_import(),
            dynamic,
        );
        (plugin, contract)
    }

    #[test]
    fn test_assemble_builds_tables() {
        let (_, contract) = assemble(Arc::new(EmptyEntity), true);
        assert_eq!(contract.provider_type(), &ProviderType::from("A"));
        assert_eq!(contract.abi().len(), 3);
        assert_eq!(contract.stub_kind("balanceOf"), Some(StubKind::Read));
        assert_eq!(contract.stub_kind("transfer"), Some(StubKind::Write));
        assert!(contract.events().contains_key("Transfer"));
        assert!(contract.topic("Transfer").is_some());
    }

    #[test]
    fn test_assemble_without_dynamic_stubs_keeps_topics() {
        let (_, contract) = assemble(Arc::new(Token), false);
        assert!(contract.methods().is_empty());
        assert!(contract.events().is_empty());
        assert!(contract.topic("Transfer").is_some());
    }

    #[tokio::test]
    async fn test_invoke_declared_members() {
        let (plugin, contract) = assemble(Arc::new(Token), false);

        let balance = contract.invoke("balance", &[json!("0x01")]).await.unwrap();
        assert_eq!(balance, Value::Null);
        contract.invoke("transfer", &[json!("0x02"), json!(5)]).await.unwrap();

        let calls = plugin.journal().method_calls();
        assert_eq!(calls[0].0, "balanceOf");
        assert_eq!(calls[1], ("transfer".to_string(), vec![json!("0x02"), json!(5)]));

        let handle = contract.invoke("Transfer", &[]).await.unwrap();
        assert_eq!(handle["event"], "Transfer");

        let method = contract.invoke("transferRef", &[]).await.unwrap();
        assert_eq!(method["method"], "transfer");
    }

    #[tokio::test]
    async fn test_invoke_events_overrides_from_args() {
        let (_, contract) = assemble(Arc::new(Token), false);
        let result = contract
            .invoke("transfers", &[json!({ "fromBlock": 100, "name": "Ignored" })])
            .await
            .unwrap();
        assert_eq!(result["options"], json!({ "name": "Transfer", "fromBlock": 100 }));

        let err = contract
            .invoke("transfers", &[json!({ "fromBlock": "soon" })])
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::InvalidOverrides(_)));
    }

    #[tokio::test]
    async fn test_query_events_kind_mismatch() {
        let (_, contract) = assemble(Arc::new(Token), false);
        let err = contract.query_events("balance", None).await.unwrap_err();
        assert!(matches!(err, DispatchError::KindMismatch { .. }));
    }

    #[tokio::test]
    async fn test_unknown_member_and_stub() {
        let (_, contract) = assemble(Arc::new(Token), false);
        assert!(matches!(
            contract.invoke("mint", &[]).await,
            Err(DispatchError::UnknownMember(_))
        ));
        assert!(matches!(
            contract.call("balanceOf", &[]).await,
            Err(DispatchError::UnknownStub(_))
        ));
        assert!(matches!(contract.event("Transfer"), Err(DispatchError::UnknownStub(_))));
    }

    #[tokio::test]
    async fn test_dynamic_stubs_dispatch() {
        let (plugin, contract) = assemble(Arc::new(EmptyEntity), true);
        contract.call("balanceOf", &[json!("0x01")]).await.unwrap();
        let handle = contract.event("Transfer").unwrap();
        assert_eq!(handle["event"], "Transfer");
        assert_eq!(plugin.journal().method_calls()[0].0, "balanceOf");
    }

    #[test]
    fn test_typed_entity_access() {
        let (_, contract) = assemble(Arc::new(Token), false);
        assert!(contract.entity::<Token>().is_some());
        assert!(contract.entity::<EmptyEntity>().is_none());
    }
}
