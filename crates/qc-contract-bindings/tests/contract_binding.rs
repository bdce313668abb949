//! # Contract Binding Integration Tests
//!
//! End-to-end bind passes through the public API: declarations in, a keyed
//! collection of bound contracts out, dispatch against the in-memory provider.
//!
//! ## Coverage
//!
//! 1. Explicit and short-form key derivation
//! 2. Dynamic stubs and topics derived from a token ABI
//! 3. Static members dispatched through the entity table
//! 4. Event query option merging with a pinned name
//! 5. `rebind`, `connect` and setup options

use qc_contract_bindings::adapters::{InMemoryProviderPlugin, ProviderCall};
use qc_contract_bindings::prelude::*;
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

const TOKEN_ARTIFACT: &str = r#"{
    "raw": {
        "contractName": "Token",
        "abi": [
            { "type": "function", "name": "balanceOf", "stateMutability": "view",
              "inputs": [{ "name": "owner", "type": "address" }],
              "outputs": [{ "name": "", "type": "uint256" }] },
            { "type": "function", "name": "transfer", "stateMutability": "nonpayable",
              "inputs": [
                  { "name": "to", "type": "address" },
                  { "name": "value", "type": "uint256" }
              ] },
            { "type": "event", "name": "Transfer",
              "signature": "Transfer(address,address,uint256)",
              "inputs": [
                  { "name": "from", "type": "address", "indexed": true },
                  { "name": "to", "type": "address", "indexed": true },
                  { "name": "value", "type": "uint256", "indexed": false }
              ] },
            { "type": "constructor", "inputs": [] },
            "not an entry"
        ],
        "bytecode": "0x6080"
    }
}"#;

fn token_import() -> InterfaceImport {
    InterfaceImport::from_json_str(TOKEN_ARTIFACT).unwrap()
}

fn plugin(name: &str) -> Arc<dyn ProviderPlugin> {
    Arc::new(InMemoryProviderPlugin::new(name))
}

/// Typed token shape with one member per dispatch kind.
struct Token;

impl ContractEntity for Token {
    fn members(&self) -> Vec<MemberBinding> {
        vec![
            MemberBinding::read("balance")
                .named("balanceOf")
                .with_validations(|args: &[Value]| match args.first() {
                    Some(Value::String(owner)) if owner.starts_with("0x") => Ok(()),
                    _ => Err(ValidationError::new("balanceOf", "owner must be a hex address")),
                }),
            MemberBinding::write("transfer"),
            MemberBinding::event("Transfer"),
            MemberBinding::events(
                "recentTransfers",
                EventFilterOptions::named("Transfer").from_block(0),
            ),
            MemberBinding::method("transfer_ref").named("transfer"),
        ]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// =============================================================================
// KEY DERIVATION
// =============================================================================

#[test]
fn test_explicit_mode_one_key_per_declaration() {
    let a = plugin("A");
    let b = plugin("B");
    let declarations = vec![
        ContractDeclaration::new("Token", token_import())
            .with_entity(Token)
            .with_provider(a),
        ContractDeclaration::new("Registry", token_import())
            .with_dynamic_stubs(true)
            .with_provider(b),
    ];
    let mut module = ContractModule::new(declarations, vec![]);
    let contracts = module.bind_contracts(None).unwrap();

    assert_eq!(contracts.keys().collect::<Vec<_>>(), vec!["Token", "Registry"]);
    assert_eq!(
        contracts.get("Token").unwrap().provider_type(),
        &ProviderType::from("A")
    );
    assert_eq!(
        contracts.get("Registry").unwrap().provider_type(),
        &ProviderType::from("B")
    );
}

#[test]
fn test_short_form_contracts_are_independent() {
    let a = InMemoryProviderPlugin::new("A");
    let b = InMemoryProviderPlugin::new("B");
    let declaration = ContractDeclaration::new("Foo", token_import()).with_dynamic_stubs(true);
    let mut module = ContractModule::new(
        vec![declaration],
        vec![Arc::new(a.clone()), Arc::new(b.clone())],
    );
    let contracts = module.bind_contracts(None).unwrap();

    assert_eq!(contracts.len(), 2);
    let a_foo = contracts.get("AFoo").unwrap();
    let b_foo = contracts.get("BFoo").unwrap();
    assert_eq!(a_foo.name(), "Foo");
    assert_eq!(b_foo.name(), "Foo");
    assert_eq!(a.instances(), 1);
    assert_eq!(b.instances(), 1);

    a_foo.connect().unwrap();
    assert_eq!(a.journal().connected_instances(), vec![0]);
    assert!(b.journal().connected_instances().is_empty());
}

#[test]
fn test_empty_module_yields_empty_collection() {
    let mut module = ContractModule::new(vec![], vec![]);
    assert!(module.bind_contracts(None).unwrap().is_empty());
}

#[test]
fn test_missing_entity_aborts_pass() {
    let declarations = vec![
        ContractDeclaration::new("Good", token_import())
            .with_dynamic_stubs(true)
            .with_provider(plugin("A")),
        ContractDeclaration::new("Bad", token_import())
            .with_dynamic_stubs(false)
            .with_provider(plugin("A")),
    ];
    let mut module = ContractModule::new(declarations, vec![]);
    assert_eq!(
        module.bind_contracts(None).unwrap_err(),
        BindingError::MissingEntity {
            contract: "Bad".to_string()
        }
    );
}

#[test]
fn test_explicit_mode_missing_provider() {
    let declaration = ContractDeclaration::new("Token", token_import()).with_dynamic_stubs(true);
    let mut module = ContractModule::new(vec![declaration.clone(), declaration], vec![]);
    assert!(matches!(
        module.bind_contracts(None),
        Err(BindingError::MissingProvider { .. })
    ));
}

#[test]
fn test_duplicate_names_overwrite_unless_strict() {
    let a = plugin("A");
    let declarations = vec![
        ContractDeclaration::new("Token", token_import())
            .with_dynamic_stubs(true)
            .with_provider(Arc::clone(&a)),
        ContractDeclaration::new("Token", token_import())
            .with_entity(Token)
            .with_provider(a),
    ];

    let mut module = ContractModule::new(declarations.clone(), vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    assert_eq!(contracts.len(), 1);
    assert!(contracts.get_contract::<Token>("Token").is_some());

    let mut strict = ContractModule::new(declarations, vec![])
        .with_config(BindingConfig::default().with_strict_registry_keys(true));
    assert!(matches!(
        strict.bind_contracts(None),
        Err(BindingError::DuplicateKey { .. })
    ));
}

// =============================================================================
// DYNAMIC STUBS AND TOPICS
// =============================================================================

#[test]
fn test_token_abi_stubs_and_topic() {
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_dynamic_stubs(true)
        .with_provider(plugin("A"));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get_dynamic_contract("Token").unwrap();

    assert_eq!(token.abi().len(), 4);
    assert_eq!(token.stub_kind("balanceOf"), Some(StubKind::Read));
    assert_eq!(token.stub_kind("transfer"), Some(StubKind::Write));
    assert_eq!(token.methods().len(), 2);
    assert!(token.events().contains_key("Transfer"));

    let topic = token.topic("Transfer").unwrap();
    assert_eq!(topic.signature(), "Transfer(address,address,uint256)");
    assert_eq!(topic.topic().to_string(), TRANSFER_TOPIC);
    assert_eq!(token.import().raw["bytecode"], "0x6080");
}

#[test]
fn test_stubs_absent_when_disabled() {
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_entity(Token)
        .with_provider(plugin("A"));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get("Token").unwrap();

    assert!(token.methods().is_empty());
    assert!(token.events().is_empty());
    assert!(token.topic("Transfer").is_some());
}

#[tokio::test]
async fn test_dynamic_stub_calls_provider() {
    let a = InMemoryProviderPlugin::new("A").with_response("balanceOf", json!("1000"));
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_dynamic_stubs(true)
        .with_provider(Arc::new(a.clone()));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get("Token").unwrap();

    let balance = token.call("balanceOf", &[json!("0x01")]).await.unwrap();
    assert_eq!(balance, json!("1000"));
    assert_eq!(token.event("Transfer").unwrap()["event"], "Transfer");
    assert!(matches!(
        token.call("mint", &[]).await,
        Err(DispatchError::UnknownStub(_))
    ));
    assert_eq!(
        a.journal().method_calls(),
        vec![("balanceOf".to_string(), vec![json!("0x01")])]
    );
}

// =============================================================================
// STATIC MEMBERS
// =============================================================================

#[tokio::test]
async fn test_static_members_dispatch() {
    let a = InMemoryProviderPlugin::new("A").with_response("balanceOf", json!(7));
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_entity(Token)
        .with_provider(Arc::new(a.clone()));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get_contract::<Token>("Token").unwrap();
    assert!(token.entity::<Token>().is_some());

    let balance = token.invoke("balance", &[json!("0xabc")]).await.unwrap();
    assert_eq!(balance, json!(7));

    let rejected = token.invoke("balance", &[json!(12)]).await.unwrap_err();
    assert!(matches!(rejected, DispatchError::Validation(_)));

    token
        .invoke("transfer", &[json!("0xdef"), json!(5)])
        .await
        .unwrap();
    assert_eq!(a.journal().method_calls().len(), 2);

    let handle = token.invoke("Transfer", &[]).await.unwrap();
    assert_eq!(handle["event"], "Transfer");
    let method = token.invoke("transfer_ref", &[]).await.unwrap();
    assert_eq!(method["method"], "transfer");

    assert!(matches!(
        token.invoke("approve", &[]).await,
        Err(DispatchError::UnknownMember(_))
    ));
}

#[tokio::test]
async fn test_event_query_name_is_pinned() {
    let a = InMemoryProviderPlugin::new("A");
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_entity(Token)
        .with_provider(Arc::new(a.clone()));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get("Token").unwrap();

    let transfer = TopicSignature::new("Transfer(address,address,uint256)");
    let overrides = EventFilterOptions::named("Approval")
        .from_block(500)
        .with_topics(TopicFilter::new().topic(transfer.topic()));
    token
        .query_events("recentTransfers", Some(&overrides))
        .await
        .unwrap();
    token
        .invoke("recentTransfers", &[json!({ "name": "Approval", "toBlock": 900 })])
        .await
        .unwrap();

    let queries = a.journal().event_queries();
    assert_eq!(queries.len(), 2);
    assert!(queries.iter().all(|(name, options)| {
        name == "Transfer" && options.name.as_deref() == Some("Transfer")
    }));
    assert_eq!(queries[0].1.from_block, Some(BlockTag::Number(500)));
    assert!(queries[0].1.topics.is_some());
    assert_eq!(queries[1].1.from_block, Some(BlockTag::Number(0)));
    assert_eq!(queries[1].1.to_block, Some(BlockTag::Number(900)));

    assert!(matches!(
        token.query_events("balance", None).await,
        Err(DispatchError::KindMismatch { .. })
    ));
    assert!(matches!(
        token.invoke("recentTransfers", &[json!("bad")]).await,
        Err(DispatchError::InvalidOverrides(_))
    ));
}

#[tokio::test]
async fn test_event_query_forwards_block_tags() {
    let a = InMemoryProviderPlugin::new("A");
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_entity(Token)
        .with_provider(Arc::new(a.clone()));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let token = contracts.get("Token").unwrap();

    let result = token
        .invoke("recentTransfers", &[json!({ "fromBlock": "latest" })])
        .await
        .unwrap();
    assert_eq!(result["options"]["fromBlock"], "latest");

    let queries = a.journal().event_queries();
    assert_eq!(
        queries[0].1.from_block,
        Some(BlockTag::Tag("latest".to_string()))
    );
}

// =============================================================================
// REBIND, CONNECT, SETUP OPTIONS
// =============================================================================

#[test]
fn test_rebind_requires_prior_bind() {
    let declaration = ContractDeclaration::new("Foo", token_import()).with_dynamic_stubs(true);
    let mut module = ContractModule::new(vec![declaration], vec![plugin("A")]);
    assert_eq!(module.rebind().unwrap_err(), BindingError::NotBound);
}

#[test]
fn test_rebind_reproduces_collection() {
    let a = InMemoryProviderPlugin::new("A");
    let b = InMemoryProviderPlugin::new("B");
    let declaration = ContractDeclaration::new("Foo", token_import()).with_dynamic_stubs(true);
    let mut module = ContractModule::new(
        vec![declaration],
        vec![Arc::new(a.clone()), Arc::new(b.clone())],
    );

    let mut setup = SetupOptions::new();
    setup.insert(ProviderType::from("B"), json!({ "from": "0xb0b" }));
    let first = module.bind_contracts(Some(setup)).unwrap();
    let second = module.rebind().unwrap();

    assert_eq!(
        first.keys().collect::<Vec<_>>(),
        second.keys().collect::<Vec<_>>()
    );
    assert!(!Arc::ptr_eq(
        &first.get("AFoo").unwrap(),
        &second.get("AFoo").unwrap()
    ));
    assert!(a.journal().applied_options().is_empty());

    let applied = b.journal().applied_options();
    assert_eq!(applied.len(), 2);
    assert_eq!(applied[0].0, 0);
    assert_eq!(applied[1].0, 1);
    assert!(applied
        .iter()
        .all(|(_, options)| options.get("from") == Some(&json!("0xb0b"))));
}

#[test]
fn test_connect_runs_every_hook_in_order() {
    let a = InMemoryProviderPlugin::new("A");
    let shared: Arc<dyn ProviderPlugin> = Arc::new(a.clone());
    let declarations = vec![
        ContractDeclaration::new("Token", token_import())
            .with_dynamic_stubs(true)
            .with_provider(Arc::clone(&shared)),
        ContractDeclaration::new("Vault", token_import())
            .with_dynamic_stubs(true)
            .with_provider(shared),
    ];
    let mut module = ContractModule::new(declarations, vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    let connected = contracts.connect().unwrap();

    assert_eq!(connected.keys().collect::<Vec<_>>(), vec!["Token", "Vault"]);
    assert_eq!(a.journal().connected_instances(), vec![0, 1]);

    let imports = a
        .journal()
        .calls()
        .into_iter()
        .filter(|call| matches!(call, ProviderCall::Import { .. }))
        .count();
    assert_eq!(imports, 2);
}

#[test]
fn test_connect_failure_surfaces() {
    let declaration = ContractDeclaration::new("Token", token_import())
        .with_dynamic_stubs(true)
        .with_provider(Arc::new(InMemoryProviderPlugin::new("A").with_connect_failure()));
    let mut module = ContractModule::new(vec![declaration], vec![]);
    let contracts = module.bind_contracts(None).unwrap();
    assert!(matches!(contracts.connect(), Err(ProviderError::Transport(_))));
}
