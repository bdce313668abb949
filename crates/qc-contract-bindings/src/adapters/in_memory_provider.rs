//! # In-Memory Provider
//!
//! Provider implementation without a network, for tests and local wiring.
//! Production providers would translate these calls into node RPC.
//!
//! Every call is appended to a [`ProviderJournal`] shared by the plugin and all
//! instances it creates, so tests can observe what the binding core did.

use crate::config::ProviderInstanceOptions;
use crate::domain::abi::{EntryKind, InterfaceImport};
use crate::domain::entities::EventFilterOptions;
use crate::domain::value_objects::ProviderType;
use crate::errors::ProviderError;
use crate::ports::outbound::{
    ContractProvider, EventHandle, EventQueryResult, MethodReference, ProviderPlugin,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// =============================================================================
// JOURNAL
// =============================================================================

/// One recorded provider call.
#[derive(Clone, Debug, PartialEq)]
pub enum ProviderCall {
    /// Import received during composition.
    Import { instance: usize },
    /// `call_method`.
    Method {
        instance: usize,
        name: String,
        args: Vec<Value>,
    },
    /// `get_events`.
    Events {
        instance: usize,
        name: String,
        options: EventFilterOptions,
    },
    /// `connect`.
    Connect { instance: usize },
    /// `set_instance_options`.
    Options {
        instance: usize,
        options: ProviderInstanceOptions,
    },
}

/// Shared record of provider calls.
#[derive(Debug, Default)]
pub struct ProviderJournal {
    calls: Mutex<Vec<ProviderCall>>,
}

impl ProviderJournal {
    fn record(&self, call: ProviderCall) {
        self.calls.lock().push(call);
    }

    /// All recorded calls, oldest first.
    #[must_use]
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.calls.lock().clone()
    }

    /// `(name, args)` of every `call_method`.
    #[must_use]
    pub fn method_calls(&self) -> Vec<(String, Vec<Value>)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ProviderCall::Method { name, args, .. } => Some((name.clone(), args.clone())),
                _ => None,
            })
            .collect()
    }

    /// `(name, options)` of every `get_events`.
    #[must_use]
    pub fn event_queries(&self) -> Vec<(String, EventFilterOptions)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ProviderCall::Events { name, options, .. } => Some((name.clone(), options.clone())),
                _ => None,
            })
            .collect()
    }

    /// Instances that ran `connect`, in call order.
    #[must_use]
    pub fn connected_instances(&self) -> Vec<usize> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ProviderCall::Connect { instance } => Some(*instance),
                _ => None,
            })
            .collect()
    }

    /// Options applied, per instance.
    #[must_use]
    pub fn applied_options(&self) -> Vec<(usize, ProviderInstanceOptions)> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ProviderCall::Options { instance, options } => Some((*instance, options.clone())),
                _ => None,
            })
            .collect()
    }
}

// =============================================================================
// PLUGIN
// =============================================================================

/// Creates [`InMemoryProvider`] instances.
#[derive(Clone, Debug)]
pub struct InMemoryProviderPlugin {
    provider_type: ProviderType,
    responses: Arc<HashMap<String, Value>>,
    fail_connect: bool,
    journal: Arc<ProviderJournal>,
    next_instance: Arc<AtomicUsize>,
}

impl InMemoryProviderPlugin {
    /// Creates a plugin for the given provider type.
    pub fn new(provider_type: impl Into<ProviderType>) -> Self {
        Self {
            provider_type: provider_type.into(),
            responses: Arc::new(HashMap::new()),
            fail_connect: false,
            journal: Arc::new(ProviderJournal::default()),
            next_instance: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Canned result for a method.
    #[must_use]
    pub fn with_response(mut self, method: impl Into<String>, value: Value) -> Self {
        Arc::make_mut(&mut self.responses).insert(method.into(), value);
        self
    }

    /// Make `connect` fail with a transport error.
    #[must_use]
    pub fn with_connect_failure(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// The journal shared with every instance.
    #[must_use]
    pub fn journal(&self) -> Arc<ProviderJournal> {
        Arc::clone(&self.journal)
    }

    /// Number of instances created so far.
    #[must_use]
    pub fn instances(&self) -> usize {
        self.next_instance.load(Ordering::SeqCst)
    }
}

impl ProviderPlugin for InMemoryProviderPlugin {
    fn instantiate(&self) -> Box<dyn ContractProvider> {
        let id = self.next_instance.fetch_add(1, Ordering::SeqCst);
        Box::new(InMemoryProvider {
            id,
            provider_type: self.provider_type.clone(),
            responses: Arc::clone(&self.responses),
            fail_connect: self.fail_connect,
            journal: Arc::clone(&self.journal),
            state: RwLock::new(InstanceState::default()),
        })
    }
}

// =============================================================================
// PROVIDER INSTANCE
// =============================================================================

#[derive(Debug, Default)]
struct InstanceState {
    methods: HashSet<String>,
    events: HashSet<String>,
    connected: bool,
    options: Option<ProviderInstanceOptions>,
}

/// One provider instance, owned by one bound contract.
#[derive(Debug)]
pub struct InMemoryProvider {
    id: usize,
    provider_type: ProviderType,
    responses: Arc<HashMap<String, Value>>,
    fail_connect: bool,
    journal: Arc<ProviderJournal>,
    state: RwLock<InstanceState>,
}

impl InMemoryProvider {
    /// Instance number assigned by the plugin.
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns true after a successful `connect`.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state.read().connected
    }
}

#[async_trait]
impl ContractProvider for InMemoryProvider {
    fn provider_type(&self) -> ProviderType {
        self.provider_type.clone()
    }

    async fn call_method(&self, name: &str, args: &[Value]) -> Result<Value, ProviderError> {
        self.journal.record(ProviderCall::Method {
            instance: self.id,
            name: name.to_string(),
            args: args.to_vec(),
        });
        if let Some(value) = self.responses.get(name) {
            return Ok(value.clone());
        }
        if self.state.read().methods.contains(name) {
            Ok(Value::Null)
        } else {
            Err(ProviderError::UnknownMethod(name.to_string()))
        }
    }

    fn get_event(&self, name: &str) -> Result<EventHandle, ProviderError> {
        if self.state.read().events.contains(name) {
            Ok(json!({ "event": name, "instance": self.id }))
        } else {
            Err(ProviderError::UnknownEvent(name.to_string()))
        }
    }

    async fn get_events(
        &self,
        name: &str,
        options: &EventFilterOptions,
    ) -> Result<EventQueryResult, ProviderError> {
        self.journal.record(ProviderCall::Events {
            instance: self.id,
            name: name.to_string(),
            options: options.clone(),
        });
        Ok(json!({ "event": name, "options": options, "logs": [] }))
    }

    fn get_method(&self, name: &str) -> Result<MethodReference, ProviderError> {
        if self.state.read().methods.contains(name) {
            Ok(json!({ "method": name, "instance": self.id }))
        } else {
            Err(ProviderError::UnknownMethod(name.to_string()))
        }
    }

    fn connect(&self) -> Result<(), ProviderError> {
        if self.fail_connect {
            return Err(ProviderError::Transport(format!(
                "{} instance {} unreachable",
                self.provider_type, self.id
            )));
        }
        self.state.write().connected = true;
        self.journal.record(ProviderCall::Connect { instance: self.id });
        Ok(())
    }

    fn set_instance_options(&self, options: &ProviderInstanceOptions) {
        self.state.write().options = Some(options.clone());
        self.journal.record(ProviderCall::Options {
            instance: self.id,
            options: options.clone(),
        });
    }

    fn on_import(&self, import: &InterfaceImport) {
        let mut state = self.state.write();
        for entry in import.entries() {
            match entry.kind() {
                EntryKind::Function => {
                    state.methods.insert(entry.name);
                }
                EntryKind::Event => {
                    state.events.insert(entry.name);
                }
                EntryKind::Other => {}
            }
        }
        self.journal.record(ProviderCall::Import { instance: self.id });
    }
}

// =============================================================================
// TESTS
// =============================================================================
