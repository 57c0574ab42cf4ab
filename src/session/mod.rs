use crate::traits::Session;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use tracing::debug;
use uuid::Uuid;

/// Output route a unit is transferred to
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Route {
    Success,
    Failure,
}

impl Route {
    pub const fn name(&self) -> &'static str {
        match self {
            Route::Success => "success",
            Route::Failure => "failure",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One unit of data flowing through the host pipeline
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FlowUnit {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub content: Vec<u8>,
    #[serde(default)]
    pub penalized: bool,
}

impl FlowUnit {
    pub fn new(attributes: BTreeMap<String, String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            attributes,
            content: content.into(),
            penalized: false,
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ProvenanceEvent {
    pub unit_id: Uuid,
    pub destination: String,
}

/// In-memory [`Session`] used by the CLI host and in tests.
#[derive(Default, Debug)]
pub struct MemorySession {
    pending: VecDeque<FlowUnit>,
    pub routed: Vec<(FlowUnit, Route)>,
    pub provenance: Vec<ProvenanceEvent>,
    pub yields: usize,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, unit: FlowUnit) {
        self.pending.push_back(unit);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn routed_to(&self, route: Route) -> impl Iterator<Item = &FlowUnit> {
        self.routed.iter().filter(move |(_, r)| *r == route).map(|(u, _)| u)
    }
}

impl Session for MemorySession {
    fn get(&mut self) -> Option<FlowUnit> {
        self.pending.pop_front()
    }

    fn penalize(&mut self, mut unit: FlowUnit) -> FlowUnit {
        unit.penalized = true;
        unit
    }

    fn transfer(&mut self, unit: FlowUnit, route: Route) {
        debug!(unit_id = %unit.id, route = %route, "Transferring unit");
        self.routed.push((unit, route));
    }

    fn report_send(&mut self, unit: &FlowUnit, destination: &str) {
        self.provenance.push(ProvenanceEvent {
            unit_id: unit.id,
            destination: destination.to_string(),
        });
    }

    fn yield_processor(&mut self) {
        self.yields += 1;
    }
}
