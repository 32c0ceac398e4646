//! Route table input and aggregation into resource descriptors.
//!
//! Pipeline:
//! 1. drop internal and mounted-engine routes
//! 2. nameless routes inherit the preceding name when they share its path spec,
//!    otherwise they are dropped
//! 3. group by name (first-seen order)
//! 4. bind each member's verb to the collected signature of its controller action
//! 5. drop groups with no bound verb
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, info, warn};

use crate::error::Diagnostic;
use crate::path::{self, PathNode};
use crate::signatures::{ActionSignature, SignatureTable};

// ------------------------------- Input ------------------------------------ //

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRecord {
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Dynamic parameter names, in pattern order.
    #[serde(default)]
    pub parts: Vec<String>,
    #[serde(default)]
    pub requirements: Requirements,
    /// Synthesized by the framework itself.
    #[serde(default)]
    pub internal: bool,
    /// Served by a mounted sub-application.
    #[serde(default)]
    pub engine: bool,
    /// Either a pattern string (`/widgets/:id(.:format)`) or a PathNode tree.
    #[serde(deserialize_with = "deserialize_spec")]
    pub spec: PathNode,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Requirements {
    #[serde(default)]
    pub controller: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RouteTable {
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpecSource {
    Pattern(String),
    Tree(PathNode),
}

fn deserialize_spec<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PathNode, D::Error> {
    match SpecSource::deserialize(deserializer)? {
        SpecSource::Pattern(pattern) => path::parse(&pattern).map_err(serde::de::Error::custom),
        SpecSource::Tree(node) => Ok(node),
    }
}

// ------------------------------- Output ----------------------------------- //

#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub name: String,
    pub names: Vec<String>,
    pub spec: PathNode,
    /// verb → signature, first-seen verb order.
    pub verbs: IndexMap<String, ActionSignature>,
}

#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub descriptors: Vec<RouteDescriptor>,
    /// Route groups left out because none of their actions had a signature.
    pub skipped: Vec<Diagnostic>,
}

// ----------------------------- Aggregate ---------------------------------- //

/// Steps 1 and 2: the routes that take part, each paired with its effective name.
pub fn named_routes(table: &RouteTable) -> Vec<(String, &RouteRecord)> {
    let mut out: Vec<(String, &RouteRecord)> = Vec::new();
    for route in table.routes.iter().filter(|r| !r.internal && !r.engine) {
        let previous = out.last();
        let name = match (&route.name, previous) {
            (Some(name), _) => name.clone(),
            (None, Some((prev_name, prev))) if prev.spec.to_string() == route.spec.to_string() => {
                prev_name.clone()
            }
            (None, Some((prev_name, prev))) => {
                debug!(spec = %route.spec, previous = %prev_name, previous_spec = %prev.spec, "dropping nameless route");
                continue;
            }
            (None, None) => {
                debug!(spec = %route.spec, "dropping nameless route with no named predecessor");
                continue;
            }
        };
        out.push((name, route));
    }
    out
}

pub fn aggregate(table: &RouteTable, signatures: &SignatureTable) -> Aggregation {
    let mut groups: IndexMap<String, Vec<&RouteRecord>> = IndexMap::new();
    for (name, route) in named_routes(table) {
        groups.entry(name).or_default().push(route);
    }

    let mut aggregation = Aggregation::default();
    for (name, members) in groups {
        let mut verbs = IndexMap::new();
        for route in &members {
            let (Some(controller), Some(action)) =
                (&route.requirements.controller, &route.requirements.action)
            else {
                continue;
            };
            match signatures.get(controller, action) {
                Some(signature) => {
                    verbs.insert(route.verb.clone(), signature.clone());
                }
                None => debug!(route = %name, verb = %route.verb, %controller, %action, "verb has no signature"),
            }
        }
        if verbs.is_empty() {
            warn!(route = %name, "no verb bound; omitting");
            aggregation.skipped.push(Diagnostic::new(
                format!("route `{name}`"),
                "no verb is bound to a collected signature",
            ));
            continue;
        }
        let first = members[0];
        aggregation.descriptors.push(RouteDescriptor {
            name,
            names: first.parts.clone(),
            spec: first.spec.clone(),
            verbs,
        });
    }
    info!(
        descriptors = aggregation.descriptors.len(),
        skipped = aggregation.skipped.len(),
        "route aggregation done"
    );
    aggregation
}

// ------------------------------- Tests ------------------------------------ //
