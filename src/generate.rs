//! End-to-end generation over already-loaded documents.
use serde_json::{Map, Value};
use tracing::info;

use crate::emit;
use crate::error::{Diagnostic, MissingRequiredSegment, Result};
use crate::path;
use crate::routes::{self, RouteDescriptor, RouteTable};
use crate::signatures::{self, SignatureEnvironment, SignatureTable};

#[derive(Debug, Clone)]
pub struct Generated {
    pub text: String,
    pub signatures: SignatureTable,
    pub descriptors: Vec<RouteDescriptor>,
    /// Actions whose signatures could not be rendered.
    pub diagnostics: Vec<Diagnostic>,
    /// Route groups with no bound verb.
    pub skipped_routes: Vec<Diagnostic>,
}

/// Fails only on fatal problems (vocabulary drift); per-action problems end
/// up in [`Generated::diagnostics`].
pub fn generate(env: &SignatureEnvironment, table: &RouteTable) -> Result<Generated> {
    let (signatures, diagnostics) = signatures::collect(env)?;
    let aggregation = routes::aggregate(table, &signatures);
    let text = emit::routes_file(&signatures, &aggregation.descriptors);
    info!(bytes = text.len(), "generated routes file");
    Ok(Generated {
        text,
        signatures,
        descriptors: aggregation.descriptors,
        diagnostics,
        skipped_routes: aggregation.skipped,
    })
}

impl Generated {
    pub fn descriptor(&self, name: &str) -> Option<&RouteDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }
}

impl RouteDescriptor {
    /// What the emitted `path` function returns for `params`.
    pub fn build_path(&self, params: &Map<String, Value>) -> std::result::Result<String, MissingRequiredSegment> {
        path::evaluate(&self.spec, params)
    }
}

/// Looks a route up by name (as written in the route table) and evaluates its path.
/// `None` when no descriptor was emitted under that name.
pub fn evaluate_route(
    generated: &Generated,
    name: &str,
    params: &Map<String, Value>,
) -> Option<std::result::Result<String, MissingRequiredSegment>> {
    Some(generated.descriptor(name)?.build_path(params))
}

// ------------------------------- Tests ------------------------------------ //
