//! Signature collection: one params/return type pair per controller action.
//!
//! Failures are per action. An action whose signature cannot be rendered is
//! reported as a [`Diagnostic`] and left out; the rest of the controller (and
//! the run) carries on.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Diagnostic, Error, Result};
use crate::naming;
use crate::types::{MethodType, Vocabulary, params_projection, return_projection};

// ------------------------------- Input ------------------------------------ //

/// Signatures dumped by the host application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SignatureEnvironment {
    /// Upstream variant catalog; checked against ours before anything is rendered.
    /// At least one merged document must carry it.
    #[serde(default)]
    pub vocabulary: Option<Vocabulary>,
    #[serde(default)]
    pub controllers: Vec<ControllerSignatures>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControllerSignatures {
    /// Class path, e.g. `Admin::WidgetsController`.
    pub name: String,
    /// Public action methods declared on the class itself, in declaration order.
    #[serde(default)]
    pub actions: Vec<String>,
    #[serde(default)]
    pub methods: IndexMap<String, MethodDefinition>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodDefinition {
    #[serde(default)]
    pub overloads: Vec<MethodType>,
}

impl SignatureEnvironment {
    /// Appends `other`; controllers keep file order.
    pub fn merge(&mut self, other: SignatureEnvironment) -> Result<()> {
        match (&self.vocabulary, other.vocabulary) {
            (_, None) => {}
            (None, Some(v)) => self.vocabulary = Some(v),
            (Some(ours), Some(theirs)) => {
                ours.validate()?;
                theirs.validate()?;
            }
        }
        self.controllers.extend(other.controllers);
        Ok(())
    }

    /// Fatal startup check of the reported variant catalog.
    pub fn validate(&self) -> Result<()> {
        self.vocabulary.as_ref().ok_or(Error::MissingVocabulary)?.validate()
    }
}

// ------------------------------- Output ----------------------------------- //

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionSignature {
    /// Normalized controller key, e.g. `admin/widgets`.
    pub controller: String,
    pub action: String,
    pub params_type: String,
    pub return_type: String,
}

impl ActionSignature {
    pub fn params_type_name(&self) -> String {
        naming::params_type_name(&self.controller, &self.action)
    }
    pub fn return_type_name(&self) -> String {
        naming::return_type_name(&self.controller, &self.action)
    }
}

/// controller key → action → signature, in collection order.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    controllers: IndexMap<String, IndexMap<String, ActionSignature>>,
}

impl SignatureTable {
    pub fn get(&self, controller: &str, action: &str) -> Option<&ActionSignature> {
        self.controllers.get(controller)?.get(action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActionSignature> {
        self.controllers.values().flat_map(|actions| actions.values())
    }

    pub fn len(&self) -> usize {
        self.controllers.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, signature: ActionSignature) {
        self.controllers
            .entry(signature.controller.clone())
            .or_default()
            .insert(signature.action.clone(), signature);
    }
}

// ------------------------------ Collect ----------------------------------- //

pub fn collect(env: &SignatureEnvironment) -> Result<(SignatureTable, Vec<Diagnostic>)> {
    env.validate()?;

    let mut table = SignatureTable::default();
    let mut diagnostics = Vec::new();
    for controller in &env.controllers {
        let key = naming::controller_key(&controller.name);
        for action in &controller.actions {
            match convert(controller, &key, action) {
                Ok(Some(signature)) => {
                    debug!(controller = %key, %action, "collected signature");
                    table.insert(signature);
                }
                Ok(None) => {
                    debug!(controller = %controller.name, %action, "no signature declared");
                }
                Err(error) if error.is_recoverable() => {
                    let subject = format!("{}#{}", controller.name, action);
                    warn!(%subject, %error, "skipping action");
                    diagnostics.push(Diagnostic::new(subject, error));
                }
                Err(error) => return Err(error),
            }
        }
    }
    info!(actions = table.len(), skipped = diagnostics.len(), "signature collection done");
    Ok((table, diagnostics))
}

fn convert(
    controller: &ControllerSignatures,
    key: &str,
    action: &str,
) -> Result<Option<ActionSignature>> {
    let Some(method) = controller.methods.get(action) else {
        return Ok(None);
    };
    let [overload] = method.overloads.as_slice() else {
        return Err(Error::AmbiguousOverload(method.overloads.len()));
    };
    let function = overload.plain_function()?;
    let params_type = params_projection(function)?;
    let return_type = return_projection(function)?;
    Ok(Some(ActionSignature {
        controller: key.to_string(),
        action: action.to_string(),
        params_type: or_empty_object(params_type),
        return_type: or_empty_object(return_type),
    }))
}

fn or_empty_object(ty: String) -> String {
    if ty.is_empty() { "{}".to_string() } else { ty }
}

// ------------------------------- Tests ------------------------------------ //
