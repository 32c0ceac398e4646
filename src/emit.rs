//! TypeScript text emission.
//!
//! The routes file is three blocks joined by a blank line: params aliases,
//! return aliases, resource exports. Every block is built from ordered
//! collections, so the same inputs always give byte-identical text.
use crate::naming;
use crate::path;
use crate::routes::RouteDescriptor;
use crate::signatures::SignatureTable;

/// The request helper the generated resources are shaped for.
pub const RUNTIME_HELPER: &str = include_str!("assets/runtime.ts");

pub fn params_block(signatures: &SignatureTable) -> String {
    signatures
        .iter()
        .map(|s| format!("type {} = {}\n", s.params_type_name(), s.params_type))
        .collect()
}

pub fn returns_block(signatures: &SignatureTable) -> String {
    signatures
        .iter()
        .map(|s| format!("type {} = Exclude<{}, void>\n", s.return_type_name(), s.return_type))
        .collect()
}

pub fn resource(descriptor: &RouteDescriptor) -> String {
    let name = naming::camelize_lower(&descriptor.name);
    let names = descriptor
        .names
        .iter()
        .map(|n| crate::types::render::quote(n))
        .collect::<Vec<_>>()
        .join(",");
    let methods = descriptor
        .verbs
        .keys()
        .map(|v| crate::types::render::quote(v))
        .collect::<Vec<_>>()
        .join(" | ");
    let params = descriptor
        .verbs
        .iter()
        .map(|(verb, s)| format!("    {verb}: {}", s.params_type_name()))
        .collect::<Vec<_>>()
        .join(",\n");
    let returns = descriptor
        .verbs
        .iter()
        .map(|(verb, s)| format!("    {verb}: {}", s.return_type_name()))
        .collect::<Vec<_>>()
        .join(",\n");
    let path = path::path_function(&descriptor.spec, &descriptor.names);

    format!(
        "export const {name} = {{\n  \
           path: {path},\n  \
           names: [{names}]\n\
         }} as {{\n  \
           path: (args: any) => string\n  \
           names: [{names}]\n  \
           Methods?: {methods}\n  \
           Params?: {{\n\
         {params}\n  \
           }}\n  \
           Return?: {{\n\
         {returns}\n  \
           }}\n\
         }}\n"
    )
}

pub fn resources_block(descriptors: &[RouteDescriptor]) -> String {
    descriptors.iter().map(resource).collect()
}

pub fn routes_file(signatures: &SignatureTable, descriptors: &[RouteDescriptor]) -> String {
    [
        params_block(signatures),
        returns_block(signatures),
        resources_block(descriptors),
    ]
    .join("\n")
}

// ------------------------------- Tests ------------------------------------ //
