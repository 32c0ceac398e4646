//! Projections of a method signature into a params object type and a return type.
use super::{FunctionSignature, MethodType, ParamKind, render};
use crate::error::{Error, Result};

/// `{ a: T; b?: U }`, or an empty string for a parameterless function.
pub fn params_projection(function: &FunctionSignature) -> Result<String> {
    let mut params = Vec::with_capacity(function.params.len());
    for param in &function.params {
        let optional = match param.kind {
            ParamKind::RequiredPositional
            | ParamKind::TrailingPositional
            | ParamKind::RequiredKeyword => false,
            ParamKind::OptionalPositional | ParamKind::OptionalKeyword => true,
            ParamKind::RestPositional => return Err(Error::unsupported("rest positional parameter")),
            ParamKind::RestKeyword => return Err(Error::unsupported("rest keyword parameter")),
        };
        let name = param
            .name
            .as_deref()
            .ok_or_else(|| Error::unsupported("unnamed parameter"))?;
        let ty = render(&param.ty, 0)?;
        params.push(if optional { format!("{name}?: {ty}") } else { format!("{name}: {ty}") });
    }
    if params.is_empty() {
        return Ok(String::new());
    }
    Ok(format!("{{ {} }}", params.join("; ")))
}

pub fn return_projection(function: &FunctionSignature) -> Result<String> {
    render(&function.returns, 0)
}

impl MethodType {
    /// Rejects the signature shapes we never render: generics and blocks.
    pub fn plain_function(&self) -> Result<&FunctionSignature> {
        if !self.type_params.is_empty() {
            return Err(Error::unsupported(format!(
                "type parameters [{}]",
                self.type_params.join(", ")
            )));
        }
        match self.block {
            Some(block) if block.required => Err(Error::unsupported("required block")),
            Some(_) => Err(Error::unsupported("optional block")),
            None => Ok(&self.function),
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BaseKind, Block, FieldKey, ParamSpec, TypeNode};

    fn function(params: Vec<ParamSpec>, returns: TypeNode) -> FunctionSignature {
        FunctionSignature { params, returns: Box::new(returns) }
    }
    fn integer() -> TypeNode { TypeNode::class("::Integer", vec![]) }
    fn string() -> TypeNode { TypeNode::class("::String", vec![]) }

    #[test]
    fn keyword_params() {
        let f = function(
            vec![
                ParamSpec::new("id", integer(), ParamKind::RequiredKeyword),
                ParamSpec::new("name", string(), ParamKind::OptionalKeyword),
            ],
            TypeNode::base(BaseKind::Void),
        );
        assert_eq!(params_projection(&f).unwrap(), "{ id: number; name?: string }");
        assert_eq!(return_projection(&f).unwrap(), "void");
    }

    #[test]
    fn positional_params_keep_declaration_order() {
        let f = function(
            vec![
                ParamSpec::new("a", integer(), ParamKind::RequiredPositional),
                ParamSpec::new("b", string(), ParamKind::OptionalPositional),
                ParamSpec::new("c", TypeNode::base(BaseKind::Any), ParamKind::TrailingPositional),
            ],
            TypeNode::base(BaseKind::Void),
        );
        assert_eq!(params_projection(&f).unwrap(), "{ a: number; b?: string; c: any }");
    }

    #[test]
    fn empty_params_project_to_empty_string() {
        let f = function(vec![], TypeNode::record([(FieldKey::Symbol("ok".into()), TypeNode::base(BaseKind::Bool))]));
        assert_eq!(params_projection(&f).unwrap(), "");
        assert_eq!(return_projection(&f).unwrap(), "{ ok: boolean }");
    }

    #[test]
    fn rest_params_fail_the_whole_signature() {
        for kind in [ParamKind::RestPositional, ParamKind::RestKeyword] {
            let f = function(
                vec![
                    ParamSpec::new("id", integer(), ParamKind::RequiredKeyword),
                    ParamSpec::new("rest", string(), kind),
                ],
                TypeNode::base(BaseKind::Void),
            );
            assert!(matches!(params_projection(&f), Err(Error::UnsupportedConstruct(_))));
        }
    }

    #[test]
    fn unnamed_positional_fails() {
        let f = function(
            vec![ParamSpec { name: None, ty: integer(), kind: ParamKind::RequiredPositional }],
            TypeNode::base(BaseKind::Void),
        );
        assert!(params_projection(&f).is_err());
    }

    #[test]
    fn generics_and_blocks_are_rejected() {
        let plain = MethodType {
            type_params: vec![],
            block: None,
            function: function(vec![], TypeNode::base(BaseKind::Void)),
        };
        assert!(plain.plain_function().is_ok());

        let generic = MethodType { type_params: vec!["T".into()], ..plain.clone() };
        assert!(generic.plain_function().is_err());

        let with_block = MethodType { block: Some(Block { required: false }), ..plain };
        assert!(with_block.plain_function().is_err());
    }
}
