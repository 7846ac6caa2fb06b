//! Source-tree walking: contract selection and constructor type resolution.
//!
//! The parse tree comes from [`solang_parser`]; this module lowers the parts
//! of it we care about into a closed [`TypeRef`] so the rest of the pipeline
//! can match exhaustively instead of probing node shapes.

use crate::error::VerifyError;
use solang_parser::pt::{
    ContractDefinition, ContractPart, ContractTy, Expression, FunctionAttribute,
    FunctionDefinition, FunctionTy, Mutability, SourceUnit, SourceUnitPart, Type,
};

/// A constructor parameter type, lowered from the parse tree.
///
/// Nested arrays are out of scope: an array base is always elementary or a
/// user-defined reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    /// A primitive ABI type name, used as-is (`uint256`, `bool`, ...).
    Elementary(String),
    /// A reference to another contract definition by name. Resolves to
    /// `address`.
    UserDefined(String),
    /// An array of a base type, fixed-length when `len` is present.
    Array { base: Box<TypeRef>, len: Option<String> },
}

/// A constructor parameter type resolved to its ABI form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedType {
    /// The canonical ABI type string.
    pub abi: String,
    /// For user-defined resolutions: whether the referenced contract declares
    /// a payable fallback. Informational for downstream tooling; it does not
    /// change the encoding.
    pub payable: bool,
}

impl std::fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.abi)
    }
}

/// Returns true iff the contract declares an unnamed, payable function
/// (a fallback/receive).
pub fn has_payable_fallback(contract: &ContractDefinition) -> bool {
    contract.parts.iter().any(|part| match part {
        ContractPart::FunctionDefinition(func) => {
            is_unnamed_function(func) && is_payable(func)
        }
        _ => false,
    })
}

fn is_unnamed_function(func: &FunctionDefinition) -> bool {
    match func.ty {
        FunctionTy::Fallback | FunctionTy::Receive => true,
        // old-style `function() payable` fallbacks
        FunctionTy::Function => func.name.is_none(),
        _ => false,
    }
}

fn is_payable(func: &FunctionDefinition) -> bool {
    func.attributes
        .iter()
        .any(|attr| matches!(attr, FunctionAttribute::Mutability(Mutability::Payable(_))))
}

/// Selects exactly one contract definition to verify.
///
/// Interfaces, libraries and abstract contracts are not candidates. A single
/// candidate is selected regardless of `explicit_name`; several candidates
/// require `explicit_name` to disambiguate.
pub fn select_contract<'a>(
    unit: &'a SourceUnit,
    explicit_name: Option<&str>,
) -> Result<&'a ContractDefinition, VerifyError> {
    let candidates: Vec<_> = unit
        .0
        .iter()
        .filter_map(|part| match part {
            SourceUnitPart::ContractDefinition(def)
                if matches!(def.ty, ContractTy::Contract(_)) =>
            {
                Some(def.as_ref())
            }
            _ => None,
        })
        .collect();

    match candidates.len() {
        0 => Err(VerifyError::NoContractFound),
        1 => Ok(candidates[0]),
        _ => {
            let name = explicit_name.ok_or(VerifyError::AmbiguousContract)?;
            candidates
                .into_iter()
                .find(|def| def.name.as_ref().is_some_and(|id| id.name == name))
                .ok_or_else(|| VerifyError::ContractNotFound(name.to_string()))
        }
    }
}

/// Resolves the selected contract's constructor parameter list into ABI type
/// strings, in declaration order.
///
/// Returns an empty sequence when the contract has no constructor or the
/// constructor takes no parameters. User-defined type names resolve to
/// `address`, annotated payable iff the referenced contract has a payable
/// fallback. A name with no matching definition in the tree still resolves to
/// `address` (tolerance for external interface references) but is logged.
pub fn resolve_constructor_types(
    unit: &SourceUnit,
    contract: &ContractDefinition,
) -> Result<Vec<ResolvedType>, VerifyError> {
    let Some(constructor) = find_constructor(contract) else {
        return Ok(Vec::new());
    };

    let mut resolved = Vec::with_capacity(constructor.params.len());
    for (_, param) in &constructor.params {
        let param = param
            .as_ref()
            .ok_or_else(|| VerifyError::Parse("malformed constructor parameter".to_string()))?;
        let type_ref = lower_type(&param.ty)?;
        resolved.push(resolve_type_ref(unit, &type_ref)?);
    }
    Ok(resolved)
}

fn find_constructor(contract: &ContractDefinition) -> Option<&FunctionDefinition> {
    contract.parts.iter().find_map(|part| match part {
        ContractPart::FunctionDefinition(func)
            if matches!(func.ty, FunctionTy::Constructor) =>
        {
            Some(func.as_ref())
        }
        _ => None,
    })
}

/// Lowers a parse-tree type expression into a [TypeRef].
pub fn lower_type(expr: &Expression) -> Result<TypeRef, VerifyError> {
    match expr {
        Expression::Type(_, ty) => Ok(TypeRef::Elementary(elementary_name(ty)?)),
        Expression::Variable(id) => Ok(TypeRef::UserDefined(id.name.clone())),
        Expression::ArraySubscript(_, base, len) => {
            let base = lower_type(base)?;
            if matches!(base, TypeRef::Array { .. }) {
                return Err(VerifyError::UnsupportedType("nested array".to_string()));
            }
            let len = match len.as_deref() {
                None => None,
                Some(Expression::NumberLiteral(_, value, _, _)) => Some(value.clone()),
                Some(other) => {
                    return Err(VerifyError::UnsupportedType(format!(
                        "non-literal array length `{other:?}`"
                    )))
                }
            };
            Ok(TypeRef::Array { base: Box::new(base), len })
        }
        // qualified names (`Lib.T`); the tree lookup will not find these and
        // they fall into the external-reference tolerance path
        Expression::MemberAccess(_, base, member) => {
            let base = lower_type(base)?;
            match base {
                TypeRef::UserDefined(name) => {
                    Ok(TypeRef::UserDefined(format!("{name}.{}", member.name)))
                }
                _ => Err(VerifyError::UnsupportedType(format!("{expr:?}"))),
            }
        }
        other => Err(VerifyError::UnsupportedType(format!("{other:?}"))),
    }
}

fn elementary_name(ty: &Type) -> Result<String, VerifyError> {
    let name = match ty {
        Type::Address | Type::AddressPayable | Type::Payable => "address".to_string(),
        Type::Bool => "bool".to_string(),
        Type::String => "string".to_string(),
        Type::DynamicBytes => "bytes".to_string(),
        Type::Bytes(size) => format!("bytes{size}"),
        Type::Int(bits) => format!("int{bits}"),
        Type::Uint(bits) => format!("uint{bits}"),
        other => return Err(VerifyError::UnsupportedType(format!("{other:?}"))),
    };
    Ok(name)
}

fn resolve_type_ref(unit: &SourceUnit, type_ref: &TypeRef) -> Result<ResolvedType, VerifyError> {
    match type_ref {
        TypeRef::Elementary(name) => Ok(ResolvedType { abi: name.clone(), payable: false }),
        TypeRef::UserDefined(name) => match find_definition(unit, name) {
            Some(def) => Ok(ResolvedType {
                abi: "address".to_string(),
                payable: has_payable_fallback(def),
            }),
            None => {
                warn!(
                    name,
                    "no contract definition found for constructor parameter type; \
                     assuming an external reference and encoding as `address`"
                );
                Ok(ResolvedType { abi: "address".to_string(), payable: false })
            }
        },
        TypeRef::Array { base, len } => {
            let base = resolve_type_ref(unit, base)?;
            let abi = match len {
                Some(len) => format!("{}[{len}]", base.abi),
                None => format!("{}[]", base.abi),
            };
            Ok(ResolvedType { abi, payable: base.payable })
        }
    }
}

/// Looks up any top-level definition (contract, interface or library) by name.
/// Unlike [select_contract], the lookup is not restricted to plain contracts.
fn find_definition<'a>(unit: &'a SourceUnit, name: &str) -> Option<&'a ContractDefinition> {
    unit.0.iter().find_map(|part| match part {
        SourceUnitPart::ContractDefinition(def)
            if def.name.as_ref().is_some_and(|id| id.name == name) =>
        {
            Some(def.as_ref())
        }
        _ => None,
    })
}
