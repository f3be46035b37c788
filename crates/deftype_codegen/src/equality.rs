//! Structural equality and hashing bodies.
//!
//! Every value-semantics type gets the same member set; only the
//! per-property comparison and the null guards vary. These builders
//! return statement trees for the generator to attach.

use deftype_foundation::{Error, Result};
use deftype_language::TypeRef;

use crate::tree::{BinaryOp, ElementComparison, Expr, OperatorKind, Stmt};

/// Name of the `other` parameter of typed equality.
pub const OTHER: &str = "other";
/// Name of the parameter of object equality.
pub const OBJ: &str = "obj";
/// Left operand of the operator pair.
pub const LEFT: &str = "left";
/// Right operand of the operator pair.
pub const RIGHT: &str = "right";

/// A property as the equality builders see it.
#[derive(Clone, Debug, PartialEq)]
pub struct EqualityMember<'a> {
    /// Property name, for diagnostics.
    pub property: &'a str,
    /// Backing field compared and hashed.
    pub field: &'a str,
    /// Resolved member type.
    pub ty: &'a TypeRef,
    /// True if the resolved type is a value type.
    pub is_value_type: bool,
}

/// Builds the comparison of one property between `this` and `other`.
///
/// # Errors
/// Returns `UnsupportedArrayShape` for arrays with more than one rank
/// specifier, more than one dimension, or array elements.
pub fn property_comparison(owner: &str, member: &EqualityMember<'_>) -> Result<Expr> {
    let left = Expr::this_member(member.field);
    let right = Expr::ident(OTHER).member(member.field);
    match member.ty {
        TypeRef::Simple(_) | TypeRef::String | TypeRef::Nullable(_) => {
            Ok(Expr::binary(BinaryOp::Eq, left, right))
        }
        TypeRef::Named(_) => Ok(Expr::NullSafeEquals(Box::new(left), Box::new(right))),
        TypeRef::Array { .. } => {
            let element = member
                .ty
                .single_dimension_element()
                .and_then(element_comparison)
                .ok_or_else(|| {
                    Error::unsupported_array_shape(owner, member.property, member.ty.to_string())
                })?;
            Ok(array_comparison(left, right, element))
        }
    }
}

const fn element_comparison(element: &TypeRef) -> Option<ElementComparison> {
    match element {
        TypeRef::Simple(_) | TypeRef::String | TypeRef::Nullable(_) => Some(ElementComparison::Value),
        TypeRef::Named(_) => Some(ElementComparison::NullSafe),
        TypeRef::Array { .. } => None,
    }
}

/// `(l is null && r is null) || (l not null && r not null && len(l) == len(r) && pairwise(l, r))`
fn array_comparison(left: Expr, right: Expr, element: ElementComparison) -> Expr {
    let both_null = left.clone().is_null().and(right.clone().is_null());
    let lengths = Expr::binary(
        BinaryOp::Eq,
        Expr::Length(Box::new(left.clone())),
        Expr::Length(Box::new(right.clone())),
    );
    let pairwise = Expr::ElementwiseEquals {
        left: Box::new(left.clone()),
        right: Box::new(right.clone()),
        element,
    };
    let both_present = left
        .is_null()
        .not()
        .and(right.is_null().not())
        .and(lengths)
        .and(pairwise);
    both_null.or(both_present)
}

/// Body of `Equals(other: T)`.
///
/// Value types seed the conjunction with `true`; reference types seed it
/// with a null check on `other`.
///
/// # Errors
/// Propagates unsupported array shapes from [`property_comparison`].
pub fn typed_equals_body(
    owner: &str,
    is_value_type: bool,
    members: &[EqualityMember<'_>],
) -> Result<Vec<Stmt>> {
    let seed = if is_value_type {
        Expr::Bool(true)
    } else {
        Expr::ident(OTHER).is_null().not()
    };
    let conjunction = members.iter().try_fold(seed, |acc, member| {
        Ok::<_, Error>(acc.and(property_comparison(owner, member)?))
    })?;
    Ok(vec![Stmt::Return(conjunction)])
}

/// Body of `Equals(obj: object)`.
#[must_use]
pub fn object_equals_body(self_type: &TypeRef) -> Vec<Stmt> {
    let obj = Expr::ident(OBJ);
    let typed = Expr::InvokeEquals {
        target: Box::new(Expr::This),
        arg: Box::new(Expr::Cast(Box::new(obj.clone()), self_type.clone())),
        param_type: self_type.clone(),
    };
    vec![
        Stmt::If {
            condition: obj.clone().is_null(),
            then: vec![Stmt::Return(Expr::Bool(false))],
            otherwise: Vec::new(),
        },
        Stmt::Return(Expr::IsType(Box::new(obj), self_type.clone()).and(typed)),
    ]
}

/// Body of `==` or `!=`.
///
/// Reference types answer from the left operand's null identity before
/// delegating; value types delegate directly.
#[must_use]
pub fn operator_body(kind: OperatorKind, is_value_type: bool, self_type: &TypeRef) -> Vec<Stmt> {
    let negate = |e: Expr| match kind {
        OperatorKind::Equality => e,
        OperatorKind::Inequality => e.not(),
    };
    let delegate = Expr::InvokeEquals {
        target: Box::new(Expr::ident(LEFT)),
        arg: Box::new(Expr::ident(RIGHT)),
        param_type: self_type.clone(),
    };
    if is_value_type {
        return vec![Stmt::Return(negate(delegate))];
    }
    vec![
        Stmt::If {
            condition: Expr::ident(LEFT).is_null(),
            then: vec![Stmt::Return(negate(Expr::ident(RIGHT).is_null()))],
            otherwise: Vec::new(),
        },
        Stmt::Return(negate(delegate)),
    ]
}

/// Body of `GetHashCode()`: the sum of the hash codes of value-typed members.
#[must_use]
pub fn hash_code_body(members: &[EqualityMember<'_>]) -> Vec<Stmt> {
    let sum = members
        .iter()
        .filter(|m| m.is_value_type)
        .map(|m| Expr::HashCode(Box::new(Expr::this_member(m.field))))
        .reduce(|acc, next| Expr::binary(BinaryOp::Add, acc, next))
        .unwrap_or(Expr::Int(0));
    vec![Stmt::Return(sum)]
}
