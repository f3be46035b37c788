//! Type references.
//!
//! ```text
//! TypeRef    ::= BaseType ("[" "]")?
//! BaseType   ::= Primitive "?"? | "string" | QualifiedName | "(" TypeRef ")"
//! ```
//!
//! Primitive names are tried before `string`, and qualified names are the
//! fallback. Only one rank-1 array marker is accepted.

use deftype_foundation::Result;

use super::{Parser, Production, is_reserved};
use crate::names::TypeName;
use crate::token::TokenKind;
use crate::types::{Primitive, TypeRef, is_string_name};

impl Parser<'_> {
    /// Parses a type reference, including a trailing `[]`.
    ///
    /// Wrapping parentheses are counted, not recursed into.
    pub(super) fn parse_type_ref(&mut self) -> Result<TypeRef> {
        let mut depth = 0usize;
        while self.at(&TokenKind::LParen) {
            self.advance();
            depth += 1;
        }

        let mut ty = self.parse_base_type()?;
        ty = self.parse_array_suffix(ty)?;
        for _ in 0..depth {
            self.expect(&TokenKind::RParen, Production::TypeRef)?;
            ty = self.parse_array_suffix(ty)?;
        }
        Ok(ty)
    }

    /// Parses an optional `[]` after `base`.
    fn parse_array_suffix(&mut self, base: TypeRef) -> Result<TypeRef> {
        if !self.at(&TokenKind::LBracket) {
            return Ok(base);
        }
        if base.is_array() {
            return Err(self.error(Production::ArrayRank, "arrays of arrays are not supported"));
        }
        self.advance();
        match self.current.kind {
            TokenKind::RBracket => {
                self.advance();
            }
            TokenKind::Comma => {
                return Err(self.error(
                    Production::ArrayRank,
                    "multi-dimensional arrays are not supported",
                ));
            }
            _ => return Err(self.unexpected(Production::ArrayRank, "']'")),
        }
        if self.at(&TokenKind::LBracket) {
            return Err(self.error(Production::ArrayRank, "arrays of arrays are not supported"));
        }
        Ok(TypeRef::array(base))
    }

    /// Parses a non-array type.
    fn parse_base_type(&mut self) -> Result<TypeRef> {
        let Some(name) = self.current.as_ident() else {
            return Err(self.unexpected(Production::TypeRef, "a type"));
        };
        if is_reserved(name) {
            return Err(self.error(
                Production::TypeRef,
                &format!("reserved word '{name}' cannot be used as a type"),
            ));
        }

        let ty = if let Some(primitive) = Primitive::from_name(name) {
            self.advance();
            if self.at(&TokenKind::Question) {
                self.advance();
                TypeRef::Nullable(primitive)
            } else {
                TypeRef::Simple(primitive)
            }
        } else if is_string_name(name) {
            self.advance();
            TypeRef::String
        } else {
            let named = TypeName::parse(name);
            self.advance();
            TypeRef::Named(named)
        };

        if self.at(&TokenKind::Question) {
            let message = match ty {
                TypeRef::Nullable(_) => "nullable types cannot be nested",
                _ => "'?' applies only to primitive value types",
            };
            return Err(self.error(Production::TypeRef, message));
        }
        Ok(ty)
    }
}
