//! Namespaces, declarations, and conventions.
//!
//! Every form is parenthesized and starts with a case-sensitive symbol.
//! Callers consume the opening `(` and pass its span along; every
//! `parse_*_body` function ends after the matching `)`.

use std::iter::Peekable;

use deftype_foundation::Result;
use tracing::trace;

use super::{Parser, Production};
use crate::ast::{
    ApplicationServiceDecl, BaseTypes, CommandDecl, ConventionsDecl, DeclKind, DomainEventDecl,
    DtoDecl, EnumDecl, Namespace, PropertyDecl, TypeDecl, ValueTypeDecl,
};
use crate::names::{NamespaceName, TypeName};
use crate::span::Span;
use crate::token::TokenKind;

impl Parser<'_> {
    // =========================================================================
    // Conventions
    // =========================================================================

    /// Parses `defconventions :group { inherit [...] } ... )`.
    pub(super) fn parse_conventions_body(&mut self, open: Span) -> Result<ConventionsDecl> {
        self.expect_symbol("defconventions", Production::Conventions)?;
        let mut conventions = ConventionsDecl::default();

        while let TokenKind::Keyword(group) = &self.current.kind {
            let slot = match group.as_str() {
                "domainevents" => &mut conventions.domain_events,
                "commands" => &mut conventions.commands,
                _ => {
                    return Err(self.unexpected(
                        Production::ConventionGroup,
                        "':domainevents' or ':commands'",
                    ));
                }
            };
            if slot.is_some() {
                return Err(self.error(
                    Production::ConventionGroup,
                    &format!("convention group ':{group}' specified more than once"),
                ));
            }
            self.advance();
            *slot = Some(self.parse_inherit_block()?);
        }

        let close = self.expect(&TokenKind::RParen, Production::Conventions)?;
        conventions.span = open.to(close);
        Ok(conventions)
    }

    /// Parses `{ inherit [TypeName*] }`.
    fn parse_inherit_block(&mut self) -> Result<BaseTypes> {
        self.expect(&TokenKind::LBrace, Production::ConventionGroup)?;
        self.expect_symbol("inherit", Production::ConventionGroup)?;
        self.expect(&TokenKind::LBracket, Production::ConventionGroup)?;

        let mut types = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            let (name, _) = self.expect_qualified_name(Production::QualifiedName)?;
            types.push(TypeName::parse(&name));
        }
        self.advance();

        self.expect(&TokenKind::RBrace, Production::ConventionGroup)?;
        Ok(BaseTypes::new(types))
    }

    // =========================================================================
    // Namespaces
    // =========================================================================

    /// Parses `namespace Name TypeDeclaration* )`.
    pub(super) fn parse_namespace_body(&mut self, open: Span) -> Result<Namespace> {
        self.expect_symbol("namespace", Production::Namespace)?;
        let (name, _) = self.expect_qualified_name(Production::Namespace)?;

        let mut declarations = Vec::new();
        while self.at(&TokenKind::LParen) {
            declarations.push(self.parse_type_declaration()?);
        }

        let close = self.expect(&TokenKind::RParen, Production::Namespace)?;
        trace!(
            namespace = %name,
            declarations = declarations.len(),
            "parsed namespace"
        );
        Ok(Namespace {
            name: NamespaceName::parse(&name),
            declarations,
            span: open.to(close),
        })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    /// Parses any parenthesized type declaration.
    pub(super) fn parse_type_declaration(&mut self) -> Result<TypeDecl> {
        let open = self.expect(&TokenKind::LParen, Production::TypeDeclaration)?;
        let Some(kind) = self.current.as_ident().and_then(DeclKind::from_keyword) else {
            return Err(self.unexpected(Production::TypeDeclaration, "a declaration symbol"));
        };
        self.advance();

        let decl = match kind {
            DeclKind::ValueType => TypeDecl::ValueType(self.parse_value_type_body(open)?),
            DeclKind::Command => TypeDecl::Command(self.parse_command_body(open)?),
            DeclKind::DomainEvent => {
                let (name, properties, span) =
                    self.parse_record_body(open, Production::DomainEvent)?;
                TypeDecl::DomainEvent(DomainEventDecl {
                    name,
                    properties,
                    span,
                })
            }
            DeclKind::Dto => {
                let (name, properties, span) = self.parse_record_body(open, Production::Dto)?;
                TypeDecl::Dto(DtoDecl {
                    name,
                    properties,
                    span,
                })
            }
            DeclKind::Enum => TypeDecl::Enum(self.parse_enum_body(open)?),
            DeclKind::ApplicationService => {
                TypeDecl::ApplicationService(self.parse_service_body(open)?)
            }
        };
        trace!(kind = kind.keyword(), name = decl.name(), "parsed declaration");
        Ok(decl)
    }

    /// Parses the rest of `(defvaluetype Name ...)`.
    ///
    /// A `(` after the name selects the explicit property list; anything else
    /// is the shorthand form with an optional type.
    fn parse_value_type_body(&mut self, open: Span) -> Result<ValueTypeDecl> {
        let (name, name_span) = self.expect_qualified_name(Production::ValueType)?;

        let properties = match self.current.kind {
            TokenKind::RParen => vec![PropertyDecl::implicit(None, name_span)],
            TokenKind::LParen if !self.paren_wraps_type() => self.parse_property_list()?,
            _ => {
                let start = self.current.span;
                let ty = self.parse_type_ref()?;
                vec![PropertyDecl::implicit(Some(ty), start)]
            }
        };

        let close = self.expect(&TokenKind::RParen, Production::ValueType)?;
        Ok(ValueTypeDecl {
            name,
            properties,
            span: open.to(close),
        })
    }

    /// Parses the rest of `(defcommand Name (PropertyList)?)`.
    fn parse_command_body(&mut self, open: Span) -> Result<CommandDecl> {
        let (name, properties, span) = self.parse_record_body(open, Production::Command)?;
        Ok(CommandDecl {
            name,
            properties,
            span,
        })
    }

    /// Parses `Name (PropertyList)? )` shared by commands, events, and DTOs.
    fn parse_record_body(
        &mut self,
        open: Span,
        production: Production,
    ) -> Result<(String, Vec<PropertyDecl>, Span)> {
        let (name, _) = self.expect_qualified_name(production)?;
        let properties = if self.at(&TokenKind::LParen) {
            self.parse_property_list()?
        } else {
            Vec::new()
        };
        let close = self.expect(&TokenKind::RParen, production)?;
        Ok((name, properties, open.to(close)))
    }

    /// Parses the rest of `(defenum Name [A B C])`.
    fn parse_enum_body(&mut self, open: Span) -> Result<EnumDecl> {
        let (name, _) = self.expect_qualified_name(Production::Enum)?;
        self.expect(&TokenKind::LBracket, Production::Enum)?;

        let mut values = Vec::new();
        while !self.at(&TokenKind::RBracket) {
            let (value, _) = self.expect_identifier(Production::Enum)?;
            values.push(value);
        }
        self.advance();

        let close = self.expect(&TokenKind::RParen, Production::Enum)?;
        Ok(EnumDecl {
            name,
            values,
            span: open.to(close),
        })
    }

    /// Parses the rest of `(defapplicationservice Name (defcommand ...)+)`.
    fn parse_service_body(&mut self, open: Span) -> Result<ApplicationServiceDecl> {
        let (name, _) = self.expect_qualified_name(Production::ApplicationService)?;

        let mut commands = Vec::new();
        while self.at(&TokenKind::LParen) {
            let command_open = self.current.span;
            self.advance();
            self.expect_symbol("defcommand", Production::Command)?;
            commands.push(self.parse_command_body(command_open)?);
        }
        if commands.is_empty() {
            return Err(self.error(
                Production::ApplicationService,
                "an application service requires at least one defcommand",
            ));
        }

        let close = self.expect(&TokenKind::RParen, Production::ApplicationService)?;
        Ok(ApplicationServiceDecl {
            name,
            commands,
            span: open.to(close),
        })
    }

    // =========================================================================
    // Property lists
    // =========================================================================

    /// Parses `( TypeRef Identifier ("," TypeRef Identifier)* )`, possibly empty.
    fn parse_property_list(&mut self) -> Result<Vec<PropertyDecl>> {
        self.expect(&TokenKind::LParen, Production::PropertyList)?;

        let mut properties = Vec::new();
        if self.at(&TokenKind::RParen) {
            self.advance();
            return Ok(properties);
        }

        loop {
            let start = self.current.span;
            let ty = self.parse_type_ref()?;
            let (name, name_span) = self.expect_identifier(Production::PropertyList)?;
            properties.push(PropertyDecl::new(name, ty, start.to(name_span)));

            match self.current.kind {
                TokenKind::Comma => self.advance(),
                TokenKind::RParen => break,
                _ => return Err(self.unexpected(Production::PropertyList, "',' or ')'")),
            }
        }
        self.advance();
        Ok(properties)
    }

    /// Returns true if the `(` at the cursor wraps a single type, as in
    /// `(defvaluetype Id (Billing.Money))`, rather than opening a list.
    fn paren_wraps_type(&self) -> bool {
        let mut lexer = self.lexer.clone();
        let mut tokens = std::iter::from_fn(move || {
            loop {
                let token = lexer.next_token();
                if !token.kind.is_trivia() {
                    return Some(token.kind);
                }
            }
        })
        .peekable();
        skip_type_shape(&mut tokens) && tokens.next() == Some(TokenKind::RParen)
    }
}

/// Consumes the tokens of one type reference, returning false if they do
/// not form one.
fn skip_type_shape<I: Iterator<Item = TokenKind>>(tokens: &mut Peekable<I>) -> bool {
    let mut depth = 0usize;
    while tokens.next_if_eq(&TokenKind::LParen).is_some() {
        depth += 1;
    }
    if !matches!(tokens.next(), Some(TokenKind::Ident(_))) {
        return false;
    }
    tokens.next_if_eq(&TokenKind::Question);
    if !skip_array_marker(tokens) {
        return false;
    }
    (0..depth).all(|_| tokens.next() == Some(TokenKind::RParen) && skip_array_marker(tokens))
}

/// Consumes an optional `[]`.
fn skip_array_marker<I: Iterator<Item = TokenKind>>(tokens: &mut Peekable<I>) -> bool {
    tokens.next_if_eq(&TokenKind::LBracket).is_none() || tokens.next() == Some(TokenKind::RBracket)
}
