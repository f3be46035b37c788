//! Pretty-printer for deftype source.
//!
//! Converts a syntax tree back into canonical DSL text. Parsing the output
//! yields the same tree apart from source spans.
//!
//! # Example
//!
//! ```
//! use deftype_language::{parse, pretty::pretty_print};
//!
//! let ast = parse("(namespace Test (defvaluetype  EmployeeNumber   int))").unwrap();
//! assert_eq!(
//!     pretty_print(&ast),
//!     "(namespace Test\n  (defvaluetype EmployeeNumber int))\n"
//! );
//! ```

use std::fmt::Write;

use crate::ast::{
    AbstractSyntaxTree, BaseTypes, CommandDecl, ConventionsDecl, Namespace, PropertyDecl, TypeDecl,
};

/// Configuration for pretty-printing.
#[derive(Debug, Clone)]
pub struct PrettyConfig {
    /// Number of spaces for each indentation level.
    pub indent_width: usize,
    /// Name printed for a property whose name is absent outside the
    /// shorthand value-type form.
    pub default_property_name: String,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            default_property_name: "Value".to_string(),
        }
    }
}

/// Pretty-prints a compilation unit.
#[must_use]
pub fn pretty_print(ast: &AbstractSyntaxTree) -> String {
    pretty_print_with_config(ast, &PrettyConfig::default())
}

/// Pretty-prints a compilation unit with custom configuration.
#[must_use]
pub fn pretty_print_with_config(ast: &AbstractSyntaxTree, config: &PrettyConfig) -> String {
    let mut printer = PrettyPrinter::new(config);
    printer.print_unit(ast);
    printer.output
}

/// Pretty-prints a single declaration at the top level.
#[must_use]
pub fn pretty_print_declaration(decl: &TypeDecl) -> String {
    let config = PrettyConfig::default();
    let mut printer = PrettyPrinter::new(&config);
    printer.print_declaration(decl, 0);
    printer.output
}

struct PrettyPrinter<'a> {
    config: &'a PrettyConfig,
    output: String,
}

impl<'a> PrettyPrinter<'a> {
    fn new(config: &'a PrettyConfig) -> Self {
        Self {
            config,
            output: String::new(),
        }
    }

    fn indent(&mut self, depth: usize) {
        self.output.push('\n');
        for _ in 0..depth * self.config.indent_width {
            self.output.push(' ');
        }
    }

    fn print_unit(&mut self, ast: &AbstractSyntaxTree) {
        let mut first = true;
        if let Some(conventions) = &ast.conventions {
            self.print_conventions(conventions);
            self.output.push('\n');
            first = false;
        }
        for ns in &ast.namespaces {
            if !first {
                self.output.push('\n');
            }
            self.print_namespace(ns);
            self.output.push('\n');
            first = false;
        }
    }

    fn print_conventions(&mut self, conventions: &ConventionsDecl) {
        self.output.push_str("(defconventions");
        for (group, base_types) in [
            ("domainevents", &conventions.domain_events),
            ("commands", &conventions.commands),
        ] {
            if let Some(base_types) = base_types {
                self.indent(1);
                let _ = write!(self.output, ":{group} {{ inherit [");
                self.print_base_types(base_types);
                self.output.push_str("] }");
            }
        }
        self.output.push(')');
    }

    fn print_base_types(&mut self, base_types: &BaseTypes) {
        for (i, name) in base_types.types.iter().enumerate() {
            if i > 0 {
                self.output.push(' ');
            }
            let _ = write!(self.output, "{name}");
        }
    }

    fn print_namespace(&mut self, ns: &Namespace) {
        let _ = write!(self.output, "(namespace {}", ns.name);
        for decl in &ns.declarations {
            self.indent(1);
            self.print_declaration(decl, 1);
        }
        self.output.push(')');
    }

    fn print_declaration(&mut self, decl: &TypeDecl, depth: usize) {
        let _ = write!(self.output, "({} {}", decl.kind().keyword(), decl.name());
        match decl {
            TypeDecl::ValueType(d) => match d.properties.as_slice() {
                [
                    PropertyDecl {
                        name: None,
                        ty: shorthand,
                        ..
                    },
                ] => {
                    if let Some(ty) = shorthand {
                        let _ = write!(self.output, " {ty}");
                    }
                }
                properties => self.print_property_list(properties),
            },
            TypeDecl::Command(d) => self.print_command_properties(d),
            TypeDecl::DomainEvent(d) => self.print_property_list(&d.properties),
            TypeDecl::Dto(d) => self.print_property_list(&d.properties),
            TypeDecl::Enum(d) => {
                self.output.push_str(" [");
                self.output.push_str(&d.values.join(" "));
                self.output.push(']');
            }
            TypeDecl::ApplicationService(d) => {
                for command in &d.commands {
                    self.indent(depth + 1);
                    let _ = write!(self.output, "(defcommand {}", command.name);
                    self.print_command_properties(command);
                    self.output.push(')');
                }
            }
        }
        self.output.push(')');
    }

    fn print_command_properties(&mut self, command: &CommandDecl) {
        if !command.properties.is_empty() {
            self.print_property_list(&command.properties);
        }
    }

    fn print_property_list(&mut self, properties: &[PropertyDecl]) {
        self.output.push_str(" (");
        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            match &property.ty {
                Some(ty) => {
                    let _ = write!(self.output, "{ty}");
                }
                None => self.output.push_str("int"),
            }
            self.output.push(' ');
            let name = property
                .name
                .as_deref()
                .unwrap_or(&self.config.default_property_name);
            self.output.push_str(name);
        }
        self.output.push(')');
    }
}
