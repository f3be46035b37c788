//! Effective conventions for one compilation.
//!
//! A base convention (usually empty) is overridden by the `defconventions`
//! declaration at the root of the tree, if there is one.

use std::borrow::Cow;

use deftype_language::{AbstractSyntaxTree, ConventionsDecl};
use tracing::debug;

/// Resolves the conventions every declaration in `ast` is generated with.
///
/// Without a `defconventions` declaration the result borrows `base`.
#[must_use]
pub fn resolve_conventions<'a>(
    base: &'a ConventionsDecl,
    ast: &AbstractSyntaxTree,
) -> Cow<'a, ConventionsDecl> {
    let resolved = base.apply_overrides_from(ast.conventions.as_ref());
    debug!(
        overridden = matches!(resolved, Cow::Owned(_)),
        domain_events = resolved.domain_event_base_types().len(),
        commands = resolved.command_base_types().len(),
        "resolved conventions"
    );
    resolved
}
