//! Override and implementation consistency.
//!
//! Callers reason about a virtual or interface member through the contract
//! of the declaration they see. An override (or implementation) that
//! documents a kind its base does not cover breaks that reasoning.

use crate::resolver::ContractResolver;
use crate::sink::{Finding, FindingKind, FindingSink};
use crate::error_set::ErrorEntry;
use throwdoc_common::Accessor;
use throwdoc_model::{DeclId, DeclKind, Program};
use tracing::trace;

/// Whether `decl` overrides or implements something and is checked here.
pub fn is_candidate(program: &Program, decl: DeclId) -> bool {
    let declaration = program.decl(decl);
    declaration.is_in_source()
        && declaration.original.is_none()
        && !declaration.kind.is_local_callable()
        && !matches!(declaration.kind, DeclKind::Accessor(_))
        && (declaration.overridden.is_some() || !declaration.implements.is_empty())
}

/// Report every documented kind of `decl` that is not covered by the
/// contract of a base it overrides or implements.
///
/// A base whose contract cannot be known (external and undocumented) is
/// skipped; an undocumented source base has an empty contract.
pub fn check_consistency<S: FindingSink + ?Sized>(
    resolver: &ContractResolver,
    decl: DeclId,
    sink: &mut S,
) {
    let program = resolver.program();
    let declaration = program.decl(decl);
    let own = resolver.documented_errors(decl);
    if own.is_empty() {
        return;
    }

    // Unqualified entries on a single-sided member belong to that side.
    let single_side = if declaration.kind.has_accessors() {
        program.accessor_shape(decl).single_side()
    } else {
        None
    };

    let bases = declaration
        .overridden
        .iter()
        .chain(declaration.implements.iter())
        .map(|&base| program.canonical(base));
    for base in bases {
        let contract = resolver.documented_errors(base);
        if !contract.is_documented() && !program.decl(base).is_in_source() {
            trace!(base = %program.decl(base).doc_id, "base contract unknown");
            continue;
        }
        for entry in own.iter() {
            let side = match (entry.accessor, single_side) {
                (Accessor::None, Some(side)) => side,
                (accessor, _) => accessor,
            };
            let covered = contract
                .iter()
                .any(|general| covers(general, entry, side, program));
            if covered {
                continue;
            }
            sink.report(
                Finding::new(FindingKind::InconsistentOverride, decl, declaration.span)
                    .with_accessor(side)
                    .with_exceptions([entry.ty])
                    .with_source(base, side),
            );
        }
    }
}

/// An unqualified base entry covers every side; a qualified one covers only
/// its own side.
fn covers(general: ErrorEntry, entry: ErrorEntry, side: Accessor, program: &Program) -> bool {
    (general.accessor == side || general.accessor.is_none())
        && program.is_subclass_of(entry.ty, general.ty)
}
