// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Bytecode Translator
//!
//! Translates a resolved object model into a Boogie program. The `MetadataTraverser` walks
//! units, types and members top-down; types are classified by kind, the implicit behavior of
//! the source language (static initialization, struct default and copy construction) is
//! synthesized as explicit procedures, and every method becomes a procedure with its
//! contract and, when it has a body, an implementation.
//!
//! All lookups from source entities to their Boogie counterparts go through the single
//! `Sink` of a run.

pub mod attributes;
pub mod contract_translator;
pub mod ctor_analysis;
pub mod error;
pub mod heap;
pub mod metadata_traverser;
pub mod method_translator;
pub mod naming;
pub mod options;
pub mod report;
pub mod sink;
pub mod stubs;
pub mod synthesis;
pub mod translation;

pub use error::{TranslationError, TranslationResult};
pub use metadata_traverser::{MetadataTraverser, TypeFrame};
pub use method_translator::{MethodOutcome, MethodTranslator};
pub use options::{
    DereferenceCheck, ExceptionModel, HeapRepresentation, TranslatorOptions, TypeInfoLevel,
};
pub use report::{MethodFailure, TranslationReport};
pub use sink::Sink;

use anyhow::Context;
use boogie_ir::Program;
use log::{info, warn};
use object_model::{DebugSymbols, ObjectModel, UnitId};
use std::collections::BTreeMap;

/// Result of a translation run
#[derive(Debug)]
pub struct Translation {
    pub program: Program,
    pub report: TranslationReport,
}

/// Translates `units` of `env` in order.
///
/// Methods that cannot be translated are listed in the report and stay declared without an
/// implementation; an unclassifiable type aborts the run.
pub fn translate_units(
    env: &ObjectModel,
    units: &[UnitId],
    debug_symbols: &BTreeMap<UnitId, DebugSymbols>,
    options: TranslatorOptions,
) -> anyhow::Result<Translation> {
    let mut sink = Sink::new(env, options);
    let report = {
        let mut traverser = MetadataTraverser::new(&mut sink, debug_symbols);
        traverser
            .translate_assemblies(units)
            .context("translation aborted")?;
        traverser.into_report()
    };
    if report.has_failures() {
        warn!("{} method(s) could not be translated", report.failures.len());
    }
    info!("translation finished: {}", report.to_string().trim_end());
    Ok(Translation {
        program: sink.into_program(),
        report,
    })
}
