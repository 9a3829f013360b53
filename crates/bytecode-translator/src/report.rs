// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use crate::error::TranslationError;
use crate::method_translator::MethodOutcome;
use object_model::{MethodId, ObjectModel};
use std::fmt;

/// A method whose translation failed; it stays declared without an implementation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodFailure {
    pub method: MethodId,
    pub signature: String,
    pub error: TranslationError,
}

/// Per-method outcomes of a run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationReport {
    pub implemented: Vec<MethodId>,
    pub declared_only: Vec<MethodId>,
    pub skipped: Vec<MethodId>,
    pub failures: Vec<MethodFailure>,
    /// Implemented methods whose custom attributes could not be translated
    pub attributes_skipped: Vec<MethodId>,
}

impl TranslationReport {
    pub fn record(&mut self, env: &ObjectModel, method: MethodId, outcome: &MethodOutcome) {
        match outcome {
            MethodOutcome::Skipped => self.skipped.push(method),
            MethodOutcome::DeclaredOnly => self.declared_only.push(method),
            MethodOutcome::Implemented {
                attributes_skipped, ..
            } => {
                self.implemented.push(method);
                if *attributes_skipped {
                    self.attributes_skipped.push(method);
                }
            }
            MethodOutcome::Failed(error) => self.failures.push(MethodFailure {
                method,
                signature: env.method_signature(method),
                error: error.clone(),
            }),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

impl fmt::Display for TranslationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} implemented, {} declared only, {} skipped, {} failed",
            self.implemented.len(),
            self.declared_only.len(),
            self.skipped.len(),
            self.failures.len()
        )?;
        for failure in &self.failures {
            writeln!(f, "  {}: {}", failure.signature, failure.error)?;
        }
        Ok(())
    }
}
