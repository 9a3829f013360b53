// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use anyhow::Context;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How instance fields are mapped onto Boogie storage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeapRepresentation {
    /// One `[Ref]T` map per field
    SplitFields,
    /// `$Heap: [Ref][Field]int`
    TwoDInt,
    /// `$Heap: [Ref][Field]Box`
    TwoDBox,
    #[default]
    General,
}

/// How much of the exceptional control flow is modeled
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum ExceptionModel {
    None,
    /// Only explicitly thrown exceptions
    Explicit,
    #[default]
    Conservative,
}

impl ExceptionModel {
    pub fn is_modeled(self) -> bool {
        self > ExceptionModel::None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeInfoLevel {
    #[default]
    Minimal,
    /// Also emit `$Subtype` facts for every base type
    WithSubtyping,
}

/// What is emitted before an object is dereferenced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DereferenceCheck {
    /// `assert o != null;`
    Assert,
    /// `assume o != null;`
    #[default]
    Assume,
    None,
}

/// Translation options.
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[clap(next_help_heading = "Translation Options")]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorOptions {
    /// Heap representation to use
    #[clap(long = "heap", value_enum, default_value_t = HeapRepresentation::General)]
    pub heap_representation: HeapRepresentation,

    /// Model exceptional control flow
    #[clap(long = "model-exceptions", value_enum, default_value_t = ExceptionModel::Conservative)]
    pub model_exceptions: ExceptionModel,

    /// Model type information
    #[clap(long = "type-info", value_enum, default_value_t = TypeInfoLevel::Minimal)]
    pub type_info: TypeInfoLevel,

    /// Full names of the types on the exemption list
    #[clap(long = "exempt", value_delimiter = ',')]
    pub exempt_types: Vec<String>,

    /// Treat the exemption list as a white list: only listed types are translated
    #[clap(long = "exemption-whitelist")]
    pub exemption_is_whitelist: bool,

    /// Null check emitted before every dereference
    #[clap(long = "dereference", value_enum, default_value_t = DereferenceCheck::Assume)]
    pub dereference: DereferenceCheck,

    /// Record a model state after every statement
    #[clap(long = "capture-state")]
    pub capture_state: bool,

    /// Mark the start of every branch with a unique number
    #[clap(long = "instrument-branches")]
    pub instrument_branches: bool,

    /// Add free postconditions stating that allocation only grows
    #[clap(long = "monotonic-heap")]
    pub monotonic_heap: bool,
}

impl TranslatorOptions {
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("invalid translator options")
    }

    /// Applies the exemption list to a type's full name. An empty list exempts nothing.
    pub fn should_translate(&self, full_name: &str) -> bool {
        if self.exempt_types.is_empty() {
            return true;
        }
        let listed = self.exempt_types.iter().any(|t| t == full_name);
        listed == self.exemption_is_whitelist
    }
}
