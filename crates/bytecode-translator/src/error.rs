// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors raised while translating the object model.
///
/// Everything except `UnclassifiableType` is contained at the method boundary: the method
/// stays declared without an implementation and translation continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("{0}")]
    Translation(String),

    #[error("expected {expected} translated expression(s), found {found}")]
    MalformedExpression { expected: usize, found: usize },

    #[error("cannot translate custom attribute argument: {0}")]
    UnsupportedAttributeArgument(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),

    #[error("unknown kind of type definition `{name}`")]
    UnclassifiableType { name: String },
}

pub type TranslationResult<T> = Result<T, TranslationError>;
