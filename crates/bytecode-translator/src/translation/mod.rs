// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Default expression and statement translators

pub mod expression_translator;
pub mod statement_translator;

pub use expression_translator::ExpressionTranslator;
pub use statement_translator::StatementTranslator;
