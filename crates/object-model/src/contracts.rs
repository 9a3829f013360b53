// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Method contracts extracted from the program

use crate::code::Expression;

#[derive(Debug, Clone, PartialEq)]
pub struct Precondition {
    pub condition: Expression,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Postcondition {
    pub condition: Expression,
    pub description: Option<String>,
}

/// Requires / ensures / modifies of a single method
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodContract {
    pub preconditions: Vec<Precondition>,
    pub postconditions: Vec<Postcondition>,
    /// Addressable expressions the method may modify
    pub modified_variables: Vec<Expression>,
}

impl MethodContract {
    pub fn requires(mut self, condition: Expression) -> Self {
        self.preconditions.push(Precondition {
            condition,
            description: None,
        });
        self
    }

    pub fn ensures(mut self, condition: Expression) -> Self {
        self.postconditions.push(Postcondition {
            condition,
            description: None,
        });
        self
    }

    pub fn modifies(mut self, target: Expression) -> Self {
        self.modified_variables.push(target);
        self
    }
}
