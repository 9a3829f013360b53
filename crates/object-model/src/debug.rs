// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Debug symbols: an optional per-unit side table mapping sequence points to source lines

use crate::ids::MethodId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Default)]
pub struct DebugSymbols {
    locations: BTreeMap<(MethodId, u32), SourceLocation>,
}

impl DebugSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, method: MethodId, offset: u32, location: SourceLocation) {
        self.locations.insert((method, offset), location);
    }

    pub fn location(&self, method: MethodId, offset: u32) -> Option<&SourceLocation> {
        self.locations.get(&(method, offset))
    }
}
