// cloud-gate-core/src/runtime/gate.rs
// ============================================================================
// Module: Feature Gate
// Description: Module-level on/off flags applied before validation.
// Purpose: Hide and refuse operations whose module is disabled.
// Dependencies: crate::core, crate::runtime::registry, serde
// ============================================================================

//! ## Overview
//! Operations gate on and off as whole modules. Flags come from configuration
//! and are fixed for the process lifetime. A module with no flag entry is
//! enabled: new modules ship visible by default, and a stale configuration
//! never hides freshly added operations.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::ModuleTag;
use crate::runtime::registry::OperationDescriptor;

// ============================================================================
// SECTION: Module Flags
// ============================================================================

/// Per-module enablement flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleFlags(BTreeMap<ModuleTag, bool>);

impl ModuleFlags {
    /// Creates an empty flag set; every module is enabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag for one module.
    pub fn set(&mut self, module: impl Into<ModuleTag>, enabled: bool) {
        self.0.insert(module.into(), enabled);
    }

    /// Returns whether a module is enabled. Absent entries are enabled.
    #[must_use]
    pub fn is_enabled(&self, module: &ModuleTag) -> bool {
        self.0.get(module).copied().unwrap_or(true)
    }

    /// Iterates over explicitly flagged modules.
    pub fn iter(&self) -> impl Iterator<Item = (&ModuleTag, bool)> {
        self.0.iter().map(|(module, enabled)| (module, *enabled))
    }
}

impl FromIterator<(ModuleTag, bool)> for ModuleFlags {
    fn from_iter<I: IntoIterator<Item = (ModuleTag, bool)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

// ============================================================================
// SECTION: Feature Gate
// ============================================================================

/// Applies module flags to operations.
#[derive(Debug, Clone, Default)]
pub struct FeatureGate {
    /// Configured module flags.
    flags: ModuleFlags,
}

impl FeatureGate {
    /// Creates a gate over the given flags.
    #[must_use]
    pub fn new(flags: ModuleFlags) -> Self {
        Self {
            flags,
        }
    }

    /// Returns whether an operation's module is enabled.
    #[must_use]
    pub fn is_enabled(&self, module: &ModuleTag) -> bool {
        self.flags.is_enabled(module)
    }

    /// Filters descriptors down to those whose module is enabled. Listing and
    /// dispatch use the same predicate, so a hidden operation is also
    /// uninvokable.
    pub fn filter_callable<'a, I>(
        &'a self,
        descriptors: I,
    ) -> impl Iterator<Item = &'a OperationDescriptor>
    where
        I: Iterator<Item = &'a OperationDescriptor> + 'a,
    {
        descriptors.filter(move |descriptor| self.is_enabled(&descriptor.module))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
