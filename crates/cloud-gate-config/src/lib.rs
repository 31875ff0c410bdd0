// cloud-gate-config/src/lib.rs
// ============================================================================
// Module: Cloud Gate Config Library
// Description: Canonical configuration model and validation.
// Purpose: Single source of truth for cloud-gate.toml semantics.
// Dependencies: cloud-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `cloud-gate-config` defines the canonical configuration model for Cloud
//! Gate. Configuration inputs are untrusted: parsing rejects unknown keys and
//! validation fails closed, so a typo disables startup rather than silently
//! changing behavior. The one deliberate exception is module flags, which
//! default absent modules to enabled.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
