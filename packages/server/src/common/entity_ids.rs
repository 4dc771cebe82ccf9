//! Typed ID definitions for all domain entities.
//!
//! This module defines type aliases for each domain entity, providing
//! compile-time type safety for ID usage throughout the application.

// Re-export the core Id type and version markers
pub use super::id::{Id, V7};

// ============================================================================
// Entity marker types
// ============================================================================

/// Marker type for Lead entities (provider leads sourced from the registry).
pub struct Lead;

// ============================================================================
// Type aliases - the primary API
// ============================================================================

/// Typed ID for Lead entities.
pub type LeadId = Id<Lead>;
