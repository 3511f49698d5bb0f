#![forbid(unsafe_code)]

//! Runtime mode definitions for Strict (legacy-compatible) and Hardened operation.

use serde::{Deserialize, Serialize};

/// Operational mode governing compatibility/safety trade-offs.
///
/// - **Strict**: permissive numeric handling; non-finite samples flow through
///   the fold arithmetic and malformed catalog fields surface only where a
///   derived accessor actually needs them.
/// - **Hardened**: extra safety layer; rejects non-finite samples before
///   folding and non-finite parses in catalog accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuntimeMode {
    Strict,
    Hardened,
}
