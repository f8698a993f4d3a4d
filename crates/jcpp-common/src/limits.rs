//! Centralized limits and thresholds for the translator.
//!
//! None of these values change translation results for well-formed input.
//! They bound the work done on malformed or adversarial method bodies.

// =============================================================================
// Resolver
// =============================================================================

/// Maximum number of split attempts for one requested range.
///
/// Every successful attempt folds at least one operator into a node, so a
/// range with `n` operator characters needs at most `n` attempts. The cap
/// turns a resolver bug into an error instead of a hang.
pub const MAX_RESOLVE_PASSES: usize = 100_000;

// =============================================================================
// Control-flow state machine
// =============================================================================

/// Number of extra attempts each open frame gets once input is exhausted.
///
/// A frame answering "need more input" after the driver has signalled the
/// end of the body is retried this many times with the remaining buffer
/// before it is forced to close (or fail if it is missing a clause).
pub const FINISH_RETRY_BUDGET: u32 = 2;

/// Upper bound on frame transitions for a single driver call.
///
/// Protects the driver loop against a frame that keeps reporting progress
/// without consuming text.
pub const MAX_STEPS_PER_FEED: usize = 1_000_000;

// =============================================================================
// Lifting
// =============================================================================

/// Prefix of the type synthesized for an anonymous class body.
pub const LIFTED_TYPE_PREFIX: &str = "Anonymous_";

// =============================================================================
// Emitter
// =============================================================================

/// Recursion cap for the lowering pass and the printer.
///
/// Nodes nested deeper than this are left untransformed and printed from
/// their source text.
pub const MAX_EMIT_DEPTH: u32 = 4_096;
