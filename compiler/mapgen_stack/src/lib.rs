//! Stack growth guard for recursive tree rewrites.
//!
//! Action bodies arrive as arbitrarily nested statement and expression trees.
//! Rewrites that walk them recursively (parameter substitution, rendering)
//! wrap each level in [`ensure_sufficient_stack`] so that deeply nested
//! bodies grow the stack instead of overflowing it.
//!
//! - **Native targets**: `stacker::maybe_grow` allocates a new segment when
//!   less than [`RED_ZONE`] bytes remain.
//! - **WASM targets**: plain call.

/// Remaining stack below which a new segment is allocated (128KB).
const RED_ZONE: usize = 128 * 1024;

/// Size of each newly allocated stack segment (1MB).
const SEGMENT_SIZE: usize = 1024 * 1024;

/// Run `f`, growing the stack first if the red zone has been reached.
///
/// ```text
/// fn rewrite(expr: &Expr) -> Expr {
///     ensure_sufficient_stack(|| match expr {
///         Expr::Unary { op, operand } => Expr::Unary { op: *op, operand: Box::new(rewrite(operand)) },
///         other => other.clone(),
///     })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
