//! Match-action table lowering for a kernel key-value map runtime.
//!
//! A table declaration becomes:
//!
//! - a key struct ([`KeyLayout`]) and a tagged-union value struct
//!   ([`ValueLayout`]) with one numbered member per action
//! - a primary map of the [`TableKind`] picked by [`select_map`], plus a
//!   single-slot default-action map ([`MapInstances`])
//! - key construction code ([`KeyEncoder`]) and a dispatch switch
//!   ([`ActionDispatcher`])
//! - host-side startup code loading the default action and static entries
//!   ([`Initializer`])
//!
//! Counter arrays lower independently into [`CounterTable`]s.
//!
//! # Collaborators
//!
//! Map primitives come from a [`MapTarget`] ([`KernelTarget`] for the
//! in-kernel runtime); expressions are rendered by an [`ExprLowering`].
//! Problems go to a [`mapgen_diagnostic::DiagnosticQueue`].
//!
//! # Tracing
//!
//! Call [`init_tracing`] and set `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=mapgen_tables=debug   # layout and map-kind decisions
//! RUST_LOG=mapgen_tables=trace   # per-field encoding and dispatch branches
//! ```

mod builder;
mod counter;
mod dispatch;
mod initializer;
mod instance;
mod key_encoder;
mod key_layout;
mod lowering;
mod map_kind;
mod model;
mod naming;
mod problem;
mod runtime;
mod scalar;
mod substitution;
mod table;
mod target;
mod unit;
mod value_layout;

use std::sync::Once;

pub use builder::CodeBuilder;
pub use counter::{CounterMethod, CounterTable};
pub use dispatch::ActionDispatcher;
pub use initializer::Initializer;
pub use instance::{MapDecl, MapInstances};
pub use key_encoder::{ByteSwap, CopyStrategy, KeyEncoder, KeyFieldEncoding, MAX_KEY_FIELD_BITS};
pub use key_layout::{KeyField, KeyLayout, MatchKind, PLACEHOLDER_FIELD, PREFIX_LEN_BITS};
pub use lowering::{CLowering, ExprLowering};
pub use map_kind::{capacity, select_map, ImplementationHint, MapSelection, TableKind};
pub use model::TableModel;
pub use naming::NameContext;
pub use problem::{InternalError, LoweringError, ProblemCategory, TableProblem};
pub use runtime::{CounterCells, CounterError};
pub use scalar::Storage;
pub use substitution::Substitution;
pub use table::{ApplyOutputs, CompiledTable};
pub use target::{KernelTarget, MapTarget};
pub use unit::{compile_unit, UnitOutput};
pub use value_layout::{ActionId, ActionSlot, ParamSlot, ValueLayout, NO_ACTION_MEMBER};

static TRACING_INIT: Once = Once::new();

/// Install a `tracing` subscriber filtered by `RUST_LOG`.
///
/// Does nothing when `RUST_LOG` is unset, and nothing after the first call.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
