//! Tab completion for commands registered in a
//! [`CommandRegistry`](cmdline_core::CommandRegistry).
//!
//! [`CompletionEngine`] turns a line and a cursor into a
//! [`CompletionContext`], runs its providers and returns
//! [`CompletionProposal`]s. Providers are plain [`CompletionProvider`]
//! implementations (closures included) combined with a
//! [`CompositeCompletionProvider`]:
//!
//! - [`CommandNameProvider`]: the next word of a registered command name.
//! - [`OptionNameProvider`]: `--long`/`-s` options not yet on the line.
//! - [`EnumValueProvider`]: enum constants for option values and arguments.

mod context;
mod engine;
mod proposal;
mod provider;

pub use context::CompletionContext;
pub use engine::{CompletionConfig, CompletionEngine};
pub use proposal::CompletionProposal;
pub use provider::{
    CommandNameProvider, CompletionProvider, CompositeCompletionProvider, EnumValueProvider,
    OptionNameProvider,
};
