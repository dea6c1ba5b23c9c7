pub mod bootstrap;
pub mod conversation;
pub mod reviewer;
pub mod selection_rewriter;
pub mod store;
pub mod suggestion_applier;
pub mod telemetry;
pub mod writer_session;

pub use bootstrap::{bootstrap, bootstrap_with_config};
pub use conversation::{ConversationSession, SendOutcome, Transcript};
pub use reviewer::{DebouncedReviewer, ReviewOutcome, ReviewPhase};
pub use selection_rewriter::{RewriteInstruction, RewriteOutcome, SelectionRewriter};
pub use store::EditorStore;
pub use suggestion_applier::{AcceptOutcome, SuggestionApplier};
pub use telemetry::{ActivityEvent, ActivityLayer, init_tracing, init_tracing_with_activity};
pub use writer_session::WriterSession;
