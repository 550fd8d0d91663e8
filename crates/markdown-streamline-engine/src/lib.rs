//! Incremental reassembly and structure detection for streamed markdown.
//!
//! Text arrives as arbitrarily-sized fragments whose boundaries carry no
//! meaning; the engine buffers them, finds the maximal prefix whose
//! interpretation can no longer change, and emits that prefix as segments
//! tagged with the construct they belong to (plain text, inline code, or a
//! fenced code block with its language tag). Finalized text is never
//! reinterpreted, so a renderer can commit each segment permanently.
//!
//! ```
//! use markdown_streamline_engine::{FenceState, StreamSession};
//!
//! let mut session = StreamSession::new();
//! let mut segments = Vec::new();
//! for fragment in ["pla", "in ``", "`rust\nco", "de\n``", "` more"] {
//!     segments.extend(session.push(fragment).unwrap());
//! }
//! segments.extend(session.finish().unwrap());
//!
//! let text: String = segments
//!     .iter()
//!     .filter(|s| matches!(s.state, FenceState::InFence { .. }))
//!     .map(|s| s.text.as_str())
//!     .collect();
//! assert_eq!(text, "code\n");
//! ```

pub mod buffer;
pub mod feed;
pub mod scan;
pub mod session;
pub mod state;

pub use buffer::{ChunkBuffer, RangeError, Span};
pub use feed::{DEFAULT_SEPARATOR, FeedError, FragmentFeed};
pub use scan::{PendingMarker, ScanOutcome, ScanPiece, kinds::Heading, scan};
pub use session::{EmitSegment, StreamSession};
pub use state::{FenceMachine, FenceState, Transition};
