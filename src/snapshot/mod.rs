//! Snapshot module
//!
//! The rewrite engine and the fragments it injects into document
//! snapshots.

pub mod assets;
pub mod rewriter;

pub use assets::{
    attribution_banner, CONTROL_SCRIPT, CONTROL_SCRIPT_ID, SCROLL_UNLOCK_STYLE, STYLE_BLOCK_ID,
};
pub use rewriter::SnapshotRewriter;
