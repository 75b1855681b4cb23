//! First-party data merge layer.
//!
//! Combines the fragments returned by providers into one payload without
//! clobbering data the caller already supplied.
//!
//! # Collision policy
//!
//! Keys are leaf paths: JSON objects are namespaces and merge recursively,
//! every other value (arrays included) is a leaf.
//!
//! 1. A leaf present in the base payload is never replaced.
//! 2. Among providers, the first one in registration order wins; later
//!    providers can only add leaves.
//! 3. Every dropped provider leaf is reported as a [`MergeConflict`].
//!
//! The merge is a pure function of its inputs. Completion order of the
//! provider calls never reaches it.

mod merge;

pub use merge::{leaf_paths, merge, merge_fragment, MergeConflict, MergeOutcome};
