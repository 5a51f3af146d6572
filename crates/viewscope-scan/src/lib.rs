#![forbid(unsafe_code)]

//! Hierarchy scanner.
//!
//! Walks a host render tree through [`viewscope_core::HostTree`] and
//! reduces it to the nodes that carry visible content, excluding the
//! overlay's own chrome.
//!
//! ```ignore
//! use viewscope_scan::{ClassificationPolicy, meaningful};
//!
//! let policy = ClassificationPolicy::default();
//! if let Some(root) = host.root() {
//!     for node in meaningful(&host, root, &policy) {
//!         println!("{:?} {}", node.id, node.verdict.as_str());
//!     }
//! }
//! ```

pub mod policy;
pub mod scanner;

pub use policy::{
    CHROME_TAGS, CONTROL_PANEL_TAG, ClassificationPolicy, INSPECTOR_TAG, PERFORMANCE_TAG,
};
pub use scanner::{
    ClassifiedNode, Exclusion, Inclusion, ScannedNode, Verdict, classify, collect_all,
    collect_bounded, evaluate, is_debug_chrome, meaningful,
};
