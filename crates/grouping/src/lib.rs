//! Partitioning of magnitude measures into comparable groups.
//!
//! A group holds the measures believed to describe one earthquake. Pairs
//! of scales are only ever matched inside a group.
//!
//! # Strategies
//!
//! - [`GroupingStrategy::ByEvent`]: the source catalogue's event key.
//! - [`GroupingStrategy::TimeClustering`]: single-linkage clustering on
//!   origin time (or depth, or magnitude) cut at a distance threshold.
//! - [`GroupingStrategy::Sequential`]: connected components of the graph
//!   linking measures inside time, space and magnitude windows. Used to
//!   merge reports of one earthquake that different agencies filed under
//!   different event keys.
//!
//! # Quick start
//!
//! ```rust
//! use emsr_grouping::{GroupingStrategy, SequentialWindows};
//!
//! let strategy = GroupingStrategy::Sequential(SequentialWindows::new(10.0, 100.0));
//! let groups = strategy.group_measures(&[]).unwrap();
//! assert!(groups.is_empty());
//! ```

pub mod cluster;
pub mod error;
pub mod key;
pub mod sequential;
pub mod strategy;

pub use cluster::{ClusterFeature, TimeClustering};
pub use error::GroupingError;
pub use key::{GroupKey, Groups};
pub use sequential::SequentialWindows;
pub use strategy::GroupingStrategy;
