//! Selection of matched native/target magnitude pairs.
//!
//! Given grouped measures, a native and a target scale, this crate picks
//! one representative measure per scale in every group that reports both.
//! The result feeds the regression engine.
//!
//! Two independent choices are made per call:
//!
//! - a [`MissingUncertainty`] policy for measures without a standard error
//!   (discard, borrow the event maximum, or use a fixed default);
//! - a [`SelectionStrategy`] for picking among several candidates
//!   (random, smallest joint value, or agency preference).
//!
//! The event-maximum policy needs every measure of an event, so the store
//! (or a collection) is passed in explicitly as an [`EventSiblings`]
//! handle.
//!
//! [`EventSiblings`]: emsr_catalogue::EventSiblings

mod error;
mod missing;
mod pairs;
mod ranking;
mod strategy;

pub use error::SelectionError;
pub use missing::MissingUncertainty;
pub use pairs::MatchedPairs;
pub use ranking::{AgencyRanking, UNRANKED};
pub use strategy::SelectionStrategy;
