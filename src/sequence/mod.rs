//! Sequence assembly and comparison

pub mod builder;
pub mod comparator;

pub use builder::{SequenceBuilder, SequenceDetection, WireSequence};
pub use comparator::{
    ComparisonResult, ExpectedSequence, Finding, SequenceComparator, Side, SideReport, SUCCESS_DETAILS,
};
