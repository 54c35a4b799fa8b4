//! Greedy pairing of edge segments into wire bodies
//!
//! Segments are consumed left to right. Each candidate left boundary is
//! paired with the first later segment that satisfies every spacing and
//! width constraint. The search is first-match, not best-match.

use serde::{Deserialize, Serialize};

use crate::config::PairingConfig;
use crate::detection::edges::EdgeSegment;

/// One wire cross-section bounded by two edge segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireBody {
    pub left: EdgeSegment,
    pub right: EdgeSegment,
    /// `floor((left.start_x + right.end_x) / 2)`
    pub center_x: i32,
}

impl WireBody {
    pub fn new(left: EdgeSegment, right: EdgeSegment) -> Self {
        Self {
            left,
            right,
            center_x: (left.start_x + right.end_x).div_euclid(2),
        }
    }

    /// Interior width between the two edges, edges' inner pixels included
    pub fn body_width(&self) -> i32 {
        self.right.start_x - self.left.end_x + 1
    }
}

/// Pairs edge segments into ordered wire bodies
pub struct WirePairing<'a> {
    config: &'a PairingConfig,
}

impl<'a> WirePairing<'a> {
    pub fn new(config: &'a PairingConfig) -> Self {
        Self { config }
    }

    /// Pair `segments` (ascending, non-overlapping) into wire bodies
    ///
    /// The output is ordered left to right with strictly increasing
    /// `center_x` and disjoint x-ranges.
    pub fn pair(&self, segments: &[EdgeSegment]) -> Vec<WireBody> {
        let mut bodies = Vec::new();
        let mut last_right_end = self.config.min_spacing.saturating_neg();
        let mut i = 0;

        while i < segments.len() {
            let left = segments[i];
            match self.find_right_boundary(segments, i, last_right_end) {
                Some(j) => {
                    let right = segments[j];
                    bodies.push(WireBody::new(left, right));
                    last_right_end = right.end_x;
                    i = j + 1;
                }
                None => i += 1,
            }
        }

        bodies
    }

    /// First `j > i` that can close a wire body opened by `segments[i]`
    fn find_right_boundary(&self, segments: &[EdgeSegment], i: usize, last_right_end: i32) -> Option<usize> {
        let left = segments[i];
        let max_gap = self.config.max_gap_factor.saturating_mul(self.config.min_body_width);

        segments
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, right)| {
                let gap = right.start_x - left.end_x - 1;
                let body_width = right.start_x - left.end_x + 1;
                right.start_x > left.end_x
                    && gap >= 0
                    && gap < max_gap
                    && body_width > self.config.min_body_width
                    && left.start_x > last_right_end.saturating_add(self.config.min_spacing)
            })
            .map(|(j, _)| j)
    }
}
