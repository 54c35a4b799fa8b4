//! Expected-versus-detected sequence comparison
//!
//! A side fails on a count mismatch before any color is looked at, since
//! index alignment is meaningless when the counts differ. With equal counts
//! every wire is compared by Euclidean BGR distance against the configured
//! threshold.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{Bgr, ColorConverter};
use crate::config::ComparisonConfig;
use crate::sequence::WireSequence;
use crate::{InspectionError, Result};

/// Details text of a passing inspection
pub const SUCCESS_DETAILS: &str = "SUCCESSFUL";

/// Caller-declared wire sequence for one connector side
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawExpectedSequence")]
pub struct ExpectedSequence {
    count: usize,
    colors: Vec<Bgr>,
}

#[derive(Deserialize)]
struct RawExpectedSequence {
    count: usize,
    #[serde(default)]
    colors: Vec<ColorEntry>,
}

/// Expected color as a `[b, g, r]` array or an RGB hex string
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorEntry {
    Triplet(Bgr),
    Hex(String),
}

impl TryFrom<RawExpectedSequence> for ExpectedSequence {
    type Error = InspectionError;

    fn try_from(raw: RawExpectedSequence) -> Result<Self> {
        let converter = ColorConverter::new();
        let colors = raw
            .colors
            .into_iter()
            .map(|entry| match entry {
                ColorEntry::Triplet(bgr) => Ok(bgr),
                ColorEntry::Hex(hex) => converter.hex_to_bgr(&hex),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(raw.count, colors)
    }
}

impl ExpectedSequence {
    /// # Errors
    ///
    /// Returns `InvalidParameter` if `count` differs from the number of colors.
    pub fn new(count: usize, colors: Vec<Bgr>) -> Result<Self> {
        if count != colors.len() {
            return Err(InspectionError::invalid_parameter(
                "expected.count",
                format!("{} (with {} colors)", count, colors.len()),
            ));
        }
        Ok(Self { count, colors })
    }

    pub fn from_colors(colors: Vec<Bgr>) -> Self {
        Self {
            count: colors.len(),
            colors,
        }
    }

    /// Expectation of an empty slot
    pub fn empty() -> Self {
        Self::from_colors(Vec::new())
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn colors(&self) -> &[Bgr] {
        &self.colors
    }
}

/// Connector side of a dual-sided inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Front,
    Back,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One finding that makes a side fail
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    CountMismatch {
        expected: usize,
        detected: usize,
    },
    ColorMismatch {
        /// 1-based, counted from the left
        position: usize,
        expected: Bgr,
        detected: Bgr,
        distance: f64,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::CountMismatch { expected, detected } => {
                write!(f, "Wire count mismatch: expected {}, detected {}", expected, detected)
            }
            Finding::ColorMismatch {
                position,
                expected,
                detected,
                distance,
            } => write!(
                f,
                "Wire {}: expected {}, detected {}, distance {:.2}",
                position, expected, detected, distance
            ),
        }
    }
}

/// Comparison outcome for one side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(rename = "match")]
    pub matched: bool,
    pub expected_count: usize,
    pub detected_count: usize,
    pub findings: Vec<Finding>,
}

/// Verdict of one inspection request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonResult {
    #[serde(rename = "match")]
    pub matched: bool,
    /// Human-readable findings, one per line
    pub details: String,
    pub sides: Vec<SideReport>,
}

impl ComparisonResult {
    fn from_reports(sides: Vec<SideReport>) -> Self {
        let matched = sides.iter().all(|s| s.matched);
        let details = if matched {
            SUCCESS_DETAILS.to_string()
        } else {
            sides
                .iter()
                .flat_map(|report| {
                    report.findings.iter().map(move |finding| match report.side {
                        Some(side) => format!("[{}] {}", side, finding),
                        None => finding.to_string(),
                    })
                })
                .collect::<Vec<_>>()
                .join("\n")
        };
        Self {
            matched,
            details,
            sides,
        }
    }
}

/// Compares detected sequences against expectations
pub struct SequenceComparator<'a> {
    config: &'a ComparisonConfig,
}

impl<'a> SequenceComparator<'a> {
    pub fn new(config: &'a ComparisonConfig) -> Self {
        Self { config }
    }

    /// Compare one side
    pub fn compare_side(
        &self,
        side: Option<Side>,
        expected: &ExpectedSequence,
        detected: &WireSequence,
    ) -> SideReport {
        let mut findings = Vec::new();

        if expected.count() != detected.count() {
            findings.push(Finding::CountMismatch {
                expected: expected.count(),
                detected: detected.count(),
            });
        } else {
            for (i, (want, got)) in expected.colors().iter().zip(detected.colors()).enumerate() {
                let distance = want.distance(got);
                if distance > self.config.color_threshold {
                    findings.push(Finding::ColorMismatch {
                        position: i + 1,
                        expected: *want,
                        detected: *got,
                        distance,
                    });
                }
            }
        }

        SideReport {
            side,
            matched: findings.is_empty(),
            expected_count: expected.count(),
            detected_count: detected.count(),
            findings,
        }
    }

    /// Single-sided comparison
    pub fn compare_single(&self, expected: &ExpectedSequence, detected: &WireSequence) -> ComparisonResult {
        ComparisonResult::from_reports(vec![self.compare_side(None, expected, detected)])
    }

    /// Dual-sided comparison; the verdict is the AND of both sides
    pub fn compare_dual(
        &self,
        front: (&ExpectedSequence, &WireSequence),
        back: (&ExpectedSequence, &WireSequence),
    ) -> ComparisonResult {
        ComparisonResult::from_reports(vec![
            self.compare_side(Some(Side::Front), front.0, front.1),
            self.compare_side(Some(Side::Back), back.0, back.1),
        ])
    }
}
