//! Recognized target backends and their memory alignment profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Target backend a graph is constructed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// Portable reference backend with no alignment requirement.
    Reference,
    /// SIMD accelerator backend requiring 8-element aligned tensor rows.
    Smv,
}

impl Backend {
    /// The alignment profile a backend's tensors are expected to carry.
    pub fn default_profile(self) -> AlignmentProfile {
        match self {
            Backend::Reference => AlignmentProfile::Unaligned,
            Backend::Smv => AlignmentProfile::Simd8,
        }
    }

    /// Returns `true` when `profile` is a recognized pairing for this backend.
    pub fn supports(self, profile: AlignmentProfile) -> bool {
        self.default_profile() == profile
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Reference => "Reference",
            Backend::Smv => "SMV",
        };
        f.write_str(name)
    }
}

impl FromStr for Backend {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Reference" => Ok(Backend::Reference),
            "SMV" => Ok(Backend::Smv),
            other => Err(GraphError::configuration(format!(
                "unknown backend `{other}`"
            ))),
        }
    }
}

/// Backend-specific memory alignment requirement applied to tensor
/// descriptors created by a graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlignmentProfile {
    /// No padding requirement.
    Unaligned,
    /// Innermost dimension padded to a multiple of 8 elements.
    Simd8,
}

impl AlignmentProfile {
    /// Element alignment recorded on tensor descriptors; zero means none.
    pub fn element_alignment(self) -> usize {
        match self {
            AlignmentProfile::Unaligned => 0,
            AlignmentProfile::Simd8 => 8,
        }
    }
}

impl fmt::Display for AlignmentProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlignmentProfile::Unaligned => "unaligned",
            AlignmentProfile::Simd8 => "simd8",
        };
        f.write_str(name)
    }
}

impl FromStr for AlignmentProfile {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unaligned" => Ok(AlignmentProfile::Unaligned),
            "simd8" => Ok(AlignmentProfile::Simd8),
            other => Err(GraphError::configuration(format!(
                "unknown alignment profile `{other}`"
            ))),
        }
    }
}
