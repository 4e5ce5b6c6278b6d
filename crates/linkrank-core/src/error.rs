//! Error type shared by the graph model and both estimators.
//!
//! Every failure in the core is a precondition violation detected before or
//! during a call. Nothing is retried and no partial result is returned.

/// Invalid-argument failures raised by graph construction and estimation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RankError {
    /// The graph has no nodes.
    #[error("graph is empty")]
    EmptyGraph,
    /// A node id was referenced that is not a key of the graph.
    #[error("node not found in graph: {0}")]
    UnknownNode(String),
    /// Damping factor outside the open interval (0, 1).
    #[error("damping factor must be in (0, 1), got {0}")]
    InvalidDamping(f64),
    /// Sampling needs at least one sample.
    #[error("sample count must be at least 1, got {0}")]
    InvalidSampleCount(usize),
    /// Convergence tolerance must be positive and finite.
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    /// Iteration cap of zero would never run a pass.
    #[error("maximum iteration count must be at least 1")]
    InvalidIterationCap,
    /// Weights handed to [`crate::WeightedChoice`] cannot form a distribution.
    #[error("invalid sampling weights: {0}")]
    InvalidWeights(String),
}

impl RankError {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyGraph => "E1001",
            Self::UnknownNode(_) => "E1002",
            Self::InvalidDamping(_) => "E2001",
            Self::InvalidSampleCount(_) => "E2002",
            Self::InvalidTolerance(_) => "E2003",
            Self::InvalidIterationCap => "E2004",
            Self::InvalidWeights(_) => "E3001",
        }
    }

    /// Whether this is a caller precondition violation (currently every variant).
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::EmptyGraph
                | Self::UnknownNode(_)
                | Self::InvalidDamping(_)
                | Self::InvalidSampleCount(_)
                | Self::InvalidTolerance(_)
                | Self::InvalidIterationCap
                | Self::InvalidWeights(_)
        )
    }
}

/// Check that `damping` lies strictly between 0 and 1.
pub(crate) fn check_damping(damping: f64) -> Result<(), RankError> {
    if damping > 0.0 && damping < 1.0 {
        Ok(())
    } else {
        Err(RankError::InvalidDamping(damping))
    }
}
