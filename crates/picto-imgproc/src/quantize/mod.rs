mod cluster;
pub use cluster::Cluster;

mod kmeans;
pub use kmeans::{
    converge, quantize_kmeans, render, seed, seed_positions, Assignment, ConvergenceReport,
    KMeansQuantizer, Quantized,
};

/// Number of clusters used when the caller does not choose one.
pub const DEFAULT_NUM_CLUSTERS: usize = 60;

/// Errors raised by the colour quantizer.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum QuantizeError {
    /// The requested number of clusters is zero or larger than the number of pixels.
    #[error("Invalid number of clusters {k}: must be in 1..={num_pixels}")]
    InvalidNumClusters {
        /// Requested number of clusters.
        k: usize,
        /// Number of pixels in the source image.
        num_pixels: usize,
    },

    /// The convergence criteria would not allow a single pass.
    #[error("Maximum number of iterations must be at least 1")]
    InvalidMaxIterations,

    /// The assignment table does not cover the image.
    #[error("Assignment table covers {0} pixels but the image has {1}")]
    AssignmentSizeMismatch(usize, usize),

    /// A cluster would have been left without members.
    #[error("Cluster {0} would be left without members")]
    EmptyCluster(usize),

    /// A pixel has no owning cluster at render time.
    #[error("Pixel {0} is not assigned to any cluster")]
    UnassignedPixel(usize),
}

/// Structure to define the quantizer stopping rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergenceCriteria {
    /// Maximum number of full image passes to perform.
    pub max_iterations: usize,
}

impl Default for ConvergenceCriteria {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
        }
    }
}
