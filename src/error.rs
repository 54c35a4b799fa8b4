//! Error types for the wire_sequence library

use thiserror::Error;

/// Result type alias for wire_sequence operations
pub type Result<T> = std::result::Result<T, InspectionError>;

/// Error types for connector inspection
///
/// Two variants describe expected operating states rather than faults:
/// [`InspectionError::NoConnectorDetected`] and
/// [`InspectionError::DegenerateRegion`]. The pipeline absorbs them and
/// reports an empty or shortened sequence instead of failing the request.
#[derive(Error, Debug)]
pub enum InspectionError {
    /// Image file could not be loaded or decoded
    #[error("Failed to load image: {message}")]
    ImageLoadError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// OpenCV operation failed
    #[error("OpenCV error: {operation}")]
    OpenCvError {
        operation: String,
        #[source]
        source: Option<opencv::Error>,
    },

    /// No connector housing could be segmented from the image
    #[error("No connector detected: {reason}")]
    NoConnectorDetected { reason: String },

    /// A crop or sample rectangle collapsed to zero area
    #[error("Degenerate region: {reason}")]
    DegenerateRegion { reason: String },

    /// Unsupported inspection mode or side count
    #[error("Invalid inspection mode: {mode}")]
    InvalidMode { mode: String },

    /// Invalid input parameters
    #[error("Invalid parameter: {parameter} = {value}")]
    InvalidParameter { parameter: String, value: String },

    /// Configuration could not be read, parsed or written
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl InspectionError {
    /// Create an image load error with context
    pub fn image_load<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ImageLoadError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an OpenCV error with context
    pub fn opencv(operation: impl Into<String>, source: opencv::Error) -> Self {
        Self::OpenCvError {
            operation: operation.into(),
            source: Some(source),
        }
    }

    /// Create a configuration error with context
    pub fn config<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            value: value.to_string(),
        }
    }

    /// Check if this error indicates a "nothing found" condition that the
    /// pipeline degrades gracefully on
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            InspectionError::NoConnectorDetected { .. } | InspectionError::DegenerateRegion { .. }
        )
    }

    /// Get user-friendly error description for operator display
    pub fn user_message(&self) -> String {
        match self {
            InspectionError::ImageLoadError { .. } => {
                "Could not load the image. Please check the file format and try again.".to_string()
            }
            InspectionError::NoConnectorDetected { .. } => {
                "Could not find the connector. Please check lighting and connector placement.".to_string()
            }
            InspectionError::DegenerateRegion { .. } => {
                "The wire region is too small to sample. Please move the camera closer.".to_string()
            }
            InspectionError::InvalidMode { mode } => {
                format!("Unsupported inspection mode '{}'. Use 'singlewire' or 'doublewire'.", mode)
            }
            _ => "Wire inspection failed. Please try again with a different image.".to_string(),
        }
    }
}
