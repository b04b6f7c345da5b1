//! Errors surfaced by the generation engine.

use thiserror::Error;

use crate::png::PngError;

/// Errors from material generation and export.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Parameters failed validation; nothing was generated.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A buffer could not be allocated. Retrying at a lower resolution may succeed.
    #[error("Out of memory: could not allocate {bytes} bytes for {what}")]
    ResourceExhaustion {
        /// Buffer being allocated.
        what: &'static str,
        /// Requested size in bytes.
        bytes: u64,
    },

    /// An unexpected numeric fault aborted the run.
    #[error("Computation failed: {0}")]
    ComputationFailure(String),

    /// The run observed a cancellation request at a stage boundary.
    #[error("Generation cancelled")]
    Cancelled,

    #[error("PNG error: {0}")]
    Png(#[from] PngError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    /// Whether the caller can reasonably retry with different parameters.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GenerateError::InvalidParameter(_)
                | GenerateError::ResourceExhaustion { .. }
                | GenerateError::Cancelled
        )
    }
}

impl From<stonegen_spec::ParamsError> for GenerateError {
    fn from(err: stonegen_spec::ParamsError) -> Self {
        GenerateError::InvalidParameter(err.to_string())
    }
}

/// Allocate a vector of `len` copies of `fill`, reporting allocation failure
/// as [`GenerateError::ResourceExhaustion`] instead of aborting.
pub(crate) fn try_alloc<T: Copy>(
    len: usize,
    fill: T,
    what: &'static str,
) -> Result<Vec<T>, GenerateError> {
    let bytes = (len as u64).saturating_mul(std::mem::size_of::<T>() as u64);
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| GenerateError::ResourceExhaustion { what, bytes })?;
    data.resize(len, fill);
    Ok(data)
}

/// Number of elements in a `width * height * channels` buffer.
pub(crate) fn buffer_len(
    width: u32,
    height: u32,
    channels: usize,
    what: &'static str,
) -> Result<usize, GenerateError> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(channels))
        .ok_or(GenerateError::ResourceExhaustion {
            what,
            bytes: u64::MAX,
        })
}
