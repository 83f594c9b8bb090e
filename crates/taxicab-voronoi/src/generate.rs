//! Random source generation.

use rand::Rng;
use rand::distributions::Uniform;

use crate::types::{SourcePoint, VoronoiError};

/// Draw `count` sources uniformly from a `size × size` grid.
///
/// Each coordinate is sampled independently, so sources may collide.
/// Colliding sources stay distinct entries: the position in the returned
/// vector is the region id.
///
/// # Errors
///
/// Returns [`VoronoiError::InvalidArgument`] if `size` or `count` is zero.
pub fn generate_sources<R: Rng + ?Sized>(
    size: u32,
    count: u32,
    rng: &mut R,
) -> Result<Vec<SourcePoint>, VoronoiError> {
    if size == 0 {
        return Err(VoronoiError::InvalidArgument(
            "grid size must be positive".to_string(),
        ));
    }
    if count == 0 {
        return Err(VoronoiError::InvalidArgument(
            "number of source points must be positive".to_string(),
        ));
    }

    let coordinate = Uniform::new(0, size);
    let sources: Vec<SourcePoint> = (0..count)
        .map(|_| SourcePoint::new(rng.sample(coordinate), rng.sample(coordinate)))
        .collect();
    tracing::debug!(size, count, "generated sources");
    Ok(sources)
}
