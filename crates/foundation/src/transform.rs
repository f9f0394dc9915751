//! Conversion between device-pixel clicks, the image's natural coordinate
//! space, and percentage-based render positions.
//!
//! Points are stored in natural pixels so a placement survives window
//! resizes, zoom, and responsive layout; the percentage transform puts the
//! same stored point back in the right place at any container size.

use crate::geom::{ContainerRect, NaturalSize, RenderPercent, Vec2};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransformError {
    /// The image has not loaded yet; natural dimensions are unknown.
    ImageNotReady,
    /// The container rect has a zero dimension and cannot be normalized
    /// against.
    EmptyContainer,
}

impl std::fmt::Display for TransformError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransformError::ImageNotReady => write!(f, "floor plan image not loaded yet"),
            TransformError::EmptyContainer => write!(f, "image container has zero size"),
        }
    }
}

impl std::error::Error for TransformError {}

/// Maps a pointer position onto the image's natural pixel grid.
///
/// Normalizes the click against the container rect (0..1 in each axis),
/// then scales by the natural dimensions with rounding. Callers must not
/// dispatch any mutation when this fails.
pub fn to_natural(
    click: Vec2,
    rect: ContainerRect,
    natural: NaturalSize,
) -> Result<(i32, i32), TransformError> {
    if !natural.is_ready() {
        return Err(TransformError::ImageNotReady);
    }
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Err(TransformError::EmptyContainer);
    }

    let normalized_x = (click.x - rect.left) / rect.width;
    let normalized_y = (click.y - rect.top) / rect.height;

    let x = (normalized_x * natural.width as f64).round() as i32;
    let y = (normalized_y * natural.height as f64).round() as i32;
    Ok((x, y))
}

/// Inverse direction, for display: natural pixels to percentages of the
/// container. Returns the origin when the natural size is degenerate so
/// rendering never divides by zero.
pub fn to_render_percent(x: i32, y: i32, natural: NaturalSize) -> RenderPercent {
    if !natural.is_ready() {
        return RenderPercent::new(0.0, 0.0);
    }
    RenderPercent::new(
        x as f64 / natural.width as f64 * 100.0,
        y as f64 / natural.height as f64 * 100.0,
    )
}
