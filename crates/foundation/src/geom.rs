#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

/// Intrinsic pixel size of the floor-plan image asset, independent of the
/// size it is currently rendered at.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NaturalSize {
    pub width: u32,
    pub height: u32,
}

impl NaturalSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// False until the image asset has loaded and reported real dimensions.
    pub fn is_ready(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// On-screen bounding rectangle of the image container, in device pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ContainerRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Percentage-based render position, valid at any container size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RenderPercent {
    pub left_pct: f64,
    pub top_pct: f64,
}

impl RenderPercent {
    pub fn new(left_pct: f64, top_pct: f64) -> Self {
        Self { left_pct, top_pct }
    }
}

#[cfg(test)]
mod tests {
    use super::{NaturalSize, Vec2};

    #[test]
    fn vec2_add_sub() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(-0.5, 4.0);
        assert_eq!(a + b, Vec2::new(0.5, 6.0));
        assert_eq!(a - b, Vec2::new(1.5, -2.0));
    }

    #[test]
    fn natural_size_readiness() {
        assert!(NaturalSize::new(1200, 800).is_ready());
        assert!(!NaturalSize::new(0, 800).is_ready());
        assert!(!NaturalSize::new(1200, 0).is_ready());
    }
}
