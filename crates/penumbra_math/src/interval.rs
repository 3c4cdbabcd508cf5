/// A range `[min, max]` on the real line.
///
/// Hit queries use it for the admissible ray parameters; boxes use one per
/// axis for their extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// All of the real line. Used when a hit anywhere along the ray counts.
    pub const UNIVERSE: Interval = Interval::new(f32::NEG_INFINITY, f32::INFINITY);

    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Closed test: both ends count.
    pub fn contains(&self, x: f32) -> bool {
        (self.min..=self.max).contains(&x)
    }

    /// Open test: both ends are excluded, and so is NaN.
    ///
    /// Primitives accept a root only if it passes this, so a ray never
    /// reports a hit exactly at its lower or upper limit.
    pub fn surrounds(&self, x: f32) -> bool {
        x > self.min && x < self.max
    }

    pub fn clamp(&self, x: f32) -> f32 {
        x.max(self.min).min(self.max)
    }

    /// Narrow the far end, keeping the near one. Used to shrink the search
    /// range to the closest hit found so far.
    pub fn with_max(&self, max: f32) -> Interval {
        Interval { max, ..*self }
    }

    /// Grow by `delta` in total, half on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let half = 0.5 * delta;
        Interval::new(self.min - half, self.max + half)
    }

    /// Slide both ends by `displacement`.
    pub fn add_scalar(&self, displacement: f32) -> Interval {
        Interval::new(self.min + displacement, self.max + displacement)
    }

    /// Smallest interval covering both inputs.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }
}
