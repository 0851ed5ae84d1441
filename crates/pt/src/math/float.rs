pub trait FloatAsExt {
    /// Returns `Some(f)` if f is far enough from zero (far is given by eps) else returns None
    ///
    /// Returns None for NaN and Some(f) for +/- infty
    fn into_non_zero(self, eps: Self) -> Option<f32>;

    /// Returns `Some(f)` if f is finite else returns None
    ///
    /// Returns None for NaN and +/- infty
    fn into_finite(self) -> Option<f32>;

    /// Returns `Some(f)` if f is finite and strictly positive
    fn into_positive(self) -> Option<f32>;
}

impl FloatAsExt for f32 {
    fn into_non_zero(self, eps: Self) -> Option<f32> {
        (self.abs() > eps).then_some(self)
    }

    fn into_finite(self) -> Option<f32> {
        self.is_finite().then_some(self)
    }

    fn into_positive(self) -> Option<f32> {
        (self.is_finite() && self > 0.0).then_some(self)
    }
}
