/// Represent a serie of samples from a given distribution.
/// It is used to get an easy access to mean and variance
#[derive(Debug, Default, Clone)]
pub struct VarianceSeries {
    count: usize,
    sum: f64,
    sqsum: f64,
}

impl VarianceSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sample(&mut self, sample: f32) {
        let sample = sample as f64;
        self.count += 1;
        self.sum += sample;
        self.sqsum += sample * sample;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> f32 {
        (self.sum / self.count as f64) as f32
    }

    /// Unbiased estimator of the variance, infinite with less than two samples
    pub fn variance(&self) -> f32 {
        if self.count < 2 {
            return f32::INFINITY;
        }

        let n = self.count as f64;
        (((self.sqsum - self.sum * self.sum / n) / (n - 1.0)).max(0.0)) as f32
    }
}

impl FromIterator<f32> for VarianceSeries {
    fn from_iter<T: IntoIterator<Item = f32>>(iter: T) -> Self {
        let mut series = Self::new();
        iter.into_iter().for_each(|s| series.add_sample(s));
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_and_variance() {
        let series: VarianceSeries = [1.0, 2.0, 3.0, 4.0].into_iter().collect();
        assert_eq!(series.count(), 4);
        assert!((series.mean() - 2.5).abs() < 1e-6);
        assert!((series.variance() - 5.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn constant_series_has_no_variance() {
        let series: VarianceSeries = std::iter::repeat(0.3).take(10).collect();
        assert!(series.variance() < 1e-9);
        assert_eq!(VarianceSeries::new().variance(), f32::INFINITY);
    }
}
