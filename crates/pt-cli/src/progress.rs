use std::fmt::Display;

pub struct PercentBar {
    pub percent: f32,
    pub width: usize,
}

impl PercentBar {
    pub fn new(done: u32, total: u32, width: usize) -> Self {
        let percent = if total == 0 {
            1.0
        } else {
            (done as f32 / total as f32).clamp(0.0, 1.0)
        };
        Self { percent, width }
    }

    pub fn print(&self) {
        print!("\r{self}");
    }
}

impl Display for PercentBar {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filled = ((self.width - 1) as f32 * self.percent).round() as usize;
        write!(
            f,
            "[{empty:=>width_left$}>{empty:.<width_right$}] {percent:.1}%",
            empty = "",
            width_left = filled,
            width_right = self.width - 1 - filled,
            percent = 100. * self.percent
        )
    }
}
