mod file_output;

use anyhow::Result;
use image::Rgb32FImage;

pub use file_output::FileOutput;

/// Where the converged image goes once the last frame is rendered
pub trait FinalOutput: Send {
    fn commit(&self, color: &Rgb32FImage) -> Result<()>;
}
