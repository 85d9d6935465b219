use crate::common::*;

/// The height and width of an image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelSize {
    pub h: usize,
    pub w: usize,
}

impl PixelSize {
    pub fn new(h: usize, w: usize) -> Result<Self> {
        ensure!(
            h > 0 && w > 0,
            "the size parameters must be positive, but get h={}, w={}",
            h,
            w
        );
        Ok(Self { h, w })
    }

    pub fn hw(&self) -> [usize; 2] {
        [self.h, self.w]
    }
}
