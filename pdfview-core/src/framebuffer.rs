use image::{Rgba, RgbaImage};

use crate::error::{Result, ViewerError};
use crate::geometry::{IPoint, IRect, ISize};

const CHANNELS: usize = 4;

/// Viewport-sized RGBA pixel buffer.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    /// Allocate a buffer filled with `fill`.
    ///
    /// # Errors
    ///
    /// [`ViewerError::FramebufferAllocation`] when the pixel storage cannot
    /// be reserved.
    pub fn new(size: ISize, fill: Rgba<u8>) -> Result<Self> {
        let allocation_error = || ViewerError::FramebufferAllocation {
            width: size.width,
            height: size.height,
        };
        let len = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(allocation_error)?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|_| allocation_error())?;
        pixels.extend(std::iter::repeat(fill.0).take(len / CHANNELS).flatten());

        let image =
            RgbaImage::from_raw(size.width, size.height, pixels).ok_or_else(allocation_error)?;
        Ok(Self { image })
    }

    pub fn size(&self) -> ISize {
        ISize::new(self.image.width(), self.image.height())
    }

    pub fn bounds(&self) -> IRect {
        self.size().bounds()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Shift the contents by `offset`. Pixels pushed past an edge are lost;
    /// the exposed strips keep stale values until repainted.
    pub fn scroll(&mut self, offset: IPoint) {
        let width = self.image.width() as i32;
        let height = self.image.height() as i32;
        let (dx, dy) = (offset.x, offset.y);
        if (dx == 0 && dy == 0) || dx.abs() >= width || dy.abs() >= height {
            return;
        }

        let stride = width as usize * CHANNELS;
        let buffer: &mut [u8] = &mut self.image;

        if dy > 0 {
            for y in (dy..height).rev() {
                let src = (y - dy) as usize * stride;
                buffer.copy_within(src..src + stride, y as usize * stride);
            }
        } else if dy < 0 {
            for y in 0..height + dy {
                let src = (y - dy) as usize * stride;
                buffer.copy_within(src..src + stride, y as usize * stride);
            }
        }

        if dx != 0 {
            let shift = dx.unsigned_abs() as usize * CHANNELS;
            for row in buffer.chunks_exact_mut(stride) {
                if dx > 0 {
                    row.copy_within(0..stride - shift, shift);
                } else {
                    row.copy_within(shift..stride, 0);
                }
            }
        }
    }

    pub fn fill_rect(&mut self, rect: IRect, color: Rgba<u8>) {
        let rect = rect.intersect(&self.bounds());
        if rect.is_empty() {
            return;
        }
        for y in rect.top()..rect.bottom() {
            for x in rect.left()..rect.right() {
                self.image.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    /// Copy `bitmap` with its top-left corner at `at`, clipped to the buffer.
    pub fn blit(&mut self, bitmap: &RgbaImage, at: IPoint) {
        image::imageops::replace(&mut self.image, bitmap, i64::from(at.x), i64::from(at.y));
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        (x < self.image.width() && y < self.image.height()).then(|| *self.image.get_pixel(x, y))
    }
}
