//! Shared output image written concurrently by the workers.
//!
//! Memory layout:
//! - One `AtomicU32` per pixel, row-major, `index = x + y * width`
//! - Each word holds `[blue, green, red, alpha]` in little-endian order, so the
//!   exported bytes follow the display layout `offset = (x + y * width) * 4`
//!
//! Workers write through `&self`. No locking is needed because every worker
//! owns a disjoint set of pixel columns; `Relaxed` stores are published to the
//! reader by joining the worker threads.

use crate::{ColorSample, GraphError, GridConfig, Result, BYTES_PER_PIXEL};
use std::sync::atomic::{AtomicU32, Ordering};

pub struct PixelBuffer {
    grid: GridConfig,
    pixels: Box<[AtomicU32]>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer for the grid.
    pub fn new(grid: GridConfig) -> Self {
        let pixels = (0..grid.pixel_count())
            .map(|_| AtomicU32::new(0))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self { grid, pixels }
    }

    pub fn grid(&self) -> GridConfig {
        self.grid
    }

    pub fn width(&self) -> u32 {
        self.grid.width
    }

    pub fn height(&self) -> u32 {
        self.grid.height
    }

    /// Total size of the image in bytes.
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * BYTES_PER_PIXEL
    }

    /// Map a coordinate to its pixel index, rejecting anything off the grid.
    pub fn pixel_index(&self, x: i64, y: i64) -> Result<usize> {
        let width = i64::from(self.grid.width);
        let height = i64::from(self.grid.height);
        if x < 0 || x >= width || y < 0 || y >= height {
            return Err(GraphError::OutOfRangeWrite {
                x,
                y,
                width: self.grid.width,
                height: self.grid.height,
            });
        }
        Ok((x + y * width) as usize)
    }

    /// Plot one pixel.
    pub fn write(&self, x: i64, y: i64, color: ColorSample) -> Result<()> {
        let index = self.pixel_index(x, y)?;
        self.pixels[index].store(color.packed(), Ordering::Relaxed);
        Ok(())
    }

    /// Plot two mirrored pixels together.
    ///
    /// Both coordinates are checked before either is written, so a failed call
    /// leaves the buffer untouched.
    pub fn write_pair(
        &self,
        left: (i64, i64),
        right: (i64, i64),
        color: ColorSample,
    ) -> Result<()> {
        let left_index = self.pixel_index(left.0, left.1)?;
        let right_index = self.pixel_index(right.0, right.1)?;
        let word = color.packed();
        self.pixels[left_index].store(word, Ordering::Relaxed);
        self.pixels[right_index].store(word, Ordering::Relaxed);
        Ok(())
    }

    /// BGRA bytes of one pixel, `None` if off the grid.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let index = self.pixel_index(i64::from(x), i64::from(y)).ok()?;
        Some(self.pixels[index].load(Ordering::Relaxed).to_le_bytes())
    }

    /// True once anything has been plotted at `(x, y)`.
    pub fn is_written(&self, x: u32, y: u32) -> bool {
        self.pixel(x, y).is_some_and(|bytes| bytes != [0; 4])
    }

    /// Reset every pixel to zero.
    pub fn clear(&self) {
        for pixel in self.pixels.iter() {
            pixel.store(0, Ordering::Relaxed);
        }
    }

    /// Copy the image out in display byte order.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.byte_len());
        for pixel in self.pixels.iter() {
            bytes.extend_from_slice(&pixel.load(Ordering::Relaxed).to_le_bytes());
        }
        bytes
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.grid.width)
            .field("height", &self.grid.height)
            .finish_non_exhaustive()
    }
}
