//! Display side of the graph: whatever shows the finished buffer.

/// Consumer of finished frames in BGRA byte order.
pub trait DisplaySurface: Send {
    fn present(&mut self, frame: &[u8], width: u32, height: u32);
}

/// Surface that keeps the last presented frame in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySurface {
    frame: Vec<u8>,
    width: u32,
    height: u32,
    presented: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &[u8] {
        &self.frame
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> usize {
        self.presented
    }
}

impl DisplaySurface for MemorySurface {
    fn present(&mut self, frame: &[u8], width: u32, height: u32) {
        self.frame.clear();
        self.frame.extend_from_slice(frame);
        self.width = width;
        self.height = height;
        self.presented += 1;
    }
}
