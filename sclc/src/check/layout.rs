/// Bytes reserved for a scalar variable
pub const SLOT_SIZE: usize = 8;

/// Bytes per array element
pub const ELEM_SIZE: usize = 4;

/// `sub rsp, imm32` bounds the frame
const MAX_FRAME: usize = i32::MAX as usize - 15;

/// Stack frame allocator. Storage grows downward from `rbp`; every allocation
/// returns the displacement of its lowest byte, `[rbp - offset]`.
#[derive(Debug, Clone, Default)]
pub struct FrameLayout {
    cursor: usize,
}

impl FrameLayout {
    pub fn new() -> Self {
        Self { cursor: 0 }
    }

    /// Scalar slots are 8-byte aligned, padding after an odd-length array
    pub fn scalar(&mut self) -> Option<usize> {
        self.reserve(SLOT_SIZE, SLOT_SIZE)
    }

    pub fn array(&mut self, len: usize) -> Option<usize> {
        self.reserve(len.checked_mul(ELEM_SIZE)?, ELEM_SIZE)
    }

    fn reserve(&mut self, size: usize, align: usize) -> Option<usize> {
        let end = self
            .cursor
            .checked_next_multiple_of(align)?
            .checked_add(size)?;
        if end > MAX_FRAME {
            return None;
        }
        self.cursor = end;
        Some(end)
    }

    /// Bytes in use
    pub fn used(&self) -> usize {
        self.cursor
    }

    /// Frame size rounded up to 16 bytes
    pub fn frame_size(&self) -> usize {
        (self.cursor + 15) & !15
    }
}
