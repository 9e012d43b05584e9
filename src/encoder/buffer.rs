// src/encoder/buffer.rs

//! Append-only command buffer with a hard capacity.

use crate::error::EncodeError;
use crate::raster::Screen;
use crate::videotex::VideotexCommand;

/// Worst case for one cell: jump (4) + foreground (2) + background (2) +
/// character (1).
pub const MAX_BYTES_PER_CELL: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBuffer {
    bytes: Vec<u8>,
    capacity: usize,
}

impl CommandBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        CommandBuffer {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Sized for the worst case of every cell on `screen`.
    pub fn for_screen(screen: &Screen) -> Self {
        Self::with_capacity(screen.cell_count() * MAX_BYTES_PER_CELL)
    }

    /// Appends `command`, refusing to grow past the capacity.
    pub fn push(&mut self, command: VideotexCommand) -> Result<(), EncodeError> {
        let requested = self.bytes.len() + command.encoded_len();
        if requested > self.capacity {
            return Err(EncodeError::CapacityExceeded {
                capacity: self.capacity,
                requested,
            });
        }
        command.encode(&mut self.bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
