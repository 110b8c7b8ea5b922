#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Reader for the fixed binary level format.
//!
//! A level file carries a 21-byte header followed by a dense 1000x1000 byte
//! mask. The header stores the start and end points as big-endian byte
//! pairs; bytes 8 through 20 are reserved. In the mask a zero byte marks an
//! obstacle cell and any other value marks an open cell.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use outpost_core::{CellCoord, ObstacleMask};
use thiserror::Error;

/// Fixed edge length of the level mask in cells.
pub const LEVEL_DIMENSION: u32 = 1000;

const HEADER_LEN: usize = 21;
const COORD_BYTES: usize = 8;
const MASK_LEN: usize = (LEVEL_DIMENSION as usize) * (LEVEL_DIMENSION as usize);

/// Start point, end point, and obstacle mask decoded from a level file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    start: CellCoord,
    end: CellCoord,
    mask: ObstacleMask,
}

impl Level {
    /// Decodes a level from the provided byte reader.
    ///
    /// No partial level escapes on failure: short input surfaces
    /// [`LevelError::TruncatedHeader`] or [`LevelError::TruncatedMask`] and
    /// any other reader fault surfaces [`LevelError::Io`].
    pub fn read_from(mut reader: impl Read) -> Result<Self, LevelError> {
        let mut header = [0u8; HEADER_LEN];
        reader
            .read_exact(&mut header)
            .map_err(|error| truncated_as(error, LevelError::TruncatedHeader))?;

        let (coords, _reserved) = header.split_at(COORD_BYTES);
        let start = CellCoord::new(
            big_endian_pair(coords[0], coords[1]),
            big_endian_pair(coords[2], coords[3]),
        );
        let end = CellCoord::new(
            big_endian_pair(coords[4], coords[5]),
            big_endian_pair(coords[6], coords[7]),
        );

        let mut bytes = vec![0u8; MASK_LEN];
        reader
            .read_exact(&mut bytes)
            .map_err(|error| truncated_as(error, LevelError::TruncatedMask))?;

        let cells = bytes.iter().map(|&byte| byte == 0).collect();
        let mask = ObstacleMask::from_cells(LEVEL_DIMENSION, LEVEL_DIMENSION, cells)
            .expect("mask length matches the fixed level dimensions");

        Ok(Self { start, end, mask })
    }

    /// Loads and decodes the level file at the provided path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let file = File::open(path)?;
        Self::read_from(BufReader::new(file))
    }

    /// Start point encoded in the level header.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// End point encoded in the level header.
    #[must_use]
    pub const fn end(&self) -> CellCoord {
        self.end
    }

    /// Obstacle mask decoded from the level body.
    #[must_use]
    pub const fn mask(&self) -> &ObstacleMask {
        &self.mask
    }

    /// Consumes the level, yielding its obstacle mask.
    #[must_use]
    pub fn into_mask(self) -> ObstacleMask {
        self.mask
    }
}

/// Failures surfaced while decoding a level file.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The underlying reader failed.
    #[error("level data could not be read: {0}")]
    Io(#[from] io::Error),
    /// Input ended before the 21-byte header was complete.
    #[error("level header is truncated")]
    TruncatedHeader,
    /// Input ended before the full obstacle mask was read.
    #[error("level obstacle mask is truncated")]
    TruncatedMask,
}

const fn big_endian_pair(high: u8, low: u8) -> u32 {
    ((high as u32) << 8) | low as u32
}

fn truncated_as(error: io::Error, truncated: LevelError) -> LevelError {
    if error.kind() == io::ErrorKind::UnexpectedEof {
        truncated
    } else {
        LevelError::Io(error)
    }
}
