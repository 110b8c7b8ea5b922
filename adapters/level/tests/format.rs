use std::io::Cursor;

use outpost_core::CellCoord;
use outpost_level::{Level, LevelError, LEVEL_DIMENSION};

const MASK_LEN: usize = (LEVEL_DIMENSION as usize) * (LEVEL_DIMENSION as usize);

fn header(start: (u32, u32), end: (u32, u32)) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(21);
    for coord in [start.0, start.1, end.0, end.1] {
        bytes.push((coord >> 8) as u8);
        bytes.push((coord & 0xff) as u8);
    }
    bytes.extend_from_slice(&[0u8; 13]);
    bytes
}

#[test]
fn level_round_trips_through_the_binary_format() {
    let mut bytes = header((200, 0), (999, 999));
    let mut mask_bytes = vec![1u8; MASK_LEN];
    // Obstacles at the first cell, one mid-row cell, and the last cell.
    mask_bytes[0] = 0;
    mask_bytes[3 * LEVEL_DIMENSION as usize + 7] = 0;
    mask_bytes[MASK_LEN - 1] = 0;
    bytes.extend_from_slice(&mask_bytes);

    let level = Level::read_from(Cursor::new(bytes)).expect("level decodes");

    assert_eq!(level.start(), CellCoord::new(200, 0));
    assert_eq!(level.end(), CellCoord::new(999, 999));

    let mask = level.mask();
    assert_eq!(mask.width(), LEVEL_DIMENSION);
    assert_eq!(mask.height(), LEVEL_DIMENSION);
    assert_eq!(mask.marked_count(), 3);
    assert!(mask.is_marked(CellCoord::new(0, 0)));
    assert!(mask.is_marked(CellCoord::new(7, 3)));
    assert!(mask.is_marked(CellCoord::new(999, 999)));
    assert!(!mask.is_marked(CellCoord::new(1, 0)));

    for (cell, &byte) in mask.cells().iter().zip(&mask_bytes) {
        assert_eq!(*cell, byte == 0);
    }
}

#[test]
fn reserved_header_bytes_are_ignored() {
    let mut bytes = header((1, 2), (3, 4));
    for byte in bytes.iter_mut().skip(8) {
        *byte = 0xaa;
    }
    bytes.extend_from_slice(&vec![7u8; MASK_LEN]);

    let level = Level::read_from(Cursor::new(bytes)).expect("level decodes");
    assert_eq!(level.start(), CellCoord::new(1, 2));
    assert_eq!(level.end(), CellCoord::new(3, 4));
    assert_eq!(level.mask().marked_count(), 0);
}

#[test]
fn short_header_is_reported_as_truncated() {
    let error = Level::read_from(Cursor::new(vec![0u8; 5])).unwrap_err();
    assert!(matches!(error, LevelError::TruncatedHeader));
}

#[test]
fn short_mask_is_reported_as_truncated() {
    let mut bytes = header((0, 0), (9, 9));
    bytes.extend_from_slice(&vec![1u8; MASK_LEN / 2]);

    let error = Level::read_from(Cursor::new(bytes)).unwrap_err();
    assert!(matches!(error, LevelError::TruncatedMask));
}

#[test]
fn missing_file_surfaces_an_io_error() {
    let error = Level::load("does-not-exist.level").unwrap_err();
    assert!(matches!(error, LevelError::Io(_)));
}
