use graphdemo_core::{partition_columns, ColorSample, GridConfig, PixelBuffer, BYTES_PER_PIXEL};
use std::sync::Arc;

#[test]
fn test_buffer_size_matches_grid() {
    let grid = GridConfig::new(1920, 1080);
    let buffer = PixelBuffer::new(grid);

    assert_eq!(buffer.byte_len(), 1920 * 1080 * BYTES_PER_PIXEL);
    assert_eq!(buffer.to_bytes().len(), grid.byte_len());
}

#[test]
fn test_concurrent_writes_to_disjoint_columns() {
    let grid = GridConfig::new(64, 8);
    let buffer = Arc::new(PixelBuffer::new(grid));
    let color = ColorSample::new(0xAA, 0xBB, 0xCC);
    let half = grid.half_width() as i64;

    std::thread::scope(|scope| {
        for partition in partition_columns(grid.width, 4).unwrap() {
            let buffer = Arc::clone(&buffer);
            scope.spawn(move || {
                for x in partition.columns() {
                    let x = i64::from(x);
                    for y in 0..i64::from(grid.height) {
                        buffer.write_pair((half - x, y), (half + x, y), color).unwrap();
                    }
                }
            });
        }
    });

    let bytes = buffer.to_bytes();
    for x in 1..grid.width {
        for y in 0..grid.height {
            let offset = (x + y * grid.width) as usize * BYTES_PER_PIXEL;
            assert_eq!(&bytes[offset..offset + 4], &color.to_bgra(), "pixel ({x}, {y})");
        }
    }
    // Column 0 is never reached by the mirrored pattern.
    assert!(!buffer.is_written(0, 0));
}
