use super::*;

fn hd() -> FrameSize {
    FrameSize::new(1280, 720).unwrap()
}

#[test]
fn column_labels_are_bijective_base26() {
    assert_eq!(column_label(0), "A");
    assert_eq!(column_label(25), "Z");
    assert_eq!(column_label(26), "AA");
    assert_eq!(column_label(27), "AB");
    assert_eq!(column_label(51), "AZ");
    assert_eq!(column_label(52), "BA");
    assert_eq!(column_label(701), "ZZ");
    assert_eq!(column_label(702), "AAA");
    assert_eq!(column_label(18_277), "ZZZ");
}

#[test]
fn column_labels_are_unique_over_a_range() {
    let labels: std::collections::HashSet<String> = (0..5_000).map(column_label).collect();
    assert_eq!(labels.len(), 5_000);
}

#[test]
fn dimensions_are_ceil_divisions() {
    let g = GridGeometry::new(hd(), 20).unwrap();
    assert_eq!((g.cols(), g.rows()), (64, 36));
    assert_eq!(g.cell_count(), 2304);

    let g = GridGeometry::new(hd(), 7).unwrap();
    assert_eq!((g.cols(), g.rows()), (183, 103));

    assert!(GridGeometry::new(hd(), 0).is_err());
}

#[test]
fn cell_center_is_clamped_inside_the_frame() {
    let g = GridGeometry::new(FrameSize::new(50, 30).unwrap(), 20).unwrap();
    assert_eq!((g.cols(), g.rows()), (3, 2));
    assert_eq!(g.cell_center(0, 0), (10, 10));
    // Last column starts at x=40; its nominal center (50) is clamped to 49.
    assert_eq!(g.cell_center(2, 1), (49, 29));
    assert_eq!(g.cell_origin(2, 1), (40.0, 20.0));
}

#[test]
fn odd_cell_sizes_floor_the_center() {
    let g = GridGeometry::new(hd(), 7).unwrap();
    assert_eq!(g.cell_center(1, 2), (10, 17));
}

#[test]
fn cells_iterate_row_major() {
    let g = GridGeometry::new(FrameSize::new(40, 40).unwrap(), 20).unwrap();
    let cells: Vec<_> = g.cells().collect();
    assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
}

#[test]
fn headers_follow_the_grid() {
    let g = GridGeometry::new(hd(), 20).unwrap();
    let h = SpreadsheetHeaders::for_grid(&g);
    assert_eq!(h.columns.len(), 64);
    assert_eq!(h.rows.len(), 36);
    assert_eq!(h.columns[63], "BL");
    assert_eq!(h.rows[0], "1");
    assert_eq!(h.cell_ref(27, 9).as_deref(), Some("AB10"));
    assert_eq!(h.cell_ref(64, 0), None);
}
