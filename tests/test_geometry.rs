use sky_raid::geometry::*;

// ── Rect basics ───────────────────────────────────────────────────────────────

#[test]
fn rect_from_center_round_trips() {
    let r = Rect::from_center(100.0, 200.0, 40.0, 60.0);
    assert_eq!(r.x, 80.0);
    assert_eq!(r.y, 170.0);
    assert_eq!(r.center(), (100.0, 200.0));
}

#[test]
fn rect_shift_moves_both_axes() {
    let mut r = Rect::from_center(100.0, 100.0, 10.0, 10.0);
    r.shift(5.0, -3.0);
    assert_eq!(r.center(), (105.0, 97.0));
}

#[test]
fn rect_overlap_detected() {
    let a = Rect::from_center(100.0, 100.0, 40.0, 40.0);
    let b = Rect::from_center(120.0, 110.0, 40.0, 40.0);
    assert!(a.overlaps(&b));
    assert!(b.overlaps(&a));
}

#[test]
fn rect_no_overlap_when_apart() {
    let a = Rect::from_center(100.0, 100.0, 40.0, 40.0);
    let b = Rect::from_center(300.0, 100.0, 40.0, 40.0);
    assert!(!a.overlaps(&b));
}

#[test]
fn rect_edge_touch_is_not_overlap() {
    // Right edge of `a` exactly on left edge of `b`
    let a = Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
    let b = Rect { x: 10.0, y: 0.0, w: 10.0, h: 10.0 };
    assert!(!a.overlaps(&b));
}

// ── check_bound ───────────────────────────────────────────────────────────────

#[test]
fn check_bound_inside() {
    let r = Rect::from_center(FIELD_W / 2.0, FIELD_H / 2.0, 50.0, 50.0);
    assert_eq!(check_bound(&r), (true, true));
}

#[test]
fn check_bound_flush_with_edges_is_inside() {
    let r = Rect { x: 0.0, y: 0.0, w: FIELD_W, h: FIELD_H };
    assert_eq!(check_bound(&r), (true, true));
}

#[test]
fn check_bound_out_left_horizontal_only() {
    let r = Rect::from_center(0.0, FIELD_H / 2.0, 50.0, 50.0);
    assert_eq!(check_bound(&r), (false, true));
}

#[test]
fn check_bound_out_bottom_vertical_only() {
    let r = Rect::from_center(FIELD_W / 2.0, FIELD_H + 10.0, 50.0, 50.0);
    assert_eq!(check_bound(&r), (true, false));
}

#[test]
fn check_bound_out_corner_both_axes() {
    let r = Rect::from_center(-100.0, -100.0, 50.0, 50.0);
    assert_eq!(check_bound(&r), (false, false));
}

// ── direction_to ──────────────────────────────────────────────────────────────

#[test]
fn direction_to_is_unit_length() {
    let org = Rect::from_center(100.0, 100.0, 10.0, 10.0);
    let dst = Rect::from_center(400.0, 250.0, 10.0, 10.0);
    let (vx, vy) = direction_to(&org, &dst);
    let norm = (vx * vx + vy * vy).sqrt();
    assert!((norm - 1.0).abs() < 1e-6);
}

#[test]
fn direction_to_points_at_target() {
    let org = Rect::from_center(100.0, 100.0, 10.0, 10.0);
    let right = Rect::from_center(500.0, 100.0, 10.0, 10.0);
    assert_eq!(direction_to(&org, &right), (1.0, 0.0));

    let below = Rect::from_center(100.0, 600.0, 10.0, 10.0);
    assert_eq!(direction_to(&org, &below), (0.0, 1.0));
}

#[test]
fn direction_to_diagonal_components() {
    let org = Rect::from_center(0.0, 0.0, 10.0, 10.0);
    let dst = Rect::from_center(100.0, 100.0, 10.0, 10.0);
    let (vx, vy) = direction_to(&org, &dst);
    let inv_sqrt2 = 1.0 / 2.0f32.sqrt();
    assert!((vx - inv_sqrt2).abs() < 1e-6);
    assert!((vy - inv_sqrt2).abs() < 1e-6);
}

#[test]
#[should_panic]
fn direction_to_coincident_centers_is_a_fault() {
    let r = Rect::from_center(100.0, 100.0, 10.0, 10.0);
    let same = Rect::from_center(100.0, 100.0, 50.0, 50.0);
    let _ = direction_to(&r, &same);
}

// ── rotated_extent ────────────────────────────────────────────────────────────

#[test]
fn rotated_extent_axis_aligned() {
    let (w, h) = rotated_extent(50.0, 16.0, 0.0);
    assert!((w - 50.0).abs() < 1e-4);
    assert!((h - 16.0).abs() < 1e-4);
}

#[test]
fn rotated_extent_quarter_turn_swaps_axes() {
    let (w, h) = rotated_extent(50.0, 16.0, 90.0);
    assert!((w - 16.0).abs() < 1e-4);
    assert!((h - 50.0).abs() < 1e-4);
}

#[test]
fn rotated_extent_diagonal() {
    // At 45° both extents become (w + h) / √2
    let (w, h) = rotated_extent(20.0, 120.0, 45.0);
    let expected = 140.0 / 2.0f32.sqrt();
    assert!((w - expected).abs() < 1e-3);
    assert!((h - expected).abs() < 1e-3);
}

#[test]
fn rotated_extent_negative_angle_matches_positive() {
    let a = rotated_extent(50.0, 16.0, 45.0);
    let b = rotated_extent(50.0, 16.0, -45.0);
    assert!((a.0 - b.0).abs() < 1e-4);
    assert!((a.1 - b.1).abs() < 1e-4);
}
