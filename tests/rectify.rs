mod common;

use common::synthetic_image::road_frame;
use lane_geometry::image::Mask;
use lane_geometry::rectify::{derectify, rectify, PerspectiveMapping, RectifierParams};

const W: usize = 1280;
const H: usize = 720;

fn mapping() -> PerspectiveMapping {
    PerspectiveMapping::compute(&RectifierParams::default()).unwrap()
}

#[test]
fn road_corners_land_on_the_birdseye_rectangle() {
    let params = RectifierParams::default();
    let m = mapping();
    for (src, dst) in params.src.corners().iter().zip(params.dst.corners()) {
        let p = m.to_birdseye(*src).unwrap();
        assert!((p[0] - dst[0]).abs() < 1e-6 && (p[1] - dst[1]).abs() < 1e-6);
        let back = m.to_camera(dst).unwrap();
        assert!((back[0] - src[0]).abs() < 1e-6 && (back[1] - src[1]).abs() < 1e-6);
    }
}

#[test]
fn mask_survives_a_round_trip_away_from_its_border() {
    let mask = Mask::from_fn(W, H, |x, y| (500..=800).contains(&x) && (550..=680).contains(&y));
    let m = mapping();
    let birdseye = rectify(&mask, &m.forward).unwrap();
    assert_eq!((birdseye.w, birdseye.h), (W, H));
    assert!(birdseye.count_nonzero() > 0);

    let back = derectify(&birdseye, &m.inverse, (W, H)).unwrap();
    for y in (565..=665).step_by(10) {
        for x in (520..=780).step_by(20) {
            assert!(back.get(x, y), "lost ({x}, {y})");
        }
    }
    assert!(!back.get(100, 100));
    assert!(!back.get(1200, 700));
}

#[test]
fn painted_lines_become_vertical_in_the_birdseye_view() {
    let m = mapping();
    let frame = road_frame(&m, W, H, 450, &[300.0, 900.0], 12.0);
    let birdseye = rectify(&frame, &m.forward).unwrap();
    for y in [100usize, 400, 690] {
        assert_near(birdseye.get(300, y), [255, 220, 0], y);
        assert_near(birdseye.get(900, y), [255, 220, 0], y);
        assert_near(birdseye.get(600, y), [100, 100, 100], y);
    }
}

fn assert_near(found: [u8; 3], expected: [u8; 3], row: usize) {
    let close = found.iter().zip(expected).all(|(a, b)| a.abs_diff(b) <= 1);
    assert!(close, "row {row}: {found:?} vs {expected:?}");
}
