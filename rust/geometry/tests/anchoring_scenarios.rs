// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end anchoring and segmentation checks on small hand-built plans.

use approx::assert_relative_eq;
use skad_geometry::{
    interval, project, segment, AnchoredOpening, CoordinateMapper, HeightBand, OpeningProjector,
    OpeningSegment, PlanIssue, PlanSnapshot, Point2D, RenderSettings, Segment2D, WallPiece, WallSegment,
};

fn p(x: f64, y: f64) -> Point2D {
    Point2D::new(x, y)
}

fn south_wall() -> WallSegment {
    WallSegment::new(p(0.0, 0.0), p(4000.0, 0.0), 200.0)
}

/// Anchor a single opening onto `walls` with default settings
fn anchor_one(opening: &OpeningSegment, walls: &[WallSegment]) -> Option<AnchoredOpening> {
    let band = RenderSettings::default().height_band(opening).ok()?;
    OpeningProjector::reconstruction().anchor(&opening.segment(), walls, band)
}

fn spans(pieces: &[WallPiece]) -> Vec<(f64, f64, f64, f64)> {
    pieces
        .iter()
        .map(|p| (p.start_mm, p.end_mm, p.bottom_mm, p.top_mm))
        .collect()
}

/// Minimal LCG so the property checks are deterministic
struct Lcg(u64);

impl Lcg {
    fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

#[test]
fn scenario_a_door_splits_wall_in_two() {
    let wall = south_wall();
    let door = OpeningSegment::door(p(1000.0, 0.0), p(1900.0, 0.0));
    let anchored = anchor_one(&door, std::slice::from_ref(&wall)).unwrap();

    let pieces = segment(0, &wall, &[anchored], 2700.0);

    assert_eq!(
        spans(&pieces),
        vec![(0.0, 1000.0, 0.0, 2700.0), (1900.0, 4000.0, 0.0, 2700.0)]
    );
}

#[test]
fn scenario_b_window_leaves_sill_and_head() {
    let wall = south_wall();
    let window = OpeningSegment::window(p(500.0, 0.0), p(1500.0, 0.0))
        .with_sill(900.0)
        .with_height(1200.0);
    let anchored = anchor_one(&window, std::slice::from_ref(&wall)).unwrap();

    let pieces = segment(0, &wall, &[anchored], 2700.0);

    assert_eq!(
        spans(&pieces),
        vec![
            (0.0, 500.0, 0.0, 2700.0),
            (500.0, 1500.0, 0.0, 900.0),
            (500.0, 1500.0, 2100.0, 2700.0),
            (1500.0, 4000.0, 0.0, 2700.0),
        ]
    );
}

#[test]
fn scenario_c_steep_opening_never_anchors() {
    let wall = south_wall();
    let angle = 70f64.to_radians();
    let half = 1000.0;
    let opening = Segment2D::new(
        p(2000.0 - half * angle.cos(), -half * angle.sin()),
        p(2000.0 + half * angle.cos(), half * angle.sin()),
    );

    assert!(OpeningProjector::plan_view()
        .best_fit(&opening, std::slice::from_ref(&wall))
        .is_none());
    assert!(OpeningProjector::reconstruction()
        .best_fit(&opening, std::slice::from_ref(&wall))
        .is_none());

    // Alignment alone is what rejects it
    let very_thick = WallSegment::new(p(0.0, 0.0), p(4000.0, 0.0), 3000.0);
    let loose = project(&opening, &very_thick, 0.0).unwrap();
    assert_relative_eq!(loose.alignment, angle.cos(), epsilon = 1e-9);
    assert!(project(&opening, &very_thick, 0.84).is_none());
}

#[test]
fn scenario_d_closer_wall_wins() {
    let walls = vec![
        WallSegment::new(p(0.0, 90.0), p(4000.0, 90.0), 200.0),
        WallSegment::new(p(0.0, -30.0), p(4000.0, -30.0), 200.0),
    ];
    let door = OpeningSegment::door(p(1000.0, 0.0), p(1900.0, 0.0));

    for projector in [OpeningProjector::plan_view(), OpeningProjector::reconstruction()] {
        let fit = projector.best_fit(&door.segment(), &walls).unwrap();
        assert_eq!(fit.wall_index, 1);
    }
}

#[test]
fn perpendicular_opening_never_anchors_at_any_distance() {
    let wall = south_wall();
    for offset in [0.0, 50.0, 500.0] {
        let opening = Segment2D::new(p(2000.0, offset - 450.0), p(2000.0, offset + 450.0));
        assert!(OpeningProjector::default()
            .best_fit(&opening, std::slice::from_ref(&wall))
            .is_none());
    }
}

#[test]
fn parallel_opening_beyond_lateral_tolerance_never_anchors() {
    for thickness in [100.0, 200.0, 300.0, 600.0] {
        let wall = WallSegment::new(p(0.0, 0.0), p(4000.0, 0.0), thickness);
        let tolerance = (thickness * 0.75f64).max(120.0);

        let inside = Segment2D::new(p(1000.0, tolerance - 1.0), p(1900.0, tolerance - 1.0));
        let outside = Segment2D::new(p(1000.0, -tolerance - 1.0), p(1900.0, -tolerance - 1.0));

        assert!(project(&inside, &wall, 0.84).is_some());
        assert!(project(&outside, &wall, 0.84).is_none());
    }
}

#[test]
fn covering_opening_clamps_to_whole_wall() {
    for (length, angle_deg) in [(500.0, 0.0), (1234.5, 33.0), (4000.0, 90.0), (9000.0, -140.0)] {
        let angle: f64 = f64::to_radians(angle_deg);
        let start = p(100.0, 200.0);
        let end = p(
            start.x + length * angle.cos(),
            start.y + length * angle.sin(),
        );
        let wall = WallSegment::new(start, end, 200.0);

        let opening = Segment2D::new(
            CoordinateMapper::advance(&start, &end, -500.0),
            CoordinateMapper::advance(&start, &end, length + 500.0),
        );
        let projection = project(&opening, &wall, 0.84).unwrap();

        assert_relative_eq!(projection.span_start_mm, 0.0, epsilon = 1e-9);
        assert_relative_eq!(projection.span_end_mm, length, epsilon = 1e-9);
    }
}

#[test]
fn vertical_spans_and_cuts_partition_wall_height() {
    let mut rng = Lcg(7);

    for _ in 0..200 {
        let height = 1800.0 + rng.next_f64() * 4200.0;
        let cuts: Vec<(f64, f64)> = (0..(rng.next_f64() * 5.0) as usize)
            .map(|_| {
                let a = rng.next_f64() * height;
                let b = rng.next_f64() * height;
                (a.min(b), a.max(b))
            })
            .collect();

        let result = cuts.iter().fold(
            interval::IntervalSet::from_slice(&[(0.0, height)]),
            |acc, &cut| interval::subtract(&acc, cut),
        );

        // Spans are ordered and disjoint
        for pair in result.windows(2) {
            assert!(pair[0].1 <= pair[1].0);
        }

        // Every sample height strictly inside the wall is in a span or a cut
        for i in 0..=100 {
            let y = height * (i as f64 + 0.5) / 101.0;
            let in_span = result.iter().filter(|(a, b)| *a < y && y < *b).count();
            let in_cut = cuts.iter().any(|(a, b)| *a <= y && y <= *b);
            let on_span_edge = result.iter().any(|(a, b)| y == *a || y == *b);

            if in_cut {
                assert_eq!(in_span, 0, "height {} is both cut and solid", y);
            } else if !on_span_edge {
                assert_eq!(in_span, 1, "height {} is neither cut nor solid", y);
            }
        }
    }
}

#[test]
fn segmentation_is_idempotent() {
    let wall = south_wall();
    let openings = vec![
        AnchoredOpening {
            wall_index: 0,
            wall_id: None,
            span_start_mm: 300.4,
            span_end_mm: 1250.0,
            bottom_mm: 0.0,
            top_mm: 2100.0,
            score: 0.0,
        },
        AnchoredOpening {
            wall_index: 0,
            wall_id: None,
            span_start_mm: 1000.0,
            span_end_mm: 2600.0,
            bottom_mm: 800.0,
            top_mm: 2200.0,
            score: 0.0,
        },
    ];

    let first = segment(0, &wall, &openings, 2700.0);
    let second = segment(0, &wall, &openings, 2700.0);
    assert_eq!(first, second);

    let plan = PlanSnapshot::new(
        vec![wall.clone()],
        vec![
            OpeningSegment::door(p(300.0, 10.0), p(1250.0, 10.0)),
            OpeningSegment::window(p(1000.0, 0.0), p(2600.0, 0.0)),
        ],
    );
    let settings = RenderSettings::default();
    let projector = OpeningProjector::default();
    assert_eq!(plan.build(&settings, &projector), plan.build(&settings, &projector));
}

#[test]
fn wall_height_setting_is_clamped_before_segmenting() {
    let plan = PlanSnapshot::new(vec![south_wall()], Vec::new());
    let settings = RenderSettings {
        wall_height_mm: 12000.0,
        ..Default::default()
    };

    let geometry = plan.build(&settings, &OpeningProjector::default());
    assert_relative_eq!(geometry.wall_height_mm, 6000.0);
    assert_relative_eq!(geometry.pieces[0].piece.height(), 6000.0);
    assert_relative_eq!(geometry.pieces[0].size[1], 6.0, epsilon = 1e-12);
}

#[test]
fn anchored_band_matches_settings() {
    let door = OpeningSegment::door(p(1000.0, 0.0), p(1900.0, 0.0)).with_height(2000.0);
    let anchored = anchor_one(&door, &[south_wall()]).unwrap();
    assert_eq!(anchored.band(), HeightBand::new(0.0, 2000.0));
}

#[test]
fn wall_without_thickness_hosts_nothing() {
    for thickness in [-200.0, 0.0] {
        let wall = WallSegment::new(p(0.0, 0.0), p(4000.0, 0.0), thickness);
        let plan = PlanSnapshot::new(
            vec![wall],
            vec![OpeningSegment::door(p(1000.0, 0.0), p(1900.0, 0.0))],
        );

        let geometry = plan.build(&RenderSettings::default(), &OpeningProjector::default());

        assert!(geometry.pieces.is_empty());
        assert_eq!(geometry.anchored_count(), 0);
        assert!(geometry
            .issues
            .iter()
            .any(|issue| matches!(issue, PlanIssue::InvalidWallThickness { wall_index: 0, .. })));
    }
}
