//! Scripted curve shared by enemy ships and power-ups
//!
//! The curve is a chain of cubic Bézier segments expressed as offsets from
//! the spawn point. Entities traverse it at constant speed, so the curve is
//! flattened once into an arc-length table and sampled by distance.

use glam::Vec2;

/// Polyline samples per cubic segment when flattening
const SAMPLES_PER_SEGMENT: usize = 24;

/// One cubic segment; its start is the previous segment's end
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub c1: Vec2,
    pub c2: Vec2,
    pub end: Vec2,
}

impl CubicSegment {
    pub const fn new(c1: Vec2, c2: Vec2, end: Vec2) -> Self {
        Self { c1, c2, end }
    }
}

/// Point on a cubic Bézier at parameter `t`
#[inline]
pub fn cubic_point(p0: Vec2, c1: Vec2, c2: Vec2, p3: Vec2, t: f32) -> Vec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + c1 * (3.0 * u * u * t) + c2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Position and heading at a point along the curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathSample {
    /// Offset from the path's owner origin
    pub offset: Vec2,
    /// Tangent direction (radians)
    pub heading: f32,
}

/// A flattened multi-segment Bézier path
#[derive(Debug, Clone)]
pub struct BezierPath {
    points: Vec<Vec2>,
    /// Cumulative arc length at each point (same length as `points`)
    lengths: Vec<f32>,
    segment_count: usize,
}

impl BezierPath {
    pub fn new(start: Vec2, segments: &[CubicSegment]) -> Self {
        assert!(!segments.is_empty(), "a path needs at least one segment");

        let mut points = Vec::with_capacity(segments.len() * SAMPLES_PER_SEGMENT + 1);
        points.push(start);
        let mut p0 = start;
        for seg in segments {
            for i in 1..=SAMPLES_PER_SEGMENT {
                let t = i as f32 / SAMPLES_PER_SEGMENT as f32;
                points.push(cubic_point(p0, seg.c1, seg.c2, seg.end, t));
            }
            p0 = seg.end;
        }

        let mut lengths = Vec::with_capacity(points.len());
        let mut total = 0.0;
        lengths.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance(pair[1]);
            lengths.push(total);
        }

        Self {
            points,
            lengths,
            segment_count: segments.len(),
        }
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    pub fn start(&self) -> Vec2 {
        self.points[0]
    }

    pub fn end(&self) -> Vec2 {
        self.points[self.points.len() - 1]
    }

    /// Sample at normalized progress `t` in [0, 1], constant speed along the curve
    pub fn sample(&self, t: f32) -> PathSample {
        let total = self.length();
        if total <= f32::EPSILON {
            return PathSample {
                offset: self.start(),
                heading: 0.0,
            };
        }

        let target = t.clamp(0.0, 1.0) * total;
        let last = self.points.len() - 1;
        let i = self.lengths.partition_point(|&l| l < target).clamp(1, last);

        let span = self.lengths[i] - self.lengths[i - 1];
        let local = if span > f32::EPSILON {
            (target - self.lengths[i - 1]) / span
        } else {
            0.0
        };

        PathSample {
            offset: self.points[i - 1].lerp(self.points[i], local),
            heading: self.heading_near(i),
        }
    }

    /// Heading of the nearest non-degenerate polyline step at or after `i`
    fn heading_near(&self, i: usize) -> f32 {
        let forward = (i..self.points.len()).chain((1..i).rev());
        for j in forward {
            let d = self.points[j] - self.points[j - 1];
            if d.length_squared() > 1e-8 {
                return d.y.atan2(d.x);
            }
        }
        0.0
    }
}

/// The weaving dive flown by enemies and power-ups.
///
/// Nine segments; the first eight descend about 560 units with sharp
/// switchbacks and the last one runs off to `-screen_height`.
pub fn scripted_curve(screen_height: f32) -> BezierPath {
    let y_max = -screen_height;
    let v = Vec2::new;
    let segments = [
        CubicSegment::new(v(0.5, -0.5), v(4.55, -29.48), v(-2.5, -59.5)),
        CubicSegment::new(v(-9.55, -89.52), v(-43.32, -115.43), v(-27.5, -154.5)),
        CubicSegment::new(v(-11.68, -193.57), v(17.28, -186.95), v(30.5, -243.5)),
        CubicSegment::new(v(43.72, -300.05), v(-47.71, -335.76), v(-52.5, -379.5)),
        CubicSegment::new(v(-57.29, -423.24), v(-8.14, -482.45), v(54.5, -449.5)),
        CubicSegment::new(v(117.14, -416.55), v(52.25, -308.62), v(-5.5, -348.5)),
        CubicSegment::new(v(-63.25, -388.38), v(-14.48, -457.43), v(10.5, -494.5)),
        CubicSegment::new(v(23.74, -514.16), v(6.93, -537.57), v(0.5, -559.5)),
        CubicSegment::new(v(-5.2, y_max), v(-2.5, y_max), v(-2.5, y_max)),
    ];
    BezierPath::new(v(0.5, -0.5), &segments)
}
