//! Shape painting
//!
//! One paint routine serves both the visible render and the picking pass.
//! [`Ink::Own`] paints with the object's colors and honors the outline or
//! fill distinction. [`Ink::Pick`] replaces every color with the pick code
//! and fills closed shapes, since only covered area matters for picking.

use core::cmp::Ordering;

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyleBuilder;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{
    Circle, Ellipse, Line, PrimitiveStyle, RoundedRectangle, Triangle,
};
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

use super::shape::*;

/// Segments used to flatten a Bézier curve
const BEZIER_SEGMENTS: i64 = 16;

/// Largest radius passed on to `embedded-graphics`, keeps diameters and
/// bounding boxes inside `i32`
const MAX_RADIUS: u32 = (i32::MAX / 4) as u32;

/// Color override for a paint call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    /// Object's own colors
    Own,
    /// Solid pick color for every pixel the shape covers
    Pick(Rgb565),
}

impl Ink {
    fn color(self, own: Rgb565) -> Rgb565 {
        match self {
            Ink::Own => own,
            Ink::Pick(color) => color,
        }
    }

    /// Outline style for display, solid fill for picking
    fn outline(self, own: Rgb565) -> PrimitiveStyle<Rgb565> {
        match self {
            Ink::Own => PrimitiveStyle::with_stroke(own, 1),
            Ink::Pick(color) => PrimitiveStyle::with_fill(color),
        }
    }

    fn fill(self, own: Rgb565) -> PrimitiveStyle<Rgb565> {
        PrimitiveStyle::with_fill(self.color(own))
    }

    fn is_pick(self) -> bool {
        matches!(self, Ink::Pick(_))
    }
}

/// Image file collaborator
///
/// Decoding and file access live outside the engine. Images are drawn only
/// for display, never for picking.
pub trait ImageLoader {
    fn draw_jpeg<D>(&mut self, target: &mut D, args: &JpegArgs) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;

    fn draw_png<D>(&mut self, target: &mut D, args: &PngArgs) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}

/// Loader that skips every image
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageLoader for NoImages {
    fn draw_jpeg<D>(&mut self, _target: &mut D, _args: &JpegArgs) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Ok(())
    }

    fn draw_png<D>(&mut self, _target: &mut D, _args: &PngArgs) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        Ok(())
    }
}

impl Shape {
    /// Paint the shape into a target
    pub fn paint<D, L>(&self, target: &mut D, ink: Ink, images: &mut L) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
        L: ImageLoader,
    {
        match self {
            Shape::DrawPixel(a) => Pixel(a.at, ink.color(a.color)).draw(target),
            Shape::DrawLine(a) => Line::new(a.start, a.end)
                .into_styled(PrimitiveStyle::with_stroke(ink.color(a.color), 1))
                .draw(target),
            Shape::DrawBezier(a) => draw_bezier(target, a, ink.color(a.color)),
            Shape::DrawWideLine(a) => draw_wide_line(target, a, ink.color(a.color)),

            Shape::DrawRect(a) => a.area.into_styled(ink.outline(a.color)).draw(target),
            Shape::FillRect(a) => a.area.into_styled(ink.fill(a.color)).draw(target),
            Shape::DrawRoundRect(a) => round_rect(a)
                .into_styled(ink.outline(a.color))
                .draw(target),
            Shape::FillRoundRect(a) => round_rect(a).into_styled(ink.fill(a.color)).draw(target),
            Shape::DrawTriangle(a) => Triangle::new(a.p0, a.p1, a.p2)
                .into_styled(ink.outline(a.color))
                .draw(target),
            Shape::FillTriangle(a) => Triangle::new(a.p0, a.p1, a.p2)
                .into_styled(ink.fill(a.color))
                .draw(target),
            Shape::DrawCircle(a) => circle(a).into_styled(ink.outline(a.color)).draw(target),
            Shape::FillCircle(a) => circle(a).into_styled(ink.fill(a.color)).draw(target),
            Shape::DrawEllipse(a) => ellipse(a).into_styled(ink.outline(a.color)).draw(target),
            Shape::FillEllipse(a) => ellipse(a).into_styled(ink.fill(a.color)).draw(target),

            Shape::DrawArc(a) => draw_ring(
                target,
                &RingSegment::from(a),
                ink.color(a.color),
                !ink.is_pick(),
            ),
            Shape::FillArc(a) => {
                draw_ring(target, &RingSegment::from(a), ink.color(a.color), false)
            }
            Shape::DrawEllipseArc(a) => draw_ring(
                target,
                &RingSegment::from(a),
                ink.color(a.color),
                !ink.is_pick(),
            ),
            Shape::FillEllipseArc(a) => {
                draw_ring(target, &RingSegment::from(a), ink.color(a.color), false)
            }

            Shape::DrawJpgFile(a) if !ink.is_pick() => images.draw_jpeg(target, a),
            Shape::DrawPngFile(a) if !ink.is_pick() => images.draw_png(target, a),
            Shape::DrawString(a) if !ink.is_pick() => draw_text(target, a),

            // Clip regions and containers have no pixels of their own
            _ => Ok(()),
        }
    }
}

fn round_rect(a: &RoundRectArgs) -> RoundedRectangle {
    RoundedRectangle::with_equal_corners(a.area, Size::new(a.radius, a.radius))
}

/// Odd diameter for a radius, clamped to [`MAX_RADIUS`]
fn diameter(radius: u32) -> u32 {
    radius.min(MAX_RADIUS) * 2 + 1
}

fn circle(a: &CircleArgs) -> Circle {
    Circle::with_center(a.center, diameter(a.radius))
}

fn ellipse(a: &EllipseArgs) -> Ellipse {
    Ellipse::with_center(a.center, Size::new(diameter(a.rx), diameter(a.ry)))
}

fn draw_bezier<D>(target: &mut D, a: &BezierArgs, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let style = PrimitiveStyle::with_stroke(color, 1);
    let mut prev = a.p0;
    for step in 1..=BEZIER_SEGMENTS {
        let next = bezier_point(a, step);
        Line::new(prev, next).into_styled(style).draw(target)?;
        prev = next;
    }
    Ok(())
}

/// Point `step / BEZIER_SEGMENTS` along a quadratic curve, integer math
///
/// The weights sum to `n²`, so the result stays between the control points
/// and fits back into `i32`.
fn bezier_point(a: &BezierArgs, step: i64) -> Point {
    let n = BEZIER_SEGMENTS;
    let (u, t) = (n - step, step);
    let w0 = u * u;
    let w1 = 2 * u * t;
    let w2 = t * t;
    let n2 = n * n;
    let blend = |c0: i32, c1: i32, c2: i32| {
        ((w0 * c0 as i64 + w1 * c1 as i64 + w2 * c2 as i64) / n2) as i32
    };
    Point::new(
        blend(a.p0.x, a.p1.x, a.p2.x),
        blend(a.p0.y, a.p1.y, a.p2.y),
    )
}

fn draw_wide_line<D>(target: &mut D, a: &WideLineArgs, color: Rgb565) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let diameter = diameter(a.radius);
    Line::new(a.start, a.end)
        .into_styled(PrimitiveStyle::with_stroke(color, diameter))
        .draw(target)?;

    // Round caps
    let cap = PrimitiveStyle::with_fill(color);
    Circle::with_center(a.start, diameter)
        .into_styled(cap)
        .draw(target)?;
    Circle::with_center(a.end, diameter)
        .into_styled(cap)
        .draw(target)
}

fn draw_text<D>(target: &mut D, a: &TextArgs) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let mut character = MonoTextStyleBuilder::new()
        .font(&FONT_6X10)
        .text_color(a.color);
    if let Some(background) = a.background {
        character = character.background_color(background);
    }

    let (alignment, baseline) = match a.datum {
        TextDatum::TopLeft => (Alignment::Left, Baseline::Top),
        TextDatum::TopCenter => (Alignment::Center, Baseline::Top),
        TextDatum::TopRight => (Alignment::Right, Baseline::Top),
        TextDatum::MiddleLeft => (Alignment::Left, Baseline::Middle),
        TextDatum::MiddleCenter => (Alignment::Center, Baseline::Middle),
        TextDatum::MiddleRight => (Alignment::Right, Baseline::Middle),
        TextDatum::BottomLeft => (Alignment::Left, Baseline::Bottom),
        TextDatum::BottomCenter => (Alignment::Center, Baseline::Bottom),
        TextDatum::BottomRight => (Alignment::Right, Baseline::Bottom),
    };
    let text_style = TextStyleBuilder::new()
        .alignment(alignment)
        .baseline(baseline)
        .build();

    Text::with_text_style(&a.text, a.at, character.build(), text_style)
        .draw(target)
        .map(|_| ())
}

/// Elliptical ring segment in pixel units
///
/// Circular arcs are the special case with equal radii on both axes.
#[derive(Debug, Clone, Copy)]
struct RingSegment {
    center: Point,
    inner: (i64, i64),
    outer: (i64, i64),
    start_deg: i32,
    end_deg: i32,
}

impl From<&ArcArgs> for RingSegment {
    fn from(a: &ArcArgs) -> Self {
        Self {
            center: a.center,
            inner: (a.inner as i64, a.inner as i64),
            outer: (a.outer as i64, a.outer as i64),
            start_deg: a.start_deg,
            end_deg: a.end_deg,
        }
    }
}

impl From<&EllipseArcArgs> for RingSegment {
    fn from(a: &EllipseArcArgs) -> Self {
        Self {
            center: a.center,
            inner: (a.inner_x as i64, a.inner_y as i64),
            outer: (a.outer_x as i64, a.outer_y as i64),
            start_deg: a.start_deg,
            end_deg: a.end_deg,
        }
    }
}

impl RingSegment {
    /// Check if an offset from the center lies inside the segment
    fn contains(&self, dx: i64, dy: i64) -> bool {
        let (ox, oy) = self.outer;
        if ox <= 0 || oy <= 0 {
            return false;
        }
        if ellipse_cmp(dx, dy, ox, oy) == Ordering::Greater {
            return false;
        }
        let (ix, iy) = self.inner;
        if ix > 0 && iy > 0 && ellipse_cmp(dx, dy, ix, iy) == Ordering::Less {
            return false;
        }
        is_full_turn(self.start_deg, self.end_deg)
            || angle_in_sweep(
                atan2_deg(dy as f32, dx as f32),
                self.start_deg,
                self.end_deg,
            )
    }

    /// Inside, with at least one 4-neighbour outside
    fn on_edge(&self, dx: i64, dy: i64) -> bool {
        self.contains(dx, dy)
            && !(self.contains(dx - 1, dy)
                && self.contains(dx + 1, dy)
                && self.contains(dx, dy - 1)
                && self.contains(dx, dy + 1))
    }
}

/// Position of an offset relative to an axis-aligned ellipse
///
/// `Less` is inside, `Equal` on the boundary. Radii are at most `u32::MAX`
/// and offsets one past them, so every product fits in `u128`. A saturated
/// sum is always outside.
fn ellipse_cmp(dx: i64, dy: i64, rx: i64, ry: i64) -> Ordering {
    let sq = |v: i64| (v.unsigned_abs() as u128).pow(2);
    let lhs = (sq(dx) * sq(ry)).saturating_add(sq(dy) * sq(rx));
    lhs.cmp(&(sq(rx) * sq(ry)))
}

/// Paint a ring segment, visiting only offsets that land on the target
fn draw_ring<D>(
    target: &mut D,
    ring: &RingSegment,
    color: Rgb565,
    outline_only: bool,
) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb565>,
{
    let area = target.bounding_box();
    let Some(bottom_right) = area.bottom_right() else {
        return Ok(());
    };
    let center = ring.center;
    let (cx, cy) = (center.x as i64, center.y as i64);

    // Offset ranges covered by both the ring's box and the target
    let x0 = (-ring.outer.0).max(area.top_left.x as i64 - cx);
    let x1 = ring.outer.0.min(bottom_right.x as i64 - cx);
    let y0 = (-ring.outer.1).max(area.top_left.y as i64 - cy);
    let y1 = ring.outer.1.min(bottom_right.y as i64 - cy);
    if x0 > x1 || y0 > y1 {
        return Ok(());
    }

    let pixels = (y0..=y1)
        .flat_map(move |dy| (x0..=x1).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| {
            if outline_only {
                ring.on_edge(dx, dy)
            } else {
                ring.contains(dx, dy)
            }
        })
        .map(move |(dx, dy)| Pixel(Point::new((cx + dx) as i32, (cy + dy) as i32), color));

    target.draw_iter(pixels)
}

/// Angle of a screen-space vector in degrees, clockwise from +X, `[0, 360)`
///
/// Polynomial approximation, good to about 0.1 degree.
fn atan2_deg(y: f32, x: f32) -> f32 {
    if x == 0.0 && y == 0.0 {
        return 0.0;
    }
    let ax = if x < 0.0 { -x } else { x };
    let ay = if y < 0.0 { -y } else { y };

    let (ratio, swapped) = if ax >= ay { (ay / ax, false) } else { (ax / ay, true) };
    let radians = core::f32::consts::FRAC_PI_4 * ratio
        - ratio * (ratio - 1.0) * (0.2447 + 0.0663 * ratio);
    let mut base = radians.to_degrees();
    if swapped {
        base = 90.0 - base;
    }

    match (x < 0.0, y < 0.0) {
        (false, false) => base,
        (true, false) => 180.0 - base,
        (true, true) => 180.0 + base,
        (false, true) => {
            if base == 0.0 {
                0.0
            } else {
                360.0 - base
            }
        }
    }
}

/// Check if a sweep covers the whole circle
fn is_full_turn(start: i32, end: i32) -> bool {
    (end as i64 - start as i64).abs() >= 360
}

/// Check if an angle lies on the clockwise sweep from `start` to `end`
fn angle_in_sweep(angle: f32, start: i32, end: i32) -> bool {
    if is_full_turn(start, end) {
        return true;
    }
    let start = start.rem_euclid(360) as f32;
    let end = end.rem_euclid(360) as f32;
    if start <= end {
        angle >= start && angle <= end
    } else {
        angle >= start || angle <= end
    }
}
