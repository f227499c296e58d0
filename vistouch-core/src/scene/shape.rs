//! Shape kinds and their arguments
//!
//! Every drawable object carries exactly one [`Shape`]. Outline and filled
//! variants share argument structs; the variant decides how the object is
//! painted for display. For picking, every shape that covers area is
//! filled.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use crate::config::{MAX_PATH_LEN, MAX_TEXT_LEN};

/// Text object content
pub type TextBuf = String<MAX_TEXT_LEN>;

/// Image file path
pub type PathBuf = String<MAX_PATH_LEN>;

/// Shape kind tag, one per [`Shape`] variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DrawType {
    DrawPixel,
    DrawLine,
    DrawBezier,
    DrawWideLine,
    DrawRect,
    DrawRoundRect,
    DrawTriangle,
    DrawCircle,
    DrawEllipse,
    DrawArc,
    DrawEllipseArc,
    FillRect,
    FillRoundRect,
    FillTriangle,
    FillCircle,
    FillEllipse,
    FillArc,
    FillEllipseArc,
    DrawJpgFile,
    DrawPngFile,
    DrawString,
    ClipArc,
    ClipEllipseArc,
    ClipRect,
    ClipRoundRect,
    ClipCircle,
    ClipEllipse,
    ClipTriangle,
    FlexBox,
    TableBox,
}

/// Single pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelArgs {
    pub at: Point,
    pub color: Rgb565,
}

/// Straight one-pixel line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineArgs {
    pub start: Point,
    pub end: Point,
    pub color: Rgb565,
}

/// Quadratic Bézier curve through `p0` and `p2` with control point `p1`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BezierArgs {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub color: Rgb565,
}

/// Thick line with round caps of the given radius
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideLineArgs {
    pub start: Point,
    pub end: Point,
    pub radius: u32,
    pub color: Rgb565,
}

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RectArgs {
    pub area: Rectangle,
    pub color: Rgb565,
}

/// Rectangle with equal rounded corners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundRectArgs {
    pub area: Rectangle,
    pub radius: u32,
    pub color: Rgb565,
}

/// Triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleArgs {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub color: Rgb565,
}

/// Circle around a center point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircleArgs {
    pub center: Point,
    pub radius: u32,
    pub color: Rgb565,
}

/// Axis-aligned ellipse around a center point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipseArgs {
    pub center: Point,
    pub rx: u32,
    pub ry: u32,
    pub color: Rgb565,
}

/// Ring segment between an inner and an outer radius
///
/// Angles are in degrees, 0 pointing right and growing clockwise. The
/// segment runs clockwise from `start_deg` to `end_deg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArcArgs {
    pub center: Point,
    pub inner: u32,
    pub outer: u32,
    pub start_deg: i32,
    pub end_deg: i32,
    pub color: Rgb565,
}

/// Elliptical ring segment
///
/// Same angle convention as [`ArcArgs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EllipseArcArgs {
    pub center: Point,
    pub inner_x: u32,
    pub outer_x: u32,
    pub inner_y: u32,
    pub outer_y: u32,
    pub start_deg: i32,
    pub end_deg: i32,
    pub color: Rgb565,
}

/// Storage an image file is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataSource {
    #[default]
    Sd,
    Flash,
}

/// JPEG decoder downscale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JpegScale {
    #[default]
    Full,
    Half,
    Quarter,
    Eighth,
}

/// JPEG file placed on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JpegArgs {
    pub source: DataSource,
    pub path: PathBuf,
    pub at: Point,
    /// Clip size, zero means unbounded
    pub max_size: Size,
    /// Offset into the decoded image
    pub offset: Point,
    pub scale: JpegScale,
}

/// PNG file placed on the page
#[derive(Debug, Clone, PartialEq)]
pub struct PngArgs {
    pub source: DataSource,
    pub path: PathBuf,
    pub at: Point,
    /// Clip size, zero means unbounded
    pub max_size: Size,
    /// Offset into the decoded image
    pub offset: Point,
    pub scale_x: f32,
    pub scale_y: f32,
}

/// Anchor of a text string relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TextDatum {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    MiddleLeft,
    MiddleCenter,
    MiddleRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// Text string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextArgs {
    pub text: TextBuf,
    pub at: Point,
    pub color: Rgb565,
    /// Background fill behind the glyphs, transparent when `None`
    pub background: Option<Rgb565>,
    pub datum: TextDatum,
}

/// Flex container placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlexBoxArgs {
    pub area: Rectangle,
}

/// Table container placeholder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableBoxArgs {
    pub area: Rectangle,
    pub columns: u16,
    pub rows: u16,
}

/// Drawable shape with its geometry and paint color
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    DrawPixel(PixelArgs),
    DrawLine(LineArgs),
    DrawBezier(BezierArgs),
    DrawWideLine(WideLineArgs),
    DrawRect(RectArgs),
    DrawRoundRect(RoundRectArgs),
    DrawTriangle(TriangleArgs),
    DrawCircle(CircleArgs),
    DrawEllipse(EllipseArgs),
    DrawArc(ArcArgs),
    DrawEllipseArc(EllipseArcArgs),
    FillRect(RectArgs),
    FillRoundRect(RoundRectArgs),
    FillTriangle(TriangleArgs),
    FillCircle(CircleArgs),
    FillEllipse(EllipseArgs),
    FillArc(ArcArgs),
    FillEllipseArc(EllipseArcArgs),
    DrawJpgFile(JpegArgs),
    DrawPngFile(PngArgs),
    DrawString(TextArgs),
    ClipArc(ArcArgs),
    ClipEllipseArc(EllipseArcArgs),
    ClipRect(RectArgs),
    ClipRoundRect(RoundRectArgs),
    ClipCircle(CircleArgs),
    ClipEllipse(EllipseArgs),
    ClipTriangle(TriangleArgs),
    FlexBox(FlexBoxArgs),
    TableBox(TableBoxArgs),
}

impl Shape {
    /// Kind tag
    pub fn draw_type(&self) -> DrawType {
        match self {
            Shape::DrawPixel(_) => DrawType::DrawPixel,
            Shape::DrawLine(_) => DrawType::DrawLine,
            Shape::DrawBezier(_) => DrawType::DrawBezier,
            Shape::DrawWideLine(_) => DrawType::DrawWideLine,
            Shape::DrawRect(_) => DrawType::DrawRect,
            Shape::DrawRoundRect(_) => DrawType::DrawRoundRect,
            Shape::DrawTriangle(_) => DrawType::DrawTriangle,
            Shape::DrawCircle(_) => DrawType::DrawCircle,
            Shape::DrawEllipse(_) => DrawType::DrawEllipse,
            Shape::DrawArc(_) => DrawType::DrawArc,
            Shape::DrawEllipseArc(_) => DrawType::DrawEllipseArc,
            Shape::FillRect(_) => DrawType::FillRect,
            Shape::FillRoundRect(_) => DrawType::FillRoundRect,
            Shape::FillTriangle(_) => DrawType::FillTriangle,
            Shape::FillCircle(_) => DrawType::FillCircle,
            Shape::FillEllipse(_) => DrawType::FillEllipse,
            Shape::FillArc(_) => DrawType::FillArc,
            Shape::FillEllipseArc(_) => DrawType::FillEllipseArc,
            Shape::DrawJpgFile(_) => DrawType::DrawJpgFile,
            Shape::DrawPngFile(_) => DrawType::DrawPngFile,
            Shape::DrawString(_) => DrawType::DrawString,
            Shape::ClipArc(_) => DrawType::ClipArc,
            Shape::ClipEllipseArc(_) => DrawType::ClipEllipseArc,
            Shape::ClipRect(_) => DrawType::ClipRect,
            Shape::ClipRoundRect(_) => DrawType::ClipRoundRect,
            Shape::ClipCircle(_) => DrawType::ClipCircle,
            Shape::ClipEllipse(_) => DrawType::ClipEllipse,
            Shape::ClipTriangle(_) => DrawType::ClipTriangle,
            Shape::FlexBox(_) => DrawType::FlexBox,
            Shape::TableBox(_) => DrawType::TableBox,
        }
    }

    /// Check if the picking pass paints this shape
    ///
    /// Text, image, clip and container kinds never occupy touchable area.
    pub fn is_pickable(&self) -> bool {
        !matches!(
            self,
            Shape::DrawJpgFile(_)
                | Shape::DrawPngFile(_)
                | Shape::DrawString(_)
                | Shape::ClipArc(_)
                | Shape::ClipEllipseArc(_)
                | Shape::ClipRect(_)
                | Shape::ClipRoundRect(_)
                | Shape::ClipCircle(_)
                | Shape::ClipEllipse(_)
                | Shape::ClipTriangle(_)
                | Shape::FlexBox(_)
                | Shape::TableBox(_)
        )
    }
}

impl RectArgs {
    pub fn new(x: i32, y: i32, width: u32, height: u32, color: Rgb565) -> Self {
        Self {
            area: Rectangle::new(Point::new(x, y), Size::new(width, height)),
            color,
        }
    }
}

impl RoundRectArgs {
    pub fn new(x: i32, y: i32, width: u32, height: u32, radius: u32, color: Rgb565) -> Self {
        Self {
            area: Rectangle::new(Point::new(x, y), Size::new(width, height)),
            radius,
            color,
        }
    }
}

impl CircleArgs {
    pub fn new(x: i32, y: i32, radius: u32, color: Rgb565) -> Self {
        Self {
            center: Point::new(x, y),
            radius,
            color,
        }
    }
}

impl EllipseArgs {
    pub fn new(x: i32, y: i32, rx: u32, ry: u32, color: Rgb565) -> Self {
        Self {
            center: Point::new(x, y),
            rx,
            ry,
            color,
        }
    }
}

impl LineArgs {
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb565) -> Self {
        Self {
            start: Point::new(x0, y0),
            end: Point::new(x1, y1),
            color,
        }
    }
}

impl TextArgs {
    /// Text at a position, truncated to [`MAX_TEXT_LEN`] bytes
    pub fn new(text: &str, x: i32, y: i32, color: Rgb565) -> Self {
        let mut buf = TextBuf::new();
        for c in text.chars() {
            if buf.push(c).is_err() {
                break;
            }
        }
        Self {
            text: buf,
            at: Point::new(x, y),
            color,
            background: None,
            datum: TextDatum::TopLeft,
        }
    }
}
