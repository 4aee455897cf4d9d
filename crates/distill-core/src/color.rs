//! # Color Module
//!
//! Converts raw paints and 0..=1 float colors into canonical tokens.
//!
//! ## Responsibilities
//! - **Colors**: float RGBA -> `#RRGGBB` + composed opacity, or an `rgba(...)` string.
//! - **Paints**: solid, image and the four gradient kinds -> `SimplifiedPaint`.
//!
//! Unknown paint kinds are an error, never silently dropped.

use crate::errors::PaintError;
use crate::types::{ColorValue, Gradient, GradientStop, SimplifiedPaint};
use distill_data::model::{Color, Paint};
use std::str::FromStr;

/// The paint kinds the normalizer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintKind {
    Solid,
    Image,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
}

impl FromStr for PaintKind {
    type Err = PaintError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        match tag {
            "SOLID" => Ok(PaintKind::Solid),
            "IMAGE" => Ok(PaintKind::Image),
            "GRADIENT_LINEAR" => Ok(PaintKind::GradientLinear),
            "GRADIENT_RADIAL" => Ok(PaintKind::GradientRadial),
            "GRADIENT_ANGULAR" => Ok(PaintKind::GradientAngular),
            "GRADIENT_DIAMOND" => Ok(PaintKind::GradientDiamond),
            other => Err(PaintError::UnknownPaintType(other.to_string())),
        }
    }
}

/// Rounds to two decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn channel(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// `opacity * color.a`, rounded to two decimals and clamped to 0..=1.
pub fn compose_opacity(color: &Color, opacity: f64) -> f64 {
    round2(opacity * color.a).clamp(0.0, 1.0)
}

/// Uppercase `#RRGGBB` for a float color; alpha is ignored.
pub fn to_hex(color: &Color) -> String {
    format!(
        "#{:02X}{:02X}{:02X}",
        channel(color.r),
        channel(color.g),
        channel(color.b)
    )
}

/// Converts a float color plus a paint opacity into a color token.
pub fn convert_color(color: &Color, opacity: f64) -> ColorValue {
    ColorValue {
        hex: to_hex(color),
        opacity: compose_opacity(color, opacity),
    }
}

/// `rgba(R, G, B, A)` with 0..=255 channels and the composed opacity.
pub fn format_rgba(color: &Color, opacity: f64) -> String {
    format!(
        "rgba({}, {}, {}, {})",
        channel(color.r),
        channel(color.g),
        channel(color.b),
        compose_opacity(color, opacity)
    )
}

/// Normalizes one fill or stroke entry.
pub fn parse_paint(paint: &Paint) -> Result<SimplifiedPaint, PaintError> {
    let kind: PaintKind = paint.kind.parse()?;
    let simplified = match kind {
        PaintKind::Solid => {
            let color = paint
                .color
                .as_ref()
                .ok_or_else(|| PaintError::MissingColor(paint.kind.clone()))?;
            let ColorValue { hex, opacity } = convert_color(color, paint.opacity.unwrap_or(1.0));
            SimplifiedPaint::Solid { hex, opacity }
        }
        PaintKind::Image => SimplifiedPaint::Image {
            image_ref: paint.image_ref.clone(),
            scale_mode: paint.scale_mode.clone(),
        },
        PaintKind::GradientLinear => SimplifiedPaint::GradientLinear(gradient(paint)),
        PaintKind::GradientRadial => SimplifiedPaint::GradientRadial(gradient(paint)),
        PaintKind::GradientAngular => SimplifiedPaint::GradientAngular(gradient(paint)),
        PaintKind::GradientDiamond => SimplifiedPaint::GradientDiamond(gradient(paint)),
    };
    Ok(simplified)
}

/// Normalizes an ordered paint list, skipping hidden entries.
pub fn parse_paints(paints: &[Paint]) -> Result<Vec<SimplifiedPaint>, PaintError> {
    paints
        .iter()
        .filter(|p| p.is_visible())
        .map(parse_paint)
        .collect()
}

fn gradient(paint: &Paint) -> Gradient {
    Gradient {
        gradient_handle_positions: paint.gradient_handle_positions.clone().unwrap_or_default(),
        gradient_stops: paint
            .gradient_stops
            .iter()
            .flatten()
            .map(|stop| GradientStop {
                position: stop.position,
                color: convert_color(&stop.color, 1.0),
            })
            .collect(),
    }
}
