// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Drawing sky scenes.
//!
//! A scene is drawn on a polar "dome": the zenith is at the centre of the
//! image, the horizon is a ring 90° out, and direction labels sit just outside
//! the ring. Sizes are specified in points, as in print, and converted to
//! pixels with the DPI.

mod error;
mod palette;

pub use error::RenderError;
pub use palette::{parse_hex_colour, to_hex, Palette};

use std::path::Path;

use log::trace;
use plotters::{
    coord::Shift,
    prelude::*,
    style::{
        text_anchor::{HPos, Pos, VPos},
        FontDesc, FontStyle, RGBColor,
    },
};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::{
    constants::{
        BRIGHT_STAR_MAGNITUDE, BRIGHT_STAR_SIZE_FACTOR, DEFAULT_BASE_MARKER_SIZE,
        DOME_LABEL_RADIUS_DEG, DOME_OUTER_LIMIT_DEG, DOME_RADIUS_DEG, POINTS_PER_INCH,
    },
    projection::{ProjectedPoint, SkyScene},
};

/// The dome's outer limit spans this fraction of the smaller image
/// dimension.
const DOME_FILL_FRACTION: f64 = 0.77;

const DIRECTION_FONT_PT: f64 = 12.0;
const DEGREE_FONT_PT: f64 = 10.0;
const CONSTELLATION_FONT_PT: f64 = 8.0;
const CONSTELLATION_LINE_WIDTH_PT: f64 = 0.6;

const DIRECTIONS: [(&str, f64); 4] = [("N", 0.0), ("E", 90.0), ("S", 180.0), ("W", 270.0)];

/// Which way azimuth runs around the dome.
#[derive(
    Debug,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Clockwise with north at the top, like a compass; east is on the right.
    #[default]
    Compass,

    /// Counter-clockwise with north at the top, as seen looking up at the
    /// sky; east is on the left.
    Sky,
}

/// How to draw a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// The width and height of the image \[inches\].
    pub figure_size_in: f64,

    pub dpi: u32,

    /// The font family for all text.
    pub font: String,

    pub orientation: Orientation,

    pub palette: Palette,

    /// The width of the horizon ring \[points\].
    pub border_width_pt: f64,

    /// Draw constellation lines, if the scene has them.
    pub constellation_lines: bool,

    /// Draw constellation names, if the scene has them.
    pub constellation_labels: bool,

    /// Label every 10° of azimuth around the dome.
    pub degree_labels: bool,

    /// The marker area of a magnitude 0 star \[points²\].
    pub base_marker_size: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            figure_size_in: 12.0,
            dpi: 300,
            font: "sans-serif".to_string(),
            orientation: Orientation::default(),
            palette: Palette::default(),
            border_width_pt: 2.0,
            constellation_lines: true,
            constellation_labels: true,
            degree_labels: true,
            base_marker_size: DEFAULT_BASE_MARKER_SIZE,
        }
    }
}

impl RenderSettings {
    pub fn validate(&self) -> Result<(), RenderError> {
        if !(self.figure_size_in.is_finite() && self.figure_size_in > 0.0) {
            return Err(RenderError::BadFigureSize(self.figure_size_in));
        }
        if self.dpi == 0 {
            return Err(RenderError::BadDpi);
        }
        self.image_size().map(|_| ())
    }

    /// The width (and height) of the image \[pixels\].
    pub fn image_size(&self) -> Result<u32, RenderError> {
        let pixels = (self.figure_size_in * self.dpi as f64).round();
        // Bitmaps bigger than this are unreasonable.
        if pixels > 20000.0 {
            return Err(RenderError::TooBig(pixels as u64));
        }
        Ok((pixels as u32).max(1))
    }

    fn pt_to_px(&self, pt: f64) -> f64 {
        pt * self.dpi as f64 / POINTS_PER_INCH
    }
}

/// The marker area for a star of the given magnitude \[points²\]. Each
/// magnitude is a factor of 10^0.4 in area. Stars at or brighter than
/// magnitude 2 are shrunk so they don't swamp their surroundings.
pub fn marker_size(magnitude: f64, base_size: f64) -> f64 {
    let size = base_size * 10_f64.powf(-magnitude / 2.5);
    if is_bright(magnitude) {
        size * BRIGHT_STAR_SIZE_FACTOR
    } else {
        size
    }
}

fn is_bright(magnitude: f64) -> bool {
    magnitude <= BRIGHT_STAR_MAGNITUDE
}

/// Where the dome is on an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomeGeometry {
    centre: (f64, f64),
    /// Pixels per degree of zenith distance.
    scale: f64,
    orientation: Orientation,
}

impl DomeGeometry {
    pub fn new(width: u32, height: u32, orientation: Orientation) -> DomeGeometry {
        let outer_radius = DOME_FILL_FRACTION * width.min(height) as f64 / 2.0;
        DomeGeometry {
            centre: (width as f64 / 2.0, height as f64 / 2.0),
            scale: outer_radius / DOME_OUTER_LIMIT_DEG,
            orientation,
        }
    }

    /// The pixel radius of a zenith distance.
    pub fn radius_px(&self, radius_deg: f64) -> f64 {
        radius_deg * self.scale
    }

    pub fn centre_px(&self) -> (i32, i32) {
        (self.centre.0.round() as i32, self.centre.1.round() as i32)
    }

    /// The pixel coordinates of a dome position. Image y runs downwards.
    pub fn polar_to_pixel(&self, radius_deg: f64, theta_rad: f64) -> (i32, i32) {
        let r = self.radius_px(radius_deg);
        let (s, c) = theta_rad.sin_cos();
        let x = match self.orientation {
            Orientation::Compass => self.centre.0 + r * s,
            Orientation::Sky => self.centre.0 - r * s,
        };
        let y = self.centre.1 - r * c;
        (x.round() as i32, y.round() as i32)
    }

    pub fn to_pixel(&self, point: &ProjectedPoint) -> (i32, i32) {
        self.polar_to_pixel(point.radius_deg, point.theta_rad)
    }

    /// How far text at `azimuth_deg` is turned clockwise on the image
    /// \[radians\], so that the tops of the letters face outwards.
    pub fn text_angle(&self, azimuth_deg: f64) -> f64 {
        match self.orientation {
            Orientation::Compass => azimuth_deg.to_radians(),
            Orientation::Sky => -azimuth_deg.to_radians(),
        }
    }
}

/// Turn a square greyscale coverage mask clockwise by `angle_rad` about its
/// centre. Returns the covered pixels as offsets from the centre with their
/// coverage in 0..=1. Nearest-neighbour sampling.
fn rotate_mask(mask: &[u8], side: u32, angle_rad: f64) -> Vec<(i32, i32, f64)> {
    let half = side as f64 / 2.0;
    let (sin, cos) = angle_rad.sin_cos();
    let reach = (half * std::f64::consts::SQRT_2).ceil() as i32;
    let mut covered = vec![];
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let (x, y) = (dx as f64, dy as f64);
            // Inverse of the clockwise turn (image y runs downwards).
            let sx = (x * cos + y * sin + half).floor();
            let sy = (-x * sin + y * cos + half).floor();
            if sx < 0.0 || sy < 0.0 || sx >= side as f64 || sy >= side as f64 {
                continue;
            }
            let value = mask[sy as usize * side as usize + sx as usize];
            if value > 0 {
                covered.push((dx, dy, value as f64 / 255.0));
            }
        }
    }
    covered
}

/// Draw `text` centred on `pos` and turned clockwise by `angle_rad`.
/// `plotters` only turns text in quarters, so the text is drawn upright into
/// a scratch bitmap, which is then turned and blended onto `area`.
fn draw_turned_text<DB>(
    area: &Area<DB>,
    text: &str,
    font: FontDesc,
    colour: RGBColor,
    pos: (i32, i32),
    angle_rad: f64,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let side = (font.get_size() * (text.chars().count() as f64 + 2.0)).ceil() as u32;
    let mut buffer = vec![0; side as usize * side as usize * 3];
    {
        let scratch = BitMapBackend::with_buffer(&mut buffer, (side, side)).into_drawing_area();
        let style = font
            .color(&WHITE)
            .pos(Pos::new(HPos::Center, VPos::Center));
        let centre = (side as i32 / 2, side as i32 / 2);
        scratch
            .draw_text(text, &style, centre)
            .map_err(plotters_err)?;
        scratch.present().map_err(plotters_err)?;
    }
    // White text on black, so any channel is the coverage.
    let mask: Vec<u8> = buffer.chunks_exact(3).map(|rgb| rgb[0]).collect();

    for (dx, dy, coverage) in rotate_mask(&mask, side, angle_rad) {
        area.draw_pixel((pos.0 + dx, pos.1 + dy), &colour.mix(coverage))
            .map_err(plotters_err)?;
    }
    Ok(())
}

fn plotters_err<E: std::error::Error + Send + Sync + 'static>(e: E) -> RenderError {
    RenderError::Plotters(Box::new(e))
}

type Area<DB> = DrawingArea<DB, Shift>;

/// The background, the dome and its ring.
pub(crate) fn draw_dome<DB>(
    area: &Area<DB>,
    geometry: &DomeGeometry,
    settings: &RenderSettings,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let palette = &settings.palette;
    area.fill(&palette.background).map_err(plotters_err)?;

    let centre = geometry.centre_px();
    let outer = geometry.radius_px(DOME_OUTER_LIMIT_DEG).round() as i32;
    area.draw(&Circle::new(centre, outer, palette.dome.filled()))
        .map_err(plotters_err)?;

    let ring = geometry.radius_px(DOME_RADIUS_DEG).round() as i32;
    let width = settings.pt_to_px(settings.border_width_pt).round().max(1.0) as u32;
    area.draw(&Circle::new(centre, ring, palette.border.stroke_width(width)))
        .map_err(plotters_err)?;
    Ok(())
}

/// Direction letters, and optionally degree labels, just outside the ring.
pub(crate) fn draw_direction_labels<DB>(
    area: &Area<DB>,
    geometry: &DomeGeometry,
    settings: &RenderSettings,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let font = settings.font.as_str();

    for (letter, azimuth) in DIRECTIONS {
        let pos = geometry.polar_to_pixel(DOME_LABEL_RADIUS_DEG, azimuth.to_radians());
        draw_turned_text(
            area,
            letter,
            (font, settings.pt_to_px(DIRECTION_FONT_PT), FontStyle::Bold).into_font(),
            settings.palette.direction_text,
            pos,
            geometry.text_angle(azimuth),
        )?;
    }

    if settings.degree_labels {
        for azimuth in (0..360).step_by(10).filter(|a| a % 90 != 0) {
            let azimuth = azimuth as f64;
            let pos = geometry.polar_to_pixel(DOME_LABEL_RADIUS_DEG, azimuth.to_radians());
            draw_turned_text(
                area,
                &format!("{azimuth}°"),
                (font, settings.pt_to_px(DEGREE_FONT_PT)).into_font(),
                settings.palette.degree_text,
                pos,
                geometry.text_angle(azimuth),
            )?;
        }
    }
    Ok(())
}

pub(crate) fn draw_stars<DB>(
    area: &Area<DB>,
    geometry: &DomeGeometry,
    settings: &RenderSettings,
    stars: &[ProjectedPoint],
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let palette = &settings.palette;
    for star in stars {
        let magnitude = star.magnitude.unwrap_or(0.0);
        let colour = star_colour(magnitude, palette);
        // The marker size is the area of the marker's bounding square.
        let size = marker_size(magnitude, settings.base_marker_size);
        let diameter_px = settings.pt_to_px(size.sqrt());
        let pos = geometry.to_pixel(star);
        if diameter_px < 1.0 {
            // Too small for a circle; dim a single pixel instead.
            area.draw_pixel(pos, &colour.mix(diameter_px.max(0.05)))
                .map_err(plotters_err)?;
        } else {
            let radius = (diameter_px / 2.0).round().max(1.0) as i32;
            area.draw(&Circle::new(pos, radius, colour.filled()))
                .map_err(plotters_err)?;
        }
    }
    Ok(())
}

pub(crate) fn draw_constellation_lines<DB>(
    area: &Area<DB>,
    geometry: &DomeGeometry,
    settings: &RenderSettings,
    segments: &[(ProjectedPoint, ProjectedPoint)],
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let width = settings
        .pt_to_px(CONSTELLATION_LINE_WIDTH_PT)
        .round()
        .max(1.0) as u32;
    let style = settings.palette.constellation_line.stroke_width(width);
    for (start, end) in segments {
        area.draw(&PathElement::new(
            vec![geometry.to_pixel(start), geometry.to_pixel(end)],
            style,
        ))
        .map_err(plotters_err)?;
    }
    Ok(())
}

/// Draw one scene onto a drawing area. The area is expected to be square.
pub fn draw_scene<DB>(
    area: &Area<DB>,
    scene: &SkyScene,
    settings: &RenderSettings,
) -> Result<(), RenderError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, height) = area.dim_in_pixel();
    let geometry = DomeGeometry::new(width, height, settings.orientation);

    draw_dome(area, &geometry, settings)?;
    draw_direction_labels(area, &geometry, settings)?;
    draw_stars(area, &geometry, settings, &scene.stars)?;

    if scene.has_constellations && settings.constellation_lines {
        draw_constellation_lines(area, &geometry, settings, &scene.segments)?;
    }
    if scene.has_constellations && settings.constellation_labels {
        let style = (settings.font.as_str(), settings.pt_to_px(CONSTELLATION_FONT_PT))
            .into_font()
            .color(&settings.palette.constellation_text)
            .pos(Pos::new(HPos::Center, VPos::Bottom));
        for label in &scene.labels {
            area.draw_text(&label.text, &style, geometry.to_pixel(&label.point))
                .map_err(plotters_err)?;
        }
    }
    Ok(())
}

/// Render a scene to a PNG file.
pub fn render_png(
    scene: &SkyScene,
    settings: &RenderSettings,
    path: &Path,
) -> Result<(), RenderError> {
    settings.validate()?;
    let size = settings.image_size()?;
    trace!("Rendering {} ({size} x {size} px)", path.display());

    let root = BitMapBackend::new(path, (size, size)).into_drawing_area();
    draw_scene(&root, scene, settings)?;
    root.present().map_err(|e| RenderError::Write {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;
    Ok(())
}

/// The colour a star of the given magnitude is drawn with.
pub fn star_colour(magnitude: f64, palette: &Palette) -> RGBColor {
    if is_bright(magnitude) {
        palette.bright_star
    } else {
        palette.star
    }
}
