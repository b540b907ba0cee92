//! SVG markup for the logo.
//!
//! Geometry is expressed in the 400 px logo box: the shape layer fills it through a
//! `0 0 300 300` viewBox, and the stars sit in the centered 200 px square.

use std::fmt::Write as _;

use kurbo::{Affine, Vec2};

use crate::{
    foundation::core::Transform2D,
    logo::{
        scene::{FrameScene, ShapeLayer},
        shapes::SHAPE_VIEWBOX,
        styles::LayerPose,
    },
};

/// Logo box side in CSS pixels.
pub const LOGO_BOX_PX: f64 = 400.0;
/// Star overlay side in CSS pixels.
pub const STAR_BOX_PX: f64 = 200.0;

pub const GRADIENT_ID: &str = "morphGradient";

/// Where the star images live, for the full-frame document.
#[derive(Clone, Debug)]
pub struct StarHrefs {
    pub white: String,
    pub black: String,
}

impl Default for StarHrefs {
    fn default() -> Self {
        Self {
            white: "white-star.png".to_owned(),
            black: "black-star.png".to_owned(),
        }
    }
}

fn svg_matrix(a: Affine) -> String {
    let [a, b, c, d, e, f] = a.as_coeffs();
    format!("matrix({a:.6} {b:.6} {c:.6} {d:.6} {e:.6} {f:.6})")
}

fn shape_pose_affine(pose: LayerPose) -> Affine {
    let center = SHAPE_VIEWBOX / 2.0;
    Transform2D::about(Vec2::new(center, center), pose.rotate_deg, pose.scale).to_affine()
}

fn write_shape_contents(out: &mut String, shape: &ShapeLayer) {
    let [start, end] = shape.gradient;
    let _ = write!(
        out,
        r#"<defs><linearGradient id="{GRADIENT_ID}" x1="0" y1="0" x2="1" y2="1"><stop offset="0%" stop-color="{}" class="gradient-start"/><stop offset="100%" stop-color="{}" class="gradient-end"/></linearGradient></defs>"#,
        start.to_hex(),
        end.to_hex()
    );
    let _ = write!(
        out,
        r#"<g class="{}" transform="{}" opacity="{:.4}"><path class="morph-path" d="{}" fill="url(#{GRADIENT_ID})"/></g>"#,
        shape.class.css_name(),
        svg_matrix(shape_pose_affine(shape.pose)),
        shape.pose.opacity.clamp(0.0, 1.0),
        shape.path.to_svg()
    );
}

/// Standalone SVG of the shape layer, `size_px` on a side.
pub fn shape_layer_svg(shape: &ShapeLayer, size_px: u32) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size_px}" height="{size_px}" viewBox="0 0 {SHAPE_VIEWBOX} {SHAPE_VIEWBOX}">"#
    );
    write_shape_contents(&mut out, shape);
    out.push_str("</svg>");
    out
}

/// Top-left corner of the star box in the logo box.
pub const STAR_BOX_ORIGIN: f64 = (LOGO_BOX_PX - STAR_BOX_PX) / 2.0;

fn star_pose_affine(pose: LayerPose) -> Affine {
    let center = LOGO_BOX_PX / 2.0;
    Transform2D::about(Vec2::new(center, center), pose.rotate_deg, pose.scale).to_affine()
}

/// Transform placing a `side`-pixel star image into the star box, posed about the box center.
pub fn star_affine(pose: LayerPose, image_side: f64) -> Affine {
    star_pose_affine(pose)
        * Affine::translate(Vec2::new(STAR_BOX_ORIGIN, STAR_BOX_ORIGIN))
        * Affine::scale(STAR_BOX_PX / image_side)
}

/// Full frame as one SVG document: shape layer plus both star images by reference.
pub fn frame_document_svg(scene: &FrameScene, hrefs: &StarHrefs) -> String {
    let mut out = String::new();
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{LOGO_BOX_PX}" height="{LOGO_BOX_PX}" viewBox="0 0 {LOGO_BOX_PX} {LOGO_BOX_PX}">"#
    );
    let _ = write!(
        out,
        r#"<svg x="0" y="0" width="{LOGO_BOX_PX}" height="{LOGO_BOX_PX}" viewBox="0 0 {SHAPE_VIEWBOX} {SHAPE_VIEWBOX}">"#
    );
    write_shape_contents(&mut out, &scene.shape);
    out.push_str("</svg>");

    for (name, layer, href) in [
        ("white", &scene.white_star, &hrefs.white),
        ("black", &scene.black_star, &hrefs.black),
    ] {
        let display = if layer.visible { "inline" } else { "none" };
        let class = match layer.class {
            Some(anim) => format!("star {name}-star {anim}"),
            None => format!("star {name}-star"),
        };
        // The pose sits in `transform` alone so a CSS animation can replace it.
        let _ = write!(
            out,
            r#"<image class="{class}" href="{href}" xlink:href="{href}" x="{STAR_BOX_ORIGIN}" y="{STAR_BOX_ORIGIN}" width="{STAR_BOX_PX}" height="{STAR_BOX_PX}" preserveAspectRatio="xMidYMid slice" transform="{}" opacity="{:.4}" display="{display}"/>"#,
            svg_matrix(star_pose_affine(layer.pose)),
            layer.pose.opacity.clamp(0.0, 1.0),
        );
    }
    out.push_str("</svg>");
    out
}
