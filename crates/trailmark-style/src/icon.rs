//! Icon coloring.
//!
//! Button icons ship as single-color masks. They are painted with scheme
//! colors at load time: `<id>/icon` for the normal state and
//! `<id>/icon_disabled` for the disabled state.

use std::path::Path;

use image::RgbaImage;
use trailmark_core::logging::targets;

use crate::template::ColorSource;
use crate::{Color, Error, Result};

/// Paint `color` over every visible pixel of `image`.
///
/// Composites with "source atop": each pixel keeps its own alpha while its
/// color is blended toward `color` by the color's alpha.
#[must_use]
pub fn colorize(image: &RgbaImage, color: Color) -> RgbaImage {
    let mut out = image.clone();
    let alpha = u16::from(color.a);
    let blend = |src: u8, dst: u8| -> u8 {
        ((u16::from(src) * alpha + u16::from(dst) * (255 - alpha) + 127) / 255) as u8
    };

    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [blend(color.r, r), blend(color.g, g), blend(color.b, b), a];
    }
    out
}

/// A button icon in its normal and disabled variants.
#[derive(Debug, Clone)]
pub struct ButtonIcon {
    pub normal: RgbaImage,
    pub disabled: RgbaImage,
}

impl ButtonIcon {
    /// Load an icon mask and color it with `<color_id>/icon` and
    /// `<color_id>/icon_disabled` from `colors`.
    pub fn load(path: impl AsRef<Path>, colors: &dyn ColorSource, color_id: &str) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| Error::Image {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?
            .to_rgba8();

        Self::from_image(&image, colors, color_id)
    }

    /// Color an already decoded mask.
    pub fn from_image(image: &RgbaImage, colors: &dyn ColorSource, color_id: &str) -> Result<Self> {
        let normal = Color::parse(&colors.color(&format!("{color_id}/icon")))?;
        let disabled = Color::parse(&colors.color(&format!("{color_id}/icon_disabled")))?;
        tracing::trace!(target: targets::COLOR_SCHEME, color_id, %normal, %disabled, "coloring button icon");

        Ok(Self {
            normal: colorize(image, normal),
            disabled: colorize(image, disabled),
        })
    }
}
