use nalgebra::Vector3;

/// Linear RGB color. Channels are unbounded until [`max_to_one`] is applied.
pub type ColorSample = Vector3<f32>;

/// Scales the color down so its largest channel is exactly 1.0 when any
/// channel exceeds 1.0. Hue ratios survive; negative channels are lifted to 0.
pub fn max_to_one(color: ColorSample) -> ColorSample {
    let color = color.map(|c| c.max(0.0));
    let max_channel = color.x.max(color.y).max(color.z);
    if max_channel > 1.0 {
        color / max_channel
    } else {
        color
    }
}

/// Packs a color into `0xAARRGGBB` with opaque alpha. Channels are truncated
/// after scaling by 255, matching the presentation surface's byte layout.
pub fn to_argb(color: ColorSample) -> u32 {
    let r = (color.x.clamp(0.0, 1.0) * 255.0) as u32;
    let g = (color.y.clamp(0.0, 1.0) * 255.0) as u32;
    let b = (color.z.clamp(0.0, 1.0) * 255.0) as u32;
    (255 << 24) | (r << 16) | (g << 8) | b
}
