//! Card image decoding.

use image::GenericImageView;

#[derive(Clone)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

const MAX_EDGE: u32 = 800;

/// Decodes, shrinking anything larger than 800px on either edge.
pub fn decode_preview_image(bytes: &[u8]) -> Result<PreviewImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|err| err.to_string())?;
    let resized = if dynamic.width() > MAX_EDGE || dynamic.height() > MAX_EDGE {
        dynamic.thumbnail(MAX_EDGE, MAX_EDGE).to_rgba8()
    } else {
        dynamic.to_rgba8()
    };
    let width = resized.width() as usize;
    let height = resized.height() as usize;
    Ok(PreviewImage {
        width,
        height,
        rgba: resized.into_raw(),
    })
}
