//! Raster decoding with EXIF orientation handling.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, Orientation};

/// Decode an image (PNG, JPEG, GIF, WebP) from bytes.
///
/// The format is sniffed from the content, not taken from the file name.
/// GIFs decode to their first frame. When `apply_orientation` is set the EXIF
/// orientation tag is baked into the pixels, because the JPEG written later
/// carries no EXIF block.
///
/// # Errors
///
/// Returns `DecodeError::Empty` for empty input, `DecodeError::InvalidFormat`
/// when the format can't be identified and `DecodeError::CorruptedFile` when
/// the decoder rejects the data.
pub fn decode_image(bytes: &[u8], apply_orientation: bool) -> Result<DynamicImage, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if !apply_orientation {
        return Ok(img);
    }

    let orientation = read_orientation(bytes);
    if orientation != Orientation::Normal {
        log::debug!(
            "applying EXIF orientation {:?}{}",
            orientation,
            if orientation.swaps_dimensions() {
                " (width and height swap)"
            } else {
                ""
            }
        );
    }
    Ok(apply(img, orientation))
}

/// EXIF orientation of the image, or `Normal` when there is none to read.
fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

fn apply(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
