//! Synthetic artifacts shared by the unit tests.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, RgbImage};
use lopdf::{dictionary, Document, Object, Stream};

/// Gradient with deterministic noise on top; compresses like a photo would,
/// so JPEG size responds smoothly to quality.
pub fn noisy_rgb(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed.wrapping_mul(2_654_435_761).wrapping_add(1);
    let mut next = move || {
        // xorshift32
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        (state & 0x7F) as i32 - 64
    };

    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 255 / width.max(1)) as i32;
        let g = (y * 255 / height.max(1)) as i32;
        let b = ((x + y) * 127 / (width + height).max(1)) as i32 + 64;
        image::Rgb([
            (r + next()).clamp(0, 255) as u8,
            (g + next()).clamp(0, 255) as u8,
            (b + next()).clamp(0, 255) as u8,
        ])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn png_bytes(img: &DynamicImage) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .expect("png encoding of fixture");
    buf.into_inner()
}

/// A JPEG image XObject for embedding in a fixture PDF.
pub struct EmbeddedJpeg {
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Build a PDF with `pages` text pages.
///
/// `MediaBox` and `Resources` live on the `Pages` node and are inherited by
/// every page. With `image` set, every page also draws that JPEG.
pub fn pdf_bytes(pages: usize, image: Option<EmbeddedJpeg>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });

    let mut resources = dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    };
    if let Some(jpeg) = &image {
        let xobject = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => jpeg.width as i64,
                "Height" => jpeg.height as i64,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "DCTDecode",
            },
            jpeg.bytes.clone(),
        );
        let image_id = doc.add_object(xobject);
        resources.set("XObject", dictionary! { "Im1" => image_id });
    }
    let resources_id = doc.add_object(resources);

    let mut kids = Vec::with_capacity(pages);
    for n in 0..pages {
        let mut content = format!("BT /F1 24 Tf 72 720 Td (Page {}) Tj ET", n + 1);
        if image.is_some() {
            content.push_str(" q 200 0 0 150 72 400 cm /Im1 Do Q");
        }
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("pdf serialization of fixture");
    out
}
