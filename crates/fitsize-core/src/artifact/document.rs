//! Document adapter: rewrite a PDF with its pages unchanged.
//!
//! The source is parsed once. Every probe clones it, hangs the original
//! pages under a fresh page tree and catalog, records the requested quality
//! in the `Info` dictionary and serializes. Objects no longer reachable from
//! the new trailer (old page tree, outlines, xref streams) are pruned.
//!
//! By default quality only shows up in the metadata, so output size is
//! essentially flat across qualities. With
//! [`DocumentOptions::recompress_images`] the embedded JPEG images are
//! re-encoded at the probe quality as well.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use thiserror::Error;

use crate::config::DocumentOptions;
use crate::decode::{normalize_color, NormalizedImage};
use crate::encode::{encode_jpeg, EncodeError, PixelLayout};
use crate::search::QualityEncoder;

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in damaged files.
const MAX_TREE_DEPTH: usize = 64;

const PRODUCER: &str = concat!("fitsize ", env!("CARGO_PKG_VERSION"));

/// Errors raised while loading a PDF.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The bytes could not be parsed as a PDF.
    #[error("Failed to parse PDF: {0}")]
    Parse(String),

    /// Encrypted documents can't be rewritten.
    #[error("Encrypted PDF documents are not supported")]
    Encrypted,
}

/// A parsed PDF ready to be re-serialized at any quality.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    source: Document,
    page_ids: Vec<ObjectId>,
    /// Decoded embedded JPEGs, only filled when image recompression is on.
    images: Vec<(ObjectId, NormalizedImage)>,
}

impl DocumentArtifact {
    pub const MIME_TYPE: &'static str = "application/pdf";

    /// Parse a PDF and prepare its pages for rewriting.
    pub fn load(bytes: &[u8], options: &DocumentOptions) -> Result<Self, DocumentError> {
        let mut source =
            Document::load_mem(bytes).map_err(|e| DocumentError::Parse(e.to_string()))?;

        if source.is_encrypted() {
            return Err(DocumentError::Encrypted);
        }

        let page_ids: Vec<ObjectId> = source.get_pages().into_values().collect();
        flatten_inherited(&mut source, &page_ids);

        let images = if options.recompress_images {
            collect_jpeg_images(&source)
        } else {
            Vec::new()
        };

        log::debug!(
            "loaded PDF {} with {} pages, {} recompressible images",
            source.version,
            page_ids.len(),
            images.len()
        );

        Ok(Self {
            source,
            page_ids,
            images,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Number of embedded images re-encoded on every probe.
    pub fn recompressible_images(&self) -> usize {
        self.images.len()
    }
}

impl QualityEncoder for DocumentArtifact {
    fn encode(&self, quality: u8) -> Result<Vec<u8>, EncodeError> {
        let mut doc = self.source.clone();

        for (id, image) in &self.images {
            let jpeg = encode_jpeg(
                &image.pixels,
                image.width,
                image.height,
                image.layout,
                quality,
            )?;
            if let Some(Object::Stream(stream)) = doc.objects.get_mut(id) {
                stream.set_content(jpeg);
            }
        }

        let catalog_id = rebuild_page_tree(&mut doc, &self.page_ids);
        let info_id = doc.add_object(quality_metadata(quality));

        let file_id = doc.trailer.get(b"ID").ok().cloned();
        doc.trailer = Dictionary::new();
        doc.trailer.set("Root", catalog_id);
        doc.trailer.set("Info", info_id);
        if let Some(file_id) = file_id {
            doc.trailer.set("ID", file_id);
        }

        doc.prune_objects();

        let mut out = Vec::new();
        doc.save_to(&mut out)
            .map_err(|e| EncodeError::DocumentFailed(e.to_string()))?;
        Ok(out)
    }
}

/// Copy inherited attributes onto each page so the page survives being
/// moved under a new parent.
fn flatten_inherited(doc: &mut Document, page_ids: &[ObjectId]) {
    for &page_id in page_ids {
        let missing: Vec<(&[u8], Object)> = match doc.get_dictionary(page_id) {
            Ok(page) => INHERITABLE
                .iter()
                .filter(|key| !page.has(key))
                .filter_map(|&key| inherited_value(doc, page_id, key).map(|v| (key, v)))
                .collect(),
            Err(_) => continue,
        };

        if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            for (key, value) in missing {
                page.set(key, value);
            }
        }
    }
}

fn inherited_value(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

/// Point every page at a new `Pages` node and return the new catalog id.
fn rebuild_page_tree(doc: &mut Document, page_ids: &[ObjectId]) -> ObjectId {
    let pages_id = doc.new_object_id();

    for &page_id in page_ids {
        if let Ok(page) = doc.get_object_mut(page_id).and_then(Object::as_dict_mut) {
            page.set("Parent", pages_id);
        }
    }

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_ids.len() as i64,
        }),
    );

    doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    })
}

fn quality_metadata(quality: u8) -> Dictionary {
    dictionary! {
        "Producer" => Object::string_literal(PRODUCER),
        "Compress" => Object::string_literal("True"),
        "Quality" => Object::string_literal(quality.to_string()),
        "ImageQuality" => Object::string_literal(quality.to_string()),
    }
}

/// Decode every plain `DCTDecode` image whose color space the JPEG encoder
/// can reproduce. Anything else is left byte-for-byte as it was.
fn collect_jpeg_images(doc: &Document) -> Vec<(ObjectId, NormalizedImage)> {
    let mut images = Vec::new();

    for (&id, object) in &doc.objects {
        let Object::Stream(stream) = object else {
            continue;
        };
        let Some(layout) = recompressible_layout(&stream.dict) else {
            continue;
        };

        let decoded = match image::load_from_memory_with_format(
            &stream.content,
            image::ImageFormat::Jpeg,
        ) {
            Ok(img) => normalize_color(img, None),
            Err(e) => {
                log::warn!("leaving embedded image {:?} untouched: {}", id, e);
                continue;
            }
        };

        let declared = (
            dict_int(&stream.dict, b"Width"),
            dict_int(&stream.dict, b"Height"),
        );
        if decoded.layout != layout
            || declared != (Some(decoded.width as i64), Some(decoded.height as i64))
        {
            log::warn!(
                "leaving embedded image {:?} untouched: decoded shape does not match its dictionary",
                id
            );
            continue;
        }

        images.push((id, decoded));
    }

    images
}

fn recompressible_layout(dict: &Dictionary) -> Option<PixelLayout> {
    if dict.get(b"Subtype").and_then(Object::as_name).ok()? != b"Image" {
        return None;
    }

    let single_dct = match dict.get(b"Filter").ok()? {
        Object::Name(name) => name.as_slice() == b"DCTDecode",
        Object::Array(filters) => {
            filters.len() == 1 && matches!(&filters[0], Object::Name(n) if n.as_slice() == b"DCTDecode")
        }
        _ => false,
    };
    if !single_dct || dict_int(dict, b"BitsPerComponent") != Some(8) {
        return None;
    }

    match dict.get(b"ColorSpace").and_then(Object::as_name).ok()? {
        b"DeviceRGB" => Some(PixelLayout::Rgb),
        b"DeviceGray" => Some(PixelLayout::Gray),
        _ => None,
    }
}

fn dict_int(dict: &Dictionary, key: &[u8]) -> Option<i64> {
    dict.get(key).and_then(Object::as_i64).ok()
}
