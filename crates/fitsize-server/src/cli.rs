use std::path::PathBuf;

use clap::Parser;
use fitsize_core::{parse_hex_color, CompressOptions, DocumentOptions, SearchParams};

#[derive(Parser, Debug)]
#[command(name = "fitsize-server")]
#[command(
    author,
    version,
    about = "Compress uploaded images and PDFs to a target file size"
)]
pub struct Args {
    /// Address to bind
    #[arg(long, env = "FITSIZE_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "FITSIZE_PORT", default_value_t = 5000)]
    pub port: u16,

    /// Largest accepted request body in megabytes
    #[arg(long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=1024))]
    pub max_upload_mb: u32,

    /// Also append log records to this file
    #[arg(long, env = "FITSIZE_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Matte color for transparent pixels, as RRGGBB (alpha is dropped otherwise)
    #[arg(long, value_parser = parse_background)]
    pub background: Option<[u8; 3]>,

    /// Re-encode JPEG images embedded in PDFs at the searched quality
    #[arg(long)]
    pub recompress_pdf_images: bool,

    /// Maximum number of search probes after the initial full-quality encode
    #[arg(long, default_value_t = fitsize_core::search::DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Stop searching once within this many bytes of the target
    #[arg(long, default_value_t = fitsize_core::search::DEFAULT_TOLERANCE_BYTES)]
    pub tolerance_bytes: u64,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn compress_options(&self) -> CompressOptions {
        let mut options = CompressOptions::default();
        options.search = SearchParams {
            max_attempts: self.max_attempts,
            tolerance_bytes: self.tolerance_bytes,
        };
        options.image.background = self.background;
        options.document = DocumentOptions {
            recompress_images: self.recompress_pdf_images,
        };
        options
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_background(value: &str) -> Result<[u8; 3], String> {
    parse_hex_color(value).ok_or_else(|| format!("expected a RRGGBB hex color, got {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_core_defaults() {
        let args = Args::try_parse_from(["fitsize-server"]).unwrap();

        assert_eq!(args.bind_address(), "127.0.0.1:5000");
        assert_eq!(args.max_upload_bytes(), 16 * 1024 * 1024);
        assert_eq!(args.compress_options(), CompressOptions::default());
    }

    #[test]
    fn test_flags_reach_options() {
        let args = Args::try_parse_from([
            "fitsize-server",
            "--background",
            "#ffffff",
            "--recompress-pdf-images",
            "--max-attempts",
            "8",
            "--tolerance-bytes",
            "0",
            "-vv",
        ])
        .unwrap();

        let options = args.compress_options();
        assert_eq!(options.image.background, Some([255, 255, 255]));
        assert!(options.document.recompress_images);
        assert_eq!(options.search.max_attempts, 8);
        assert_eq!(options.search.tolerance_bytes, 0);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_rejects_bad_background() {
        assert!(Args::try_parse_from(["fitsize-server", "--background", "white"]).is_err());
    }
}
