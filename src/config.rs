use crate::Args;
use std::path::PathBuf;

/// Runtime configuration for scanning and server mode
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub max_file_size: usize,
    pub tesseract_language: String,
    pub page_seg_mode: u8,
    pub tessdata_path: Option<String>,
    pub enhance_contrast: bool,
    pub save_processed: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9292,
            max_file_size: 20 * 1024 * 1024,
            tesseract_language: "eng+hin".to_string(),
            page_seg_mode: 6,
            tessdata_path: None,
            enhance_contrast: false,
            save_processed: None,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Self {
            host: args.host,
            port: args.port,
            max_file_size: args.max_file_size,
            tesseract_language: args.tesseract_language,
            page_seg_mode: args.page_seg_mode,
            tessdata_path: args.tessdata_path,
            enhance_contrast: args.enhance_contrast,
            save_processed: args.save_processed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults_match_config_defaults() {
        let config = Config::from(Args::parse_from(["label-ocr", "label.jpg"]));
        let defaults = Config::default();

        assert_eq!(config.port, defaults.port);
        assert_eq!(config.max_file_size, defaults.max_file_size);
        assert_eq!(config.page_seg_mode, 6);
        assert_eq!(config.tesseract_language, defaults.tesseract_language);
    }

    #[test]
    fn test_traditional_path_reads_hindi_by_default() {
        // ocrs is Latin-only, so Devanagari labels rely on tesseract
        let config = Config::from(Args::parse_from(["label-ocr", "label.jpg"]));
        let languages: Vec<&str> = config.tesseract_language.split('+').collect();
        assert_eq!(languages, vec!["eng", "hin"]);
    }
}
