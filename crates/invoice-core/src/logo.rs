//! # Logo Payloads
//!
//! The uploaded logo is kept exactly the way a file reader hands it to a
//! page: a `data:<mime>;base64,<payload>` URL. Whatever consumes the logo
//! (the renderer) decodes it back; the form just stores it.
//!
//! ## Upload Flow
//! ```text
//! file bytes ──► decode_logo() ──► LogoImage("data:image/png;base64,...")
//!                     │
//!                     └── Err(LogoError) ──► caller keeps the previous logo
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::LogoError;

/// Encoded, displayable logo image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogoImage {
    data_url: String,
}

impl LogoImage {
    /// The full `data:` URL.
    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// MIME type recorded in the URL header.
    pub fn mime(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split(';').next())
            .unwrap_or("")
    }

    /// Decodes the base64 payload back into file bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LogoError> {
        let (header, payload) = self
            .data_url
            .split_once(',')
            .ok_or_else(|| LogoError::MalformedDataUrl("missing ','".to_string()))?;

        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(LogoError::MalformedDataUrl(format!(
                "unexpected header '{}'",
                header
            )));
        }

        STANDARD
            .decode(payload)
            .map_err(|e| LogoError::MalformedDataUrl(e.to_string()))
    }
}

/// Encodes image file bytes into a [`LogoImage`].
///
/// ## Rules
/// - Empty input (no file, zero-length file) → [`LogoError::Empty`]
/// - Bytes that are not PNG, JPEG, GIF, WebP, BMP or SVG →
///   [`LogoError::UnsupportedFormat`]
///
/// ## Example
/// ```rust
/// use invoice_core::logo::decode_logo;
///
/// let png_header = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0];
/// let logo = decode_logo(&png_header).unwrap();
/// assert_eq!(logo.mime(), "image/png");
/// assert!(decode_logo(&[]).is_err());
/// ```
pub fn decode_logo(bytes: &[u8]) -> Result<LogoImage, LogoError> {
    if bytes.is_empty() {
        return Err(LogoError::Empty);
    }

    let mime = sniff_image_mime(bytes).ok_or(LogoError::UnsupportedFormat)?;

    Ok(LogoImage {
        data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
    })
}

/// Identifies the image format from its leading bytes.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    const PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    if bytes.starts_with(PNG) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else if bytes.starts_with(b"BM") {
        Some("image/bmp")
    } else if looks_like_svg(bytes) {
        Some("image/svg+xml")
    } else {
        None
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{FEFF}').trim_start();
    (text.starts_with("<?xml") || text.starts_with("<svg")) && text.contains("<svg")
}

#[cfg(test)]
mod tests {
    use super::*;

    const JPEG_HEAD: [u8; 4] = [0xFF, 0xD8, 0xFF, 0xE0];

    #[test]
    fn test_decode_builds_data_url() {
        let logo = decode_logo(&JPEG_HEAD).unwrap();
        assert_eq!(logo.data_url(), "data:image/jpeg;base64,/9j/4A==");
        assert_eq!(logo.mime(), "image/jpeg");
    }

    #[test]
    fn test_payload_round_trips() {
        let logo = decode_logo(&JPEG_HEAD).unwrap();
        assert_eq!(logo.to_bytes().unwrap(), JPEG_HEAD.to_vec());
    }

    #[test]
    fn test_empty_and_unknown_rejected() {
        assert_eq!(decode_logo(&[]), Err(LogoError::Empty));
        assert_eq!(
            decode_logo(b"just some text"),
            Err(LogoError::UnsupportedFormat)
        );
    }

    #[test]
    fn test_malformed_url_fails_to_decode() {
        let logo: LogoImage = serde_json::from_str("\"not a url\"").unwrap();
        assert!(matches!(logo.to_bytes(), Err(LogoError::MalformedDataUrl(_))));

        let logo: LogoImage = serde_json::from_str("\"data:image/png;base64,@@@\"").unwrap();
        assert!(matches!(logo.to_bytes(), Err(LogoError::MalformedDataUrl(_))));
    }

    #[test]
    fn test_svg_sniffing() {
        let svg = br#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg"/>"#;
        assert_eq!(sniff_image_mime(svg), Some("image/svg+xml"));
        assert_eq!(sniff_image_mime(b"<?xml version=\"1.0\"?><note/>"), None);
    }
}
