use std::path::Path;

use mime_guess::from_ext;
use mime_sniffer::MimeTypeSniffer;

pub const IMAGE_MEDIA_TYPES: [&str; 8] = [
    "image/avif",
    "image/gif",
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/svg",
    "image/svg+xml",
    "image/webp",
];

pub const IMAGE_EXTENSIONS: [&str; 7] = [
    "avif",
    "gif",
    "jpeg",
    "jpg",
    "png",
    "svg",
    "webp",
];

const GENERIC_MEDIA_TYPE: &str = "application/octet-stream";

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum MediaTypeError {
    #[error("invalid file type, only image files are allowed")]
    InvalidExtension,

    #[error("invalid file type, only image files are allowed")]
    InvalidMediaType,
}

pub fn sniff_media_type(data: &[u8]) -> Option<String> {
    data.sniff_mime_type().map(|val| val.to_string())
}

pub fn get_file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|extension| extension.to_str())
        .map(|extension| extension.to_lowercase())
}

/// Returns media type of an uploaded image.
/// Both the extension and the media type must be on the allow list.
pub fn validate_image_file(
    file_name: &str,
    declared_media_type: Option<&str>,
    data: &[u8],
) -> Result<String, MediaTypeError> {
    let extension = get_file_extension(file_name)
        .ok_or(MediaTypeError::InvalidExtension)?;
    if !IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(MediaTypeError::InvalidExtension);
    };
    let media_type = match declared_media_type {
        Some(media_type) if media_type != GENERIC_MEDIA_TYPE => {
            media_type.to_lowercase()
        },
        _ => sniff_media_type(data)
            .or_else(|| from_ext(&extension).first_raw().map(String::from))
            .ok_or(MediaTypeError::InvalidMediaType)?,
    };
    if !IMAGE_MEDIA_TYPES.contains(&media_type.as_str()) {
        return Err(MediaTypeError::InvalidMediaType);
    };
    Ok(media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A";

    #[test]
    fn test_get_file_extension() {
        assert_eq!(get_file_extension("photo.JPG"), Some("jpg".to_string()));
        assert_eq!(get_file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(get_file_extension("README"), None);
    }

    #[test]
    fn test_validate_image_file() {
        let media_type = validate_image_file(
            "cat.png",
            Some("image/png"),
            PNG_HEADER,
        ).unwrap();
        assert_eq!(media_type, "image/png");
    }

    #[test]
    fn test_validate_image_file_sniffed() {
        let media_type = validate_image_file(
            "cat.png",
            Some(GENERIC_MEDIA_TYPE),
            PNG_HEADER,
        ).unwrap();
        assert_eq!(media_type, "image/png");
    }

    #[test]
    fn test_validate_image_file_wrong_extension() {
        let error = validate_image_file(
            "script.js",
            Some("image/png"),
            PNG_HEADER,
        ).unwrap_err();
        assert_eq!(error, MediaTypeError::InvalidExtension);
    }

    #[test]
    fn test_validate_image_file_wrong_media_type() {
        let error = validate_image_file(
            "cat.png",
            Some("text/html"),
            PNG_HEADER,
        ).unwrap_err();
        assert_eq!(error, MediaTypeError::InvalidMediaType);
    }
}
