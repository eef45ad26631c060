use std::collections::HashMap;

use actix_multipart::{Field, Multipart, MultipartError};
use futures_util::stream::StreamExt;

use buddyscript_config::MediaLimits;
use buddyscript_utils::files::{validate_image_file, MediaTypeError};

use crate::errors::HttpError;

const TEXT_FIELD_MAX_SIZE: usize = 64 * 1024;

#[derive(thiserror::Error, Debug)]
pub enum UploadError {
    #[error("failed to read form data")]
    ReadError(#[from] MultipartError),

    #[error("file is too large")]
    TooLarge,

    #[error("form field is too large")]
    FieldTooLarge,

    #[error("form field is not valid UTF-8")]
    InvalidText,

    #[error("only one file is allowed")]
    TooManyFiles,

    #[error(transparent)]
    InvalidMediaType(#[from] MediaTypeError),
}

impl From<UploadError> for HttpError {
    fn from(error: UploadError) -> Self {
        HttpError::ValidationError(error.to_string())
    }
}

pub struct UploadedFile {
    pub file_name: String,
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Text fields and an optional image from a multipart form
#[derive(Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    /// Returns trimmed field value, or `None` if the field is missing or blank
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields.get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| value.to_string())
    }

    /// Returns field value as sent
    pub fn raw_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|value| value.as_str())
    }
}

async fn read_field(field: &mut Field, max_size: usize) -> Result<Vec<u8>, UploadError> {
    let mut data = vec![];
    while let Some(chunk) = field.next().await {
        let bytes = chunk?;
        if data.len() + bytes.len() > max_size {
            return Err(UploadError::TooLarge);
        };
        data.extend_from_slice(&bytes);
    };
    Ok(data)
}

/// Reads multipart form. Part named `file_field` is validated as an image.
pub async fn read_multipart_form(
    mut payload: Multipart,
    file_field: &str,
    limits: &MediaLimits,
) -> Result<MultipartForm, UploadError> {
    let mut form = MultipartForm::default();
    while let Some(item) = payload.next().await {
        let mut field = item?;
        let content_disposition = field.content_disposition().clone();
        let field_name = match content_disposition.get_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if field_name == file_field {
            let file_name = match content_disposition.get_filename() {
                Some(file_name) if !file_name.is_empty() => file_name.to_string(),
                // Empty file input
                _ => {
                    read_field(&mut field, limits.file_size_limit).await?;
                    continue;
                },
            };
            if form.file.is_some() {
                return Err(UploadError::TooManyFiles);
            };
            let declared_media_type = field.content_type()
                .map(|media_type| media_type.essence_str().to_string());
            let data = read_field(&mut field, limits.file_size_limit).await?;
            if data.is_empty() {
                continue;
            };
            let media_type = validate_image_file(
                &file_name,
                declared_media_type.as_deref(),
                &data,
            )?;
            form.file = Some(UploadedFile { file_name, media_type, data });
        } else {
            let data = read_field(&mut field, TEXT_FIELD_MAX_SIZE).await
                .map_err(|error| match error {
                    UploadError::TooLarge => UploadError::FieldTooLarge,
                    other_error => other_error,
                })?;
            let value = String::from_utf8(data)
                .map_err(|_| UploadError::InvalidText)?;
            form.fields.insert(field_name, value);
        };
    };
    Ok(form)
}

#[cfg(test)]
mod tests {
    use actix_web::{
        http::header::{self, HeaderMap, HeaderValue},
        web::Bytes,
    };
    use futures_util::stream;
    use super::*;

    const BOUNDARY: &str = "abbc761f78ff4d7cb7573b5a23f96ef0";
    const PNG_HEADER: &[u8] = b"\x89PNG\x0D\x0A\x1A\x0A";

    fn create_multipart(body: Vec<u8>) -> Multipart {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(
                &format!("multipart/form-data; boundary={}", BOUNDARY),
            ).unwrap(),
        );
        let payload = stream::once(async move {
            Ok::<_, actix_web::error::PayloadError>(Bytes::from(body))
        });
        Multipart::new(&headers, payload)
    }

    fn text_part(name: &str, value: &str) -> Vec<u8> {
        format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
            BOUNDARY, name, value,
        ).into_bytes()
    }

    fn file_part(name: &str, file_name: &str, media_type: &str, data: &[u8]) -> Vec<u8> {
        let mut part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
            BOUNDARY, name, file_name, media_type,
        ).into_bytes();
        part.extend_from_slice(data);
        part.extend_from_slice(b"\r\n");
        part
    }

    fn end() -> Vec<u8> {
        format!("--{}--\r\n", BOUNDARY).into_bytes()
    }

    #[actix_web::test]
    async fn test_read_multipart_form() {
        let body = [
            text_part("content", "  hello  "),
            text_part("visibility", ""),
            file_part("image", "photo.png", "image/png", PNG_HEADER),
            end(),
        ].concat();
        let form = read_multipart_form(
            create_multipart(body),
            "image",
            &MediaLimits::default(),
        ).await.unwrap();
        assert_eq!(form.text("content").as_deref(), Some("hello"));
        assert_eq!(form.raw_text("content"), Some("  hello  "));
        assert_eq!(form.text("visibility"), None);
        let file = form.file.unwrap();
        assert_eq!(file.file_name, "photo.png");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.data, PNG_HEADER);
    }

    #[actix_web::test]
    async fn test_read_multipart_form_invalid_file() {
        let body = [
            file_part("image", "script.js", "text/javascript", b"alert(1)"),
            end(),
        ].concat();
        let result = read_multipart_form(
            create_multipart(body),
            "image",
            &MediaLimits::default(),
        ).await;
        assert!(matches!(result, Err(UploadError::InvalidMediaType(_))));
    }

    #[actix_web::test]
    async fn test_read_multipart_form_file_too_large() {
        let body = [
            file_part("image", "photo.png", "image/png", &[0; 64]),
            end(),
        ].concat();
        let limits = MediaLimits { file_size_limit: 32 };
        let result = read_multipart_form(
            create_multipart(body),
            "image",
            &limits,
        ).await;
        assert!(matches!(result, Err(UploadError::TooLarge)));
    }
}
