//! Client for Cloudinary-compatible image hosting
//! https://cloudinary.com/documentation/image_upload_api_reference
use chrono::Utc;
use reqwest::{multipart, Client};
use serde::Deserialize;
use sha1::{Digest, Sha1};

use buddyscript_config::MediaHostConfig;
use buddyscript_models::users::types::ImageRef;

#[derive(thiserror::Error, Debug)]
pub enum MediaHostError {
    #[error(transparent)]
    RequestError(#[from] reqwest::Error),

    #[error("{0}")]
    ApiError(String),
}

#[derive(Deserialize)]
struct ApiErrorInfo {
    message: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorInfo,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Signature is SHA-1 of sorted `key=value` pairs followed by API secret
fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut params = params.to_vec();
    params.sort_by(|a, b| a.0.cmp(b.0));
    let params_str = params.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    let digest = Sha1::digest(format!("{}{}", params_str, api_secret));
    hex::encode(digest)
}

fn signed_form(
    config: &MediaHostConfig,
    params: Vec<(&'static str, String)>,
) -> multipart::Form {
    let signature = sign_params(&params, &config.api_secret);
    let mut form = multipart::Form::new()
        .text("api_key", config.api_key.clone())
        .text("signature", signature);
    for (key, value) in params {
        form = form.text(key, value);
    };
    form
}

async fn read_error(response: reqwest::Response) -> MediaHostError {
    let status = response.status();
    match response.json::<ApiErrorResponse>().await {
        Ok(error_response) => MediaHostError::ApiError(error_response.error.message),
        Err(_) => MediaHostError::ApiError(format!("unexpected status {}", status)),
    }
}

/// Uploads image to the configured folder
pub async fn upload_image(
    config: &MediaHostConfig,
    data: Vec<u8>,
    file_name: &str,
    media_type: &str,
) -> Result<ImageRef, MediaHostError> {
    let client = Client::new();
    let params = vec![
        ("folder", config.folder.clone()),
        ("timestamp", Utc::now().timestamp().to_string()),
    ];
    let file_part = multipart::Part::bytes(data)
        .file_name(file_name.to_string())
        .mime_str(media_type)?;
    let form = signed_form(config, params).part("file", file_part);
    let response = client
        .post(config.endpoint("upload"))
        .multipart(form)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(read_error(response).await);
    };
    let uploaded: UploadResponse = response.json().await?;
    log::info!("uploaded image {}", uploaded.public_id);
    Ok(ImageRef {
        url: uploaded.secure_url,
        public_id: uploaded.public_id,
    })
}

/// Deletes image.
/// Returns false if the media host did not confirm the deletion.
pub async fn delete_image(
    config: &MediaHostConfig,
    public_id: &str,
) -> Result<bool, MediaHostError> {
    let client = Client::new();
    let params = vec![
        ("public_id", public_id.to_string()),
        ("timestamp", Utc::now().timestamp().to_string()),
    ];
    let form = signed_form(config, params);
    let response = client
        .post(config.endpoint("destroy"))
        .multipart(form)
        .send()
        .await?;
    if !response.status().is_success() {
        return Err(read_error(response).await);
    };
    let destroyed: DestroyResponse = response.json().await?;
    log::info!("deleted image {} ({})", public_id, destroyed.result);
    Ok(destroyed.result == "ok")
}
