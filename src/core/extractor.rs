use std::collections::HashMap;

use axum::{
    body::{Body, Bytes},
    extract::{
        multipart::Field,
        rejection::{JsonRejection, PathRejection},
        FromRequest, FromRequestParts, Multipart, Path, Request,
    },
    http::{header::CONTENT_TYPE, request::Parts},
    Form, Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::core::error::AppError;
use crate::features::categories::dtos::{CategoryInput, ImageUpload, RawField};

/// Path extractor that reports malformed segments as JSON errors
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(path_rejection_error(rejection)),
        }
    }
}

fn path_rejection_error(rejection: PathRejection) -> AppError {
    match rejection {
        PathRejection::FailedToDeserializePathParams(err) => {
            AppError::BadRequest(format!("Invalid path parameter: {}", err.body_text()))
        }
        _ => AppError::BadRequest("Failed to parse path parameters".to_string()),
    }
}

fn json_rejection_error(rejection: JsonRejection) -> AppError {
    let message = match rejection {
        JsonRejection::JsonDataError(err) => format!("Invalid JSON data: {}", err),
        JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
        JsonRejection::MissingJsonContentType(err) => {
            format!("Missing JSON content type: {}", err)
        }
        _ => "Failed to parse JSON body".to_string(),
    };

    AppError::BadRequest(message)
}

/// Category create/update body
///
/// Accepts `multipart/form-data` (the image may be a file part or a text
/// part), `application/x-www-form-urlencoded`, or a JSON object. An empty
/// body without a content type yields empty input so that validation can
/// report every missing field.
pub struct CategoryPayload(pub CategoryInput);

impl<S> FromRequest<S> for CategoryPayload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_ascii_lowercase());

        let input = match content_type.as_deref() {
            Some(ct) if ct.starts_with("multipart/form-data") => {
                let multipart = Multipart::from_request(req, state).await.map_err(|e| {
                    AppError::BadRequest(format!("Invalid multipart body: {}", e))
                })?;
                read_multipart(multipart).await?
            }
            Some(ct) if ct.starts_with("application/x-www-form-urlencoded") => {
                let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Invalid form body: {}", e)))?;
                CategoryInput::from_form(fields)
            }
            Some(_) => {
                let Json(body) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(json_rejection_error)?;
                json_object(body)?
            }
            None => {
                let bytes = Bytes::from_request(req, state)
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read body: {}", e)))?;
                if bytes.is_empty() {
                    CategoryInput::default()
                } else {
                    let body = serde_json::from_slice::<Value>(&bytes).map_err(|e| {
                        AppError::BadRequest(format!("Invalid JSON syntax: {}", e))
                    })?;
                    json_object(body)?
                }
            }
        };

        Ok(Self(input))
    }
}

fn json_object(body: Value) -> Result<CategoryInput, AppError> {
    match body {
        Value::Object(map) => Ok(CategoryInput::from_json(map)),
        _ => Err(AppError::BadRequest(
            "JSON body must be an object".to_string(),
        )),
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<CategoryInput, AppError> {
    let mut input = CategoryInput::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "name" => input.name = Some(read_field(field).await?),
            "description" => input.description = Some(read_field(field).await?),
            "image" => input.image = read_image_field(field).await?,
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok(input)
}

/// A part with a file name is a file, anything else is text
async fn read_field(field: Field<'_>) -> Result<RawField, AppError> {
    let file_name = field.file_name().map(|s| s.to_string());
    let data = field.bytes().await.map_err(|e| {
        debug!("Failed to read field bytes: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })?;

    Ok(match file_name {
        Some(file_name) => RawField::File(ImageUpload { file_name, data }),
        None => match String::from_utf8(data.to_vec()) {
            Ok(text) => RawField::Text(text),
            Err(_) => RawField::Unsupported,
        },
    })
}

/// Browsers send an empty, unnamed file part for an untouched file input
async fn read_image_field(field: Field<'_>) -> Result<Option<RawField>, AppError> {
    let raw = read_field(field).await?;
    Ok(match raw {
        RawField::File(ref upload) if upload.file_name.is_empty() && upload.data.is_empty() => {
            None
        }
        other => Some(other),
    })
}
