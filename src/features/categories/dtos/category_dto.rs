use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::features::categories::models::Category;
use crate::modules::imaging::detect_format;
use crate::shared::constants::{
    DESCRIPTION_NOT_STRING, DESCRIPTION_REQUIRED, IMAGE_NOT_DECODABLE, IMAGE_REQUIRED,
    IMAGE_WRONG_TYPE, NAME_NOT_STRING, NAME_REQUIRED,
};
use crate::shared::validation::FILE_EXTENSION_REGEX;

/// Response DTO for category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponseDto {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            description: c.description,
            image: c.image,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// An image file received in a multipart body
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// File name as sent by the client
    pub file_name: String,
    pub data: Bytes,
}

impl ImageUpload {
    /// Extension of the client file name, when it is a plain alphanumeric one
    pub fn extension(&self) -> Option<&str> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| FILE_EXTENSION_REGEX.is_match(e))
    }
}

/// A request field before type checks
#[derive(Debug, Clone)]
pub enum RawField {
    Text(String),
    File(ImageUpload),
    /// Present, but neither text nor a file (e.g. a JSON number)
    Unsupported,
}

/// Category fields as received by create and update, unvalidated
#[derive(Debug, Clone, Default)]
pub struct CategoryInput {
    pub name: Option<RawField>,
    pub description: Option<RawField>,
    pub image: Option<RawField>,
}

/// The `image` value of a valid request
#[derive(Debug, Clone)]
pub enum ImageInput {
    /// A file name stored as-is
    Filename(String),
    /// Image bytes to resize and store under a generated name
    Upload(ImageUpload),
}

/// Category fields that passed presence and type checks
#[derive(Debug, Clone, Validate)]
pub struct ValidCategory {
    #[validate(length(max = 255, message = "Name must not exceed 255 characters"))]
    pub name: String,

    pub description: String,

    pub image: ImageInput,
}

fn rule_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Resolve a required text field; blank text counts as missing
fn required_text(
    field: Option<RawField>,
    name: &'static str,
    required_message: &'static str,
    type_message: &'static str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match field {
        Some(RawField::Text(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        None | Some(RawField::Text(_)) => {
            errors.add(name, rule_error("required", required_message));
            None
        }
        Some(RawField::File(_)) | Some(RawField::Unsupported) => {
            errors.add(name, rule_error("string", type_message));
            None
        }
    }
}

fn required_image(field: Option<RawField>, errors: &mut ValidationErrors) -> Option<ImageInput> {
    match field {
        Some(RawField::Text(text)) if !text.trim().is_empty() => {
            Some(ImageInput::Filename(text.trim().to_string()))
        }
        None | Some(RawField::Text(_)) => {
            errors.add("image", rule_error("required", IMAGE_REQUIRED));
            None
        }
        Some(RawField::File(upload)) => {
            if detect_format(&upload.data).is_none() {
                errors.add("image", rule_error("image", IMAGE_NOT_DECODABLE));
                return None;
            }
            Some(ImageInput::Upload(upload))
        }
        Some(RawField::Unsupported) => {
            errors.add("image", rule_error("type", IMAGE_WRONG_TYPE));
            None
        }
    }
}

impl CategoryInput {
    /// Build input from a JSON object; `null` is treated as absent
    pub fn from_json(mut body: Map<String, Value>) -> Self {
        let mut take = |key: &str| match body.remove(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(RawField::Text(s)),
            Some(_) => Some(RawField::Unsupported),
        };

        Self {
            name: take("name"),
            description: take("description"),
            image: take("image"),
        }
    }

    /// Build input from url-encoded form fields
    pub fn from_form(mut fields: HashMap<String, String>) -> Self {
        Self {
            name: fields.remove("name").map(RawField::Text),
            description: fields.remove("description").map(RawField::Text),
            image: fields.remove("image").map(RawField::Text),
        }
    }

    /// Check presence and type of every field, then the declarative rules.
    ///
    /// Rules only run once every field is present with the right type, so a
    /// response lists either presence/type problems or rule violations.
    pub fn validate_fields(self) -> Result<ValidCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required_text(self.name, "name", NAME_REQUIRED, NAME_NOT_STRING, &mut errors);
        let description = required_text(
            self.description,
            "description",
            DESCRIPTION_REQUIRED,
            DESCRIPTION_NOT_STRING,
            &mut errors,
        );
        let image = required_image(self.image, &mut errors);

        match (name, description, image) {
            (Some(name), Some(description), Some(image)) => {
                let category = ValidCategory {
                    name,
                    description,
                    image,
                };
                category.validate()?;
                Ok(category)
            }
            _ => Err(errors),
        }
    }
}
