/// Default bound for the larger side of a stored category image, in pixels
pub const DEFAULT_IMAGE_MAX_DIMENSION: u32 = 150;

/// Default maximum size of an uploaded image in bytes (10MB)
pub const DEFAULT_MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Extra body allowance on top of the upload size for multipart framing and text fields
pub const MULTIPART_OVERHEAD: usize = 1024 * 1024;

// =============================================================================
// VALIDATION MESSAGES
// =============================================================================

pub const NAME_REQUIRED: &str = "Name is required";
pub const NAME_NOT_STRING: &str = "Name must be a string";
pub const NAME_NOT_UNIQUE: &str = "Name must be unique";

pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const DESCRIPTION_NOT_STRING: &str = "Description must be a string";

pub const IMAGE_REQUIRED: &str = "Image is required";
pub const IMAGE_WRONG_TYPE: &str = "Image must be a filename or an uploaded file";
pub const IMAGE_NOT_DECODABLE: &str = "Image must be a valid image file";
