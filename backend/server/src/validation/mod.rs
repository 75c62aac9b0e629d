//! # Input Validation
//!
//! Gatekeepers for both entry points, run before anything reaches the
//! analyzer or the estimator.
//!
//! - Text: JSON body holding a single `dish` field
//! - File: multipart image upload
//!
//! Validators are pure and return `Result<_, Rejection>`. The first failing
//! check wins, later checks never run.
use thiserror::Error;

pub mod file;
pub mod text;

pub use file::{ImageKind, UploadedFile, validate_file};
pub use text::{DishRequest, validate_text};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Rejection {
    #[error("Request body must be a JSON object")]
    NotAnObject,

    #[error("Request body is too large")]
    BodyTooLarge,

    #[error("Request body has too many fields")]
    TooManyFields,

    #[error("Request body contains an unexpected field")]
    UnknownField,

    #[error("Dish name is required")]
    MissingDish,

    #[error("Dish name must be a string")]
    NotAString,

    #[error("Dish name cannot be empty")]
    Empty,

    #[error("Dish name must be at most {max} characters")]
    TooLong { max: usize },

    #[error("Dish name contains invalid characters")]
    InvalidCharacters,

    #[error("Dish name contains potentially malicious content")]
    MaliciousContent { label: &'static str },

    #[error("Dish name contains too many repeated characters")]
    RepeatedCharacters,

    #[error("No image file provided")]
    MissingFile,

    #[error("Unsupported file type, expected JPEG, PNG or WEBP")]
    UnsupportedType,

    #[error("File is too large, maximum is {max} bytes")]
    FileTooLarge { max: usize },

    #[error("File is empty")]
    EmptyFile,

    #[error("Filename is too long")]
    FilenameTooLong,

    #[error("File extension is not allowed")]
    DisallowedExtension,

    #[error("File is too small to be a valid image")]
    FileTooSmall,

    #[error("File content does not match its declared type")]
    HeaderMismatch,
}

impl Rejection {
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::NotAnObject => "not_an_object",
            Rejection::BodyTooLarge => "body_too_large",
            Rejection::TooManyFields => "too_many_fields",
            Rejection::UnknownField => "unknown_field",
            Rejection::MissingDish => "missing_dish",
            Rejection::NotAString => "not_a_string",
            Rejection::Empty => "empty",
            Rejection::TooLong { .. } => "too_long",
            Rejection::InvalidCharacters => "invalid_characters",
            Rejection::MaliciousContent { .. } => "malicious_content",
            Rejection::RepeatedCharacters => "repeated_characters",
            Rejection::MissingFile => "missing_file",
            Rejection::UnsupportedType => "unsupported_type",
            Rejection::FileTooLarge { .. } => "file_too_large",
            Rejection::EmptyFile => "empty_file",
            Rejection::FilenameTooLong => "filename_too_long",
            Rejection::DisallowedExtension => "disallowed_extension",
            Rejection::FileTooSmall => "file_too_small",
            Rejection::HeaderMismatch => "header_mismatch",
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Rejection::NotAnObject
            | Rejection::BodyTooLarge
            | Rejection::TooManyFields
            | Rejection::UnknownField => "body",

            Rejection::MissingDish
            | Rejection::NotAString
            | Rejection::Empty
            | Rejection::TooLong { .. }
            | Rejection::InvalidCharacters
            | Rejection::MaliciousContent { .. }
            | Rejection::RepeatedCharacters => text::DISH_FIELD,

            Rejection::MissingFile
            | Rejection::UnsupportedType
            | Rejection::FileTooLarge { .. }
            | Rejection::EmptyFile
            | Rejection::FilenameTooLong
            | Rejection::DisallowedExtension
            | Rejection::FileTooSmall
            | Rejection::HeaderMismatch => file::IMAGE_FIELD,
        }
    }
}
