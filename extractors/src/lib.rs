//! Extractors Crate
//!
//! Text helpers shared by the validation agents and the API:
//!
//! - **Phone input**: normalization of phone numbers and dialing codes, and
//!   request validation that runs before any pipeline step.
//! - **JSON blocks**: extraction of the structured object a language model
//!   embeds in its free-text reply.
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::{parse_embedded_json, validate_request};
//!
//! let request = validate_request("555-123-4567", "+1")?;
//! let analysis: MyReply = parse_embedded_json(&model_output)?;
//! ```

pub mod json_block;
pub mod phone;

pub use json_block::{find_json_object, parse_embedded_json, JsonExtractionError};
pub use phone::{
    normalize_country_code, normalize_phone_number, validate_request, NormalizedRequest,
    RequestValidationError,
};
