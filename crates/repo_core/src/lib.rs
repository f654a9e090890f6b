pub mod codec;
pub mod core_api;
pub mod document;
pub mod framing;
pub mod kdf;
pub mod validate;
