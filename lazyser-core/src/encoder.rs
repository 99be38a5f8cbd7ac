//! Encoder and decoder traits.

use crate::{Value, error::BoxError};

/// Turns the intermediate representation into the text of a wire format.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Encoder`",
    label = "missing `Encoder` implementation",
    note = "Encoders must implement `encode` for the formats they are registered under."
)]
pub trait Encoder: Send + Sync + 'static {
    /// Encodes `data` as `format`.
    fn encode(&self, data: &Value, format: &str) -> Result<String, BoxError>;

    /// The decoding half, if this encoder can also parse its format.
    fn as_decoder(&self) -> Option<&dyn Decoder> {
        None
    }
}

/// Parses the text of a wire format back into the intermediate representation.
pub trait Decoder: Send + Sync + 'static {
    /// Decodes `data`, which is in `format`.
    fn decode(&self, data: &str, format: &str) -> Result<Value, BoxError>;
}
