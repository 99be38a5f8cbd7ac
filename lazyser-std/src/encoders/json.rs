//! JSON encoder backed by `serde_json`.

use lazyser_core::{BoxError, Decoder, Encoder, Value};

/// Encodes and decodes the `json` format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder {
    pretty: bool,
}

impl JsonEncoder {
    /// The format name this encoder is usually registered under.
    pub const FORMAT: &'static str = "json";

    /// A compact encoder.
    pub const fn new() -> Self {
        Self { pretty: false }
    }

    /// An encoder that pretty-prints its output.
    pub const fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Encoder for JsonEncoder {
    fn encode(&self, data: &Value, _format: &str) -> Result<String, BoxError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(text)
    }

    fn as_decoder(&self) -> Option<&dyn Decoder> {
        Some(self)
    }
}

impl Decoder for JsonEncoder {
    fn decode(&self, data: &str, _format: &str) -> Result<Value, BoxError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BaseSerializer;
    use lazyser_core::SerializerBackend;
    use serde_json::json;

    #[test]
    fn test_compact_and_pretty() {
        let value = json!({ "id": 1 });
        assert_eq!(JsonEncoder::new().encode(&value, "json").unwrap(), r#"{"id":1}"#);
        assert_eq!(
            JsonEncoder::pretty().encode(&value, "json").unwrap(),
            "{\n  \"id\": 1\n}"
        );
    }

    #[test]
    fn test_registered_under_format_name() {
        let backend = BaseSerializer::new().with_encoder(JsonEncoder::FORMAT, JsonEncoder::new());

        assert!(backend.supports_decoding("json"));
        assert_eq!(backend.encode(&json!([true]), "json").unwrap(), "[true]");
    }

    #[test]
    fn test_decode_invalid_input() {
        assert!(JsonEncoder::new().decode("{not json", "json").is_err());
        assert_eq!(
            JsonEncoder::new().decode("[1,2]", "json").unwrap(),
            json!([1, 2])
        );
    }
}
