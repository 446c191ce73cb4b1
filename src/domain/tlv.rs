use crate::domain::crc::crc16;
use crate::error::{QrisError, Result};
use serde::Serialize;

/// Tag of the point of initiation method (`11` static, `12` dynamic).
pub const TAG_INITIATION_METHOD: &str = "01";
/// Tag of the transaction amount.
pub const TAG_AMOUNT: &str = "54";
/// Tag of the country code.
pub const TAG_COUNTRY_CODE: &str = "58";
pub const TAG_MERCHANT_NAME: &str = "59";
pub const TAG_MERCHANT_CITY: &str = "60";
/// Tag of the CRC field, always the last element of a payload.
pub const TAG_CRC: &str = "63";

/// Header of the checksum field: tag `63`, length `04`.
pub const CRC_HEADER: &str = "6304";

const MAX_VALUE_LEN: usize = 99;

/// A single top-level EMV-MPM data object.
///
/// Nested templates (e.g. merchant account information, tags 26-51) are kept
/// as their raw value string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlvElement {
    pub tag: String,
    pub value: String,
}

impl TlvElement {
    pub fn new(tag: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let element = Self {
            tag: tag.into(),
            value: value.into(),
        };
        element.validate()?;
        Ok(element)
    }

    /// Number of characters in the value, as declared in the length field.
    pub fn len(&self) -> usize {
        self.value.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Appends `tag + length + value` to `out`.
    pub fn encode_into(&self, out: &mut String) -> Result<()> {
        self.validate()?;
        out.push_str(&self.tag);
        out.push_str(&format!("{:02}", self.len()));
        out.push_str(&self.value);
        Ok(())
    }

    pub fn encode(&self) -> Result<String> {
        let mut out = String::with_capacity(4 + self.value.len());
        self.encode_into(&mut out)?;
        Ok(out)
    }

    fn validate(&self) -> Result<()> {
        if self.tag.len() != 2 || !self.tag.bytes().all(|b| b.is_ascii_digit()) {
            return Err(QrisError::MalformedPayload(format!(
                "tag must be two decimal digits, got {:?}",
                self.tag
            )));
        }
        if self.len() > MAX_VALUE_LEN {
            return Err(QrisError::MalformedPayload(format!(
                "value of tag {} is {} characters long, the maximum is {}",
                self.tag,
                self.len(),
                MAX_VALUE_LEN
            )));
        }
        Ok(())
    }
}

/// Parses a payload into its ordered top-level elements.
///
/// The payload must be an exact concatenation of elements; offsets in errors
/// are character offsets.
pub fn parse(payload: &str) -> Result<Vec<TlvElement>> {
    let chars: Vec<char> = payload.chars().collect();
    let mut elements = Vec::new();
    let mut offset = 0;

    while offset < chars.len() {
        if chars.len() - offset < 4 {
            return Err(QrisError::MalformedTlv {
                offset,
                reason: "truncated tag/length header".to_string(),
            });
        }
        let tag: String = chars[offset..offset + 2].iter().collect();
        if !tag.chars().all(|c| c.is_ascii_digit()) {
            return Err(QrisError::MalformedTlv {
                offset,
                reason: format!("tag {:?} is not numeric", tag),
            });
        }
        let length_field: String = chars[offset + 2..offset + 4].iter().collect();
        let length: usize = length_field
            .parse()
            .ok()
            .filter(|_| length_field.chars().all(|c| c.is_ascii_digit()))
            .ok_or_else(|| QrisError::MalformedTlv {
                offset: offset + 2,
                reason: format!("length {:?} of tag {} is not numeric", length_field, tag),
            })?;

        let start = offset + 4;
        let end = start + length;
        if end > chars.len() {
            return Err(QrisError::MalformedTlv {
                offset: start,
                reason: format!(
                    "tag {} declares {} characters but only {} remain",
                    tag,
                    length,
                    chars.len() - start
                ),
            });
        }

        elements.push(TlvElement {
            tag,
            value: chars[start..end].iter().collect(),
        });
        offset = end;
    }

    Ok(elements)
}

/// Serializes elements back into a payload string.
pub fn encode(elements: &[TlvElement]) -> Result<String> {
    let mut out = String::new();
    for element in elements {
        element.encode_into(&mut out)?;
    }
    Ok(out)
}

/// Checks that `payload` ends in a checksum field matching the rest of its content.
pub fn verify_checksum(payload: &str) -> Result<()> {
    let split = payload
        .char_indices()
        .rev()
        .nth(3)
        .map(|(idx, _)| idx)
        .ok_or_else(|| QrisError::MalformedPayload("payload is too short".to_string()))?;
    let (covered, actual) = payload.split_at(split);
    if !covered.ends_with(CRC_HEADER) {
        return Err(QrisError::MalformedPayload(format!(
            "payload does not end with a {} checksum field",
            CRC_HEADER
        )));
    }

    let expected = crc16(covered);
    if expected != actual {
        return Err(QrisError::ChecksumMismatch {
            expected,
            actual: actual.to_string(),
        });
    }
    Ok(())
}

/// A parsed EMV-MPM payload with lookups over its top-level tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payload {
    elements: Vec<TlvElement>,
}

impl Payload {
    pub fn parse(payload: &str) -> Result<Self> {
        Ok(Self {
            elements: parse(payload)?,
        })
    }

    pub fn elements(&self) -> &[TlvElement] {
        &self.elements
    }

    /// Value of the first element carrying `tag`.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|e| e.tag == tag)
            .map(|e| e.value.as_str())
    }

    pub fn amount(&self) -> Option<&str> {
        self.get(TAG_AMOUNT)
    }

    pub fn merchant_name(&self) -> Option<&str> {
        self.get(TAG_MERCHANT_NAME)
    }

    pub fn merchant_city(&self) -> Option<&str> {
        self.get(TAG_MERCHANT_CITY)
    }

    pub fn country_code(&self) -> Option<&str> {
        self.get(TAG_COUNTRY_CODE)
    }

    pub fn checksum(&self) -> Option<&str> {
        self.get(TAG_CRC)
    }

    /// Whether the point of initiation method marks a dynamic (single use) code.
    pub fn is_dynamic(&self) -> bool {
        self.get(TAG_INITIATION_METHOD) == Some("12")
    }

    pub fn encode(&self) -> Result<String> {
        encode(&self.elements)
    }
}
