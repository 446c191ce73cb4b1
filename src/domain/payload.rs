use crate::domain::amount::Amount;
use crate::domain::crc::crc16;
use crate::domain::tlv::{CRC_HEADER, TAG_AMOUNT, TlvElement};
use crate::error::{QrisError, Result};

/// Country code element of an Indonesian QRIS payload. The amount is inserted
/// right before it.
pub const COUNTRY_ANCHOR: &str = "5802ID";

const STATIC_MARKER: &str = "010211";
const DYNAMIC_MARKER: &str = "010212";
const CHECKSUM_DIGITS: usize = 4;

/// Switches the point of initiation method from static to dynamic.
///
/// Plain substitution of the first `010211` occurrence; payloads without it
/// are returned unchanged.
pub fn normalize_initiation_method(payload: &str) -> String {
    payload.replacen(STATIC_MARKER, DYNAMIC_MARKER, 1)
}

/// Encodes the transaction amount element (tag `54`).
pub fn amount_field(amount: Amount) -> Result<String> {
    TlvElement::new(TAG_AMOUNT, amount.to_string())?.encode()
}

/// Converts a static merchant QRIS string into a dynamic one bound to `amount`.
///
/// The trailing checksum digits of `static_payload` are dropped, the amount
/// element is inserted before the first `5802ID`, and a fresh checksum is
/// appended. Later `5802ID` occurrences are left where they are.
pub fn build_payload(static_payload: &str, amount: Amount) -> Result<String> {
    let char_count = static_payload.chars().count();
    if char_count <= CHECKSUM_DIGITS {
        return Err(QrisError::MalformedPayload(format!(
            "payload must be longer than {} characters, got {}",
            CHECKSUM_DIGITS, char_count
        )));
    }
    let stripped: String = static_payload
        .chars()
        .take(char_count - CHECKSUM_DIGITS)
        .collect();

    // The header is re-appended once below.
    let stripped = stripped.strip_suffix(CRC_HEADER).unwrap_or(&stripped);
    let normalized = normalize_initiation_method(stripped);

    let split = normalized.find(COUNTRY_ANCHOR).ok_or_else(|| {
        QrisError::MalformedPayload(format!(
            "payload does not contain the country code anchor {}",
            COUNTRY_ANCHOR
        ))
    })?;
    let (prefix, suffix) = normalized.split_at(split);

    let field = amount_field(amount)?;
    let mut body = String::with_capacity(normalized.len() + field.len() + 8);
    body.push_str(prefix);
    body.push_str(&field);
    body.push_str(suffix);
    body.push_str(CRC_HEADER);

    let checksum = crc16(&body);
    body.push_str(&checksum);
    Ok(body)
}
