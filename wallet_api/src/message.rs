/// Best-effort decoding of a signing payload for display.
///
/// A `0x`-prefixed hex string whose bytes are valid UTF-8 text (non-blank
/// after trimming) is returned decoded. Anything else, including odd-length
/// hex, invalid UTF-8 and blank results, is returned unchanged.
pub fn decode_message(value: &str) -> String {
    decode_hex_text(value).unwrap_or_else(|| value.to_owned())
}

fn decode_hex_text(value: &str) -> Option<String> {
    let bytes = hex::decode(value.strip_prefix("0x")?).ok()?;
    let text = String::from_utf8(bytes).ok()?;

    (!text.trim().is_empty()).then_some(text)
}
