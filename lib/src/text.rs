use crate::errors::{CompileError, Result};
use encoding_rs::{Encoding, UTF_8};

/// Resolve an encoding label such as `utf-8`, `cp1251` or `koi8-r`.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let enc = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| CompileError::Config(format!("unknown text encoding {label:?}")))?;
    // utf-16 and "replacement" cannot be produced by the encoder
    if enc.output_encoding() != enc {
        return Err(CompileError::Config(format!(
            "text encoding {label:?} cannot be used for output"
        )));
    }
    Ok(enc)
}

/// Encode `s`, silently dropping characters the encoding cannot represent.
pub fn encode_lossy(enc: &'static Encoding, s: &str) -> Vec<u8> {
    if enc == UTF_8 {
        return s.as_bytes().to_vec();
    }
    let mut out = Vec::with_capacity(s.len());
    let mut buf = [0u8; 4];
    for c in s.chars() {
        let (bytes, _, unmappable) = enc.encode(c.encode_utf8(&mut buf));
        if !unmappable {
            out.extend_from_slice(&bytes);
        }
    }
    out
}

pub fn decode(enc: &'static Encoding, bytes: &[u8]) -> String {
    enc.decode_without_bom_handling(bytes).0.into_owned()
}
