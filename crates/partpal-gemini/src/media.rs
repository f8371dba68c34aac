// SPDX-FileCopyrightText: 2026 Partpal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image preparation for inline upload.

use base64::Engine;
use partpal_core::PartpalError;

use crate::types::InlineData;

/// Detects the image MIME type from its leading magic bytes.
///
/// Recognizes PNG, JPEG, GIF and WEBP; anything else is `None`.
pub fn sniff_image_mime(bytes: &[u8]) -> Option<&'static str> {
    match bytes {
        [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, ..] => Some("image/png"),
        [0xFF, 0xD8, 0xFF, ..] => Some("image/jpeg"),
        [b'G', b'I', b'F', b'8', b'7' | b'9', b'a', ..] => Some("image/gif"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => Some("image/webp"),
        _ => None,
    }
}

/// Encodes `bytes` as an inline image part.
pub fn inline_image(bytes: &[u8]) -> Result<InlineData, PartpalError> {
    let mime_type = sniff_image_mime(bytes).ok_or_else(|| {
        PartpalError::UnsupportedMedia(
            "image must be PNG, JPEG, GIF or WEBP".to_string(),
        )
    })?;

    Ok(InlineData {
        mime_type: mime_type.to_string(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    })
}
