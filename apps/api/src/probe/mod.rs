//! Best-effort image dimension probing via header sniffing.
//!
//! Inspects the leading bytes of an encoded image against the JPEG, PNG and
//! GIF signatures to extract pixel dimensions without decoding. Anything
//! else — an unrecognized signature, a truncated header, a failed fetch, a
//! nonsense dimension — yields `None` and the layout falls back to a fixed
//! display height. Probing never fails the overall request.

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

/// Largest dimension the prober will believe. Matches the ceiling of the
/// 16-bit formats and rejects garbage read from corrupt PNG chunks.
const MAX_PROBED_DIMENSION: u32 = 65_535;

/// Pixel dimensions sniffed from an image header. Request-scoped; discarded
/// after the display height is computed.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ImageProbeResult {
    pub width_px: u32,
    pub height_px: u32,
}

impl ImageProbeResult {
    pub fn aspect_ratio(&self) -> f64 {
        self.width_px as f64 / self.height_px as f64
    }
}

/// Sniffs pixel dimensions from the leading bytes of an encoded image.
pub fn sniff_dimensions(bytes: &[u8]) -> Option<ImageProbeResult> {
    let result = if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        sniff_png(bytes)
    } else if bytes.starts_with(b"GIF") {
        sniff_gif(bytes)
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        sniff_jpeg(bytes)
    } else {
        None
    };

    result.filter(|r| {
        (1..=MAX_PROBED_DIMENSION).contains(&r.width_px)
            && (1..=MAX_PROBED_DIMENSION).contains(&r.height_px)
    })
}

/// MIME type for a sniffed signature, used for data-URI embedding.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(b"GIF") {
        "image/gif"
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}

/// IHDR is the mandatory first chunk: width is the big-endian u32 at bytes
/// 16–19, height at 20–23.
fn sniff_png(bytes: &[u8]) -> Option<ImageProbeResult> {
    if bytes.len() < 24 {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some(ImageProbeResult {
        width_px: width,
        height_px: height,
    })
}

/// Logical screen descriptor: width at bytes 6–7, height at 8–9,
/// little-endian.
fn sniff_gif(bytes: &[u8]) -> Option<ImageProbeResult> {
    if bytes.len() < 10 {
        return None;
    }
    let width = u16::from_le_bytes([bytes[6], bytes[7]]) as u32;
    let height = u16::from_le_bytes([bytes[8], bytes[9]]) as u32;
    Some(ImageProbeResult {
        width_px: width,
        height_px: height,
    })
}

/// Scans forward for the first Start-Of-Frame marker (baseline `FFC0` or
/// progressive `FFC2`); height and width are big-endian u16 at fixed offsets
/// past it. No full segment walk — a partial or malformed header degrades to
/// `None`.
fn sniff_jpeg(bytes: &[u8]) -> Option<ImageProbeResult> {
    let mut i = 2;
    while i + 8 < bytes.len() {
        if bytes[i] == 0xFF && (bytes[i + 1] == 0xC0 || bytes[i + 1] == 0xC2) {
            let height = u16::from_be_bytes([bytes[i + 5], bytes[i + 6]]) as u32;
            let width = u16::from_be_bytes([bytes[i + 7], bytes[i + 8]]) as u32;
            return Some(ImageProbeResult {
                width_px: width,
                height_px: height,
            });
        }
        i += 1;
    }
    None
}

/// Fetches an image's bytes, best-effort. Any network error, non-2xx status
/// or body read failure yields `None`; callers degrade to their fallbacks.
/// No retry and no explicit timeout — a slow upstream is the platform's
/// problem, not a request failure.
pub async fn fetch_image(client: &reqwest::Client, url: &str) -> Option<Bytes> {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!("image fetch failed for {url}: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        debug!("image fetch for {url} returned {}", response.status());
        return None;
    }

    match response.bytes().await {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            debug!("image body read failed for {url}: {e}");
            None
        }
    }
}
