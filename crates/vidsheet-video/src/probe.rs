//! Input metadata via ffprobe

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{Result, VideoError};

/// Metadata of the first video stream of an input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoMetadata {
    pub width: u32,
    pub height: u32,
    /// Total decoded-frame count, when the container reports one. Used
    /// only for capacity projection; `None` skips that check.
    pub frame_count: Option<u64>,
}

/// Probe a video file with ffprobe.
///
/// Fails with a [`VideoError::Unreadable`] carrying ffprobe's stderr when
/// the path does not exist or is not a decodable video.
pub fn probe(path: &Path) -> Result<VideoMetadata> {
    let output = Command::new("ffprobe")
        .arg("-v")
        .arg("error")
        .arg("-select_streams")
        .arg("v:0")
        .arg("-count_packets")
        .arg("-show_entries")
        .arg("stream=width,height,nb_read_packets")
        .arg("-of")
        .arg("default=noprint_wrappers=1")
        .arg(path)
        .output()
        .map_err(|source| VideoError::Launch {
            tool: "ffprobe",
            source,
        })?;

    if !output.status.success() {
        return Err(VideoError::Unreadable {
            tool: "ffprobe",
            detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    let metadata = parse_metadata(&String::from_utf8_lossy(&output.stdout))?;
    debug!(
        width = metadata.width,
        height = metadata.height,
        frames = ?metadata.frame_count,
        "probed input"
    );
    Ok(metadata)
}

/// Parse ffprobe `key=value` output into [`VideoMetadata`].
fn parse_metadata(text: &str) -> Result<VideoMetadata> {
    let mut width = None;
    let mut height = None;
    let mut frame_count = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        match key.trim() {
            "width" => width = value.trim().parse().ok(),
            "height" => height = value.trim().parse().ok(),
            // "N/A" for containers that do not carry a packet count
            "nb_read_packets" => frame_count = value.trim().parse().ok(),
            _ => {}
        }
    }

    match (width, height) {
        (Some(width), Some(height)) if width > 0 && height > 0 => Ok(VideoMetadata {
            width,
            height,
            frame_count,
        }),
        _ => Err(VideoError::Metadata(format!(
            "no video stream dimensions in: {}",
            text.trim()
        ))),
    }
}
