//! Sequential frame feed decoded by ffmpeg

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::debug;
use vidsheet_core::Frame;

use crate::error::{Result, VideoError};
use crate::probe;

/// An exhaustible, sequential feed of decoded frames.
///
/// The conversion pipeline is written against this trait so tests can
/// drive it with synthetic in-memory sources.
pub trait FrameSource {
    /// Total decoded-frame count, when known ahead of time.
    fn frame_count(&self) -> Option<u64>;

    /// The next decoded frame, or `Ok(None)` once the stream is
    /// exhausted. Never yields a partial frame.
    fn next_frame(&mut self) -> Result<Option<Frame>>;
}

/// Frame source backed by a piped `ffmpeg` decode.
///
/// Frames arrive as raw RGB24 at the input's native resolution; resizing
/// to the working raster is the pipeline's job.
pub struct FfmpegFrameSource {
    child: Child,
    stdout: ChildStdout,
    width: u32,
    height: u32,
    frame_count: Option<u64>,
    frame_len: usize,
    done: bool,
}

impl FfmpegFrameSource {
    /// Open a video file and start decoding it.
    ///
    /// The input is probed first; an unreadable or undecodable path fails
    /// here rather than on the first frame read.
    pub fn open(path: &Path) -> Result<Self> {
        let metadata = probe::probe(path)?;

        let mut child = Command::new("ffmpeg")
            .arg("-v")
            .arg("error")
            .arg("-i")
            .arg(path)
            .arg("-f")
            .arg("rawvideo")
            .arg("-pix_fmt")
            .arg("rgb24")
            .arg("-")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| VideoError::Launch {
                tool: "ffmpeg",
                source,
            })?;

        let Some(stdout) = child.stdout.take() else {
            return Err(VideoError::Launch {
                tool: "ffmpeg",
                source: std::io::Error::new(ErrorKind::BrokenPipe, "stdout was not captured"),
            });
        };

        debug!(path = %path.display(), "started ffmpeg decode");
        Ok(FfmpegFrameSource {
            child,
            stdout,
            width: metadata.width,
            height: metadata.height,
            frame_count: metadata.frame_count,
            frame_len: metadata.width as usize * metadata.height as usize * 3,
            done: false,
        })
    }

    /// Reap the decoder and surface a failed exit.
    fn finish(&mut self) -> Result<()> {
        let status = self.child.wait()?;
        if !status.success() {
            return Err(VideoError::Unreadable {
                tool: "ffmpeg",
                detail: format!("decoder exited with {status}"),
            });
        }
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn frame_count(&self) -> Option<u64> {
        self.frame_count
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        if self.done {
            return Ok(None);
        }

        let mut buf = vec![0u8; self.frame_len];
        let mut filled = 0;
        while filled < self.frame_len {
            match self.stdout.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled == 0 {
            // Clean end of stream
            self.done = true;
            self.finish()?;
            return Ok(None);
        }
        if filled < self.frame_len {
            return Err(VideoError::TruncatedFrame {
                expected: self.frame_len,
                got: filled,
            });
        }

        Ok(Some(Frame::from_rgb24(self.width, self.height, buf)?))
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        // Reap the decoder if the pipeline stopped before end of stream
        if !self.done {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
