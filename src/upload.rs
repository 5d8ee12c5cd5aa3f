//! Resumable upload: `start` opens a session, `transfer` sends the byte ranges the
//! server asks for until it reports nothing left, `finish` turns the session into
//! a media container.
//!
//! The server owns the offsets. The client only ever sends the range it was last
//! given and never computes the next one itself.

use std::io::SeekFrom;
use std::path::Path;

use reqwest::multipart::{Form, Part};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeek, AsyncSeekExt};
use tracing::{debug, info};

use crate::error::{ReelError, ReelResult};
use crate::graph::{GraphClient, GraphReply};

/// One in-progress transfer. `start_offset..end_offset` is the next range the server will accept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    pub session_id: String,
    pub video_id: String,
    pub start_offset: u64,
    pub end_offset: u64,
    pub file_size: u64,
}

impl UploadSession {
    pub fn is_complete(&self) -> bool {
        self.start_offset == self.end_offset
    }

    /// Applies the offsets from a transfer reply.
    fn advance(&mut self, start: u64, end: u64) -> ReelResult<()> {
        if start > end || end > self.file_size {
            return Err(ReelError::protocol(format!(
                "server returned range {}..{} outside file of {} bytes",
                start, end, self.file_size
            )));
        }
        if start != end && start <= self.start_offset {
            return Err(ReelError::protocol(format!(
                "offsets did not advance: sent from {}, server answered {}..{}",
                self.start_offset, start, end
            )));
        }
        self.start_offset = start;
        self.end_offset = end;
        Ok(())
    }
}

pub struct ResumableUploader<'a> {
    graph: &'a GraphClient,
}

impl<'a> ResumableUploader<'a> {
    pub fn new(graph: &'a GraphClient) -> Self {
        Self { graph }
    }

    /// Runs all three phases for the file at `path` and returns the container id.
    pub async fn upload(&self, path: &Path, caption: &str) -> ReelResult<String> {
        let file_size = tokio::fs::metadata(path).await?.len();
        let mut session = self.start(file_size).await?;
        let mut file = File::open(path).await?;
        self.transfer(&mut session, &mut file).await?;
        info!("Upload complete");
        self.finish(session, caption).await
    }

    pub async fn start(&self, file_size: u64) -> ReelResult<UploadSession> {
        if file_size == 0 {
            return Err(ReelError::protocol("refusing to upload an empty file"));
        }
        let size = file_size.to_string();
        let reply = self
            .graph
            .post_form(
                &self.graph.media_endpoint(),
                &[
                    ("media_type", "REELS"),
                    ("upload_phase", "start"),
                    ("file_size", size.as_str()),
                ],
            )
            .await?;

        let session_id = required_str(&reply, "start", "upload_session_id")?;
        let video_id = required_str(&reply, "start", "video_id")?;
        let (start_offset, end_offset) = offsets(&reply, "start")?;
        if start_offset > end_offset || end_offset > file_size {
            return Err(ReelError::protocol(format!(
                "start returned range {}..{} outside file of {} bytes",
                start_offset, end_offset, file_size
            )));
        }

        info!("Resumable session started (video {})", video_id);
        debug!("First range {}..{} of {}", start_offset, end_offset, file_size);
        Ok(UploadSession {
            session_id,
            video_id,
            start_offset,
            end_offset,
            file_size,
        })
    }

    /// Sends server-requested ranges of `source` until the session is complete.
    /// Returns the number of transfer calls made.
    pub async fn transfer<R>(&self, session: &mut UploadSession, source: &mut R) -> ReelResult<usize>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let endpoint = self.graph.media_endpoint();
        let mut calls = 0;

        while !session.is_complete() {
            let (start, end) = (session.start_offset, session.end_offset);
            if start > end || end > session.file_size {
                return Err(ReelError::protocol(format!(
                    "range {}..{} lies outside file of {} bytes",
                    start, end, session.file_size
                )));
            }

            source.seek(SeekFrom::Start(start)).await?;
            let mut chunk = vec![0u8; (end - start) as usize];
            source.read_exact(&mut chunk).await?;

            let form = Form::new()
                .text("upload_phase", "transfer")
                .text("upload_session_id", session.session_id.clone())
                .text("start_offset", start.to_string())
                .part(
                    "video_file_chunk",
                    Part::bytes(chunk)
                        .file_name("chunk")
                        .mime_str("application/octet-stream")?,
                );

            let reply = self.graph.post_multipart(&endpoint, form).await?;
            calls += 1;
            let (next_start, next_end) = offsets(&reply, "transfer")?;
            session.advance(next_start, next_end)?;

            info!(
                "Sent bytes {}..{}; server at {}/{} ({}%)",
                start,
                end,
                next_start,
                session.file_size,
                next_start * 100 / session.file_size
            );
        }
        Ok(calls)
    }

    pub async fn finish(&self, session: UploadSession, caption: &str) -> ReelResult<String> {
        let reply = self
            .graph
            .post_form(
                &self.graph.media_endpoint(),
                &[
                    ("upload_phase", "finish"),
                    ("upload_session_id", session.session_id.as_str()),
                    ("caption", caption),
                ],
            )
            .await?;
        let container_id = required_str(&reply, "finish", "id")?;
        info!("Container {} created for video {}", container_id, session.video_id);
        Ok(container_id)
    }
}

fn required_str(reply: &GraphReply, phase: &str, key: &str) -> ReelResult<String> {
    reply.str_field(key).ok_or_else(|| {
        ReelError::protocol(format!("{} response missing {}: {}", phase, key, reply.describe()))
    })
}

fn offsets(reply: &GraphReply, phase: &str) -> ReelResult<(u64, u64)> {
    let field = |key: &str| {
        reply.offset_field(key).ok_or_else(|| {
            ReelError::protocol(format!("{} response missing {}: {}", phase, key, reply.describe()))
        })
    };
    Ok((field("start_offset")?, field("end_offset")?))
}
