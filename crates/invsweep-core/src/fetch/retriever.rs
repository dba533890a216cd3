//! Fetch-and-save for each link, one at a time.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use tracing::{debug, info, warn};

use crate::error::DownloadError;
use crate::models::config::DownloadConfig;
use crate::models::record::Link;

/// Progress notifications emitted by [`Retriever::retrieve_all`].
#[derive(Debug)]
pub enum RetrievalEvent<'a> {
    /// A download is about to start (index is 0-based).
    Started {
        index: usize,
        total: usize,
        link: &'a Link,
    },
    /// Bytes written so far for the current download.
    Progress {
        index: usize,
        downloaded: u64,
        content_length: Option<u64>,
    },
    /// A download finished, successfully or not.
    Finished {
        index: usize,
        link: &'a Link,
        outcome: &'a Result<u64, DownloadError>,
    },
}

/// Outcome of a batch of downloads.
#[derive(Debug, Default)]
pub struct RetrievalSummary {
    /// Number of links attempted.
    pub attempted: usize,
    /// Number of links saved completely.
    pub succeeded: usize,
    /// Failed downloads by link index.
    pub failures: Vec<(usize, DownloadError)>,
}

/// Downloads links into a directory, naming each file after its anchor text.
pub struct Retriever {
    client: reqwest::Client,
}

impl Retriever {
    /// Build a retriever from download settings.
    pub fn new(config: &DownloadConfig) -> Result<Self, DownloadError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Destination path for a link: the anchor text, verbatim, inside `dir`.
    pub fn destination(link: &Link, dir: &Path) -> PathBuf {
        dir.join(&link.anchor_text)
    }

    /// Fetch one link and stream its body to disk. Returns the bytes written.
    ///
    /// A failure mid-stream leaves the partial file in place.
    pub async fn fetch<F>(&self, link: &Link, dir: &Path, mut on_progress: F) -> Result<u64, DownloadError>
    where
        F: FnMut(u64, Option<u64>),
    {
        let response = self.client.get(&link.url).send().await?;

        if !response.status().is_success() {
            return Err(DownloadError::Status(response.status().as_u16()));
        }

        let content_length = response.content_length();
        let path = Self::destination(link, dir);
        let mut file = File::create(&path)?;

        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk)?;
            downloaded += chunk.len() as u64;
            on_progress(downloaded, content_length);
        }

        file.flush()?;
        debug!("Saved {} bytes to {}", downloaded, path.display());
        Ok(downloaded)
    }

    /// Download every link in order. Failures are counted and skipped.
    pub async fn retrieve_all<F>(&self, links: &[Link], dir: &Path, mut on_event: F) -> RetrievalSummary
    where
        F: FnMut(RetrievalEvent<'_>),
    {
        let total = links.len();
        let mut summary = RetrievalSummary {
            attempted: total,
            ..Default::default()
        };

        for (index, link) in links.iter().enumerate() {
            on_event(RetrievalEvent::Started { index, total, link });

            let outcome = self
                .fetch(link, dir, |downloaded, content_length| {
                    on_event(RetrievalEvent::Progress {
                        index,
                        downloaded,
                        content_length,
                    })
                })
                .await;

            on_event(RetrievalEvent::Finished {
                index,
                link,
                outcome: &outcome,
            });

            match outcome {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    warn!("Download of {:?} from {} failed: {}", link.anchor_text, link.url, e);
                    summary.failures.push((index, e));
                }
            }
        }

        info!("{} of {} files downloaded", summary.succeeded, summary.attempted);
        summary
    }
}
