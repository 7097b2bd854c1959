//! Newline-delimited JSON feed reader.

use super::{EventSource, FeedItem, SourceError};
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};

/// Reads one `FeedItem` per line. Blank lines are skipped.
pub struct JsonlSource<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl JsonlSource<BufReader<File>> {
    /// Open a feed file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let file = File::open(path).await?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: AsyncBufRead + Unpin + Send> JsonlSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for JsonlSource<R> {
    async fn next_item(&mut self) -> Result<Option<FeedItem>, SourceError> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            return serde_json::from_str(trimmed)
                .map(Some)
                .map_err(|e| SourceError::Parse {
                    line: self.line_no,
                    message: e.to_string(),
                });
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"{"kind":"transaction","block":{"height":1,"chain_id":"osmosis-1","time":"2024-01-01T00:00:00Z"},"events":[]}

{"kind":"contract_execution","block":{"height":2,"chain_id":"osmosis-1","time":"2024-01-01T00:00:06Z"},"sender":"osmo1a","contract":"osmo1c","msg":{"bond":{}}}
"#;

    #[tokio::test]
    async fn test_reads_items_and_skips_blank_lines() {
        let mut source = JsonlSource::new(FEED.as_bytes());

        let first = source.next_item().await.unwrap().unwrap();
        assert!(matches!(first, FeedItem::Transaction(_)));

        let second = source.next_item().await.unwrap().unwrap();
        assert!(matches!(second, FeedItem::ContractExecution(_)));
        assert_eq!(second.block().height.as_i64(), 2);

        assert!(source.next_item().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() {
        let feed = format!("{}\n{{oops\n", FEED.lines().next().unwrap());
        let mut source = JsonlSource::new(feed.as_bytes());

        source.next_item().await.unwrap();
        match source.next_item().await {
            Err(SourceError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_line_split_across_reads() {
        let line = FEED.lines().next().unwrap();
        let (head, tail) = line.split_at(40);
        let reader = tokio_test::io::Builder::new()
            .read(head.as_bytes())
            .read(tail.as_bytes())
            .read(b"\n")
            .build();
        let mut source = JsonlSource::new(BufReader::new(reader));

        let item = source.next_item().await.unwrap().unwrap();
        assert_eq!(item.block().height.as_i64(), 1);
        assert!(source.next_item().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_open_missing_file_is_io_error() {
        let result = JsonlSource::open("/nonexistent/feed.jsonl").await;
        assert!(matches!(result, Err(SourceError::Io(_))));
    }
}
