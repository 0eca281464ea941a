//! Resolves a table source (local path or http(s) URL) into raw CSV bytes.

use std::io::Read;

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use tracing::debug;

use crate::fetch::{BasicClient, HttpClient, fetch_bytes};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

/// Loads table data from a local file path or fetches it over HTTP with a [`BasicClient`].
#[tracing::instrument(skip_all, fields(source = %source))]
pub async fn load_source(source: &str) -> Result<Vec<u8>> {
    if is_remote(source) {
        let client = BasicClient::new()?;
        load_source_with(&client, source).await
    } else {
        let bytes =
            std::fs::read(source).with_context(|| format!("reading table from '{source}'"))?;
        decode_payload(bytes)
    }
}

/// Like [`load_source`], fetching remote sources through `client`.
pub async fn load_source_with<C: HttpClient>(client: &C, source: &str) -> Result<Vec<u8>> {
    let bytes = if is_remote(source) {
        fetch_bytes(client, source)
            .await
            .with_context(|| format!("fetching table from '{source}'"))?
            .to_vec()
    } else {
        std::fs::read(source).with_context(|| format!("reading table from '{source}'"))?
    };
    decode_payload(bytes)
}

/// Gunzips `bytes` if they start with the gzip magic number; otherwise returns them unchanged.
pub fn decode_payload(bytes: Vec<u8>) -> Result<Vec<u8>> {
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Ok(bytes);
    }

    let mut decoded = Vec::new();
    GzDecoder::new(bytes.as_slice())
        .read_to_end(&mut decoded)
        .context("decompressing gzip table")?;
    debug!(
        compressed = bytes.len(),
        decompressed = decoded.len(),
        "Decompressed gzip source"
    );
    Ok(decoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_is_remote() {
        assert!(is_remote("https://example.org/a.csv"));
        assert!(!is_remote("data/holiday_episodes.csv"));
    }

    #[test]
    fn test_plain_payload_unchanged() {
        let data = b"tconst,genres\ntt01,Comedy\n".to_vec();
        assert_eq!(decode_payload(data.clone()).unwrap(), data);
    }

    #[test]
    fn test_gzip_payload_decoded() {
        let data = b"tconst,genres\ntt01,Comedy\n";
        assert_eq!(decode_payload(gzip(data)).unwrap(), data.to_vec());
    }

    #[test]
    fn test_truncated_gzip_is_error() {
        let mut compressed = gzip(b"tconst,genres\ntt01,Comedy\n");
        compressed.truncate(8);
        assert!(decode_payload(compressed).is_err());
    }

    #[tokio::test]
    async fn test_load_local_gzip_file() {
        let path = std::env::temp_dir().join("holiday_episodes_test_source.csv.gz");
        std::fs::write(&path, gzip(b"tconst,genres\n")).unwrap();

        let bytes = load_source(path.to_str().unwrap()).await.unwrap();
        assert_eq!(bytes, b"tconst,genres\n".to_vec());

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_error() {
        let result = load_source("/nonexistent/holiday_episodes.csv").await;
        assert!(result.is_err());
    }
}
