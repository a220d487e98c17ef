use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::future::join_all;
use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// An image URL that failed to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenImage(pub String);

/// Checks whether image URLs resolve, so broken ones can be swapped for
/// placeholders
pub struct ImageProbe {
    client: Client,
    assets_dir: PathBuf,
}

impl ImageProbe {
    pub fn new(assets_dir: PathBuf, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build image probe client")?;

        Ok(Self { client, assets_dir })
    }

    /// True if the image loads: a 2xx for remote URLs, an existing file
    /// under the asset root for local paths
    pub async fn check(&self, url: &str) -> bool {
        if url.starts_with("http://") || url.starts_with("https://") {
            match self.client.head(url).send().await {
                Ok(response) => response.status().is_success(),
                Err(e) => {
                    debug!("Image request failed for {}: {}", url, e);
                    false
                }
            }
        } else {
            let path = self.assets_dir.join(url.trim_start_matches('/'));
            tokio::fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false)
        }
    }
}

/// Check `urls` in the background and report the broken ones on `tx`
pub fn spawn_probe<E>(probe: Arc<ImageProbe>, urls: Vec<String>, tx: mpsc::Sender<E>)
where
    E: From<BrokenImage> + Send + 'static,
{
    if urls.is_empty() {
        return;
    }

    tokio::spawn(async move {
        let checks = urls.iter().map(|url| probe.check(url));
        let results = join_all(checks).await;

        for (url, ok) in urls.into_iter().zip(results) {
            if ok {
                continue;
            }
            warn!("Image not available: {}", url);
            if tx.send(BrokenImage(url).into()).await.is_err() {
                break;
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe(dir: &std::path::Path) -> Arc<ImageProbe> {
        Arc::new(ImageProbe::new(dir.to_path_buf(), Duration::from_secs(1)).unwrap())
    }

    #[tokio::test]
    async fn test_local_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images/minions")).unwrap();
        std::fs::write(dir.path().join("images/minions/cat.png"), b"png").unwrap();

        let probe = probe(dir.path());
        assert!(probe.check("/images/minions/cat.png").await);
        assert!(!probe.check("/images/minions/dog.png").await);
        assert!(!probe.check("/images/minions").await);
    }

    #[tokio::test]
    async fn test_reports_only_broken() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.png"), b"png").unwrap();

        let (tx, mut rx) = mpsc::channel::<BrokenImage>(8);
        spawn_probe(probe(dir.path()), vec!["/ok.png".into(), "/missing.png".into()], tx);

        assert_eq!(rx.recv().await, Some(BrokenImage("/missing.png".into())));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn test_unreachable_host_is_broken() {
        let dir = tempfile::tempdir().unwrap();
        // reserved port on loopback, nothing listens there
        assert!(!probe(dir.path()).check("http://127.0.0.1:9/a.png").await);
    }
}
