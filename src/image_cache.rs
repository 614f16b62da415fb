// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;

use anywho::{Error, anywho};
use cosmic::widget::image;
use futures_util::StreamExt;

/// Concurrent sprite downloads per batch
const MAX_CONCURRENT_DOWNLOADS: usize = 20;

/// Sprites already downloaded during this session, keyed by their URL
#[derive(Default)]
pub struct ImageCache {
    cache: HashMap<String, image::Handle>,
}

impl ImageCache {
    pub fn get(&self, url: &str) -> Option<&image::Handle> {
        self.cache.get(url)
    }

    pub fn insert(&mut self, url: String, handle: image::Handle) {
        self.cache.insert(url, handle);
    }

    /// URLs from `urls` that still need a download, without duplicates
    pub fn missing<I>(&self, urls: I) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut missing: Vec<String> = urls
            .into_iter()
            .filter(|url| !self.cache.contains_key(url))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}

/// Downloads every sprite in `urls`, failed downloads are logged and skipped
pub async fn download_sprites(
    client: reqwest::Client,
    urls: Vec<String>,
) -> Vec<(String, image::Handle)> {
    futures_util::stream::iter(urls)
        .map(|url| {
            let client = client.clone();
            async move {
                match download_image(&client, &url).await {
                    Ok(bytes) => Some((url, image::Handle::from_bytes(bytes))),
                    Err(e) => {
                        tracing::warn!("Error downloading sprite {url}: {e}");
                        None
                    }
                }
            }
        })
        .buffer_unordered(MAX_CONCURRENT_DOWNLOADS)
        .filter_map(|sprite| async move { sprite })
        .collect()
        .await
}

async fn download_image(client: &reqwest::Client, image_url: &str) -> Result<Vec<u8>, Error> {
    let response = client.get(image_url).send().await?;
    if response.status().is_success() {
        Ok(response.bytes().await?.to_vec())
    } else {
        Err(anywho!(
            "Failed to download image. Status: {}",
            response.status()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_skips_cached_and_duplicate_urls() {
        let mut cache = ImageCache::default();
        cache.insert(
            String::from("https://img.example/1.png"),
            image::Handle::from_bytes(vec![0u8; 4]),
        );

        let missing = cache.missing(vec![
            String::from("https://img.example/4.png"),
            String::from("https://img.example/1.png"),
            String::from("https://img.example/4.png"),
        ]);

        assert_eq!(missing, vec![String::from("https://img.example/4.png")]);
        assert!(cache.get("https://img.example/1.png").is_some());
    }
}
