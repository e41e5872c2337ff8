//! PAdES visual positioning presets
//!
//! Presets are fixed on the server, so each client fetches a given preset
//! once and serves later calls from memory.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::debug;

use crate::client::RestPkiClient;
use crate::error::Result;
use crate::models::PadesVisualPositioning;

const PRESETS_PATH: &str = "Api/PadesVisualPositioningPresets";

/// Presets already fetched, keyed by URL segment (including the query)
#[derive(Debug, Default)]
pub(crate) struct PresetCache(RwLock<HashMap<String, PadesVisualPositioning>>);

impl PresetCache {
    async fn get(&self, segment: &str) -> Option<PadesVisualPositioning> {
        self.0.read().await.get(segment).cloned()
    }

    async fn insert(&self, segment: String, preset: PadesVisualPositioning) {
        self.0.write().await.insert(segment, preset);
    }
}

fn footnote_segment(page_number: Option<i32>, rows: Option<u32>) -> String {
    let mut query = Vec::new();
    if let Some(page_number) = page_number.filter(|p| *p != 0) {
        query.push(format!("pageNumber={page_number}"));
    }
    if let Some(rows) = rows.filter(|r| *r != 0) {
        query.push(format!("rows={rows}"));
    }
    if query.is_empty() {
        "Footnote".to_string()
    } else {
        format!("Footnote?{}", query.join("&"))
    }
}

impl RestPkiClient {
    /// Stamp positioned as a footnote.
    ///
    /// `page_number` selects the page (negative counts from the end); `rows`
    /// is the number of stamps stacked per page before wrapping to a new row.
    pub async fn footnote_preset(
        &self,
        page_number: Option<i32>,
        rows: Option<u32>,
    ) -> Result<PadesVisualPositioning> {
        self.preset(footnote_segment(page_number, rows)).await
    }

    /// Stamp on a new page appended to the document
    pub async fn new_page_preset(&self) -> Result<PadesVisualPositioning> {
        self.preset("NewPage".to_string()).await
    }

    async fn preset(&self, segment: String) -> Result<PadesVisualPositioning> {
        if let Some(preset) = self.presets.get(&segment).await {
            debug!(%segment, "Visual positioning preset served from cache");
            return Ok(preset);
        }
        let preset: PadesVisualPositioning =
            self.get(&format!("{PRESETS_PATH}/{segment}")).await?;
        self.presets.insert(segment, preset.clone()).await;
        Ok(preset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footnote_segment() {
        assert_eq!(footnote_segment(None, None), "Footnote");
        assert_eq!(footnote_segment(Some(-1), None), "Footnote?pageNumber=-1");
        assert_eq!(footnote_segment(None, Some(2)), "Footnote?rows=2");
        assert_eq!(
            footnote_segment(Some(1), Some(3)),
            "Footnote?pageNumber=1&rows=3"
        );
        assert_eq!(footnote_segment(Some(0), Some(0)), "Footnote");
    }

    #[tokio::test]
    async fn test_cache_roundtrip() {
        let cache = PresetCache::default();
        assert!(cache.get("NewPage").await.is_none());
        cache
            .insert("NewPage".into(), PadesVisualPositioning::default())
            .await;
        assert_eq!(
            cache.get("NewPage").await,
            Some(PadesVisualPositioning::default())
        );
    }
}
