use anyhow::Result;

/// Where playable URLs go; stands in for the page's audio element.
pub trait MediaSink: Send + Sync {
    fn play(&self, url: &str) -> Result<()>;
}
