//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Build an endpoint URL under an API root.
///
/// The root may or may not end with a slash; `segments` are appended as
/// path segments and `query` as encoded parameters.
pub fn endpoint(base_url: &str, segments: &[&str], query: &[(&str, String)]) -> Result<Url> {
    let mut url = Url::parse(base_url.trim_end_matches('/'))?;
    {
        let mut path = url
            .path_segments_mut()
            .map_err(|_| crate::error::AppError::config(format!("Not a base URL: {base_url}")))?;
        path.pop_if_empty();
        path.extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}
