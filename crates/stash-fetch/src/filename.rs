//! Display filenames derived from source URLs

use percent_encoding::percent_decode_str;
use stash_core::utils::path::FALLBACK_FILENAME;
use tracing::debug;
use url::Url;

/// Derive a display filename from `url`
///
/// Takes the final path segment and percent-decodes it (invalid UTF-8 is
/// replaced, not rejected). When that segment is empty, the host name is
/// used instead, and `"download"` when there is no host either. Strings
/// that do not parse as URLs are split on `/` the same way.
pub fn filename_from_url(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => {
            let last = parsed
                .path_segments()
                .and_then(|segments| segments.last())
                .map(decode)
                .unwrap_or_default();

            if last.is_empty() {
                parsed.host_str().unwrap_or_default().to_string()
            } else {
                last
            }
        }
        Err(e) => {
            debug!("'{}' is not an absolute URL ({}), splitting it as a path", url, e);
            let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or_default();
            decode(path.rsplit('/').next().unwrap_or_default())
        }
    };

    if segment.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        segment
    }
}

fn decode(segment: &str) -> String {
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}


#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics_and_never_empty(input in ".*") {
            let name = filename_from_url(&input);
            prop_assert!(!name.is_empty());
        }
    }
}
