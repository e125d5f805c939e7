//! Embeds the checksum requirement into source URLs as a `checksum` query
//! parameter, and splits it back out for the transport.

use url::Url;

use crate::checksum::ChecksumSpec;
use crate::resolver::ConfigError;

/// Query parameter carrying `<algorithm>:<hexdigest>`.
pub const CHECKSUM_PARAM: &str = "checksum";

/// Parses a source location. Absolute filesystem paths are accepted and turned
/// into `file://` URLs.
pub fn parse_source(raw: &str) -> Result<Url, url::ParseError> {
    let raw = raw.trim();
    match Url::parse(raw) {
        Err(url::ParseError::RelativeUrlWithoutBase) if raw.starts_with('/') => {
            Url::from_file_path(raw).map_err(|()| url::ParseError::RelativeUrlWithoutBase)
        }
        other => other,
    }
}

/// Qualifies one URL: sets (overwrites) `checksum=<algorithm>:<value>`, keeping
/// every other query parameter. With algorithm `none` the URL is only
/// normalized.
pub fn qualify_url(raw: &str, checksum: &ChecksumSpec) -> Result<String, url::ParseError> {
    let mut url = parse_source(raw)?;
    if let Some(directive) = checksum.directive() {
        let kept = pairs_without_checksum(&url);
        url.query_pairs_mut()
            .clear()
            .extend_pairs(&kept)
            .append_pair(CHECKSUM_PARAM, &directive);
    }
    Ok(url.to_string())
}

/// Qualifies every source URL, in order. Does not touch the inputs.
pub fn qualify(urls: &[String], checksum: &ChecksumSpec) -> Result<Vec<String>, ConfigError> {
    urls.iter()
        .map(|u| {
            qualify_url(u, checksum).map_err(|source| ConfigError::InvalidUrl {
                url: u.clone(),
                source,
            })
        })
        .collect()
}

/// Removes the `checksum` parameter from `raw`, returning the bare URL to
/// request and the directive, if any.
pub fn split_checksum(raw: &str) -> Result<(Url, Option<String>), url::ParseError> {
    let mut url = parse_source(raw)?;
    let directive = url
        .query_pairs()
        .find(|(k, _)| k == CHECKSUM_PARAM)
        .map(|(_, v)| v.into_owned());
    if directive.is_some() {
        let kept = pairs_without_checksum(&url);
        if kept.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&kept);
        }
    }
    Ok((url, directive))
}

fn pairs_without_checksum(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(k, _)| k != CHECKSUM_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::ChecksumAlgorithm;

    fn checksum_param(url: &str) -> Vec<String> {
        Url::parse(url)
            .unwrap()
            .query_pairs()
            .filter(|(k, _)| k == CHECKSUM_PARAM)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    #[test]
    fn sets_checksum_param() {
        let spec = ChecksumSpec::inline(ChecksumAlgorithm::Sha256, "ABC123");
        let q = qualify_url("https://example.com/debian.iso", &spec).unwrap();
        assert_eq!(checksum_param(&q), vec!["sha256:abc123".to_string()]);
    }

    #[test]
    fn keeps_unrelated_params() {
        let spec = ChecksumSpec::inline(ChecksumAlgorithm::Md5, "ff");
        let q = qualify_url("https://example.com/a.iso?token=xyz&mirror=2", &spec).unwrap();
        let parsed = Url::parse(&q).unwrap();
        let pairs: Vec<(String, String)> = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("token".to_string(), "xyz".to_string())));
        assert!(pairs.contains(&("mirror".to_string(), "2".to_string())));
        assert_eq!(checksum_param(&q), vec!["md5:ff".to_string()]);
    }

    #[test]
    fn overwrites_instead_of_appending() {
        let spec = ChecksumSpec::inline(ChecksumAlgorithm::Sha1, "aa");
        let once = qualify_url("https://example.com/a.iso?checksum=md5:old", &spec).unwrap();
        let twice = qualify_url(&once, &spec).unwrap();
        assert_eq!(once, twice);
        assert_eq!(checksum_param(&twice), vec!["sha1:aa".to_string()]);
    }

    #[test]
    fn none_leaves_query_alone() {
        let q = qualify_url("https://example.com/a.iso?x=1", &ChecksumSpec::none()).unwrap();
        assert_eq!(q, "https://example.com/a.iso?x=1");
        assert!(checksum_param(&q).is_empty());
    }

    #[test]
    fn qualify_list_reports_bad_url() {
        let spec = ChecksumSpec::inline(ChecksumAlgorithm::Md5, "ff");
        let urls = vec![
            "https://example.com/a.iso".to_string(),
            "not a url".to_string(),
        ];
        match qualify(&urls, &spec) {
            Err(ConfigError::InvalidUrl { url, .. }) => assert_eq!(url, "not a url"),
            other => panic!("expected InvalidUrl, got {:?}", other),
        }
    }

    #[test]
    fn qualify_list_preserves_order() {
        let spec = ChecksumSpec::inline(ChecksumAlgorithm::Md5, "ff");
        let urls = vec![
            "https://a.example.com/x.iso".to_string(),
            "https://b.example.com/x.iso".to_string(),
        ];
        let q = qualify(&urls, &spec).unwrap();
        assert!(q[0].starts_with("https://a.example.com/"));
        assert!(q[1].starts_with("https://b.example.com/"));
        assert_eq!(urls[0], "https://a.example.com/x.iso");
    }

    #[test]
    fn split_removes_directive() {
        let (url, d) = split_checksum("https://example.com/a.iso?checksum=md5%3Aff").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.iso");
        assert_eq!(d.as_deref(), Some("md5:ff"));

        let (url, d) = split_checksum("https://example.com/a.iso?k=v&checksum=md5%3Aff").unwrap();
        assert_eq!(url.as_str(), "https://example.com/a.iso?k=v");
        assert_eq!(d.as_deref(), Some("md5:ff"));

        let (url, d) = split_checksum("file:///srv/a.iso").unwrap();
        assert_eq!(url.as_str(), "file:///srv/a.iso");
        assert!(d.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn absolute_paths_become_file_urls() {
        assert_eq!(parse_source("/srv/a.iso").unwrap().as_str(), "file:///srv/a.iso");
        assert!(parse_source("relative/a.iso").is_err());
    }
}
