//! URL modeling: checksum qualification, cache file names, and the path keys
//! used to find an artifact's entry in a checksum manifest.

mod path;
mod qualify;

pub use path::{
    absolute_url_path, clean_path, decoded_path, filename_from_url_path, parent_dir,
    relative_path,
};
pub use qualify::{parse_source, qualify, qualify_url, split_checksum, CHECKSUM_PARAM};

use sha1::{Digest, Sha1};

/// Derives the cache file name for a qualified URL.
///
/// The name is the hex SHA-1 of the full URL string (checksum directive
/// included), followed by `.extension` when the extension is non-empty. Two
/// mirrors or two checksums never share a name, and changing the declared
/// checksum moves the artifact to a new cache entry.
///
/// # Examples
///
/// - `cache_file_name("https://example.com/a.iso?checksum=md5:00", "iso")` → `"<40 hex chars>.iso"`
/// - `cache_file_name("https://example.com/a.iso", "")` → `"<40 hex chars>"`
pub fn cache_file_name(qualified_url: &str, extension: &str) -> String {
    let digest = hex::encode(Sha1::digest(qualified_url.as_bytes()));
    if extension.is_empty() {
        digest
    } else {
        format!("{}.{}", digest, extension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_file_name_is_stable_hash_plus_extension() {
        let a = cache_file_name("https://example.com/debian.iso?checksum=sha256%3Aab", "iso");
        let b = cache_file_name("https://example.com/debian.iso?checksum=sha256%3Aab", "iso");
        assert_eq!(a, b);
        assert!(a.ends_with(".iso"));
        assert_eq!(a.len(), 40 + ".iso".len());
        assert!(a[..40].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn cache_file_name_changes_with_checksum() {
        let a = cache_file_name("https://example.com/x.iso?checksum=md5%3Aaa", "iso");
        let b = cache_file_name("https://example.com/x.iso?checksum=md5%3Abb", "iso");
        assert_ne!(a, b);
    }

    #[test]
    fn cache_file_name_known_sha1() {
        // sha1("abc")
        assert_eq!(
            cache_file_name("abc", ""),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }
}
