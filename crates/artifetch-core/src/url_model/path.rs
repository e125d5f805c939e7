//! Path keys derived from URL paths.
//!
//! URL paths always use `/`, so these helpers work lexically on strings rather
//! than through `std::path`, which would change meaning on other platforms.
//! Paths are percent-decoded first, since manifests list plain file names.

use percent_encoding::percent_decode_str;
use url::Url;

/// The path of `url` with percent-escapes decoded (invalid UTF-8 is replaced).
pub fn decoded_path(url: &Url) -> String {
    percent_decode_str(url.path())
        .decode_utf8_lossy()
        .into_owned()
}

/// Extracts the last path segment from a URL for use as a filename hint.
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = decoded_path(&parsed);
    let segment = path.split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Lexically cleans a slash-separated path: drops empty and `.` segments and
/// resolves `..` against its parent. `..` at the root of an absolute path is
/// dropped; an empty relative result is `"."`.
pub fn clean_path(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !rooted {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }
    let joined = parts.join("/");
    if rooted {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

/// Directory part of a path (everything before the last `/`), cleaned.
pub fn parent_dir(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(i) => clean_path(&path[..i]),
        None => ".".to_string(),
    }
}

/// Cleaned absolute form of a URL path. `None` for paths without a leading
/// `/` (opaque URLs such as `urn:` or `data:`), which have no absolute key.
pub fn absolute_url_path(path: &str) -> Option<String> {
    path.starts_with('/').then(|| clean_path(path))
}

/// Expresses `target` relative to `base`. Both must be absolute; otherwise
/// there is no meaningful relation and `None` is returned.
pub fn relative_path(base: &str, target: &str) -> Option<String> {
    if !base.starts_with('/') || !target.starts_with('/') {
        return None;
    }
    let base = clean_path(base);
    let target = clean_path(target);
    let base_parts: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();
    let target_parts: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();

    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = vec![".."; base_parts.len() - common];
    out.extend_from_slice(&target_parts[common..]);
    if out.is_empty() {
        Some(".".to_string())
    } else {
        Some(out.join("/"))
    }
}
