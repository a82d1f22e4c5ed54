/// Extension used when a URL's last path segment has none
pub const DEFAULT_EXTENSION: &str = ".jpg";

/// Derives a file extension (with leading dot) from an asset URL
///
/// The query string is stripped, then the text after the last `.` of the
/// final path segment is used. URLs without an extension get `.jpg`.
///
/// # Examples
///
/// ```
/// use itch_harvest::url::extension_from_url;
///
/// assert_eq!(extension_from_url("https://img.itch.zone/a/b.png?v=2"), ".png");
/// assert_eq!(extension_from_url("https://dev.itch.io/game/download"), ".jpg");
/// ```
pub fn extension_from_url(url: &str) -> String {
    let path = url.split('?').next().unwrap_or(url);
    let path = path.split('#').next().unwrap_or(path);
    let last = path.rsplit('/').next().unwrap_or(path);

    match last.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => format!(".{}", ext),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
