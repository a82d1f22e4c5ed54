use std::collections::HashSet;

/// Fallback directory name when a URL has no usable path segment
const FALLBACK_SLUG: &str = "project";

/// Returns the last non-empty path segment of a URL
///
/// Query strings and fragments are ignored. Returns `None` when the URL has
/// no path segment at all (for example `https://dev.itch.io/`).
pub fn last_path_segment(url: &str) -> Option<String> {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let path = without_fragment.split('?').next().unwrap_or(without_fragment);
    let path = path
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
        .unwrap_or(path);

    path.split('/')
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
}

/// Derives a filesystem-safe slug from a project URL
///
/// The slug is the last non-empty path segment with every character outside
/// `[A-Za-z0-9._-]` replaced by `_`. Names that would escape or alias the
/// parent directory (`.`/`..`) fall back to `project`.
///
/// # Examples
///
/// ```
/// use itch_harvest::url::slug_from_url;
///
/// assert_eq!(slug_from_url("https://dev.itch.io/space-game"), "space-game");
/// assert_eq!(slug_from_url("https://dev.itch.io/space-game/"), "space-game");
/// ```
pub fn slug_from_url(url: &str) -> String {
    let segment = match last_path_segment(url) {
        Some(segment) => segment,
        None => return FALLBACK_SLUG.to_string(),
    };

    let slug: String = segment
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if slug.chars().all(|c| c == '.') {
        return FALLBACK_SLUG.to_string();
    }

    slug
}

/// Derives one slug per URL, suffixing repeats so no two share a directory
///
/// Repeats are detected case-insensitively and get `-2`, `-3`, ... in
/// discovery order; the first occurrence keeps the plain slug.
///
/// # Examples
///
/// ```
/// use itch_harvest::url::unique_slugs;
///
/// let urls = ["https://dev.itch.io/games/x", "https://dev.itch.io/other/x"];
/// assert_eq!(unique_slugs(&urls), vec!["x", "x-2"]);
/// ```
pub fn unique_slugs<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();

    urls.iter()
        .map(|url| {
            let base = slug_from_url(url.as_ref());
            let mut slug = base.clone();
            let mut n = 2;
            while !taken.insert(slug.to_lowercase()) {
                slug = format!("{}-{}", base, n);
                n += 1;
            }
            slug
        })
        .collect()
}
