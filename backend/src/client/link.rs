// src/client/link.rs

use url::Url;

/// Builds the link an admin shares with candidates.
///
/// The link points at the directory the app is served from and carries only
/// the category in the hash route: `<base>#/quiz/<category>`.
pub fn share_link(app_url: &str, category: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(app_url)?.join("./")?;
    url.set_query(None);
    url.set_fragment(Some(&format!("/quiz/{}", category)));
    Ok(url)
}

/// Recovers the category from a shared link, if it is one.
pub fn category_from_link(link: &str) -> Option<String> {
    let url = Url::parse(link).ok()?;
    let category = url.fragment()?.strip_prefix("/quiz/")?;
    if category.is_empty() || category.contains('/') {
        return None;
    }
    Some(category.to_string())
}
