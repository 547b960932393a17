use std::collections::BTreeMap;

/// Clean HTML content using the ammonia library.
///
/// Question text is entered by admins and rendered in candidates' browsers.
/// Safe inline tags survive; scripts, iframes and event attributes are
/// stripped.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Cleans every option text, leaving the keys untouched.
pub fn clean_options(options: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    options
        .iter()
        .map(|(key, text)| (key.clone(), clean_html(text)))
        .collect()
}
