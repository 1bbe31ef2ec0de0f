/// Derives a URL-safe company code from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of
/// characters into a single hyphen; leading and trailing separators are
/// dropped. The result carries no uniqueness guarantee: a colliding code
/// is rejected by the companies primary key and surfaced as a conflict.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_separator = false;
        } else {
            pending_separator = true;
        }
    }

    slug
}
