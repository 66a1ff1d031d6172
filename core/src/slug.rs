//! URL-safe office slugs.
//!
//! Office pages are addressed by slug, so the derivation below must stay
//! stable: changing it breaks every saved link.

use crate::model::Office;

/// Lower-case, whitespace runs to one hyphen, drop everything outside
/// `[A-Za-z0-9_-]`, collapse repeated hyphens, trim hyphens at both ends.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut in_whitespace = false;

    for c in name.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                slug.push('-');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            slug.push(c);
        }
    }

    // "a - b" comes out of the first pass as "a---b".
    let mut collapsed = String::with_capacity(slug.len());
    for c in slug.chars() {
        if c == '-' && collapsed.ends_with('-') {
            continue;
        }
        collapsed.push(c);
    }

    collapsed.trim_matches('-').to_string()
}

/// First office whose name slugifies to `slug`. Collisions are not resolved.
pub fn find_office_by_slug<'a>(offices: &'a [Office], slug: &str) -> Option<&'a Office> {
    let found = offices.iter().find(|o| slugify(&o.name) == slug);
    if found.is_none() {
        log::debug!("slug lookup: no office for '{slug}'");
    }
    found
}
