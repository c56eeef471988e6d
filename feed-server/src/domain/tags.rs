//! Tags are not stored as rows: a post keeps them as one delimited string and
//! everything here derives from that string.

use std::collections::{HashMap, HashSet};

pub const TAG_DELIMITER: char = ',';

/// Splits a raw tag field into trimmed, non-empty tags.
///
/// An absent or blank field yields an empty list, never `[""]`.
pub fn split_tags(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(TAG_DELIMITER)
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Inverse of [`split_tags`] for values coming from clients.
pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> Option<String> {
    let joined = tags
        .iter()
        .map(|tag| tag.as_ref().trim())
        .filter(|tag| !tag.is_empty())
        .collect::<Vec<_>>()
        .join(",");

    (!joined.is_empty()).then_some(joined)
}

/// Posts sharing the exact same raw tag string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub raw: String,
    pub count: u64,
}

/// Groups raw tag fields by their full string value, most frequent first.
///
/// `"go,rust"` and `"go"` are distinct groups. Fields holding no tag at all
/// (`""`, `" , "`) form no group. Ties are ordered by the raw string so the
/// result is deterministic.
pub fn group_tag_fields<'a, I>(fields: I) -> Vec<TagGroup>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for raw in fields.into_iter().flatten() {
        if split_tags(Some(raw)).is_empty() {
            continue;
        }
        *counts.entry(raw).or_default() += 1;
    }

    let mut groups: Vec<TagGroup> = counts
        .into_iter()
        .map(|(raw, count)| TagGroup {
            raw: raw.to_owned(),
            count,
        })
        .collect();
    groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.raw.cmp(&b.raw)));
    groups
}

/// Explodes the top `limit` groups into individual tags.
///
/// Tags keep the rank of the first group they appear in; duplicates are
/// dropped and the result holds at most `limit` tags.
pub fn popular_tags(groups: &[TagGroup], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    groups
        .iter()
        .take(limit)
        .flat_map(|group| split_tags(Some(&group.raw)))
        .filter(|tag| seen.insert(tag.clone()))
        .take(limit)
        .collect()
}
