use std::collections::HashMap;

use crate::models::{DuplicateGroup, Page};

/// Groups pages that share the exact same (trimmed, case-sensitive) value.
///
/// Groups come back in order of each value's first appearance and only
/// when more than one URL shares the value. Blank values are skipped.
pub fn find_duplicates<F>(pages: &[Page], field: F) -> Vec<DuplicateGroup>
where
    F: Fn(&Page) -> Option<&str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();

    for page in pages {
        let Some(value) = field(page).map(str::trim) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }

        match index.get(value) {
            Some(&position) => groups[position].1.push(page.url.clone()),
            None => {
                index.insert(value, groups.len());
                groups.push((value, vec![page.url.clone()]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, urls)| urls.len() > 1)
        .map(|(value, urls)| DuplicateGroup {
            value: value.to_string(),
            count: urls.len(),
            urls,
        })
        .collect()
}

pub fn duplicate_titles(pages: &[Page]) -> Vec<DuplicateGroup> {
    find_duplicates(pages, |page| Some(page.title.as_str()))
}

pub fn duplicate_meta_descriptions(pages: &[Page]) -> Vec<DuplicateGroup> {
    find_duplicates(pages, |page| Some(page.meta_description.as_str()))
}

pub fn duplicate_canonicals(pages: &[Page]) -> Vec<DuplicateGroup> {
    find_duplicates(pages, |page| page.canonical_url.as_deref())
}
