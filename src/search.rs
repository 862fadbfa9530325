use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::OnceLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed};
use icu_locale_core::locale;
use tracing::warn;

use crate::catalog::Protocol;

/// Trimmed, lowercased search text. Empty means "match everything".
pub fn normalize_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Substring match over title, category and content.
///
/// `query` is expected to be normalized already.
pub fn matches(protocol: &Protocol, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let haystack = format!(
        "{}\n{}\n{}",
        protocol.title, protocol.category, protocol.content
    )
    .to_lowercase();
    haystack.contains(query)
}

pub fn filter<'a>(protocols: &'a [Protocol], query: &str) -> Vec<&'a Protocol> {
    protocols.iter().filter(|p| matches(p, query)).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryGroup<'a> {
    pub label: String,
    pub items: Vec<&'a Protocol>,
}

/// Partitions by category label, orders each group by start page and the
/// groups by label.
pub fn group_by_category<'a>(items: &[&'a Protocol]) -> Vec<CategoryGroup<'a>> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup<'a>> = Vec::new();

    for &protocol in items {
        let label = protocol.category_label();
        let slot = *index.entry(label).or_insert_with(|| {
            groups.push(CategoryGroup {
                label: label.to_string(),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].items.push(protocol);
    }

    for group in &mut groups {
        group.items.sort_by_key(|p| p.start_page);
    }
    groups.sort_by(|a, b| compare_labels(&a.label, &b.label));
    groups
}

fn collator() -> Option<&'static CollatorBorrowed<'static>> {
    static HEBREW: OnceLock<Option<CollatorBorrowed<'static>>> = OnceLock::new();
    HEBREW
        .get_or_init(|| {
            match Collator::try_new(locale!("he").into(), CollatorOptions::default()) {
                Ok(collator) => Some(collator),
                Err(err) => {
                    warn!(%err, "hebrew collation unavailable, using code point order");
                    None
                }
            }
        })
        .as_ref()
}

/// Label ordering under the `he` collation. Labels the collator ranks equal
/// fall back to code point order.
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    let collated = collator().map_or(Ordering::Equal, |c| c.compare(a, b));
    collated.then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::protocol;
    use crate::labels::DEFAULT_CATEGORY;
    use std::collections::HashSet;

    fn sample() -> Vec<Protocol> {
        vec![
            protocol("p010", "נשימה", "ברונכיוליטיס", 10, 11),
            protocol("p004", "נשימה", "אסתמה", 4, 5),
            protocol("p020", "זיהומים", "ספסיס", 20, 20),
            protocol("p002", "", "החייאה", 2, 3),
            protocol("p015", "זיהומים", "דלקת קרום המוח", 15, 17),
            protocol("p030", "אלרגיה", "אנפילקסיס", 30, 30),
        ]
    }

    #[test]
    fn empty_query_matches_everything() {
        for p in sample() {
            assert!(matches(&p, ""));
        }
    }

    #[test]
    fn matching_is_case_insensitive_over_all_fields() {
        let mut p = protocol("x", "Infections", "Sepsis", 1, 1);
        p.content = "Ceftriaxone 50 mg/kg".into();
        assert!(matches(&p, &normalize_query("  SEPSIS ")));
        assert!(matches(&p, &normalize_query("infect")));
        assert!(matches(&p, &normalize_query("CEFTRIAXONE")));
        assert!(!matches(&p, &normalize_query("asthma")));
    }

    #[test]
    fn filter_keeps_matching_records() {
        let protocols = sample();
        let found = filter(&protocols, "זיהומים");
        let ids: Vec<&str> = found.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p020", "p015"]);
    }

    #[test]
    fn grouping_partitions_without_loss_or_duplication() {
        let protocols = sample();
        let refs: Vec<&Protocol> = protocols.iter().collect();
        let groups = group_by_category(&refs);

        let mut seen = Vec::new();
        for group in &groups {
            for p in &group.items {
                assert_eq!(p.category_label(), group.label);
                seen.push(p.id.clone());
            }
        }
        seen.sort();
        let mut expected: Vec<String> = protocols.iter().map(|p| p.id.clone()).collect();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn groups_are_unique_sorted_and_ordered_by_page() {
        let protocols = sample();
        let refs: Vec<&Protocol> = protocols.iter().collect();
        let groups = group_by_category(&refs);

        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["אלרגיה", "זיהומים", DEFAULT_CATEGORY, "נשימה"]);
        let unique: HashSet<&str> = labels.iter().copied().collect();
        assert_eq!(unique.len(), labels.len());

        for group in &groups {
            assert!(group
                .items
                .windows(2)
                .all(|w| w[0].start_page <= w[1].start_page));
        }
        let breathing = groups.iter().find(|g| g.label == "נשימה").unwrap();
        assert_eq!(breathing.items[0].id, "p004");
    }

    #[test]
    fn mixed_labels_follow_hebrew_collation() {
        let mut labels = vec![
            "beta", "עזרה", "Alpha", "אב", "1 עזרה", "alpha", "אא", "א\"ב",
        ];
        labels.sort_by(|a, b| compare_labels(a, b));
        assert_eq!(
            labels,
            vec!["1 עזרה", "א\"ב", "אא", "אב", "עזרה", "alpha", "Alpha", "beta"]
        );
    }

    #[test]
    fn mixed_categories_group_hebrew_first() {
        let protocols = vec![
            protocol("a", "Trauma", "Burns", 1, 1),
            protocol("b", "נשימה", "אסתמה", 2, 2),
            protocol("c", "allergy", "Anaphylaxis", 3, 3),
        ];
        let refs: Vec<&Protocol> = protocols.iter().collect();
        let labels: Vec<String> = group_by_category(&refs)
            .into_iter()
            .map(|g| g.label)
            .collect();
        assert_eq!(labels, vec!["נשימה", "allergy", "Trauma"]);
    }

    #[test]
    fn grouping_nothing_yields_nothing() {
        assert!(group_by_category(&[]).is_empty());
    }
}
