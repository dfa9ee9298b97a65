use serde::Deserialize;

use cgrcrab::{prepare_templates, Container, Mapping, MatchOptions, RawTemplate, Reactor};

// ---------------------------------------------------------------------------
// 1. Substructure counts
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct CountEntry {
    name: String,
    #[serde(default)]
    options: MatchOptions,
    structure: Container,
    pattern: Container,
    count: usize,
}

#[test]
fn approval_substructure_counts() {
    let data: Vec<CountEntry> =
        serde_json::from_str(include_str!("approval_data/substructure_counts.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let reactor = Reactor::new(entry.options);

        let all = reactor
            .get_substructure_mapping(&entry.structure, &entry.pattern, -1)
            .unwrap()
            .into_vec();
        if all.len() != entry.count {
            failures.push(format!(
                "[count] {}: expected {}, got {}",
                entry.name,
                entry.count,
                all.len()
            ));
        }

        let mut distinct = all.clone();
        distinct.sort();
        distinct.dedup();
        if distinct.len() != all.len() {
            failures.push(format!("[duplicates] {}: {all:?}", entry.name));
        }

        let found = reactor.is_substructure(&entry.structure, &entry.pattern);
        if found != (entry.count > 0) {
            failures.push(format!(
                "[is_substructure] {}: expected {}, got {found}",
                entry.name,
                entry.count > 0
            ));
        }

        if entry.count > 1 {
            let capped = reactor
                .get_substructure_mapping(&entry.structure, &entry.pattern, 2)
                .unwrap()
                .into_vec();
            if capped.len() != 2 {
                failures.push(format!(
                    "[limit] {}: expected 2, got {}",
                    entry.name,
                    capped.len()
                ));
            }
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} substructure failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

// ---------------------------------------------------------------------------
// 2. Template search and patching
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ExpectedMatch {
    template: String,
    mapping: Mapping,
    result: Container,
}

#[derive(Deserialize)]
struct SearchEntry {
    name: String,
    #[serde(default)]
    options: MatchOptions,
    skip_intersection: bool,
    templates: Vec<RawTemplate>,
    structure: Container,
    matches: Vec<ExpectedMatch>,
}

#[test]
fn approval_template_search() {
    let data: Vec<SearchEntry> =
        serde_json::from_str(include_str!("approval_data/template_search.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let reactor = Reactor::new(entry.options);
        let templates = match prepare_templates(entry.templates.clone()) {
            Ok(t) => t,
            Err(e) => {
                failures.push(format!("[prepare] {}: {e}", entry.name));
                continue;
            }
        };

        let before = entry.structure.clone();
        let found: Vec<_> = reactor
            .template_searcher(&templates)
            .search(&entry.structure, entry.skip_intersection)
            .collect();
        if found.len() != entry.matches.len() {
            failures.push(format!(
                "[matches] {}: expected {}, got {}",
                entry.name,
                entry.matches.len(),
                found.len()
            ));
            continue;
        }

        for (i, (m, expected)) in found.iter().zip(&entry.matches).enumerate() {
            let template = m.meta.get("name").map(String::as_str).unwrap_or_default();
            if template != expected.template {
                failures.push(format!(
                    "[template] {} #{i}: expected {}, got {template}",
                    entry.name, expected.template
                ));
            }
            if m.mapping != expected.mapping {
                failures.push(format!(
                    "[mapping] {} #{i}: expected {:?}, got {:?}",
                    entry.name, expected.mapping, m.mapping
                ));
            }
            match m.apply(&entry.structure) {
                Ok(result) if result == expected.result => {}
                Ok(result) => failures.push(format!(
                    "[result] {} #{i}: expected {:?}, got {result:?}",
                    entry.name, expected.result
                )),
                Err(e) => failures.push(format!("[apply] {} #{i}: {e}", entry.name)),
            }
        }

        if entry.structure != before {
            failures.push(format!("[mutated] {}", entry.name));
        }
    }

    if !failures.is_empty() {
        panic!(
            "{} template search failures:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}
