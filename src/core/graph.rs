//! Import graph and page-level key closure.
//!
//! Import specifiers are resolved purely lexically against the set of
//! scanned files: only relative specifiers resolve, with the usual
//! extension and `index.*` fallbacks. Package and alias imports stay
//! unresolved on purpose, so the graph never guesses at tooling config.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::scanner::{FileScan, SOURCE_EXTENSIONS};

/// Directory segments that mark their files as page entry points.
const PAGE_DIRS: &[&str] = &["pages", "routes", "app"];

/// File stems that mark app entry points outside page directories.
const ENTRY_STEMS: &[&str] = &["App", "main"];

/// Keys attributed to one file or page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileKeys {
    pub id: String,
    pub file: String,
    /// Sorted, deduplicated.
    pub keys: Vec<String>,
}

/// Per-file direct keys plus per-page transitive closures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyUsageMap {
    pub pages: Vec<FileKeys>,
    pub files: Vec<FileKeys>,
}

/// Stable identifier for a relative path: extension stripped, `/` to `.`.
pub fn file_id(relative_path: &str) -> String {
    let without_ext = relative_path
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(relative_path);
    without_ext.replace('/', ".")
}

/// A page is anything under a page directory, or an app entry stem.
pub fn is_page(relative_path: &str) -> bool {
    let segments: Vec<&str> = relative_path.split('/').collect();
    let (file_name, dirs) = match segments.split_last() {
        Some(split) => split,
        None => return false,
    };

    if dirs.iter().any(|dir| PAGE_DIRS.contains(dir)) {
        return true;
    }

    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(file_name);
    ENTRY_STEMS.contains(&stem)
}

/// Resolve one import specifier from `importer` against the scanned set.
///
/// Only `./` and `../` specifiers resolve. Tries the literal path, then
/// each source extension, then `index.*` inside the named directory.
pub fn resolve_import(
    importer: &str,
    specifier: &str,
    scanned: &BTreeSet<String>,
) -> Option<String> {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return None;
    }

    let mut parts: Vec<&str> = importer.split('/').collect();
    parts.pop(); // drop the importer's file name

    for segment in specifier.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                // Escaping above the scan root cannot resolve.
                parts.pop()?;
            }
            other => parts.push(other),
        }
    }
    let base = parts.join("/");

    if scanned.contains(&base) {
        return Some(base);
    }
    for ext in SOURCE_EXTENSIONS {
        let candidate = format!("{}.{}", base, ext);
        if scanned.contains(&candidate) {
            return Some(candidate);
        }
    }
    for ext in SOURCE_EXTENSIONS {
        let candidate = if base.is_empty() {
            format!("index.{}", ext)
        } else {
            format!("{}/index.{}", base, ext)
        };
        if scanned.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Adjacency map of resolved imports, one entry per scanned file.
pub fn build_import_graph(scans: &BTreeMap<String, FileScan>) -> BTreeMap<String, Vec<String>> {
    let scanned: BTreeSet<String> = scans.keys().cloned().collect();
    scans
        .iter()
        .map(|(file, scan)| {
            let mut deps: Vec<String> = scan
                .imports
                .iter()
                .filter_map(|spec| resolve_import(file, spec, &scanned))
                .collect();
            deps.sort();
            deps.dedup();
            (file.clone(), deps)
        })
        .collect()
}

/// Every file reachable from `start`, including itself.
fn reachable(start: &str, graph: &BTreeMap<String, Vec<String>>) -> BTreeSet<String> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack = vec![start.to_string()];

    while let Some(file) = stack.pop() {
        if !visited.insert(file.clone()) {
            continue;
        }
        if let Some(deps) = graph.get(&file) {
            stack.extend(deps.iter().cloned());
        }
    }
    visited
}

fn sorted_unique(keys: impl IntoIterator<Item = String>) -> Vec<String> {
    let set: BTreeSet<String> = keys.into_iter().collect();
    set.into_iter().collect()
}

/// Build the per-file and per-page key map from one scan.
pub fn build_key_usage_map(scans: &BTreeMap<String, FileScan>) -> KeyUsageMap {
    let graph = build_import_graph(scans);

    let files: Vec<FileKeys> = scans
        .iter()
        .map(|(file, scan)| FileKeys {
            id: file_id(file),
            file: file.clone(),
            keys: sorted_unique(scan.keys.iter().cloned()),
        })
        .collect();

    let pages: Vec<FileKeys> = scans
        .keys()
        .filter(|file| is_page(file))
        .map(|file| {
            let closure_keys = reachable(file, &graph)
                .into_iter()
                .filter_map(|dep| scans.get(&dep))
                .flat_map(|scan| scan.keys.iter().cloned());
            FileKeys {
                id: file_id(file),
                file: file.clone(),
                keys: sorted_unique(closure_keys),
            }
        })
        .collect();

    KeyUsageMap { pages, files }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn scan(keys: &[&str], imports: &[&str]) -> FileScan {
        FileScan {
            keys: keys.iter().map(|s| s.to_string()).collect(),
            imports: imports.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn scanned(files: &[&str]) -> BTreeSet<String> {
        files.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_file_id() {
        assert_eq!(file_id("app/login/page.tsx"), "app.login.page");
        assert_eq!(file_id("main.tsx"), "main");
    }

    #[test]
    fn test_is_page() {
        assert!(is_page("pages/login.tsx"));
        assert!(is_page("src/app/settings/page.tsx"));
        assert!(is_page("src/routes/home.jsx"));
        assert!(is_page("src/App.tsx"));
        assert!(is_page("main.ts"));

        assert!(!is_page("components/Button.tsx"));
        assert!(!is_page("src/apples/x.tsx"));
        assert!(!is_page("src/mainframe.ts"));
    }

    #[test]
    fn test_resolve_relative_with_extension_fallback() {
        let set = scanned(&["app/page.tsx", "components/Button.tsx"]);
        assert_eq!(
            resolve_import("app/page.tsx", "../components/Button", &set),
            Some("components/Button.tsx".to_string())
        );
    }

    #[test]
    fn test_resolve_exact_and_index() {
        let set = scanned(&["lib/util.ts", "components/index.tsx", "app/page.tsx"]);
        assert_eq!(
            resolve_import("app/page.tsx", "../lib/util.ts", &set),
            Some("lib/util.ts".to_string())
        );
        assert_eq!(
            resolve_import("app/page.tsx", "../components", &set),
            Some("components/index.tsx".to_string())
        );
    }

    #[test]
    fn test_package_imports_stay_unresolved() {
        let set = scanned(&["app/page.tsx", "react.ts"]);
        assert_eq!(resolve_import("app/page.tsx", "react", &set), None);
        assert_eq!(resolve_import("app/page.tsx", "@scope/pkg", &set), None);
    }

    #[test]
    fn test_resolve_escaping_root_fails() {
        let set = scanned(&["page.tsx"]);
        assert_eq!(resolve_import("page.tsx", "../../outside", &set), None);
    }

    #[test]
    fn test_page_closure_includes_imported_component_keys() {
        let mut scans = BTreeMap::new();
        scans.insert(
            "pages/login.tsx".to_string(),
            scan(&["auth.login.title"], &["../components/Form"]),
        );
        scans.insert(
            "components/Form.tsx".to_string(),
            scan(&["form.submit", "form.cancel"], &["./Field"]),
        );
        scans.insert(
            "components/Field.tsx".to_string(),
            scan(&["form.field.label"], &[]),
        );

        let map = build_key_usage_map(&scans);
        assert_eq!(map.pages.len(), 1);
        let page = &map.pages[0];
        assert_eq!(page.file, "pages/login.tsx");
        assert_eq!(
            page.keys,
            vec![
                "auth.login.title",
                "form.cancel",
                "form.field.label",
                "form.submit",
            ]
        );

        // Direct file entries carry only their own keys.
        let form = map
            .files
            .iter()
            .find(|f| f.file == "components/Form.tsx")
            .unwrap();
        assert_eq!(form.keys, vec!["form.cancel", "form.submit"]);
    }

    #[test]
    fn test_cycles_terminate() {
        let mut scans = BTreeMap::new();
        scans.insert("pages/a.tsx".to_string(), scan(&["a.key"], &["./b"]));
        scans.insert("pages/b.tsx".to_string(), scan(&["b.key"], &["./a"]));

        let map = build_key_usage_map(&scans);
        for page in &map.pages {
            assert_eq!(page.keys, vec!["a.key", "b.key"]);
        }
    }
}
