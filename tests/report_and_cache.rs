use repo_digest::cache::SummaryCache;
use repo_digest::report::{
    read_report, sort_repos, write_atomic, write_report, DigestReport, RepoRecord,
};
use std::fs;
use tempfile::tempdir;

fn record(name: &str, created_at: &str, stars: u64) -> RepoRecord {
    RepoRecord {
        name: name.to_string(),
        description: String::new(),
        summary: None,
        html_url: format!("https://github.com/octo/{name}"),
        private: false,
        languages: vec![],
        pages_url: String::new(),
        stargazers_count: stars,
        topics: vec![],
        created_at: created_at.to_string(),
        updated_at: created_at.to_string(),
        archived: false,
        fork: false,
    }
}

#[test]
fn repos_sort_by_year_then_stars_keeping_ties_stable() {
    let mut repos = vec![
        record("old-popular", "2019-03-01T00:00:00Z", 500),
        record("new-a", "2024-01-10T00:00:00Z", 3),
        record("new-b", "2024-11-10T00:00:00Z", 3),
        record("new-star", "2024-06-01T00:00:00Z", 40),
        record("mid", "2022-05-05T00:00:00Z", 0),
    ];
    sort_repos(&mut repos);
    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["new-star", "new-a", "new-b", "mid", "old-popular"]);
}

#[test]
fn unparsable_creation_date_sorts_last() {
    assert_eq!(record("x", "", 0).creation_year(), 0);
    assert_eq!(record("x", "n/a", 0).creation_year(), 0);
    assert_eq!(record("x", "2021-01-01T00:00:00Z", 0).creation_year(), 2021);

    let mut repos = vec![record("undated", "", 99), record("dated", "2015-01-01T00:00:00Z", 0)];
    sort_repos(&mut repos);
    assert_eq!(repos[0].name, "dated");
}

#[test]
fn report_round_trips_and_omits_missing_summary() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested/out/repos.json");

    let mut with_summary = record("a", "2024-01-01T00:00:00Z", 1);
    with_summary.summary = Some("Does things.".to_string());
    let report = DigestReport {
        languages: vec![],
        repos: vec![with_summary, record("b", "2023-01-01T00:00:00Z", 0)],
    };
    write_report(&path, &report).unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.starts_with("{\n  \"languages\""));
    assert_eq!(json.matches("\"summary\"").count(), 1);
    assert!(json.contains("\"pages_url\": \"\""));

    assert_eq!(read_report(&path).unwrap(), report);
}

#[test]
fn atomic_write_replaces_existing_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("file.json");
    write_atomic(&path, b"first").unwrap();
    write_atomic(&path, b"second").unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    // No temp files left behind.
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn cache_saves_sorted_with_trailing_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data/repo-descriptions.json");

    let mut cache = SummaryCache::default();
    cache.insert("zeta", "Last one.");
    cache.insert("alpha", "First one.");
    cache.insert("empty", "");
    cache.save(&path).unwrap();

    let json = fs::read_to_string(&path).unwrap();
    assert!(json.ends_with("}\n"));
    let alpha = json.find("\"alpha\"").unwrap();
    let empty = json.find("\"empty\"").unwrap();
    let zeta = json.find("\"zeta\"").unwrap();
    assert!(alpha < empty && empty < zeta);

    let loaded = SummaryCache::load(&path);
    assert_eq!(loaded, cache);
    assert_eq!(loaded.len(), 3);
}

#[test]
fn empty_cached_summary_is_not_reusable() {
    let mut cache = SummaryCache::default();
    cache.insert("blank", "");
    cache.insert("full", "Has text.");
    assert_eq!(cache.reusable("blank"), None);
    assert_eq!(cache.get("blank"), Some(""));
    assert_eq!(cache.reusable("full"), Some("Has text."));
    assert_eq!(cache.reusable("missing"), None);
}

#[test]
fn missing_or_corrupt_cache_loads_empty() {
    let dir = tempdir().unwrap();
    assert!(SummaryCache::load(&dir.path().join("absent.json")).is_empty());

    let corrupt = dir.path().join("corrupt.json");
    fs::write(&corrupt, "{ not json").unwrap();
    assert!(SummaryCache::load(&corrupt).is_empty());
}
