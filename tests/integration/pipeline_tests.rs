//! Integration tests for the annotation phase
//!
//! These tests build datasets on disk, either through a mocked acquisition
//! run or by hand, and run the annotation pipeline over them.

use crate::common::{article_page, create_test_config, mount_page, seed_page, test_fetcher};
use corpus_harvest::config::{load_config, load_config_with_hash};
use corpus_harvest::corpus::DatasetError;
use corpus_harvest::crawler::{run_acquisition, FailurePolicy};
use corpus_harvest::output::DatasetStatistics;
use corpus_harvest::pipeline::{
    AnalyzerError, AnnotatedText, MergedCorpus, TokenAnalyzer,
};
use corpus_harvest::storage::naming;
use corpus_harvest::{Analyzer, AnnotationPipeline, ConfigError, CorpusManager, FileStore};
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

/// Analyzer that drops the last text
struct OneShortAnalyzer;

impl Analyzer for OneShortAnalyzer {
    fn name(&self) -> &str {
        "one-short"
    }

    fn analyze(&self, texts: &[String]) -> Result<Vec<AnnotatedText>, AnalyzerError> {
        let keep = texts.len().saturating_sub(1);
        Ok(texts[..keep]
            .iter()
            .map(|text| AnnotatedText::new(format!("# text = {}", text)))
            .collect())
    }
}

#[tokio::test]
async fn test_acquire_load_annotate_round_trip() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        200,
        seed_page(&["/news-1-1.html", "/news-2-1.html"]),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-1-1.html",
        200,
        article_page("First", "01.02.2023", "Cats sleep.", "Anna"),
    )
    .await;
    mount_page(
        &mock_server,
        "/news-2-1.html",
        200,
        article_page("Second", "02.02.2023", "Dogs bark!", "Ivan"),
    )
    .await;

    let dir = TempDir::new().unwrap();
    let dataset = dir.path().join("articles");
    let store = FileStore::prepare(&dataset).unwrap();
    let config = create_test_config(&[format!("{}/", base_url)], 2);
    let fetcher = test_fetcher(&config);

    run_acquisition(&config, &fetcher, &store, FailurePolicy::Abort)
        .await
        .unwrap();

    let mut corpus = CorpusManager::load(&dataset).unwrap();
    assert_eq!(corpus.len(), 2);
    assert_eq!(corpus.get(1).unwrap().title, "First");
    assert_eq!(corpus.get(2).unwrap().author, vec!["Ivan".to_string()]);

    let report = AnnotationPipeline::new(&mut corpus, &store, &TokenAnalyzer::new())
        .run()
        .unwrap();
    assert_eq!(report.annotated, 2);

    let cleaned = fs::read_to_string(dataset.join(naming::cleaned(2))).unwrap();
    assert_eq!(cleaned, "dogs bark ivan");

    let conllu = fs::read_to_string(dataset.join(naming::conllu(1))).unwrap();
    assert!(conllu.contains("1\tCats\tcats\tX"));
    assert!(conllu.ends_with('\n'));

    let stats = DatasetStatistics::from_corpus(&CorpusManager::load(&dataset).unwrap());
    assert_eq!(stats.total_articles, 2);
    assert_eq!(stats.cleaned_files, 2);
    assert_eq!(stats.annotation_files, 2);
}

#[test]
fn test_short_analyzer_leaves_last_article_unannotated() {
    let dir = TempDir::new().unwrap();
    for id in 1..=3 {
        fs::write(dir.path().join(naming::raw(id)), format!("Text {}", id)).unwrap();
    }

    let mut corpus = CorpusManager::load(dir.path()).unwrap();
    let store = FileStore::new(dir.path());

    let report = AnnotationPipeline::new(&mut corpus, &store, &OneShortAnalyzer)
        .run()
        .unwrap();

    assert_eq!(report.unaligned, vec![3]);
    assert_eq!(
        fs::read_to_string(dir.path().join(naming::conllu(2))).unwrap(),
        "# text = Text 2\n"
    );
    assert!(!dir.path().join(naming::conllu(3)).exists());
    assert!(dir.path().join(naming::cleaned(3)).exists());
}

#[test]
fn test_inconsistent_dataset_is_rejected_before_annotation() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(naming::raw(1)), "One").unwrap();
    fs::write(dir.path().join(naming::raw(3)), "Three").unwrap();

    assert!(matches!(
        CorpusManager::load(dir.path()),
        Err(DatasetError::InconsistentDataset { .. })
    ));
    assert!(!dir.path().join(naming::cleaned(1)).exists());
}

#[test]
fn test_merged_mode_end_to_end() {
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("cern_a.txt"), "Protons collide.").unwrap();
    fs::write(input.path().join("cern_b.txt"), "Detectors record.").unwrap();
    fs::write(input.path().join("notes.txt"), "Ignored.").unwrap();

    let merged = MergedCorpus::combine(input.path(), "cern").unwrap();
    merged
        .save(&input.path().join(naming::MERGED_TEXT))
        .unwrap();

    let output = TempDir::new().unwrap();
    let store = FileStore::prepare(output.path().join("merged")).unwrap();
    merged.annotate(&TokenAnalyzer::new(), &store).unwrap();

    assert_eq!(
        fs::read_to_string(input.path().join(naming::MERGED_TEXT)).unwrap(),
        "Protons collide.\n\nDetectors record."
    );

    let conllu =
        fs::read_to_string(output.path().join("merged").join(naming::MERGED_ANNOTATION)).unwrap();
    assert!(conllu.contains("1\tProtons\tprotons\tX"));
    assert!(conllu.contains("1\tDetectors\tdetectors\tX"));
    assert!(!conllu.contains("Ignored"));
}

#[test]
fn test_load_json_and_toml_configs() {
    let dir = TempDir::new().unwrap();

    let json_path = dir.path().join("scraper_config.json");
    fs::write(
        &json_path,
        r#"{
            "seed_urls": ["https://www.example.com/news/"],
            "total_articles_to_find_and_parse": 10,
            "headers": {"User-Agent": "Mozilla/5.0"},
            "encoding": "windows-1251",
            "timeout": 10,
            "should_verify_certificate": true,
            "headless_mode": false
        }"#,
    )
    .unwrap();

    let toml_path = dir.path().join("scraper_config.toml");
    fs::write(
        &toml_path,
        r#"
seed_urls = ["https://www.example.com/news/"]
total_articles_to_find_and_parse = 10
encoding = "windows-1251"
timeout = 10
should_verify_certificate = true
headless_mode = false

[headers]
User-Agent = "Mozilla/5.0"
"#,
    )
    .unwrap();

    let (from_json, hash) = load_config_with_hash(&json_path).unwrap();
    let from_toml = load_config(&toml_path).unwrap();

    assert_eq!(hash.len(), 64);
    assert_eq!(from_json.seed_urls(), from_toml.seed_urls());
    assert_eq!(from_json.article_quota(), 10);
    assert_eq!(from_toml.encoding().name(), "windows-1251");
    assert_eq!(from_json.headers(), from_toml.headers());
}

#[test]
fn test_invalid_config_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{
            "seed_urls": ["ftp://example.com/"],
            "total_articles_to_find_and_parse": 10,
            "headers": {},
            "encoding": "utf-8",
            "timeout": 10,
            "should_verify_certificate": true,
            "headless_mode": false
        }"#,
    )
    .unwrap();

    assert!(matches!(
        load_config(&path),
        Err(ConfigError::InvalidSeedUrl(_))
    ));
}
