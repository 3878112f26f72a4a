use crate::corpus::CorpusManager;
use crate::pipeline::{AnnotatedText, Analyzer};
use crate::storage::DatasetStore;
use crate::HarvestError;

/// Outcome of an annotation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Records processed
    pub articles: usize,

    /// Records that received an annotation
    pub annotated: usize,

    /// Ids left without an annotation because the analyzer returned too few results
    pub unaligned: Vec<u32>,
}

/// Runs an analyzer over every record of a loaded dataset
///
/// Result `k` of the analyzer belongs to the record with id `k + 1`. Every
/// record gets a cleaned text artifact; only aligned records get an
/// annotation artifact.
pub struct AnnotationPipeline<'a> {
    corpus: &'a mut CorpusManager,
    store: &'a dyn DatasetStore,
    analyzer: &'a dyn Analyzer,
}

impl<'a> AnnotationPipeline<'a> {
    pub fn new(
        corpus: &'a mut CorpusManager,
        store: &'a dyn DatasetStore,
        analyzer: &'a dyn Analyzer,
    ) -> Self {
        Self {
            corpus,
            store,
            analyzer,
        }
    }

    /// Annotates the whole dataset in one analyzer call
    pub fn run(&mut self) -> Result<PipelineReport, HarvestError> {
        let texts: Vec<String> = self
            .corpus
            .articles()
            .values()
            .map(|article| article.body.clone())
            .collect();

        tracing::info!(
            "Annotating {} texts with the '{}' analyzer",
            texts.len(),
            self.analyzer.name()
        );

        let results = self.analyzer.analyze(&texts)?;
        if results.len() < texts.len() {
            tracing::warn!(
                "Analyzer returned {} results for {} texts; trailing articles stay unannotated",
                results.len(),
                texts.len()
            );
        } else if results.len() > texts.len() {
            tracing::warn!(
                "Analyzer returned {} results for {} texts; extra results ignored",
                results.len(),
                texts.len()
            );
        }

        let mut slots: Vec<Option<AnnotatedText>> = results.into_iter().map(Some).collect();
        let mut report = PipelineReport {
            articles: texts.len(),
            ..PipelineReport::default()
        };

        for (&id, article) in self.corpus.articles_mut().iter_mut() {
            self.store.write_cleaned(article)?;

            let position = (id as usize).saturating_sub(1);
            match slots.get_mut(position).and_then(Option::take) {
                Some(annotation) => {
                    article.annotation = Some(annotation);
                    self.analyzer.persist(article, self.store)?;
                    report.annotated += 1;
                }
                None => report.unaligned.push(id),
            }
        }

        tracing::info!(
            "Annotation finished: {} of {} articles annotated",
            report.annotated,
            report.articles
        );

        Ok(report)
    }
}

/// Annotates a merged corpus as a single text
///
/// The analyzer's results are joined by newlines and written to the merged
/// annotation artifact. Returns the number of results received.
pub fn annotate_merged(
    text: &str,
    analyzer: &dyn Analyzer,
    store: &dyn DatasetStore,
) -> Result<usize, HarvestError> {
    tracing::info!(
        "Annotating merged corpus ({} bytes) with the '{}' analyzer",
        text.len(),
        analyzer.name()
    );

    let results = analyzer.analyze(&[text.to_string()])?;
    let joined = results
        .iter()
        .map(AnnotatedText::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    store.write_merged_annotation(&joined)?;
    Ok(results.len())
}
