//! Resource extraction pipeline: roadmap → links → validated preview cards.
//!
//! 1. Scan: markdown links from step resources (and advertised practice
//!    lines), then bare URLs from the top-level resource bag
//! 2. Classify each URL and drop duplicates per category (first occurrence wins)
//! 3. Validate every candidate concurrently, each fetch bounded by a timeout
//! 4. Aggregate verdicts back in scan order
//!
//! Per-link failures never become errors. A malformed URL or a link that
//! fails its provider's rules is dropped; a provider that cannot answer in
//! time yields a fallback preview instead. Only cancellation is reported.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use pathfinder_extract::{
    RepoPath, article_host, classify, is_advertised_link, preview_ref, repo_path, scan_bare_url,
    scan_links, video_id,
};
use pathfinder_providers::validate::{Shortfall, repo_shortfall, video_shortfall};
use pathfinder_providers::{CodeHostMetadataProvider, VideoMetadataProvider};
use pathfinder_shared::{
    ExtractedLink, ExtractionConfig, ExtractionResult, PathfinderError, Provider, Result,
    RoadmapDocument,
};

// ---------------------------------------------------------------------------
// Candidates
// ---------------------------------------------------------------------------

/// Where a candidate link was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSource {
    StepResource,
    StepPractice,
    BagRepository,
    BagArticle,
    RawText,
}

/// A classified, not yet validated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub url: String,
    pub provider: Provider,
    pub source: LinkSource,
}

/// Per-provider handling, resolved from a URL before any fetch.
///
/// Fetching variants carry the provider's lookup key.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LinkStrategy {
    Video(String),
    CodeRepo(RepoPath),
    /// No metadata provider; a well-formed URL is accepted as is.
    Article,
}

impl LinkStrategy {
    /// `None` when the URL's shape does not fit its provider.
    fn resolve(candidate: &Candidate) -> Option<Self> {
        match candidate.provider {
            Provider::Video => video_id(&candidate.url).map(Self::Video),
            Provider::CodeRepo => repo_path(&candidate.url).map(Self::CodeRepo),
            Provider::Article | Provider::Unknown => {
                article_host(&candidate.url).map(|_| Self::Article)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// Why a candidate was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No video id / no `owner/repo` could be extracted.
    MalformedInput,
    /// Metadata was fetched and failed the provider's rules.
    ValidationFailed(Shortfall),
}

/// Outcome of validating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Metadata fetched and passed.
    Accepted(String),
    /// Provider unavailable or timed out; kept with a derived preview.
    Fallback(String),
    Rejected(Rejection),
}

impl Verdict {
    fn preview_ref(&self) -> Option<&str> {
        match self {
            Self::Accepted(preview) | Self::Fallback(preview) => Some(preview),
            Self::Rejected(_) => None,
        }
    }
}

/// Counts logged at the end of each run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionStats {
    pub candidates: usize,
    pub duplicates: usize,
    pub accepted: usize,
    pub fallbacks: usize,
    pub malformed: usize,
    pub failed_validation: usize,
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Collect candidates from a roadmap in scan order: steps in order, each
/// step's `resources` before its advertised `practice` lines, then the
/// top-level resource bag (repositories, then articles).
///
/// Duplicates within a category are dropped here so each URL is fetched at
/// most once per run. Returns the candidates and the number of duplicates.
pub fn collect_candidates(
    doc: &RoadmapDocument,
    keep_unlisted_articles: bool,
) -> (Vec<Candidate>, usize) {
    let mut dedup = Deduplicator::default();

    for step in &doc.steps {
        for line in &step.resources {
            dedup.push_markdown(line, LinkSource::StepResource, keep_unlisted_articles);
        }
        for line in step.practice.iter().filter(|l| is_advertised_link(l)) {
            dedup.push_markdown(line, LinkSource::StepPractice, keep_unlisted_articles);
        }
    }

    if let Some(bag) = &doc.resources {
        for raw in &bag.github {
            let Some(url) = scan_bare_url(raw) else {
                debug!(url = %raw, "skipping malformed repository URL");
                continue;
            };
            let provider = classify(&url);
            dedup.push_routed(url, provider, LinkSource::BagRepository, keep_unlisted_articles);
        }
        for raw in &bag.blogs {
            let Some(url) = scan_bare_url(raw) else {
                debug!(url = %raw, "skipping malformed article URL");
                continue;
            };
            dedup.push(url, Provider::Article, LinkSource::BagArticle);
        }
    }

    dedup.finish()
}

/// Collect candidates from a raw text blob; every link in it is eligible.
pub fn collect_text_candidates(text: &str, keep_unlisted_articles: bool) -> (Vec<Candidate>, usize) {
    let mut dedup = Deduplicator::default();
    dedup.push_markdown(text, LinkSource::RawText, keep_unlisted_articles);
    dedup.finish()
}

/// Order-preserving, first-wins dedup keyed by (category, url).
#[derive(Default)]
struct Deduplicator {
    seen: HashSet<(Provider, String)>,
    candidates: Vec<Candidate>,
    duplicates: usize,
}

impl Deduplicator {
    fn push_markdown(&mut self, text: &str, source: LinkSource, keep_unlisted_articles: bool) {
        for link in scan_links(text) {
            let provider = classify(&link.url);
            self.push_routed(link.url, provider, source, keep_unlisted_articles);
        }
    }

    /// Keep videos and repositories; keep articles only when opted in.
    fn push_routed(
        &mut self,
        url: String,
        provider: Provider,
        source: LinkSource,
        keep_unlisted_articles: bool,
    ) {
        match provider {
            Provider::Video | Provider::CodeRepo => self.push(url, provider, source),
            Provider::Article if keep_unlisted_articles => self.push(url, provider, source),
            Provider::Article | Provider::Unknown => {
                debug!(%url, %provider, ?source, "link not retained");
            }
        }
    }

    fn push(&mut self, url: String, provider: Provider, source: LinkSource) {
        if self.seen.insert((provider, url.clone())) {
            self.candidates.push(Candidate {
                url,
                provider,
                source,
            });
        } else {
            self.duplicates += 1;
        }
    }

    fn finish(self) -> (Vec<Candidate>, usize) {
        (self.candidates, self.duplicates)
    }
}

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// The extraction pipeline with its provider collaborators.
#[derive(Clone)]
pub struct Extractor {
    video: Arc<dyn VideoMetadataProvider>,
    code_host: Arc<dyn CodeHostMetadataProvider>,
    config: ExtractionConfig,
}

impl Extractor {
    pub fn new(
        video: Arc<dyn VideoMetadataProvider>,
        code_host: Arc<dyn CodeHostMetadataProvider>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            video,
            code_host,
            config,
        }
    }

    /// Extract validated links from a roadmap document.
    #[instrument(skip_all, fields(steps = doc.steps.len()))]
    pub async fn extract_document(
        &self,
        doc: &RoadmapDocument,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        let (candidates, duplicates) = collect_candidates(doc, self.config.keep_unlisted_articles);
        self.run(candidates, duplicates, cancel).await
    }

    /// Extract validated links from a raw text blob.
    #[instrument(skip_all, fields(len = text.len()))]
    pub async fn extract_text(
        &self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        let (candidates, duplicates) =
            collect_text_candidates(text, self.config.keep_unlisted_articles);
        self.run(candidates, duplicates, cancel).await
    }

    /// Validate candidates concurrently and aggregate in scan order.
    async fn run(
        &self,
        candidates: Vec<Candidate>,
        duplicates: usize,
        cancel: &CancellationToken,
    ) -> Result<ExtractionResult> {
        if candidates.is_empty() {
            info!("no candidate links found");
            return Ok(ExtractionResult::default());
        }

        let now = Utc::now();
        let semaphore = Semaphore::new(self.config.concurrency.max(1));

        info!(
            candidates = candidates.len(),
            duplicates,
            concurrency = self.config.concurrency,
            "validating links"
        );

        // Scatter: one future per candidate; join_all keeps results index-aligned.
        let judged = join_all(candidates.iter().map(|candidate| async {
            let _permit = semaphore.acquire().await;
            self.judge(candidate, now).await
        }));

        let verdicts = tokio::select! {
            verdicts = judged => verdicts,
            _ = cancel.cancelled() => {
                warn!("extraction cancelled, discarding in-flight fetches");
                return Err(PathfinderError::Cancelled);
            }
        };

        let (links, stats) = gather(candidates, verdicts, duplicates);
        let result = aggregate(links);

        info!(
            videos = result.video_links.len(),
            repositories = result.code_links.len(),
            articles = result.article_links.len(),
            candidates = stats.candidates,
            duplicates = stats.duplicates,
            accepted = stats.accepted,
            fallbacks = stats.fallbacks,
            malformed = stats.malformed,
            failed_validation = stats.failed_validation,
            "extraction complete"
        );

        Ok(result)
    }

    /// Validate a single candidate. Never fails: provider errors and
    /// timeouts become [`Verdict::Fallback`].
    async fn judge(&self, candidate: &Candidate, now: DateTime<Utc>) -> Verdict {
        let (Some(strategy), Some(preview)) = (
            LinkStrategy::resolve(candidate),
            preview_ref(candidate.provider, &candidate.url),
        ) else {
            debug!(url = %candidate.url, provider = %candidate.provider, "malformed link rejected");
            return Verdict::Rejected(Rejection::MalformedInput);
        };
        let timeout = self.config.fetch_timeout;

        let outcome = match &strategy {
            LinkStrategy::Video(id) => {
                tokio::time::timeout(timeout, self.video.video_metadata(id))
                    .await
                    .map(|fetched| fetched.map(|meta| video_shortfall(&meta, now)))
            }
            LinkStrategy::CodeRepo(path) => {
                tokio::time::timeout(timeout, self.code_host.repo_metadata(path))
                    .await
                    .map(|fetched| fetched.map(|meta| repo_shortfall(&meta, now)))
            }
            // Articles have no metadata provider.
            LinkStrategy::Article => Ok(Ok(None)),
        };

        match outcome {
            Ok(Ok(None)) => Verdict::Accepted(preview),
            Ok(Ok(Some(shortfall))) => {
                debug!(url = %candidate.url, %shortfall, "link failed validation");
                Verdict::Rejected(Rejection::ValidationFailed(shortfall))
            }
            Ok(Err(e)) => {
                warn!(url = %candidate.url, error = %e, "provider unavailable, using fallback preview");
                Verdict::Fallback(preview)
            }
            Err(_) => {
                warn!(
                    url = %candidate.url,
                    timeout_ms = timeout.as_millis() as u64,
                    "provider fetch timed out, using fallback preview"
                );
                Verdict::Fallback(preview)
            }
        }
    }
}

impl ExtractionStats {
    fn record(&mut self, verdict: &Verdict) {
        match verdict {
            Verdict::Accepted(_) => self.accepted += 1,
            Verdict::Fallback(_) => self.fallbacks += 1,
            Verdict::Rejected(Rejection::MalformedInput) => self.malformed += 1,
            Verdict::Rejected(Rejection::ValidationFailed(_)) => self.failed_validation += 1,
        }
    }
}

/// Pair each candidate with its verdict, in scan order, and tally the run.
fn gather(
    candidates: Vec<Candidate>,
    verdicts: Vec<Verdict>,
    duplicates: usize,
) -> (Vec<ExtractedLink>, ExtractionStats) {
    let mut stats = ExtractionStats {
        candidates: candidates.len(),
        duplicates,
        ..Default::default()
    };
    let links = candidates
        .into_iter()
        .zip(verdicts)
        .map(|(candidate, verdict)| {
            stats.record(&verdict);
            ExtractedLink {
                url: candidate.url,
                provider: candidate.provider,
                preview_ref: verdict.preview_ref().map(String::from),
            }
        })
        .collect();
    (links, stats)
}

/// Split scan-ordered links into the three output sequences.
///
/// Rejected links are dropped; a URL already present in its category is
/// ignored so the first occurrence keeps its position.
pub fn aggregate(links: impl IntoIterator<Item = ExtractedLink>) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    let mut seen: HashSet<(Provider, String)> = HashSet::new();

    for link in links {
        let provider = link.provider;
        if !seen.insert((provider, link.url.clone())) {
            continue;
        }
        let Some(card) = link.into_card() else {
            continue;
        };
        match provider {
            Provider::Video => result.video_links.push(card),
            Provider::CodeRepo => result.code_links.push(card),
            Provider::Article | Provider::Unknown => result.article_links.push(card),
        }
    }

    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::TimeDelta;
    use pathfinder_providers::{RepoMetadata, VideoMetadata};
    use pathfinder_shared::{LinkCard, ResourceBag, Step};

    // -----------------------------------------------------------------------
    // Fake providers
    // -----------------------------------------------------------------------

    #[derive(Clone)]
    enum Answer<T> {
        Found(T),
        Fails,
        Hangs,
    }

    #[derive(Default)]
    struct FakeVideos {
        answers: HashMap<String, (Answer<VideoMetadata>, Duration)>,
        calls: AtomicUsize,
    }

    impl FakeVideos {
        fn with(mut self, id: &str, answer: Answer<VideoMetadata>) -> Self {
            self.answers.insert(id.into(), (answer, Duration::ZERO));
            self
        }

        fn delayed(mut self, id: &str, answer: Answer<VideoMetadata>, delay: Duration) -> Self {
            self.answers.insert(id.into(), (answer, delay));
            self
        }
    }

    #[async_trait]
    impl VideoMetadataProvider for FakeVideos {
        async fn video_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (answer, delay) = self
                .answers
                .get(video_id)
                .cloned()
                .unwrap_or((Answer::Fails, Duration::ZERO));
            tokio::time::sleep(delay).await;
            match answer {
                Answer::Found(meta) => Ok(meta),
                Answer::Fails => Err(PathfinderError::unavailable("fake", "no such video")),
                Answer::Hangs => std::future::pending().await,
            }
        }
    }

    #[derive(Default)]
    struct FakeRepos {
        answers: HashMap<String, Answer<RepoMetadata>>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeRepos {
        fn with(mut self, path: &str, answer: Answer<RepoMetadata>) -> Self {
            self.answers.insert(path.into(), answer);
            self
        }
    }

    #[async_trait]
    impl CodeHostMetadataProvider for FakeRepos {
        async fn repo_metadata(&self, repo: &RepoPath) -> Result<RepoMetadata> {
            let key = repo.to_string();
            self.requested.lock().unwrap().push(key.clone());
            match self.answers.get(&key).cloned().unwrap_or(Answer::Fails) {
                Answer::Found(meta) => Ok(meta),
                Answer::Fails => Err(PathfinderError::unavailable("fake", "no such repo")),
                Answer::Hangs => std::future::pending().await,
            }
        }
    }

    fn video(age_days: i64, views: u64, likes: u64) -> VideoMetadata {
        VideoMetadata {
            published_at: Utc::now() - TimeDelta::days(age_days),
            view_count: views,
            like_count: likes,
        }
    }

    fn repo(idle_days: i64, stars: u64, archived: bool) -> RepoMetadata {
        RepoMetadata {
            updated_at: Utc::now() - TimeDelta::days(idle_days),
            star_count: stars,
            archived,
        }
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig {
            fetch_timeout: Duration::from_millis(300),
            concurrency: 4,
            keep_unlisted_articles: false,
        }
    }

    fn extractor(videos: FakeVideos, repos: FakeRepos) -> Extractor {
        Extractor::new(Arc::new(videos), Arc::new(repos), config())
    }

    fn step(id: &str, resources: &[&str], practice: &[&str]) -> Step {
        Step {
            id: id.into(),
            title: format!("Step {id}"),
            resources: resources.iter().map(|s| s.to_string()).collect(),
            practice: practice.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn card(url: &str, preview: &str) -> LinkCard {
        LinkCard {
            url: url.into(),
            preview_ref: preview.into(),
        }
    }

    // -----------------------------------------------------------------------
    // Scanning
    // -----------------------------------------------------------------------

    #[test]
    fn candidates_follow_scan_order() {
        let doc = RoadmapDocument {
            steps: vec![
                step(
                    "1",
                    &["[A](https://youtu.be/aaa) and [B](https://github.com/o/b)"],
                    &["Video: [Watch Here](https://youtu.be/ppp)", "[skip](https://youtu.be/zzz)"],
                ),
                step("2", &["[C](https://youtu.be/ccc)"], &[]),
            ],
            resources: Some(ResourceBag {
                github: vec!["https://github.com/top/level".into()],
                blogs: vec!["https://dev.to/post".into()],
            }),
        };

        let (candidates, duplicates) = collect_candidates(&doc, false);
        let urls: Vec<&str> = candidates.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://youtu.be/aaa",
                "https://github.com/o/b",
                "https://youtu.be/ppp",
                "https://youtu.be/ccc",
                "https://github.com/top/level",
                "https://dev.to/post",
            ]
        );
        assert_eq!(duplicates, 0);
        assert_eq!(candidates[2].source, LinkSource::StepPractice);
        assert_eq!(candidates[5].provider, Provider::Article);
    }

    #[test]
    fn unlisted_articles_need_opt_in() {
        let doc = RoadmapDocument {
            steps: vec![step("1", &["[Docs](https://doc.rust-lang.org/book/)"], &[])],
            resources: None,
        };
        assert!(collect_candidates(&doc, false).0.is_empty());

        let (kept, _) = collect_candidates(&doc, true);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].provider, Provider::Article);
    }

    #[test]
    fn blog_bag_entries_are_articles_regardless_of_domain() {
        let doc = RoadmapDocument {
            steps: vec![],
            resources: Some(ResourceBag {
                github: vec!["not a url".into()],
                blogs: vec!["https://github.com/someone/blog-post".into()],
            }),
        };
        let (candidates, _) = collect_candidates(&doc, false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].provider, Provider::Article);
    }

    #[test]
    fn duplicates_are_counted_and_dropped() {
        let doc = RoadmapDocument {
            steps: vec![
                step("1", &["[x](https://github.com/foo/bar)"], &[]),
                step("2", &["[again](https://github.com/foo/bar)"], &[]),
            ],
            resources: Some(ResourceBag {
                github: vec!["https://github.com/foo/bar".into()],
                blogs: vec![],
            }),
        };
        let (candidates, duplicates) = collect_candidates(&doc, false);
        assert_eq!(candidates.len(), 1);
        assert_eq!(duplicates, 2);
    }

    #[test]
    fn aggregate_keeps_first_and_drops_rejected() {
        let links = vec![
            ExtractedLink {
                url: "https://youtu.be/a".into(),
                provider: Provider::Video,
                preview_ref: Some("a".into()),
            },
            ExtractedLink {
                url: "https://github.com/x/y".into(),
                provider: Provider::CodeRepo,
                preview_ref: None,
            },
            ExtractedLink {
                url: "https://youtu.be/a".into(),
                provider: Provider::Video,
                preview_ref: Some("later".into()),
            },
        ];
        let result = aggregate(links);
        assert_eq!(result.video_links, vec![card("https://youtu.be/a", "a")]);
        assert!(result.code_links.is_empty());
    }

    #[test]
    fn gather_tallies_every_verdict() {
        let urls = [
            "https://youtu.be/a",
            "https://youtu.be/b",
            "https://youtu.be/c",
            "https://github.com/x",
            "https://github.com/x/y",
        ];
        let candidates: Vec<Candidate> = urls
            .into_iter()
            .map(|url| Candidate {
                url: url.into(),
                provider: classify(url),
                source: LinkSource::RawText,
            })
            .collect();
        let verdicts = vec![
            Verdict::Accepted("a".into()),
            Verdict::Fallback("b".into()),
            Verdict::Rejected(Rejection::ValidationFailed(Shortfall::TooFewViews)),
            Verdict::Rejected(Rejection::MalformedInput),
            Verdict::Accepted("x/y".into()),
        ];

        let (links, stats) = gather(candidates, verdicts, 3);

        assert_eq!(
            stats,
            ExtractionStats {
                candidates: 5,
                duplicates: 3,
                accepted: 2,
                fallbacks: 1,
                malformed: 1,
                failed_validation: 1,
            }
        );
        let previews: Vec<Option<&str>> = links.iter().map(|l| l.preview_ref.as_deref()).collect();
        assert_eq!(previews, vec![Some("a"), Some("b"), None, None, Some("x/y")]);
    }

    // -----------------------------------------------------------------------
    // End-to-end scenarios
    // -----------------------------------------------------------------------

    fn intro_video_doc() -> RoadmapDocument {
        RoadmapDocument {
            steps: vec![step(
                "1",
                &["Resource: [Intro Video](https://youtube.com/watch?v=abc123) - good overview"],
                &[],
            )],
            resources: None,
        }
    }

    #[tokio::test]
    async fn popular_video_is_accepted_with_id_preview() {
        let videos = FakeVideos::default().with("abc123", Answer::Found(video(182, 20_000, 300)));
        let result = extractor(videos, FakeRepos::default())
            .extract_document(&intro_video_doc(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.video_links,
            vec![card("https://youtube.com/watch?v=abc123", "abc123")]
        );
    }

    #[tokio::test]
    async fn unpopular_video_is_dropped() {
        let videos = FakeVideos::default().with("abc123", Answer::Found(video(182, 500, 300)));
        let result = extractor(videos, FakeRepos::default())
            .extract_document(&intro_video_doc(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(result.video_links.is_empty());
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn timed_out_repo_falls_back() {
        let repos = FakeRepos::default().with("foo/bar", Answer::Hangs);
        let doc = RoadmapDocument {
            steps: vec![step("1", &["[Repo](https://github.com/foo/bar)"], &[])],
            resources: None,
        };

        let result = extractor(FakeVideos::default(), repos)
            .extract_document(&doc, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.code_links,
            vec![card("https://github.com/foo/bar", "foo/bar")]
        );
    }

    #[tokio::test]
    async fn failed_video_lookup_falls_back() {
        let videos = FakeVideos::default().with("abc123", Answer::Fails);
        let result = extractor(videos, FakeRepos::default())
            .extract_document(&intro_video_doc(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.video_links.len(), 1);
        assert_eq!(result.video_links[0].preview_ref, "abc123");
    }

    #[tokio::test]
    async fn stale_and_archived_repos_are_dropped() {
        let repos = FakeRepos::default()
            .with("old/repo", Answer::Found(repo(400, 10_000, false)))
            .with("dead/repo", Answer::Found(repo(3, 10_000, true)))
            .with("good/repo", Answer::Found(repo(3, 10_000, false)));
        let doc = RoadmapDocument {
            steps: vec![],
            resources: Some(ResourceBag {
                github: vec![
                    "https://github.com/old/repo".into(),
                    "https://github.com/dead/repo".into(),
                    "https://github.com/good/repo".into(),
                ],
                blogs: vec![],
            }),
        };

        let result = extractor(FakeVideos::default(), repos)
            .extract_document(&doc, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.code_links,
            vec![card("https://github.com/good/repo", "good/repo")]
        );
    }

    #[tokio::test]
    async fn malformed_links_are_rejected_without_fetch() {
        let videos = FakeVideos::default();
        let repos = FakeRepos::default();
        let doc = RoadmapDocument {
            steps: vec![step(
                "1",
                &[
                    "[Channel](https://www.youtube.com/channel/UCxyz)",
                    "[Owner](https://github.com/just-owner)",
                ],
                &[],
            )],
            resources: None,
        };

        let videos = Arc::new(videos);
        let repos = Arc::new(repos);
        let result = Extractor::new(videos.clone(), repos.clone(), config())
            .extract_document(&doc, &CancellationToken::new())
            .await
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(videos.calls.load(Ordering::SeqCst), 0);
        assert!(repos.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn output_order_is_scan_order_not_completion_order() {
        // The first video answers last.
        let videos = FakeVideos::default()
            .delayed(
                "slow1",
                Answer::Found(video(10, 50_000, 500)),
                Duration::from_millis(150),
            )
            .with("fast2", Answer::Found(video(10, 50_000, 500)))
            .with("fast3", Answer::Found(video(10, 50_000, 500)));
        let doc = RoadmapDocument {
            steps: vec![
                step("1", &["[one](https://youtu.be/slow1)"], &[]),
                step("2", &["[two](https://youtu.be/fast2)"], &[]),
                step("3", &["[three](https://youtu.be/fast3)"], &[]),
            ],
            resources: None,
        };

        let result = extractor(videos, FakeRepos::default())
            .extract_document(&doc, &CancellationToken::new())
            .await
            .unwrap();

        let previews: Vec<&str> = result
            .video_links
            .iter()
            .map(|c| c.preview_ref.as_str())
            .collect();
        assert_eq!(previews, vec!["slow1", "fast2", "fast3"]);
    }

    #[tokio::test]
    async fn duplicate_across_steps_appears_once_at_first_position() {
        let repos = FakeRepos::default()
            .with("a/one", Answer::Found(repo(1, 900, false)))
            .with("b/two", Answer::Found(repo(1, 900, false)));
        let doc = RoadmapDocument {
            steps: vec![
                step("1", &["[one](https://github.com/a/one)"], &[]),
                step(
                    "2",
                    &["[two](https://github.com/b/two) [one again](https://github.com/a/one)"],
                    &[],
                ),
            ],
            resources: None,
        };

        let repos = Arc::new(repos);
        let result = Extractor::new(Arc::new(FakeVideos::default()), repos.clone(), config())
            .extract_document(&doc, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.code_links,
            vec![
                card("https://github.com/a/one", "a/one"),
                card("https://github.com/b/two", "b/two"),
            ]
        );
        // Fetched once per URL.
        assert_eq!(repos.requested.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn extraction_is_idempotent() {
        let videos = FakeVideos::default()
            .with("abc123", Answer::Found(video(182, 20_000, 300)))
            .with("zzz", Answer::Fails);
        let repos = FakeRepos::default().with("foo/bar", Answer::Found(repo(2, 700, false)));
        let doc = RoadmapDocument {
            steps: vec![step(
                "1",
                &[
                    "[v](https://youtube.com/watch?v=abc123) [r](https://github.com/foo/bar)",
                    "[z](https://youtu.be/zzz)",
                ],
                &[],
            )],
            resources: Some(ResourceBag {
                github: vec![],
                blogs: vec!["https://dev.to/post".into()],
            }),
        };

        let extractor = extractor(videos, repos);
        let cancel = CancellationToken::new();
        let first = extractor.extract_document(&doc, &cancel).await.unwrap();
        let second = extractor.extract_document(&doc, &cancel).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.video_links.len(), 2);
        assert_eq!(first.article_links, vec![card("https://dev.to/post", "dev.to")]);
    }

    #[tokio::test]
    async fn raw_text_is_scanned_in_full() {
        let videos = FakeVideos::default().with("abc123", Answer::Found(video(30, 90_000, 900)));
        let text = "Intro: [Watch](https://youtube.com/watch?v=abc123)\nCode: [Repo](https://github.com/foo/bar)";

        let result = extractor(videos, FakeRepos::default())
            .extract_text(text, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(result.video_links.len(), 1);
        assert_eq!(result.code_links, vec![card("https://github.com/foo/bar", "foo/bar")]);
    }

    #[tokio::test]
    async fn bracketed_labels_and_parenthesized_urls_survive_extraction() {
        let videos = FakeVideos::default().with("abc123", Answer::Found(video(30, 90_000, 900)));
        let extractor = Extractor::new(
            Arc::new(videos),
            Arc::new(FakeRepos::default()),
            ExtractionConfig {
                keep_unlisted_articles: true,
                ..config()
            },
        );
        let text = "Resource: [Rust [2024] Guide](https://youtube.com/watch?v=abc123)\n\
                    Background: [Wiki](https://en.wikipedia.org/wiki/Rust_(programming_language))";

        let result = extractor
            .extract_text(text, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            result.video_links,
            vec![card("https://youtube.com/watch?v=abc123", "abc123")]
        );
        assert_eq!(
            result.article_links,
            vec![card(
                "https://en.wikipedia.org/wiki/Rust_(programming_language)",
                "en.wikipedia.org"
            )]
        );
    }

    #[tokio::test]
    async fn empty_document_needs_no_providers() {
        let result = extractor(FakeVideos::default(), FakeRepos::default())
            .extract_document(&RoadmapDocument::default(), &CancellationToken::new())
            .await
            .unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn cancellation_abandons_in_flight_fetches() {
        let videos = FakeVideos::default().with("abc123", Answer::Hangs);
        let extractor = Extractor::new(
            Arc::new(videos),
            Arc::new(FakeRepos::default()),
            ExtractionConfig {
                fetch_timeout: Duration::from_secs(60),
                ..config()
            },
        );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let err = extractor
            .extract_document(&intro_video_doc(), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(err, PathfinderError::Cancelled));
    }
}
