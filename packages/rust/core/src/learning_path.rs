//! End-to-end flow for a topic: generate a roadmap, gather resources,
//! then extract validated links from the result.

use std::sync::Arc;

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use pathfinder_providers::{ArticleSearch, RepoSearch, VideoSearch};
use pathfinder_shared::{
    LearningPath, PathfinderError, ResourceBag, Result, RoadmapDocument, SearchConfig, Step,
};

use crate::generator::RoadmapGenerator;
use crate::pipeline::Extractor;

const DEFAULT_MAX_REPOS: u32 = 3;
const DEFAULT_MAX_ARTICLES: u32 = 5;

/// Trim a topic and reject it if nothing is left.
pub fn validate_topic(topic: &str) -> Result<String> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(PathfinderError::validation("a non-empty topic is required"));
    }
    Ok(topic.to_string())
}

/// Query used to find a tutorial video for one step.
pub fn video_query(topic: &str, step: &Step) -> String {
    format!("{topic} {} tutorial for beginners", step.title)
}

/// Query used to find articles for the whole topic.
pub fn article_query(topic: &str) -> String {
    format!("{topic} learning resources from beginner to advanced")
}

/// Wires the generator, the search collaborators and the extractor together.
pub struct LearningPathBuilder {
    generator: Arc<dyn RoadmapGenerator>,
    videos: Arc<dyn VideoSearch>,
    repos: Arc<dyn RepoSearch>,
    articles: Arc<dyn ArticleSearch>,
    extractor: Extractor,
    max_repos: u32,
    max_articles: u32,
}

impl LearningPathBuilder {
    pub fn new(
        generator: Arc<dyn RoadmapGenerator>,
        videos: Arc<dyn VideoSearch>,
        repos: Arc<dyn RepoSearch>,
        articles: Arc<dyn ArticleSearch>,
        extractor: Extractor,
    ) -> Self {
        Self {
            generator,
            videos,
            repos,
            articles,
            extractor,
            max_repos: DEFAULT_MAX_REPOS,
            max_articles: DEFAULT_MAX_ARTICLES,
        }
    }

    /// Take result limits from the search config.
    pub fn with_limits(mut self, search: &SearchConfig) -> Self {
        self.max_repos = search.max_repos;
        self.max_articles = search.max_articles;
        self
    }

    /// Build the learning path for `topic`.
    ///
    /// Only generator failures, validation errors and cancellation are
    /// reported; every search degrades to "nothing found".
    #[instrument(skip(self, cancel))]
    pub async fn build(&self, topic: &str, cancel: &CancellationToken) -> Result<LearningPath> {
        let topic = validate_topic(topic)?;
        let articles_query = article_query(&topic);

        let gathered = async {
            tokio::join!(
                self.generator.generate(&topic),
                self.repos.find_repos(&topic, self.max_repos),
                self.articles.find_articles(&articles_query, self.max_articles),
            )
        };
        let (generated, github, blogs) = tokio::select! {
            gathered = gathered => gathered,
            _ = cancel.cancelled() => return Err(PathfinderError::Cancelled),
        };

        let mut roadmap = generated.map_err(|e| match e {
            PathfinderError::Generator(_) | PathfinderError::Config { .. } => e,
            other => PathfinderError::generator(other.to_string()),
        })?;
        info!(
            steps = roadmap.steps.len(),
            repositories = github.len(),
            articles = blogs.len(),
            "roadmap and resources gathered"
        );

        tokio::select! {
            () = self.attach_videos(&topic, &mut roadmap) => {}
            _ = cancel.cancelled() => return Err(PathfinderError::Cancelled),
        }
        roadmap.resources = Some(ResourceBag { github, blogs });

        let links = self.extractor.extract_document(&roadmap, cancel).await?;

        Ok(LearningPath {
            topic,
            roadmap,
            links,
        })
    }

    /// Search a tutorial video per step, concurrently, and append any hit
    /// to that step's resources.
    async fn attach_videos(&self, topic: &str, roadmap: &mut RoadmapDocument) {
        let found = join_all(roadmap.steps.iter().map(|step| {
            let query = video_query(topic, step);
            async move { self.videos.find_video(&query).await }
        }))
        .await;

        for (step, url) in roadmap.steps.iter_mut().zip(found) {
            match url {
                Some(url) => step
                    .resources
                    .push(format!("Video Tutorial: [Watch on YouTube]({url})")),
                None => debug!(step = %step.id, "no tutorial video found"),
            }
        }
    }
}
