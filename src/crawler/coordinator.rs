//! Pipeline driver - main download orchestration logic
//!
//! This module sequences the whole run:
//! - Discovering the volume/chapter structure
//! - Preparing the working storage area
//! - Resolving page counts and fetching chapters, one chapter at a time
//! - Binding each volume as soon as its chapters are fetched
//! - Removing the working storage area on success

use crate::config::Config;
use crate::crawler::counter::ChapterImageCounter;
use crate::crawler::fetcher::HttpSource;
use crate::crawler::images::ImageFetcher;
use crate::crawler::structure::StructureCrawler;
use crate::crawler::{PageExtractor, PageSource};
use crate::model::{Publication, PublicationStructure, Volume};
use crate::output::{ProgressDisplay, RunProgress, RunReport, VolumeAssembler, VolumeFailure};
use crate::storage::Workspace;
use crate::BinderError;
use std::sync::Arc;

/// Page counts of one fully fetched volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedVolume {
    pub index: usize,

    /// `chapter_pages[i]` is the page count of chapter `i`
    pub chapter_pages: Vec<u32>,
}

impl FetchedVolume {
    pub fn total_pages(&self) -> u64 {
        self.chapter_pages.iter().map(|&p| u64::from(p)).sum()
    }
}

/// Main pipeline driver
pub struct Coordinator {
    config: Arc<Config>,
    extractor: PageExtractor,
    display: ProgressDisplay,
}

impl Coordinator {
    /// Creates a coordinator talking HTTP to the configured catalog
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(BinderError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, BinderError> {
        let source = HttpSource::from_config(&config.http)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Creates a coordinator over an arbitrary page source
    pub fn with_source(config: Config, source: Arc<dyn PageSource>) -> Self {
        Self {
            config: Arc::new(config),
            extractor: PageExtractor::new(source),
            display: ProgressDisplay::hidden(),
        }
    }

    /// Replaces the (hidden by default) progress display
    pub fn with_progress(mut self, display: ProgressDisplay) -> Self {
        self.display = display;
        self
    }

    /// The extractor shared by every stage, for collaborators such as search
    pub fn extractor(&self) -> &PageExtractor {
        &self.extractor
    }

    /// Discovers the structure of a publication without downloading
    pub async fn discover(&self, publication: &Publication) -> Result<PublicationStructure, BinderError> {
        StructureCrawler::new(self.extractor.clone())
            .discover(&publication.url)
            .await
    }

    /// Runs the full pipeline for one publication
    ///
    /// Discovery, page-count and page-fetch errors abort the run; volumes
    /// bound before the failure stay on disk and the working storage is
    /// left in place. An assembly error only fails its own volume and is
    /// recorded in the report.
    pub async fn run(&self, publication: &Publication) -> Result<RunReport, BinderError> {
        tracing::info!("Starting download of {} ({})", publication.title, publication.url);

        let structure = self.discover(publication).await?;
        let mut report = RunReport::new(publication.title.clone());

        if structure.is_empty() {
            tracing::info!("{} lists no chapters, nothing to download", publication.title);
            return Ok(report);
        }

        let download = &self.config.download;
        let workspace = Workspace::new(&download.work_dir, &publication.title);
        workspace.prepare(structure.volume_count())?;

        let counter = ChapterImageCounter::new(self.extractor.clone(), &self.config.catalog.page_style);
        let fetcher = ImageFetcher::new(
            self.extractor.clone(),
            workspace.clone(),
            &self.config.catalog.page_style,
            download.max_concurrent_pages,
        );
        let assembler = VolumeAssembler::new(workspace.clone(), &download.output_dir);

        let mut progress = RunProgress::new(structure.total_chapters());
        self.display.update(&progress);

        for volume in structure.volumes() {
            let (fetched, next) = match self.fetch_volume(&counter, &fetcher, volume, progress).await {
                Ok(done) => done,
                Err(e) => {
                    self.display.abandon();
                    tracing::error!(
                        "Aborting {}; working storage kept at {}",
                        publication.title,
                        workspace.root().display()
                    );
                    return Err(e);
                }
            };
            progress = next;
            report.chapters += fetched.chapter_pages.len();
            report.pages += fetched.total_pages();

            match assembler.assemble(fetched.index, &fetched.chapter_pages) {
                Ok(path) => report.documents.push(path),
                Err(e) => {
                    tracing::error!("{}", e);
                    report.failed_volumes.push(VolumeFailure {
                        volume: fetched.index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if report.is_success() && !download.keep_work_dir {
            workspace.remove()?;
            report.work_dir_removed = true;
            tracing::debug!("Removed working storage {}", workspace.root().display());
        } else {
            tracing::info!("Working storage kept at {}", workspace.root().display());
        }

        tracing::info!(
            "Finished {}: {} documents, {} failed volumes",
            publication.title,
            report.documents.len(),
            report.failed_volumes.len()
        );
        Ok(report)
    }

    /// Fetches every chapter of a volume, strictly in order
    ///
    /// Progress comes in and goes out by value, advanced once per chapter.
    async fn fetch_volume(
        &self,
        counter: &ChapterImageCounter,
        fetcher: &ImageFetcher,
        volume: &Volume,
        mut progress: RunProgress,
    ) -> Result<(FetchedVolume, RunProgress), BinderError> {
        let mut chapter_pages = Vec::with_capacity(volume.len());

        for chapter in &volume.chapters {
            let pages = counter.page_count(&chapter.location).await?;
            tracing::info!(
                "Volume {} chapter {}: {} pages",
                volume.index,
                chapter.index,
                pages
            );

            fetcher
                .fetch_chapter(&chapter.location, volume.index, chapter.index, pages)
                .await?;
            chapter_pages.push(pages);

            progress = progress.advance();
            self.display.update(&progress);
            tracing::debug!(
                "{}/{} chapters done ({:.0}%)",
                progress.completed(),
                progress.total(),
                progress.percent()
            );
        }

        Ok((
            FetchedVolume {
                index: volume.index,
                chapter_pages,
            },
            progress,
        ))
    }
}

/// Runs the complete download of one publication over HTTP
///
/// # Example
///
/// ```no_run
/// use manga_binder::config::Config;
/// use manga_binder::crawler::run_download;
/// use manga_binder::model::Publication;
/// use url::Url;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let publication = Publication::new(
///     "Example Title",
///     Url::parse("https://www.mangaworld.so/manga/1/example-title")?,
/// );
/// let report = run_download(Config::default(), &publication).await?;
/// println!("{} documents", report.documents.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_download(config: Config, publication: &Publication) -> Result<RunReport, BinderError> {
    Coordinator::new(config)?.run(publication).await
}
