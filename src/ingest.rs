//! Batch ingestion of exported tweet documents.
//!
//! Walks `twitter-meta/*.json` under the data root, upserts users and
//! tweets, downloads profile images once per URL, and discovers local
//! media files by tweet-id prefix. Individual document failures are
//! logged and skipped; the run keeps going.

use crate::config::{Config, DataPaths};
use crate::error::{Result, XvError};
use crate::ledger::DownloadLedger;
use crate::model::{TweetDoc, UserDoc};
use crate::storage::Storage;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

/// Outcome counters for one ingestion run.
#[derive(Debug, Default, Clone, Copy)]
pub struct IngestReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub downloads: usize,
}

pub struct Ingestor {
    storage: Storage,
    paths: DataPaths,
    delay: Duration,
    client: reqwest::blocking::Client,
    ledger: DownloadLedger,
}

impl Ingestor {
    /// Prepare an ingestor for the given data root. Creates the avatar
    /// directory and the database file if they do not exist.
    ///
    /// # Errors
    ///
    /// Returns an error when the data root or its metadata directory is
    /// missing, or when setup fails.
    pub fn new(data_root: &Path, config: &Config) -> Result<Self> {
        if !data_root.is_dir() {
            return Err(XvError::data_root_not_found(data_root));
        }
        let paths = DataPaths::new(data_root);
        if !paths.meta_dir().is_dir() {
            return Err(XvError::data_root_not_found(paths.meta_dir()));
        }
        fs::create_dir_all(paths.avatar_dir())?;

        let storage = Storage::open(paths.db_path())?;
        let ledger = DownloadLedger::load(&paths.avatar_dir())?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.ingest.http_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| XvError::Other(e.into()))?;

        Ok(Self {
            storage,
            paths,
            delay: Duration::from_millis(config.ingest.delay_ms),
            client,
            ledger,
        })
    }

    /// Ingest every JSON document under the metadata directory.
    ///
    /// # Errors
    ///
    /// Returns an error only for setup-level failures; per-document
    /// problems are counted in the report instead.
    pub fn run(&mut self) -> Result<IngestReport> {
        let files = self.document_files()?;
        let mut report = IngestReport {
            total: files.len(),
            ..IngestReport::default()
        };
        info!("Ingesting {} documents", files.len());

        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
        );

        for (i, file) in files.iter().enumerate() {
            bar.set_message(
                file.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            match self.process_file(file, &mut report) {
                Ok(()) => report.succeeded += 1,
                Err(e) => {
                    report.failed += 1;
                    warn!("Skipping {}: {e}", file.display());
                }
            }
            bar.inc(1);
            if !self.delay.is_zero() && i + 1 < files.len() {
                thread::sleep(self.delay);
            }
        }
        bar.finish_and_clear();

        self.ledger.save()?;
        self.print_summary(&report);
        Ok(report)
    }

    /// Sorted list of metadata documents.
    fn document_files(&self) -> Result<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = fs::read_dir(self.paths.meta_dir())?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
            .collect();
        files.sort();
        Ok(files)
    }

    fn process_file(&mut self, file: &Path, report: &mut IngestReport) -> Result<()> {
        let body = fs::read_to_string(file)?;
        let doc: TweetDoc = serde_json::from_str(&body)
            .map_err(|e| XvError::invalid_document(file.display().to_string(), e.to_string()))?;

        for user in [doc.author.as_ref(), doc.user.as_ref()].into_iter().flatten() {
            self.storage.upsert_user(user)?;
            report.downloads += self.fetch_profile_images(user);
        }

        let media = self.discover_media(doc.tweet_id)?;
        self.storage.upsert_tweet(&doc, &media)?;
        self.storage.replace_media_files(doc.tweet_id, &media)?;
        debug!("Stored tweet {} with {} media files", doc.tweet_id, media.len());
        Ok(())
    }

    /// Download the avatar and banner for a user when present and not
    /// already fetched. Returns the number of new downloads; failures
    /// are logged and do not propagate.
    fn fetch_profile_images(&mut self, user: &UserDoc) -> usize {
        let mut fetched = 0;
        let targets = [
            (user.profile_image.as_deref(), format!("avatar_{}", user.id)),
            (user.profile_banner.as_deref(), format!("banner_{}", user.id)),
        ];
        for (url, stem) in targets {
            let Some(url) = url.filter(|u| !u.is_empty()) else {
                continue;
            };
            let file_name = format!("{stem}{}", url_extension(url));
            let dest = self.paths.avatar_dir().join(&file_name);
            // The ledger alone decides: a URL already fetched for one
            // user is never fetched again for another.
            if self.ledger.contains(url) {
                continue;
            }
            match self.download(url, &dest) {
                Ok(()) => {
                    self.ledger.record(url);
                    fetched += 1;
                }
                Err(e) => warn!("{e}"),
            }
        }
        fetched
    }

    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| XvError::download_failed(url, e.to_string()))?;
        if !response.status().is_success() {
            return Err(XvError::download_failed(
                url,
                format!("HTTP {}", response.status()),
            ));
        }
        let bytes = response
            .bytes()
            .map_err(|e| XvError::download_failed(url, e.to_string()))?;
        fs::write(dest, &bytes)?;
        debug!("Downloaded {url} -> {}", dest.display());
        Ok(())
    }

    /// Media files in `img/` whose name starts with `{tweet_id}_`,
    /// sorted by file name.
    fn discover_media(&self, tweet_id: i64) -> Result<Vec<String>> {
        let media_dir = self.paths.media_dir();
        if !media_dir.is_dir() {
            return Ok(Vec::new());
        }
        let prefix = format!("{tweet_id}_");
        let mut names: Vec<String> = fs::read_dir(media_dir)?
            .filter_map(std::result::Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.starts_with(&prefix))
            .collect();
        names.sort();
        Ok(names)
    }

    fn print_summary(&self, report: &IngestReport) {
        println!();
        println!("{}", "Ingestion complete".bold());
        println!("  documents: {}", report.total);
        println!("  stored:    {}", report.succeeded.to_string().green());
        if report.failed > 0 {
            println!("  skipped:   {}", report.failed.to_string().yellow());
        }
        if report.downloads > 0 {
            println!("  images:    {}", report.downloads);
        }
        println!("  database:  {}", self.paths.db_path().display());
    }
}

/// File extension of a URL path, `.jpg` when it has none.
fn url_extension(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map_or_else(|| ".jpg".to_string(), |e| format!(".{}", e.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MEDIA_DIR, META_DIR};
    use tempfile::TempDir;

    fn write_doc(root: &Path, tweet_id: i64, extra: serde_json::Value) {
        let mut doc = serde_json::json!({
            "tweet_id": tweet_id,
            "date": "2023-06-15 10:30:00",
            "content": format!("tweet {tweet_id}"),
        });
        if let (Some(map), Some(extra)) = (doc.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                map.insert(k.clone(), v.clone());
            }
        }
        let path = root.join(META_DIR).join(format!("{tweet_id}.json"));
        fs::write(path, doc.to_string()).unwrap();
    }

    fn data_root() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join(META_DIR)).unwrap();
        fs::create_dir_all(dir.path().join(MEDIA_DIR)).unwrap();
        dir
    }

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.ingest.delay_ms = 0;
        config
    }

    #[test]
    fn ingest_stores_documents_and_media() {
        let dir = data_root();
        // name sorts after 10_1.jpg but matches only tweet 10
        fs::write(dir.path().join(MEDIA_DIR).join("10_1.jpg"), b"img").unwrap();
        fs::write(dir.path().join(MEDIA_DIR).join("10_2.mp4"), b"vid").unwrap();
        fs::write(dir.path().join(MEDIA_DIR).join("101_1.jpg"), b"img").unwrap();
        write_doc(
            dir.path(),
            10,
            serde_json::json!({"user": {"id": 1, "nick": "alice"}}),
        );
        write_doc(dir.path(), 101, serde_json::json!({}));

        let mut ingestor = Ingestor::new(dir.path(), &fast_config()).unwrap();
        let report = ingestor.run().unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.failed, 0);

        let storage = Storage::open(DataPaths::new(dir.path()).db_path()).unwrap();
        let row = storage.tweet_by_id(10).unwrap().unwrap();
        assert_eq!(row.media_files, vec!["10_1.jpg", "10_2.mp4"]);
        assert_eq!(row.user_nick.as_deref(), Some("alice"));
        let other = storage.tweet_by_id(101).unwrap().unwrap();
        assert_eq!(other.media_files, vec!["101_1.jpg"]);
    }

    #[test]
    fn invalid_document_is_skipped() {
        let dir = data_root();
        write_doc(dir.path(), 1, serde_json::json!({}));
        fs::write(dir.path().join(META_DIR).join("broken.json"), "{not json").unwrap();

        let mut ingestor = Ingestor::new(dir.path(), &fast_config()).unwrap();
        let report = ingestor.run().unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
    }

    #[test]
    fn reingest_is_idempotent() {
        let dir = data_root();
        fs::write(dir.path().join(MEDIA_DIR).join("7_1.jpg"), b"img").unwrap();
        write_doc(dir.path(), 7, serde_json::json!({}));

        let mut ingestor = Ingestor::new(dir.path(), &fast_config()).unwrap();
        ingestor.run().unwrap();
        let mut again = Ingestor::new(dir.path(), &fast_config()).unwrap();
        again.run().unwrap();

        let storage = Storage::open(DataPaths::new(dir.path()).db_path()).unwrap();
        assert_eq!(storage.count_tweets().unwrap(), 1);
        assert_eq!(storage.count_media().unwrap(), 1);
    }

    #[test]
    fn missing_meta_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Ingestor::new(dir.path(), &fast_config()),
            Err(XvError::DataRootNotFound { .. })
        ));
    }

    #[test]
    fn url_extension_handles_query_strings() {
        assert_eq!(url_extension("https://x.test/a/pic.PNG?size=big"), ".png");
        assert_eq!(url_extension("https://x.test/a/noext"), ".jpg");
    }
}
