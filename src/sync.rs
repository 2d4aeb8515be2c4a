// The two sync flows.
//
// Upload:   extract -> rename to the canonical file -> confirm -> upload to
//           every project -> remove the canonical file.
// Download: for every project and locale, resolve the bundle path and fetch
//           the translation into it.
//
// Per-item failures are recorded in the report and never stop sibling items.
// Terminal concerns (prompting, progress, printing) sit behind the `Confirm`
// and `Reporter` traits so the flows run headless in tests.

use crate::api::OneSkyClient;
use crate::auth::Credentials;
use crate::config::{Config, Locale};
use crate::error::SyncError;
use crate::extract::StringExtractor;
use crate::paths;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Something the flow attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Upload {
        project: String,
        file: String,
    },
    Download {
        project: String,
        locale: Locale,
        /// Resolved destination, absent when no bundle directory was found.
        destination: Option<PathBuf>,
    },
}

#[derive(Debug)]
pub struct Outcome {
    pub item: Item,
    pub result: Result<(), SyncError>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct SyncReport {
    pub outcomes: Vec<Outcome>,
    /// The operator declined the upload.
    pub declined: bool,
}

impl SyncReport {
    pub fn failures(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failures()
    }
}

/// Operator confirmation before anything is published.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Receives progress for each item as the flows run.
pub trait Reporter {
    fn begin(&mut self, _item: &Item) {}
    fn finish(&mut self, outcome: &Outcome);
}

/// Everything both flows need: where to talk to, who we are, what to sync
/// and where the project lives.
#[derive(Debug)]
pub struct SyncContext {
    pub client: OneSkyClient,
    pub credentials: Credentials,
    pub config: Config,
    pub root: PathBuf,
}

impl SyncContext {
    pub fn new(config: Config, credentials: Credentials, root: PathBuf) -> Result<Self> {
        let client = OneSkyClient::new(&config.api_url).context("Failed to build HTTP client")?;
        Ok(SyncContext {
            client,
            credentials,
            config,
            root,
        })
    }

    fn canonical_path(&self) -> PathBuf {
        self.root.join(&self.config.canonical_file)
    }
}

/// Removes a temporary file however the upload flow ends.
struct RemoveOnDrop(PathBuf);

impl Drop for RemoveOnDrop {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.0) {
            Ok(()) => info!("Removed {}", self.0.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!("Could not remove {}: {}", self.0.display(), e),
        }
    }
}

/// Extract strings and upload them to every configured project.
///
/// Extraction failures and prompt errors abort the run. Upload failures are
/// recorded per project.
pub fn upload_all(
    ctx: &SyncContext,
    extractor: &dyn StringExtractor,
    confirm: &mut dyn Confirm,
    reporter: &mut dyn Reporter,
) -> Result<SyncReport> {
    let extracted = extractor
        .extract(&ctx.root)
        .context("String extraction failed, nothing was uploaded")?;
    // Gone after a successful rename; catches the extractor output otherwise.
    let _extracted = RemoveOnDrop(extracted.clone());

    let canonical = ctx.canonical_path();
    if extracted != canonical {
        std::fs::rename(&extracted, &canonical).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                extracted.display(),
                canonical.display()
            )
        })?;
    }
    let _cleanup = RemoveOnDrop(canonical.clone());
    info!("String table ready at {}", canonical.display());

    let mut report = SyncReport::default();
    let prompt = format!(
        "Upload {} to {} project(s)?",
        ctx.config.canonical_file,
        ctx.config.projects.len()
    );
    if !confirm.confirm(&prompt)? {
        info!("Upload declined by operator");
        report.declined = true;
        return Ok(report);
    }

    for project in &ctx.config.projects {
        let item = Item::Upload {
            project: project.name.clone(),
            file: ctx.config.canonical_file.clone(),
        };
        reporter.begin(&item);

        let result = std::fs::read(&canonical)
            .map_err(SyncError::from)
            .and_then(|contents| {
                ctx.client.upload(
                    &ctx.credentials,
                    &project.project_id,
                    &ctx.config.canonical_file,
                    contents,
                )
            });
        match &result {
            Ok(()) => info!(project = %project.name, "Uploaded {}", ctx.config.canonical_file),
            Err(e) => warn!(project = %project.name, "Upload failed: {}", e),
        }

        let outcome = Outcome { item, result };
        reporter.finish(&outcome);
        report.outcomes.push(outcome);
    }

    Ok(report)
}

/// Download every configured locale of every project into its bundle.
pub fn download_all(ctx: &SyncContext, reporter: &mut dyn Reporter) -> SyncReport {
    let mut report = SyncReport::default();

    for project in &ctx.config.projects {
        for locale in &project.locales {
            let destination = paths::resolve_destination(
                &ctx.root,
                &project.name,
                locale,
                &ctx.config.canonical_file,
            );
            let item = Item::Download {
                project: project.name.clone(),
                locale: locale.clone(),
                destination: destination.as_ref().ok().cloned(),
            };
            reporter.begin(&item);

            let result = destination
                .and_then(|path| download_one(ctx, &project.project_id, locale, &path));
            if let Err(e) = &result {
                warn!(project = %project.name, locale = %locale, "Download failed: {}", e);
            }

            let outcome = Outcome { item, result };
            reporter.finish(&outcome);
            report.outcomes.push(outcome);
        }
    }

    report
}

fn download_one(
    ctx: &SyncContext,
    project_id: &str,
    locale: &Locale,
    destination: &Path,
) -> Result<(), SyncError> {
    ctx.client.download(
        &ctx.credentials,
        project_id,
        &ctx.config.canonical_file,
        locale.as_str(),
        destination,
    )?;
    info!(locale = %locale, "Saved {}", destination.display());
    Ok(())
}
