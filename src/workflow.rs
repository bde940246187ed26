//! The yearly-album run: reconcile album → fetch year → assign → summarize.

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::config::RunConfig;
use crate::photos::{self, AssignSummary, PhotosApi, ResolvedAlbum};
use crate::prompt::{Prompt, PromptError};
use crate::types::DateRange;

/// How a run ended, for the caller's final log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No items were found for the year.
    NothingToAdd { album: ResolvedAlbum, partial: bool },
    /// Items were (or in dry run would have been) assigned.
    Assigned {
        album: ResolvedAlbum,
        found: usize,
        summary: AssignSummary,
        partial: bool,
    },
    /// The album could not be created; nothing was assigned.
    AlbumUnavailable,
    /// The operator interrupted the run.
    Interrupted,
}

/// Run everything after authentication against `api`.
pub async fn create_year_album(
    api: &dyn PhotosApi,
    prompt: &dyn Prompt,
    config: &RunConfig,
    shutdown: &CancellationToken,
) -> Result<Outcome> {
    let range = DateRange::for_year(config.year)?;
    let default_title = config.default_album_title();

    let album = match photos::reconcile_album(api, &default_title, config.dry_run, prompt).await {
        Ok(Some(album)) => album,
        Ok(None) => {
            tracing::error!("Failed to create the album. Exiting.");
            return Ok(Outcome::AlbumUnavailable);
        }
        Err(e) if is_interrupt(&e) => return Ok(Outcome::Interrupted),
        Err(e) => return Err(e),
    };
    if shutdown.is_cancelled() {
        return Ok(Outcome::Interrupted);
    }

    tracing::info!("Fetching media items for {}...", config.year);
    let fetch = photos::fetch_media_for_year(
        api,
        &range,
        config.include_archived,
        !config.no_progress_bar,
    )
    .await;
    let partial = fetch.is_partial();
    if shutdown.is_cancelled() {
        return Ok(Outcome::Interrupted);
    }

    if fetch.items.is_empty() {
        return Ok(Outcome::NothingToAdd { album, partial });
    }

    tracing::info!(pages = fetch.pages, "Found {} media items.", fetch.items.len());
    let summary = photos::add_media_items_to_album(
        api,
        &album.id,
        &fetch.items,
        config.dry_run,
        shutdown,
    )
    .await;

    Ok(Outcome::Assigned {
        album,
        found: fetch.items.len(),
        summary,
        partial,
    })
}

fn is_interrupt(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<PromptError>(), Some(PromptError::Interrupted))
}

/// Log the final summary for `outcome`.
pub fn report(outcome: &Outcome, config: &RunConfig) {
    for (level, line) in summary_lines(outcome, config) {
        if level == Level::WARN {
            tracing::warn!("{}", line);
        } else {
            tracing::info!("{}", line);
        }
    }
}

fn summary_lines(outcome: &Outcome, config: &RunConfig) -> Vec<(Level, String)> {
    let mut lines = Vec::new();
    match outcome {
        Outcome::NothingToAdd { partial: true, .. } => lines.push((
            Level::WARN,
            format!(
                "No media items fetched for {}; the search failed before any page completed.",
                config.year
            ),
        )),
        Outcome::NothingToAdd { partial: false, .. } => lines.push((
            Level::INFO,
            format!("No media items found for {}.", config.year),
        )),
        Outcome::Assigned {
            album,
            found,
            summary,
            partial,
        } => {
            if *partial {
                lines.push((
                    Level::WARN,
                    format!(
                        "Media search stopped early after an error; only {} items were collected.",
                        found
                    ),
                ));
            }
            if config.dry_run {
                lines.push((
                    Level::INFO,
                    format!(
                        "Dry run: Would add {} items to the album '{}'.",
                        found, album.title
                    ),
                ));
            } else if summary.interrupted {
                lines.push((
                    Level::INFO,
                    format!(
                        "Stopped after adding {} of {} items to the album '{}'.",
                        summary.items_added, found, album.title
                    ),
                ));
            } else if summary.failed_batches > 0 {
                lines.push((
                    Level::WARN,
                    format!(
                        "Added {} of {} items to the album '{}'; {} batch(es) failed.",
                        summary.items_added, found, album.title, summary.failed_batches
                    ),
                ));
            } else {
                lines.push((
                    Level::INFO,
                    format!(
                        "Added {} of {} items to the album '{}'.",
                        summary.items_added, found, album.title
                    ),
                ));
            }
        }
        Outcome::AlbumUnavailable => {}
        Outcome::Interrupted => lines.push((
            Level::INFO,
            "Operation interrupted by user. Exiting...".to_string(),
        )),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photos::album::{AlbumOrigin, DRY_RUN_ALBUM_ID};
    use crate::photos::fake::{album, api_error, page, FakePhotosApi};
    use crate::prompt::scripted::ScriptedPrompt;

    fn run_config(dry_run: bool) -> RunConfig {
        RunConfig {
            year: 2023,
            dry_run,
            verbose: false,
            include_archived: false,
            no_progress_bar: true,
        }
    }

    fn numbered_page(start: usize, n: usize, next: Option<&str>) -> photos::SearchPage {
        let ids: Vec<String> = (start..start + n).map(|i| format!("m{i}")).collect();
        let refs: Vec<Option<&str>> = ids.iter().map(|s| Some(s.as_str())).collect();
        page(&refs, next)
    }

    #[tokio::test]
    async fn test_dry_run_makes_no_writes() {
        let api = FakePhotosApi::new().with_search_pages(vec![
            Ok(numbered_page(0, 100, Some("n"))),
            Ok(numbered_page(100, 20, None)),
        ]);
        let prompt = ScriptedPrompt::default();
        let outcome = create_year_album(&api, &prompt, &run_config(true), &CancellationToken::new())
            .await
            .unwrap();

        assert!(api.create_calls().is_empty());
        assert!(api.batch_calls().is_empty());
        match outcome {
            Outcome::Assigned {
                album,
                found,
                summary,
                partial,
            } => {
                assert_eq!(album.id, DRY_RUN_ALBUM_ID);
                assert_eq!(album.origin, AlbumOrigin::DryRunPlaceholder);
                assert_eq!(found, 120);
                assert_eq!(summary.items_added, 0);
                assert!(!partial);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_full_run_assigns_into_created_album() {
        let api = FakePhotosApi::new().with_search_pages(vec![Ok(numbered_page(0, 75, None))]);
        let prompt = ScriptedPrompt::default();
        let outcome =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(api.create_calls(), vec!["Photos from 2023".to_string()]);
        let batches = api.batch_calls();
        assert_eq!(batches.len(), 2);
        assert!(batches.iter().all(|(id, _)| id == "created:Photos from 2023"));
        match outcome {
            Outcome::Assigned { found, summary, .. } => {
                assert_eq!(found, 75);
                assert_eq!(summary.items_added, 75);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reuses_empty_album() {
        let api = FakePhotosApi::new()
            .with_albums(vec![album("OLD", "Photos from 2023", Some(0))])
            .with_search_pages(vec![Ok(numbered_page(0, 3, None))]);
        let prompt = ScriptedPrompt::default();
        create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
            .await
            .unwrap();

        assert!(api.create_calls().is_empty());
        assert_eq!(prompt.times_asked(), 0);
        assert_eq!(api.batch_calls()[0].0, "OLD");
    }

    #[tokio::test]
    async fn test_album_create_failure_stops_before_search() {
        let api = FakePhotosApi::new()
            .failing_create()
            .with_search_pages(vec![Ok(numbered_page(0, 3, None))]);
        let prompt = ScriptedPrompt::default();
        let outcome =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(outcome, Outcome::AlbumUnavailable);
        assert!(api.search_calls().is_empty());
        assert!(api.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_year() {
        let api = FakePhotosApi::new().with_search_pages(vec![Ok(page(&[], None))]);
        let prompt = ScriptedPrompt::default();
        let outcome =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
                .await
                .unwrap();

        assert!(matches!(outcome, Outcome::NothingToAdd { partial: false, .. }));
        assert!(api.batch_calls().is_empty());
    }

    #[tokio::test]
    async fn test_partial_search_still_assigns_collected_items() {
        let api = FakePhotosApi::new().with_search_pages(vec![
            Ok(numbered_page(0, 100, Some("n"))),
            Err(api_error(500, "boom")),
        ]);
        let prompt = ScriptedPrompt::default();
        let outcome =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
                .await
                .unwrap();

        match outcome {
            Outcome::Assigned {
                found,
                partial,
                summary,
                ..
            } => {
                assert_eq!(found, 100);
                assert!(partial);
                assert_eq!(summary.batches_sent, 2);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_prompt_interrupt_is_clean_stop() {
        let api = FakePhotosApi::new()
            .with_albums(vec![album("OLD", "Photos from 2023", Some(5))])
            .with_search_pages(vec![Ok(numbered_page(0, 3, None))]);
        let prompt = ScriptedPrompt::interrupted();
        let outcome =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new())
                .await
                .unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        assert!(api.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_run_stops_at_step_boundary() {
        let api = FakePhotosApi::new().with_search_pages(vec![Ok(numbered_page(0, 3, None))]);
        let prompt = ScriptedPrompt::default();
        let token = CancellationToken::new();
        token.cancel();
        let outcome = create_year_album(&api, &prompt, &run_config(true), &token)
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Interrupted);
        assert!(api.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_listing_error_propagates() {
        let api = FakePhotosApi::new().failing_list();
        let prompt = ScriptedPrompt::default();
        let result =
            create_year_album(&api, &prompt, &run_config(false), &CancellationToken::new()).await;
        assert!(result.is_err());
    }

    fn assigned(found: usize, summary: AssignSummary, partial: bool) -> Outcome {
        Outcome::Assigned {
            album: ResolvedAlbum {
                id: "ALB".into(),
                title: "Photos from 2023".into(),
                origin: AlbumOrigin::Created,
            },
            found,
            summary,
            partial,
        }
    }

    #[tokio::test]
    async fn test_interrupt_mid_assignment_reports_partial_progress() {
        let token = CancellationToken::new();
        let api = FakePhotosApi::new()
            .with_search_pages(vec![
                Ok(numbered_page(0, 100, Some("n"))),
                Ok(numbered_page(100, 30, None)),
            ])
            .cancelling_on_batch(0, token.clone());
        let prompt = ScriptedPrompt::default();
        let config = run_config(false);
        let outcome = create_year_album(&api, &prompt, &config, &token)
            .await
            .unwrap();

        match &outcome {
            Outcome::Assigned { found, summary, .. } => {
                assert_eq!(*found, 130);
                assert!(summary.interrupted);
                assert_eq!(summary.items_added, 50);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
        let lines = summary_lines(&outcome, &config);
        assert_eq!(
            lines,
            vec![(
                Level::INFO,
                "Stopped after adding 50 of 130 items to the album 'Photos from 2023'.".to_string()
            )]
        );
    }

    #[test]
    fn test_summary_warns_on_partial_search() {
        let summary = AssignSummary {
            batches_sent: 2,
            items_added: 100,
            ..Default::default()
        };
        let lines = summary_lines(&assigned(100, summary, true), &run_config(false));
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(lines[0].1.contains("stopped early"));
        assert_eq!(
            lines[1],
            (
                Level::INFO,
                "Added 100 of 100 items to the album 'Photos from 2023'.".to_string()
            )
        );
    }

    #[test]
    fn test_summary_warns_on_failed_batches() {
        let summary = AssignSummary {
            batches_sent: 3,
            items_added: 80,
            failed_batches: 1,
            interrupted: false,
        };
        let lines = summary_lines(&assigned(130, summary, false), &run_config(false));
        assert_eq!(
            lines,
            vec![(
                Level::WARN,
                "Added 80 of 130 items to the album 'Photos from 2023'; 1 batch(es) failed."
                    .to_string()
            )]
        );
    }

    #[test]
    fn test_summary_for_failed_first_search_page() {
        let outcome = Outcome::NothingToAdd {
            album: ResolvedAlbum {
                id: "ALB".into(),
                title: "Photos from 2023".into(),
                origin: AlbumOrigin::ReusedEmpty,
            },
            partial: true,
        };
        let lines = summary_lines(&outcome, &run_config(false));
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].0, Level::WARN);
        assert!(!lines[0].1.starts_with("No media items found"));
    }

    #[test]
    fn test_summary_dry_run_uses_found_count() {
        let lines = summary_lines(
            &assigned(120, AssignSummary::default(), false),
            &run_config(true),
        );
        assert_eq!(
            lines,
            vec![(
                Level::INFO,
                "Dry run: Would add 120 items to the album 'Photos from 2023'.".to_string()
            )]
        );
        assert!(summary_lines(&Outcome::AlbumUnavailable, &run_config(true)).is_empty());
    }
}
