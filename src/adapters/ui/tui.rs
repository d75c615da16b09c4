//! Implements InputPort. Inquire-based interactive dashboard.
//!
//! Each cycle loads the feed with the current `FeedConfig`, renders it, then
//! offers: summarize a story, refresh, settings, quit.

use crate::adapters::ui::{progress, render};
use crate::domain::{DomainError, NewsItem};
use crate::ports::InputPort;
use crate::shared::FeedConfig;
use crate::shared::config::{MAX_MIN_SCORE, NUM_STORIES_RANGE};
use crate::usecases::{Feed, FeedService, SummaryService};
use async_trait::async_trait;
use chrono::Utc;
use inquire::{Confirm, CustomType, InquireError, Select};
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Summarize,
    Refresh,
    Settings,
    Quit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Summarize => "🤖 Get AI summary",
            Action::Refresh => "🔄 Refresh news",
            Action::Settings => "⚙️  Settings",
            Action::Quit => "Quit",
        })
    }
}

/// Menu entries for a feed. Summaries need both a summarizer and stories.
fn menu_actions(summaries_enabled: bool, has_stories: bool) -> Vec<Action> {
    let mut actions = Vec::with_capacity(4);
    if summaries_enabled && has_stories {
        actions.push(Action::Summarize);
    }
    actions.extend([Action::Refresh, Action::Settings, Action::Quit]);
    actions
}

/// Story choice in the summary picker.
struct StoryChoice<'a> {
    index: usize,
    item: &'a NewsItem,
}

impl fmt::Display for StoryChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.index, self.item.title)
    }
}

/// Why a prompt produced no value.
#[derive(Debug)]
enum PromptExit {
    /// Esc: abandon the current flow, back to the menu.
    Back,
    /// Ctrl-C: leave the dashboard.
    Quit,
    Failed(DomainError),
}

fn prompt_result<T>(result: Result<T, InquireError>) -> Result<T, PromptExit> {
    match result {
        Ok(value) => Ok(value),
        Err(InquireError::OperationCanceled) => Err(PromptExit::Back),
        Err(InquireError::OperationInterrupted) => Err(PromptExit::Quit),
        Err(e) => Err(PromptExit::Failed(DomainError::Ui(e.to_string()))),
    }
}

/// `Ok(true)` when a finished flow asks to leave the dashboard.
fn quit_requested(flow: Result<(), PromptExit>) -> Result<bool, DomainError> {
    match flow {
        Ok(()) | Err(PromptExit::Back) => Ok(false),
        Err(PromptExit::Quit) => Ok(true),
        Err(PromptExit::Failed(e)) => Err(e),
    }
}

/// TUI adapter. Owns the current feed settings between cycles.
pub struct TuiInputPort {
    feed_service: Arc<FeedService>,
    summary_service: Arc<SummaryService>,
    settings: RwLock<FeedConfig>,
    news_api_available: bool,
}

impl TuiInputPort {
    pub fn new(
        feed_service: Arc<FeedService>,
        summary_service: Arc<SummaryService>,
        initial: FeedConfig,
        news_api_available: bool,
    ) -> Self {
        Self {
            feed_service,
            summary_service,
            settings: RwLock::new(initial),
            news_api_available,
        }
    }

    async fn load_feed(&self) -> Feed {
        let cfg = *self.settings.read().await;
        let spinner = progress::spinner("Fetching the latest tech news...");
        let feed = self.feed_service.load(&cfg).await;
        spinner.finish_and_clear();
        feed
    }

    async fn summarize_flow(&self, feed: &Feed) -> Result<(), PromptExit> {
        let choices: Vec<StoryChoice<'_>> = feed
            .outcome
            .stories()
            .iter()
            .enumerate()
            .map(|(i, item)| StoryChoice { index: i + 1, item })
            .collect();

        let choice = prompt_result(Select::new("Summarize which story?", choices).prompt())?;

        let spinner = progress::spinner("Generating summary...");
        let summary = self.summary_service.summarize(choice.item).await;
        spinner.finish_and_clear();

        if let Some(summary) = summary {
            render::print_summary(choice.item, &summary);
        }
        Ok(())
    }

    async fn edit_settings(&self) -> Result<(), PromptExit> {
        let current = *self.settings.read().await;

        let stories_help = format!(
            "{}-{}",
            NUM_STORIES_RANGE.start(),
            NUM_STORIES_RANGE.end()
        );
        let num_stories = prompt_result(
            CustomType::<usize>::new("Number of stories")
                .with_default(current.num_stories)
                .with_help_message(&stories_help)
                .prompt(),
        )?;

        let score_help = format!("0-{}", MAX_MIN_SCORE);
        let min_score = prompt_result(
            CustomType::<u64>::new("Minimum score")
                .with_default(current.min_score)
                .with_help_message(&score_help)
                .prompt(),
        )?;

        let hacker_news_enabled = prompt_result(
            Confirm::new("Include Hacker News?")
                .with_default(current.hacker_news_enabled)
                .prompt(),
        )?;

        let news_api_help = if self.news_api_available {
            "Top technology headlines from NewsAPI"
        } else {
            "No NewsAPI key configured; this source stays empty"
        };
        let news_api_enabled = prompt_result(
            Confirm::new("Include NewsAPI?")
                .with_default(current.news_api_enabled)
                .with_help_message(news_api_help)
                .prompt(),
        )?;

        let dedupe_by_url = prompt_result(
            Confirm::new("Hide duplicate links across sources?")
                .with_default(current.dedupe_by_url)
                .prompt(),
        )?;

        let updated = FeedConfig {
            hacker_news_enabled,
            news_api_enabled,
            dedupe_by_url,
            ..current
        }
        .with_num_stories(num_stories)
        .with_min_score(min_score);

        info!(?updated, "feed settings changed");
        *self.settings.write().await = updated;
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let feed = self.load_feed().await;
            render::print_feed(&feed, Utc::now());

            // Summaries reuse the rendered feed; every other action starts a new cycle.
            loop {
                let actions = menu_actions(
                    self.summary_service.is_enabled(),
                    !feed.outcome.is_empty(),
                );
                let action = match prompt_result(Select::new("What next?", actions).prompt()) {
                    Ok(action) => action,
                    Err(PromptExit::Back | PromptExit::Quit) => Action::Quit,
                    Err(PromptExit::Failed(e)) => return Err(e),
                };

                match action {
                    Action::Summarize => {
                        if quit_requested(self.summarize_flow(&feed).await)? {
                            return Ok(());
                        }
                    }
                    Action::Refresh => {
                        self.feed_service.refresh().await;
                        break;
                    }
                    Action::Settings => {
                        if quit_requested(self.edit_settings().await)? {
                            return Ok(());
                        }
                        break;
                    }
                    Action::Quit => return Ok(()),
                }
            }
        }
    }
}
