//! Feed rendering: stats header and numbered story cards.
//!
//! Text is built by pure functions; `print_*` only adds color.

use crate::adapters::ui::banner::{TEAL, VIOLET, rgb};
use crate::domain::{FeedStats, NewsItem, SourceWarning, time_ago};
use crate::usecases::Feed;
use chrono::{DateTime, Utc};
use crossterm::ExecutableCommand;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use std::io::{Write, stdout};

const MUTED: Color = Color::Rgb {
    r: 0x71,
    g: 0x80,
    b: 0x96,
};
const SOFT: Color = Color::Rgb {
    r: 0xa0,
    g: 0xae,
    b: 0xc0,
};

pub const NO_RESULTS: &str = "No stories found. Try adjusting your filters or refreshing.";

/// Text of one story card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub heading: String,
    pub meta: String,
    pub url: String,
    pub description: Option<String>,
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn stats_line(stats: &FeedStats) -> String {
    format!(
        "{} Stories  |  {} Total Points  |  {} Comments  |  {} Sources",
        stats.stories,
        group_thousands(stats.total_points),
        group_thousands(stats.total_comments),
        stats.sources
    )
}

/// Card for the story at 1-based `index`.
pub fn card(index: usize, item: &NewsItem, now: DateTime<Utc>) -> Card {
    Card {
        heading: format!("{}. {}", index, item.title),
        meta: format!(
            "[{}]  ▲ {} points  💬 {} comments  ⏱ {}  👤 {}",
            item.source_name,
            item.score,
            item.comment_count,
            time_ago(item.published_at, now),
            item.author
        ),
        url: item.url.clone(),
        description: item.description.clone(),
    }
}

fn print_colored(out: &mut impl Write, color: Color, text: &str) {
    let _ = out.execute(SetForegroundColor(color));
    let _ = out.execute(Print(text));
    let _ = out.execute(ResetColor);
    let _ = out.execute(Print("\r\n"));
}

fn print_warnings(out: &mut impl Write, warnings: &[SourceWarning]) {
    for warning in warnings {
        print_colored(out, Color::Yellow, &format!("⚠ {}", warning));
    }
}

/// Print warnings, then either the no-results notice or stats and cards.
pub fn print_feed(feed: &Feed, now: DateTime<Utc>) {
    let mut out = stdout();
    print_warnings(&mut out, &feed.warnings);

    let stories = feed.outcome.stories();
    if stories.is_empty() {
        print_colored(&mut out, Color::Yellow, NO_RESULTS);
        let _ = out.flush();
        return;
    }

    print_colored(&mut out, rgb(TEAL), &stats_line(&FeedStats::from_items(stories)));
    let _ = out.execute(Print("\r\n"));
    print_colored(&mut out, Color::White, "📰 Top Stories");
    let _ = out.execute(Print("\r\n"));

    for (i, item) in stories.iter().enumerate() {
        let card = card(i + 1, item, now);
        let _ = out.execute(SetAttribute(Attribute::Bold));
        print_colored(&mut out, Color::White, &card.heading);
        let _ = out.execute(SetAttribute(Attribute::Reset));
        print_colored(&mut out, MUTED, &format!("   {}", card.meta));
        if !card.url.is_empty() {
            print_colored(&mut out, rgb(VIOLET), &format!("   {}", card.url));
        }
        if let Some(desc) = &card.description {
            print_colored(&mut out, SOFT, &format!("   {}", desc));
        }
        let _ = out.execute(Print("\r\n"));
    }
    let _ = out.flush();
}

/// Print an AI summary under its story heading.
pub fn print_summary(item: &NewsItem, summary: &str) {
    let mut out = stdout();
    print_colored(&mut out, Color::White, &format!("🤖 {}", item.title));
    for line in summary.lines() {
        print_colored(&mut out, SOFT, &format!("   │ {}", line));
    }
    let _ = out.execute(Print("\r\n"));
    let _ = out.flush();
}
