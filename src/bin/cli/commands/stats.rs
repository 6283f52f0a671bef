use anyhow::Result;

use litlearn_lib::review::{review_stats, upcoming};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let papers = app.list_papers()?;
    let policy = &app.settings.review;
    let stats = review_stats(&papers, app.today, policy);
    let upcoming = upcoming(&papers, app.today, policy);

    match format {
        OutputFormat::Json => {
            let upcoming: Vec<serde_json::Value> = upcoming
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    serde_json::json!({
                        "id": p.id.to_string(),
                        "title": p.title,
                        "nextReviewDate": p.review_state.as_ref().and_then(|s| s.next_review_date).map(|d| d.to_string()),
                        "waiting": i >= stats.remaining_today,
                    })
                })
                .collect();
            let output = serde_json::json!({
                "today": app.today.to_string(),
                "stats": stats,
                "upcoming": upcoming,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("  Inbox:        {}", stats.inbox_papers);
            println!("  Reading:      {}", stats.reading_papers);
            println!("  Completed:    {}", stats.completed_papers);
            println!("  Due reviews:  {}", stats.due_today);
            println!("  Expired:      {}", stats.expired_papers);
            println!(
                "  Today:        {} reviewed ({} recalled), {} left of max. {}",
                stats.reviews_today, stats.correct_today, stats.remaining_today, policy.daily_cap
            );

            println!();
            println!("{}", terminal::paint("Upcoming reviews", Color::BOLD, use_color));
            if upcoming.is_empty() {
                println!("  No reviews due");
                return Ok(());
            }
            for (i, paper) in upcoming.iter().enumerate() {
                let date = terminal::format_date(paper.review_state.as_ref().and_then(|s| s.next_review_date));
                if i < stats.remaining_today {
                    println!("  {}  {}", date, terminal::truncate(&paper.title, 60));
                } else {
                    let line = format!("  {}  {} (waiting)", date, terminal::truncate(&paper.title, 60));
                    println!("{}", terminal::paint(&line, Color::GRAY, use_color));
                }
            }
        }
    }

    Ok(())
}
