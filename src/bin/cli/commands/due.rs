use anyhow::Result;

use litlearn_lib::papers::Paper;
use litlearn_lib::review::plan_day;

use crate::app::{short_id, App};
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

fn due_json(paper: &Paper, actionable: bool) -> serde_json::Value {
    let state = paper.review_state.as_ref();
    serde_json::json!({
        "id": paper.id.to_string(),
        "doi": paper.doi,
        "title": paper.title,
        "nextReviewDate": state.and_then(|s| s.next_review_date).map(|d| d.to_string()),
        "intervalWeeks": state.map(|s| s.current_interval_weeks),
        "fibonacciIndex": state.map(|s| s.fibonacci_index()),
        "actionable": actionable,
    })
}

pub fn run(app: &App, format: &OutputFormat, use_color: bool) -> Result<()> {
    let papers = app.list_papers()?;
    let queue = app.due_queue(&papers);
    let session = app.session(&papers);
    let plan = plan_day(&queue, session.remaining());

    match format {
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = plan
                .actionable
                .iter()
                .map(|p| due_json(p, true))
                .chain(plan.waiting.iter().map(|p| due_json(p, false)))
                .collect();
            let output = serde_json::json!({
                "today": app.today.to_string(),
                "dailyCap": session.daily_cap(),
                "judgedToday": session.judged(),
                "papers": items,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            if queue.is_empty() {
                println!("No reviews due. Come back later!");
                return Ok(());
            }

            println!(
                "{} due \u{00b7} {} of max. {} reviewed today",
                queue.len(),
                session.judged(),
                session.daily_cap()
            );
            println!();

            let title_width = queue
                .iter()
                .map(|p| p.title.chars().count())
                .max()
                .unwrap_or(5)
                .clamp(5, 50);

            println!("{:<8} {:<tw$} {:<10} {}", "ID", "Title", "Due", "Schedule", tw = title_width);
            println!(
                "{} {} {} {}",
                "\u{2500}".repeat(8),
                "\u{2500}".repeat(title_width),
                "\u{2500}".repeat(10),
                "\u{2500}".repeat(16)
            );

            for paper in &plan.actionable {
                println!(
                    "{:<8} {:<tw$} {:<10} {}",
                    short_id(paper),
                    terminal::truncate(&paper.title, title_width),
                    terminal::format_date(paper.review_state.as_ref().and_then(|s| s.next_review_date)),
                    terminal::schedule_summary(paper),
                    tw = title_width
                );
            }
            for paper in &plan.waiting {
                let line = format!(
                    "{:<8} {:<tw$} {:<10} (waiting)",
                    short_id(paper),
                    terminal::truncate(&paper.title, title_width),
                    terminal::format_date(paper.review_state.as_ref().and_then(|s| s.next_review_date)),
                    tw = title_width
                );
                println!("{}", terminal::paint(&line, Color::GRAY, use_color));
            }

            if !plan.waiting.is_empty() {
                println!(
                    "\n{} more waiting for tomorrow (max. {} per day)",
                    plan.waiting.len(),
                    session.daily_cap()
                );
            }
        }
    }

    Ok(())
}
