use anyhow::Result;

use litlearn_lib::papers::Relevance;
use litlearn_lib::review::algorithm::expiry_date;
use litlearn_lib::review::is_eligible;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

pub fn run(app: &App, query: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let papers = app.list_papers()?;
    let paper = app.find_paper(&papers, query)?;
    let due = is_eligible(paper, app.today, &app.settings.review);
    let expires = expiry_date(paper.added_date, paper.relevance());

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": paper.id.to_string(),
                "doi": paper.doi,
                "title": paper.title,
                "status": paper.status.as_str(),
                "addedDate": paper.added_date.map(|d| d.to_string()),
                "citability": paper.citability(),
                "relevantProjects": paper.excerpt.as_ref().map(|e| e.relevant_projects.clone()).unwrap_or_default(),
                "expiresOn": expires.map(|d| d.to_string()),
                "dueToday": due,
                "spacedRepetition": paper.review_state,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!("{}", terminal::paint(&paper.title, Color::BOLD, use_color));
            if !paper.doi.is_empty() {
                println!("{}", terminal::paint(&paper.doi, Color::GRAY, use_color));
            }
            println!();
            println!("  Status:      {}", paper.status);
            println!("  Added:       {}", terminal::format_date(paper.added_date));
            println!("  Citability:  {}", paper.citability());
            if let Some(excerpt) = paper.excerpt.as_ref() {
                if !excerpt.relevant_projects.is_empty() {
                    println!("  Projects:    {}", excerpt.relevant_projects.join(", "));
                }
            }
            let relevance = match paper.relevance() {
                Relevance::Indefinite => "never expires".to_string(),
                Relevance::Years(years) => format!(
                    "{} year(s), until {}",
                    years,
                    terminal::format_date(expires)
                ),
            };
            println!("  Relevance:   {}", relevance);

            let Some(state) = paper.review_state.as_ref() else {
                println!("\nNot scheduled for review.");
                return Ok(());
            };

            println!();
            println!("  Next review: {}{}", terminal::format_date(state.next_review_date), if due { " (due)" } else { "" });
            println!("  Schedule:    {}", terminal::schedule_summary(paper));
            if let Some(rate) = state.recall_rate() {
                println!("  Recall rate: {:.0}%", rate * 100.0);
            }

            if state.review_history.is_empty() {
                println!("\nNo reviews yet.");
            } else {
                println!("\nHistory:");
                for record in &state.review_history {
                    let mark = if record.recalled_correctly {
                        terminal::paint("recalled", Color::GREEN, use_color)
                    } else {
                        terminal::paint("forgot", Color::RED, use_color)
                    };
                    println!("  {}  {}", terminal::format_date(Some(record.date)), mark);
                }
            }
        }
    }

    Ok(())
}
