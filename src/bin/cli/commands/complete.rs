use std::io::Read;

use anyhow::{Context, Result};

use litlearn_lib::papers::Excerpt;

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

/// Read the excerpt JSON from a file, or stdin for "-"
fn read_excerpt(source: &str) -> Result<Excerpt> {
    let content = if source == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read excerpt from stdin")?;
        buf
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("Failed to read excerpt file '{}'", source))?
    };
    serde_json::from_str(&content).context("Excerpt is not valid JSON")
}

pub fn run(app: &App, query: &str, source: &str, format: &OutputFormat, use_color: bool) -> Result<()> {
    let excerpt = read_excerpt(source)?;
    let papers = app.list_papers()?;
    let paper_id = app.find_paper(&papers, query)?.id;

    let paper = app
        .storage
        .complete_paper(paper_id, excerpt, app.today)
        .context("Failed to complete paper")?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": paper.id.to_string(),
                "title": paper.title,
                "status": paper.status.as_str(),
                "spacedRepetition": paper.review_state,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} '{}'",
                terminal::paint("Completed", Color::GREEN, use_color),
                paper.title
            );
            let next = paper.review_state.as_ref().and_then(|s| s.next_review_date);
            println!("  First review: {}", terminal::format_date(next));
            if paper.citability() < app.settings.review.min_citability || !paper.has_projects() {
                println!(
                    "  {}",
                    terminal::paint(
                        &format!(
                            "Not in review rotation: needs citability >= {} and at least one project",
                            app.settings.review.min_citability
                        ),
                        Color::YELLOW,
                        use_color
                    )
                );
            }
        }
    }

    Ok(())
}
