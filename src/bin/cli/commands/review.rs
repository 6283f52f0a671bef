use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};

use litlearn_lib::papers::Paper;
use litlearn_lib::review::{ReviewSession, ReviewState};

use crate::app::App;
use crate::render::terminal::{self, Color};
use crate::OutputFormat;

enum Answer {
    Recalled,
    Forgot,
    Skip,
    Quit,
}

/// Print `prompt` and read one trimmed line; `None` on end of input
fn prompt_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    let read = io::stdin().lock().read_line(&mut line)?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_lowercase()))
}

fn ask_judgment() -> Result<Answer> {
    loop {
        let Some(answer) = prompt_line("Recalled? [y]es / [n]o / [s]kip / [q]uit: ")? else {
            return Ok(Answer::Quit);
        };
        match answer.as_str() {
            "y" | "yes" => return Ok(Answer::Recalled),
            "n" | "no" => return Ok(Answer::Forgot),
            "s" | "skip" => return Ok(Answer::Skip),
            "q" | "quit" => return Ok(Answer::Quit),
            _ => println!("Please answer y, n, s or q."),
        }
    }
}

/// Persist a judgment, then count it. Nothing is counted if the write fails.
fn record(
    app: &App,
    session: &mut ReviewSession,
    papers: &mut [Paper],
    paper: &Paper,
    recalled: bool,
) -> Result<ReviewState> {
    let state = session.judge(paper, recalled)?;
    let stored = app.save_review(paper, &state)?;
    if let Some(slot) = papers.iter_mut().find(|p| p.id == stored.id) {
        *slot = stored;
    }
    session.commit(paper.id)?;
    Ok(state)
}

fn print_outcome(state: &ReviewState, use_color: bool) {
    if state.expired {
        println!(
            "{}",
            terminal::paint("Past its relevance horizon; removed from review.", Color::YELLOW, use_color)
        );
    } else {
        println!(
            "Next review {} (in {})",
            terminal::format_date(state.next_review_date),
            litlearn_lib::review::format_interval_weeks(state.current_interval_weeks)
        );
    }
}

pub fn run_interactive(app: &App, use_color: bool) -> Result<()> {
    let mut papers = app.list_papers()?;
    let mut session = app.session(&papers);

    if app.due_queue(&papers).is_empty() {
        println!("No reviews due. Come back later!");
        return Ok(());
    }

    loop {
        // Re-derive the queue from the stored state after every judgment
        let (paper, queue_len) = {
            let queue = app.due_queue(&papers);
            match session.present(&queue) {
                Some(paper) => (paper.clone(), queue.len()),
                None => break,
            }
        };

        println!();
        println!(
            "{}",
            terminal::paint(
                &format!(
                    "Review {} of max. {} today \u{00b7} {} in queue",
                    session.judged() + 1,
                    session.daily_cap(),
                    queue_len
                ),
                Color::DIM,
                use_color
            )
        );
        println!("{}", terminal::paint(&paper.title, Color::BOLD, use_color));
        if !paper.doi.is_empty() {
            println!("{}", terminal::paint(&paper.doi, Color::GRAY, use_color));
        }
        println!();
        println!("What were the main claims of this paper?");

        let Some(input) = prompt_line("Press Enter to reveal (q to quit): ")? else {
            break;
        };
        if input == "q" || input == "quit" {
            break;
        }

        session.reveal()?;
        println!();
        println!("{}", terminal::render_excerpt(&paper, use_color));
        println!();
        println!("{}", terminal::paint(&terminal::schedule_summary(&paper), Color::DIM, use_color));

        match ask_judgment()? {
            Answer::Recalled => {
                let state = record(app, &mut session, &mut papers, &paper, true)?;
                print_outcome(&state, use_color);
            }
            Answer::Forgot => {
                let state = record(app, &mut session, &mut papers, &paper, false)?;
                print_outcome(&state, use_color);
            }
            Answer::Skip => {
                // Skipped papers stay due; stop rather than show the same head again
                session.skip();
                break;
            }
            Answer::Quit => break,
        }
    }

    println!();
    println!(
        "{}",
        terminal::paint(
            &format!("{} reviews done today.", session.judged()),
            Color::GREEN,
            use_color
        )
    );
    let remaining = app.due_queue(&papers).len();
    if remaining > 0 && session.cap_reached() {
        println!(
            "{} more reviews wait for tomorrow (max. {} per day)",
            remaining,
            session.daily_cap()
        );
    }

    Ok(())
}

pub fn run_judge(
    app: &App,
    query: &str,
    recalled: bool,
    format: &OutputFormat,
    use_color: bool,
) -> Result<()> {
    let mut papers = app.list_papers()?;
    let paper = app.find_paper(&papers, query)?.clone();
    let mut session = app.session(&papers);

    {
        let queue = app.due_queue(&papers);
        if session.present_paper(&queue, paper.id).is_none() {
            if session.cap_reached() {
                bail!(
                    "Daily review limit reached ({} of {}); try again tomorrow",
                    session.judged(),
                    session.daily_cap()
                );
            }
            bail!("'{}' is not due for review on {}", paper.title, app.today);
        }
    }
    session.reveal()?;

    let state = record(app, &mut session, &mut papers, &paper, recalled)
        .with_context(|| format!("Review of '{}' was not recorded", paper.title))?;

    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "id": paper.id.to_string(),
                "recalled": recalled,
                "spacedRepetition": state,
                "judgedToday": session.judged(),
                "dailyCap": session.daily_cap(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Plain => {
            println!(
                "{} '{}'",
                if recalled { "Recalled" } else { "Forgot" },
                paper.title
            );
            print_outcome(&state, use_color);
        }
    }

    Ok(())
}
