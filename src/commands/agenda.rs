use anyhow::Result;
use owo_colors::OwoColorize;
use ritmo_core::config::RitmoConfig;
use ritmo_core::date_range::DateRange;
use ritmo_core::event::Occurrence;
use ritmo_core::service::EventQueryService;
use ritmo_core::store::StoreClient;

pub async fn run(config: &RitmoConfig, range: DateRange) -> Result<()> {
    let store = StoreClient::new(&config.api_url)?;
    let service = EventQueryService::new(store);

    let expansion = service.list_occurrences(&config.user_id, &range).await?;

    if expansion.occurrences.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    // Group occurrences by day and print
    let mut current_date: Option<String> = None;

    for occurrence in &expansion.occurrences {
        let date_label = format_date_label(occurrence);

        if current_date.as_ref() != Some(&date_label) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label.bold());
            current_date = Some(date_label);
        }

        let time = format_time(occurrence);
        let tag = format!("[{}]", occurrence.kind.tag());
        if occurrence.completed {
            println!(
                "  {} {} {}",
                time,
                occurrence.title.strikethrough(),
                tag.dimmed()
            );
        } else {
            println!("  {} {} {}", time, occurrence.title, tag.dimmed());
        }
    }

    if expansion.truncated {
        println!();
        println!(
            "{}",
            "Window too wide: some occurrences were cut off. Narrow it with --from/--to."
                .yellow()
        );
    }

    Ok(())
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
fn format_date_label(occurrence: &Occurrence) -> String {
    let today = chrono::Local::now().date_naive();
    let date = occurrence
        .start_time
        .with_timezone(&chrono::Local)
        .date_naive();

    let diff = (date - today).num_days();
    match diff {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// Format the time portion of an occurrence (e.g. "15:00" or "all-day")
fn format_time(occurrence: &Occurrence) -> String {
    if occurrence.all_day {
        "all-day".to_string()
    } else {
        format!(
            "{:>7}",
            occurrence
                .start_time
                .with_timezone(&chrono::Local)
                .format("%H:%M")
        )
    }
}
