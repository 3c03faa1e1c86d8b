use std::path::Path;

use dealreel_core::{AppConfig, Deal, DealSnapshot};

const TITLE_WIDTH: usize = 50;

pub(crate) fn run_show(config: &AppConfig, snapshot: Option<&Path>) -> anyhow::Result<()> {
    let path = snapshot.unwrap_or(&config.snapshot_path);
    let snapshot = dealreel_core::load_snapshot(path)?;

    println!("snapshot: {}", path.display());
    println!("source:   {}", snapshot.source.as_deref().unwrap_or("unknown"));
    println!("fetched:  {}", snapshot.fetch_timestamp.to_rfc3339());
    if let Some(note) = &snapshot.note {
        println!("note:     {note}");
    }
    println!();

    if snapshot.is_empty() {
        println!("no deals in snapshot");
        return Ok(());
    }
    print_deals(&snapshot);
    Ok(())
}

pub(crate) fn print_deals(snapshot: &DealSnapshot) {
    println!(
        "{:<4}{:<12}{:<12}{:<6}{:<7}TITLE",
        "#", "PRICE", "WAS", "OFF", "PRIME"
    );
    for (i, deal) in snapshot.products.iter().enumerate() {
        println!("{}", format_row(i + 1, deal));
    }
    println!();
    println!("{} deals", snapshot.total_deals);
}

fn format_row(position: usize, deal: &Deal) -> String {
    let title = deal.title.as_deref().unwrap_or("-");
    let title = if title.chars().count() > TITLE_WIDTH {
        let kept: String = title.chars().take(TITLE_WIDTH - 3).collect();
        format!("{kept}...")
    } else {
        title.to_string()
    };
    let mut row = format!(
        "{:<4}{:<12}{:<12}{:<6}{:<7}{title}",
        position,
        deal.current_price.as_deref().unwrap_or("-"),
        deal.original_price.as_deref().unwrap_or("-"),
        deal.savings_percentage.as_deref().unwrap_or("-"),
        if deal.is_prime_eligible { "yes" } else { "no" },
    );
    if let Some(category) = &deal.category {
        row.push_str(&format!(" [{category}]"));
    }
    row
}
