use anyhow::{anyhow, Result};

use bookreel_core::{
    book::{BookSearch, OpenLibraryClient},
    AppConfig, ItemRecord, SearchTerm,
};
use bookreel_tui::carousel::{render_item, CarouselConfigExt, RenderSettings};

/// Columns assumed when stdout is not a terminal
const DEFAULT_COLUMNS: u16 = 80;

pub async fn run(config: &AppConfig, terms: &[String], spoken: bool, json: bool) -> Result<()> {
    let input = terms.join(" ");
    let term = if spoken {
        SearchTerm::spoken(&input)
    } else {
        SearchTerm::typed(&input)
    }
    .ok_or_else(|| anyhow!("Nothing to search for"))?;

    let client = OpenLibraryClient::new(config)?;
    tracing::info!("Searching for \"{}\"", term);
    let items = client.search(&term).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No books found for \"{}\".", term);
        return Ok(());
    }

    let columns = crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(DEFAULT_COLUMNS);
    let viewport = config.carousel.viewport_px(columns);
    let settings = config.carousel.render_settings();

    println!("Results for \"{}\" ({}):\n", term, items.len());
    for item in &items {
        print_item(item, viewport, &settings);
    }

    Ok(())
}

fn print_item(item: &ItemRecord, viewport: u32, settings: &RenderSettings) {
    let rendered = render_item(item, viewport, settings);
    let title = if item.title.is_empty() {
        "(no title)"
    } else {
        item.title.as_str()
    };
    let authors = item.author_list();

    if authors.is_empty() {
        println!("  {}", title);
    } else {
        println!("  {} - {}", title, authors);
    }
    println!("    Cover: {}", rendered.image_url);
    println!("    Link:  {}", rendered.link_url);
    println!();
}
