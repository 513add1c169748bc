//! Show command handler

use std::path::Path;

use crate::loader::load_record;
use crate::models::{AnimeRecord, MAIN_CHARACTER_ROLE};

pub async fn cmd_show(path: &Path) -> anyhow::Result<()> {
    let record = load_record(path).await?;
    print_summary(&record);
    Ok(())
}

fn print_summary(record: &AnimeRecord) {
    println!("Anime Info");
    println!("{:-<60}", "");
    println!("ID:       {}", record.id);
    println!("Title:    {}", record.main_title().unwrap_or("?"));
    if let Some(official) = record.official_title() {
        println!("Official: {official}");
    }
    println!("Type:     {}", record.media_type.as_deref().unwrap_or("?"));
    println!(
        "Episodes: {}",
        record
            .episode_count
            .map_or_else(|| "?".to_string(), |e| e.to_string())
    );
    if record.restricted {
        println!("Restricted");
    }

    if record.rating.is_empty() {
        println!("Rating:   -");
    } else {
        println!(
            "Rating:   {} ({} votes)",
            record.rating.value, record.rating.count
        );
    }

    let mal_ids = record.mal_ids();
    if !mal_ids.is_empty() {
        println!("MAL:      {}", mal_ids.join(", "));
    }

    if !record.titles.is_empty() {
        println!();
        println!("Titles ({}):", record.titles.len());
        for title in &record.titles {
            let kind = if title.kind.is_unset() {
                "-"
            } else {
                title.kind.as_str()
            };
            println!("  [{}] {:<9} {}", title.language, kind, title.text);
        }
    }

    if !record.relations.is_empty() {
        println!();
        println!("Related ({}):", record.relations.len());
        for link in &record.relations {
            println!("  • {} ({}, ID: {})", link.text, link.kind, link.id);
        }
    }

    let main_cast: Vec<_> = record
        .characters
        .with_role(MAIN_CHARACTER_ROLE)
        .map(|character| character.name.as_str())
        .collect();
    if !main_cast.is_empty() {
        println!();
        println!("Main cast: {}", main_cast.join(", "));
    }

    let tags = record.tag_names();
    if !tags.is_empty() {
        println!();
        println!("Tags: {}", tags.join(", "));
    }

    println!();
    println!("{}", record.description_text());
}
