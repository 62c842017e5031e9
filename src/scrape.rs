//! Attraction-listing collector.
//!
//! Fetches a fixed range of listing pages and extracts per-item
//! metadata from the page's item list. This is a data producer separate
//! from the mail pipeline: its output is its own CSV file.
//!
//! Fetch and parse failures are logged and skipped per page; a bad page
//! never aborts the batch. Records are serialized one proper CSV row
//! each (the item fields are plain strings as found in the markup, no
//! numeric parsing).

use std::fs::File;
use std::path::Path;

use scraper::{Html, Selector};

use crate::cli::Cli;
use crate::config::ScrapeConfig;
use crate::errors::{IoResultExt, MailsiftError, Result};

/// One listing item. Fields a page fails to carry stay `None` and
/// export as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attraction {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub name: Option<String>,
    pub guide_mentions: Option<String>,
    pub reviews: Option<String>,
    pub rank: Option<String>,
    pub star_percent: Option<String>,
    pub link: Option<String>,
}

/// What a scrape run did, including per-page warnings.
#[derive(Debug, Clone, Default)]
pub struct ScrapeOutcome {
    pub listings: Vec<Attraction>,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub warnings: Vec<String>,
}

/// Extract all listing items from one page of HTML.
///
/// Fails only when the item list container is absent (the page is not a
/// listing page); individually missing item fields are tolerated.
pub fn parse_listing_page(html: &str, url: &str) -> Result<Vec<Attraction>> {
    let document = Html::parse_document(html);
    let list_sel = Selector::parse("ul.list_item").unwrap();
    let item_sel = Selector::parse("li").unwrap();
    let name_sel = Selector::parse("span.cn_tit").unwrap();
    let guide_sel = Selector::parse("div.strategy_sum").unwrap();
    let reviews_sel = Selector::parse("div.comment_sum").unwrap();
    let rank_sel = Selector::parse("span.ranking_sum").unwrap();
    let star_sel = Selector::parse("span.total_star span").unwrap();

    let Some(list) = document.select(&list_sel).next() else {
        return Err(MailsiftError::listing_parse(url, "item list not found"));
    };

    let text_of = |item: &scraper::ElementRef<'_>, sel: &Selector| {
        item.select(sel)
            .next()
            .map(|e| e.text().collect::<String>().trim().to_string())
    };

    let mut listings = Vec::new();
    for item in list.select(&item_sel) {
        let star_percent = item
            .select(&star_sel)
            .next()
            .and_then(|e| e.value().attr("style"))
            .and_then(|style| style.split(':').nth(1))
            .map(|p| p.trim().to_string());

        listings.push(Attraction {
            lat: item.value().attr("data-lat").map(str::to_string),
            lng: item.value().attr("data-lng").map(str::to_string),
            name: text_of(&item, &name_sel),
            guide_mentions: text_of(&item, &guide_sel),
            reviews: text_of(&item, &reviews_sel),
            rank: text_of(&item, &rank_sel),
            star_percent,
            link: item.value().attr("href").map(str::to_string),
        });
    }
    Ok(listings)
}

/// Fetch pages `1..=pages` from `base_url` + page number, sequentially.
pub async fn fetch_listings(config: &ScrapeConfig, cli: &Cli) -> Result<ScrapeOutcome> {
    let client = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| MailsiftError::internal_with("failed to build HTTP client", e))?;

    let mut outcome = ScrapeOutcome::default();

    for page in 1..=config.pages {
        let url = format!("{}{}", config.base_url, page);
        if cli.is_trace() {
            eprintln!("Fetching listing page: {url}");
        }

        let body = match fetch_page(&client, &url).await {
            Ok(body) => body,
            Err(e) => {
                outcome.pages_skipped += 1;
                outcome.warnings.push(format!("page {page} skipped: {e}"));
                if cli.warn_enabled() {
                    eprintln!("Warning: page {page} skipped: {e}");
                }
                continue;
            }
        };

        match parse_listing_page(&body, &url) {
            Ok(items) => {
                outcome.pages_fetched += 1;
                if cli.is_trace() {
                    eprintln!("  page {page}: {} items", items.len());
                }
                outcome.listings.extend(items);
            }
            Err(e) => {
                outcome.pages_skipped += 1;
                outcome.warnings.push(format!("page {page} skipped: {e}"));
                if cli.warn_enabled() {
                    eprintln!("Warning: page {page} skipped: {e}");
                }
            }
        }
    }

    Ok(outcome)
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| MailsiftError::fetch(url, e))?;
    response
        .text()
        .await
        .map_err(|e| MailsiftError::fetch(url, e))
}

/// Serialize listings one CSV row per record, with a header line.
pub fn write_listings<P: AsRef<Path>>(path: P, listings: &[Attraction]) -> Result<()> {
    let display = path.as_ref().display().to_string();
    let file = File::create(&path).with_path(&display, "create")?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record([
        "lat",
        "lng",
        "name",
        "guide_mentions",
        "reviews",
        "rank",
        "star_percent",
        "link",
    ])
    .map_err(|e| MailsiftError::csv_write(&display, e))?;

    for item in listings {
        wtr.write_record([
            item.lat.as_deref().unwrap_or_default(),
            item.lng.as_deref().unwrap_or_default(),
            item.name.as_deref().unwrap_or_default(),
            item.guide_mentions.as_deref().unwrap_or_default(),
            item.reviews.as_deref().unwrap_or_default(),
            item.rank.as_deref().unwrap_or_default(),
            item.star_percent.as_deref().unwrap_or_default(),
            item.link.as_deref().unwrap_or_default(),
        ])
        .map_err(|e| MailsiftError::csv_write(&display, e))?;
    }

    wtr.flush().with_path(&display, "flush")?;
    Ok(())
}
