use crate::app::{print_notice, App};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use countrydex::catalog::{self, Region};
use countrydex::country::Country;
use countrydex::view_state::{ViewKind, ViewStateAdapter};

const FAVORITE_MARK: &str = "★";

fn load_all(app: &App) -> Result<Vec<Country>> {
    app.source()
        .fetch_all()
        .context("Failed to load countries. Please try again later.")
}

fn country_line(country: &Country, favorite: bool) -> String {
    let mark = if favorite {
        FAVORITE_MARK.yellow().to_string()
    } else {
        " ".to_string()
    };
    format!(
        "{} {:<4} {:<32} {:<10} pop {:>15}  capital {}",
        mark,
        country.code.bold(),
        country.name,
        country.region,
        catalog::format_thousands(country.population),
        country.capital.as_deref().unwrap_or("N/A"),
    )
}

/// List view: search + region filter with favorite markers.
pub fn run_list(
    app: &App,
    search: Option<&str>,
    region: Option<Region>,
    verbose: u8,
) -> Result<()> {
    let countries = load_all(app)?;
    let session = app.session();
    let view = app.mount(ViewKind::List, &session);

    let shown = catalog::filter(&countries, search, region);
    if shown.is_empty() {
        println!("No countries found. Try a different search term or filter.");
        return Ok(());
    }
    for country in &shown {
        println!("{}", country_line(country, view.is_favorite(&country.code)));
    }
    if verbose > 0 {
        eprintln!("{} of {} countries", shown.len(), countries.len());
    }
    Ok(())
}

/// Detail view. Signed-in users get the visit recorded in their history.
pub fn run_show(app: &App, code: &str) -> Result<()> {
    let code = code.trim().to_ascii_uppercase();
    let country = app
        .source()
        .fetch_by_code(&code)
        .context("Failed to load country details. Please try again later.")?;
    let Some(country) = country else {
        bail!("Country not found: {code}");
    };

    let session = app.session();
    let mut view = app.mount(ViewKind::Detail, &session);
    // The failure is surfaced through the notice below.
    let _ = view.record_view(&country.code);

    let title = if view.is_favorite(&country.code) {
        format!("{} {}", country.name, FAVORITE_MARK.yellow())
    } else {
        country.name.clone()
    };
    println!("{}", title.bold());
    println!("════════════════════════════════════════");
    println!(
        "Official Name:     {}",
        country.official_name.as_deref().unwrap_or("N/A")
    );
    println!(
        "Population:        {}",
        catalog::format_thousands(country.population)
    );
    println!("Region:            {}", country.region);
    println!(
        "Sub Region:        {}",
        country.subregion.as_deref().unwrap_or("N/A")
    );
    println!(
        "Capital:           {}",
        country.capital.as_deref().unwrap_or("N/A")
    );
    println!(
        "Top Level Domain:  {}",
        country.top_level_domain().unwrap_or("N/A")
    );
    println!("Currencies:        {}", join_or_na(&country.currencies()));
    println!("Languages:         {}", join_or_na(&country.languages()));
    let borders = country.borders();
    if !borders.is_empty() {
        println!("Border Countries:  {}", borders.join(" "));
    }
    print_notice(view.notice());
    Ok(())
}

fn join_or_na(items: &[String]) -> String {
    if items.is_empty() {
        "N/A".to_string()
    } else {
        items.join(", ")
    }
}

/// Dashboard: catalog summary plus the user's recent and favorite countries,
/// resolved against the bulk-loaded catalog.
pub fn run_dashboard(app: &App) -> Result<()> {
    let countries = load_all(app)?;
    let session = app.session();
    let mut view =
        ViewStateAdapter::new(ViewKind::Dashboard, app.store(), &session, app.source())
            .with_catalog(&countries);
    view.mount();

    let stats = catalog::dashboard_stats(&countries);
    match view.user() {
        Some(user) => println!("{}", format!("Welcome back, {user}").bold()),
        None => println!("{}", "Dashboard".bold()),
    }
    println!("════════════════════════════════════════");
    println!("Total countries:   {}", stats.total_countries);
    println!("Continents:        {}", stats.continents.len());
    println!("Favorites:         {}", view.favorites().len());
    if let Some(c) = stats.most_populated {
        println!(
            "Most populated:    {} ({})",
            c.name,
            catalog::format_large_number(c.population)
        );
    }
    if let Some(c) = stats.least_populated {
        println!(
            "Least populated:   {} ({})",
            c.name,
            catalog::format_large_number(c.population)
        );
    }
    println!();

    println!("Recently Viewed:");
    println!("────────────────────────────────────────");
    if view.recently_viewed().is_empty() {
        println!("  (none yet)");
    }
    for country in view.recently_viewed() {
        println!("{}", country_line(country, view.is_favorite(&country.code)));
    }
    println!();

    println!("Countries by Region:");
    println!("────────────────────────────────────────");
    for (region, count) in &stats.continents {
        println!("  {:<12} {:>4}", region, count);
    }
    Ok(())
}

/// Global population statistics.
pub fn run_stats(app: &App) -> Result<()> {
    let countries = load_all(app)?;
    let stats = catalog::population_stats(&countries);

    println!("{}", "Global Statistics".bold());
    println!("════════════════════════════════════════");
    println!("Total countries:     {}", countries.len());
    println!(
        "World population:    {}",
        catalog::format_large_number(stats.total)
    );
    println!(
        "Average population:  {}",
        catalog::format_large_number(stats.average)
    );
    println!();
    println!("Top {} by Population:", catalog::TOP_BY_POPULATION);
    println!("────────────────────────────────────────");
    for (rank, country) in stats.top.iter().enumerate() {
        println!(
            "{:>2}. {:<32} {:>15}",
            rank + 1,
            country.name,
            catalog::format_thousands(country.population)
        );
    }
    Ok(())
}
