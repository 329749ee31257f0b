use crate::app::{print_notice, App};
use anyhow::{bail, Context, Result};
use colored::Colorize;
use countrydex::catalog;
use countrydex::view_state::ViewKind;

/// Toggle a favorite from the list view.
pub fn run_toggle(app: &App, code: &str) -> Result<()> {
    let code = code.trim().to_ascii_uppercase();
    let session = app.session();
    let mut view = app.mount(ViewKind::List, &session);
    if view.user().is_none() {
        println!("Sign in to save favorites (countrydex login <username>).");
        return Ok(());
    }

    let country = app
        .source()
        .fetch_by_code(&code)
        .context("Failed to load country. Please try again later.")?;
    let Some(country) = country else {
        bail!("Unknown country code: {code}");
    };

    match view.toggle_favorite(&country.code) {
        Ok(true) => println!("{} Added {} to favorites", "★".yellow(), country.name),
        Ok(false) => println!("Removed {} from favorites", country.name),
        Err(_) => {}
    }
    print_notice(view.notice());
    Ok(())
}

/// Favorites view: records resolved per code; retired codes are skipped.
pub fn run_favorites(app: &App) -> Result<()> {
    let session = app.session();
    let view = app.mount(ViewKind::Favorites, &session);
    let Some(user) = view.user() else {
        println!("Sign in to see your favorites.");
        return Ok(());
    };

    if view.favorites().is_empty() {
        println!("{}", "Your Favorites".bold());
        println!("You haven't added any countries to your favorites yet.");
        return Ok(());
    }

    println!("{}", format!("Favorite Countries of {user}").bold());
    println!("════════════════════════════════════════");
    for country in view.favorites() {
        println!(
            "{:<4} {:<32} {:<10} pop {:>15}",
            country.code,
            country.name,
            country.region,
            catalog::format_thousands(country.population)
        );
    }
    let missing = view.favorite_codes().len() - view.favorites().len();
    if missing > 0 {
        tracing::info!(missing, "some favorites could not be resolved");
    }
    Ok(())
}

/// Recently viewed codes, most recent first.
pub fn run_recent(app: &App) -> Result<()> {
    let session = app.session();
    let view = app.mount(ViewKind::Detail, &session);
    if view.user().is_none() {
        println!("Sign in to keep a history of viewed countries.");
        return Ok(());
    }
    if view.recent_codes().is_empty() {
        println!("No recently viewed countries.");
        return Ok(());
    }
    for (i, code) in view.recent_codes().iter().enumerate() {
        let mark = if view.is_favorite(code) { "★" } else { " " };
        println!("{:>2}. {} {}", i + 1, mark, code);
    }
    Ok(())
}
