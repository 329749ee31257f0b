use crate::app::{print_notice, App};
use anyhow::{Context, Result};
use clap::ValueEnum;
use countrydex::session::Session;
use countrydex::settings::{self, Theme};
use countrydex::view_state::ViewKind;

pub fn run_login(app: &App, username: &str, password: &str) -> Result<()> {
    let session = app.session();
    let user = session.login(username, password)?;
    println!("Signed in as {user}");
    Ok(())
}

pub fn run_logout(app: &App) -> Result<()> {
    let session = app.session();
    match session.current_user_id() {
        Some(user) => {
            session.logout().context("Failed to sign out")?;
            println!("Signed out {user}");
        }
        None => println!("Not signed in"),
    }
    Ok(())
}

pub fn run_whoami(app: &App) -> Result<()> {
    match app.session().current_user_id() {
        Some(user) => println!("{user}"),
        None => println!("(anonymous)"),
    }
    Ok(())
}

/// Settings view: drop favorites and history for the signed-in user.
pub fn run_clear_data(app: &App) -> Result<()> {
    let session = app.session();
    let mut view = app.mount(ViewKind::Settings, &session);
    if view.user().is_none() {
        println!("Not signed in; nothing to clear.");
        return Ok(());
    }
    match view.clear_data() {
        Ok(()) => println!("Your browsing data has been cleared successfully"),
        Err(_) => print_notice(view.notice()),
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeAction {
    Light,
    Dark,
    Toggle,
}

pub fn run_theme(app: &App, action: Option<ThemeAction>) -> Result<()> {
    let store = app.store();
    let current = settings::load_theme(store.as_ref());
    let next = match action {
        None => {
            println!("{current}");
            return Ok(());
        }
        Some(ThemeAction::Light) => Theme::Light,
        Some(ThemeAction::Dark) => Theme::Dark,
        Some(ThemeAction::Toggle) => current.toggled(),
    };
    settings::save_theme(store.as_ref(), next).context("Could not save changes")?;
    println!("{next}");
    Ok(())
}
