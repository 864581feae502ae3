pub mod action;
pub mod state;
pub mod view;

use crate::client::ApiClient;
use crate::config;
use crate::paths::AppPaths;

use action::{Action, AppEvent};
use state::{AppState, Screen};
use view::draw;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::info;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{env, io, time::Duration};
use tokio::sync::mpsc;

pub async fn run() -> Result<()> {
    // --- 1. PREAMBLE & CONFIG ---
    let args: Vec<String> = env::args().collect();
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        println!("Usage: fiche");
        println!();
        println!(
            "Server address comes from the {} environment variable,",
            config::BASE_URL_ENV
        );
        println!("or 'base_url' in the config file.");
        return Ok(());
    }

    // Log to a file; the terminal is ours while we run.
    if let Ok(log_path) = AppPaths::get_log_file_path()
        && let Ok(file) = std::fs::File::create(&log_path)
    {
        let _ = simplelog::WriteLogger::init(
            simplelog::LevelFilter::Info,
            simplelog::Config::default(),
            file,
        );
    }

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open("fiche_panic.log")
        {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));

    let config = match config::Config::load() {
        Ok(cfg) => cfg,
        Err(_) => {
            let path_str = config::Config::get_path_string()
                .unwrap_or_else(|_| "[Could not determine config path]".to_string());
            eprintln!("No server configured.");
            eprintln!(
                "Set the {} environment variable, or create:",
                config::BASE_URL_ENV
            );
            eprintln!("  {}", path_str);
            eprintln!("\nwith contents:");
            eprintln!("  base_url = \"http://localhost:3000\"");
            return Ok(());
        }
    };
    info!("using server {}", config.base_url);

    let client = ApiClient::new(&config.base_url)?;

    // --- 2. TERMINAL SETUP ---
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // --- 3. STATE INIT ---
    let mut app_state = AppState::new();
    let (action_tx, mut action_rx) = mpsc::channel(10);
    let (event_tx, mut event_rx) = mpsc::channel(10);

    // --- NETWORK ACTOR ---
    tokio::spawn(async move {
        while let Some(action) = action_rx.recv().await {
            match action {
                Action::Quit => break,
                Action::FetchPage(req) => {
                    let result = client.fetch_page(req.page, crate::list::PAGE_SIZE).await;
                    let _ = event_tx.send(AppEvent::PageLoaded(req, result)).await;
                }
                Action::FetchProfile(req) => {
                    let result = client.fetch_profile(&req.id).await;
                    let _ = event_tx.send(AppEvent::ProfileLoaded(req, result)).await;
                }
            }
        }
    });

    // Initial mount fetches page 1 exactly once.
    if let Some(req) = app_state.list.initial() {
        let _ = action_tx.send(Action::FetchPage(req)).await;
    }

    // --- 4. UI LOOP ---
    loop {
        terminal.draw(|f| draw(f, &mut app_state))?;

        // A. Network Events
        if let Ok(event) = event_rx.try_recv() {
            match event {
                AppEvent::PageLoaded(req, result) => {
                    app_state.list.finish(&req, result);
                    app_state.clamp_selection();
                }
                AppEvent::ProfileLoaded(req, result) => {
                    // The detail screen may already be gone; cancel() took
                    // care of staleness, finish() just drops it then.
                    if let Some(detail) = &mut app_state.detail {
                        detail.finish(&req, result);
                    }
                }
            }
        }

        // B. User Input
        if crossterm::event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            match event {
                Event::Mouse(mouse) => {
                    if app_state.screen == Screen::List {
                        match mouse.kind {
                            MouseEventKind::ScrollDown => {
                                app_state.next();
                                if app_state.near_end()
                                    && let Some(req) = app_state.list.load_more()
                                {
                                    let _ = action_tx.send(Action::FetchPage(req)).await;
                                }
                            }
                            MouseEventKind::ScrollUp => app_state.previous(),
                            _ => {}
                        }
                    }
                }
                Event::Key(key) => match app_state.screen {
                    Screen::List => match key.code {
                        KeyCode::Char('q') => {
                            let _ = action_tx.send(Action::Quit).await;
                            break;
                        }
                        KeyCode::Down | KeyCode::Char('j') => {
                            app_state.next();
                            if app_state.near_end()
                                && let Some(req) = app_state.list.load_more()
                            {
                                let _ = action_tx.send(Action::FetchPage(req)).await;
                            }
                        }
                        KeyCode::Up | KeyCode::Char('k') => app_state.previous(),
                        KeyCode::PageDown => {
                            app_state.jump_forward(10);
                            if app_state.near_end()
                                && let Some(req) = app_state.list.load_more()
                            {
                                let _ = action_tx.send(Action::FetchPage(req)).await;
                            }
                        }
                        KeyCode::PageUp => app_state.jump_backward(10),
                        KeyCode::Char('r') => {
                            // Retry from scratch when there is nothing on
                            // screen, otherwise a plain refresh.
                            let req = if app_state.list.error().is_some()
                                && app_state.list.items.is_empty()
                            {
                                app_state.list.retry()
                            } else {
                                app_state.list.refresh()
                            };
                            if let Some(req) = req {
                                let _ = action_tx.send(Action::FetchPage(req)).await;
                            }
                        }
                        KeyCode::Enter => {
                            if let Some(req) = app_state.open_detail() {
                                let _ = action_tx.send(Action::FetchProfile(req)).await;
                            }
                        }
                        _ => {}
                    },

                    Screen::Detail => match key.code {
                        KeyCode::Char('q') => {
                            let _ = action_tx.send(Action::Quit).await;
                            break;
                        }
                        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('h') => {
                            app_state.close_detail();
                        }
                        KeyCode::Char('r') => {
                            if let Some(detail) = &mut app_state.detail
                                && let Some(req) = detail.retry()
                            {
                                let _ = action_tx.send(Action::FetchProfile(req)).await;
                            }
                        }
                        _ => {}
                    },
                },
                _ => {}
            }
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
