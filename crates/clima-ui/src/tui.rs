//! Terminal event loop.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::crossterm::event::{self, Event};
use ratatui::DefaultTerminal;

use crate::app_services::AppServices;
use crate::controller::Controller;
use crate::views;

/// Run the terminal UI until the user quits
pub fn run(services: AppServices, warnings: Vec<String>) -> Result<()> {
    let tick_rate = Duration::from_millis(services.config().ui.tick_rate_ms.max(10));
    let mut controller = Controller::new(services, warnings);
    controller.start();

    let mut terminal = ratatui::init();
    let result = event_loop(&mut terminal, &mut controller, tick_rate);
    ratatui::restore();

    controller.shutdown();
    tracing::info!("Terminal UI closed");
    result
}

fn event_loop(
    terminal: &mut DefaultTerminal,
    controller: &mut Controller,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    while controller.state.running {
        controller.drain();
        terminal
            .draw(|frame| views::render(frame, &controller.state))
            .context("Failed to draw frame")?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout).context("Failed to poll terminal events")? {
            if let Event::Key(key) = event::read().context("Failed to read terminal event")? {
                let action = controller.state.handle_key(key);
                controller.dispatch(action);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            controller.tick(Instant::now());
            last_tick = Instant::now();
        }
    }

    Ok(())
}
