mod app;
mod config;
mod error;
mod logging;

use std::io::{self, stdout};

use app::{App, TICK_INTERVAL, Ticker};
use config::Config;
use error::Error;

use ratatui::{
    DefaultTerminal,
    crossterm::{
        event::{DisableMouseCapture, EnableMouseCapture},
        execute,
    },
};

fn main() -> Result<(), Error> {
    let (config, config_error) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    let _log_guard = logging::init(&config.log_level);
    if let Some(e) = config_error {
        tracing::warn!(error = %e, "falling back to default config");
    }

    // the ticker lives outside the UI loop and is released after it
    let ticker = Ticker::start(TICK_INTERVAL)?;

    let mut terminal = ratatui::init();
    let app_result = run(&mut terminal, &config, &ticker);
    ratatui::restore();

    ticker.stop();
    if let Err(e) = &app_result {
        tracing::error!(error = %e, "terminal error");
    }
    app_result.map_err(Error::from)
}

fn run(terminal: &mut DefaultTerminal, config: &Config, ticker: &Ticker) -> io::Result<()> {
    if config.mouse {
        execute!(stdout(), EnableMouseCapture)?;
    }

    let result = App::new(&config.default_color).run(terminal, ticker);

    if config.mouse {
        execute!(stdout(), DisableMouseCapture)?;
    }
    result
}
