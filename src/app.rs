mod color;
mod mode;
mod ticker;
mod timer;
mod timer_list;

pub use ticker::{TICK_INTERVAL, Ticker};
pub use timer_list::DEFAULT_COLOR;

use std::cell::Cell;
use std::io;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use mode::{Focus, Target};
use timer::{Timer, TimerId};
use timer_list::{Change, TimerList};

use ratatui::{
    DefaultTerminal, Frame,
    buffer::Buffer,
    crossterm::event::{
        self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
        MouseEventKind,
    },
    layout::{Constraint, Direction, Flex, Layout, Margin, Rect},
    style::{Color, Style, Styled, Stylize},
    symbols::border,
    text::{Line, Span},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget,
        Widget,
    },
};

// how long to wait for input before checking the ticker again
const POLL_TIMEOUT: Duration = Duration::from_millis(50);
const ROW_HEIGHT: u16 = 5;
const PLACEHOLDER: &str = "Enter color (e.g. #ff5733)";

pub struct App {
    exit: bool,
    dirty: bool,
    timers: TimerList,
    changes: Receiver<Change>,
    selected: usize,
    focus: Focus,
    // first and last id drawn in the last frame
    shown: Cell<Option<(TimerId, TimerId)>>,
}

impl App {
    pub fn new(default_color: &str) -> Self {
        let mut timers = TimerList::new(default_color);
        let changes = timers.subscribe();
        Self {
            exit: false,
            dirty: true,
            timers,
            changes,
            selected: 0,
            focus: Focus::default(),
            shown: Cell::new(None),
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal, ticker: &Ticker) -> io::Result<()> {
        while !self.exit {
            if self.dirty {
                terminal.draw(|frame| self.draw(frame))?;
                self.dirty = false;
            }
            self.handle_input(terminal)?;

            for _ in 0..ticker.drain() {
                self.timers.tick();
            }
            self.sync();
        }

        tracing::info!(
            timers = self.timers.len(),
            running = self.timers.iter().filter(|timer| timer.running).count(),
            "exiting"
        );
        Ok(())
    }

    fn handle_input(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        if event::poll(POLL_TIMEOUT)? {
            match event::read()? {
                event::Event::Key(key) if key.kind == KeyEventKind::Press => self.key_event(key),
                event::Event::Mouse(mouse) => {
                    let area = terminal.get_frame().area();
                    self.mouse_event(area, mouse);
                }
                _ => (),
            }
            // resizes and focus changes need a redraw too
            self.dirty = true;
        }
        Ok(())
    }

    /// Picks up controller notifications and keeps the selection in range.
    ///
    /// Updates to timers scrolled out of view don't trigger a redraw.
    fn sync(&mut self) {
        // drawn rows are contiguous and ids grow with position, so a range check is enough
        let shown = self.shown.get();

        for change in self.changes.try_iter() {
            let redraw = match change {
                Change::Updated(id) => {
                    shown.is_some_and(|(first, last)| (first..=last).contains(&id))
                }
                Change::Added(id) | Change::Removed(id) => {
                    tracing::trace!(%id, "rows changed");
                    true
                }
            };
            self.dirty |= redraw;
        }
        self.selected = self.selected.min(self.timers.len().saturating_sub(1));
    }

    fn key_event(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = true;
            return;
        }

        match self.focus {
            Focus::List => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
                KeyCode::Up | KeyCode::Char('k') => self.up(),
                KeyCode::Down | KeyCode::Char('j') => self.down(),
                KeyCode::Char(' ') | KeyCode::Char('s') => self.toggle_selected(),
                KeyCode::Char('r') => self.reset_selected(),
                KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
                KeyCode::Char('a') => self.submit(),
                KeyCode::Tab | KeyCode::Char('i') => self.focus = Focus::Input,
                _ => (),
            },
            Focus::Input => match key.code {
                KeyCode::Enter => self.submit(),
                KeyCode::Esc | KeyCode::Tab => self.focus = Focus::List,
                KeyCode::Backspace => self.timers.pop_input(),
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.timers.push_input(c)
                }
                _ => (),
            },
        }
    }

    fn mouse_event(&mut self, area: Rect, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(target) = self.hit(area, mouse.column, mouse.row) {
                    self.click(target);
                }
            }
            MouseEventKind::ScrollDown => self.down(),
            MouseEventKind::ScrollUp => self.up(),
            _ => (),
        }
    }

    fn click(&mut self, target: Target) {
        match target {
            Target::Toggle(id) => {
                self.select(id);
                self.timers.toggle(id);
            }
            Target::Reset(id) => {
                self.select(id);
                self.timers.reset(id);
            }
            Target::Delete(id) => {
                let selected = self.selected_id();
                self.timers.delete(id);
                match selected {
                    Some(selected) if selected != id => self.select(selected),
                    _ => {
                        self.selected = self.selected.min(self.timers.len().saturating_sub(1));
                    }
                }
            }
            Target::Row(index) => {
                self.selected = index;
                self.focus = Focus::List;
            }
            Target::Input => self.focus = Focus::Input,
            Target::AddButton => self.submit(),
        }
    }

    fn hit(&self, area: Rect, column: u16, row: u16) -> Option<Target> {
        let mouse = Rect::new(column, row, 1, 1);
        let screen = Screen::new(area);

        if mouse.intersects(screen.input) {
            return Some(Target::Input);
        }
        if mouse.intersects(screen.add_button) {
            return Some(Target::AddButton);
        }

        for (index, rect) in self.visible_rows(screen.rows) {
            if !mouse.intersects(rect) {
                continue;
            }
            let id = self.timers.id_at(index)?;
            let layout = RowLayout::new(rect);
            if mouse.intersects(layout.toggle) {
                return Some(Target::Toggle(id));
            } else if mouse.intersects(layout.reset) {
                return Some(Target::Reset(id));
            } else if mouse.intersects(layout.delete) {
                return Some(Target::Delete(id));
            }
            return Some(Target::Row(index));
        }
        None
    }

    fn submit(&mut self) {
        let id = self.timers.submit();
        self.select(id);
        self.focus = Focus::List;
    }

    fn select(&mut self, id: TimerId) {
        if let Some(index) = self.timers.position(id) {
            self.selected = index;
        }
    }

    fn selected_id(&self) -> Option<TimerId> {
        self.timers.id_at(self.selected)
    }

    fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.timers.toggle(id);
        }
    }

    fn reset_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.timers.reset(id);
        }
    }

    fn delete_selected(&mut self) {
        if let Some(id) = self.selected_id() {
            self.timers.delete(id);
            self.selected = self.selected.min(self.timers.len().saturating_sub(1));
        }
    }

    fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn down(&mut self) {
        if self.selected + 1 < self.timers.len() {
            self.selected += 1;
        }
    }

    /// Index and area of every row that fits, scrolled so the selection is visible.
    fn visible_rows(&self, rows: Rect) -> Vec<(usize, Rect)> {
        let capacity = (rows.height / ROW_HEIGHT).max(1) as usize;
        let first = (self.selected + 1).saturating_sub(capacity);

        (first..self.timers.len())
            .take(capacity)
            .enumerate()
            .map(|(slot, index)| {
                let y = rows.y + slot as u16 * ROW_HEIGHT;
                let height = ROW_HEIGHT.min(rows.bottom().saturating_sub(y));
                (index, Rect::new(rows.x, y, rows.width, height))
            })
            .collect()
    }

    fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

/// The fixed regions of the screen.
struct Screen {
    title: Rect,
    list: Rect,
    rows: Rect,
    scrollbar: Rect,
    add_bar: Rect,
    input: Rect,
    add_button: Rect,
}

impl Screen {
    fn new(area: Rect) -> Self {
        let vert = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Min(0),    // Timers
                Constraint::Length(5), // Add bar
            ])
            .split(area);

        let inner = vert[1].inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let list = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(inner);

        let bar = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Input
                Constraint::Length(1), // ---
                Constraint::Length(1), // Button
            ])
            .split(vert[2].inner(Margin {
                horizontal: 2,
                vertical: 1,
            }));

        let button = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(17)])
            .flex(Flex::Center)
            .split(bar[2]);

        Self {
            title: vert[0],
            list: vert[1],
            rows: list[0],
            scrollbar: list[1],
            add_bar: vert[2],
            input: bar[0],
            add_button: button[0],
        }
    }
}

/// Regions inside a single timer row.
struct RowLayout {
    time: Rect,
    toggle: Rect,
    reset: Rect,
    delete: Rect,
}

impl RowLayout {
    fn new(area: Rect) -> Self {
        let inner = area.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Time
                Constraint::Length(1), // ---
                Constraint::Length(1), // Buttons
            ])
            .split(inner);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(9),
                Constraint::Length(2),
                Constraint::Length(9),
                Constraint::Length(2),
                Constraint::Length(10),
            ])
            .flex(Flex::Center)
            .split(lines[2]);

        Self {
            time: lines[0],
            toggle: buttons[0],
            reset: buttons[2],
            delete: buttons[4],
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        let screen = Screen::new(area);

        Block::new()
            .style(Style::default().bg(color::BACKGROUND).fg(Color::Black))
            .render(area, buf);

        Paragraph::new(Span::from("MultiTimer").fg(Color::Blue).bold())
            .centered()
            .block(Block::bordered().border_set(border::DOUBLE))
            .render(screen.title, buf);

        let running = self
            .selected_id()
            .and_then(|id| self.timers.get(id))
            .is_some_and(|timer| timer.running);
        let help = match (self.focus, running) {
            (Focus::List, false) => {
                " ↑↓ select · space start · r reset · d delete · tab color · q quit "
            }
            (Focus::List, true) => {
                " ↑↓ select · space pause · r reset · d delete · tab color · q quit "
            }
            (Focus::Input, _) => " type a color · enter add · esc back ",
        };
        Block::bordered()
            .border_set(border::DOUBLE)
            .title("╡ Timers ╞")
            .title_bottom(Line::from(help).centered())
            .render(screen.list, buf);

        if self.timers.is_empty() {
            let center = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1)])
                .flex(Flex::Center)
                .split(screen.rows);
            Paragraph::new("No timers yet. Press 'a' to add one.")
                .centered()
                .set_style(Color::DarkGray)
                .render(center[0], buf);
        }

        let rows = self.visible_rows(screen.rows);
        let first = rows.first().map_or(0, |&(index, _)| index);
        let mut drawn = None;
        for (&(index, rect), timer) in rows.iter().zip(self.timers.iter().skip(first)) {
            render_row(timer, index == self.selected, rect, buf);
            drawn = match drawn {
                None => Some((timer.id, timer.id)),
                Some((start, _)) => Some((start, timer.id)),
            };
        }
        self.shown.set(drawn);

        if rows.len() < self.timers.len() {
            let mut state = ScrollbarState::new(self.timers.len()).position(self.selected);
            Scrollbar::new(ScrollbarOrientation::VerticalRight).render(
                screen.scrollbar,
                buf,
                &mut state,
            );
        }

        render_add_bar(self, &screen, buf);
    }
}

fn render_row(timer: &Timer, selected: bool, area: Rect, buf: &mut Buffer) {
    let layout = RowLayout::new(area);

    let style = match color::parse(&timer.color) {
        Some(bg) => Style::default().bg(bg).fg(color::contrast(bg)),
        None => Style::default(),
    };
    let border_set = if selected {
        border::THICK
    } else {
        border::ROUNDED
    };

    Block::bordered()
        .border_set(border_set)
        .style(style)
        .title(format!("╡ Timer #{} ╞", timer.id))
        .title(Line::from(format!(" {} ", timer.color)).right_aligned())
        .render(area, buf);

    Paragraph::new(timer.formatted())
        .bold()
        .centered()
        .render(layout.time, buf);

    let label = if timer.running { "Pause" } else { "Start" };
    button(label, Color::Blue, layout.toggle, buf);
    button("Reset", Color::Blue, layout.reset, buf);
    button("Delete", Color::Red, layout.delete, buf);
}

fn button(text: &str, bg: Color, area: Rect, buf: &mut Buffer) {
    Paragraph::new(text)
        .centered()
        .style(Style::default().bg(bg).fg(Color::White))
        .render(area, buf);
}

fn render_add_bar(app: &App, screen: &Screen, buf: &mut Buffer) {
    Block::new()
        .style(Style::default().bg(color::ADD_BAR))
        .render(screen.add_bar, buf);

    let input = app.timers.color_input();
    let focused = app.focus == Focus::Input;
    let field = if input.is_empty() && !focused {
        Line::from(PLACEHOLDER.dark_gray())
    } else if focused {
        Line::from(vec![Span::raw(input), Span::raw("▏")])
    } else {
        Line::from(input)
    };
    Paragraph::new(field)
        .style(Style::default().bg(Color::White).fg(Color::Black))
        .render(screen.input, buf);

    Paragraph::new("+ Add New Timer".bold())
        .centered()
        .style(Style::default().bg(color::ADD_BAR).fg(Color::White))
        .render(screen.add_button, buf);
}
