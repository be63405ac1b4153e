//! Terminal application
//!
//! Owns the terminal and drives the personal menu from keyboard and resize
//! events. Ticks advance the tab transition.

use std::io::{self, Stdout};
use std::panic;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::config::LayoutConfig;
use crate::core::Section;
use crate::ui_backend::{PanelInput, PersonalMenu};

use super::events::{
    key_action, stepped_section, viewport_for, Event, EventHandler, KeyAction,
};
use super::renderer::{section_lines, MenuView};
use super::theme::Theme;

pub struct TuiApp {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    menu: PersonalMenu,
    layout: LayoutConfig,
    theme: Theme,
}

impl TuiApp {
    /// Take over the terminal for `menu`
    pub fn new(menu: PersonalMenu, layout: LayoutConfig) -> Result<Self> {
        Self::install_panic_hook();
        let terminal = Self::setup_terminal()?;
        Ok(Self {
            terminal,
            menu,
            layout,
            theme: Theme::default(),
        })
    }

    /// Run until quit; fetches keep running on the tokio runtime meanwhile
    pub async fn run(mut self) -> Result<()> {
        let events = EventHandler::default();
        let size = self.terminal.size()?;
        self.resize(size.width, size.height);

        let result = self.event_loop(&events);
        self.restore_terminal()?;
        result
    }

    fn event_loop(&mut self, events: &EventHandler) -> Result<()> {
        let state = self.menu.state.clone();
        while !state.should_quit() {
            self.menu.controller.pager().tick(Instant::now());
            self.measure_sections();

            let view = MenuView::new(&state, &self.theme)
                .breakpoint(self.layout.breakpoint_px)
                .cell_size(self.layout.px_per_column, self.layout.px_per_row);
            self.terminal.draw(|f| f.render_widget(view, f.area()))?;

            match tokio::task::block_in_place(|| events.next())? {
                Event::Key(key) => match key_action(key) {
                    Some(KeyAction::Quit) => state.set_should_quit(true),
                    Some(KeyAction::Panel(input)) => self.dispatch(input),
                    Some(KeyAction::Jump(index)) => self.jump_tab(index),
                    Some(KeyAction::Step(step)) => self.step_tab(step),
                    None => {}
                },
                Event::Resize(cols, rows) => self.resize(cols, rows),
                Event::Tick => {}
            }
        }
        Ok(())
    }

    fn dispatch(&self, input: PanelInput) {
        let (outcome, refresh) = self.menu.controller.handle(input);
        if let Some(cycle) = refresh {
            tracing::debug!(cycle = cycle.cycle, widgets = ?cycle.widgets(), "refresh started");
        }
        tracing::trace!(?input, ?outcome, "input handled");
    }

    fn jump_tab(&self, index: usize) {
        let order = self.menu.state.geometry().paged_sections();
        if let Some(section) = order.get(index) {
            self.dispatch(PanelInput::Tab(*section));
        }
    }

    fn step_tab(&self, step: i32) {
        let order = self.menu.state.geometry().paged_sections();
        if let Some(section) = stepped_section(&order, self.menu.state.active_tab(), step) {
            self.dispatch(PanelInput::Tab(section));
        }
    }

    fn resize(&self, cols: u16, rows: u16) {
        let viewport = viewport_for(cols, rows, self.layout.px_per_column, self.layout.px_per_row);
        self.dispatch(PanelInput::Resize(viewport));
    }

    /// Rendered section heights feed the pager's height computation
    fn measure_sections(&self) {
        let state = &self.menu.state;
        for section in Section::ALL {
            let lines = section_lines(state, section, &self.theme).len() as u32;
            state.set_section_height(section, lines * self.layout.px_per_row);
        }
    }

    fn install_panic_hook() {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = Self::restore_terminal_static();
            original_hook(panic_info);
        }));
    }

    fn restore_terminal_static() -> Result<()> {
        disable_raw_mode()?;
        execute!(io::stdout(), LeaveAlternateScreen)?;
        Ok(())
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        Ok(Terminal::new(backend)?)
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}
