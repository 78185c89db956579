use std::error::Error;

use anyhow::Result;
use crossterm::event::KeyCode;
use log::debug;
use ratatui::layout::{Alignment, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::graph::LinkGraph;
use crate::models::{SelectOutcome, ViewId};
use crate::music::MusicBrowser;
use crate::view::BoundListView;

use super::helpers::{split_columns, split_footer, step_index, surface_error};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown.
const PAGE_STEP: isize = 10;

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Terminal shell around a [`MusicBrowser`]. It owns the focus and the footer;
/// every list change goes through the link graph.
pub struct App {
    browser: MusicBrowser,
    focus: usize,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(browser: MusicBrowser) -> Self {
        Self {
            browser,
            focus: 0,
            status: None,
        }
    }

    /// Populate the root lists. Called once before the first frame.
    pub fn start(&mut self) -> Result<()> {
        self.browser.graph.requery_roots()?;
        Ok(())
    }

    pub fn browser(&self) -> &MusicBrowser {
        &self.browser
    }

    pub fn graph(&self) -> &LinkGraph {
        &self.browser.graph
    }

    pub fn focused(&self) -> ViewId {
        self.browser.columns()[self.focus]
    }

    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text.as_str())
    }

    /// Apply one key press. Returns `true` when the user asked to quit.
    ///
    /// Query failures do not end the session; they land in the footer and the
    /// affected list simply stays as it was.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-PAGE_STEP),
            KeyCode::PageDown => self.move_selection(PAGE_STEP),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => {
                let len = self.focused_view().map_or(0, |view| view.items().len());
                if len > 0 {
                    self.select_index(len - 1);
                }
            }
            KeyCode::Left | KeyCode::BackTab | KeyCode::Char('h') => self.move_focus(-1),
            KeyCode::Right | KeyCode::Tab | KeyCode::Char('l') => self.move_focus(1),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            _ => {}
        }
        Ok(false)
    }

    fn focused_view(&self) -> Option<&BoundListView> {
        self.browser.graph.view(self.focused()).ok()
    }

    fn move_focus(&mut self, offset: isize) {
        let columns = self.browser.columns().len() as isize;
        self.focus = (self.focus as isize + offset).rem_euclid(columns) as usize;
    }

    fn move_selection(&mut self, offset: isize) {
        let Some(view) = self.focused_view() else {
            return;
        };
        let current = view.selection();
        if let Some(next) = step_index(current, offset, view.items().len()) {
            if Some(next) != current {
                self.select_index(next);
            }
        }
    }

    /// Relay a selection change to the focused list, the same event a mouse
    /// click on a row would produce.
    fn select_index(&mut self, index: usize) {
        let id = self.focused();
        match self.browser.graph.on_select(id, index) {
            Ok(SelectOutcome::Unresolved) => {
                self.set_status(
                    "Selected entry is no longer in the database. Press r to reload.",
                    StatusKind::Error,
                );
            }
            Ok(outcome) => {
                debug!("selection {index} on {id}: {outcome:?}");
                self.clear_status();
            }
            Err(err) => self.report(&err),
        }
    }

    fn reload(&mut self) {
        match self.browser.graph.requery_roots() {
            Ok(()) => self.set_status("Reloaded.", StatusKind::Info),
            Err(err) => self.report(&err),
        }
    }

    fn report(&mut self, err: &(dyn Error + 'static)) {
        log::error!("{err}");
        self.set_status(surface_error(err), StatusKind::Error);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let (content_area, footer_area) = split_footer(frame.area(), FOOTER_HEIGHT);

        let columns = self.browser.columns();
        for (index, (id, area)) in columns
            .iter()
            .zip(split_columns(content_area, columns.len()))
            .enumerate()
        {
            if let Ok(view) = self.browser.graph.view(*id) {
                self.draw_column(frame, area, view, index == self.focus);
            }
        }

        if let Some(area) = footer_area {
            self.draw_footer(frame, area);
        }
    }

    fn draw_column(&self, frame: &mut Frame, area: Rect, view: &BoundListView, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(Span::styled(
                format!(" {} ", view.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ));

        if view.is_empty() {
            // A filtered list that came back empty has a parent chosen already.
            let message = match (view.current_filter(), view.placeholder()) {
                (Some(_), _) => format!("No {} found.", view.title().to_lowercase()),
                (None, Some(placeholder)) => placeholder.to_string(),
                (None, None) => "Nothing to show.".to_string(),
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray))
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = view
            .items()
            .iter()
            .map(|entry| ListItem::new(entry.display.clone()))
            .collect();

        let highlight = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let list = List::new(items)
            .block(block)
            .highlight_style(highlight)
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        list_state.select(view.selection());
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let paragraph =
            Paragraph::new(vec![status_line, footer_instructions()]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

fn footer_instructions() -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    Line::from(vec![
        Span::styled("[↑↓]", key_style),
        Span::raw(" Select   "),
        Span::styled("[←→/Tab]", key_style),
        Span::raw(" Switch List   "),
        Span::styled("[r]", key_style),
        Span::raw(" Reload   "),
        Span::styled("[q]", key_style),
        Span::raw(" Quit"),
    ])
}
