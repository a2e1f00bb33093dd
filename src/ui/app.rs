use std::mem;

use crossterm::event::KeyCode;
use log::warn;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::models::ContentItem;
use crate::observe::Subscription;
use crate::preferences::Preferences;
use crate::viewmodel::{DetailViewModel, LearningViewModel, SettingsViewModel};

use super::forms::ConfirmDelete;
use super::helpers::{centered_rect, Palette};
use super::navigation::{Navigator, Route};
use super::screens::{HomeScreen, Screen, SearchScreen};
use super::Services;

/// Header space for the route title.
const HEADER_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows moved by PageUp / PageDown in lists.
const PAGE_STEP: isize = 5;

/// Modal overlays scoped to the current screen.
enum Mode {
    Normal,
    ConfirmDelete(ConfirmDelete),
    ConfirmReset,
}

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

/// Central application state shared across the TUI.
pub struct App {
    services: Services,
    navigator: Navigator,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
    /// Confirmed delete waiting for the next sync to report its outcome.
    pending_delete: Option<ConfirmDelete>,
    preferences: Preferences,
    preference_feed: Subscription<Preferences>,
}

impl App {
    pub fn new(services: Services) -> Self {
        let navigator = Navigator::new();
        let screen = Screen::open(navigator.current(), &services);
        let preference_feed = services.preferences.observe();
        Self {
            services,
            navigator,
            screen,
            mode: Mode::Normal,
            status: None,
            pending_delete: None,
            preferences: Preferences::default(),
            preference_feed,
        }
    }

    /// Advance the active screen and pick up preference changes. Called once
    /// per loop iteration before drawing.
    pub fn tick(&mut self) {
        if let Some(update) = self.preference_feed.next_update() {
            match update {
                Ok(prefs) => self.preferences = prefs,
                Err(err) => {
                    warn!("preference feed failed: {err:#}");
                    self.preference_feed = self.services.preferences.observe();
                }
            }
        }

        self.screen.sync();

        if let Some(confirm) = self.pending_delete.take() {
            let deleted = match &mut self.screen {
                Screen::Home(home) => home.vm.take_deleted().contains(&confirm.id),
                _ => false,
            };
            if deleted {
                self.set_info(format!("Deleted '{}'.", confirm.title));
            }
        }
    }

    pub fn current_route(&self) -> &Route {
        self.navigator.current()
    }

    /// Dispatch one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit),
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm),
            Mode::ConfirmReset => self.handle_confirm_reset(code),
        };
        exit
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        let mut open: Option<Route> = None;
        let mut back = false;
        let mut notice: Option<StatusMessage> = None;

        match &mut self.screen {
            Screen::Home(home) => match code {
                KeyCode::Char('q') | KeyCode::Esc => *exit = true,
                KeyCode::Up => home.move_selection(-1),
                KeyCode::Down => home.move_selection(1),
                KeyCode::PageUp => home.move_selection(-PAGE_STEP),
                KeyCode::PageDown => home.move_selection(PAGE_STEP),
                KeyCode::Home => home.selected = 0,
                KeyCode::End => home.move_selection(isize::MAX / 2),
                KeyCode::Enter => {
                    open = home
                        .current_item()
                        .map(|item| Route::Detail { id: item.id.clone() });
                }
                KeyCode::Char('/') => open = Some(Route::Search),
                KeyCode::Char('s') | KeyCode::Char('S') => open = Some(Route::Settings),
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if home.vm.state().error.is_some() {
                        home.vm.retry();
                    } else {
                        home.vm.refresh();
                    }
                }
                KeyCode::Char('x') => home.vm.dismiss_error(),
                KeyCode::Char('-') | KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(item) = home.current_item() {
                        return Mode::ConfirmDelete(ConfirmDelete::from(item));
                    }
                    notice = Some(StatusMessage {
                        text: "No topic selected to remove.".to_string(),
                        kind: StatusKind::Error,
                    });
                }
                _ => {}
            },
            Screen::Search(search) => {
                if search.editing {
                    match code {
                        KeyCode::Enter => search.submit(),
                        KeyCode::Backspace => search.input.backspace(),
                        KeyCode::Down | KeyCode::Tab => search.editing = false,
                        KeyCode::Esc => {
                            if search.input.value.is_empty() {
                                back = true;
                            } else {
                                search.clear();
                            }
                        }
                        KeyCode::Char(ch) => {
                            search.input.push_char(ch);
                        }
                        _ => {}
                    }
                } else {
                    match code {
                        KeyCode::Char('q') => *exit = true,
                        KeyCode::Esc => back = true,
                        KeyCode::Up if search.selected == 0 => search.editing = true,
                        KeyCode::Up => search.move_selection(-1),
                        KeyCode::Down => search.move_selection(1),
                        KeyCode::PageUp => search.move_selection(-PAGE_STEP),
                        KeyCode::PageDown => search.move_selection(PAGE_STEP),
                        KeyCode::Char('/') | KeyCode::Tab => search.editing = true,
                        KeyCode::Char('c') => search.clear(),
                        KeyCode::Char('r') => search.vm.retry(),
                        KeyCode::Enter => {
                            open = search
                                .current_item()
                                .map(|item| Route::Detail { id: item.id.clone() });
                        }
                        _ => {}
                    }
                }
            }
            Screen::Detail(vm) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Backspace => back = true,
                KeyCode::Char('r') => vm.retry(),
                KeyCode::Char('l') | KeyCode::Enter => {
                    open = vm
                        .state()
                        .content_item
                        .as_ref()
                        .map(|item| Route::Learning { id: item.id.clone() });
                }
                _ => {}
            },
            Screen::Learning(vm) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Backspace => back = true,
                KeyCode::Right | KeyCode::Char('n') => vm.next(),
                KeyCode::Left | KeyCode::Char('p') => vm.previous(),
                KeyCode::Char('c') => {
                    if !vm.state().is_completed && vm.state().total_steps > 0 {
                        vm.complete();
                        notice = Some(StatusMessage {
                            text: "Learning session complete!".to_string(),
                            kind: StatusKind::Info,
                        });
                    }
                }
                _ => {}
            },
            Screen::Settings(vm) => match code {
                KeyCode::Char('q') => *exit = true,
                KeyCode::Esc | KeyCode::Backspace => back = true,
                KeyCode::Char('d') => vm.toggle_dark_mode(),
                KeyCode::Char('n') => vm.toggle_notifications(),
                KeyCode::Char('x') => return Mode::ConfirmReset,
                _ => {}
            },
        }

        if let Some(route) = open {
            self.navigate(route);
        } else if back {
            self.go_back();
        }
        if let Some(message) = notice {
            self.show(message);
        }
        Mode::Normal
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Screen::Home(home) = &mut self.screen {
                    home.vm.delete(&confirm.id);
                    self.pending_delete = Some(confirm);
                }
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Mode::Normal,
            _ => Mode::ConfirmDelete(confirm),
        }
    }

    fn handle_confirm_reset(&mut self, code: KeyCode) -> Mode {
        match code {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                let restored = match &mut self.screen {
                    Screen::Settings(vm) => {
                        vm.reset_catalog();
                        match vm.state().error {
                            None => vm.state().last_reset,
                            Some(_) => None,
                        }
                    }
                    _ => None,
                };
                if let Some(count) = restored {
                    self.set_info(format!("Catalog reset: {count} topics restored."));
                }
                Mode::Normal
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Mode::Normal,
            _ => Mode::ConfirmReset,
        }
    }

    /// Push `route` and build a fresh state holder for it.
    fn navigate(&mut self, route: Route) {
        self.navigator.push(route);
        self.screen = Screen::open(self.navigator.current(), &self.services);
        self.pending_delete = None;
        self.clear_status();
    }

    fn go_back(&mut self) {
        if let Some(route) = self.navigator.pop() {
            self.screen = Screen::open(route, &self.services);
        }
    }

    fn palette(&self) -> Palette {
        Palette::for_mode(self.preferences.dark_mode)
    }

    /// Informational messages respect the notifications preference.
    fn show(&mut self, message: StatusMessage) {
        if matches!(message.kind, StatusKind::Info) && !self.preferences.notifications_enabled {
            return;
        }
        self.status = Some(message);
    }

    fn set_info<S: Into<String>>(&mut self, text: S) {
        self.show(StatusMessage {
            text: text.into(),
            kind: StatusKind::Info,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let palette = self.palette();
        frame.render_widget(Block::default().style(palette.base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT.min(area.height)),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT.min(area.height)),
            ])
            .split(area);

        self.draw_header(frame, chunks[0], &palette);

        match &self.screen {
            Screen::Home(home) => self.draw_home(frame, chunks[1], home, &palette),
            Screen::Search(search) => self.draw_search(frame, chunks[1], search, &palette),
            Screen::Detail(vm) => self.draw_detail(frame, chunks[1], vm, &palette),
            Screen::Learning(vm) => self.draw_learning(frame, chunks[1], vm, &palette),
            Screen::Settings(vm) => self.draw_settings(frame, chunks[1], vm, &palette),
        }

        self.draw_footer(frame, chunks[2], &palette);

        match &self.mode {
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm, &palette),
            Mode::ConfirmReset => self.draw_confirm_reset(frame, area, &palette),
            Mode::Normal => {}
        }
    }

    fn draw_header(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let route = self.navigator.current();
        let mut spans = vec![Span::styled("AndroidOne", palette.highlight())];
        spans.push(Span::raw("  ›  "));
        spans.push(Span::styled(
            route.title(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        let header = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::BOTTOM))
            .style(palette.base());
        frame.render_widget(header, area);
    }

    /// Split off an error banner at the top of `area` when `error` is set and
    /// return the space left for content. Errors render above any content the
    /// screen still holds.
    fn draw_error_banner(
        &self,
        frame: &mut Frame,
        area: Rect,
        error: Option<&str>,
        palette: &Palette,
    ) -> Rect {
        let Some(message) = error else {
            return area;
        };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);
        let banner = Paragraph::new(vec![Line::from(vec![
            Span::styled(message.to_string(), Style::default().fg(palette.error)),
            Span::raw("   "),
            Span::styled("[r]", palette.key_hint()),
            Span::raw(" Retry"),
        ])])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .border_style(Style::default().fg(palette.error)),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(banner, chunks[0]);
        chunks[1]
    }

    fn draw_placeholder(&self, frame: &mut Frame, area: Rect, text: &str, palette: &Palette) {
        let message = Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(palette.muted))
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(message, area);
    }

    fn draw_home(&self, frame: &mut Frame, area: Rect, home: &HomeScreen, palette: &Palette) {
        let state = home.vm.state();
        let area = self.draw_error_banner(frame, area, state.error.as_deref(), palette);

        if state.items.is_empty() {
            let text = if state.is_loading || state.is_refreshing {
                "Loading catalog…"
            } else {
                "No topics yet. Press 'r' to refresh."
            };
            self.draw_placeholder(frame, area, text, palette);
            return;
        }

        let title = if state.is_refreshing {
            format!("Topics ({}) · refreshing", state.items.len())
        } else {
            format!("Topics ({})", state.items.len())
        };
        self.render_item_list(frame, area, &title, &state.items, home.selected, palette);
    }

    fn draw_search(
        &self,
        frame: &mut Frame,
        area: Rect,
        search: &SearchScreen,
        palette: &Palette,
    ) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let mut block = Block::default().borders(Borders::ALL).title("Query");
        if search.editing {
            block = block.border_style(Style::default().fg(palette.accent));
        }
        let input = Paragraph::new(search.input.build_line("Search", palette)).block(block.clone());
        frame.render_widget(input, chunks[0]);
        if search.editing {
            let inner = block.inner(chunks[0]);
            let typed = u16::try_from("Search: ".len() + search.input.value_len())
                .unwrap_or(u16::MAX);
            let cursor_x = inner
                .x
                .saturating_add(typed)
                .min(inner.right().saturating_sub(1));
            frame.set_cursor_position((cursor_x, inner.y));
        }

        let state = search.vm.state();
        let area = self.draw_error_banner(frame, chunks[1], state.error.as_deref(), palette);
        if state.results.is_empty() {
            let text = if state.is_loading {
                "Searching…"
            } else if state.query.is_empty() {
                "Type a query and press Enter."
            } else {
                "No topics match this query."
            };
            self.draw_placeholder(frame, area, text, palette);
            return;
        }

        let title = format!("Results ({})", state.results.len());
        let selected = if search.editing {
            usize::MAX
        } else {
            search.selected
        };
        self.render_item_list(frame, area, &title, &state.results, selected, palette);
    }

    fn draw_detail(&self, frame: &mut Frame, area: Rect, vm: &DetailViewModel, palette: &Palette) {
        let state = vm.state();
        let area = self.draw_error_banner(frame, area, state.error.as_deref(), palette);

        let Some(item) = &state.content_item else {
            if state.is_loading {
                self.draw_placeholder(frame, area, "Loading…", palette);
            }
            return;
        };

        let lines = vec![
            Line::from(Span::styled(item.title.clone(), palette.highlight())),
            Line::from(""),
            Line::from(item.description.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled("Category: ", Style::default().fg(palette.muted)),
                Span::raw(item.category.clone()),
            ]),
            Line::from(vec![
                Span::styled("Difficulty: ", Style::default().fg(palette.muted)),
                Span::raw(item.difficulty.label()),
            ]),
            Line::from(vec![
                Span::styled("Estimated time: ", Style::default().fg(palette.muted)),
                Span::raw(item.estimated_time.clone()),
            ]),
        ];
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Topic"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn draw_learning(
        &self,
        frame: &mut Frame,
        area: Rect,
        vm: &LearningViewModel,
        palette: &Palette,
    ) {
        let state = vm.state();
        let area = self.draw_error_banner(frame, area, state.error.as_deref(), palette);
        if state.total_steps == 0 {
            if state.is_loading {
                self.draw_placeholder(frame, area, "Preparing session…", palette);
            }
            return;
        }

        let topic = state
            .content_item
            .as_ref()
            .map(|item| item.title.clone())
            .unwrap_or_default();
        let progress = if state.is_completed {
            format!("{topic} · Step {} of {} · Completed", state.current_step, state.total_steps)
        } else {
            format!("{topic} · Step {} of {}", state.current_step, state.total_steps)
        };

        let mut lines = vec![
            Line::from(Span::styled(state.step_title.clone(), palette.highlight())),
            Line::from(""),
            Line::from(state.step_content.clone()),
        ];
        if let Some(code) = &state.code_example {
            lines.push(Line::from(""));
            for code_line in code.lines() {
                lines.push(Line::from(Span::styled(
                    format!("  {code_line}"),
                    Style::default().fg(palette.key),
                )));
            }
        }

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title(progress))
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn draw_settings(
        &self,
        frame: &mut Frame,
        area: Rect,
        vm: &SettingsViewModel,
        palette: &Palette,
    ) {
        let state = vm.state();
        let area = self.draw_error_banner(frame, area, state.error.as_deref(), palette);
        let toggle = |on: bool| if on { "[x]" } else { "[ ]" };

        let lines = vec![
            Line::from(vec![
                Span::styled("[d]", palette.key_hint()),
                Span::raw(format!(" {} Dark mode", toggle(state.dark_mode))),
            ]),
            Line::from(vec![
                Span::styled("[n]", palette.key_hint()),
                Span::raw(format!(
                    " {} Notifications",
                    toggle(state.notifications_enabled)
                )),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("[x]", palette.key_hint()),
                Span::raw(" Reset catalog to the starter topics"),
            ]),
        ];
        let paragraph =
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Preferences"));
        frame.render_widget(paragraph, area);
    }

    fn render_item_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        items: &[ContentItem],
        selected: usize,
        palette: &Palette,
    ) {
        let rows: Vec<ListItem> = items
            .iter()
            .map(|item| {
                ListItem::new(vec![
                    Line::from(Span::styled(
                        item.title.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        item.summary_line(),
                        Style::default().fg(palette.muted),
                    )),
                ])
            })
            .collect();

        let list = List::new(rows)
            .block(Block::default().borders(Borders::ALL).title(title.to_string()))
            .highlight_style(Style::default().fg(palette.accent))
            .highlight_symbol("▶ ");

        let mut list_state = ListState::default();
        if selected < items.len() {
            list_state.select(Some(selected));
        }
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            let color = match status.kind {
                StatusKind::Info => palette.info,
                StatusKind::Error => palette.error,
            };
            Line::from(vec![Span::styled(
                status.text.clone(),
                Style::default().fg(color),
            )])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions(palette);
        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self, palette: &Palette) -> Line<'static> {
        let key_style = palette.key_hint();
        let hints: &[(&str, &str)] = match (&self.screen, &self.mode) {
            (_, Mode::ConfirmDelete(_)) | (_, Mode::ConfirmReset) => {
                &[("[Y]", " Confirm   "), ("[N/Esc]", " Cancel")]
            }
            (Screen::Home(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[/]", " Search   "),
                ("[S]", " Settings   "),
                ("[R]", " Refresh   "),
                ("[-]", " Delete   "),
                ("[Q]", " Quit"),
            ],
            (Screen::Search(search), _) if search.editing => &[
                ("[Enter]", " Search   "),
                ("[Tab/↓]", " Results   "),
                ("[Esc]", " Clear/Back"),
            ],
            (Screen::Search(_), _) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[/]", " Edit query   "),
                ("[C]", " Clear   "),
                ("[Esc]", " Back"),
            ],
            (Screen::Detail(_), _) => &[
                ("[L/Enter]", " Start learning   "),
                ("[R]", " Reload   "),
                ("[Esc]", " Back"),
            ],
            (Screen::Learning(_), _) => &[
                ("[←]", " Previous   "),
                ("[→]", " Next   "),
                ("[C]", " Complete   "),
                ("[Esc]", " Back"),
            ],
            (Screen::Settings(_), _) => &[
                ("[D]", " Dark mode   "),
                ("[N]", " Notifications   "),
                ("[X]", " Reset catalog   "),
                ("[Esc]", " Back"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_confirm_delete(
        &self,
        frame: &mut Frame,
        area: Rect,
        confirm: &ConfirmDelete,
        palette: &Palette,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Confirm Removal")
            .borders(Borders::ALL)
            .style(palette.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(format!("Remove '{}' from the catalog?", confirm.title)),
            Line::from("A catalog reset in Settings brings the starter topics back."),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(palette.muted),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn draw_confirm_reset(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title("Reset Catalog")
            .borders(Borders::ALL)
            .style(palette.base());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from("Delete every topic and restore the starter catalog?"),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(palette.muted),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}
