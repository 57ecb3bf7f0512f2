use std::time::{Duration, Instant};

use anyhow::Result;
use panel_widgets::{QueryInput, Theme, highlighted_rows, render_tabs};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
	DefaultTerminal, Frame,
	layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
	style::{Color, Modifier, Style},
	text::{Line, Span, Text},
	widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::client::{Lookup, LookupStatus, SuggestionService};
use crate::filters::FilterCategory;
use crate::flow::{FetchTicket, FlowState, SearchFlow};
use crate::selection::FilterSelection;

const TICK: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
	Search,
	Selected,
}

/// Run the filter panel until `Esc` and return the final selection.
///
/// Fetches run on `runtime`; their results come back over a channel and are
/// applied on this thread.
pub fn run(
	service: SuggestionService,
	runtime: Handle,
	debounce: Duration,
	theme: Theme,
	context: impl Into<String>,
) -> Result<FilterSelection> {
	let mut app = App::new(debounce, theme, context);
	let mut terminal = ratatui::init();
	let result = app.event_loop(&mut terminal, &service, &runtime);
	ratatui::restore();
	result.map(|()| app.flow.selection().clone())
}

pub struct App<'a> {
	pub(crate) flow: SearchFlow,
	pub(crate) input: QueryInput<'a>,
	pub(crate) focus: Focus,
	pub(crate) suggestion_state: TableState,
	pub(crate) selected_state: TableState,
	pub(crate) lookup_status: LookupStatus,
	theme: Theme,
	context: String,
}

impl App<'_> {
	pub fn new(debounce: Duration, theme: Theme, context: impl Into<String>) -> Self {
		let mut input = QueryInput::default();
		input.set_placeholder("Press Tab to choose a category");
		Self {
			flow: SearchFlow::new(debounce),
			input,
			focus: Focus::Search,
			suggestion_state: TableState::default(),
			selected_state: TableState::default(),
			lookup_status: LookupStatus::default(),
			theme,
			context: context.into(),
		}
	}

	fn event_loop(
		&mut self,
		terminal: &mut DefaultTerminal,
		service: &SuggestionService,
		runtime: &Handle,
	) -> Result<()> {
		terminal.clear()?;
		let (tx, mut rx) = mpsc::unbounded_channel();
		let mut status = service.subscribe();

		loop {
			terminal.draw(|frame| self.draw(frame))?;

			let timeout = self
				.flow
				.next_deadline(Instant::now())
				.map_or(TICK, |remaining| remaining.min(TICK));
			if event::poll(timeout)? {
				match event::read()? {
					Event::Key(key) if key.kind == KeyEventKind::Press => {
						if self.handle_key(key, Instant::now()) {
							return Ok(());
						}
					}
					_ => {}
				}
			}

			if let Some(ticket) = self.flow.poll(Instant::now()) {
				spawn_fetch(runtime, service.clone(), ticket, tx.clone());
			}
			self.drain(&mut rx);
			if status.has_changed().unwrap_or(false) {
				self.lookup_status = status.borrow_and_update().clone();
			}
		}
	}

	fn drain(&mut self, rx: &mut UnboundedReceiver<(u64, Lookup)>) {
		while let Ok((generation, lookup)) = rx.try_recv() {
			self.resolve(generation, lookup);
		}
	}

	/// Apply a fetch result; stale generations are ignored.
	pub(crate) fn resolve(&mut self, generation: u64, lookup: Lookup) -> bool {
		let applied = self.flow.resolve(generation, lookup);
		if !applied {
			debug!(generation, "discarded stale suggestions");
			return false;
		}
		let first = (!self.flow.suggestions().is_empty()).then_some(0);
		self.suggestion_state.select(first);
		true
	}

	/// Returns `true` when the panel should close.
	pub(crate) fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
		if key.code == KeyCode::Esc {
			return true;
		}
		if key.code == KeyCode::F(2) {
			self.toggle_focus();
			return false;
		}
		match self.focus {
			Focus::Search => self.handle_search_key(key, now),
			Focus::Selected => self.handle_selected_key(key),
		}
		false
	}

	fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
		match key.code {
			KeyCode::Tab => {
				let next = self
					.flow
					.category()
					.map_or(FilterCategory::JobTitle, FilterCategory::next);
				self.select_category(next);
			}
			KeyCode::BackTab => {
				let previous = self
					.flow
					.category()
					.map_or(FilterCategory::Education, FilterCategory::previous);
				self.select_category(previous);
			}
			KeyCode::Up => step(&mut self.suggestion_state, self.flow.suggestions().len(), -1),
			KeyCode::Down => step(&mut self.suggestion_state, self.flow.suggestions().len(), 1),
			KeyCode::Enter => self.commit(true),
			KeyCode::Char('x') if key.modifiers.contains(KeyModifiers::CONTROL) => self.commit(false),
			_ => {
				if self.flow.category().is_none() {
					return;
				}
				if self.input.input(key) {
					self.flow.set_query(self.input.text(), now);
					if self.flow.state() == FlowState::CategorySelected {
						self.suggestion_state.select(None);
					}
				}
			}
		}
	}

	fn handle_selected_key(&mut self, key: KeyEvent) {
		let total = self.flow.selection().total_count();
		match key.code {
			KeyCode::Up => step(&mut self.selected_state, total, -1),
			KeyCode::Down => step(&mut self.selected_state, total, 1),
			KeyCode::Delete | KeyCode::Backspace => self.remove_highlighted(),
			_ => {}
		}
	}

	fn toggle_focus(&mut self) {
		self.focus = match self.focus {
			Focus::Search => {
				let first = (!self.flow.selection().is_empty()).then_some(0);
				self.selected_state.select(first);
				Focus::Selected
			}
			Focus::Selected => Focus::Search,
		};
	}

	fn select_category(&mut self, category: FilterCategory) {
		self.flow.select_category(category);
		self.input.clear();
		self.input.set_placeholder(category.placeholder());
		self.suggestion_state.select(None);
	}

	/// Commit the highlighted suggestion as include or exclude.
	fn commit(&mut self, include: bool) {
		let Some(index) = self.suggestion_state.selected() else {
			return;
		};
		let Some(suggestion) = self.flow.suggestions().get(index).cloned() else {
			return;
		};
		debug!(id = %suggestion.id, include, "filter committed");
		self.flow.add_filter(suggestion, include);
		self.input.clear();
		self.suggestion_state.select(None);
	}

	fn remove_highlighted(&mut self) {
		let Some(index) = self.selected_state.selected() else {
			return;
		};
		let Some((id, category)) = self
			.flow
			.selection()
			.iter()
			.nth(index)
			.map(|filter| (filter.id().to_string(), filter.category()))
		else {
			return;
		};
		self.flow.remove_filter(&id, category);
		let remaining = self.flow.selection().total_count();
		self.selected_state
			.select((remaining > 0).then(|| index.min(remaining - 1)));
	}

	fn draw(&mut self, frame: &mut Frame) {
		let area = frame.area().inner(Margin {
			vertical: 1,
			horizontal: 2,
		});

		let outer = Layout::default()
			.direction(Direction::Vertical)
			.constraints([
				Constraint::Length(2),
				Constraint::Length(1),
				Constraint::Length(3),
				Constraint::Length(1),
				Constraint::Min(5),
				Constraint::Length(1),
			])
			.split(area);

		self.render_header(frame, outer[0]);

		let titles: Vec<&str> = FilterCategory::ALL.iter().map(|c| c.label()).collect();
		let selected = self.flow.category().map(FilterCategory::index);
		render_tabs(&titles, selected, frame, outer[1], &self.theme);

		self.render_input(frame, outer[2]);

		if let Some(warning) = self.flow.warning() {
			let line = Paragraph::new(warning).style(self.theme.warning_style());
			frame.render_widget(line, outer[3]);
		}

		let body = Layout::default()
			.direction(Direction::Horizontal)
			.constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
			.split(outer[4]);
		self.render_suggestions(frame, body[0]);

		let side = Layout::default()
			.direction(Direction::Vertical)
			.constraints([Constraint::Min(3), Constraint::Length(8)])
			.split(body[1]);
		self.render_selected(frame, side[0]);
		self.render_results(frame, side[1]);

		render_footer(frame, outer[5]);
	}

	fn render_header(&self, frame: &mut Frame, area: Rect) {
		let header = Paragraph::new(Text::from(vec![
			Line::from(vec![
				Span::styled(
					"talent-scout",
					Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD),
				),
				Span::raw("  •  "),
				Span::styled(self.context.as_str(), Style::new().fg(Color::Gray)),
			]),
			Line::from(vec![
				Span::raw("Filters: "),
				Span::styled(
					self.flow.selection().total_count().to_string(),
					Style::new().fg(Color::Green),
				),
			]),
		]))
		.alignment(Alignment::Left);
		frame.render_widget(header, area);
	}

	/// Follows the service status, so it reads "searching" while the latest
	/// lookup is still running.
	pub(crate) fn input_title(&self) -> String {
		match (self.flow.category(), self.lookup_status.loading) {
			(Some(category), true) => format!(" {} · searching… ", category.label()),
			(Some(category), false) => format!(" {} ", category.label()),
			(None, _) => " Search ".to_string(),
		}
	}

	fn render_input(&self, frame: &mut Frame, area: Rect) {
		let title = self.input_title();
		let border = if self.focus == Focus::Search {
			self.theme.header_fg
		} else {
			self.theme.empty_fg
		};
		let block = Block::default()
			.borders(Borders::ALL)
			.border_type(BorderType::Rounded)
			.border_style(Style::new().fg(border))
			.title(title);
		self.input.render(frame, area, block, &self.theme);
	}

	fn render_suggestions(&mut self, frame: &mut Frame, area: Rect) {
		let block = Block::default()
			.borders(Borders::ALL)
			.border_type(BorderType::Rounded)
			.title(" Suggestions ");

		let message = match self.flow.state() {
			FlowState::Idle => Some("Choose a category to start searching"),
			FlowState::CategorySelected => Some("Type to search"),
			FlowState::Querying if self.flow.suggestions().is_empty() => Some("Searching…"),
			FlowState::NoSuggestions => Some("No suggestions found"),
			_ => None,
		};
		if let Some(message) = message {
			let empty = Paragraph::new(message)
				.style(self.theme.empty_style())
				.alignment(Alignment::Center)
				.block(block);
			frame.render_widget(empty, area);
			return;
		}

		let labels = self.flow.suggestions().iter().map(|s| s.name.as_str());
		let rows = highlighted_rows(labels, self.flow.query(), &self.theme);
		let table = Table::new(rows, [Constraint::Min(1)])
			.block(block)
			.row_highlight_style(self.theme.row_highlight_style())
			.highlight_symbol("▶ ");
		frame.render_stateful_widget(table, area, &mut self.suggestion_state);
	}

	fn render_selected(&mut self, frame: &mut Frame, area: Rect) {
		let border = if self.focus == Focus::Selected {
			self.theme.header_fg
		} else {
			self.theme.empty_fg
		};
		let block = Block::default()
			.borders(Borders::ALL)
			.border_type(BorderType::Rounded)
			.border_style(Style::new().fg(border))
			.title(" Selected filters ");

		let selection = self.flow.selection();
		if selection.is_empty() {
			let empty = Paragraph::new("Nothing selected yet")
				.style(self.theme.empty_style())
				.block(block);
			frame.render_widget(empty, area);
			return;
		}

		let rows: Vec<Row> = selection
			.iter()
			.map(|filter| {
				let marker = if filter.include { "+" } else { "-" };
				Row::new([
					Cell::from(filter.category().label()),
					Cell::from(format!("{marker} {}", filter.name()))
						.style(self.theme.decision_style(filter.include)),
				])
			})
			.collect();
		let table = Table::new(rows, [Constraint::Length(18), Constraint::Min(1)])
			.block(block)
			.column_spacing(1)
			.row_highlight_style(self.theme.row_highlight_style());
		frame.render_stateful_widget(table, area, &mut self.selected_state);
	}

	fn render_results(&self, frame: &mut Frame, area: Rect) {
		let block = Block::default()
			.borders(Borders::ALL)
			.border_type(BorderType::Rounded)
			.title(" Results ");
		let lines: Vec<Line> = results_summary(self.flow.selection())
			.into_iter()
			.map(Line::from)
			.collect();
		let results = Paragraph::new(Text::from(lines))
			.style(self.theme.empty_style())
			.wrap(Wrap { trim: true })
			.block(block);
		frame.render_widget(results, area);
	}
}

/// Lines of the results placeholder.
pub(crate) fn results_summary(selection: &FilterSelection) -> Vec<String> {
	if selection.is_empty() {
		return vec!["No filters applied".to_string()];
	}
	let total = selection.total_count();
	let noun = if total == 1 { "filter" } else { "filters" };
	let mut lines = vec![format!("{total} {noun} applied")];
	lines.extend(selection.summary().into_iter().map(|summary| {
		format!(
			"{}: {} included, {} excluded",
			summary.category.label(),
			summary.included,
			summary.excluded
		)
	}));
	lines
}

fn render_footer(frame: &mut Frame, area: Rect) {
	let key = |text: &'static str, color: Color| {
		Span::styled(text, Style::new().fg(color).add_modifier(Modifier::BOLD))
	};
	let footer = Paragraph::new(Line::from(vec![
		key("Enter", Color::Green),
		Span::raw(" include  •  "),
		key("Ctrl+X", Color::Red),
		Span::raw(" exclude  •  "),
		key("Tab", Color::Yellow),
		Span::raw(" category  •  "),
		key("F2", Color::Yellow),
		Span::raw(" selected  •  "),
		key("Esc", Color::Red),
		Span::raw(" done"),
	]))
	.style(Style::default().fg(Color::DarkGray));
	frame.render_widget(footer, area);
}

fn spawn_fetch(
	runtime: &Handle,
	service: SuggestionService,
	ticket: FetchTicket,
	tx: UnboundedSender<(u64, Lookup)>,
) {
	runtime.spawn(async move {
		let lookup = service.lookup(ticket.category, &ticket.query).await;
		// The receiver is gone once the panel has closed.
		let _ = tx.send((ticket.generation, lookup));
	});
}

/// Move a table cursor by `delta`, clamped to `len` rows.
fn step(state: &mut TableState, len: usize, delta: isize) {
	if len == 0 {
		state.select(None);
		return;
	}
	let next = match state.selected() {
		Some(current) => current.saturating_add_signed(delta).min(len - 1),
		None => 0,
	};
	state.select(Some(next));
}
