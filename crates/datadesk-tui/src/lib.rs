// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use datadesk_core::{
    AppCommand, AppEvent, AppMode, AppState, DomainKind, Environment, FilterState, Record,
    SelectionState, SortDirection, SortState, Summary, apply_filter, apply_sort, export_filename,
    to_csv,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;

const HALF_PAGE_ROWS: isize = 10;
const FULL_PAGE_ROWS: isize = 20;
const SORT_MARK_ASC: &str = "↑";
const SORT_MARK_DESC: &str = "↓";
const FILTER_MARK: &str = "▼";
const SELECT_MARK: &str = "x";

/// Outcome of pulling a domain's records from the backend. `flagged`
/// counts records that failed the backend's field checks; they are cached
/// anyway so the dashboard can show them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Changed { count: usize, flagged: usize },
    Unchanged { count: usize },
}

/// Everything the dashboard needs from the outside world. The CLI wires
/// this to the local store and the optional backend client; tests swap in
/// an in-memory fake.
pub trait AppRuntime {
    fn load_records(&mut self, environment: Environment, domain: DomainKind)
    -> Result<Vec<Record>>;
    fn refresh(&mut self, environment: Environment, domain: DomainKind) -> Result<RefreshOutcome>;
    fn activate_environment(&mut self, environment: Environment) -> Result<()>;
    fn write_export(&mut self, file_name: &str, contents: &str) -> Result<PathBuf>;
}

/// Per-domain view state. Thrown away when the user moves to another
/// domain tab, so every tab opens unfiltered and unsorted.
#[derive(Debug, Clone, PartialEq, Default)]
struct TableUiState {
    domain: Option<DomainKind>,
    selected_row: usize,
    selected_col: usize,
    filter: FilterState,
    sort: SortState,
    selection: SelectionState,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    records: Vec<Record>,
    table_state: TableUiState,
    help_visible: bool,
    status_token: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableCommand {
    MoveRow(isize),
    MoveColumn(isize),
    MoveHalfPageDown,
    MoveHalfPageUp,
    MoveFullPageDown,
    MoveFullPageUp,
    JumpFirstRow,
    JumpLastRow,
    JumpFirstColumn,
    JumpLastColumn,
    CycleSort,
    ClearSort,
    ToggleFieldFilter,
    ClearFilters,
    ToggleSelect,
    ToggleSelectAll,
    ClearSelection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableStatus {
    SortUnavailable,
    Sorted {
        column: &'static str,
        direction: SortDirection,
    },
    SortCleared,
    FilterUnavailable,
    FilterOn { column: &'static str, value: String },
    FilterOff(&'static str),
    FiltersCleared,
    SelectUnavailable,
    RowSelected(String),
    RowDeselected(String),
    AllSelected(usize),
    AllDeselected,
    SelectionCleared,
}

impl TableStatus {
    fn message(self) -> String {
        match self {
            Self::SortUnavailable => "sort unavailable".to_owned(),
            Self::Sorted { column, direction } => {
                format!("sort {column} {}", direction.label())
            }
            Self::SortCleared => "sort cleared".to_owned(),
            Self::FilterUnavailable => "filter unavailable".to_owned(),
            Self::FilterOn { column, value } => format!("filter {column} = {value}"),
            Self::FilterOff(column) => format!("filter {column} off"),
            Self::FiltersCleared => "filters cleared".to_owned(),
            Self::SelectUnavailable => "nothing to select".to_owned(),
            Self::RowSelected(id) => format!("selected {id}"),
            Self::RowDeselected(id) => format!("deselected {id}"),
            Self::AllSelected(count) => format!("{count} rows selected"),
            Self::AllDeselected => "visible rows deselected".to_owned(),
            Self::SelectionCleared => "selection cleared".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TableEvent {
    CursorUpdated,
    Status(TableStatus),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &mut view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &mut ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(4));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    touch_status(view_data, internal_tx);
}

fn touch_status(view_data: &mut ViewData, internal_tx: &Sender<InternalEvent>) {
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

/// Dispatches an app command and reacts to the events it produced: domain
/// and environment changes reload the table, status updates get a timed
/// clear scheduled.
fn dispatch_and_refresh<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: AppCommand,
) {
    let events = state.dispatch(command);
    let mut reload = false;
    let mut had_status = false;
    for event in events {
        match event {
            AppEvent::DomainChanged(_) => reload = true,
            AppEvent::EnvironmentChanged(environment) => {
                if let Err(error) = runtime.activate_environment(environment) {
                    emit_status(state, view_data, internal_tx, format!("switch failed: {error}"));
                }
                // Selections never carry across environments.
                view_data.table_state = TableUiState::default();
                reload = true;
            }
            AppEvent::StatusUpdated(_) => had_status = true,
            AppEvent::ModeChanged(_)
            | AppEvent::EnvironmentDenied(_)
            | AppEvent::StatusCleared => {}
        }
    }
    if reload
        && let Err(error) = refresh_view_data(state, runtime, view_data)
    {
        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
        return;
    }
    if had_status {
        touch_status(view_data, internal_tx);
    }
}

fn refresh_view_data<R: AppRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    if view_data.table_state.domain != Some(state.active_domain) {
        view_data.table_state = TableUiState::default();
        view_data.table_state.domain = Some(state.active_domain);
    }
    view_data.records = runtime.load_records(state.environment, state.active_domain)?;
    clamp_table_cursor(view_data);
    Ok(())
}

/// The rows the table shows: filter first, then sort. Both engines leave
/// `records` untouched, so the summary cards can keep counting the full
/// set.
fn visible_records(view_data: &ViewData) -> Vec<Record> {
    let filtered = apply_filter(&view_data.records, &view_data.table_state.filter);
    apply_sort(filtered, &view_data.table_state.sort)
}

fn visible_ids(view_data: &ViewData) -> Vec<String> {
    let Some(domain) = view_data.table_state.domain else {
        return Vec::new();
    };
    visible_records(view_data)
        .iter()
        .filter_map(|record| record.key(domain.key_field()))
        .collect()
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    if view_data.help_visible {
        if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
            view_data.help_visible = false;
            emit_status(state, view_data, internal_tx, "help hidden");
        }
        return false;
    }

    match state.mode {
        AppMode::Search => {
            handle_search_key(state, view_data, internal_tx, key);
            return false;
        }
        AppMode::ConfirmEnvironment => {
            handle_confirm_key(state, runtime, view_data, internal_tx, key);
            return false;
        }
        AppMode::Nav => {}
    }

    if handle_table_key(state, view_data, internal_tx, key) {
        return false;
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('f'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::NextDomain);
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) => {
            dispatch_and_refresh(state, runtime, view_data, internal_tx, AppCommand::PrevDomain);
        }
        (KeyCode::Char('/'), _) => {
            state.dispatch(AppCommand::EnterSearch);
        }
        (KeyCode::Char('o'), KeyModifiers::NONE) => {
            let target = match state.environment {
                Environment::Staging => Environment::Production,
                Environment::Production => Environment::Staging,
            };
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::RequestEnvironment(target),
            );
        }
        (KeyCode::Char('r'), KeyModifiers::NONE) => {
            refresh_from_backend(state, runtime, view_data, internal_tx);
        }
        (KeyCode::Char('e'), KeyModifiers::NONE) => {
            export_rows(state, runtime, view_data, internal_tx, ExportScope::Visible);
        }
        (KeyCode::Char('E'), _) => {
            export_rows(state, runtime, view_data, internal_tx, ExportScope::Selected);
        }
        (KeyCode::Char('?'), KeyModifiers::NONE) => {
            view_data.help_visible = true;
            emit_status(state, view_data, internal_tx, "help open");
        }
        _ => {}
    }
    false
}

fn handle_search_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            state.dispatch(AppCommand::ExitToNav);
            let visible = visible_records(view_data).len();
            emit_status(state, view_data, internal_tx, format!("{visible} rows match"));
        }
        KeyCode::Backspace => {
            view_data.table_state.filter.search_text.pop();
            clamp_table_cursor(view_data);
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.table_state.filter.search_text.clear();
            clamp_table_cursor(view_data);
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.table_state.filter.search_text.push(c);
            clamp_table_cursor(view_data);
        }
        _ => {}
    }
}

fn handle_confirm_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::ConfirmEnvironment,
            );
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            dispatch_and_refresh(
                state,
                runtime,
                view_data,
                internal_tx,
                AppCommand::CancelEnvironment,
            );
        }
        _ => {}
    }
}

fn refresh_from_backend<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    match runtime.refresh(state.environment, state.active_domain) {
        Ok(RefreshOutcome::Changed { count, flagged }) => {
            if let Err(error) = refresh_view_data(state, runtime, view_data) {
                emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
                return;
            }
            let message = if flagged > 0 {
                format!("refreshed: {count} records, {flagged} flagged")
            } else {
                format!("refreshed: {count} records")
            };
            emit_status(state, view_data, internal_tx, message);
        }
        Ok(RefreshOutcome::Unchanged { .. }) => {
            emit_status(state, view_data, internal_tx, "already up to date");
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("refresh failed: {error}"));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExportScope {
    Visible,
    Selected,
}

fn export_rows<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    scope: ExportScope,
) {
    let domain = state.active_domain;
    let rows = match scope {
        ExportScope::Visible => visible_records(view_data),
        ExportScope::Selected => {
            if !view_data.table_state.selection.bulk_actions_enabled() {
                emit_status(state, view_data, internal_tx, "select rows first");
                return;
            }
            // Selected rows export in dataset order, filter or not.
            view_data
                .records
                .iter()
                .filter(|record| {
                    record
                        .key(domain.key_field())
                        .is_some_and(|id| view_data.table_state.selection.is_selected(&id))
                })
                .cloned()
                .collect()
        }
    };
    if rows.is_empty() {
        emit_status(state, view_data, internal_tx, "nothing to export");
        return;
    }

    let contents = to_csv(domain.columns(), &rows);
    let file_name = export_filename(domain, OffsetDateTime::now_utc().date());
    match runtime.write_export(&file_name, &contents) {
        Ok(path) => {
            let count = rows.len();
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("exported {count} rows to {}", path.display()),
            );
        }
        Err(error) => {
            emit_status(state, view_data, internal_tx, format!("export failed: {error}"));
        }
    }
}

fn handle_table_key(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if state.mode != AppMode::Nav || view_data.help_visible {
        return false;
    }

    let Some(command) = table_command_for_key(key) else {
        return false;
    };

    let event = apply_table_command(view_data, command);
    if let TableEvent::Status(status) = event {
        emit_status(state, view_data, internal_tx, status.message());
    }
    true
}

fn table_command_for_key(key: KeyEvent) -> Option<TableCommand> {
    match (key.code, key.modifiers) {
        (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(TableCommand::MoveRow(1)),
        (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(TableCommand::MoveRow(-1)),
        (KeyCode::Char('h'), _) | (KeyCode::Left, _) => Some(TableCommand::MoveColumn(-1)),
        (KeyCode::Char('l'), _) | (KeyCode::Right, _) => Some(TableCommand::MoveColumn(1)),
        (KeyCode::Char('d'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TableCommand::MoveHalfPageDown)
        }
        (KeyCode::Char('u'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TableCommand::MoveHalfPageUp)
        }
        (KeyCode::PageDown, _) => Some(TableCommand::MoveFullPageDown),
        (KeyCode::PageUp, _) => Some(TableCommand::MoveFullPageUp),
        (KeyCode::Char('g'), _) => Some(TableCommand::JumpFirstRow),
        (KeyCode::Char('G'), _) => Some(TableCommand::JumpLastRow),
        (KeyCode::Char('^'), _) => Some(TableCommand::JumpFirstColumn),
        (KeyCode::Char('$'), _) => Some(TableCommand::JumpLastColumn),
        (KeyCode::Char('s'), KeyModifiers::NONE) => Some(TableCommand::CycleSort),
        (KeyCode::Char('S'), _) => Some(TableCommand::ClearSort),
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Some(TableCommand::ClearFilters),
        (KeyCode::Char('n'), KeyModifiers::NONE) => Some(TableCommand::ToggleFieldFilter),
        (KeyCode::Char(' '), _) => Some(TableCommand::ToggleSelect),
        (KeyCode::Char('a'), KeyModifiers::NONE) => Some(TableCommand::ToggleSelectAll),
        (KeyCode::Char('A'), _) => Some(TableCommand::ClearSelection),
        _ => None,
    }
}

fn apply_table_command(view_data: &mut ViewData, command: TableCommand) -> TableEvent {
    match command {
        TableCommand::MoveRow(delta) => {
            move_row(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveColumn(delta) => {
            move_col(view_data, delta);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveHalfPageDown => {
            move_row(view_data, HALF_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveHalfPageUp => {
            move_row(view_data, -HALF_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveFullPageDown => {
            move_row(view_data, FULL_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::MoveFullPageUp => {
            move_row(view_data, -FULL_PAGE_ROWS);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstRow => {
            view_data.table_state.selected_row = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastRow => {
            view_data.table_state.selected_row =
                visible_records(view_data).len().saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::JumpFirstColumn => {
            view_data.table_state.selected_col = 0;
            TableEvent::CursorUpdated
        }
        TableCommand::JumpLastColumn => {
            view_data.table_state.selected_col = active_columns(view_data)
                .len()
                .saturating_sub(1);
            TableEvent::CursorUpdated
        }
        TableCommand::CycleSort => TableEvent::Status(cycle_sort(view_data)),
        TableCommand::ClearSort => {
            view_data.table_state.sort = SortState::default();
            clamp_table_cursor(view_data);
            TableEvent::Status(TableStatus::SortCleared)
        }
        TableCommand::ToggleFieldFilter => TableEvent::Status(toggle_field_filter(view_data)),
        TableCommand::ClearFilters => {
            view_data.table_state.filter.clear();
            clamp_table_cursor(view_data);
            TableEvent::Status(TableStatus::FiltersCleared)
        }
        TableCommand::ToggleSelect => TableEvent::Status(toggle_select(view_data)),
        TableCommand::ToggleSelectAll => TableEvent::Status(toggle_select_all(view_data)),
        TableCommand::ClearSelection => {
            view_data.table_state.selection.clear();
            TableEvent::Status(TableStatus::SelectionCleared)
        }
    }
}

fn active_columns(view_data: &ViewData) -> &'static [&'static str] {
    view_data
        .table_state
        .domain
        .map(DomainKind::columns)
        .unwrap_or(&[])
}

fn selected_column(view_data: &ViewData) -> Option<&'static str> {
    active_columns(view_data)
        .get(view_data.table_state.selected_col)
        .copied()
}

fn selected_record(view_data: &ViewData) -> Option<Record> {
    visible_records(view_data)
        .get(view_data.table_state.selected_row)
        .cloned()
}

fn move_row(view_data: &mut ViewData, delta: isize) {
    let rows = visible_records(view_data).len();
    if rows == 0 {
        view_data.table_state.selected_row = 0;
        return;
    }
    let current = view_data.table_state.selected_row as isize;
    let next = (current + delta).clamp(0, rows as isize - 1);
    view_data.table_state.selected_row = next as usize;
}

fn move_col(view_data: &mut ViewData, delta: isize) {
    let columns = active_columns(view_data).len();
    if columns == 0 {
        view_data.table_state.selected_col = 0;
        return;
    }
    let current = view_data.table_state.selected_col as isize;
    let next = (current + delta).clamp(0, columns as isize - 1);
    view_data.table_state.selected_col = next as usize;
}

fn cycle_sort(view_data: &mut ViewData) -> TableStatus {
    let Some(column) = selected_column(view_data) else {
        return TableStatus::SortUnavailable;
    };
    let direction = view_data.table_state.sort.cycle(column);
    clamp_table_cursor(view_data);
    match direction {
        Some(direction) => TableStatus::Sorted { column, direction },
        None => TableStatus::SortCleared,
    }
}

/// Pins the selected cell's value as an exact filter on its column, or
/// lifts the filter if the same value is already pinned. Null cells have
/// nothing to pin.
fn toggle_field_filter(view_data: &mut ViewData) -> TableStatus {
    let Some(column) = selected_column(view_data) else {
        return TableStatus::FilterUnavailable;
    };
    let Some(record) = selected_record(view_data) else {
        return TableStatus::FilterUnavailable;
    };
    let value = record.display(column);
    if value.is_empty() {
        return TableStatus::FilterUnavailable;
    }

    if view_data.table_state.filter.field_filter(column) == Some(value.as_str()) {
        view_data.table_state.filter.set_field_filter(column, "all");
        clamp_table_cursor(view_data);
        return TableStatus::FilterOff(column);
    }

    view_data.table_state.filter.set_field_filter(column, &value);
    clamp_table_cursor(view_data);
    TableStatus::FilterOn { column, value }
}

fn toggle_select(view_data: &mut ViewData) -> TableStatus {
    let Some(domain) = view_data.table_state.domain else {
        return TableStatus::SelectUnavailable;
    };
    let Some(id) = selected_record(view_data).and_then(|record| record.key(domain.key_field()))
    else {
        return TableStatus::SelectUnavailable;
    };

    view_data.table_state.selection.toggle(&id);
    if view_data.table_state.selection.is_selected(&id) {
        TableStatus::RowSelected(id)
    } else {
        TableStatus::RowDeselected(id)
    }
}

fn toggle_select_all(view_data: &mut ViewData) -> TableStatus {
    let ids = visible_ids(view_data);
    if ids.is_empty() {
        return TableStatus::SelectUnavailable;
    }

    view_data.table_state.selection.toggle_all(&ids);
    let now_selected = view_data.table_state.selection.visible_selected_count(&ids);
    if now_selected == ids.len() {
        TableStatus::AllSelected(now_selected)
    } else {
        TableStatus::AllDeselected
    }
}

fn clamp_table_cursor(view_data: &mut ViewData) {
    let rows = visible_records(view_data).len();
    view_data.table_state.selected_row = view_data
        .table_state
        .selected_row
        .min(rows.saturating_sub(1));
    let columns = active_columns(view_data).len();
    view_data.table_state.selected_col = view_data
        .table_state
        .selected_col
        .min(columns.saturating_sub(1));
}

fn tab_title(domain: DomainKind, state: &AppState, table_state: &TableUiState) -> String {
    if state.active_domain == domain && !table_state.filter.is_empty() {
        format!(" {} {FILTER_MARK} ", domain.label())
    } else {
        format!(" {} ", domain.label())
    }
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = DomainKind::ALL
        .iter()
        .position(|domain| *domain == state.active_domain)
        .unwrap_or(0);
    let tab_titles = DomainKind::ALL
        .iter()
        .map(|domain| tab_title(*domain, state, &view_data.table_state))
        .collect::<Vec<String>>();

    let tabs = Tabs::new(tab_titles)
        .block(Block::default().title("datadesk").borders(Borders::ALL))
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    let overview = Paragraph::new(summary_text(state, view_data))
        .block(Block::default().title("overview").borders(Borders::ALL));
    frame.render_widget(overview, layout[1]);

    render_table(frame, layout[2], state, view_data);

    let status_widget = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status_widget, layout[3]);

    if state.mode == AppMode::ConfirmEnvironment {
        let area = centered_rect(48, 24, frame.area());
        frame.render_widget(Clear, area);
        let confirm = Paragraph::new(confirm_overlay_text(state)).block(
            Block::default()
                .title("environment")
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(confirm, area);
    }

    if view_data.help_visible {
        let area = centered_rect(80, 72, frame.area());
        frame.render_widget(Clear, area);
        let help = Paragraph::new(help_overlay_text())
            .block(Block::default().title("help").borders(Borders::ALL));
        frame.render_widget(help, area);
    }
}

/// Stat-card line above the table. Status counts come from the full
/// dataset, not the filtered view, so typing a search never makes the
/// cards jump around.
fn summary_text(state: &AppState, view_data: &ViewData) -> String {
    let domain = state.active_domain;
    let visible = visible_records(view_data);
    let summary = Summary::compute(&view_data.records, &visible, domain.status_field());

    let counts = summary
        .by_status
        .iter()
        .map(|(status, count)| format!("{status} {count}"))
        .collect::<Vec<String>>()
        .join(", ");
    let selected = view_data.table_state.selection.selected_count();

    let mut line = format!(
        "{} ({}) | {}: {} of {}",
        state.environment.label(),
        state.role.as_str(),
        domain.label(),
        summary.visible,
        summary.total,
    );
    if !counts.is_empty() {
        line.push_str(" | ");
        line.push_str(&counts);
    }
    if selected > 0 {
        line.push_str(&format!(" | selected {selected}"));
    }
    line
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let domain = state.active_domain;
    let columns = domain.columns();
    let rows_data = visible_records(view_data);

    let mut widths = vec![Constraint::Length(3)];
    widths.extend(std::iter::repeat_n(Constraint::Min(8), columns.len()));

    let mut header_cells = vec![Cell::from(" ")];
    header_cells.extend(columns.iter().map(|column| {
        Cell::from(header_label_for_column(&view_data.table_state, column)).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let header = Row::new(header_cells);

    let rows = rows_data.iter().enumerate().map(|(row_index, record)| {
        let selected_row = row_index == view_data.table_state.selected_row;
        let checked = record
            .key(domain.key_field())
            .is_some_and(|id| view_data.table_state.selection.is_selected(&id));

        let marker = if checked { SELECT_MARK } else { " " };
        let mut cells = vec![
            Cell::from(marker).style(if checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            }),
        ];
        cells.extend(columns.iter().enumerate().map(|(column_index, column)| {
            let mut style = Style::default();
            if selected_row {
                style = style.bg(Color::DarkGray);
            }
            if selected_row && column_index == view_data.table_state.selected_col {
                style = Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD);
            }
            Cell::from(record.display(column)).style(style)
        }));
        Row::new(cells)
    });

    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state, view_data, rows_data.len()))
                .borders(Borders::ALL),
        );
    frame.render_widget(table, area);
}

fn header_label_for_column(table_state: &TableUiState, column: &'static str) -> String {
    let mut label = column.to_owned();
    if table_state.sort.column() == Some(column) {
        let mark = match table_state.sort.direction() {
            Some(SortDirection::Asc) => SORT_MARK_ASC,
            Some(SortDirection::Desc) | None => SORT_MARK_DESC,
        };
        label.push(' ');
        label.push_str(mark);
    }
    if table_state.filter.field_filter(column).is_some() {
        label.push(' ');
        label.push_str(FILTER_MARK);
    }
    label
}

fn table_title(state: &AppState, view_data: &ViewData, visible: usize) -> String {
    let mut title = format!(
        " {} [{visible}/{}] ",
        state.active_domain.title(),
        view_data.records.len(),
    );
    if !view_data.table_state.filter.search_text.is_empty() {
        title.push_str(&format!(
            "search: {} ",
            view_data.table_state.filter.search_text
        ));
    }
    title
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    if view_data.help_visible {
        return String::new();
    }

    let mode = match state.mode {
        AppMode::Nav => "NAV",
        AppMode::Search => "SEARCH",
        AppMode::ConfirmEnvironment => "CONFIRM",
    };

    if state.mode == AppMode::Search {
        return format!(
            "{mode} | search: {}_ | enter/esc done, ctrl+u clear",
            view_data.table_state.filter.search_text
        );
    }

    let default = "j/k/h/l g/G ^/$ d/u | s/S sort | n ctrl+n filter | / search | \
                   space/a/A select | e/E export | r refresh | o env | f/b domain | ? | ctrl+q";
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {default}"),
        None => format!("{mode} | {default}"),
    }
}

fn confirm_overlay_text(state: &AppState) -> String {
    let target = state
        .pending_environment
        .map(Environment::label)
        .unwrap_or("?");
    let mut text = format!("switch to {target}?\n\ny/enter confirm, n/esc cancel");
    if state.pending_environment == Some(Environment::Production) {
        text.push_str("\n\nproduction data is live");
    }
    text
}

fn help_overlay_text() -> String {
    [
        "navigation",
        "  j/k or arrows    move row",
        "  h/l or arrows    move column",
        "  ctrl+d/ctrl+u    half page down/up",
        "  pgdn/pgup        full page down/up",
        "  g / G            first / last row",
        "  ^ / $            first / last column",
        "  f / b            next / previous domain",
        "",
        "view",
        "  s                cycle sort on column (asc, desc, off)",
        "  S                clear sort",
        "  n                filter on the selected cell's value",
        "  ctrl+n           clear search and filters",
        "  /                search across all fields",
        "",
        "selection",
        "  space            toggle row",
        "  a                toggle all visible rows",
        "  A                clear selection",
        "",
        "actions",
        "  e                export visible rows to CSV",
        "  E                export selected rows to CSV",
        "  r                refresh from the backend",
        "  o                switch environment",
        "",
        "  ?                close help",
        "  ctrl+q           quit",
    ]
    .join("\n")
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
