//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use grocer_core::{
  month::{MonthSelection, Navigation},
  record::{Draft, Field},
  report::MonthlyReport,
  store::{GroceryStore, ItemStore},
};

// ─── Mode ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Month navigation and table scrolling.
  Normal,
  /// Keystrokes go into the add-item form.
  Editing,
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<S> {
  pub mode: Mode,

  /// The persisted purchase list.
  pub items: ItemStore<S>,

  /// Contents of the add-item form.
  pub draft: Draft,

  /// Form field receiving keystrokes while editing.
  pub focus: Field,

  /// Month shown in the listing, totals and charts.
  pub period: MonthSelection,

  pub navigation: Navigation,

  /// First visible row of the listing.
  pub table_scroll: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl<S: GroceryStore> App<S> {
  pub fn new(items: ItemStore<S>, period: MonthSelection, navigation: Navigation) -> Self {
    Self {
      mode: Mode::Normal,
      items,
      draft: Draft::new(),
      focus: Field::Name,
      period,
      navigation,
      table_scroll: 0,
      status_msg: String::new(),
    }
  }

  /// Derive everything the screen shows from the current state.
  pub fn report(&self) -> MonthlyReport { MonthlyReport::build(self.items.records(), self.period) }

  // ── Actions ───────────────────────────────────────────────────────────────

  /// Commit the form as a new purchase and clear it on success.
  pub async fn add_item(&mut self) {
    match self.items.append(&self.draft).await {
      Ok(record) => {
        self.draft.reset();
        self.focus = Field::Name;
        self.status_msg = format!("Added {}", record.name);
      }
      Err(e) => {
        tracing::warn!(error = %e, "add item refused");
        self.status_msg = format!("Error: {e}");
      }
    }
  }

  /// Move the selected month by `delta`.
  pub fn advance_month(&mut self, delta: i32) {
    self.period = self.period.advance(delta, self.navigation);
    self.table_scroll = 0;
    self.status_msg.clear();
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> bool {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return false;
    }

    match self.mode {
      Mode::Normal => self.handle_normal_key(key),
      Mode::Editing => {
        self.handle_edit_key(key).await;
        true
      }
    }
  }

  fn handle_normal_key(&mut self, key: KeyEvent) -> bool {
    match key.code {
      KeyCode::Char('q') => return false,

      KeyCode::Char('a') | KeyCode::Char('i') => {
        self.mode = Mode::Editing;
        self.status_msg.clear();
      }

      KeyCode::Left | KeyCode::Char('h') => self.advance_month(-1),
      KeyCode::Right | KeyCode::Char('l') => self.advance_month(1),

      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.report().rows.len();
        if self.table_scroll + 1 < len {
          self.table_scroll += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.table_scroll = self.table_scroll.saturating_sub(1);
      }

      _ => {}
    }
    true
  }

  async fn handle_edit_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.mode = Mode::Normal,
      KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
      KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
      KeyCode::Enter => self.add_item().await,
      KeyCode::Backspace => {
        self.draft.field_mut(self.focus).pop();
      }
      KeyCode::Char(c) => self.draft.field_mut(self.focus).push(c),
      _ => {}
    }
  }
}

#[cfg(test)]
mod tests {
  use grocer_core::memory::MemoryStore;
  use rust_decimal::Decimal;

  use super::*;

  async fn app() -> App<MemoryStore> {
    let items = ItemStore::open(MemoryStore::new()).await.unwrap();
    App::new(items, MonthSelection::current(), Navigation::Wrap)
  }

  fn key(code: KeyCode) -> KeyEvent { KeyEvent::new(code, KeyModifiers::NONE) }

  async fn type_str(app: &mut App<MemoryStore>, s: &str) {
    for c in s.chars() {
      app.handle_key(key(KeyCode::Char(c))).await;
    }
  }

  #[tokio::test]
  async fn typing_fills_the_focused_field() {
    let mut app = app().await;
    app.handle_key(key(KeyCode::Char('a'))).await;
    assert_eq!(app.mode, Mode::Editing);

    type_str(&mut app, "Milk").await;
    app.handle_key(key(KeyCode::Tab)).await;
    type_str(&mut app, "3.5").await;
    app.handle_key(key(KeyCode::Backspace)).await;
    type_str(&mut app, "50").await;

    assert_eq!(app.draft.name, "Milk");
    assert_eq!(app.draft.price, "3.50");
    assert_eq!(app.focus, Field::Price);
  }

  #[tokio::test]
  async fn enter_adds_and_resets_the_form() {
    let mut app = app().await;
    app.handle_key(key(KeyCode::Char('a'))).await;
    app.draft.set_field(Field::Name, "Milk");
    app.draft.set_field(Field::Price, "3.50");
    app.draft.set_field(Field::Quantity, "2");
    app.draft.set_field(Field::Store, "A");
    app.focus = Field::Store;

    app.handle_key(key(KeyCode::Enter)).await;

    assert_eq!(app.items.len(), 1);
    assert_eq!(app.draft, Draft::default());
    assert_eq!(app.focus, Field::Name);
    assert_eq!(app.report().total_expense, Decimal::new(700, 2));
  }

  #[tokio::test]
  async fn missing_price_is_shown_and_keeps_the_draft() {
    let mut app = app().await;
    app.mode = Mode::Editing;
    app.draft.set_field(Field::Name, "Milk");

    app.handle_key(key(KeyCode::Enter)).await;

    assert!(app.items.is_empty());
    assert_eq!(app.draft.name, "Milk");
    assert!(app.status_msg.contains("price is required"), "{}", app.status_msg);
  }

  #[tokio::test]
  async fn q_types_into_the_form_but_quits_in_normal_mode() {
    let mut app = app().await;
    app.mode = Mode::Editing;
    assert!(app.handle_key(key(KeyCode::Char('q'))).await);
    assert_eq!(app.draft.name, "q");

    app.handle_key(key(KeyCode::Esc)).await;
    assert!(!app.handle_key(key(KeyCode::Char('q'))).await);
  }

  #[tokio::test]
  async fn ctrl_c_quits_while_editing() {
    let mut app = app().await;
    app.mode = Mode::Editing;
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert!(!app.handle_key(ctrl_c).await);
  }

  #[tokio::test]
  async fn arrows_move_the_month() {
    let mut app = app().await;
    app.period = MonthSelection::new(0, 2024).unwrap();

    app.handle_key(key(KeyCode::Left)).await;
    assert_eq!((app.period.month(), app.period.year()), (11, 2024));

    app.handle_key(key(KeyCode::Right)).await;
    app.handle_key(key(KeyCode::Char('l'))).await;
    assert_eq!((app.period.month(), app.period.year()), (1, 2024));
  }

  #[tokio::test]
  async fn rollover_setting_changes_the_year() {
    let mut app = app().await;
    app.navigation = Navigation::Rollover;
    app.period = MonthSelection::new(0, 2024).unwrap();
    app.handle_key(key(KeyCode::Left)).await;
    assert_eq!((app.period.month(), app.period.year()), (11, 2023));
  }
}
