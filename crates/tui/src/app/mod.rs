use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyEvent};

use api_types::expense::{Expense as ExpenseView, ExpenseNew};
use engine::{Expense, mascot, stats};

use crate::{
    client::{Client, ClientError},
    config::AppConfig,
    error::Result,
    ui,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Add,
    ConfirmDelete,
}

/// Which input the quick-add form currently feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Amount,
    Date,
    Category,
}

impl FormField {
    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "項目",
            Self::Amount => "金額",
            Self::Date => "日期",
            Self::Category => "分類",
        }
    }
}

/// Quick-add form buffers.
#[derive(Debug, Default)]
pub struct FormState {
    pub title: String,
    pub amount: String,
    pub date: String,
    pub category: String,
    pub focus: FormField,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct AppState {
    /// Wholesale-cached copy of the store. Replaced at refresh points,
    /// never patched in place; everything shown on screen derives from it.
    pub expenses: Vec<Expense>,
    /// Month keys present in the cache, newest first.
    pub months: Vec<String>,
    pub month_filter: String,
    pub category_filter: String,
    pub selected: usize,
    pub mode: Mode,
    pub form: FormState,
    pub mascot: Option<String>,
    pub status: Option<String>,
    pub base_url: String,
}

impl AppState {
    /// Records matching the active filters, in list order.
    pub fn visible(&self) -> Vec<&Expense> {
        stats::filtered_expenses(&self.expenses, &self.month_filter, &self.category_filter)
    }

    /// Categories present in the cache, first-seen order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for expense in &self.expenses {
            if !categories.contains(&expense.category) {
                categories.push(expense.category.clone());
            }
        }
        categories
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        if len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(len - 1);
        }
    }
}

pub struct App {
    client: Client,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = Client::new(&config.base_url)?;
        let state = AppState {
            expenses: Vec::new(),
            months: Vec::new(),
            month_filter: stats::ALL.to_string(),
            category_filter: stats::ALL.to_string(),
            selected: 0,
            mode: Mode::Browse,
            form: FormState::default(),
            mascot: None,
            status: None,
            base_url: config.base_url,
        };

        Ok(Self {
            client,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.refresh(true).await;

        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(200);

        while !self.should_quit {
            terminal.draw(|frame| ui::render(frame, &self.state))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key(key).await?,
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            }
        }

        Ok(())
    }

    async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match ui::keymap::map_key(key) {
            ui::keymap::AppAction::ForceQuit => {
                self.should_quit = true;
            }
            ui::keymap::AppAction::Cancel => {
                if self.state.mode != Mode::Browse {
                    self.state.mode = Mode::Browse;
                    self.state.form = FormState::default();
                }
            }
            ui::keymap::AppAction::NextField => {
                if self.state.mode == Mode::Add {
                    self.advance_focus();
                }
            }
            ui::keymap::AppAction::Submit => {
                if self.state.mode == Mode::Add {
                    self.submit_form().await?;
                }
            }
            ui::keymap::AppAction::Backspace => {
                if self.state.mode == Mode::Add {
                    self.active_field_mut().pop();
                }
            }
            ui::keymap::AppAction::Up => {
                if self.state.mode == Mode::Browse {
                    self.state.selected = self.state.selected.saturating_sub(1);
                }
            }
            ui::keymap::AppAction::Down => {
                if self.state.mode == Mode::Browse {
                    self.state.selected += 1;
                    self.state.clamp_selection();
                }
            }
            ui::keymap::AppAction::Input(ch) => match self.state.mode {
                Mode::Browse => self.handle_browse_key(ch).await?,
                Mode::Add => self.active_field_mut().push(ch),
                Mode::ConfirmDelete => match ch {
                    'y' | 'Y' => self.delete_selected().await?,
                    'n' | 'N' => self.state.mode = Mode::Browse,
                    _ => {}
                },
            },
            ui::keymap::AppAction::None => {}
        }

        Ok(())
    }

    async fn handle_browse_key(&mut self, ch: char) -> Result<()> {
        match ch {
            'q' | 'Q' => self.should_quit = true,
            'r' | 'R' => self.refresh(false).await,
            'a' | 'A' => self.open_form(),
            'm' | 'M' => self.cycle_month_filter(),
            'c' | 'C' => self.cycle_category_filter(),
            'j' | 'J' => {
                self.state.selected += 1;
                self.state.clamp_selection();
            }
            'k' | 'K' => self.state.selected = self.state.selected.saturating_sub(1),
            'd' | 'D' => {
                if !self.state.visible().is_empty() {
                    self.state.mode = Mode::ConfirmDelete;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn open_form(&mut self) {
        self.state.form = FormState {
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            category: "food".to_string(),
            ..FormState::default()
        };
        self.state.mode = Mode::Add;
    }

    fn advance_focus(&mut self) {
        self.state.form.focus = match self.state.form.focus {
            FormField::Title => FormField::Amount,
            FormField::Amount => FormField::Date,
            FormField::Date => FormField::Category,
            FormField::Category => FormField::Title,
        };
    }

    fn active_field_mut(&mut self) -> &mut String {
        match self.state.form.focus {
            FormField::Title => &mut self.state.form.title,
            FormField::Amount => &mut self.state.form.amount,
            FormField::Date => &mut self.state.form.date,
            FormField::Category => &mut self.state.form.category,
        }
    }

    fn cycle_month_filter(&mut self) {
        self.state.month_filter =
            next_option(&self.state.months, &self.state.month_filter);
        self.state.clamp_selection();
    }

    fn cycle_category_filter(&mut self) {
        let categories = self.state.categories();
        self.state.category_filter = next_option(&categories, &self.state.category_filter);
        self.state.clamp_selection();
    }

    async fn submit_form(&mut self) -> Result<()> {
        let title = self.state.form.title.trim().to_string();
        let date = self.state.form.date.trim().to_string();
        let category = self.state.form.category.trim().to_string();
        let amount: i64 = self.state.form.amount.trim().parse().unwrap_or(0);

        if title.is_empty() || date.is_empty() || category.is_empty() || amount <= 0 {
            self.state.form.message =
                Some("請確認項目名稱、日期與金額都已填寫。".to_string());
            return Ok(());
        }

        let payload = ExpenseNew {
            title: Some(title),
            amount: Some(amount),
            date: Some(date),
            category: Some(category.clone()),
            created_at: Some(Local::now().timestamp_millis()),
        };

        match self.client.expense_create(&payload).await {
            Ok(_) => {
                let mut source = mascot::SystemRandom;
                self.state.mascot = Some(mascot::message_for(&category, amount, &mut source));
                self.state.mode = Mode::Browse;
                self.state.form = FormState::default();
                self.refresh(false).await;
            }
            Err(err) => {
                self.state.form.message =
                    Some(alert_for_error(err, "新增時發生錯誤，請稍後再試。"));
            }
        }

        Ok(())
    }

    async fn delete_selected(&mut self) -> Result<()> {
        let id = self
            .state
            .visible()
            .get(self.state.selected)
            .map(|expense| expense.id);

        self.state.mode = Mode::Browse;
        let Some(id) = id else {
            return Ok(());
        };

        match self.client.expense_delete(id).await {
            Ok(_) => self.refresh(false).await,
            Err(err) => {
                self.state.status =
                    Some(alert_for_error(err, "刪除時發生錯誤，請稍後再試。"));
            }
        }

        Ok(())
    }

    /// Replaces the cached list wholesale and recomputes the derived state.
    ///
    /// With `reset`, the month filter snaps to the newest month present
    /// (the default selection); otherwise a still-valid selection is kept.
    async fn refresh(&mut self, reset: bool) {
        match self.client.expenses_list().await {
            Ok(listed) => {
                self.state.expenses = listed.into_iter().map(to_domain).collect();
                self.state.months = stats::distinct_months(&self.state.expenses);

                let keep = !reset
                    && (self.state.month_filter == stats::ALL
                        || self.state.months.contains(&self.state.month_filter));
                if !keep {
                    self.state.month_filter = self
                        .state
                        .months
                        .first()
                        .cloned()
                        .unwrap_or_else(|| stats::ALL.to_string());
                }

                self.state.clamp_selection();
                self.state.status = None;
            }
            Err(err) => {
                self.state.status = Some(alert_for_error(
                    err,
                    "載入資料時發生錯誤，請確認後端伺服器是否啟動。",
                ));
            }
        }
    }
}

fn to_domain(view: ExpenseView) -> Expense {
    Expense {
        id: view.id,
        title: view.title,
        amount: view.amount,
        date: view.date,
        category: view.category,
        created_at: view.created_at,
    }
}

fn next_option(options: &[String], current: &str) -> String {
    // Cycle: option 0, option 1, ..., wildcard, back to option 0.
    if current == stats::ALL {
        return options
            .first()
            .cloned()
            .unwrap_or_else(|| stats::ALL.to_string());
    }
    match options.iter().position(|option| option == current) {
        Some(index) if index + 1 < options.len() => options[index + 1].clone(),
        _ => stats::ALL.to_string(),
    }
}

fn alert_for_error(err: ClientError, fallback: &str) -> String {
    match err {
        ClientError::Validation(message) => format!("欄位有誤：{message}"),
        ClientError::Server(_) | ClientError::Transport(_) => fallback.to_string(),
    }
}
