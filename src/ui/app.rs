use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::analytics::{
    self, BudgetStatus, CategoryTotal, MonthKey, MonthlyPoint, MonthlySummary,
};
use crate::ledger::{Ledger, Persistence};
use crate::models::{self, Category, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    Dashboard,
    Transactions,
    Budgets,
}

impl Screen {
    pub(crate) fn all() -> &'static [Screen] {
        &[Self::Dashboard, Self::Transactions, Self::Budgets]
    }
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dashboard => write!(f, "Dashboard"),
            Self::Transactions => write!(f, "Transactions"),
            Self::Budgets => write!(f, "Budgets"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputMode {
    Normal,
    Command,
    Confirm,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "NORMAL"),
            Self::Command => write!(f, "COMMAND"),
            Self::Confirm => write!(f, "CONFIRM"),
        }
    }
}

/// Pending action that requires user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PendingAction {
    DeleteTransaction { id: String, description: String },
    ClearBudget { category: Category },
}

pub(crate) struct App {
    pub(crate) running: bool,
    pub(crate) screen: Screen,
    pub(crate) input_mode: InputMode,
    pub(crate) command_input: String,
    pub(crate) status_message: String,
    pub(crate) show_help: bool,
    pub(crate) today: NaiveDate,

    // Dashboard
    pub(crate) summary: MonthlySummary,
    pub(crate) series: Vec<MonthlyPoint>,
    pub(crate) category_totals: Vec<CategoryTotal>,
    pub(crate) insights: Vec<String>,
    pub(crate) transaction_count: usize,

    // Transactions, newest first
    pub(crate) transactions: Vec<Transaction>,
    pub(crate) transaction_index: usize,
    pub(crate) transaction_scroll: usize,

    // Budgets
    pub(crate) budget_rows: Vec<BudgetStatus>,
    pub(crate) budget_total: Decimal,
    pub(crate) budget_index: usize,
    pub(crate) budget_scroll: usize,

    // Confirmation
    pub(crate) pending_action: Option<PendingAction>,
    pub(crate) confirm_message: String,

    // Layout (updated each render frame)
    pub(crate) visible_rows: usize,
}

impl App {
    pub(crate) fn new(today: NaiveDate) -> Self {
        Self {
            running: true,
            screen: Screen::Dashboard,
            input_mode: InputMode::Normal,
            command_input: String::new(),
            status_message: String::new(),
            show_help: false,
            today,

            summary: analytics::monthly_summary(&[], today),
            series: Vec::new(),
            category_totals: Vec::new(),
            insights: Vec::new(),
            transaction_count: 0,

            transactions: Vec::new(),
            transaction_index: 0,
            transaction_scroll: 0,

            budget_rows: Vec::new(),
            budget_total: Decimal::ZERO,
            budget_index: 0,
            budget_scroll: 0,

            pending_action: None,
            confirm_message: String::new(),

            visible_rows: 20,
        }
    }

    pub(crate) fn month(&self) -> MonthKey {
        MonthKey::of(self.today)
    }

    /// Recompute every derived view from the ledger's current snapshot.
    pub(crate) fn refresh<P: Persistence>(&mut self, ledger: &Ledger<P>) {
        let txns = ledger.transactions();
        let budgets = ledger.budgets();

        self.summary = analytics::monthly_summary(txns, self.today);
        self.series = analytics::monthly_series(txns, self.today);
        self.category_totals = analytics::category_totals(txns);
        self.insights = analytics::insights(txns, budgets, self.today);
        self.transaction_count = txns.len();

        let mut sorted = txns.to_vec();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        self.transactions = sorted;
        clamp_cursor(
            &mut self.transaction_index,
            &mut self.transaction_scroll,
            self.transactions.len(),
        );

        self.budget_rows = analytics::budget_comparison(txns, budgets, self.today);
        self.budget_total = models::total_budget(budgets);
        clamp_cursor(
            &mut self.budget_index,
            &mut self.budget_scroll,
            self.budget_rows.len(),
        );
    }

    pub(crate) fn selected_transaction(&self) -> Option<&Transaction> {
        self.transactions.get(self.transaction_index)
    }

    pub(crate) fn selected_budget(&self) -> Option<&BudgetStatus> {
        self.budget_rows.get(self.budget_index)
    }

    /// Table rows visible below the header and borders.
    pub(crate) fn transaction_page(&self) -> usize {
        self.visible_rows.saturating_sub(3).max(1)
    }

    pub(crate) fn budget_page(&self) -> usize {
        self.visible_rows.saturating_sub(2).max(1)
    }

    pub(crate) fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    /// Ask for a y/N confirmation before running `action`.
    pub(crate) fn confirm(&mut self, message: impl Into<String>, action: PendingAction) {
        self.confirm_message = message.into();
        self.pending_action = Some(action);
        self.input_mode = InputMode::Confirm;
    }
}

fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}
