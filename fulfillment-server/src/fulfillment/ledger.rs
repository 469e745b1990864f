//! Ledger planning for transition commits
//!
//! Translates a derived [`TransitionPlan`] into the exact ledger rows to
//! insert and delete plus the order's bookkeeping fields afterwards. Pure
//! planning: execution happens inside the storage commit, so the rows and
//! the status land in one transaction.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::fulfillment::CollectionInput;
use shared::models::{Order, Transaction};

use super::transitions::plan::{ExpenseAction, RevenueAction, TransitionPlan};

/// Category for recognized revenue rows
pub const SALES_CATEGORY: &str = "vendas";

/// Category for production expense rows
pub const PRODUCTION_CATEGORY: &str = "produção";

/// Description for the income row of an order
pub fn income_description(number: &str) -> String {
    format!("Receita do pedido {number}")
}

/// Description for the production expense row of an order
pub fn expense_description(number: &str) -> String {
    format!("Custo de produção do pedido {number}")
}

/// Ledger writes for one transition, plus the bookkeeping fields after
#[derive(Debug, Clone)]
pub struct LedgerOps {
    pub inserts: Vec<Transaction>,
    pub deletes: Vec<String>,
    pub revenue_added_after: bool,
    pub revenue_transaction_id_after: Option<String>,
    pub production_expense_id_after: Option<String>,
}

impl LedgerOps {
    /// Plan the ledger writes for `plan` applied to `order`
    ///
    /// `input` carries collected values; expense collection without an
    /// amount is rejected here as a final guard behind the controller's
    /// own validation. Revenue double-booking is impossible by
    /// construction: the planner only derives `Add` when `revenue_added`
    /// is still false.
    pub fn for_plan(
        order: &Order,
        plan: &TransitionPlan,
        input: &CollectionInput,
    ) -> AppResult<LedgerOps> {
        let mut ops = LedgerOps {
            inserts: Vec::new(),
            deletes: Vec::new(),
            revenue_added_after: order.revenue_added,
            revenue_transaction_id_after: order.revenue_transaction_id.clone(),
            production_expense_id_after: order.production_expense_id.clone(),
        };

        match plan.revenue {
            Some(RevenueAction::Add) => {
                let income = Transaction::income(
                    order.total,
                    SALES_CATEGORY,
                    income_description(&order.number),
                    &order.id,
                );
                ops.revenue_added_after = true;
                ops.revenue_transaction_id_after = Some(income.id.clone());
                ops.inserts.push(income);
            }
            Some(RevenueAction::Remove) => {
                if let Some(id) = &order.revenue_transaction_id {
                    ops.deletes.push(id.clone());
                }
                ops.revenue_added_after = false;
                ops.revenue_transaction_id_after = None;
            }
            None => {}
        }

        match plan.expense {
            Some(ExpenseAction::Collect) => {
                let amount = input
                    .amount
                    .ok_or_else(|| AppError::new(ErrorCode::ExpenseAmountRequired))?;
                let expense = Transaction::expense(
                    amount,
                    PRODUCTION_CATEGORY,
                    expense_description(&order.number),
                    &order.id,
                );
                // Rows from earlier production passes stay as history;
                // only the tracked id moves to the new row
                ops.production_expense_id_after = Some(expense.id.clone());
                ops.inserts.push(expense);
            }
            Some(ExpenseAction::Remove) => {
                if let Some(id) = &order.production_expense_id {
                    ops.deletes.push(id.clone());
                    ops.production_expense_id_after = None;
                }
            }
            None => {}
        }

        Ok(ops)
    }
}
