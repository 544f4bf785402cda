//! Plain-text rendering of a [`Dashboard`].

use std::fmt;

use budget_core::{PeriodBalance, TransactionKind, ViewMode};
use rust_decimal::Decimal;

use crate::app::Dashboard;
use crate::utils::{format_amount, format_rate};

const RULE: &str = "----------------------------------------------------------------";

impl Dashboard {
    fn money(
        &self,
        amount: Decimal,
    ) -> String {
        format_amount(amount, &self.currency)
    }

    fn write_salary(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let monthly = &self.salary.monthly;
        let biweekly = &self.salary.biweekly;

        writeln!(f, "Salary breakdown")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<22}{:>20}{:>20}", "", "Monthly", "Biweekly")?;
        writeln!(
            f,
            "{:<22}{:>20}{:>20}",
            "Gross salary",
            self.money(monthly.gross_salary),
            self.money(biweekly.gross_salary)
        )?;
        writeln!(
            f,
            "{:<22}{:>20}{:>20}",
            format!("CCSS ({})", format_rate(self.withholding_rate)),
            self.money(-monthly.statutory_withholding),
            self.money(-biweekly.statutory_withholding)
        )?;
        writeln!(
            f,
            "{:<22}{:>20}{:>20}",
            "Income tax",
            self.money(-monthly.income_tax),
            self.money(-biweekly.income_tax)
        )?;
        writeln!(
            f,
            "{:<22}{:>20}{:>20}",
            "Net salary",
            self.money(monthly.net_salary),
            self.money(biweekly.net_salary)
        )?;
        writeln!(f)
    }

    fn write_balance_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        label: &str,
        balance: &PeriodBalance,
    ) -> fmt::Result {
        writeln!(
            f,
            "{:<22}{:>14}{:>14}{:>14}",
            label,
            self.money(balance.income),
            self.money(balance.expenses),
            self.money(balance.balance())
        )
    }

    fn write_budget(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let view = &self.view;
        let expenses_label = match view.view_mode {
            ViewMode::Monthly => "Expenses",
            ViewMode::Biweekly => "Expenses (half month)",
        };

        writeln!(f, "Budget: {} ({})", view.period_label, view.view_mode)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<26}{:>20}", "Income", self.money(view.period_income))?;
        writeln!(f, "{:<26}{:>20}", expenses_label, self.money(view.period_expenses))?;
        writeln!(f, "{:<26}{:>20}", "Available", self.money(view.period_balance()))?;
        writeln!(
            f,
            "{:<26}{:>20}",
            "Month expenses",
            self.money(view.actual_monthly_expenses)
        )?;
        writeln!(f, "{:<26}{:>19}%", "Spent", view.spending_percent())?;
        writeln!(f, "{:<26}{:>20}", "Days left", view.remaining_days)?;
        writeln!(
            f,
            "{:<26}{:>20}",
            "Available per day",
            self.money(view.remaining_daily_budget)
        )
    }

    fn write_recent(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Recent transactions")?;
        writeln!(f, "{RULE}")?;
        if self.recent.is_empty() {
            return writeln!(f, "(none)");
        }
        for tx in &self.recent {
            let signed = match tx.kind {
                TransactionKind::Income => tx.amount,
                TransactionKind::Expense => -tx.amount,
            };
            writeln!(
                f,
                "{}  {:<14}{:>16}  {}",
                tx.created_at.format("%Y-%m-%d %H:%M"),
                tx.category,
                self.money(signed),
                tx.description.as_deref().unwrap_or("")
            )?;
        }
        Ok(())
    }
}

impl fmt::Display for Dashboard {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Today: {}", self.periods.today.format("%Y-%m-%d"))?;
        writeln!(f)?;

        // no salary configured, nothing to break down
        if !self.salary.is_empty() {
            self.write_salary(f)?;
        }

        writeln!(f, "Balances")?;
        writeln!(f, "{RULE}")?;
        writeln!(
            f,
            "{:<22}{:>14}{:>14}{:>14}",
            "", "Income", "Expenses", "Balance"
        )?;
        self.write_balance_row(
            f,
            &format!("Month {}", self.periods.month.label()),
            &self.balances.monthly,
        )?;
        self.write_balance_row(
            f,
            &format!("Half {}", self.periods.biweekly.label()),
            &self.balances.biweekly,
        )?;
        writeln!(f)?;

        self.write_budget(f)?;
        writeln!(f)?;

        self.write_recent(f)
    }
}

#[cfg(test)]
mod tests {
    use budget_core::{DeductionConfig, Transaction};
    use budget_data::Settings;
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal_macros::dec;

    use super::*;
    use crate::app::build_dashboard;

    fn june(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, day)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    fn render(
        salary: Decimal,
        mode: ViewMode,
    ) -> String {
        let settings = Settings {
            monthly_salary: salary,
            ..Settings::default()
        };
        let transactions = vec![Transaction {
            id: "1".to_string(),
            amount: dec!(15250.50),
            category: "Comida".to_string(),
            description: Some("Supermercado".to_string()),
            kind: TransactionKind::Expense,
            created_at: june(3),
        }];
        build_dashboard(
            &settings,
            DeductionConfig::canonical(),
            transactions,
            june(10),
            mode,
        )
        .unwrap()
        .to_string()
    }

    #[test]
    fn salary_section_shows_both_columns() {
        let text = render(dec!(2000000), ViewMode::Monthly);

        assert!(text.contains("Salary breakdown"), "{text}");
        assert!(text.contains("CCSS (10.83%)"), "{text}");
        assert!(text.contains("₡1,644,450.00"), "{text}");
        assert!(text.contains("₡822,225.00"), "{text}");
        assert!(text.contains("-₡138,950.00"), "{text}");
    }

    #[test]
    fn salary_section_hidden_without_salary() {
        let text = render(dec!(0), ViewMode::Monthly);

        assert!(!text.contains("Salary breakdown"), "{text}");
        assert!(text.contains("Balances"), "{text}");
    }

    #[test]
    fn budget_section_names_period_and_mode() {
        let text = render(dec!(2000000), ViewMode::Biweekly);

        assert!(text.contains("Budget: 01 Jun - 15 Jun (biweekly)"), "{text}");
        assert!(text.contains("Expenses (half month)"), "{text}");
        assert!(text.contains("₡7,625.25"), "{text}");
    }

    #[test]
    fn recent_lists_signed_amounts() {
        let text = render(dec!(2000000), ViewMode::Monthly);

        assert!(text.contains("2025-06-03 10:00"), "{text}");
        assert!(text.contains("-₡15,250.50"), "{text}");
        assert!(text.contains("Supermercado"), "{text}");
    }
}
