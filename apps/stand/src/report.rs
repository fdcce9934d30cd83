//! # Daily Close Report
//!
//! Plain-text rendering of a [`DailySummary`], sized for a receipt printer.
//!
//! ```text
//! ==========================================
//!                DOLCE FUSIÓN
//!               CIERRE DE CAJA
//!                 2024-03-10
//! ==========================================
//! Ventas                                   2
//! Total USD                           $5.50
//! Total Bs.                     Bs. 250,25
//! Ticket promedio                     $2.75
//! ------------------------------------------
//! MÉTODOS DE PAGO
//! ...
//! ```

use dolce_core::currency::{format, Currency};
use dolce_core::report::DailySummary;
use dolce_core::Money;

/// Characters per line.
pub const REPORT_WIDTH: usize = 42;

const NAME_WIDTH: usize = 22;

/// Renders the closing report for one day.
pub fn render_daily_close(store_name: &str, summary: &DailySummary) -> String {
    let mut lines = vec![
        "=".repeat(REPORT_WIDTH),
        centered(&store_name.to_uppercase()),
        centered("CIERRE DE CAJA"),
        centered(&summary.date.format("%Y-%m-%d").to_string()),
        "=".repeat(REPORT_WIDTH),
        row("Ventas", &summary.sales_count.to_string()),
        row("Total USD", &usd(summary.total_usd)),
        row("Total Bs.", &ves(summary.total_ves)),
        row("Ticket promedio", &usd(summary.average_ticket)),
        "-".repeat(REPORT_WIDTH),
        "MÉTODOS DE PAGO".to_string(),
    ];

    for method in &summary.payment_methods {
        lines.push(row(
            &format!("{} ({})", method.method.label(), method.count),
            &usd(method.total_usd),
        ));
        lines.push(row("", &ves(method.total_ves)));
    }

    lines.push("-".repeat(REPORT_WIDTH));
    lines.push("PRODUCTOS".to_string());

    if summary.products.is_empty() {
        lines.push("Sin ventas registradas".to_string());
    }
    for product in &summary.products {
        lines.push(row(
            &format!("{:>3} x {}", product.quantity, clip(&product.name, NAME_WIDTH)),
            &usd(product.total_usd),
        ));
        lines.push(row("", &ves(product.total_ves)));
    }

    lines.push("=".repeat(REPORT_WIDTH));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn usd(amount: Money) -> String {
    format(amount, Currency::Usd)
}

fn ves(amount: Money) -> String {
    format(amount, Currency::Ves)
}

fn centered(text: &str) -> String {
    format!("{:^width$}", text, width = REPORT_WIDTH)
        .trim_end()
        .to_string()
}

/// Label on the left, value flush right.
fn row(label: &str, value: &str) -> String {
    let used = label.chars().count() + value.chars().count();
    let gap = REPORT_WIDTH.saturating_sub(used).max(1);
    format!("{}{}{}", label, " ".repeat(gap), value)
}

fn clip(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut clipped: String = text.chars().take(max - 1).collect();
    clipped.push('…');
    clipped
}
