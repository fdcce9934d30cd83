//! # Command Line
//!
//! One invocation runs one controller command and prints the result.
//!
//! ```text
//! dolce-stand [--config FILE] [--db FILE] <COMMAND>
//!
//!   products      [--category C]
//!   add-product   --name N --price P [--currency usd|ves] [--category C]
//!                 [--description D | --generate]
//!   edit-product  <ID> [--name N] [--price P] [--currency C] [--category C]
//!                 [--description D]
//!   delete-product <ID>
//!   describe      <ID>
//!   sell          --item ID_OR_NAME[:QTY]... [--method M] [--reference R]
//!   history       [--search S] [--method M] [--from DATE] [--to DATE]
//!   delete-sale   <ID>
//!   close         [--date DATE]
//!   rate | set-rate <RATE>
//!   convert       <AMOUNT> [--from usd|ves]
//!   logo | set-logo <URL>
//! ```

use chrono::{NaiveDate, TimeZone};
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use dolce_core::currency::{format, Currency};
use dolce_core::history::SalesFilter;
use dolce_core::{Money, PaymentMethod, Product, Sale, MAX_ITEM_QUANTITY};

use crate::commands::HistoryPage;
use crate::controller::Controller;
use crate::error::{ApiError, ApiResult};
use crate::report::render_daily_close;
use crate::state::{View, DEFAULT_CATEGORY};

#[derive(Debug, Parser)]
#[command(name = "dolce-stand", version, about = "Dolce Fusión stand point of sale")]
pub struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and DOLCE_DB_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the catalog
    Products {
        #[arg(long)]
        category: Option<String>,
    },

    /// Add a product to the catalog
    AddProduct {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: Money,
        /// Currency the price is given in
        #[arg(long, default_value = "usd")]
        currency: Currency,
        #[arg(long, default_value = DEFAULT_CATEGORY)]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Write the description with the text generator
        #[arg(long, conflicts_with = "description")]
        generate: bool,
    },

    /// Change fields of an existing product
    EditProduct {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<Money>,
        #[arg(long, requires = "price")]
        currency: Option<Currency>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// Remove a product (past sales are kept)
    DeleteProduct { id: String },

    /// Generate and save a product description
    Describe { id: String },

    /// Record a sale
    Sell {
        #[arg(long = "item", required = true, value_name = "ID_OR_NAME[:QTY]")]
        items: Vec<ItemArg>,
        #[arg(long, default_value = "cash-usd")]
        method: PaymentMethod,
        /// Pago Móvil reference
        #[arg(long)]
        reference: Option<String>,
    },

    /// Search past sales
    History {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        method: Option<PaymentMethod>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        from: Option<NaiveDate>,
        #[arg(long, value_name = "YYYY-MM-DD")]
        to: Option<NaiveDate>,
    },

    /// Delete a sale from the ledger
    DeleteSale { id: String },

    /// Print the daily close (today by default)
    Close {
        #[arg(long, value_name = "YYYY-MM-DD")]
        date: Option<NaiveDate>,
    },

    /// Show the active exchange rate
    Rate,

    /// Set the exchange rate (Bs. per USD)
    SetRate { rate: String },

    /// Convert an amount between USD and VES
    Convert {
        amount: String,
        #[arg(long, default_value = "usd")]
        from: Currency,
    },

    /// Show the logo
    Logo,

    /// Replace the logo (URL or data URI)
    SetLogo { logo: String },
}

impl Command {
    /// Screen the command belongs to.
    pub fn view(&self) -> View {
        match self {
            Command::Products { .. } | Command::Sell { .. } | Command::Logo | Command::SetLogo { .. } => {
                View::Pos
            }
            Command::AddProduct { .. }
            | Command::EditProduct { .. }
            | Command::DeleteProduct { .. }
            | Command::Describe { .. } => View::Inventory,
            Command::History { .. } | Command::DeleteSale { .. } => View::Sales,
            Command::Close { .. } => View::DailyClose,
            Command::Rate | Command::SetRate { .. } | Command::Convert { .. } => View::Calculator,
        }
    }
}

/// `ID_OR_NAME[:QTY]` on the `sell` command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemArg {
    pub product: String,
    pub quantity: i64,
}

impl FromStr for ItemArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (product, quantity) = match s.rsplit_once(':') {
            Some((product, qty)) if !qty.is_empty() && qty.chars().all(|c| c.is_ascii_digit()) => {
                let quantity = qty
                    .parse::<i64>()
                    .map_err(|_| format!("quantity '{}' is too large", qty))?;
                (product, quantity)
            }
            _ => (s, 1),
        };

        let product = product.trim();
        if product.is_empty() {
            return Err("product is required".to_string());
        }
        if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
            return Err(format!("quantity must be between 1 and {}", MAX_ITEM_QUANTITY));
        }

        Ok(ItemArg {
            product: product.to_string(),
            quantity,
        })
    }
}

// =============================================================================
// Execution
// =============================================================================

/// Runs `command` against the controller and returns the text to print.
pub async fn execute<Tz>(
    controller: &mut Controller,
    command: Command,
    store_name: &str,
    tz: &Tz,
) -> ApiResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    controller.set_view(command.view());

    match command {
        Command::Products { category } => {
            controller.select_category(category);
            let rate = controller.state().rate;
            let products = controller.visible_products();
            if products.is_empty() {
                return Ok("No hay productos".to_string());
            }
            Ok(products
                .into_iter()
                .map(|p| product_line(p, rate))
                .collect::<Vec<_>>()
                .join("\n"))
        }

        Command::AddProduct {
            name,
            price,
            currency,
            category,
            description,
            generate,
        } => {
            controller.open_editor(None)?;
            controller.update_draft(dolce_core::ProductDraft {
                name,
                price,
                price_currency: currency,
                category,
                description,
            })?;
            if generate {
                controller.generate_description().await?;
            }
            let product = controller.save_product().await?;
            Ok(format!("Producto creado\n{}", product_line(&product, controller.state().rate)))
        }

        Command::EditProduct {
            id,
            name,
            price,
            currency,
            category,
            description,
        } => {
            controller.open_editor(Some(&id))?;
            let mut draft = controller
                .state()
                .editor
                .as_ref()
                .map(|e| e.draft.clone())
                .ok_or_else(|| ApiError::internal("Product form did not open"))?;

            if let Some(name) = name {
                draft.name = name;
            }
            if let Some(price) = price {
                draft.price = price;
                draft.price_currency = currency.unwrap_or(Currency::Usd);
            }
            if let Some(category) = category {
                draft.category = category;
            }
            if let Some(description) = description {
                draft.description = Some(description);
            }

            controller.update_draft(draft)?;
            let product = controller.save_product().await?;
            Ok(format!("Producto actualizado\n{}", product_line(&product, controller.state().rate)))
        }

        Command::DeleteProduct { id } => {
            let product = controller.delete_product(&id).await?;
            Ok(format!("Producto eliminado: {}", product.name))
        }

        Command::Describe { id } => {
            let product = controller.describe_product(&id).await?;
            Ok(format!(
                "{}: {}",
                product.name,
                product.description.unwrap_or_default()
            ))
        }

        Command::Sell {
            items,
            method,
            reference,
        } => {
            controller.clear_cart();
            for item in &items {
                let id = resolve_product(controller, &item.product)?;
                for _ in 0..item.quantity {
                    controller.add_to_cart(&id)?;
                }
            }

            let sale = controller
                .checkout(method, reference.as_deref())
                .await?
                .ok_or_else(|| ApiError::cart("Cart is empty"))?;
            Ok(receipt(&sale, tz))
        }

        Command::History {
            search,
            method,
            from,
            to,
        } => {
            let filter = SalesFilter {
                search,
                method,
                start: from,
                end: to,
            };
            let page = controller.history(&filter, tz);
            Ok(history_text(&page, tz))
        }

        Command::DeleteSale { id } => {
            let sale = controller.delete_sale(&id).await?;
            Ok(format!(
                "Venta eliminada: {} ({})",
                sale.id,
                format(sale.total_usd, Currency::Usd)
            ))
        }

        Command::Close { date } => {
            let date = date.unwrap_or_else(|| chrono::Utc::now().with_timezone(tz).date_naive());
            let summary = controller.daily_close(date, tz);
            Ok(render_daily_close(store_name, &summary))
        }

        Command::Rate => Ok(format!("Tasa: {} Bs./USD", controller.state().rate)),

        Command::SetRate { rate } => {
            let rate = controller.set_rate(&rate).await?;
            Ok(format!("Tasa actualizada: {} Bs./USD", rate))
        }

        Command::Convert { amount, from } => {
            let calc = match from {
                Currency::Usd => controller.convert_usd(&amount),
                Currency::Ves => controller.convert_ves(&amount),
            };
            Ok(format!("USD {}\nVES {}", calc.usd(), calc.ves()))
        }

        Command::Logo => Ok(controller.state().logo.clone()),

        Command::SetLogo { logo } => {
            controller.set_logo(&logo).await?;
            Ok("Logo actualizado".to_string())
        }
    }
}

/// Product id, or the id of the product with that exact name.
fn resolve_product(controller: &Controller, id_or_name: &str) -> ApiResult<String> {
    let catalog = &controller.state().catalog;
    catalog
        .get(id_or_name)
        .or_else(|| catalog.find_by_name(id_or_name))
        .map(|p| p.id.clone())
        .ok_or_else(|| ApiError::not_found("Product", id_or_name))
}

fn product_line(product: &Product, rate: dolce_core::ExchangeRate) -> String {
    format!(
        "{}  {:<24}{:>10}{:>16}  {}",
        product.id,
        product.name,
        format(product.price_usd, Currency::Usd),
        format(rate.to_ves(product.price_usd), Currency::Ves),
        product.category
    )
}

fn local_time<Tz>(sale: &Sale, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tz.timestamp_millis_opt(sale.timestamp)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "?".to_string())
}

fn items_text(sale: &Sale) -> String {
    sale.items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn receipt<Tz>(sale: &Sale, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines = vec![format!("Venta {} ({})", sale.id, local_time(sale, tz))];
    for item in &sale.items {
        lines.push(format!(
            "  {:>3} x {:<24}{:>10}",
            item.quantity,
            item.name,
            format(item.total_usd, Currency::Usd)
        ));
    }
    lines.push(format!(
        "Total: {} / {} @ {}",
        format(sale.total_usd, Currency::Usd),
        format(sale.total_ves, Currency::Ves),
        sale.exchange_rate
    ));
    lines.push(format!("Pago: {}", sale.payment_method.label()));
    if let Some(reference) = &sale.reference {
        lines.push(format!("Referencia: {}", reference));
    }
    lines.join("\n")
}

fn history_text<Tz>(page: &HistoryPage<'_>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut lines: Vec<String> = page
        .sales
        .iter()
        .map(|sale| {
            let reference = sale
                .reference
                .as_deref()
                .map(|r| format!(" ref {}", r))
                .unwrap_or_default();
            format!(
                "{}  {}  {:<12}{:>10}{:>16}  {}{}",
                local_time(sale, tz),
                sale.id,
                sale.payment_method.label(),
                format(sale.total_usd, Currency::Usd),
                format(sale.total_ves, Currency::Ves),
                items_text(sale),
                reference
            )
        })
        .collect();

    lines.push(format!(
        "{} ventas, {} / {}",
        page.stats.count,
        format(page.stats.total_usd, Currency::Usd),
        format(page.stats.total_ves, Currency::Ves)
    ));
    lines.join("\n")
}
