//! # Interactive Shell
//!
//! The line-oriented front end of Ferro POS.
//!
//! ## Session Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Shell Session                                     │
//! │                                                                         │
//! │  banner ──► login (3 attempts) ──► prompt loop                          │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │              tokenize line ──► dispatch ──► command ──► render          │
//! │                                       │                                 │
//! │              command errors print a message and keep the loop alive;    │
//! │              only `quit` / EOF ends the session                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The command modules do the work and return DTOs; everything printed to
//! the operator lives here.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

use crate::commands::{auth, cart, customer, discount, product, sale};
use crate::error::AppError;
use crate::state::{CartState, ConfigState, DbState};

/// The interactive shell session.
pub struct Shell {
    db: DbState,
    cart: CartState,
    config: ConfigState,
}

impl Shell {
    /// Creates a shell over the session state.
    pub fn new(db: DbState, cart: CartState, config: ConfigState) -> Self {
        Shell { db, cart, config }
    }

    /// Runs the session: login gate, then the prompt loop.
    pub async fn run(&self) -> Result<(), AppError> {
        let mut input = BufReader::new(tokio::io::stdin()).lines();

        println!("==========================================");
        println!("  {} - Point of Sale", self.config.store_name);
        println!("==========================================");

        if !self.login(&mut input).await? {
            println!("Too many failed attempts. Bye.");
            return Ok(());
        }

        println!();
        println!("Type 'help' for commands, 'quit' to exit.");

        loop {
            prompt("ferro> ")?;

            let line = match input.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break, // EOF
                Err(e) => return Err(AppError::internal(e.to_string())),
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "quit" || line == "exit" {
                break;
            }

            if let Err(err) = self.dispatch(line).await {
                println!("error: {}", err.message);
            }
        }

        println!("Goodbye.");
        Ok(())
    }

    /// Asks for credentials, allowing three attempts.
    async fn login(&self, input: &mut Lines<BufReader<Stdin>>) -> Result<bool, AppError> {
        for attempt in 1..=3 {
            prompt("user: ")?;
            let user = match input.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(false),
                Err(e) => return Err(AppError::internal(e.to_string())),
            };

            prompt("password: ")?;
            let password = match input.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(false),
                Err(e) => return Err(AppError::internal(e.to_string())),
            };

            if auth::validate_credentials(&self.config, user.trim(), password.trim()) {
                println!("Welcome, {}!", user.trim().to_uppercase());
                return Ok(true);
            }

            println!("Invalid credentials ({}/3).", attempt);
        }

        Ok(false)
    }

    /// Tokenizes a line and routes it to the matching command.
    async fn dispatch(&self, line: &str) -> Result<(), AppError> {
        debug!(line = %line, "Dispatching command");
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            ["help"] => {
                self.print_help();
                Ok(())
            }

            // ----------------------------------------------------------------
            // Catalog
            // ----------------------------------------------------------------
            ["product", "list"] => {
                let items = product::search_products(&self.db, "", Some(100)).await?;
                self.print_products(&items);
                Ok(())
            }
            ["product", "search", rest @ ..] if !rest.is_empty() => {
                let items = product::search_products(&self.db, &rest.join(" "), None).await?;
                self.print_products(&items);
                Ok(())
            }
            ["product", "show", article] => {
                let dto = product::get_product(&self.db, article).await?;
                self.print_products(std::slice::from_ref(&dto));
                if let Some(description) = &dto.description {
                    println!("  {}", description);
                }
                Ok(())
            }
            ["product", "add", article, category, price, stock, name @ ..] if !name.is_empty() => {
                let input = product::NewProduct {
                    article_number: article.to_string(),
                    name: name.join(" "),
                    description: None,
                    category: category.to_string(),
                    price_cents: parse_money(price)?,
                    stock: parse_int(stock, "stock")?,
                };
                let dto = product::add_product(&self.db, input).await?;
                println!("Registered {} ({}).", dto.name, dto.article_number);
                Ok(())
            }
            ["product", "price", article, price] => {
                let dto = product::set_price(&self.db, article, parse_money(price)?).await?;
                println!(
                    "{} now costs {}.",
                    dto.name,
                    self.config.format_currency(dto.price_cents)
                );
                Ok(())
            }
            ["product", "restock", article, qty] => {
                let dto =
                    product::restock(&self.db, article, parse_int(qty, "quantity")?).await?;
                println!("{} stock is now {}.", dto.name, dto.stock);
                Ok(())
            }
            ["product", "remove", article] => {
                product::remove_product(&self.db, article).await?;
                println!("Removed {} from the catalog.", article);
                Ok(())
            }
            ["product", "alerts"] | ["alerts"] => {
                let items = product::restock_alerts(&self.db).await?;
                if items.is_empty() {
                    println!("No products below their minimum stock.");
                } else {
                    self.print_products(&items);
                }
                Ok(())
            }

            // ----------------------------------------------------------------
            // Customers
            // ----------------------------------------------------------------
            ["customer", "list"] => {
                let items = customer::list_customers(&self.db, None).await?;
                self.print_customers(&items);
                Ok(())
            }
            ["customer", "add", rest @ ..] if !rest.is_empty() => {
                // Fields are semicolon-separated: name;phone;email;address
                let joined = rest.join(" ");
                let fields: Vec<&str> = joined.split(';').map(str::trim).collect();
                if fields.len() != 4 {
                    return Err(AppError::usage(
                        "usage: customer add <name>;<phone>;<email>;<address>",
                    ));
                }
                let dto = customer::add_customer(
                    &self.db,
                    customer::NewCustomer {
                        name: fields[0].to_string(),
                        phone: fields[1].to_string(),
                        email: fields[2].to_string(),
                        address: fields[3].to_string(),
                    },
                )
                .await?;
                println!("Registered customer {} ({}).", dto.name, dto.id);
                Ok(())
            }
            ["customer", "find", rest @ ..] if !rest.is_empty() => {
                let dto = customer::find_customer(&self.db, &rest.join(" ")).await?;
                self.print_customers(std::slice::from_ref(&dto));
                Ok(())
            }
            ["customer", "remove", rest @ ..] if !rest.is_empty() => {
                customer::remove_customer(&self.db, &rest.join(" ")).await?;
                println!("Customer removed.");
                Ok(())
            }

            // ----------------------------------------------------------------
            // Discounts
            // ----------------------------------------------------------------
            ["discount", "list"] => {
                let items = discount::list_discounts(&self.db).await?;
                self.print_discounts(&items);
                Ok(())
            }
            ["discount", "add", code, kind, value, desc @ ..] if !desc.is_empty() => {
                // Percent values reuse the money parser: "12.5" → 1250 bps
                let (kind, value) = match *kind {
                    "percent" => (ferro_core::DiscountKind::Percentage, parse_money(value)?),
                    "fixed" => (ferro_core::DiscountKind::FixedAmount, parse_money(value)?),
                    other => {
                        return Err(AppError::usage(format!(
                            "discount kind must be 'percent' or 'fixed', got '{}'",
                            other
                        )))
                    }
                };
                let dto =
                    discount::add_discount(&self.db, code, kind, value, &desc.join(" ")).await?;
                println!("Registered discount {}.", dto.code);
                Ok(())
            }
            ["discount", "remove", code] => {
                discount::remove_discount_code(&self.db, code).await?;
                println!("Discount removed.");
                Ok(())
            }

            // ----------------------------------------------------------------
            // Cart
            // ----------------------------------------------------------------
            ["cart"] | ["cart", "show"] => {
                let resp = cart::get_cart(&self.cart);
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "add", rest @ ..] if !rest.is_empty() => {
                // Trailing numeric token is the quantity: `cart add hammer 3`
                let (query_tokens, quantity) = match rest.split_last() {
                    Some((last, head)) if !head.is_empty() => match last.parse::<i64>() {
                        Ok(qty) => (head, Some(qty)),
                        Err(_) => (rest, None),
                    },
                    _ => (rest, None),
                };
                let resp =
                    cart::add_to_cart(&self.db, &self.cart, &query_tokens.join(" "), quantity)
                        .await?;
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "qty", article, qty] => {
                let resp =
                    cart::update_cart_line(&self.cart, article, parse_int(qty, "quantity")?)?;
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "remove", article] => {
                let resp = cart::remove_from_cart(&self.cart, article)?;
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "customer", rest @ ..] => {
                let resp = cart::assign_customer(&self.db, &self.cart, &rest.join(" ")).await?;
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "discount", "off"] => {
                let resp = discount::remove_discount(&self.cart);
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "discount", code] => {
                let resp = discount::apply_discount(&self.db, &self.cart, code).await?;
                self.print_cart(&resp);
                Ok(())
            }
            ["cart", "clear"] => {
                cart::clear_cart(&self.cart);
                println!("Cart cleared.");
                Ok(())
            }

            // ----------------------------------------------------------------
            // Checkout & history
            // ----------------------------------------------------------------
            ["checkout"] => {
                let receipt = sale::checkout(&self.db, &self.cart, &self.config).await?;
                self.print_receipt(&receipt);
                Ok(())
            }
            ["history"] => {
                let items = sale::history(&self.db, None).await?;
                self.print_history(&items);
                Ok(())
            }
            ["history", n] => {
                let limit = parse_int(n, "limit")? as u32;
                let items = sale::history(&self.db, Some(limit)).await?;
                self.print_history(&items);
                Ok(())
            }

            _ => Err(AppError::usage(
                "Unknown command. Type 'help' for the command list.",
            )),
        }
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    fn print_help(&self) {
        println!("Catalog:");
        println!("  product list");
        println!("  product search <query>");
        println!("  product show <article>");
        println!("  product add <article> <category> <price> <stock> <name...>");
        println!("  product price <article> <price>");
        println!("  product restock <article> <qty>");
        println!("  product remove <article>");
        println!("  product alerts");
        println!("Customers:");
        println!("  customer list");
        println!("  customer add <name>;<phone>;<email>;<address>");
        println!("  customer find <id or name>");
        println!("  customer remove <id or name>");
        println!("Sale:");
        println!("  cart                         show the open sale");
        println!("  cart add <query> [qty]       add a product by article or name");
        println!("  cart qty <article> <n>       set a line quantity (0 removes)");
        println!("  cart remove <article>");
        println!("  cart customer [id or name]   assign customer (empty clears)");
        println!("  cart discount <code>         apply a discount code");
        println!("  cart discount off");
        println!("  cart clear");
        println!("  checkout                     commit the sale");
        println!("Other:");
        println!("  discount list");
        println!("  discount add <code> <percent|fixed> <value> <description...>");
        println!("  discount remove <code>");
        println!("  history [n]");
        println!("  quit");
    }

    fn print_products(&self, items: &[product::ProductDto]) {
        if items.is_empty() {
            println!("No products found.");
            return;
        }
        println!(
            "{:<12} {:<28} {:<12} {:>10} {:>7}",
            "ARTICLE", "NAME", "CATEGORY", "PRICE", "STOCK"
        );
        for p in items {
            println!(
                "{:<12} {:<28} {:<12} {:>10} {:>7}{}",
                p.article_number,
                p.name,
                p.category,
                self.config.format_currency(p.price_cents),
                p.stock,
                if p.needs_restock { "  (low)" } else { "" }
            );
        }
    }

    fn print_customers(&self, items: &[customer::CustomerDto]) {
        if items.is_empty() {
            println!("No customers found.");
            return;
        }
        for c in items {
            println!("{}  {} | {} | {} | {}", c.id, c.name, c.phone, c.email, c.address);
        }
    }

    fn print_discounts(&self, items: &[discount::DiscountDto]) {
        if items.is_empty() {
            println!("No discounts configured.");
            return;
        }
        for d in items {
            let value = match d.kind {
                ferro_core::DiscountKind::Percentage => {
                    format!("{}.{:02}%", d.value / 100, d.value % 100)
                }
                ferro_core::DiscountKind::FixedAmount => self.config.format_currency(d.value),
            };
            println!("{:<10} {:>10}  {}", d.code, value, d.description);
        }
    }

    fn print_cart(&self, resp: &cart::CartResponse) {
        if resp.lines.is_empty() {
            println!("Cart is empty.");
        } else {
            for line in &resp.lines {
                println!(
                    "  {:<12} {:<28} x{:<4} @ {:>9} = {:>10}",
                    line.article_number,
                    line.name,
                    line.quantity,
                    self.config.format_currency(line.unit_price_cents),
                    self.config.format_currency(line.line_total_cents()),
                );
            }
        }

        match &resp.customer_name {
            Some(name) => println!("  customer: {}", name),
            None => println!("  customer: (anonymous)"),
        }
        if let Some(code) = &resp.discount_code {
            println!("  discount: {}", code);
        }
        println!(
            "  subtotal {}  discount {}  TOTAL {}",
            self.config.format_currency(resp.totals.subtotal_cents),
            self.config.format_currency(resp.totals.discount_cents),
            self.config.format_currency(resp.totals.total_cents),
        );
    }

    fn print_receipt(&self, receipt: &sale::Receipt) {
        println!("---------- {} ----------", receipt.store_name);
        println!("sale {}  {}", receipt.sale_id, receipt.timestamp);
        if let Some(name) = &receipt.customer_name {
            println!("customer: {}", name);
        }
        for line in &receipt.lines {
            println!(
                "  {:<28} x{:<4} @ {:>9} = {:>10}",
                line.name,
                line.quantity,
                self.config.format_currency(line.unit_price_cents),
                self.config.format_currency(line.line_total_cents),
            );
        }
        println!(
            "subtotal {}",
            self.config.format_currency(receipt.subtotal_cents)
        );
        if receipt.discount_cents > 0 {
            println!(
                "discount {} ({})",
                self.config.format_currency(receipt.discount_cents),
                receipt.discount_code.as_deref().unwrap_or("-"),
            );
        }
        println!("TOTAL    {}", self.config.format_currency(receipt.total_cents));
    }

    fn print_history(&self, items: &[sale::SaleSummary]) {
        if items.is_empty() {
            println!("No sales recorded yet.");
            return;
        }
        for s in items {
            println!(
                "{}  {}  {:<20} {:>10}",
                s.timestamp,
                s.sale_id,
                s.customer_name.as_deref().unwrap_or("(anonymous)"),
                self.config.format_currency(s.total_cents),
            );
        }
    }
}

/// Prints a prompt without a trailing newline.
fn prompt(text: &str) -> Result<(), AppError> {
    print!("{}", text);
    std::io::stdout()
        .flush()
        .map_err(|e| AppError::internal(e.to_string()))
}

/// Parses a positive integer argument.
fn parse_int(s: &str, field: &str) -> Result<i64, AppError> {
    s.parse::<i64>()
        .map_err(|_| AppError::usage(format!("{} must be a number, got '{}'", field, s)))
}

/// Parses a currency amount like "12.50" or "12" into cents.
///
/// No floats: the major and minor parts are parsed separately, so prices
/// survive the trip into cents exactly.
fn parse_money(s: &str) -> Result<i64, AppError> {
    let s = s.trim();
    if s.is_empty() || s.starts_with('-') {
        return Err(AppError::usage(format!("invalid price '{}'", s)));
    }

    let (major_str, minor_str) = match s.split_once('.') {
        Some((maj, min)) => (maj, min),
        None => (s, ""),
    };

    let major: i64 = major_str
        .parse()
        .map_err(|_| AppError::usage(format!("invalid price '{}'", s)))?;

    let minor: i64 = match minor_str.len() {
        0 => 0,
        1 => {
            let d: i64 = minor_str
                .parse()
                .map_err(|_| AppError::usage(format!("invalid price '{}'", s)))?;
            d * 10
        }
        2 => minor_str
            .parse()
            .map_err(|_| AppError::usage(format!("invalid price '{}'", s)))?,
        _ => return Err(AppError::usage(format!("invalid price '{}'", s))),
    };

    Ok(major * 100 + minor)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("12.50").unwrap(), 1250);
        assert_eq!(parse_money("12.5").unwrap(), 1250);
        assert_eq!(parse_money("12").unwrap(), 1200);
        assert_eq!(parse_money("0.99").unwrap(), 99);
        assert_eq!(parse_money("0").unwrap(), 0);
    }

    #[test]
    fn test_parse_money_rejects_junk() {
        assert!(parse_money("").is_err());
        assert!(parse_money("-1.00").is_err());
        assert!(parse_money("12.500").is_err());
        assert!(parse_money("abc").is_err());
        assert!(parse_money("1.2.3").is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("42", "qty").unwrap(), 42);
        assert!(parse_int("4x", "qty").is_err());
    }
}
