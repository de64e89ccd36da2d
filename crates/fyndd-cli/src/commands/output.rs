//! Terminal rendering of command results.

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use fyndd_application::UserSearchResult;
use fyndd_core::cart::{Cart, FriendCart};
use fyndd_core::friend::{RequestStatus, UserSummary};
use fyndd_core::product::NormalizedProduct;

pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print_json<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{}", message.green());
        }
    }

    pub fn notice(&self, message: &str) {
        if !self.json {
            println!("{}", message.yellow());
        }
    }

    pub fn products(&self, products: &[NormalizedProduct]) -> Result<()> {
        if self.json {
            return self.print_json(products);
        }
        if products.is_empty() {
            println!("{}", "No products found.".dimmed());
            return Ok(());
        }
        for product in products {
            let id = product
                .id
                .as_ref()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "-".to_string());
            let mut line = format!("{:<12} {}  {}", id.dimmed(), product.title.bold(), price(product.price));
            if product.discount > 0.0 {
                line.push_str(&format!(" {}", format!("({}% off)", product.discount).green()));
            }
            if !product.in_stock {
                line.push_str(&format!(" {}", "out of stock".red()));
            }
            println!("{}", line);
        }
        Ok(())
    }

    pub fn product(&self, product: &NormalizedProduct) -> Result<()> {
        if self.json {
            return self.print_json(product);
        }
        println!("{}", product.title.bold());
        if !product.brand.is_empty() {
            println!("  Brand:    {}", product.brand);
        }
        if !product.category.is_empty() {
            println!("  Category: {}", product.category);
        }
        if product.original_price > product.price {
            println!(
                "  Price:    {} (was {}, {}% off)",
                price(product.price),
                price(product.original_price),
                product.discount
            );
        } else {
            println!("  Price:    {}", price(product.price));
        }
        if product.review_count > 0 {
            println!("  Rating:   {:.1} ({} reviews)", product.rating, product.review_count);
        }
        println!(
            "  Stock:    {}",
            if product.in_stock {
                "in stock".green()
            } else {
                "out of stock".red()
            }
        );
        if !product.description.is_empty() {
            println!("\n{}", product.description);
        }
        Ok(())
    }

    pub fn cart(&self, cart: &Cart) -> Result<()> {
        if self.json {
            return self.print_json(cart);
        }
        if cart.is_empty() {
            println!("{}", "Your cart is empty.".dimmed());
            return Ok(());
        }
        for item in &cart.items {
            println!(
                "{:<12} {} x{}  {}",
                item.product_id.to_string().dimmed(),
                item.title.bold(),
                item.quantity,
                price(item.line_total())
            );
        }
        println!("{} {}", "Subtotal:".bold(), price(cart.subtotal()));
        Ok(())
    }

    pub fn friend_carts(&self, carts: &[FriendCart]) -> Result<()> {
        if self.json {
            return self.print_json(carts);
        }
        if carts.is_empty() {
            println!("{}", "None of your friends have anything in their cart.".dimmed());
            return Ok(());
        }
        for entry in carts {
            println!("{}", display_name(&entry.friend).cyan().bold());
            for item in &entry.cart.items {
                println!("  {} x{}  {}", item.title, item.quantity, price(item.line_total()));
            }
        }
        Ok(())
    }

    pub fn users(&self, users: &[UserSummary]) -> Result<()> {
        if self.json {
            return self.print_json(users);
        }
        if users.is_empty() {
            println!("{}", "Nobody here yet.".dimmed());
            return Ok(());
        }
        for user in users {
            println!("{:<26} {} {}", user.id.to_string().dimmed(), display_name(user), user.email.dimmed());
        }
        Ok(())
    }

    pub fn user_search(&self, results: &[UserSearchResult]) -> Result<()> {
        if self.json {
            let rows: Vec<serde_json::Value> = results
                .iter()
                .map(|r| serde_json::json!({ "user": r.user, "status": r.status }))
                .collect();
            return self.print_json(&rows);
        }
        if results.is_empty() {
            println!("{}", "No users found.".dimmed());
            return Ok(());
        }
        for result in results {
            println!(
                "{:<26} {:<24} {}",
                result.user.id.to_string().dimmed(),
                display_name(&result.user),
                status_label(result.status)
            );
        }
        Ok(())
    }

    pub fn status(&self, status: RequestStatus) -> Result<()> {
        if self.json {
            return self.print_json(&status);
        }
        println!("{}", status_label(status));
        Ok(())
    }
}

fn price(amount: f64) -> String {
    format!("₹{:.2}", amount)
}

fn display_name(user: &UserSummary) -> String {
    if user.name.is_empty() {
        user.email.clone()
    } else {
        user.name.clone()
    }
}

fn status_label(status: RequestStatus) -> colored::ColoredString {
    match status {
        RequestStatus::Friend => "FRIEND".green(),
        RequestStatus::Pending => "PENDING".yellow(),
        RequestStatus::None => "NONE".dimmed(),
    }
}
