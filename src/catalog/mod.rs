//! Storefront reference data
//!
//! The game list and recent orders are fixed at process start and only ever
//! read. Analytics events live in [`event`] since they are per-request.

mod event;

pub use event::AnalyticsEvent;

use serde::Serialize;

/// Catalog item served by `GET /api/games`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    /// ISO date, e.g. `2023-01-15`
    pub release_date: String,
}

/// Order summary served by `GET /api/orders`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: i64,
    pub customer_name: String,
    pub total_price: f64,
    /// ISO date, e.g. `2025-08-01`
    pub order_date: String,
}

/// Immutable games and orders collections
#[derive(Debug, Clone)]
pub struct Catalog {
    games: Vec<Game>,
    orders: Vec<Order>,
}

impl Catalog {
    /// The storefront's built-in data set
    pub fn builtin() -> Self {
        Self {
            games: vec![
                game(1, "Adventure Game", "Adventure", 19.99, "2023-01-15"),
                game(2, "Racing Simulator", "Racing", 29.99, "2022-05-20"),
            ],
            orders: vec![
                order(101, "John Doe", 49.98, "2025-08-01"),
                order(102, "Jane Smith", 29.99, "2025-08-05"),
            ],
        }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }
}

fn game(id: i64, name: &str, category: &str, price: f64, release_date: &str) -> Game {
    Game {
        id,
        name: name.to_string(),
        category: category.to_string(),
        price,
        release_date: release_date.to_string(),
    }
}

fn order(id: i64, customer_name: &str, total_price: f64, order_date: &str) -> Order {
    Order {
        id,
        customer_name: customer_name.to_string(),
        total_price,
        order_date: order_date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_games_serialize_in_declared_order() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string(catalog.games()).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Adventure Game","category":"Adventure","price":19.99,"release_date":"2023-01-15"},{"id":2,"name":"Racing Simulator","category":"Racing","price":29.99,"release_date":"2022-05-20"}]"#
        );
    }

    #[test]
    fn test_orders_serialize_in_declared_order() {
        let catalog = Catalog::builtin();
        let json = serde_json::to_string(catalog.orders()).unwrap();
        assert_eq!(
            json,
            r#"[{"id":101,"customer_name":"John Doe","total_price":49.98,"order_date":"2025-08-01"},{"id":102,"customer_name":"Jane Smith","total_price":29.99,"order_date":"2025-08-05"}]"#
        );
    }

    #[test]
    fn test_ids_are_unique() {
        let catalog = Catalog::builtin();
        let mut ids: Vec<i64> = catalog.games().iter().map(|g| g.id).collect();
        ids.extend(catalog.orders().iter().map(|o| o.id));
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }
}
