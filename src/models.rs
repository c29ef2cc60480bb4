use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Encoded password hash, never the plaintext.
    pub password: String,
    pub cart: Cart,
}

/// A user as returned over HTTP, without the password hash.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub cart: Cart,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            cart: user.cart,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub price: Decimal,
    pub description: String,
}

/// A user's cart. Repeated entries of the same item represent quantity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<Item>,
    pub total: Decimal,
}

impl Cart {
    pub fn new(id: i64, user_id: i64) -> Self {
        Cart {
            id,
            user_id,
            ..Cart::default()
        }
    }

    pub fn add_item(&mut self, item: &Item, quantity: u32) {
        self.items
            .extend(std::iter::repeat(item).take(quantity as usize).cloned());
        self.recompute_total();
    }

    /// Removes up to `quantity` entries of the item. Removing more than the
    /// cart holds just empties it of that item.
    pub fn remove_item(&mut self, item_id: i64, quantity: u32) {
        let mut remaining = quantity;
        self.items.retain(|entry| {
            if remaining > 0 && entry.id == item_id {
                remaining -= 1;
                false
            } else {
                true
            }
        });
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total = self.items.iter().map(|item| item.price).sum();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOrder {
    pub id: i64,
    pub user_id: i64,
    pub items: Vec<Item>,
    pub total: Decimal,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifyCartRequest {
    pub username: String,
    pub item_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[cfg(test)]
mod tests {
    use crate::test_helpers::dec;

    use super::*;

    fn widget(id: i64, price: Decimal) -> Item {
        Item {
            id,
            name: format!("widget-{id}"),
            price,
            description: "a widget".to_string(),
        }
    }

    #[test]
    fn new_cart_is_empty_with_zero_total() {
        let cart = Cart::new(3, 7);

        assert!(cart.items.is_empty());
        assert_eq!(cart.total, Decimal::ZERO);
        assert_eq!(cart.user_id, 7);
    }

    #[test]
    fn adding_repeats_the_item_and_sums_prices() {
        let mut cart = Cart::new(1, 1);

        cart.add_item(&widget(1, dec("2.99")), 3);

        assert_eq!(cart.items.len(), 3);
        assert_eq!(cart.total, dec("8.97"));
    }

    #[test]
    fn removing_only_touches_the_requested_item() {
        let mut cart = Cart::new(1, 1);
        cart.add_item(&widget(1, dec("2.99")), 2);
        cart.add_item(&widget(2, dec("1.99")), 2);

        cart.remove_item(1, 1);

        assert_eq!(cart.items.iter().filter(|i| i.id == 1).count(), 1);
        assert_eq!(cart.items.iter().filter(|i| i.id == 2).count(), 2);
        assert_eq!(cart.total, dec("6.97"));
    }

    #[test]
    fn removing_more_than_present_empties_that_item() {
        let mut cart = Cart::new(1, 1);
        cart.add_item(&widget(1, dec("2.99")), 1);
        cart.add_item(&widget(2, dec("1.99")), 1);

        cart.remove_item(1, 5);

        assert_eq!(cart.items, vec![widget(2, dec("1.99"))]);
        assert_eq!(cart.total, dec("1.99"));
    }

    #[test]
    fn removing_an_absent_item_keeps_the_cart() {
        let mut cart = Cart::new(1, 1);
        cart.add_item(&widget(1, dec("2.99")), 1);

        cart.remove_item(9, 1);

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total, dec("2.99"));
    }

    #[test]
    fn user_response_omits_password() {
        let user = User {
            id: 0,
            username: "test".to_string(),
            password: "thisIsHashed".to_string(),
            cart: Cart::new(0, 0),
        };

        let body = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(body["username"], "test");
        assert!(body.get("password").is_none());
    }

    #[test]
    fn responses_use_camel_case_fields() {
        let order = UserOrder {
            id: 2,
            user_id: 7,
            items: Vec::new(),
            total: Decimal::ZERO,
        };

        let cart = serde_json::to_value(Cart::new(3, 7)).unwrap();
        let order = serde_json::to_value(order).unwrap();

        assert_eq!(cart["userId"], 7);
        assert!(cart.get("user_id").is_none());
        assert_eq!(order["userId"], 7);
    }

    #[test]
    fn modify_cart_request_reads_camel_case() {
        let request: ModifyCartRequest =
            serde_json::from_str(r#"{"username":"test","itemId":1,"quantity":2}"#).unwrap();

        assert_eq!(request.item_id, 1);
        assert_eq!(request.quantity, 2);
    }
}
