//! # Line Shell
//!
//! One command per line on stdin, one JSON response per line on stdout.
//!
//! ```text
//! > add fresh-milk
//! {"items":[{"id":"fresh-milk",...,"quantity":1}],"itemCount":1,"total":499}
//! > qty fresh-milk 5
//! {"items":[...],"itemCount":5,"total":2495}
//! > checkout
//! {"phase":"checkoutForm","drawerOpen":true,"canProceed":false,"pending":null}
//! > buy jo@example.com 555-0100 1 Farm Lane
//! {"pending":{"orderRef":"...","notice":"Payment link sent to your email!",...}}
//! ```

use std::str::FromStr;

use mildar_core::{CartCommand, ContactDetails};
use serde::Serialize;
use serde_json::Value;

use crate::commands::{cart, catalog, checkout};
use crate::error::ApiError;
use crate::state::AppState;

pub const HELP: &str = "\
products                      list product cards
product <id>                  show one product
cart                          show the cart
add <id>                      add one unit of a product
remove <id>                   remove a line
qty <id> <n>                  set a line's quantity (n <= 0 removes)
clear                         empty the cart
dispatch <json>               apply a raw cart command
open | close                  show / hide the cart drawer
checkout                      proceed to checkout
back                          back to the cart
buy <email> <phone> <address> submit the order
cancel                        cancel the pending payment
status                        show the drawer state
quit                          exit";

/// A parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Products,
    Product(String),
    Cart,
    Add(String),
    Remove(String),
    Quantity(String, i64),
    Clear,
    Dispatch(CartCommand),
    Open,
    Close,
    Checkout,
    Back,
    Buy(ContactDetails),
    Cancel,
    Status,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let args: Vec<&str> = rest.split_whitespace().collect();

        let one_id = |usage: &str| -> Result<String, ApiError> {
            match args.as_slice() {
                [id] => Ok(id.to_string()),
                _ => Err(ApiError::bad_request(format!("usage: {}", usage))),
            }
        };

        let command = match verb.to_lowercase().as_str() {
            "products" => ShellCommand::Products,
            "product" => ShellCommand::Product(one_id("product <id>")?),
            "cart" => ShellCommand::Cart,
            "add" => ShellCommand::Add(one_id("add <id>")?),
            "remove" | "rm" => ShellCommand::Remove(one_id("remove <id>")?),
            "qty" => match args.as_slice() {
                [id, n] => {
                    let quantity = n
                        .parse()
                        .map_err(|_| ApiError::bad_request(format!("not a quantity: {}", n)))?;
                    ShellCommand::Quantity(id.to_string(), quantity)
                }
                _ => return Err(ApiError::bad_request("usage: qty <id> <n>")),
            },
            "clear" => ShellCommand::Clear,
            "dispatch" => {
                let command = serde_json::from_str(rest)
                    .map_err(|e| ApiError::bad_request(format!("invalid cart command: {}", e)))?;
                ShellCommand::Dispatch(command)
            }
            "open" => ShellCommand::Open,
            "close" => ShellCommand::Close,
            "checkout" => ShellCommand::Checkout,
            "back" => ShellCommand::Back,
            "buy" => ShellCommand::Buy(ContactDetails {
                email: args.first().unwrap_or(&"").to_string(),
                phone: args.get(1).unwrap_or(&"").to_string(),
                address: args.get(2..).map(|a| a.join(" ")).unwrap_or_default(),
            }),
            "cancel" => ShellCommand::Cancel,
            "status" => ShellCommand::Status,
            "help" | "?" => ShellCommand::Help,
            "quit" | "exit" => ShellCommand::Quit,
            "" => return Err(ApiError::bad_request("empty command")),
            other => return Err(ApiError::bad_request(format!("unknown command: {}", other))),
        };
        Ok(command)
    }
}

/// Runs one command against the state and renders the response as JSON.
///
/// `Quit` renders as `null`; the caller decides to stop.
pub fn execute(state: &AppState, command: ShellCommand) -> Result<Value, ApiError> {
    match command {
        ShellCommand::Products => to_json(&catalog::list_products(&state.catalog)),
        ShellCommand::Product(id) => to_json(&catalog::get_product(&state.catalog, &id)?),
        ShellCommand::Cart => to_json(&cart::get_cart(&state.cart)),
        ShellCommand::Add(id) => to_json(&cart::add_to_cart(&state.catalog, &state.cart, &id)?),
        ShellCommand::Remove(id) => to_json(&cart::remove_from_cart(&state.cart, &id)),
        ShellCommand::Quantity(id, n) => to_json(&cart::update_cart_item(&state.cart, &id, n)),
        ShellCommand::Clear => to_json(&cart::clear_cart(&state.cart)),
        ShellCommand::Dispatch(command) => to_json(&cart::dispatch(&state.cart, command)?),
        ShellCommand::Open => to_json(&checkout::open_cart(&state.checkout)),
        ShellCommand::Close => to_json(&checkout::close_cart(&state.checkout)),
        ShellCommand::Checkout => to_json(&checkout::proceed_to_checkout(&state.checkout)?),
        ShellCommand::Back => to_json(&checkout::back_to_cart(&state.checkout)?),
        ShellCommand::Buy(contact) => to_json(&checkout::buy_now(&state.checkout, contact)?),
        ShellCommand::Cancel => to_json(&checkout::cancel_payment(&state.checkout)?),
        ShellCommand::Status => to_json(&checkout::get_checkout(&state.checkout)),
        ShellCommand::Help => Ok(Value::String(HELP.to_string())),
        ShellCommand::Quit => Ok(Value::Null),
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn parse(line: &str) -> Result<ShellCommand, ApiError> {
        line.parse()
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("add fresh-milk").unwrap(), ShellCommand::Add("fresh-milk".into()));
        assert_eq!(
            parse("  qty fresh-milk -1 ").unwrap(),
            ShellCommand::Quantity("fresh-milk".into(), -1)
        );
        assert_eq!(parse("CART").unwrap(), ShellCommand::Cart);
        assert_eq!(
            parse("buy jo@example.com 555-0100 1 Farm Lane").unwrap(),
            ShellCommand::Buy(ContactDetails {
                email: "jo@example.com".into(),
                phone: "555-0100".into(),
                address: "1 Farm Lane".into(),
            })
        );
        assert_eq!(parse("buy").unwrap(), ShellCommand::Buy(ContactDetails::default()));
        assert_eq!(
            parse(r#"dispatch {"type":"REMOVE_ITEM","payload":"ice-cream"}"#).unwrap(),
            ShellCommand::Dispatch(CartCommand::RemoveItem("ice-cream".into()))
        );
    }

    #[test]
    fn test_parse_errors() {
        for line in ["", "dance", "add", "add a b", "qty milk", "qty milk lots", "dispatch {"] {
            let err = parse(line).unwrap_err();
            assert_eq!(err.code, ErrorCode::BadRequest, "{line}");
        }
    }

    #[test]
    fn test_execute_cart_flow() {
        let state = AppState::in_memory();

        execute(&state, parse("add fresh-milk").unwrap()).unwrap();
        let cart = execute(&state, parse("add fresh-milk").unwrap()).unwrap();
        assert_eq!(cart["itemCount"], 2);
        assert_eq!(cart["total"], 998);

        let cart = execute(&state, parse("qty fresh-milk 5").unwrap()).unwrap();
        assert_eq!(cart["total"], 2495);

        let err = execute(&state, parse("add goat-milk").unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);

        let status = execute(&state, parse("status").unwrap()).unwrap();
        assert_eq!(status["phase"], "browsing");
        assert_eq!(status["canProceed"], true);

        let status = execute(&state, parse("checkout").unwrap()).unwrap();
        assert_eq!(status["phase"], "checkoutForm");

        assert_eq!(execute(&state, ShellCommand::Quit).unwrap(), Value::Null);
    }

    #[test]
    fn test_dispatch_negative_price_is_rejected() {
        let state = AppState::in_memory();
        let line = r#"dispatch {"type":"ADD_ITEM","payload":{"id":"kefir","name":"Kefir","price":-500,"image":"","unit":"per bottle"}}"#;

        let err = execute(&state, parse(line).unwrap()).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let cart = execute(&state, parse("cart").unwrap()).unwrap();
        assert_eq!(cart["itemCount"], 0);
        assert_eq!(cart["total"], 0);
    }
}
