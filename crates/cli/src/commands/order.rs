//! Order placement command.

use std::str::FromStr;

use blue_flame_core::{CustomerField, MenuItemId};
use blue_flame_ordering::{Backend, CartView, OrderSession};
use tracing::info;

use super::CommandError;

/// A menu item and quantity given on the command line as `ID` or `ID:QTY`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub id: MenuItemId,
    pub quantity: u32,
}

impl FromStr for ItemSpec {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CommandError::InvalidItem(s.to_owned());

        let (id, quantity) = match s.rsplit_once(':') {
            Some((id, qty)) => (id, qty.parse::<u32>().map_err(|_| invalid())?),
            None => (s, 1),
        };

        if id.is_empty() || quantity == 0 {
            return Err(invalid());
        }
        Ok(Self {
            id: MenuItemId::new(id),
            quantity,
        })
    }
}

/// Delivery details from the command line.
#[derive(Debug, Clone)]
pub struct CustomerArgs {
    pub name: String,
    pub email: String,
    pub address: String,
}

/// Build a cart from `items` and submit it.
///
/// # Errors
///
/// Returns an error if the menu cannot be loaded, an item is not on the
/// menu, or checkout fails.
pub async fn place<B: Backend>(
    session: &mut OrderSession<B>,
    customer: &CustomerArgs,
    items: &[ItemSpec],
) -> Result<(), Box<dyn std::error::Error>> {
    super::load_menu(session).await?;

    session.set_customer_field(CustomerField::Name, customer.name.as_str());
    session.set_customer_field(CustomerField::Email, customer.email.as_str());
    session.set_customer_field(CustomerField::Address, customer.address.as_str());

    for item in items {
        session.add_to_cart(&item.id)?;
        if item.quantity > 1 {
            let current = session
                .cart()
                .line(&item.id)
                .map_or(1, |line| i64::from(line.quantity.get()));
            session.set_quantity(&item.id, current + i64::from(item.quantity) - 1);
        }
    }

    print_cart(&session.cart_view());
    info!(lines = session.cart().lines().len(), "Submitting order");

    match session.checkout().await {
        Ok(outcome) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", outcome.user_message());
            }
            Ok(())
        }
        Err(e) => {
            #[allow(clippy::print_stdout)]
            {
                println!("{}", e.user_message());
            }
            Err(e.into())
        }
    }
}

fn print_cart(cart: &CartView) {
    #[allow(clippy::print_stdout)]
    {
        for item in &cart.items {
            println!(
                "{:>3} x {:<28} {:>9} {:>9}",
                item.quantity, item.name, item.price, item.line_price
            );
        }
        println!("{:>52}", format!("Subtotal {}", cart.subtotal));
        println!("{:>52}", format!("Tax {}", cart.tax));
        println!("{:>52}", format!("Total {}", cart.total));
    }
}
