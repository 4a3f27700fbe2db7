//! Menu listing commands.

use blue_flame_core::CategoryFilter;
use blue_flame_ordering::{Backend, MenuView, OrderSession};

use super::CommandError;

/// Print the menu, optionally limited to one category.
///
/// An unknown category falls back to the full menu.
///
/// # Errors
///
/// Returns an error if the menu could not be loaded.
pub async fn list<B: Backend>(
    session: &mut OrderSession<B>,
    category: Option<&str>,
) -> Result<(), CommandError> {
    super::load_menu(session).await?;

    if let Some(label) = category {
        let selected = session.select_category(CategoryFilter::from_label(label));
        if selected.label() != label {
            tracing::warn!(category = label, "No such category, showing all");
        }
    }

    #[allow(clippy::print_stdout)]
    {
        match session.menu_view() {
            MenuView::Loading => println!("Loading menu..."),
            MenuView::Items(cards) => {
                println!("== {} ==", session.selected_category());
                for card in cards {
                    println!("{:>6}  {:<28} {:>9}", card.id, card.name, card.price);
                    if !card.description.is_empty() {
                        println!("        {}", card.description);
                    }
                    println!("        [{}] {}", card.category, card.image_or_placeholder());
                }
            }
        }
    }
    Ok(())
}

/// Print the category filter options.
///
/// # Errors
///
/// Returns an error if the menu could not be loaded.
pub async fn categories<B: Backend>(session: &mut OrderSession<B>) -> Result<(), CommandError> {
    super::load_menu(session).await?;

    #[allow(clippy::print_stdout)]
    {
        for category in session.categories() {
            println!("{category}");
        }
    }
    Ok(())
}
