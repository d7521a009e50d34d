//! Static store data and responder instructions
//!
//! Each responder is configured once at startup with these instructions and
//! reused for every turn.

use crate::contracts::Category;

pub const BOOK_INVENTORY: &str = r#"Available Books:
1. "The Midnight Library" by Matt Haig - $16.99 (12 in stock)
2. "Atomic Habits" by James Clear - $19.99 (25 in stock)
3. "The Psychology of Money" by Morgan Housel - $18.50 (8 in stock)
4. "Project Hail Mary" by Andy Weir - $21.99 (15 in stock)
5. "The Thursday Murder Club" by Richard Osman - $17.99 (20 in stock)"#;

pub const CLOTHING_INVENTORY: &str = r#"Available Women's Clothing:
1. "Elegant Silk Blouse" - Size M - $89.99 (10 in stock)
2. "Classic Denim Jacket" - Size L - $124.99 (5 in stock)
3. "Floral Summer Dress" - Size S - $79.99 (18 in stock)
4. "Cashmere Cardigan" - Size M - $149.99 (7 in stock)
5. "High-Waist Trousers" - Size L - $94.99 (12 in stock)"#;

pub const CLASSIFIER_INSTRUCTIONS: &str = "Analyze the customer's latest query in the context \
of the conversation and categorize it into: books, clothing, retention, or order. \
Use unknown when none of these fit. Report a confidence between 0 and 1.";

/// Fixed instructions for the responder of `category`.
///
/// Returns `None` for `Unknown`, which has no responder.
pub fn responder_instructions(category: Category) -> Option<String> {
    let instructions = match category {
        Category::Books => {
            format!("You are a book specialist. Use this inventory:\n{BOOK_INVENTORY}")
        }
        Category::Clothing => {
            format!("You are a clothing specialist. Use this inventory:\n{CLOTHING_INVENTORY}")
        }
        Category::Retention => {
            "Offer a 25% discount to retain customers. Be persuasive.".to_string()
        }
        Category::Order => format!(
            "Guide the customer through placing orders from the store inventory. \
             Always set human_approval_required=true for finalized orders.\n\n\
             {BOOK_INVENTORY}\n\n{CLOTHING_INVENTORY}"
        ),
        Category::Unknown => return None,
    };
    Some(instructions)
}
