//! Strict JSON schemas for requesting structured output from a model

use super::Category;
use serde_json::{json, Value};

/// Schema for the classifier output
pub fn classification() -> Value {
    let labels: Vec<&str> = Category::ROUTABLE
        .iter()
        .chain(std::iter::once(&Category::Unknown))
        .map(|c| c.label())
        .collect();

    object(json!({
        "reason": { "type": "string", "description": "The reasoning behind the classification" },
        "category": { "type": "string", "enum": labels, "description": "The category of the customer inquiry" },
        "confidence": { "type": "number", "description": "The confidence level between 0 and 1" }
    }))
}

/// Schema for the responder output of `category`.
///
/// Returns `None` for `Unknown`, which has no responder.
pub fn response(category: Category) -> Option<Value> {
    let properties = match category {
        Category::Books => json!({
            "reason": { "type": "string", "description": "The reason for the book recommendation" },
            "response": { "type": "string", "description": "Personalized book recommendation message" }
        }),
        Category::Clothing => json!({
            "reason": { "type": "string", "description": "The reason for the clothing recommendation" },
            "response": { "type": "string", "description": "Personalized clothing recommendation message" }
        }),
        Category::Retention => json!({
            "offer": { "type": "string", "description": "The retention offer being provided" },
            "discount_percentage": { "type": "number", "description": "Discount percentage offered" },
            "response": { "type": "string", "description": "Personalized retention message to the customer" }
        }),
        Category::Order => json!({
            "human_approval_required": { "type": "boolean", "description": "Whether human approval is required" },
            "order_item_name": { "type": "string", "description": "Name of the item to be ordered" },
            "item_id": { "type": "integer", "description": "Unique identifier of the item" },
            "order_id": { "type": "integer", "description": "Unique identifier for the order" },
            "order_amount": { "type": "number", "description": "Total amount for the order in USD" },
            "response": { "type": "string", "description": "Next steps for completing the order" }
        }),
        Category::Unknown => return None,
    };
    Some(object(properties))
}

/// Wrap properties in a strict object schema where every property is required
fn object(properties: Value) -> Value {
    let required: Vec<String> = properties
        .as_object()
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
        "additionalProperties": false
    })
}
