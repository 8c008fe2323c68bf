//! Prompt templates for the advisor persona.

use advisor_core::error::{AdvisorError, Result};
use advisor_core::product::Product;
use minijinja::{Environment, context};
use once_cell::sync::Lazy;

/// System message sent with routine generation requests.
pub const ROUTINE_SYSTEM_PROMPT: &str = "You are a professional L'Oréal beauty advisor \
specializing in creating personalized skincare and beauty routines.";

/// Opening assistant turn of every session.
pub const WELCOME_MESSAGE: &str = "Hi! I'm your L'Oréal beauty advisor. Browse the products \
and I'll help you build the perfect routine when you're ready!";

const CHAT_SYSTEM_TEMPLATE: &str = r#"You are an expert L'Oréal beauty advisor with extensive knowledge of current beauty products, ingredients, and trends.
Your job is to guide people toward the right L'Oréal-owned products and help them build effective routines that fit their needs and concerns.

BRAND EXPERTISE:
{%- for brand in brands %}
- {{ brand.name }}: {{ brand.focus }}
{%- endfor %}

KEY GUIDELINES:
- Mention specific product names, key ingredients, and benefits when recommending
- Ask follow-up questions about skin type, concerns, lifestyle, and preferences
- Suggest complete routines with morning and evening steps
- Use conversation history to provide personalized, contextual responses
- Match response length to the complexity of the question
- Focus exclusively on L'Oréal family brands and related beauty topics{{ context_suffix }}{{ web_results }}"#;

const ROUTINE_TEMPLATE: &str = r#"Create a comprehensive, personalized skincare and beauty routine.

Cover:
1. Morning and evening steps, plus weekly treatments
2. Order of application, amounts and wait times
3. How the products work together and what not to combine
4. Realistic timelines for results
5. Adjustments for seasons and sensitive skin

SELECTED PRODUCTS TO WORK WITH:
{%- for product in products %}
- {{ product.name }} by {{ product.brand }} ({{ product.category }}): {{ product.description }}
{%- endfor %}

Create an encouraging, professional routine that maximizes these specific products' benefits."#;

struct Brand {
    name: &'static str,
    focus: &'static str,
}

const BRANDS: &[Brand] = &[
    Brand {
        name: "L'Oréal Paris",
        focus: "Anti-aging, color cosmetics, hair care innovations",
    },
    Brand {
        name: "CeraVe",
        focus: "Dermatologist-developed skincare with ceramides",
    },
    Brand {
        name: "Maybelline",
        focus: "Trendy makeup, mascaras, foundations, lip products",
    },
    Brand {
        name: "Garnier",
        focus: "Natural ingredients, sustainable beauty, hair care",
    },
    Brand {
        name: "Urban Decay",
        focus: "Bold makeup, eyeshadows, long-lasting formulas",
    },
    Brand {
        name: "Lancôme",
        focus: "Luxury skincare and makeup",
    },
    Brand {
        name: "Kiehl's",
        focus: "Apothecary-style skincare with proven ingredients",
    },
];

static TEMPLATES: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template("chat_system", CHAT_SYSTEM_TEMPLATE)
        .expect("chat system template is valid");
    env.add_template("routine", ROUTINE_TEMPLATE)
        .expect("routine template is valid");
    env
});

/// Renders the chat system instructions.
///
/// `context_suffix` and `web_results` are injected verbatim; both carry their
/// own leading blank lines when non-empty.
pub fn render_chat_system_prompt(context_suffix: &str, web_results: &str) -> Result<String> {
    let brands: Vec<_> = BRANDS
        .iter()
        .map(|brand| context! { name => brand.name, focus => brand.focus })
        .collect();

    render(
        "chat_system",
        context! { brands, context_suffix, web_results },
    )
}

/// Renders the routine request listing every selected product.
pub fn render_routine_prompt(products: &[Product]) -> Result<String> {
    render("routine", context! { products })
}

fn render(name: &str, ctx: minijinja::Value) -> Result<String> {
    TEMPLATES
        .get_template(name)
        .and_then(|template| template.render(ctx))
        .map_err(|e| AdvisorError::internal(format!("failed to render prompt '{name}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: i64, name: &str, brand: &str, category: &str, description: &str) -> Product {
        Product {
            id,
            name: name.into(),
            brand: brand.into(),
            category: category.into(),
            description: description.into(),
            image: String::new(),
        }
    }

    #[test]
    fn chat_prompt_lists_brands_and_appends_context() {
        let prompt = render_chat_system_prompt(
            "\n\nThe customer has not selected any products yet.",
            "\n\nCURRENT WEB INFORMATION:\n1. x",
        )
        .unwrap();

        assert!(prompt.contains("- CeraVe: Dermatologist-developed skincare with ceramides"));
        assert!(prompt.contains("- Kiehl's: Apothecary-style"));
        assert!(prompt.ends_with(
            "related beauty topics\n\nThe customer has not selected any products yet.\n\nCURRENT WEB INFORMATION:\n1. x"
        ));
    }

    #[test]
    fn routine_prompt_lists_each_product() {
        let prompt = render_routine_prompt(&[
            product(1, "Foaming Cleanser", "CeraVe", "cleanser", "Removes oil"),
            product(2, "Revitalift Serum", "L'Oréal Paris", "skincare", "Plumps skin"),
        ])
        .unwrap();

        assert!(prompt.contains("\n- Foaming Cleanser by CeraVe (cleanser): Removes oil\n"));
        assert!(prompt.contains("- Revitalift Serum by L'Oréal Paris (skincare): Plumps skin"));
    }
}
