use super::{Content, Notice, RecipeCard};
use crate::recipe::{RecipeDetail, Suggestion};
use crate::Result;
use askama::Template;

#[derive(Template)]
#[template(path = "surface/loading.html")]
struct LoadingTemplate<'a> {
    message: &'a str,
}

#[derive(Template)]
#[template(path = "surface/notice.html")]
struct NoticeTemplate<'a> {
    notice: &'a Notice,
}

#[derive(Template)]
#[template(path = "surface/suggestions.html")]
struct SuggestionsTemplate<'a> {
    suggestions: &'a [Suggestion],
}

#[derive(Template)]
#[template(path = "surface/cards.html")]
struct CardsTemplate<'a> {
    cards: &'a [RecipeCard],
}

#[derive(Template)]
#[template(path = "surface/recipe.html")]
struct RecipeTemplate<'a> {
    recipe: &'a RecipeDetail,
    video_url: Option<&'a str>,
    instructions: String,
}

#[derive(Template)]
#[template(path = "surface/instructions.html")]
struct InstructionsTemplate<'a> {
    lines: &'a [String],
    notice: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "surface/text.html")]
struct TextTemplate<'a> {
    text: &'a str,
}

fn recipe_html(recipe: &RecipeDetail, instructions: String) -> Result<String> {
    Ok(RecipeTemplate {
        recipe,
        video_url: recipe.video_url.as_deref(),
        instructions,
    }
    .render()?)
}

/// HTML fragment for one surface's content; text is always escaped
pub fn render_html(content: &Content) -> Result<String> {
    let html = match content {
        Content::Empty => String::new(),
        Content::Text(text) => TextTemplate { text }.render()?,
        Content::Loading(message) => LoadingTemplate { message }.render()?,
        Content::Notice(notice) => NoticeTemplate { notice }.render()?,
        Content::Suggestions(suggestions) => SuggestionsTemplate { suggestions }.render()?,
        Content::Cards(cards) => CardsTemplate { cards }.render()?,
        Content::Recipe(recipe) => recipe_html(recipe, String::new())?,
        Content::Instructions(text) => InstructionsTemplate {
            lines: text.lines(),
            notice: None,
        }
        .render()?,
        Content::InstructionsUnavailable { notice, standard } => InstructionsTemplate {
            lines: standard.as_ref().map(|t| t.lines()).unwrap_or_default(),
            notice: Some(notice.as_str()),
        }
        .render()?,
    };

    Ok(html)
}

/// Modal body with the instructions region rendered in place
pub fn render_modal(modal: &Content, instructions: &Content) -> Result<String> {
    match modal {
        Content::Recipe(recipe) => recipe_html(recipe, render_html(instructions)?),
        other => render_html(other),
    }
}
