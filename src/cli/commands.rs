use crate::config::Settings;
use crate::generator::{GeminiClient, InstructionSource, ProxyInstructionClient};
use crate::mealdb::{MealDbClient, RecipeSource};
use crate::pipeline::{ClickTarget, SearchPipeline};
use crate::recipe::{RecipeId, SuggestionQuery, MIN_SUGGESTION_LEN};
use crate::surface::Surfaces;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Instruction source for terminal commands: the server proxy when given,
/// otherwise the generator itself with the key from the environment
fn instruction_source(
    settings: &Settings,
    proxy: Option<&str>,
) -> Result<Arc<dyn InstructionSource>> {
    match proxy {
        Some(server_url) => {
            debug!("Generating instructions through {}", server_url);
            Ok(Arc::new(ProxyInstructionClient::new(
                server_url,
                settings.generator.timeout(),
            )?))
        }
        None => Ok(Arc::new(GeminiClient::new(
            &settings.generator,
            Arc::new(settings.generator.credentials()),
        )?)),
    }
}

fn console_pipeline(settings: &Settings, proxy: Option<&str>) -> Result<SearchPipeline> {
    let recipes: Arc<dyn RecipeSource> = Arc::new(MealDbClient::new(&settings.mealdb)?);
    let generator = instruction_source(settings, proxy)?;

    Ok(SearchPipeline::new(
        recipes,
        generator,
        Surfaces::console(),
        &settings.pipeline,
    ))
}

/// Print suggestions for a partial name
pub async fn suggest(settings: &Settings, query: &str) -> Result<()> {
    let Some(query) = SuggestionQuery::parse(query) else {
        println!("Type at least {MIN_SUGGESTION_LEN} characters to get suggestions");
        return Ok(());
    };

    let pipeline = console_pipeline(settings, None)?;
    let suggestions = pipeline.suggestions().lookup(&query).await?;

    if suggestions.is_empty() {
        println!("No suggestions");
        return Ok(());
    }

    for (index, suggestion) in suggestions.iter().enumerate() {
        println!("  [{index}] {}", suggestion.name);
    }

    Ok(())
}

/// Search by ingredient and print the result cards
pub async fn search(settings: &Settings, ingredient: &str) -> Result<()> {
    let pipeline = console_pipeline(settings, None)?;

    pipeline.set_query(ingredient);
    pipeline.submit().await;

    println!("To view a recipe: recipe-finder show <ID>");
    Ok(())
}

/// Show one recipe and wait for its generated instructions
pub async fn show(settings: &Settings, id: &str, proxy: Option<&str>) -> Result<()> {
    let pipeline = console_pipeline(settings, proxy)?;

    if let Some(generation) = pipeline.open_recipe(&RecipeId::new(id)).await {
        generation
            .await
            .map_err(|e| Error::Internal(format!("Instruction task failed: {e}")))?;
    }

    Ok(())
}

/// One line of input in a browse session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    /// New value of the query field
    Input(String),
    Search,
    Pick(usize),
    Open(usize),
    Close,
    Quit,
}

impl BrowseCommand {
    pub fn parse(line: &str) -> Result<Self> {
        let Some(command) = line.trim().strip_prefix('/') else {
            return Ok(BrowseCommand::Input(line.to_string()));
        };

        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let mut index = || -> Result<usize> {
            parts
                .next()
                .ok_or_else(|| Error::Validation(format!("/{name} needs an index")))?
                .parse()
                .map_err(|_| Error::Validation(format!("/{name} needs a numeric index")))
        };

        match name {
            "search" => Ok(BrowseCommand::Search),
            "pick" => Ok(BrowseCommand::Pick(index()?)),
            "open" => Ok(BrowseCommand::Open(index()?)),
            "close" => Ok(BrowseCommand::Close),
            "quit" | "exit" => Ok(BrowseCommand::Quit),
            other => Err(Error::Validation(format!("Unknown command: /{other}"))),
        }
    }
}

const BROWSE_HELP: &str = "\
Type to edit the query (suggestions appear after a short pause).
  /search     search recipes by the current query
  /pick N     use suggestion N as the query and search
  /open N     open result N
  /close      close the open recipe
  /quit       leave";

/// Line-driven session: each plain line replaces the query field
pub async fn browse(settings: &Settings, proxy: Option<&str>) -> Result<()> {
    let pipeline = console_pipeline(settings, proxy)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{BROWSE_HELP}\n");

    while let Some(line) = lines.next_line().await? {
        let command = match BrowseCommand::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        if command == BrowseCommand::Quit {
            break;
        }
        if let Some(message) = apply(&pipeline, command).await {
            println!("{message}");
        }
    }

    Ok(())
}

/// Run one browse command against the pipeline, returning a line for the user
/// when the command could not act
async fn apply(pipeline: &SearchPipeline, command: BrowseCommand) -> Option<String> {
    match command {
        BrowseCommand::Input(raw) => pipeline.input(&raw),
        BrowseCommand::Search => pipeline.submit().await,
        BrowseCommand::Pick(index) => {
            if !pipeline.select_suggestion(index).await {
                return Some(format!("No suggestion [{index}]"));
            }
        }
        BrowseCommand::Open(index) => {
            if pipeline.results().card(index).is_none() {
                return Some(format!("No result [{index}]"));
            }
            pipeline.click(ClickTarget::Elsewhere);
            // generation keeps running and prints when it lands
            let _ = pipeline.select_card(index).await;
        }
        BrowseCommand::Close => pipeline.click(ClickTarget::CloseButton),
        BrowseCommand::Quit => {}
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::pipeline::detail::DETAIL_NOT_FOUND;
    use crate::pipeline::testing::{summary, FakeGenerator, FakeRecipes};
    use crate::surface::{Content, MemorySurfaces, Notice};

    #[test]
    fn test_plain_lines_are_input() {
        assert_eq!(
            BrowseCommand::parse("chick").unwrap(),
            BrowseCommand::Input("chick".to_string())
        );
        assert_eq!(
            BrowseCommand::parse(" c").unwrap(),
            BrowseCommand::Input(" c".to_string())
        );
        assert_eq!(
            BrowseCommand::parse("").unwrap(),
            BrowseCommand::Input(String::new())
        );
    }

    #[test]
    fn test_commands() {
        assert_eq!(BrowseCommand::parse("/search").unwrap(), BrowseCommand::Search);
        assert_eq!(BrowseCommand::parse("/pick 2").unwrap(), BrowseCommand::Pick(2));
        assert_eq!(BrowseCommand::parse(" /open 0 ").unwrap(), BrowseCommand::Open(0));
        assert_eq!(BrowseCommand::parse("/close").unwrap(), BrowseCommand::Close);
        assert_eq!(BrowseCommand::parse("/quit").unwrap(), BrowseCommand::Quit);
    }

    #[tokio::test]
    async fn test_missing_indices_are_reported() {
        let mut recipes = FakeRecipes::default();
        recipes.by_ingredient.insert(
            "chicken".to_string(),
            vec![summary("52795", "Chicken Handi")],
        );
        let surfaces = MemorySurfaces::new();
        let pipeline = SearchPipeline::new(
            Arc::new(recipes),
            Arc::new(FakeGenerator::default()),
            surfaces.surfaces(),
            &PipelineConfig::default(),
        );

        assert_eq!(
            apply(&pipeline, BrowseCommand::Open(0)).await,
            Some("No result [0]".to_string())
        );
        assert_eq!(
            apply(&pipeline, BrowseCommand::Pick(0)).await,
            Some("No suggestion [0]".to_string())
        );
        assert!(!surfaces.modal.is_visible());

        pipeline.set_query("chicken");
        assert_eq!(apply(&pipeline, BrowseCommand::Search).await, None);
        assert_eq!(
            apply(&pipeline, BrowseCommand::Open(1)).await,
            Some("No result [1]".to_string())
        );
        assert_eq!(apply(&pipeline, BrowseCommand::Open(0)).await, None);
        assert_eq!(
            surfaces.modal.content(),
            Content::Notice(Notice::new(DETAIL_NOT_FOUND))
        );
    }

    #[test]
    fn test_bad_commands() {
        assert!(matches!(
            BrowseCommand::parse("/open"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            BrowseCommand::parse("/pick two"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            BrowseCommand::parse("/dance"),
            Err(Error::Validation(_))
        ));
    }
}
