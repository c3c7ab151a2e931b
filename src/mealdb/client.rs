use crate::config::MealDbConfig;
use crate::mealdb::models::MealsResponse;
use crate::recipe::{RecipeDetail, RecipeId, RecipeSummary, SearchQuery, SuggestionQuery};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Read access to the recipe database
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Meals whose name contains the query, in upstream relevance order
    async fn search_by_name(&self, query: &SuggestionQuery) -> Result<Vec<RecipeSummary>>;

    /// Meals using the given main ingredient
    async fn filter_by_ingredient(&self, query: &SearchQuery) -> Result<Vec<RecipeSummary>>;

    /// Full record for one meal, `None` when the id is unknown
    async fn lookup(&self, id: &RecipeId) -> Result<Option<RecipeDetail>>;
}

/// HTTP client for TheMealDB-style JSON API
#[derive(Clone)]
pub struct MealDbClient {
    client: Client,
    base_url: String,
}

impl MealDbClient {
    pub fn new(config: &MealDbConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let url = Url::parse_with_params(&format!("{}/{}", self.base_url, path), params)?;
        Ok(url)
    }

    async fn get_meals(&self, url: Url) -> Result<MealsResponse> {
        debug!("Recipe database request: GET {}", url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::UpstreamStatus {
                service: "recipe database".to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            Error::UnexpectedResponse(format!("Failed to parse recipe database response: {e}"))
        })
    }
}

#[async_trait]
impl RecipeSource for MealDbClient {
    async fn search_by_name(&self, query: &SuggestionQuery) -> Result<Vec<RecipeSummary>> {
        let url = self.endpoint("search.php", &[("s", query.as_str())])?;
        let meals = self.get_meals(url).await?.into_meals();
        debug!("Name search '{}' matched {} meals", query.as_str(), meals.len());
        Ok(meals.iter().map(|m| m.summary()).collect())
    }

    async fn filter_by_ingredient(&self, query: &SearchQuery) -> Result<Vec<RecipeSummary>> {
        let url = self.endpoint("filter.php", &[("i", query.as_str())])?;
        let meals = self.get_meals(url).await?.into_meals();
        debug!("Ingredient filter '{}' matched {} meals", query, meals.len());
        Ok(meals.iter().map(|m| m.summary()).collect())
    }

    async fn lookup(&self, id: &RecipeId) -> Result<Option<RecipeDetail>> {
        let url = self.endpoint("lookup.php", &[("i", id.as_str())])?;
        let meal = self.get_meals(url).await?.into_meals().into_iter().next();
        Ok(meal.map(|m| m.into_detail()))
    }
}
