//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use crate::catalog::Category;
use crate::filters;
use crate::state::AppState;

/// A single slide in the hero carousel.
///
/// Static content; the catalog document does not drive the hero.
#[derive(Clone)]
pub struct HeroSlide {
    pub image_path: String,
    pub image_alt: String,
    pub title: Option<String>,
    pub subtitle: Option<String>,
}

/// The hero slides shown on the home page.
fn hero_slides() -> Vec<HeroSlide> {
    vec![
        HeroSlide {
            image_path: "/assets/images/hero-surf.jpg".to_string(),
            image_alt: "Surfer at dawn".to_string(),
            title: Some("Coast to Coast".to_string()),
            subtitle: Some("Gear for every shoreline".to_string()),
        },
        HeroSlide {
            image_path: "/assets/images/hero-boards.jpg".to_string(),
            image_alt: "Row of boards on a beach".to_string(),
            title: None,
            subtitle: None,
        },
        HeroSlide {
            image_path: "/assets/images/hero-cliffs.jpg".to_string(),
            image_alt: "Cliff coastline".to_string(),
            title: Some("New season stock".to_string()),
            subtitle: None,
        },
    ]
}

/// Category tile display data for the catalog grid.
#[derive(Clone)]
pub struct CategoryTileView {
    pub href: String,
    pub name: String,
    pub image: String,
}

impl From<&Category> for CategoryTileView {
    fn from(category: &Category) -> Self {
        Self {
            href: format!("/category?id={}", urlencoding::encode(category.id.as_str())),
            name: category.name.clone(),
            image: category
                .image
                .clone()
                .unwrap_or_else(|| "/assets/images/insert_image.jpg".to_string()),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home/index.html")]
pub struct HomeTemplate {
    pub slides: Vec<HeroSlide>,
    pub categories: Vec<CategoryTileView>,
}

/// Display the home page.
///
/// An empty catalog renders an empty grid; the page itself never fails.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let index = state.catalog().load().await;

    HomeTemplate {
        slides: hero_slides(),
        categories: index.categories().iter().map(CategoryTileView::from).collect(),
    }
}
