//! # Conversation Controller Module
//!
//! The per-user browse flow: Idle → AwaitingCategory → AwaitingRecipeChoice → Idle.
//! Every catalog or translation failure is turned into a reply here; nothing
//! escapes to the transport except the outbound message.

use std::sync::Arc;

use rand::Rng;
use teloxide::types::UserId;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::errors::{ArgumentProblem, CatalogStep, FlowError};
use crate::localization::LocalizationManager;
use crate::recipe::{Category, Ingredient, RecipeDetail, RecipeSummary};
use crate::session::{ConversationState, SessionStore};
use crate::translation::Translator;

/// Command token that starts a flow, without the leading slash
pub const INITIATE_COMMAND: &str = "category_search_random";

/// Count shown in help texts
const EXAMPLE_COUNT: &str = "3";

/// What the transport should send back: text plus an optional choice menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub choices: Option<Vec<String>>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: None,
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            text: text.into(),
            choices: Some(choices),
        }
    }
}

/// Parse the count argument of the initiating command.
///
/// Only the first whitespace-separated token is considered.
pub fn parse_count(argument: &str) -> Result<u32, FlowError> {
    let token = argument
        .split_whitespace()
        .next()
        .ok_or(FlowError::InvalidArgument(ArgumentProblem::Missing))?;

    match token.parse::<u32>() {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(FlowError::InvalidArgument(ArgumentProblem::NotPositiveInteger)),
    }
}

/// Uniform sample of `min(count, recipes.len())` recipes without replacement.
///
/// The returned order is the sampling order.
pub fn sample_candidates<R: Rng + ?Sized>(
    recipes: &[RecipeSummary],
    count: usize,
    rng: &mut R,
) -> Vec<RecipeSummary> {
    let amount = count.min(recipes.len());
    rand::seq::index::sample(rng, recipes.len(), amount)
        .into_iter()
        .map(|i| recipes[i].clone())
        .collect()
}

/// First candidate whose displayed label equals `text` exactly
pub fn resolve_choice<'a>(
    candidates: &'a [RecipeSummary],
    text: &str,
) -> Result<&'a RecipeSummary, FlowError> {
    candidates
        .iter()
        .find(|candidate| candidate.label() == text)
        .ok_or_else(|| FlowError::NoMatch(text.to_string()))
}

pub struct ConversationController {
    catalog: Arc<dyn Catalog>,
    translator: Arc<dyn Translator>,
    sessions: Arc<dyn SessionStore>,
    localization: Arc<LocalizationManager>,
    target_language: String,
    ui_language: String,
}

impl ConversationController {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        translator: Arc<dyn Translator>,
        sessions: Arc<dyn SessionStore>,
        localization: Arc<LocalizationManager>,
        target_language: impl Into<String>,
        ui_language: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            translator,
            sessions,
            localization,
            target_language: target_language.into(),
            ui_language: ui_language.into(),
        }
    }

    /// Start (or restart) a flow for `user` with the raw command argument
    pub async fn on_initiate_command(&self, user: UserId, argument: &str) -> OutboundMessage {
        let handle = self.sessions.session(user).await;
        let mut session = handle.lock().await;

        if !session.is_idle() {
            info!(user_id = %user, previous_state = session.state.name(), "Restarting flow");
        }
        session.reset();

        let requested_count = match parse_count(argument) {
            Ok(count) => count,
            Err(e) => {
                info!(user_id = %user, error = %e, "Rejected initiating command");
                return self.error_reply(&e);
            }
        };

        match self.fetch_categories().await {
            Ok(categories) => {
                info!(
                    user_id = %user,
                    requested_count,
                    categories = categories.len(),
                    "Offering categories"
                );
                session.state = ConversationState::AwaitingCategory { requested_count };
                let names = categories.into_iter().map(|category| category.name).collect();
                OutboundMessage::with_choices(self.t("choose-category"), names)
            }
            Err(e) => {
                warn!(user_id = %user, error = %e, "Categories unavailable");
                self.error_reply(&e)
            }
        }
    }

    /// Handle any other text from `user`, according to where their flow is
    pub async fn on_reply(&self, user: UserId, text: &str) -> OutboundMessage {
        let handle = self.sessions.session(user).await;
        let mut session = handle.lock().await;

        debug!(user_id = %user, state = session.state.name(), "Reply received");

        match std::mem::take(&mut session.state) {
            ConversationState::Idle => OutboundMessage::text(self.t("idle-hint")),

            ConversationState::AwaitingCategory { requested_count } => {
                match self.draw_candidates(user, text, requested_count).await {
                    Ok(candidates) => {
                        info!(
                            user_id = %user,
                            category = text,
                            candidates = candidates.len(),
                            "Offering recipes"
                        );
                        let labels = candidates
                            .iter()
                            .map(|candidate| candidate.label().to_string())
                            .collect();
                        session.state = ConversationState::AwaitingRecipeChoice {
                            requested_count,
                            category: text.to_string(),
                            candidates,
                        };
                        OutboundMessage::with_choices(self.t("choose-recipe"), labels)
                    }
                    Err(e) => {
                        warn!(user_id = %user, error = %e, "No recipes for category");
                        session.state = ConversationState::AwaitingCategory { requested_count };
                        self.error_reply(&e)
                    }
                }
            }

            ConversationState::AwaitingRecipeChoice {
                requested_count,
                category,
                candidates,
            } => {
                let detail = match resolve_choice(&candidates, text) {
                    Ok(candidate) => self.fetch_detail(&candidate.id).await,
                    Err(e) => Err(e),
                };

                match detail {
                    Ok(detail) => {
                        info!(user_id = %user, recipe = %detail.name, "Sending recipe details");
                        // Flow is complete, session stays idle
                        OutboundMessage::text(self.render_detail(user, &detail).await)
                    }
                    Err(e) => {
                        warn!(user_id = %user, error = %e, "Recipe choice failed");
                        session.state = ConversationState::AwaitingRecipeChoice {
                            requested_count,
                            category,
                            candidates,
                        };
                        self.error_reply(&e)
                    }
                }
            }
        }
    }

    pub fn welcome_message(&self) -> OutboundMessage {
        OutboundMessage::text(self.t("welcome"))
    }

    pub fn help_message(&self) -> OutboundMessage {
        let step1 = self.localization.get_message_with_args(
            "help-step1",
            &self.ui_language,
            &[("example", EXAMPLE_COUNT)],
        );
        let text = [
            self.t("help-title"),
            step1,
            self.t("help-step2"),
            self.t("help-step3"),
            self.t("help-restart"),
        ]
        .join("\n\n");
        OutboundMessage::text(text)
    }

    pub fn text_only_message(&self) -> OutboundMessage {
        OutboundMessage::text(self.t("text-only"))
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, FlowError> {
        match self.catalog.list_categories().await {
            Ok(categories) if !categories.is_empty() => Ok(categories),
            Ok(_) => Err(FlowError::CatalogUnavailable {
                step: CatalogStep::Categories,
                cause: None,
            }),
            Err(e) => Err(FlowError::CatalogUnavailable {
                step: CatalogStep::Categories,
                cause: Some(e),
            }),
        }
    }

    /// Filter by `category`, sample, and translate the sampled names
    async fn draw_candidates(
        &self,
        user: UserId,
        category: &str,
        requested_count: u32,
    ) -> Result<Vec<RecipeSummary>, FlowError> {
        let step = || CatalogStep::Filter {
            category: category.to_string(),
        };

        let recipes = match self.catalog.filter_by_category(category).await {
            Ok(recipes) if !recipes.is_empty() => recipes,
            Ok(_) => {
                return Err(FlowError::CatalogUnavailable {
                    step: step(),
                    cause: None,
                })
            }
            Err(e) => {
                return Err(FlowError::CatalogUnavailable {
                    step: step(),
                    cause: Some(e),
                })
            }
        };

        let mut candidates = {
            let mut rng = rand::thread_rng();
            sample_candidates(&recipes, requested_count as usize, &mut rng)
        };

        for candidate in &mut candidates {
            let display_name = self.translate_or_original(user, &candidate.native_name).await;
            candidate.display_name = Some(display_name);
        }

        Ok(candidates)
    }

    async fn fetch_detail(&self, id: &str) -> Result<RecipeDetail, FlowError> {
        let step = || CatalogStep::Lookup { id: id.to_string() };

        match self.catalog.lookup_by_id(id).await {
            Ok(Some(raw)) => Ok(RecipeDetail::from_raw(&raw)),
            Ok(None) => Err(FlowError::CatalogUnavailable {
                step: step(),
                cause: None,
            }),
            Err(e) => Err(FlowError::CatalogUnavailable {
                step: step(),
                cause: Some(e),
            }),
        }
    }

    /// Translate name, instructions and ingredient names one by one; measures stay as-is
    async fn render_detail(&self, user: UserId, detail: &RecipeDetail) -> String {
        let name = self.translate_or_original(user, &detail.name).await;
        let instructions = self.translate_or_original(user, &detail.instructions).await;

        let mut lines = Vec::with_capacity(detail.ingredients.len());
        for ingredient in &detail.ingredients {
            let translated = Ingredient {
                name: self.translate_or_original(user, &ingredient.name).await,
                measure: ingredient.measure.clone(),
            };
            lines.push(translated.display_line());
        }

        format!(
            "{}: {}\n\n{}: {}\n\n{}:\n{}",
            self.t("recipe-label-name"),
            name,
            self.t("recipe-label-instructions"),
            instructions,
            self.t("recipe-label-ingredients"),
            lines.join("\n")
        )
    }

    /// A failed translation is logged and replaced by the source text
    async fn translate_or_original(&self, user: UserId, text: &str) -> String {
        match self.translator.translate(text, &self.target_language).await {
            Ok(translated) => translated,
            Err(e) => {
                warn!(user_id = %user, error = %e, text, "Falling back to untranslated text");
                text.to_string()
            }
        }
    }

    fn error_reply(&self, error: &FlowError) -> OutboundMessage {
        let text = match error {
            FlowError::InvalidArgument(ArgumentProblem::Missing) => self.t("usage-missing-count"),
            FlowError::InvalidArgument(ArgumentProblem::NotPositiveInteger) => {
                self.t("usage-invalid-count")
            }
            FlowError::CatalogUnavailable { step, .. } => match step {
                CatalogStep::Categories => self.t("categories-unavailable"),
                CatalogStep::Filter { category } => self.localization.get_message_with_args(
                    "no-recipes-found",
                    &self.ui_language,
                    &[("category", category.as_str())],
                ),
                CatalogStep::Lookup { .. } => self.t("recipe-unavailable"),
            },
            FlowError::NoMatch(_) => self.t("recipe-not-found"),
        };
        OutboundMessage::text(text)
    }

    fn t(&self, key: &str) -> String {
        self.localization
            .get_message_in_language(key, &self.ui_language, None)
    }
}
