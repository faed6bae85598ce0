//! # Recommendation Orchestrator
//!
//! This module coordinates the recommendation pipeline:
//! 1. Validate the request and resolve the refinement into a Constraint
//! 2. Build the user's profile from their lists
//! 3. Inside the session transaction:
//!    a. Candidate pool = catalogue − (watched ∪ watchlist ∪ session excluded)
//!    b. Apply the constraint filters
//!    c. Score the survivors in parallel
//!    d. Rank and take the top k
//!    e. Append the returned ids to the session
//! 4. Return the ranked films with their contribution breakdown
//!
//! Every step is synchronous and CPU-bound. `recommend_async` moves a
//! call onto tokio's blocking pool for async callers.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tracing::{debug, info, instrument};

use data_loader::{Catalogue, CatalogueIndex, FilmId, HistoryIndex, HistoryProvider};
use pipeline::{ConstraintFilter, ScoredCandidate, SimilarityScorer, MAX_TOP_N};
use refinement::{CatalogueResolver, Constraint, ParsedRefinement, RefinementParser};
use sources::{build_user_profile, CatalogueSource, ListKind, UserProfile, Vectorizer};

use crate::config::EngineConfig;
use crate::error::{RecommendError, Result};
use crate::infographic::{build_infographic, Infographic};
use crate::session::{self, InMemorySessionStore, SessionId, SessionStore};

/// Result count used when a request doesn't set one
pub const DEFAULT_K: usize = 10;

fn validate_k(k: usize) -> Result<usize> {
    if (1..=MAX_TOP_N).contains(&k) {
        Ok(k)
    } else {
        Err(RecommendError::InvalidK(k))
    }
}

/// How a request narrows its results
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refinement {
    /// Free text, parsed against the catalogue
    Text(String),
    /// An already structured constraint
    Constraint(Constraint),
}

/// One `recommend` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendRequest {
    pub username: String,
    pub k: usize,
    pub refinement: Option<Refinement>,
    /// `watched`, `watchlist` or `all`
    pub list_kind: String,
    pub session_id: SessionId,
}

impl RecommendRequest {
    pub fn new(username: impl Into<String>, session_id: impl Into<SessionId>) -> Self {
        Self {
            username: username.into(),
            k: DEFAULT_K,
            refinement: None,
            list_kind: ListKind::Watched.to_string(),
            session_id: session_id.into(),
        }
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_list_kind(mut self, list_kind: impl Into<String>) -> Self {
        self.list_kind = list_kind.into();
        self
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.refinement = Some(Refinement::Text(prompt.into()));
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.refinement = Some(Refinement::Constraint(constraint));
        self
    }
}

/// Main orchestrator that coordinates the recommendation pipeline
#[derive(Clone)]
pub struct RecommendationOrchestrator {
    catalogue: Arc<dyn Catalogue>,
    history: Arc<dyn HistoryProvider>,
    sessions: Arc<dyn SessionStore>,
    config: EngineConfig,
    vectorizer: Vectorizer,
    source: CatalogueSource,
    constraint_filter: ConstraintFilter,
    scorer: SimilarityScorer,
    parser: Arc<RefinementParser>,
}

impl RecommendationOrchestrator {
    /// Create an orchestrator with the default configuration
    pub fn new(
        catalogue: Arc<dyn Catalogue>,
        history: Arc<dyn HistoryProvider>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self::with_config(catalogue, history, sessions, EngineConfig::default())
    }

    /// Create an orchestrator with all components built from `config`
    pub fn with_config(
        catalogue: Arc<dyn Catalogue>,
        history: Arc<dyn HistoryProvider>,
        sessions: Arc<dyn SessionStore>,
        config: EngineConfig,
    ) -> Self {
        let vectorizer = Vectorizer::new().with_group_weights(config.group_weights);
        let source = CatalogueSource::new(catalogue.clone());
        let constraint_filter = ConstraintFilter::new(catalogue.clone())
            .with_vectorizer(vectorizer.clone())
            .with_similar_to_threshold(config.similar_to_threshold);
        let scorer = SimilarityScorer::new(vectorizer.clone());
        let resolver = CatalogueResolver::new(catalogue.clone())
            .with_fuzzy_threshold(config.fuzzy_title_threshold);
        let parser = Arc::new(RefinementParser::with_resolver(Arc::new(resolver)));

        Self {
            catalogue,
            history,
            sessions,
            config,
            vectorizer,
            source,
            constraint_filter,
            scorer,
            parser,
        }
    }

    /// Orchestrator over loaded indices with an in-memory session store
    pub fn in_memory(catalogue: CatalogueIndex, history: HistoryIndex, config: EngineConfig) -> Self {
        let sessions = InMemorySessionStore::new().with_max_sessions(config.max_sessions);
        Self::with_config(Arc::new(catalogue), Arc::new(history), Arc::new(sessions), config)
    }

    /// Fresh session id for callers that don't bring their own
    pub fn new_session_id() -> SessionId {
        session::new_session_id()
    }

    /// Build a user's profile from the selected list
    pub fn build_profile(&self, username: &str, list_kind: ListKind) -> Result<UserProfile> {
        let lists = self
            .history
            .get_lists(username)
            .ok_or_else(|| RecommendError::UserNotIngested(username.to_string()))?;
        Ok(build_user_profile(
            self.catalogue.as_ref(),
            &self.vectorizer,
            username,
            &lists,
            list_kind,
        ))
    }

    /// Main entry point: ranked recommendations for one request.
    ///
    /// The returned films are recorded in the request's session and will
    /// not be returned by that session again.
    #[instrument(skip(self, request), fields(username = %request.username, session = %request.session_id))]
    pub fn recommend(&self, request: &RecommendRequest) -> Result<Vec<ScoredCandidate>> {
        let start_time = Instant::now();

        let list_kind: ListKind = request.list_kind.parse()?;
        validate_k(request.k)?;
        let constraint = match &request.refinement {
            None => Constraint::new(),
            Some(Refinement::Text(prompt)) => self.parser.parse(prompt),
            Some(Refinement::Constraint(constraint)) => constraint.clone(),
        };
        // A count in the refinement overrides the request's
        let k = validate_k(constraint.k.unwrap_or(request.k))?;
        debug!("Resolved constraint: {:?}", constraint);

        let profile = self.build_profile(&request.username, list_kind)?;
        info!(
            "Built {} profile for {} from {} films",
            list_kind, request.username, profile.film_count
        );

        let mut outcome: Result<Vec<ScoredCandidate>> = Ok(Vec::new());
        self.sessions.transact(&request.session_id, &mut |excluded| {
            match self.rank_pool(&profile, excluded, &constraint, k) {
                Ok(ranked) => {
                    let served = ranked.iter().map(|scored| scored.film_id.clone()).collect();
                    outcome = Ok(ranked);
                    served
                }
                Err(err) => {
                    outcome = Err(err);
                    Vec::new()
                }
            }
        });

        if let Ok(ranked) = &outcome {
            info!(
                "Returned {} recommendations for {} in {:.2?}",
                ranked.len(),
                request.username,
                start_time.elapsed()
            );
        }
        outcome
    }

    /// [`recommend`](Self::recommend) on tokio's blocking pool
    pub async fn recommend_async(&self, request: RecommendRequest) -> Result<Vec<ScoredCandidate>> {
        let orchestrator = self.clone();
        tokio::task::spawn_blocking(move || orchestrator.recommend(&request))
            .await
            .context("Recommendation task panicked")?
    }

    /// Pool, filter, score and rank against one session's exclusions
    fn rank_pool(
        &self,
        profile: &UserProfile,
        excluded: &HashSet<FilmId>,
        constraint: &Constraint,
        k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        let candidates = self.source.get_candidates(profile, excluded);
        let pool_size = candidates.len();

        let filtered = self
            .constraint_filter
            .apply(candidates, constraint, profile)
            .context("Failed to apply constraint filters")?;
        info!("Candidate pool {} -> {} after filters", pool_size, filtered.len());

        let scored = self
            .scorer
            .score_all(&filtered, profile, self.config.contribution_top_n);
        Ok(SimilarityScorer::rank(scored, k))
    }

    /// Score a single film against the user's profile.
    ///
    /// Uses the configured default list kind; no session exclusion and no
    /// filtering apply.
    #[instrument(skip(self))]
    pub fn evaluate(&self, username: &str, film_id: &str, top_n: usize) -> Result<ScoredCandidate> {
        let profile = self.build_profile(username, self.config.default_list_kind)?;
        let film = self
            .catalogue
            .get(film_id)
            .ok_or_else(|| RecommendError::FilmNotFound(film_id.to_string()))?;
        Ok(self.scorer.score_film(&film, &profile, top_n))
    }

    /// Parse free text against this orchestrator's catalogue. Never fails.
    pub fn parse_refinement_prompt(&self, text: &str) -> Constraint {
        self.parser.parse(text)
    }

    /// Parse free text and classify its intent
    pub fn parse_refinement_detailed(&self, text: &str) -> ParsedRefinement {
        self.parser.parse_detailed(text)
    }

    /// Genre, decade and director counts over one of the user's lists
    #[instrument(skip(self))]
    pub fn infographic(&self, username: &str, list_kind: &str, top_n: usize) -> Result<Infographic> {
        let list_kind: ListKind = list_kind.parse()?;
        let lists = self
            .history
            .get_lists(username)
            .ok_or_else(|| RecommendError::UserNotIngested(username.to_string()))?;

        let selected = list_kind.select(&lists);
        let films: Vec<_> = selected.iter().filter_map(|id| self.catalogue.get(id)).collect();
        Ok(build_infographic(username, list_kind, selected.len(), &films, top_n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::{FilmRecord, UserLists};
    use sources::FeatureGroup;

    // ============================================================================
    // Test Fixtures
    // ============================================================================

    fn build_test_catalogue() -> CatalogueIndex {
        CatalogueIndex::from_films([
            FilmRecord::new("heat", "Heat")
                .with_year(1995)
                .with_genres(["Crime", "Drama"])
                .with_directors(["Michael Mann"])
                .with_countries(["United States"]),
            FilmRecord::new("collateral", "Collateral")
                .with_year(2004)
                .with_genres(["Crime", "Thriller"])
                .with_directors(["Michael Mann"])
                .with_countries(["United States"]),
            FilmRecord::new("thief", "Thief")
                .with_year(1981)
                .with_genres(["Crime", "Drama"])
                .with_directors(["Michael Mann"])
                .with_countries(["United States"]),
            FilmRecord::new("oldboy", "Oldboy")
                .with_year(2003)
                .with_genres(["Thriller", "Mystery"])
                .with_directors(["Park Chan-wook"])
                .with_countries(["South Korea"]),
            FilmRecord::new("memories-of-murder", "Memories of Murder")
                .with_year(2003)
                .with_genres(["Crime", "Drama", "Mystery"])
                .with_directors(["Bong Joon-ho"])
                .with_countries(["South Korea"]),
            FilmRecord::new("amelie", "Amélie")
                .with_year(2001)
                .with_genres(["Comedy", "Romance"])
                .with_directors(["Jean-Pierre Jeunet"])
                .with_countries(["France"]),
            FilmRecord::new("toy-story", "Toy Story")
                .with_year(1995)
                .with_genres(["Animation", "Comedy", "Family"])
                .with_directors(["John Lasseter"])
                .with_countries(["United States"]),
        ])
    }

    fn build_test_orchestrator() -> RecommendationOrchestrator {
        let mut history = HistoryIndex::new();
        history.insert_user("alice", UserLists::new(["heat"], ["thief"]));
        history.insert_user("bob", UserLists::default());
        RecommendationOrchestrator::in_memory(build_test_catalogue(), history, EngineConfig::default())
    }

    fn ids(ranked: &[ScoredCandidate]) -> Vec<&str> {
        ranked.iter().map(|s| s.film_id.as_str()).collect()
    }

    // ============================================================================
    // Unit Tests: recommend
    // ============================================================================

    #[test]
    fn test_recommend_ranks_and_excludes_lists() {
        let orchestrator = build_test_orchestrator();
        let ranked = orchestrator.recommend(&RecommendRequest::new("alice", "s1").with_k(3)).unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].film_id, "collateral");
        assert!(!ids(&ranked).contains(&"heat"));
        assert!(!ids(&ranked).contains(&"thief"));
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|s| s.contributions.len() <= 3));
    }

    #[test]
    fn test_recommend_session_never_repeats() {
        let orchestrator = build_test_orchestrator();
        let request = RecommendRequest::new("alice", "s1").with_k(2);

        let first = orchestrator.recommend(&request).unwrap();
        let second = orchestrator.recommend(&request).unwrap();
        let third = orchestrator.recommend(&request).unwrap();
        let fourth = orchestrator.recommend(&request).unwrap();

        let mut all: Vec<&str> = [&first, &second, &third]
            .iter()
            .flat_map(|ranked| ids(ranked))
            .collect();
        assert_eq!(all.len(), 5);
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 5);

        // Pool exhausted: 7 films − 2 on alice's lists − 5 served
        assert!(fourth.is_empty());

        // Another session starts fresh
        let other = orchestrator.recommend(&RecommendRequest::new("alice", "s2").with_k(2)).unwrap();
        assert_eq!(ids(&other), ids(&first));
    }

    #[test]
    fn test_recommend_with_prompt() {
        let orchestrator = build_test_orchestrator();
        let request = RecommendRequest::new("alice", "s1").with_prompt("2 korean thrillers");

        let ranked = orchestrator.recommend(&request).unwrap();
        assert_eq!(ids(&ranked), vec!["oldboy"]);
    }

    #[test]
    fn test_prompt_k_overrides_request_k() {
        let orchestrator = build_test_orchestrator();
        let request = RecommendRequest::new("alice", "s1").with_k(5).with_prompt("top 1");

        let ranked = orchestrator.recommend(&request).unwrap();
        assert_eq!(ranked.len(), 1);
    }

    #[test]
    fn test_request_k_is_validated_before_prompt_override() {
        let orchestrator = build_test_orchestrator();
        let request = RecommendRequest::new("alice", "s1").with_k(0).with_prompt("top 1");

        let err = orchestrator.recommend(&request).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidK(0)));
    }

    #[test]
    fn test_recommend_similar_to_title() {
        let orchestrator = build_test_orchestrator();
        let request = RecommendRequest::new("bob", "s1").with_prompt("something like Amelie");

        let ranked = orchestrator.recommend(&request).unwrap();
        assert!(!ids(&ranked).contains(&"amelie"));
        // Sharing the 2000s with Amélie clears the threshold; one shared genre doesn't
        assert!(ids(&ranked).contains(&"collateral"));
        assert!(!ids(&ranked).contains(&"toy-story"));
        assert!(!ids(&ranked).contains(&"heat"));
    }

    #[test]
    fn test_recommend_explicit_constraint() {
        let orchestrator = build_test_orchestrator();
        let constraint = Constraint::new().with_year_range(Some(2000), Some(2002));
        let request = RecommendRequest::new("alice", "s1").with_constraint(constraint);

        let ranked = orchestrator.recommend(&request).unwrap();
        assert_eq!(ids(&ranked), vec!["amelie"]);
    }

    #[test]
    fn test_recommend_errors() {
        let orchestrator = build_test_orchestrator();

        let err = orchestrator.recommend(&RecommendRequest::new("carol", "s1")).unwrap_err();
        assert!(matches!(err, RecommendError::UserNotIngested(name) if name == "carol"));

        let err = orchestrator.recommend(&RecommendRequest::new("alice", "s1").with_k(0)).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidK(0)));

        let err = orchestrator.recommend(&RecommendRequest::new("alice", "s1").with_k(51)).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidK(51)));

        let request = RecommendRequest::new("alice", "s1").with_list_kind("favourites");
        let err = orchestrator.recommend(&request).unwrap_err();
        assert!(matches!(err, RecommendError::InvalidListKind(kind) if kind == "favourites"));
    }

    #[test]
    fn test_failed_request_does_not_touch_session() {
        let orchestrator = build_test_orchestrator();
        let _ = orchestrator.recommend(&RecommendRequest::new("alice", "s1").with_k(99));
        let ranked = orchestrator.recommend(&RecommendRequest::new("alice", "s1").with_k(5)).unwrap();
        assert_eq!(ranked.len(), 5);
    }

    #[test]
    fn test_empty_profile_ranks_by_id() {
        let orchestrator = build_test_orchestrator();
        let ranked = orchestrator.recommend(&RecommendRequest::new("bob", "s1").with_k(3)).unwrap();

        assert!(ranked.iter().all(|s| s.score == 0.0));
        assert_eq!(ids(&ranked), vec!["amelie", "collateral", "heat"]);
    }

    // ============================================================================
    // Unit Tests: evaluate, infographic, parse
    // ============================================================================

    #[test]
    fn test_evaluate() {
        let orchestrator = build_test_orchestrator();
        let first = orchestrator.evaluate("alice", "collateral", 2).unwrap();
        let second = orchestrator.evaluate("alice", "collateral", 2).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.contributions.len(), 2);
        assert_eq!(first.contributions[0].group, FeatureGroup::Director);
        assert!(first.contributions[0].contribution >= first.contributions[1].contribution);

        // Films on the user's own lists can still be evaluated
        assert!(orchestrator.evaluate("alice", "heat", 3).is_ok());
    }

    #[test]
    fn test_evaluate_errors() {
        let orchestrator = build_test_orchestrator();
        assert!(matches!(
            orchestrator.evaluate("alice", "missing", 3),
            Err(RecommendError::FilmNotFound(id)) if id == "missing"
        ));
        assert!(matches!(
            orchestrator.evaluate("carol", "heat", 3),
            Err(RecommendError::UserNotIngested(_))
        ));
    }

    #[test]
    fn test_infographic() {
        let orchestrator = build_test_orchestrator();
        let info = orchestrator.infographic("alice", "all", 5).unwrap();

        assert_eq!(info.film_count, 2);
        assert_eq!(info.top_directors[0].name, "Michael Mann");
        assert_eq!(info.top_directors[0].count, 2);

        assert!(matches!(
            orchestrator.infographic("alice", "bogus", 5),
            Err(RecommendError::InvalidListKind(_))
        ));
    }

    #[test]
    fn test_parse_uses_catalogue_titles() {
        let orchestrator = build_test_orchestrator();
        let constraint = orchestrator.parse_refinement_prompt("films like Memories of Murder");
        assert_eq!(constraint.similar_to.as_deref(), Some("memories-of-murder"));
    }

    #[tokio::test]
    async fn test_recommend_async() {
        let orchestrator = build_test_orchestrator();
        let ranked = orchestrator
            .recommend_async(RecommendRequest::new("alice", "async").with_k(1))
            .await
            .unwrap();
        assert_eq!(ids(&ranked), vec!["collateral"]);
    }
}
