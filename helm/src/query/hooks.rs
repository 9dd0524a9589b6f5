use std::future::Future;

use tracing::{debug, info};

use super::cache::{QueryCache, QuerySnapshot};
use super::key::QueryKey;
use super::mutation::MutationKey;
use crate::api::dto::{
    AddQuestionRequest, CreateDiscussionRequest, Discussion, DiscussionDetails,
    DiscussionsResponse, LoginRequest, LoginResponse, RegisterRequest, UserProfile,
};
use crate::api::{DiscussionsApi, UsersApi};
use crate::error::Result;

/// Outcome of a query that depends on an optional parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult<T> {
    /// The parameter is missing; no request was made.
    Disabled,
    Ready(T),
}

/// One entry point per backend operation. Reads go through the cache;
/// writes apply their declared invalidations when they succeed.
#[derive(Clone)]
pub struct Queries {
    users: UsersApi,
    discussions: DiscussionsApi,
    cache: QueryCache,
}

impl Queries {
    pub fn new(users: UsersApi, discussions: DiscussionsApi, cache: QueryCache) -> Self {
        Self {
            users,
            discussions,
            cache,
        }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub async fn discussions(&self) -> Result<Vec<Discussion>> {
        let api = self.discussions.clone();
        let response: DiscussionsResponse = self
            .cache
            .fetch(QueryKey::Discussions, move || async move { api.list().await })
            .await?;
        Ok(response.data)
    }

    /// Stays disabled until a non-empty id is supplied.
    pub async fn discussion_details(
        &self,
        discussion_id: Option<&str>,
    ) -> Result<QueryResult<DiscussionDetails>> {
        let Some(id) = discussion_id.filter(|id| !id.is_empty()) else {
            debug!("Discussion details query disabled: no discussion selected");
            return Ok(QueryResult::Disabled);
        };

        let api = self.discussions.clone();
        let owned_id = id.to_string();
        let details = self
            .cache
            .fetch(QueryKey::details(id), move || async move {
                api.details(&owned_id).await
            })
            .await?;
        Ok(QueryResult::Ready(details))
    }

    pub fn discussion_details_state(&self, discussion_id: &str) -> QuerySnapshot<DiscussionDetails> {
        self.cache.state(&QueryKey::details(discussion_id))
    }

    pub async fn profile(&self) -> Result<UserProfile> {
        let api = self.users.clone();
        self.cache
            .fetch(QueryKey::Profile, move || async move { api.profile().await })
            .await
    }

    pub async fn login(&self, body: LoginRequest) -> Result<LoginResponse> {
        let api = self.users.clone();
        self.mutate(MutationKey::Login, async move { api.login(&body).await })
            .await
    }

    pub async fn register(&self, body: RegisterRequest) -> Result<()> {
        let api = self.users.clone();
        self.mutate(MutationKey::Register, async move { api.register(&body).await })
            .await
    }

    pub async fn create_discussion(&self, body: CreateDiscussionRequest) -> Result<()> {
        let api = self.discussions.clone();
        self.mutate(MutationKey::AddDiscussion, async move {
            api.create(&body).await
        })
        .await
    }

    pub async fn add_question(&self, body: AddQuestionRequest) -> Result<()> {
        let key = MutationKey::AddQuestion {
            discussion_id: body.discussion_id.clone(),
        };
        let api = self.discussions.clone();
        self.mutate(key, async move { api.add_question(&body).await })
            .await
    }

    async fn mutate<T, Fut>(&self, key: MutationKey, fut: Fut) -> Result<T>
    where
        Fut: Future<Output = Result<T>>,
    {
        debug!(mutation = key.name(), "Mutation started");
        let result = fut.await;

        match &result {
            Ok(_) => {
                let invalidated = key.invalidates();
                for query in &invalidated {
                    self.cache.invalidate(query);
                }
                info!(
                    mutation = key.name(),
                    invalidated = invalidated.len(),
                    "Mutation succeeded"
                );
            }
            Err(e) => debug!(mutation = key.name(), error = %e, "Mutation failed"),
        }

        result
    }

    /// Drop everything cached for the previous user.
    pub fn reset(&self) {
        self.cache.clear();
    }
}
