//! GitHub Source Implementations
//!
//! Every upstream call goes through the credential-rotating retrier; this
//! module only builds the queries and interprets the envelopes.

use platform::github::GithubClient;
use platform::retry::{RateLimitRetrier, RawResponse};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::domain::entities::{
    ContributionDay, GistFile, LanguageEdge, PrimaryLanguage, RawGist, RepoLanguages, RepoStars,
    Repository, RepositoryOwners, UserActivity,
};
use crate::domain::repository::{
    ContributionSource, GistSource, LanguageSource, RepositorySource, StatsQuery, StatsSource,
};
use crate::error::{CardError, CardResult};

const NOT_FOUND_ERROR_TYPE: &str = "NOT_FOUND";
const COMMIT_SEARCH_ACCEPT: &str = "application/vnd.github.cloak-preview";

const REPOSITORIES_FIELD: &str = r#"
    repositories(first: 100, ownerAffiliations: OWNER, orderBy: {direction: DESC, field: STARGAZERS}, after: $after) {
      totalCount
      nodes {
        name
        stargazers {
          totalCount
        }
      }
      pageInfo {
        hasNextPage
        endCursor
      }
    }
"#;

fn stats_query() -> String {
    format!(
        r#"
query userInfo($login: String!, $after: String, $includeMergedPullRequests: Boolean!, $includeDiscussions: Boolean!, $includeDiscussionsAnswers: Boolean!, $startTime: DateTime = null) {{
  user(login: $login) {{
    name
    login
    commits: contributionsCollection(from: $startTime) {{
      totalCommitContributions
    }}
    reviews: contributionsCollection {{
      totalPullRequestReviewContributions
    }}
    repositoriesContributedTo(first: 1, contributionTypes: [COMMIT, ISSUE, PULL_REQUEST, REPOSITORY]) {{
      totalCount
    }}
    pullRequests(first: 1) {{
      totalCount
    }}
    mergedPullRequests: pullRequests(states: MERGED) @include(if: $includeMergedPullRequests) {{
      totalCount
    }}
    openIssues: issues(states: OPEN) {{
      totalCount
    }}
    closedIssues: issues(states: CLOSED) {{
      totalCount
    }}
    followers {{
      totalCount
    }}
    repositoryDiscussions @include(if: $includeDiscussions) {{
      totalCount
    }}
    repositoryDiscussionComments(onlyAnswers: true) @include(if: $includeDiscussionsAnswers) {{
      totalCount
    }}
    {REPOSITORIES_FIELD}
  }}
}}
"#
    )
}

fn repositories_page_query() -> String {
    format!(
        r#"
query userInfo($login: String!, $after: String) {{
  user(login: $login) {{
    {REPOSITORIES_FIELD}
  }}
}}
"#
    )
}

const TOP_LANGUAGES_QUERY: &str = r#"
query userInfo($login: String!) {
  user(login: $login) {
    repositories(ownerAffiliations: OWNER, isFork: false, first: 100) {
      nodes {
        name
        languages(first: 10, orderBy: {field: SIZE, direction: DESC}) {
          edges {
            size
            node {
              color
              name
            }
          }
        }
      }
    }
  }
}
"#;

const REPOSITORY_QUERY: &str = r#"
fragment RepoInfo on Repository {
  name
  nameWithOwner
  isPrivate
  isArchived
  isTemplate
  stargazers {
    totalCount
  }
  description
  primaryLanguage {
    color
    name
  }
  forkCount
}
query getRepo($login: String!, $repo: String!) {
  user(login: $login) {
    repository(name: $repo) {
      ...RepoInfo
    }
  }
  organization(login: $login) {
    repository(name: $repo) {
      ...RepoInfo
    }
  }
}
"#;

const GIST_QUERY: &str = r#"
query gistInfo($gistName: String!) {
  viewer {
    gist(name: $gistName) {
      description
      owner {
        login
      }
      stargazerCount
      forks {
        totalCount
      }
      files {
        name
        language {
          name
        }
        size
      }
    }
  }
}
"#;

const CONTRIBUTIONS_QUERY: &str = r#"
query userContributions($login: String!) {
  user(login: $login) {
    contributionsCollection {
      contributionCalendar {
        totalContributions
        weeks {
          contributionDays {
            date
            contributionCount
          }
        }
      }
    }
  }
}
"#;

// ============================================================================
// Response shapes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TotalCount {
    total_count: u64,
}

#[derive(Debug, Deserialize)]
struct UserEnvelope<T> {
    user: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatsUser {
    name: Option<String>,
    login: String,
    commits: CommitContributions,
    reviews: ReviewContributions,
    repositories_contributed_to: TotalCount,
    pull_requests: TotalCount,
    merged_pull_requests: Option<TotalCount>,
    open_issues: TotalCount,
    closed_issues: TotalCount,
    followers: TotalCount,
    repository_discussions: Option<TotalCount>,
    repository_discussion_comments: Option<TotalCount>,
    repositories: RepositoryPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitContributions {
    total_commit_contributions: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReviewContributions {
    total_pull_request_review_contributions: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoriesOnly {
    repositories: RepositoryPage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryPage {
    total_count: u64,
    nodes: Vec<StarredNode>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct StarredNode {
    name: String,
    stargazers: TotalCount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl RepositoryPage {
    /// Repositories are ordered by stars, so a zero-star node ends the scan
    fn continues(&self) -> bool {
        self.page_info.has_next_page && self.nodes.iter().all(|node| node.stargazers.total_count > 0)
    }
}

#[derive(Debug, Deserialize)]
struct LanguagesUser {
    repositories: LanguageRepositories,
}

#[derive(Debug, Deserialize)]
struct LanguageRepositories {
    nodes: Vec<LanguageRepoNode>,
}

#[derive(Debug, Deserialize)]
struct LanguageRepoNode {
    name: String,
    languages: LanguageConnection,
}

#[derive(Debug, Deserialize)]
struct LanguageConnection {
    edges: Vec<LanguageEdgeNode>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdgeNode {
    size: u64,
    node: LanguageNode,
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepositoryData {
    user: Option<OwnerNode>,
    organization: Option<OwnerNode>,
}

#[derive(Debug, Deserialize)]
struct OwnerNode {
    repository: Option<RepositoryNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepositoryNode {
    name: String,
    name_with_owner: String,
    is_private: bool,
    is_archived: bool,
    is_template: bool,
    stargazers: TotalCount,
    description: Option<String>,
    primary_language: Option<LanguageNode>,
    fork_count: u64,
}

impl From<RepositoryNode> for Repository {
    fn from(node: RepositoryNode) -> Self {
        Repository {
            name: node.name,
            name_with_owner: node.name_with_owner,
            description: node.description,
            is_private: node.is_private,
            is_archived: node.is_archived,
            is_template: node.is_template,
            primary_language: node.primary_language.map(|lang| PrimaryLanguage {
                name: lang.name,
                color: lang.color,
            }),
            star_count: node.stargazers.total_count,
            fork_count: node.fork_count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GistData {
    viewer: GistViewer,
}

#[derive(Debug, Deserialize)]
struct GistViewer {
    gist: Option<GistNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GistNode {
    description: Option<String>,
    owner: GistOwner,
    stargazer_count: u64,
    forks: TotalCount,
    files: Vec<GistFileNode>,
}

#[derive(Debug, Deserialize)]
struct GistOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GistFileNode {
    name: String,
    language: Option<GistLanguage>,
    size: u64,
}

#[derive(Debug, Deserialize)]
struct GistLanguage {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsUser {
    contributions_collection: ContributionsCollection,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionsCollection {
    contribution_calendar: ContributionCalendar,
}

#[derive(Debug, Deserialize)]
struct ContributionCalendar {
    weeks: Vec<ContributionWeek>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionWeek {
    contribution_days: Vec<ContributionDayNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContributionDayNode {
    date: chrono::NaiveDate,
    contribution_count: u64,
}

#[derive(Debug, Deserialize)]
struct CommitSearch {
    total_count: Option<u64>,
}

// ============================================================================
// Envelope interpretation
// ============================================================================

fn upstream_error(response: &RawResponse) -> CardError {
    CardError::Upstream {
        status: response.status,
        message: response
            .message()
            .unwrap_or("GitHub returned an error response")
            .to_string(),
    }
}

/// Take `data` out of a GraphQL envelope, turning `errors` into card errors
fn graphql_data(response: RawResponse, on_not_found: impl FnOnce(String) -> CardError) -> CardResult<Value> {
    if !response.is_success() {
        return Err(upstream_error(&response));
    }

    if let Some((kind, message)) = response.first_error() {
        if kind == Some(NOT_FOUND_ERROR_TYPE) {
            return Err(on_not_found(message.to_string()));
        }
        let message = if message.is_empty() {
            "Something went wrong while trying to retrieve the data using the GraphQL API."
        } else {
            message
        };
        return Err(CardError::Graphql(message.to_string()));
    }

    let RawResponse { mut body, .. } = response;
    Ok(body.get_mut("data").map(Value::take).unwrap_or(Value::Null))
}

fn user_not_found(message: String) -> CardError {
    if message.is_empty() {
        CardError::UserNotFound("Could not fetch user.".to_string())
    } else {
        CardError::UserNotFound(message)
    }
}

fn decode_user<T: DeserializeOwned>(data: Value) -> CardResult<T> {
    serde_json::from_value::<UserEnvelope<T>>(data)?
        .user
        .ok_or_else(|| user_not_found(String::new()))
}

// ============================================================================
// Source
// ============================================================================

/// GitHub-backed implementation of every GitHub card source
#[derive(Debug, Clone)]
pub struct GithubSource {
    retrier: RateLimitRetrier,
    client: GithubClient,
}

impl GithubSource {
    pub fn new(retrier: RateLimitRetrier, client: GithubClient) -> Self {
        Self { retrier, client }
    }

    /// Run a GraphQL document through the retrier
    async fn graphql(&self, query: &str, variables: Value) -> CardResult<RawResponse> {
        let client = &self.client;
        let response = self
            .retrier
            .retry(
                |variables, credential, _attempt| async move {
                    client.graphql(query, variables, credential).await
                },
                variables,
            )
            .await?;
        Ok(response)
    }

    async fn repositories_page(&self, login: &str, after: &str) -> CardResult<RepositoryPage> {
        let response = self
            .graphql(&repositories_page_query(), json!({ "login": login, "after": after }))
            .await?;
        let user: RepositoriesOnly = decode_user(graphql_data(response, user_not_found)?)?;
        Ok(user.repositories)
    }
}

impl StatsSource for GithubSource {
    async fn user_activity(&self, query: &StatsQuery) -> CardResult<UserActivity> {
        let variables = json!({
            "login": query.login,
            "after": Value::Null,
            "includeMergedPullRequests": query.extras.merged_prs,
            "includeDiscussions": query.extras.discussions_started,
            "includeDiscussionsAnswers": query.extras.discussions_answered,
            "startTime": query.commits_year.map(|year| format!("{year}-01-01T00:00:00Z")),
        });
        let response = self.graphql(&stats_query(), variables).await?;
        let user: StatsUser = decode_user(graphql_data(response, user_not_found)?)?;

        let mut continues = query.multi_page_stars && user.repositories.continues();
        let mut cursor = user.repositories.page_info.end_cursor.clone();
        let mut repositories: Vec<RepoStars> = user
            .repositories
            .nodes
            .into_iter()
            .map(|node| RepoStars {
                name: node.name,
                stars: node.stargazers.total_count,
            })
            .collect();

        while continues {
            let Some(after) = cursor.take() else {
                break;
            };
            let page = self.repositories_page(&query.login, &after).await?;
            continues = page.continues();
            cursor = page.page_info.end_cursor.clone();
            repositories.extend(page.nodes.into_iter().map(|node| RepoStars {
                name: node.name,
                stars: node.stargazers.total_count,
            }));
            tracing::debug!(login = %query.login, fetched = repositories.len(), "Fetched repository page");
        }

        Ok(UserActivity {
            name: user.name,
            login: user.login,
            commits: user.commits.total_commit_contributions,
            reviews: user.reviews.total_pull_request_review_contributions,
            contributed_to: user.repositories_contributed_to.total_count,
            prs: user.pull_requests.total_count,
            merged_prs: user.merged_pull_requests.map(|count| count.total_count),
            open_issues: user.open_issues.total_count,
            closed_issues: user.closed_issues.total_count,
            followers: user.followers.total_count,
            discussions_started: user.repository_discussions.map(|count| count.total_count),
            discussions_answered: user.repository_discussion_comments.map(|count| count.total_count),
            repository_count: user.repositories.total_count,
            repositories,
        })
    }

    async fn total_commits(&self, login: &str) -> CardResult<u64> {
        let client = &self.client;
        let path = format!("search/commits?q=author:{login}");
        let response = self
            .retrier
            .retry(
                |path: String, credential, _attempt| async move {
                    client
                        .rest_get(&path, Some(COMMIT_SEARCH_ACCEPT), credential)
                        .await
                },
                path,
            )
            .await?;

        if !response.is_success() {
            return Err(upstream_error(&response));
        }
        let search: CommitSearch = serde_json::from_value(response.body)?;
        search.total_count.ok_or(CardError::CommitsUnavailable)
    }
}

impl LanguageSource for GithubSource {
    async fn repository_languages(&self, login: &str) -> CardResult<Vec<RepoLanguages>> {
        let response = self
            .graphql(TOP_LANGUAGES_QUERY, json!({ "login": login }))
            .await?;
        let user: LanguagesUser = decode_user(graphql_data(response, user_not_found)?)?;

        Ok(user
            .repositories
            .nodes
            .into_iter()
            .map(|repo| RepoLanguages {
                name: repo.name,
                languages: repo
                    .languages
                    .edges
                    .into_iter()
                    .map(|edge| LanguageEdge {
                        name: edge.node.name,
                        color: edge.node.color,
                        size: edge.size,
                    })
                    .collect(),
            })
            .collect())
    }
}

impl RepositorySource for GithubSource {
    async fn repository(&self, owner: &str, name: &str) -> CardResult<RepositoryOwners> {
        let response = self
            .graphql(REPOSITORY_QUERY, json!({ "login": owner, "repo": name }))
            .await?;
        if !response.is_success() {
            return Err(upstream_error(&response));
        }

        // Either `user` or `organization` always resolves to NOT_FOUND, so
        // errors only matter when there is no data at all.
        let has_data = response.body.get("data").is_some_and(|data| !data.is_null());
        if !has_data {
            graphql_data(response, |_| CardError::RepoNotFound("Not found".into()))?;
            return Ok(RepositoryOwners::default());
        }
        let RawResponse { mut body, .. } = response;
        let data: RepositoryData = serde_json::from_value(body["data"].take())?;

        Ok(RepositoryOwners {
            user: data.user.map(|owner| owner.repository.map(Repository::from)),
            organization: data.organization.map(|owner| owner.repository.map(Repository::from)),
        })
    }
}

impl GistSource for GithubSource {
    async fn gist(&self, id: &str) -> CardResult<Option<RawGist>> {
        let response = self.graphql(GIST_QUERY, json!({ "gistName": id })).await?;
        let data: GistData =
            serde_json::from_value(graphql_data(response, |_| CardError::GistNotFound)?)?;

        Ok(data.viewer.gist.map(|gist| RawGist {
            owner: gist.owner.login,
            description: gist.description,
            files: gist
                .files
                .into_iter()
                .map(|file| GistFile {
                    name: file.name,
                    language: file.language.map(|language| language.name),
                    size: file.size,
                })
                .collect(),
            star_count: gist.stargazer_count,
            fork_count: gist.forks.total_count,
        }))
    }
}

impl ContributionSource for GithubSource {
    async fn contribution_calendar(&self, login: &str) -> CardResult<Vec<ContributionDay>> {
        let response = self
            .graphql(CONTRIBUTIONS_QUERY, json!({ "login": login }))
            .await?;
        let user: ContributionsUser = decode_user(graphql_data(response, user_not_found)?)?;

        Ok(user
            .contributions_collection
            .contribution_calendar
            .weeks
            .into_iter()
            .flat_map(|week| week.contribution_days)
            .map(|day| ContributionDay {
                date: day.date,
                count: day.contribution_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform::credentials::CredentialPool;
    use std::sync::Arc;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn source_for(server: &MockServer, pool: CredentialPool) -> GithubSource {
        let client =
            GithubClient::with_base_urls(format!("{}/graphql", server.uri()), server.uri()).unwrap();
        GithubSource::new(RateLimitRetrier::new(Arc::new(pool)), client)
    }

    fn stats_user(repositories: Value) -> Value {
        json!({
            "data": {
                "user": {
                    "name": null,
                    "login": "octocat",
                    "commits": { "totalCommitContributions": 500 },
                    "reviews": { "totalPullRequestReviewContributions": 30 },
                    "repositoriesContributedTo": { "totalCount": 12 },
                    "pullRequests": { "totalCount": 100 },
                    "mergedPullRequests": { "totalCount": 80 },
                    "openIssues": { "totalCount": 20 },
                    "closedIssues": { "totalCount": 30 },
                    "followers": { "totalCount": 150 },
                    "repositories": repositories
                }
            }
        })
    }

    fn activity_query(multi_page_stars: bool) -> StatsQuery {
        StatsQuery {
            login: "octocat".to_string(),
            commits_year: None,
            extras: Default::default(),
            multi_page_stars,
        }
    }

    #[tokio::test]
    async fn test_user_activity_decodes_counters() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_user(json!({
                "totalCount": 2,
                "nodes": [
                    { "name": "hello-world", "stargazers": { "totalCount": 150 } },
                    { "name": "spoon-knife", "stargazers": { "totalCount": 50 } }
                ],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }))))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let activity = source.user_activity(&activity_query(false)).await.unwrap();

        assert_eq!(activity.login, "octocat");
        assert_eq!(activity.commits, 500);
        assert_eq!(activity.merged_prs, Some(80));
        assert_eq!(activity.discussions_started, None);
        assert_eq!(activity.repository_count, 2);
        assert_eq!(activity.repositories.len(), 2);
    }

    #[tokio::test]
    async fn test_rate_limited_token_is_rotated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "bearer test-token-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("authorization", "bearer test-token-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_user(json!({
                "totalCount": 0,
                "nodes": [],
                "pageInfo": { "hasNextPage": false, "endCursor": null }
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let activity = source.user_activity(&activity_query(false)).await.unwrap();
        assert_eq!(activity.followers, 150);
    }

    #[tokio::test]
    async fn test_all_tokens_limited_is_rate_limited_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "rateLimit": { "remaining": 0 } }
            })))
            .expect(8)
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let err = source.user_activity(&activity_query(false)).await.unwrap_err();
        assert!(matches!(err, CardError::RateLimited));
    }

    #[tokio::test]
    async fn test_anonymous_final_attempt_still_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded" }]
            })))
            .expect(7)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "message": "This endpoint requires you to be authenticated.",
                "documentation_url": "https://docs.github.com/graphql/guides/forming-calls-with-graphql#authenticating-with-graphql"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let err = source.contribution_calendar("octocat").await.unwrap_err();
        assert!(matches!(err, CardError::RateLimited), "got {err:?}");
    }

    #[tokio::test]
    async fn test_not_found_user() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": null },
                "errors": [{
                    "type": "NOT_FOUND",
                    "message": "Could not resolve to a User with the login of 'nobody'."
                }]
            })))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        match source.repository_languages("nobody").await.unwrap_err() {
            CardError::UserNotFound(message) => assert!(message.contains("nobody")),
            other => panic!("expected user not found, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_multi_page_stars_follow_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_string_contains("cursor-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "repositories": {
                    "totalCount": 3,
                    "nodes": [{ "name": "third", "stargazers": { "totalCount": 0 } }],
                    "pageInfo": { "hasNextPage": true, "endCursor": "cursor-2" }
                } } }
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_string_contains("includeMergedPullRequests"))
            .respond_with(ResponseTemplate::new(200).set_body_json(stats_user(json!({
                "totalCount": 3,
                "nodes": [
                    { "name": "first", "stargazers": { "totalCount": 10 } },
                    { "name": "second", "stargazers": { "totalCount": 5 } }
                ],
                "pageInfo": { "hasNextPage": true, "endCursor": "cursor-1" }
            }))))
            .expect(1)
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let activity = source.user_activity(&activity_query(true)).await.unwrap();

        // the zero-star node on page two ends the scan
        let names: Vec<_> = activity.repositories.iter().map(|repo| repo.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_total_commits_from_search() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .and(header("accept", COMMIT_SEARCH_ACCEPT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 4321 })))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        assert_eq!(source.total_commits("octocat").await.unwrap(), 4321);
    }

    #[tokio::test]
    async fn test_total_commits_missing_count() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search/commits"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "items": [] })))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let err = source.total_commits("octocat").await.unwrap_err();
        assert!(matches!(err, CardError::CommitsUnavailable));
    }

    #[tokio::test]
    async fn test_repository_lookup_ignores_owner_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "user": null,
                    "organization": { "repository": {
                        "name": "linguist",
                        "nameWithOwner": "github/linguist",
                        "isPrivate": false,
                        "isArchived": false,
                        "isTemplate": false,
                        "stargazers": { "totalCount": 12000 },
                        "description": "Language Savant",
                        "primaryLanguage": { "color": "#701516", "name": "Ruby" },
                        "forkCount": 4000
                    } }
                },
                "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a User with the login of 'github'." }]
            })))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let owners = source.repository("github", "linguist").await.unwrap();
        assert_eq!(owners.user, None);
        let repo = owners.organization.flatten().unwrap();
        assert_eq!(repo.name_with_owner, "github/linguist");
        assert_eq!(repo.star_count, 12000);
        assert_eq!(repo.primary_language.unwrap().name, "Ruby");
    }

    #[tokio::test]
    async fn test_missing_gist_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "data": { "viewer": { "gist": null } } })),
            )
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        assert_eq!(source.gist("deadbeef").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_contribution_calendar_flattens_weeks() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "user": { "contributionsCollection": { "contributionCalendar": {
                    "totalContributions": 3,
                    "weeks": [
                        { "contributionDays": [
                            { "date": "2024-01-06", "contributionCount": 1 }
                        ] },
                        { "contributionDays": [
                            { "date": "2024-01-07", "contributionCount": 0 },
                            { "date": "2024-01-08", "contributionCount": 2 }
                        ] }
                    ]
                } } } }
            })))
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::fixture()).await;
        let days = source.contribution_calendar("octocat").await.unwrap();
        assert_eq!(days.len(), 3);
        assert_eq!(days[2].count, 2);
        assert_eq!(days[2].date.to_string(), "2024-01-08");
    }

    #[tokio::test]
    async fn test_empty_pool_never_calls_github() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": {} })))
            .expect(0)
            .mount(&server)
            .await;

        let source = source_for(&server, CredentialPool::default()).await;
        let err = source.contribution_calendar("octocat").await.unwrap_err();
        assert!(matches!(err, CardError::NoCredentials));
    }
}
