//! Domain Services
//!
//! Pure post-processing of upstream data. No I/O.

use chrono::NaiveDate;

use crate::domain::entities::{
    ContributionDay, Gist, LanguageStat, RawGist, RepoLanguages, RepoStars, Repository,
    RepositoryOwners, Streak, StreakRun,
};
use crate::domain::value_objects::{ActivityDays, LangsCount, LanguageWeights};
use crate::error::{CardError, CardResult};

pub fn is_excluded(name: &str, excluded: &[String]) -> bool {
    excluded.iter().any(|entry| entry == name)
}

/// Stars summed over repositories not excluded
pub fn sum_stars(repositories: &[RepoStars], excluded: &[String]) -> u64 {
    repositories
        .iter()
        .filter(|repo| !is_excluded(&repo.name, excluded))
        .map(|repo| repo.stars)
        .sum()
}

/// Merged PRs as a percentage of all PRs, 0 when there are none
pub fn merged_prs_percentage(merged: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    merged as f64 / total as f64 * 100.0
}

/// Aggregate per-repository languages into a ranking
///
/// Each language's weight is `size^weights.size * count^weights.count`.
/// The result is sorted by weight, heaviest first; ties keep first-seen
/// order.
pub fn aggregate_languages(
    repositories: &[RepoLanguages],
    excluded: &[String],
    weights: LanguageWeights,
) -> Vec<LanguageStat> {
    let mut stats: Vec<LanguageStat> = Vec::new();

    for repo in repositories.iter().filter(|repo| !is_excluded(&repo.name, excluded)) {
        for edge in &repo.languages {
            match stats.iter_mut().find(|stat| stat.name == edge.name) {
                Some(stat) => {
                    stat.size += edge.size;
                    stat.count += 1;
                }
                None => stats.push(LanguageStat {
                    name: edge.name.clone(),
                    color: edge.color.clone(),
                    size: edge.size,
                    count: 1,
                    weight: 0.0,
                }),
            }
        }
    }

    for stat in &mut stats {
        stat.weight = (stat.size as f64).powf(weights.size) * (stat.count as f64).powf(weights.count);
    }
    stats.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    stats
}

/// Drop hidden languages (case-insensitive) and keep the top `count`
pub fn select_top_languages(
    languages: Vec<LanguageStat>,
    hide: &[String],
    count: LangsCount,
) -> Vec<LanguageStat> {
    let hidden: Vec<String> = hide.iter().map(|name| name.trim().to_lowercase()).collect();
    languages
        .into_iter()
        .filter(|lang| !hidden.contains(&lang.name.trim().to_lowercase()))
        .take(count.get())
        .collect()
}

/// Language with the largest summed file size; files without one are ignored
pub fn primary_language(gist: &RawGist) -> Option<String> {
    let mut totals: Vec<(&str, u64)> = Vec::new();
    for file in &gist.files {
        let Some(language) = file.language.as_deref() else {
            continue;
        };
        match totals.iter_mut().find(|(name, _)| *name == language) {
            Some((_, size)) => *size += file.size,
            None => totals.push((language, file.size)),
        }
    }

    // strictly greater, so the first-seen language wins ties
    let mut best: Option<(&str, u64)> = None;
    for (name, size) in totals {
        if best.is_none_or(|(_, best_size)| size > best_size) {
            best = Some((name, size));
        }
    }
    best.map(|(name, _)| name.to_string())
}

/// Shape a gist for its card; named after its first file
pub fn build_gist(gist: RawGist) -> CardResult<Gist> {
    let language = primary_language(&gist);
    let name = gist
        .files
        .first()
        .map(|file| file.name.clone())
        .ok_or(CardError::GistNotFound)?;

    Ok(Gist {
        name_with_owner: format!("{}/{}", gist.owner, name),
        name,
        description: gist.description,
        language,
        star_count: gist.star_count,
        fork_count: gist.fork_count,
    })
}

/// Pick the repository out of a user/organization lookup
///
/// Private repositories are reported as missing.
pub fn resolve_repository(owners: RepositoryOwners) -> CardResult<Repository> {
    let visible = |repo: Option<Repository>| repo.filter(|repo| !repo.is_private);

    match (owners.user, owners.organization) {
        (Some(repo), None) => {
            visible(repo).ok_or_else(|| CardError::RepoNotFound("User Repository Not found".into()))
        }
        (None, Some(repo)) => visible(repo)
            .ok_or_else(|| CardError::RepoNotFound("Organization Repository Not found".into())),
        (None, None) => Err(CardError::RepoNotFound("Not found".into())),
        (Some(_), Some(_)) => Err(CardError::Graphql(
            "Login resolved to both a user and an organization".into(),
        )),
    }
}

/// Current and longest streaks as of `today`
///
/// A day without contributions breaks a streak, except `today` itself:
/// the day is not over yet.
pub fn compute_streak(days: &[ContributionDay], today: NaiveDate) -> Streak {
    let mut days: Vec<ContributionDay> = days.iter().copied().filter(|day| day.date <= today).collect();
    days.sort_by_key(|day| day.date);

    let total_contributions = days.iter().map(|day| day.count).sum();
    let first_contribution = days.iter().find(|day| day.count > 0).map(|day| day.date);

    let mut longest = StreakRun::EMPTY;
    let mut run = StreakRun::EMPTY;
    for day in &days {
        if day.count == 0 {
            run = StreakRun::EMPTY;
            continue;
        }
        run.length += 1;
        run.start = run.start.or(Some(day.date));
        run.end = Some(day.date);
        if run.length > longest.length {
            longest = run;
        }
    }

    let mut current = StreakRun::EMPTY;
    let mut rest = days.as_slice();
    if let Some((last, earlier)) = rest.split_last()
        && last.date == today
        && last.count == 0
    {
        rest = earlier;
    }
    for day in rest.iter().rev() {
        if day.count == 0 {
            break;
        }
        current.length += 1;
        current.start = Some(day.date);
        current.end = current.end.or(Some(day.date));
    }

    Streak {
        total_contributions,
        first_contribution,
        current,
        longest,
    }
}

/// The last `window` days of the calendar, oldest first
pub fn recent_activity(days: &[ContributionDay], window: ActivityDays) -> Vec<ContributionDay> {
    let mut days = days.to_vec();
    days.sort_by_key(|day| day.date);
    let skip = days.len().saturating_sub(window.get());
    days.split_off(skip)
}
