use crate::table::{RepositoryRow, RepositoryTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

pub const TOP_REPOSITORIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageCount {
    pub language: String,
    pub repositories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct YearCount {
    pub year: i32,
    pub repositories: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryMetrics {
    pub repository_count: usize,
    pub total_stars: u64,
    pub distinct_languages: usize,
}

/// Repositories per language, most used first. Equal counts keep the order
/// in which the language first appeared. Rows without a language are skipped.
pub fn language_histogram(table: &RepositoryTable) -> Vec<LanguageCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for language in table.iter().filter_map(|row| row.language.as_deref()) {
        let count = counts.entry(language).or_insert_with(|| {
            order.push(language);
            0
        });
        *count += 1;
    }

    let mut histogram: Vec<LanguageCount> = order
        .into_iter()
        .map(|language| LanguageCount {
            language: language.to_string(),
            repositories: counts[language],
        })
        .collect();

    // sort_by is stable, so ties stay in first-seen order
    histogram.sort_by(|a, b| b.repositories.cmp(&a.repositories));
    histogram
}

/// At most `n` rows, most starred first, ties in table order.
pub fn top_by_stars(table: &RepositoryTable, n: usize) -> Vec<&RepositoryRow> {
    let mut rows: Vec<&RepositoryRow> = table.iter().collect();
    rows.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count));
    rows.truncate(n);
    rows
}

/// Repositories created per year, oldest year first.
pub fn yearly_counts(table: &RepositoryTable) -> Vec<YearCount> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();
    for row in table {
        *years.entry(row.year()).or_default() += 1;
    }

    years
        .into_iter()
        .map(|(year, repositories)| YearCount { year, repositories })
        .collect()
}

pub fn summary(table: &RepositoryTable) -> SummaryMetrics {
    let languages: HashSet<&str> = table
        .iter()
        .filter_map(|row| row.language.as_deref())
        .collect();

    SummaryMetrics {
        repository_count: table.len(),
        total_stars: table
            .iter()
            .fold(0u64, |acc, row| acc.saturating_add(row.stargazers_count)),
        distinct_languages: languages.len(),
    }
}

/// Everything the dashboard draws, computed from one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub summary: SummaryMetrics,
    pub languages: Vec<LanguageCount>,
    pub top_repositories: Vec<RepositoryRow>,
    pub years: Vec<YearCount>,
}

impl DashboardStats {
    pub fn from_table(table: &RepositoryTable, top_n: usize) -> Self {
        Self {
            summary: summary(table),
            languages: language_histogram(table),
            top_repositories: top_by_stars(table, top_n).into_iter().cloned().collect(),
            years: yearly_counts(table),
        }
    }
}
