//! Data model for the OpenAlex gateway.
//!
//! Two layers live here: the domain types the interpreter works with
//! (`AuthorSummary`, `AuthorProfile`, `Work`, ...) and the serde structs that
//! mirror the OpenAlex wire shapes. The wire structs stay private to this
//! module apart from what the client needs to deserialize; conversion into
//! the domain types happens immediately after decoding.

use serde::Deserialize;

/// Strip the `https://openalex.org/` prefix if present.
///
/// The service returns entity ids as full URLs but accepts the bare form in
/// paths and filters; we store the bare form everywhere.
pub fn normalize_entity_id(id: &str) -> String {
    let id = id.trim_end_matches('/');
    match id.rsplit_once('/') {
        Some((prefix, bare)) if prefix.contains("openalex.org") => bare.to_string(),
        _ => id.to_string(),
    }
}

/// One author row from a search response, in the service's relevance order.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorSummary {
    pub id: String,
    pub display_name: String,
    pub works_count: u64,
    pub cited_by_count: u64,
    pub affiliation: Option<String>,
    pub orcid: Option<String>,
}

/// Citation summary statistics for one author.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorStats {
    pub works_count: u64,
    pub cited_by_count: u64,
    pub h_index: Option<i64>,
    pub i10_index: Option<i64>,
    pub two_year_mean_citedness: Option<f64>,
}

/// One research topic with the author's work count in it.
#[derive(Debug, Clone, PartialEq)]
pub struct TopicShare {
    pub display_name: String,
    pub count: u64,
}

/// Full author record, fetched only once an author is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthorProfile {
    pub summary: AuthorSummary,
    pub affiliations: Vec<String>,
    pub topics: Vec<TopicShare>,
    pub stats: AuthorStats,
}

/// One publication row from a works query.
#[derive(Debug, Clone, PartialEq)]
pub struct Work {
    pub id: String,
    pub title: String,
    pub publication_year: Option<i32>,
    pub cited_by_count: u64,
    pub venue: Option<String>,
    pub topics: Vec<String>,
}

/// Works-mode query variants, mapped to filter/sort parameters by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorksFilter {
    Recent,
    TopCited,
    TextSearch(String),
    ByYear(u16),
}

// ---------------------------------------------------------------------------
// Wire shapes (OpenAlex JSON)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawInstitution {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAffiliation {
    pub institution: Option<RawInstitution>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSummaryStats {
    pub h_index: Option<i64>,
    pub i10_index: Option<i64>,
    #[serde(rename = "2yr_mean_citedness")]
    pub two_year_mean_citedness: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTopic {
    pub display_name: Option<String>,
    #[serde(default)]
    pub count: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawAuthor {
    pub id: String,
    pub display_name: Option<String>,
    #[serde(default)]
    pub works_count: u64,
    #[serde(default)]
    pub cited_by_count: u64,
    pub orcid: Option<String>,
    #[serde(default)]
    pub affiliations: Vec<RawAffiliation>,
    pub summary_stats: Option<RawSummaryStats>,
    #[serde(default)]
    pub topics: Vec<RawTopic>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawSource {
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawLocation {
    pub source: Option<RawSource>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawWork {
    pub id: String,
    pub display_name: Option<String>,
    pub publication_year: Option<i32>,
    #[serde(default)]
    pub cited_by_count: u64,
    pub primary_location: Option<RawLocation>,
    #[serde(default)]
    pub topics: Vec<RawTopic>,
}

impl RawAuthor {
    fn affiliation_names(&self) -> Vec<String> {
        self.affiliations
            .iter()
            .filter_map(|a| a.institution.as_ref())
            .filter_map(|i| i.display_name.clone())
            .collect()
    }

    pub(crate) fn into_summary(self) -> AuthorSummary {
        let affiliation = self.affiliation_names().into_iter().next();
        AuthorSummary {
            id: normalize_entity_id(&self.id),
            display_name: self.display_name.unwrap_or_else(|| "Unknown".to_string()),
            works_count: self.works_count,
            cited_by_count: self.cited_by_count,
            affiliation,
            orcid: self.orcid,
        }
    }

    pub(crate) fn into_profile(self) -> AuthorProfile {
        let affiliations = self.affiliation_names();
        let stats = AuthorStats {
            works_count: self.works_count,
            cited_by_count: self.cited_by_count,
            h_index: self.summary_stats.as_ref().and_then(|s| s.h_index),
            i10_index: self.summary_stats.as_ref().and_then(|s| s.i10_index),
            two_year_mean_citedness: self
                .summary_stats
                .as_ref()
                .and_then(|s| s.two_year_mean_citedness),
        };
        let topics = self
            .topics
            .iter()
            .filter_map(|t| {
                t.display_name.as_ref().map(|name| TopicShare {
                    display_name: name.clone(),
                    count: t.count,
                })
            })
            .collect();
        let summary = AuthorSummary {
            id: normalize_entity_id(&self.id),
            display_name: self.display_name.unwrap_or_else(|| "Unknown".to_string()),
            works_count: self.works_count,
            cited_by_count: self.cited_by_count,
            affiliation: affiliations.first().cloned(),
            orcid: self.orcid,
        };
        AuthorProfile {
            summary,
            affiliations,
            topics,
            stats,
        }
    }
}

impl RawWork {
    pub(crate) fn into_work(self) -> Work {
        let venue = self
            .primary_location
            .and_then(|l| l.source)
            .and_then(|s| s.display_name);
        let topics = self
            .topics
            .into_iter()
            .filter_map(|t| t.display_name)
            .collect();
        Work {
            id: normalize_entity_id(&self.id),
            title: self.display_name.unwrap_or_else(|| "Untitled".to_string()),
            publication_year: self.publication_year,
            cited_by_count: self.cited_by_count,
            venue,
            topics,
        }
    }
}
