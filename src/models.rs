use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PAGE_SIZE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Saved,
    Applied,
    Interview,
    Offer,
    Rejected,
}

impl Status {
    /// Display order used by every status picker and the status chart.
    pub const ALL: [Status; 5] = [
        Status::Saved,
        Status::Applied,
        Status::Interview,
        Status::Offer,
        Status::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Saved => "saved",
            Status::Applied => "applied",
            Status::Interview => "interview",
            Status::Offer => "offer",
            Status::Rejected => "rejected",
        }
    }

    pub fn next(self) -> Status {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Status {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                anyhow!("Unknown status '{}'. Expected one of: saved, applied, interview, offer, rejected", s)
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn toggle(self) -> SortOrder {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortOrder::Asc => "Oldest first",
            SortOrder::Desc => "Newest first",
        }
    }
}

/// Link-presence filter; `Any` leaves `has_link` off the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkFilter {
    #[default]
    Any,
    HasLink,
    MissingLink,
}

impl LinkFilter {
    pub fn as_param(self) -> Option<bool> {
        match self {
            LinkFilter::Any => None,
            LinkFilter::HasLink => Some(true),
            LinkFilter::MissingLink => Some(false),
        }
    }

    pub fn cycle(self) -> LinkFilter {
        match self {
            LinkFilter::Any => LinkFilter::HasLink,
            LinkFilter::HasLink => LinkFilter::MissingLink,
            LinkFilter::MissingLink => LinkFilter::Any,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkFilter::Any => "All links",
            LinkFilter::HasLink => "Has link",
            LinkFilter::MissingLink => "Missing link",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Application {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub status: Status,
    pub date_applied: NaiveDate,
    pub next_action_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCreate {
    pub company: String,
    pub role: String,
    pub location: Option<String>,
    pub url: Option<String>,
    pub status: Status,
    pub date_applied: NaiveDate,
    pub next_action_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusUpdate {
    pub status: Status,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationList {
    pub items: Vec<Application>,
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub total: u64,
    #[serde(default)]
    pub counts: BTreeMap<String, u64>,
    pub response_rate: f64,
    pub due_today: u64,
    pub saved_jobs: u64,
    pub interviews: u64,
}

impl Stats {
    pub fn count(&self, status: Status) -> u64 {
        self.counts.get(status.as_str()).copied().unwrap_or(0)
    }

    pub fn response_rate_percent(&self) -> u64 {
        (self.response_rate * 100.0).round().max(0.0) as u64
    }
}

/// Filters for one page of the listing, mapped onto the query string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListQuery {
    pub q: Option<String>,
    pub status: Option<Status>,
    pub has_link: Option<bool>,
    pub sort_order: SortOrder,
    pub limit: u32,
    pub offset: u64,
}

impl ListQuery {
    pub fn page(page: u32) -> Self {
        Self {
            limit: PAGE_SIZE,
            offset: u64::from(page.saturating_sub(1)) * u64::from(PAGE_SIZE),
            ..Default::default()
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_str().to_string()));
        }
        if let Some(has_link) = self.has_link {
            params.push(("has_link", has_link.to_string()));
        }
        let sort = match self.sort_order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        params.push(("sort_order", sort.to_string()));
        params.push(("limit", self.limit.to_string()));
        params.push(("offset", self.offset.to_string()));
        params
    }
}

pub fn total_pages(total: u64) -> u32 {
    let pages = total.div_ceil(PAGE_SIZE as u64).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}
