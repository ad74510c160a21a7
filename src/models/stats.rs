use serde::{Deserialize, Serialize};

/// Summary metrics shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_users: usize,
    pub unique_domains: usize,
    pub longest_name: Option<i64>,
    pub name_length_summary: NameLengthSummary,
    pub top_domains: Vec<DomainCount>,
    pub domain_counts: Vec<DomainCount>,
    pub domain_initials: Vec<DomainInitialCount>,
}

/// Descriptive statistics of `name_length`, pandas `describe()` style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NameLengthSummary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<i64>,
    pub p25: Option<f64>,
    pub p50: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainCount {
    pub email_domain: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainInitialCount {
    pub email_domain: String,
    pub initial: String,
    pub count: usize,
}
