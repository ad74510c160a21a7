use std::collections::{BTreeMap, HashMap};

use crate::models::{DashboardStats, DomainCount, DomainInitialCount, NameLengthSummary, UserView};

/// Number of domains listed in `top_domains`
pub const TOP_DOMAINS: usize = 5;

pub fn dashboard_stats(rows: &[UserView]) -> DashboardStats {
    let domain_counts = domain_counts(rows);

    DashboardStats {
        total_users: rows.len(),
        unique_domains: domain_counts.len(),
        longest_name: rows.iter().map(|row| row.name_length).max(),
        name_length_summary: summarize_name_lengths(rows),
        top_domains: domain_counts.iter().take(TOP_DOMAINS).cloned().collect(),
        domain_counts,
        domain_initials: domain_initials(rows),
    }
}

/// Non-null domains with their user counts, most frequent first.
pub fn domain_counts(rows: &[UserView]) -> Vec<DomainCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for domain in rows.iter().filter_map(|row| row.email_domain.as_deref()) {
        *counts.entry(domain).or_default() += 1;
    }

    let mut counts: Vec<DomainCount> = counts
        .into_iter()
        .map(|(domain, count)| DomainCount {
            email_domain: domain.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.email_domain.cmp(&b.email_domain)));
    counts
}

/// Users grouped by domain and name initial, ordered by domain then initial.
pub fn domain_initials(rows: &[UserView]) -> Vec<DomainInitialCount> {
    let mut groups: BTreeMap<(String, String), usize> = BTreeMap::new();
    for row in rows {
        let (Some(domain), Some(initial)) = (row.email_domain.as_ref(), row.initial()) else {
            continue;
        };
        *groups.entry((domain.clone(), initial)).or_default() += 1;
    }

    groups
        .into_iter()
        .map(|((email_domain, initial), count)| DomainInitialCount {
            email_domain,
            initial,
            count,
        })
        .collect()
}

pub fn summarize_name_lengths(rows: &[UserView]) -> NameLengthSummary {
    let mut lengths: Vec<i64> = rows.iter().map(|row| row.name_length).collect();
    if lengths.is_empty() {
        return NameLengthSummary::default();
    }
    lengths.sort_unstable();

    let count = lengths.len();
    let n = count as f64;
    let mean = lengths.iter().map(|&v| v as f64).sum::<f64>() / n;
    // Sample standard deviation (ddof = 1)
    let std = (count > 1).then(|| {
        let variance = lengths
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / (n - 1.0);
        variance.sqrt()
    });

    NameLengthSummary {
        count,
        mean: Some(mean),
        std,
        min: lengths.first().copied(),
        p25: Some(quantile(&lengths, 0.25)),
        p50: Some(quantile(&lengths, 0.50)),
        p75: Some(quantile(&lengths, 0.75)),
        max: lengths.last().copied(),
    }
}

/// Linear-interpolated quantile of a sorted, non-empty slice.
fn quantile(sorted: &[i64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    let low = sorted[lower] as f64;
    let high = sorted[upper] as f64;
    low + (high - low) * fraction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NameLengthPolicy, User};

    fn row(id: i64, name: Option<&str>, email: Option<&str>) -> UserView {
        UserView::derive(
            User {
                id,
                name: name.map(str::to_string),
                username: None,
                email: email.map(str::to_string),
                phone: None,
                website: None,
            },
            NameLengthPolicy::Source,
        )
    }

    fn sample() -> Vec<UserView> {
        vec![
            row(1, Some("Leanne Graham"), Some("Sincere@april.biz")),
            row(2, Some("Ervin Howell"), Some("Shanna@melissa.tv")),
            row(3, Some("Clementine Bauch"), Some("Nathan@yesenia.net")),
            row(4, Some("Patricia Lebsack"), Some("Julianne.OConner@kory.org")),
            row(5, Some("Chelsey Dietrich"), Some("Lucio_Hettinger@annie.ca")),
            row(6, Some("Mrs. Dennis Schulist"), Some("Karley_Dach@jasper.info")),
            row(7, Some("Kurtis Weissnat"), Some("Telly.Hoeger@billy.biz")),
            row(8, Some("Nicholas Runolfsdottir V"), Some("Sherwood@rosamond.me")),
            row(9, Some("Glenna Reichert"), Some("Chaim_McDermott@dana.io")),
            row(10, Some("Clementina DuBuque"), Some("Rey.Padberg@karina.biz")),
        ]
    }

    #[test]
    fn test_headline_metrics() {
        let stats = dashboard_stats(&sample());
        assert_eq!(stats.total_users, 10);
        assert_eq!(stats.unique_domains, 10);
        assert_eq!(stats.longest_name, Some(24));
    }

    #[test]
    fn test_domain_counts_sorted_by_frequency() {
        let counts = domain_counts(&sample());
        assert_eq!(counts[0].email_domain, "annie.ca");
        assert_eq!(counts[0].count, 1);

        let mut rows = sample();
        rows.push(row(11, Some("Extra"), Some("x@Kory.org")));
        rows.push(row(12, Some("Nobody"), None));
        let counts = domain_counts(&rows);
        assert_eq!(counts[0].email_domain, "kory.org");
        assert_eq!(counts[0].count, 2);
        assert_eq!(counts.len(), 10);
        assert!(counts.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[test]
    fn test_top_domains_capped() {
        let stats = dashboard_stats(&sample());
        assert_eq!(stats.top_domains.len(), TOP_DOMAINS);
        assert_eq!(stats.top_domains[..], stats.domain_counts[..TOP_DOMAINS]);
    }

    #[test]
    fn test_domain_initials_skip_null_domains() {
        let rows = vec![
            row(1, Some("clara"), Some("a@x.com")),
            row(2, Some("Carl"), Some("b@X.com")),
            row(3, Some("Dora"), Some("c@x.com")),
            row(4, Some("Eve"), None),
        ];
        let groups = domain_initials(&rows);
        assert_eq!(
            groups,
            vec![
                DomainInitialCount {
                    email_domain: "x.com".into(),
                    initial: "C".into(),
                    count: 2
                },
                DomainInitialCount {
                    email_domain: "x.com".into(),
                    initial: "D".into(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_summary_matches_describe() {
        let rows: Vec<UserView> = ["ab", "abcd", "abcdef", "abcdefgh"]
            .iter()
            .enumerate()
            .map(|(i, name)| row(i as i64, Some(*name), None))
            .collect();
        let summary = summarize_name_lengths(&rows);

        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(5.0));
        assert_eq!(summary.min, Some(2));
        assert_eq!(summary.max, Some(8));
        assert_eq!(summary.p25, Some(3.5));
        assert_eq!(summary.p50, Some(5.0));
        assert_eq!(summary.p75, Some(6.5));
        let std = summary.std.unwrap();
        assert!((std - 2.581_988_897_471_611).abs() < 1e-9);
    }

    #[test]
    fn test_summary_edge_cases() {
        assert_eq!(summarize_name_lengths(&[]), NameLengthSummary::default());

        let single = summarize_name_lengths(&[row(1, Some("abc"), None)]);
        assert_eq!(single.count, 1);
        assert_eq!(single.std, None);
        assert_eq!(single.p75, Some(3.0));

        let empty = dashboard_stats(&[]);
        assert_eq!(empty.longest_name, None);
        assert!(empty.domain_counts.is_empty());
    }
}
