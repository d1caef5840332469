use serde::{Deserialize, Serialize};

use crate::clan::types::{ClanDetail, ClanMember};

#[derive(Debug, Default)]
pub struct RosterFilter {
    pub role: Option<String>,
    pub active_only: bool,
    pub min_weekly_points: Option<u64>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl RosterFilter {
    pub fn apply(self, mut members: Vec<ClanMember>) -> Vec<ClanMember> {
        if let Some(role) = self.role {
            members.retain(|m| m.role == role);
        }
        if self.active_only {
            members.retain(|m| m.weekly_points > 0);
        }
        if let Some(min) = self.min_weekly_points {
            members.retain(|m| m.weekly_points >= min);
        }
        if let Some(off) = self.offset {
            members = members.into_iter().skip(off).collect();
        }
        if let Some(lim) = self.limit {
            members.truncate(lim);
        }
        members
    }

    pub fn validate(self) -> Result<Self, String> {
        if self.offset.is_some_and(|o| o == 0) {
            return Err("Offset must be greater than 0".to_string());
        }
        if self.limit.is_some_and(|l| l == 0) {
            return Err("Limit must be greater than 0".to_string());
        }
        Ok(self)
    }
}

/// How urgently the treasury needs contributions, banded on the displayed
/// progress percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasuryUrgency {
    High,
    Medium,
    Low,
}

impl TreasuryUrgency {
    fn from_progress(progress_percentage: f64) -> Self {
        if progress_percentage < 25.0 {
            TreasuryUrgency::High
        } else if progress_percentage < 50.0 {
            TreasuryUrgency::Medium
        } else {
            TreasuryUrgency::Low
        }
    }
}

impl std::fmt::Display for TreasuryUrgency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreasuryUrgency::High => write!(f, "high"),
            TreasuryUrgency::Medium => write!(f, "medium"),
            TreasuryUrgency::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopContributor {
    pub id: String,
    pub name: String,
    pub total_score: u64,
}

/// Roll-up figures derived from a parsed [`ClanDetail`]. Performs no
/// extraction of its own and never mutates its input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanStats {
    pub total_members: usize,
    pub active_members: usize,
    pub average_weekly_points: f64,
    pub average_weekly_treasury: f64,
    pub top_contributor: Option<TopContributor>,
    pub treasury_urgency: TreasuryUrgency,
}

impl ClanStats {
    pub fn from_clan_detail(detail: &ClanDetail) -> ClanStats {
        let members = &detail.members;
        let total_members = members.len();
        let active_members = members.iter().filter(|m| m.weekly_points > 0).count();

        let average = |value: fn(&ClanMember) -> u64| -> f64 {
            if total_members == 0 {
                0.0
            } else {
                members.iter().map(value).sum::<u64>() as f64 / total_members as f64
            }
        };

        // First-seen member wins ties, so only a strictly higher score
        // replaces the leader.
        let mut leader: Option<&ClanMember> = None;
        for member in members {
            if leader.is_none_or(|l| member.total_score > l.total_score) {
                leader = Some(member);
            }
        }

        ClanStats {
            total_members,
            active_members,
            average_weekly_points: average(|m| m.weekly_points),
            average_weekly_treasury: average(|m| m.weekly_treasury),
            top_contributor: leader.map(|m| TopContributor {
                id: m.id.clone(),
                name: m.name.clone(),
                total_score: m.total_score,
            }),
            treasury_urgency: TreasuryUrgency::from_progress(
                detail.header.treasury.progress_percentage,
            ),
        }
    }
}

impl std::fmt::Display for ClanStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\nStatistics:")?;
        writeln!(
            f,
            "  Members (active/total):  {}/{}",
            self.active_members, self.total_members
        )?;
        writeln!(
            f,
            "  Avg weekly points:       {:.1}",
            self.average_weekly_points
        )?;
        writeln!(
            f,
            "  Avg weekly treasury:     {:.1}",
            self.average_weekly_treasury
        )?;
        if let Some(top) = &self.top_contributor {
            writeln!(f, "  Top contributor:         {} ({})", top.name, top.total_score)?;
        }
        writeln!(f, "  Treasury urgency:        {}", self.treasury_urgency)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clan::types::{ClanHeader, ClanLevel, ClanTreasury};

    fn member(id: &str, weekly_points: u64, weekly_treasury: u64, total_score: u64) -> ClanMember {
        ClanMember {
            id: id.to_string(),
            rank: 0,
            name: format!("member {}", id),
            role: "Đệ Tử".to_string(),
            avatar_url: String::new(),
            avatar_frame: None,
            profile_url: String::new(),
            weekly_points,
            weekly_treasury,
            total_score,
            is_rank_highlighted: false,
        }
    }

    fn detail_with(members: Vec<ClanMember>, progress: f64) -> ClanDetail {
        ClanDetail {
            header: ClanHeader {
                treasury: ClanTreasury {
                    current: 0,
                    target: 0,
                    progress_percentage: progress,
                },
                ..ClanHeader::default()
            },
            level: ClanLevel::default(),
            members,
            shop_buttons: Vec::new(),
            shop_data: None,
            points: 0,
        }
    }

    #[test]
    fn test_stats_on_empty_roster() {
        let stats = ClanStats::from_clan_detail(&detail_with(Vec::new(), 80.0));

        assert_eq!(stats.total_members, 0);
        assert_eq!(stats.active_members, 0);
        assert_eq!(stats.average_weekly_points, 0.0);
        assert_eq!(stats.average_weekly_treasury, 0.0);
        assert_eq!(stats.top_contributor, None);
        assert_eq!(stats.treasury_urgency, TreasuryUrgency::Low);
    }

    #[test]
    fn test_stats_counts_and_averages() {
        let detail = detail_with(
            vec![
                member("a", 3200, 15000, 245800),
                member("b", 0, 2500, 198400),
            ],
            24.5,
        );
        let stats = ClanStats::from_clan_detail(&detail);

        assert_eq!(stats.total_members, 2);
        assert_eq!(stats.active_members, 1);
        assert_eq!(stats.average_weekly_points, 1600.0);
        assert_eq!(stats.average_weekly_treasury, 8750.0);

        let top = stats.top_contributor.expect("roster is non-empty");
        assert_eq!(top.id, "a");
        assert_eq!(top.total_score, 245800);
    }

    #[test]
    fn test_top_contributor_tie_keeps_first_seen() {
        let detail = detail_with(vec![member("a", 1, 0, 500), member("b", 1, 0, 500)], 60.0);
        let stats = ClanStats::from_clan_detail(&detail);
        assert_eq!(stats.top_contributor.unwrap().id, "a");
    }

    #[test]
    fn test_urgency_bands() {
        let urgency = |p| ClanStats::from_clan_detail(&detail_with(Vec::new(), p)).treasury_urgency;

        assert_eq!(urgency(0.0), TreasuryUrgency::High);
        assert_eq!(urgency(24.9), TreasuryUrgency::High);
        assert_eq!(urgency(25.0), TreasuryUrgency::Medium);
        assert_eq!(urgency(49.9), TreasuryUrgency::Medium);
        assert_eq!(urgency(50.0), TreasuryUrgency::Low);
        assert_eq!(urgency(100.0), TreasuryUrgency::Low);
    }

    #[test]
    fn test_filter_apply_order() {
        let members = vec![
            member("a", 100, 0, 0),
            member("b", 0, 0, 0),
            member("c", 300, 0, 0),
            member("d", 200, 0, 0),
        ];

        let filtered = RosterFilter {
            active_only: true,
            offset: Some(1),
            limit: Some(1),
            ..RosterFilter::default()
        }
        .apply(members);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "c");
    }

    #[test]
    fn test_filter_by_role() {
        let mut elder = member("a", 0, 0, 0);
        elder.role = "Trưởng Lão".to_string();
        let members = vec![elder, member("b", 0, 0, 0)];

        let filtered = RosterFilter {
            role: Some("Trưởng Lão".to_string()),
            ..RosterFilter::default()
        }
        .apply(members);

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn test_filter_validate() {
        assert!(
            RosterFilter {
                limit: Some(0),
                ..RosterFilter::default()
            }
            .validate()
            .is_err()
        );
        assert!(
            RosterFilter {
                offset: Some(0),
                ..RosterFilter::default()
            }
            .validate()
            .is_err()
        );
        assert!(RosterFilter::default().validate().is_ok());
    }
}
