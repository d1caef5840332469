use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::shop::types::ShopCatalog;

/// The guild's shared currency pool. `progress_percentage` is read verbatim
/// from the page's progress marker and is not required to equal
/// `current / target`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanTreasury {
    pub current: u64,
    pub target: u64,
    pub progress_percentage: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContribution {
    pub points: u64,
    pub total_contributed: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanHeader {
    pub name: String,
    pub image_url: String,
    pub level: u32,
    pub level_image_url: String,
    pub member_count: u64,
    pub member_limit: u64,
    pub treasury: ClanTreasury,
    pub user_contribution: UserContribution,
}

impl Display for ClanHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "┌─ {} ─ Cấp {}", self.name, self.level)?;
        writeln!(
            f,
            "│  Thành viên: {}/{}",
            self.member_count, self.member_limit
        )?;
        writeln!(
            f,
            "│  Tông Khố: {}/{} ({}%)",
            self.treasury.current, self.treasury.target, self.treasury.progress_percentage
        )?;
        writeln!(
            f,
            "└─ Cống hiến: {} điểm ({} tổng)",
            self.user_contribution.points, self.user_contribution.total_contributed
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanLevel {
    pub level: u32,
    pub current_benefits: Vec<String>,
    pub next_benefits: Vec<String>,
    pub member_limit: u64,
    pub trials_range: String,
}

impl Display for ClanLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cấp {} — Thí Luyện: {}", self.level, self.trials_range)?;
        for benefit in &self.current_benefits {
            writeln!(f, "  • {}", benefit)?;
        }
        if !self.next_benefits.is_empty() {
            writeln!(f, "  Cấp tiếp theo:")?;
            for benefit in &self.next_benefits {
                writeln!(f, "  ◦ {}", benefit)?;
            }
        }
        Ok(())
    }
}

/// One roster row. `id` is the source-assigned member identity; `rank`
/// reflects display order on the page and is not re-derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub id: String,
    pub rank: u32,
    pub name: String,
    pub role: String,
    pub avatar_url: String,
    pub avatar_frame: Option<String>,
    pub profile_url: String,
    pub weekly_points: u64,
    pub weekly_treasury: u64,
    pub total_score: u64,
    pub is_rank_highlighted: bool,
}

impl Display for ClanMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let star = if self.is_rank_highlighted { "★" } else { " " };
        write!(
            f,
            "{}{:>3}. {} ({}) — tuần: {} điểm, {} khố — tổng: {}",
            star,
            self.rank,
            self.name,
            self.role,
            self.weekly_points,
            self.weekly_treasury,
            self.total_score
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanShopButton {
    pub id: String,
    pub name: String,
    pub icon_class: String,
    pub button_class: String,
    pub is_external: bool,
    pub url: Option<String>,
}

impl Display for ClanShopButton {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.id, self.name)?;
        if let Some(url) = &self.url {
            write!(f, " → {}", url)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanDetail {
    pub header: ClanHeader,
    pub level: ClanLevel,
    pub members: Vec<ClanMember>,
    pub shop_buttons: Vec<ClanShopButton>,
    pub shop_data: Option<ShopCatalog>,
    pub points: u64,
}

impl Display for ClanDetail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.header)?;
        writeln!(f)?;
        write!(f, "{}", self.level)?;
        writeln!(f)?;
        for member in &self.members {
            writeln!(f, "{}", member)?;
        }
        if !self.shop_buttons.is_empty() {
            writeln!(f)?;
            for button in &self.shop_buttons {
                writeln!(f, "  {}", button)?;
            }
        }
        if let Some(shop) = &self.shop_data {
            writeln!(f)?;
            write!(f, "{}", shop)?;
        }
        Ok(())
    }
}

/// A clan snapshot plus the instant it was captured. The timestamp comes
/// from the caller's clock, never from inside the extraction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanDetailExtractedData {
    pub clan_detail: ClanDetail,
    pub extracted_at: DateTime<Utc>,
}

impl Display for ClanDetailExtractedData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.clan_detail)?;
        writeln!(f)?;
        write!(f, "Chụp lúc: {}", self.extracted_at)
    }
}
