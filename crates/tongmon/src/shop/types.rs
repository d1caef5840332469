use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::{ActionType, ItemCategory, PriceType, RefreshPeriod};

/// A guild-tier item priced in treasury currency, gated by guild level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TongMonItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub price_type: PriceType,
    pub category: ItemCategory,
    pub level: u32,
    pub bonus_description: String,
    pub action_type: ActionType,
    pub is_eligible: bool,
    pub eligibility_reason: Option<String>,
}

impl Display for TongMonItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} — {} {} ({})",
            self.name, self.price, self.price_type, self.action_type
        )?;
        if !self.is_eligible {
            write!(
                f,
                " [{}]",
                self.eligibility_reason.as_deref().unwrap_or("khóa")
            )?;
        }
        Ok(())
    }
}

/// An artifact item priced in contribution points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhapBaoItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub price_type: PriceType,
    pub category: ItemCategory,
    pub cultivation_bonus: u64,
    pub action_type: ActionType,
    pub is_eligible: bool,
    pub eligibility_reason: Option<String>,
}

impl Display for PhapBaoItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} — +{} Tu Vi — {} {}",
            self.name, self.cultivation_bonus, self.price, self.price_type
        )?;
        if !self.is_eligible {
            write!(
                f,
                " [{}]",
                self.eligibility_reason.as_deref().unwrap_or("khóa")
            )?;
        }
        Ok(())
    }
}

/// An elixir item with a monthly usage limit. `used_count` is stored as the
/// page displays it and may exceed `usage_limit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DanDuocItem {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: String,
    pub price: u64,
    pub price_type: PriceType,
    pub category: ItemCategory,
    pub cultivation_bonus: u64,
    pub usage_limit: u64,
    pub used_count: u64,
    pub contribution_requirement: u64,
    pub refresh_period: RefreshPeriod,
    pub is_eligible: bool,
    pub eligibility_reason: Option<String>,
}

impl Display for DanDuocItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} — +{} Tu Vi — {}/{} tháng này — {} {}",
            self.name,
            self.cultivation_bonus,
            self.used_count,
            self.usage_limit,
            self.price,
            self.price_type
        )?;
        if !self.is_eligible {
            write!(
                f,
                " [{}]",
                self.eligibility_reason.as_deref().unwrap_or("khóa")
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopCatalog {
    pub guild_items: Vec<TongMonItem>,
    pub artifact_items: Vec<PhapBaoItem>,
    pub elixir_items: Vec<DanDuocItem>,
}

impl ShopCatalog {
    pub fn total_items(&self) -> usize {
        self.guild_items.len() + self.artifact_items.len() + self.elixir_items.len()
    }
}

impl Display for ShopCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "── Tông Môn ({})", self.guild_items.len())?;
        for item in &self.guild_items {
            writeln!(f, "  {}", item)?;
        }
        writeln!(f, "── Pháp Bảo ({})", self.artifact_items.len())?;
        for item in &self.artifact_items {
            writeln!(f, "  {}", item)?;
        }
        writeln!(f, "── Đan Dược ({})", self.elixir_items.len())?;
        for item in &self.elixir_items {
            writeln!(f, "  {}", item)?;
        }
        Ok(())
    }
}
