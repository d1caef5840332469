use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
#[error("Invalid category '{0}'. Accepted values: 'guild', 'artifact', 'elixir'")]
pub struct CategoryParseError(String);

/// The three shop tabs of the clan shop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemCategory {
    Guild,
    Artifact,
    Elixir,
}

impl FromStr for ItemCategory {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guild" | "tong-mon" => Ok(ItemCategory::Guild),
            "artifact" | "phap-bao" => Ok(ItemCategory::Artifact),
            "elixir" | "dan-duoc" => Ok(ItemCategory::Elixir),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

impl Display for ItemCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCategory::Guild => write!(f, "Tông Môn"),
            ItemCategory::Artifact => write!(f, "Pháp Bảo"),
            ItemCategory::Elixir => write!(f, "Đan Dược"),
        }
    }
}

/// Currency an item is priced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceType {
    Treasury,
    Contribution,
}

impl Display for PriceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceType::Treasury => write!(f, "Tông Khố"),
            PriceType::Contribution => write!(f, "Cống Hiến"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Buy,
    Sell,
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Buy => write!(f, "buy"),
            ActionType::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshPeriod {
    Monthly,
}
