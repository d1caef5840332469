use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::types::{
    ClanDetail, ClanDetailExtractedData, ClanHeader, ClanLevel, ClanMember, ClanShopButton,
    ClanTreasury, UserContribution,
};
use crate::dom::{Document, Node};
use crate::markers;
use crate::shop;
use crate::text::{
    longest_digit_run, normalize_whitespace, parse_fraction, parse_locale_int, parse_percentage,
};

const MEMBER_ROW_QUERY: &str = ".member-table tr";
const ACTION_BAR_QUERY: &str = ".clan-actions";
const MEMBER_COUNT_QUERY: &str = ".member-count";

/// Literal header line the client renders above both benefit lists.
const BENEFITS_HEADER: &str = "Phúc lợi";

static RE_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:Cấp|Level)\s*(\d+)").expect("invalid regex: level"));

static RE_TRIALS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Thí Luyện\s*:\s*([^-\n]+)").expect("invalid regex: trials"));

static RE_LINE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("invalid regex: line break"));

static RE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("invalid regex: tag"));

/// Parses a clan detail snapshot. Extraction never fails: absent fragments
/// degrade to per-field defaults and missing sections to empty lists.
/// `extracted_at` is the caller's capture instant.
pub fn parse_clan_detail(html: &str, extracted_at: DateTime<Utc>) -> ClanDetailExtractedData {
    let doc = Document::parse(html);

    let header = extract_header(&doc);
    let points = header.user_contribution.points;

    let shop_data = doc
        .select_first(shop::parser::SHOP_ROOT_QUERY)
        .map(|_| shop::parser::extract_catalog(&doc));

    ClanDetailExtractedData {
        clan_detail: ClanDetail {
            header,
            level: extract_level(&doc),
            members: extract_members(&doc),
            shop_buttons: extract_shop_buttons(&doc),
            shop_data,
            points,
        },
        extracted_at,
    }
}

pub fn extract_header(doc: &Document) -> ClanHeader {
    let name = doc
        .select_first(".clan-header .clan-name")
        .map(|n| normalize_whitespace(&n.text()))
        .unwrap_or_default();

    let image_url = doc
        .select_first(".clan-header img.clan-avatar")
        .map(markers::image_source)
        .unwrap_or_default();

    let (level, level_image_url) = extract_level_badge(doc);

    let members = doc
        .select_first(MEMBER_COUNT_QUERY)
        .map(|n| parse_fraction(&n.text()))
        .unwrap_or_default();

    ClanHeader {
        name,
        image_url,
        level,
        level_image_url,
        member_count: members.count,
        member_limit: members.limit,
        treasury: extract_treasury(doc),
        user_contribution: extract_user_contribution(doc),
    }
}

fn extract_level_badge(doc: &Document) -> (u32, String) {
    let Some(badge) = doc.select_first(".clan-level-badge img") else {
        return (0, String::new());
    };

    let level = badge
        .attr("title")
        .and_then(|title| RE_LEVEL.captures(title))
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(0);

    (level, markers::image_source(badge))
}

fn extract_treasury(doc: &Document) -> ClanTreasury {
    // The percentage comes from the progress marker as rendered; it is not
    // recomputed from current/target.
    let progress_percentage = doc
        .select_first(".clan-treasury .progress-bar")
        .map(|n| parse_percentage(&n.text()))
        .unwrap_or(0.0);

    let current = doc
        .select_first(".clan-treasury .treasury-current")
        .map(|n| parse_locale_int(&n.text()))
        .unwrap_or(0);

    let target = doc
        .select_first(".clan-treasury .treasury-target")
        .map(|n| parse_locale_int(&n.text()))
        .unwrap_or(0);

    ClanTreasury {
        current,
        target,
        progress_percentage,
    }
}

fn extract_user_contribution(doc: &Document) -> UserContribution {
    let points = doc
        .select_first(".user-contribution .contribution-points")
        .map(|n| parse_locale_int(&n.text()))
        .unwrap_or(0);

    // Free text around the total varies between client versions; the
    // number itself is the longest digit run in it.
    let total_contributed = doc
        .select_first(".user-contribution .contribution-total")
        .map(|n| longest_digit_run(&n.text()))
        .unwrap_or(0);

    UserContribution {
        points,
        total_contributed,
    }
}

pub fn extract_level(doc: &Document) -> ClanLevel {
    let (level, _) = extract_level_badge(doc);

    let current_benefits = extract_benefit_lines(doc, ".current-benefits");
    let next_benefits = extract_benefit_lines(doc, ".next-benefits");

    let member_limit = doc
        .select_first(MEMBER_COUNT_QUERY)
        .map(|n| parse_fraction(&n.text()).limit)
        .unwrap_or(0);

    let trials_range = current_benefits
        .iter()
        .find_map(|line| RE_TRIALS.captures(line))
        .map(|caps| caps[1].trim().to_string())
        .unwrap_or_default();

    ClanLevel {
        level,
        current_benefits,
        next_benefits,
        member_limit,
        trials_range,
    }
}

fn extract_benefit_lines(doc: &Document, query: &str) -> Vec<String> {
    let Some(block) = doc.select_first(query) else {
        return Vec::new();
    };

    let markup = block.inner_html();
    RE_LINE_BREAK
        .split(&markup)
        .map(|fragment| normalize_whitespace(&RE_TAG.replace_all(fragment, " ")))
        .map(|line| line.strip_prefix("- ").unwrap_or(&line).to_string())
        .filter(|line| !line.is_empty() && line != BENEFITS_HEADER)
        .collect()
}

pub fn extract_members(doc: &Document) -> Vec<ClanMember> {
    doc.select_all(MEMBER_ROW_QUERY)
        .into_iter()
        .filter_map(extract_member_row)
        .collect()
}

fn extract_member_row(row: Node) -> Option<ClanMember> {
    // Placeholder and decoration rows carry no member identity.
    let id = row.attr("data-member-id")?.to_string();

    let rank = row
        .select_first(".member-rank")
        .map(|n| parse_locale_int(&n.text()))
        .and_then(|rank| u32::try_from(rank).ok())
        .unwrap_or(0);

    let link = row.select_first("a.member-name");
    let name = match link {
        Some(link) => link
            .attr("title")
            .map(str::to_string)
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| normalize_whitespace(&link.text())),
        None => String::new(),
    };
    let profile_url = link
        .and_then(|l| l.attr("href"))
        .unwrap_or_default()
        .to_string();

    let role = row
        .select_first(".member-role")
        .map(|n| normalize_whitespace(&n.text()))
        .unwrap_or_default();

    let avatar = row.select_first(".member-avatar");
    let avatar_url = avatar
        .and_then(|container| container.select_first("img"))
        .map(markers::image_source)
        .unwrap_or_default();
    let avatar_frame = avatar.and_then(markers::avatar_frame_class);

    // Weekly points, weekly treasury and total score are positional: the
    // row's bold numeric cells, in that order.
    let stats: Vec<u64> = row
        .select_all("b")
        .into_iter()
        .map(|n| parse_locale_int(&n.text()))
        .collect();

    Some(ClanMember {
        id,
        rank,
        name,
        role,
        avatar_url,
        avatar_frame,
        profile_url,
        weekly_points: stats.first().copied().unwrap_or(0),
        weekly_treasury: stats.get(1).copied().unwrap_or(0),
        total_score: stats.get(2).copied().unwrap_or(0),
        is_rank_highlighted: markers::is_top_rank_row(row),
    })
}

pub fn extract_shop_buttons(doc: &Document) -> Vec<ClanShopButton> {
    let Some(bar) = doc.select_first(ACTION_BAR_QUERY) else {
        return Vec::new();
    };

    bar.select_all("a, button")
        .into_iter()
        .enumerate()
        .map(|(index, element)| {
            let is_external = element.tag_name() == "a";

            ClanShopButton {
                id: element
                    .attr("id")
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("button-{}", index)),
                name: normalize_whitespace(&element.text()),
                icon_class: element
                    .select_first("i")
                    .and_then(|icon| icon.attr("class"))
                    .unwrap_or_default()
                    .to_string(),
                button_class: element.attr("class").unwrap_or_default().to_string(),
                is_external,
                url: if is_external {
                    element.attr("href").map(str::to_string)
                } else {
                    None
                },
            }
        })
        .collect()
}
