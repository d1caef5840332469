use std::sync::LazyLock;

use regex::Regex;

use super::types::{DanDuocItem, PhapBaoItem, ShopCatalog, TongMonItem};
use crate::dom::{Document, Node};
use crate::markers;
use crate::text::{extract_bonus_amount, normalize_whitespace, parse_fraction, parse_locale_int};
use crate::types::{ActionType, ItemCategory, PriceType, RefreshPeriod};

pub(crate) const SHOP_ROOT_QUERY: &str = ".shop-tabs";

const GUILD_TAB_QUERY: &str = "#tab-tong-mon";
const ARTIFACT_TAB_QUERY: &str = "#tab-phap-bao";
const ELIXIR_TAB_QUERY: &str = "#tab-dan-duoc";
const ITEM_QUERY: &str = ".shop-item";

static RE_ITEM_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Cấp\s*(\d+)").expect("invalid regex: item level"));

/// Parses the guild shop page into the three item categories. A category
/// whose tab is missing from the document yields an empty list.
pub fn parse_shop_catalog(html: &str) -> ShopCatalog {
    let doc = Document::parse(html);
    extract_catalog(&doc)
}

pub(crate) fn extract_catalog(doc: &Document) -> ShopCatalog {
    ShopCatalog {
        guild_items: extract_guild_items(doc),
        artifact_items: extract_artifact_items(doc),
        elixir_items: extract_elixir_items(doc),
    }
}

/// Fields every shop item carries regardless of category.
struct RawItem {
    id: String,
    name: String,
    description: Option<String>,
    image_url: String,
    price: u64,
    is_eligible: bool,
    eligibility_reason: Option<String>,
}

fn extract_items<'a>(
    doc: &'a Document,
    tab_selector: &str,
    item_selector: &str,
) -> Vec<(Node<'a>, RawItem)> {
    let Some(tab) = doc.select_first(tab_selector) else {
        return Vec::new();
    };
    tab.select_all(item_selector)
        .into_iter()
        .map(|item| (item, extract_base(item)))
        .collect()
}

fn extract_base(item: Node) -> RawItem {
    let id = item
        .select_first(".item-action")
        .and_then(|button| button.attr("data-item-id"))
        .unwrap_or_default()
        .to_string();

    let name = item
        .select_first(".item-name")
        .map(|n| normalize_whitespace(&n.text()))
        .unwrap_or_default();

    let description = item
        .select_first(".item-desc")
        .map(|n| normalize_whitespace(&n.text()))
        .filter(|s| !s.is_empty());

    let image_url = item
        .select_first("img")
        .map(markers::image_source)
        .unwrap_or_default();

    // The price node nests a currency badge; only the node's own text is
    // the number.
    let price = item
        .select_first(".item-price")
        .map(|n| parse_locale_int(&n.own_text()))
        .unwrap_or(0);

    RawItem {
        id,
        name,
        description,
        image_url,
        price,
        is_eligible: !markers::has_not_eligible_marker(item),
        eligibility_reason: markers::not_eligible_reason(item),
    }
}

fn action_type(item: Node) -> ActionType {
    let sells = item
        .select_first(".item-action")
        .is_some_and(markers::is_sell_action);
    if sells { ActionType::Sell } else { ActionType::Buy }
}

pub fn extract_guild_items(doc: &Document) -> Vec<TongMonItem> {
    extract_items(doc, GUILD_TAB_QUERY, ITEM_QUERY)
        .into_iter()
        .map(|(item, base)| {
            let level = RE_ITEM_LEVEL
                .captures(&base.name)
                .and_then(|caps| caps[1].parse().ok())
                .unwrap_or(0);

            let bonus_description = item
                .select_first(".item-bonus")
                .map(|n| normalize_whitespace(&n.text()))
                .unwrap_or_default();

            TongMonItem {
                id: base.id,
                name: base.name,
                description: base.description,
                image_url: base.image_url,
                price: base.price,
                price_type: PriceType::Treasury,
                category: ItemCategory::Guild,
                level,
                bonus_description,
                action_type: action_type(item),
                is_eligible: base.is_eligible,
                eligibility_reason: base.eligibility_reason,
            }
        })
        .collect()
}

pub fn extract_artifact_items(doc: &Document) -> Vec<PhapBaoItem> {
    extract_items(doc, ARTIFACT_TAB_QUERY, ITEM_QUERY)
        .into_iter()
        .map(|(item, base)| {
            let cultivation_bonus = extract_bonus_amount(&base.name, markers::CULTIVATION_UNIT);

            PhapBaoItem {
                id: base.id,
                name: base.name,
                description: base.description,
                image_url: base.image_url,
                price: base.price,
                price_type: PriceType::Contribution,
                category: ItemCategory::Artifact,
                cultivation_bonus,
                action_type: action_type(item),
                is_eligible: base.is_eligible,
                eligibility_reason: base.eligibility_reason,
            }
        })
        .collect()
}

pub fn extract_elixir_items(doc: &Document) -> Vec<DanDuocItem> {
    extract_items(doc, ELIXIR_TAB_QUERY, ITEM_QUERY)
        .into_iter()
        .map(|(item, base)| {
            let cultivation_bonus = extract_bonus_amount(&base.name, markers::CULTIVATION_UNIT);

            // Stored as displayed; a used count past the limit is the
            // page's problem to show, not ours to clamp.
            let usage = item
                .select_first(".item-usage")
                .map(|n| parse_fraction(&n.text()))
                .unwrap_or_default();

            let contribution_requirement = item
                .select_first(".item-require")
                .map(|n| parse_locale_int(&n.text()))
                .unwrap_or(0);

            DanDuocItem {
                id: base.id,
                name: base.name,
                description: base.description,
                image_url: base.image_url,
                price: base.price,
                price_type: PriceType::Contribution,
                category: ItemCategory::Elixir,
                cultivation_bonus,
                usage_limit: usage.limit,
                used_count: usage.count,
                contribution_requirement,
                refresh_period: RefreshPeriod::Monthly,
                is_eligible: base.is_eligible,
                eligibility_reason: base.eligibility_reason,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP_HTML: &str = r#"
        <div class="shop-tabs">
          <div class="tab-pane" id="tab-tong-mon">
            <div class="shop-item">
              <img class="item-icon" src="/img/shop/placeholder.png" data-src="/img/shop/tu-linh-tran.png">
              <h4 class="item-name">Tụ Linh Trận Cấp 3</h4>
              <p class="item-desc">Tăng tốc độ tu luyện cho toàn tông môn.</p>
              <div class="item-bonus">Cống hiến +200</div>
              <div class="item-price">120,000<span class="price-badge">Tông Khố</span></div>
              <button class="item-action" data-item-id="tm-03">Mua</button>
            </div>
            <div class="shop-item">
              <img class="item-icon" src="/img/shop/ho-tong.png">
              <h4 class="item-name">Hộ Tông Đại Trận Cấp 5</h4>
              <div class="item-price">300,000<span class="price-badge">Tông Khố</span></div>
              <div class="item-condition not-eligible">Không đủ điều kiện</div>
              <button class="item-action sell-action" data-item-id="tm-05">Bán</button>
            </div>
          </div>
          <div class="tab-pane" id="tab-phap-bao">
            <div class="shop-item">
              <img class="item-icon" src="/img/shop/placeholder.png" data-src="/img/shop/phi-kiem.png">
              <h4 class="item-name">Phi Kiếm Thanh Quang +1,500 Tu Vi</h4>
              <div class="item-price">8,000<span class="price-badge">Cống Hiến</span></div>
              <button class="item-action" data-item-id="pb-11">Mua</button>
            </div>
          </div>
          <div class="tab-pane" id="tab-dan-duoc">
            <div class="shop-item">
              <img class="item-icon" src="/img/shop/tay-tuy-dan.png">
              <h4 class="item-name">Tẩy Tủy Đan +2,000 Tu Vi</h4>
              <div class="item-usage">6/5</div>
              <div class="item-require">Cần 10,000 cống hiến</div>
              <div class="item-price">2,500<span class="price-badge">Cống Hiến</span></div>
              <button class="item-action" data-item-id="dd-07">Mua</button>
            </div>
          </div>
        </div>
    "#;

    #[test]
    fn test_parse_guild_items() {
        let catalog = parse_shop_catalog(SHOP_HTML);

        assert_eq!(catalog.guild_items.len(), 2);
        let first = &catalog.guild_items[0];
        assert_eq!(first.id, "tm-03");
        assert_eq!(first.name, "Tụ Linh Trận Cấp 3");
        assert_eq!(
            first.description.as_deref(),
            Some("Tăng tốc độ tu luyện cho toàn tông môn.")
        );
        assert_eq!(first.image_url, "/img/shop/tu-linh-tran.png");
        assert_eq!(first.level, 3);
        assert_eq!(first.bonus_description, "Cống hiến +200");
        assert_eq!(first.price_type, PriceType::Treasury);
        assert_eq!(first.category, ItemCategory::Guild);
        assert_eq!(first.action_type, ActionType::Buy);
    }

    #[test]
    fn test_price_excludes_nested_badge_text() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        assert_eq!(catalog.guild_items[0].price, 120000);
        assert_eq!(catalog.artifact_items[0].price, 8000);
    }

    #[test]
    fn test_eligibility_defaults_to_true() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        let first = &catalog.guild_items[0];
        assert!(first.is_eligible);
        assert_eq!(first.eligibility_reason, None);
    }

    #[test]
    fn test_not_eligible_marker_sets_reason() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        let second = &catalog.guild_items[1];
        assert!(!second.is_eligible);
        assert_eq!(
            second.eligibility_reason.as_deref(),
            Some("Không đủ điều kiện")
        );
    }

    #[test]
    fn test_sell_action_marker() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        assert_eq!(catalog.guild_items[0].action_type, ActionType::Buy);
        assert_eq!(catalog.guild_items[1].action_type, ActionType::Sell);
    }

    #[test]
    fn test_image_prefers_lazy_load_attribute() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        assert_eq!(catalog.guild_items[0].image_url, "/img/shop/tu-linh-tran.png");
        assert_eq!(catalog.guild_items[1].image_url, "/img/shop/ho-tong.png");
    }

    #[test]
    fn test_artifact_cultivation_bonus_from_name() {
        let catalog = parse_shop_catalog(SHOP_HTML);

        assert_eq!(catalog.artifact_items.len(), 1);
        let artifact = &catalog.artifact_items[0];
        assert_eq!(artifact.id, "pb-11");
        assert_eq!(artifact.cultivation_bonus, 1500);
        assert_eq!(artifact.price_type, PriceType::Contribution);
        assert_eq!(artifact.category, ItemCategory::Artifact);
    }

    #[test]
    fn test_elixir_fields() {
        let catalog = parse_shop_catalog(SHOP_HTML);

        assert_eq!(catalog.elixir_items.len(), 1);
        let elixir = &catalog.elixir_items[0];
        assert_eq!(elixir.id, "dd-07");
        assert_eq!(elixir.cultivation_bonus, 2000);
        assert_eq!(elixir.contribution_requirement, 10000);
        assert_eq!(elixir.refresh_period, RefreshPeriod::Monthly);
        assert_eq!(elixir.price, 2500);
    }

    #[test]
    fn test_usage_overflow_is_preserved() {
        let catalog = parse_shop_catalog(SHOP_HTML);
        let elixir = &catalog.elixir_items[0];
        assert_eq!(elixir.used_count, 6);
        assert_eq!(elixir.usage_limit, 5);
    }

    #[test]
    fn test_missing_category_tab_yields_empty_list() {
        let html = r#"
            <div class="shop-tabs">
              <div class="tab-pane" id="tab-tong-mon">
                <div class="shop-item">
                  <h4 class="item-name">Tụ Linh Trận Cấp 1</h4>
                  <div class="item-price">1,000</div>
                  <button class="item-action" data-item-id="tm-01">Mua</button>
                </div>
              </div>
            </div>
        "#;

        let catalog = parse_shop_catalog(html);
        assert_eq!(catalog.guild_items.len(), 1);
        assert!(catalog.artifact_items.is_empty());
        assert!(catalog.elixir_items.is_empty());
    }

    #[test]
    fn test_empty_document() {
        let catalog = parse_shop_catalog("");
        assert_eq!(catalog, ShopCatalog::default());
        assert_eq!(catalog.total_items(), 0);
    }

    #[test]
    fn test_item_without_action_button_gets_empty_id() {
        let html = r#"
            <div id="tab-phap-bao">
              <div class="shop-item"><h4 class="item-name">Vô Danh Kiếm</h4></div>
            </div>
        "#;

        let catalog = parse_shop_catalog(html);
        let artifact = &catalog.artifact_items[0];
        assert_eq!(artifact.id, "");
        assert_eq!(artifact.price, 0);
        assert_eq!(artifact.cultivation_bonus, 0);
        assert!(artifact.is_eligible);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_shop_catalog(SHOP_HTML);
        let second = parse_shop_catalog(SHOP_HTML);
        assert_eq!(first, second);
    }
}
