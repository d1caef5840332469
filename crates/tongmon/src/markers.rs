//! Marker vocabulary of the game client's markup. Eligibility, action
//! direction and rank highlighting are encoded only as presence/absence of
//! these strings, so they live here in one place and nowhere else.

use crate::dom::Node;
use crate::text::normalize_whitespace;

/// Marker node rendered inside a shop item the player cannot purchase.
const NOT_ELIGIBLE_QUERY: &str = ".not-eligible";

/// Class carried by an action button that sells back instead of buying.
const SELL_ACTION_CLASS: &str = "sell-action";

/// Row classes the client uses to highlight the top three weekly ranks.
const TOP_RANK_CLASSES: [&str; 3] = ["rank-first", "rank-second", "rank-third"];

/// Substring identifying an avatar-frame class on the avatar container.
const FRAME_CLASS_MARKER: &str = "frame";

/// Attribute the client's lazy loader stores the real image URL in.
const LAZY_SRC_ATTR: &str = "data-src";

/// Unit label of the cultivation stat in item names.
pub(crate) const CULTIVATION_UNIT: &str = "Tu Vi";

pub(crate) fn has_not_eligible_marker(item: Node) -> bool {
    item.has_descendant(NOT_ELIGIBLE_QUERY)
}

pub(crate) fn not_eligible_reason(item: Node) -> Option<String> {
    item.select_first(NOT_ELIGIBLE_QUERY)
        .map(|marker| normalize_whitespace(&marker.text()))
        .filter(|reason| !reason.is_empty())
}

pub(crate) fn is_sell_action(button: Node) -> bool {
    button.classes().contains(&SELL_ACTION_CLASS)
}

pub(crate) fn is_top_rank_row(row: Node) -> bool {
    row.classes()
        .iter()
        .any(|class| TOP_RANK_CLASSES.contains(class))
}

pub(crate) fn avatar_frame_class(container: Node) -> Option<String> {
    container
        .classes()
        .iter()
        .find(|class| class.contains(FRAME_CLASS_MARKER))
        .map(|class| class.to_string())
}

/// Image URL with the lazy-load attribute preferred over the primary source.
pub(crate) fn image_source(img: Node) -> String {
    img.attr(LAZY_SRC_ATTR)
        .or_else(|| img.attr("src"))
        .unwrap_or_default()
        .to_string()
}
