use scraper::{ElementRef, Html, Selector};

/// A parsed HTML snapshot. The backing tree parser is an implementation
/// detail; extractors only see this interface.
pub struct Document {
    tree: Html,
}

impl Document {
    /// Parses leniently. A non-HTML string still yields a (near-empty)
    /// document rather than an error.
    pub fn parse(html: &str) -> Self {
        Self {
            tree: Html::parse_document(html),
        }
    }

    /// All elements matching `query`, in document order. An invalid query
    /// selects nothing.
    pub fn select_all(&self, query: &str) -> Vec<Node<'_>> {
        let Ok(selector) = Selector::parse(query) else {
            return Vec::new();
        };
        self.tree.select(&selector).map(Node::new).collect()
    }

    pub fn select_first(&self, query: &str) -> Option<Node<'_>> {
        let selector = Selector::parse(query).ok()?;
        self.tree.select(&selector).next().map(Node::new)
    }
}

/// One element of a [`Document`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl<'a> Node<'a> {
    fn new(element: ElementRef<'a>) -> Self {
        Self { element }
    }

    /// Descendants of this node matching `query`, in document order.
    pub fn select_all(&self, query: &str) -> Vec<Node<'a>> {
        let Ok(selector) = Selector::parse(query) else {
            return Vec::new();
        };
        self.element.select(&selector).map(Node::new).collect()
    }

    pub fn select_first(&self, query: &str) -> Option<Node<'a>> {
        let selector = Selector::parse(query).ok()?;
        self.element.select(&selector).next().map(Node::new)
    }

    pub fn has_descendant(&self, query: &str) -> bool {
        self.select_first(query).is_some()
    }

    /// Concatenated text of this node and all descendants.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Text belonging to this node's direct text children only. Text inside
    /// nested elements is excluded.
    pub fn own_text(&self) -> String {
        let mut out = String::new();
        for child in self.element.children() {
            if let Some(text) = child.value().as_text() {
                out.push_str(text);
            }
        }
        out
    }

    /// Raw inner markup of this node.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn classes(&self) -> Vec<&'a str> {
        self.element.value().classes().collect()
    }

    pub fn tag_name(&self) -> &'a str {
        self.element.value().name()
    }
}
