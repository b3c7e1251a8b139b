use scraper::ElementRef;

/// Read access to a parsed HTML element: attribute lookup, descendant
/// search and visible text.
pub trait MarkupNode: Sized {
    fn attribute(&self, name: &str) -> Option<&str>;

    /// All attributes as `(name, value)`.
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// First descendant element with the given tag name, excluding `self`.
    fn find_tag(&self, tag: &str) -> Option<Self>;

    /// Descendant elements in document order, excluding `self`.
    fn descendant_elements(&self) -> Vec<Self>;

    /// Visible text with runs of whitespace collapsed to single spaces.
    fn visible_text(&self) -> String;
}

impl<'a> MarkupNode for ElementRef<'a> {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.value().attrs().collect()
    }

    fn find_tag(&self, tag: &str) -> Option<Self> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name().eq_ignore_ascii_case(tag))
    }

    fn descendant_elements(&self) -> Vec<Self> {
        self.descendants().skip(1).filter_map(ElementRef::wrap).collect()
    }

    fn visible_text(&self) -> String {
        collapse_whitespace(self.text())
    }
}

/// Joins text fragments, splitting on any whitespace and rejoining with a
/// single space.
pub fn collapse_whitespace<'s>(fragments: impl IntoIterator<Item = &'s str>) -> String {
    fragments
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
