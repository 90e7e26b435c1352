//! Comparator set - pure ordering rules for attributes and child elements
//!
//! Attributes order by name. Child elements order through a
//! [`ChildOrdering`], which maps each element to a sort key once; the
//! default [`ByTagAndName`] key is (tag, name-bearing attribute, canonical
//! subtree text). Keys are only meaningful for subtrees that are already
//! normalized, which the tree sorter guarantees by working post-order.

use std::cmp::Ordering;

use crate::element::{Attribute, Element};
use crate::serializer::element_to_string;

/// Attributes consulted for an element's name, highest priority first
pub const NAME_ATTRIBUTES: [&str; 3] = ["name", "key", "id"];

/// Order attributes by name (case-sensitive, code point order)
pub fn compare_attributes(a: &Attribute, b: &Attribute) -> Ordering {
    a.name.cmp(&b.name)
}

/// Value of the first name-bearing attribute present on `element`
pub fn distinguishing_name(element: &Element) -> Option<&str> {
    NAME_ATTRIBUTES
        .iter()
        .find_map(|attr| element.attribute(attr))
}

/// Optional key component where a present value sorts before an absent one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbsentLast<T>(pub Option<T>);

impl<T: Ord> PartialOrd for AbsentLast<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: Ord> Ord for AbsentLast<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        match (&self.0, &other.0) {
            (Some(a), Some(b)) => a.cmp(b),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

/// Strategy for ordering sibling elements.
///
/// Implementations must derive the key from the element alone, so that a
/// stable sort on the keys is reproducible across runs.
pub trait ChildOrdering {
    type Key: Ord;

    fn key(&self, element: &Element) -> Self::Key;

    fn compare(&self, a: &Element, b: &Element) -> Ordering {
        self.key(a).cmp(&self.key(b))
    }
}

/// Default ordering: tag, then name, then full content
#[derive(Debug, Clone, Copy, Default)]
pub struct ByTagAndName;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChildKey {
    pub tag: String,
    pub name: AbsentLast<String>,
    pub content: String,
}

impl ChildOrdering for ByTagAndName {
    type Key = ChildKey;

    fn key(&self, element: &Element) -> ChildKey {
        ChildKey {
            tag: element.tag().to_string(),
            name: AbsentLast(distinguishing_name(element).map(str::to_string)),
            content: element_to_string(element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> Element {
        Element::new("module").with_attribute("name", name)
    }

    #[test]
    fn test_attribute_order_is_case_sensitive() {
        let upper = Attribute::new("Zeta", "");
        let lower = Attribute::new("alpha", "");
        assert_eq!(compare_attributes(&upper, &lower), Ordering::Less);
        assert_eq!(
            compare_attributes(&Attribute::new("name", "x"), &Attribute::new("severity", "y")),
            Ordering::Less
        );
    }

    #[test]
    fn test_tag_is_primary_key() {
        let a = Element::new("message").with_attribute("key", "a");
        let b = Element::new("module").with_attribute("name", "A");
        assert_eq!(ByTagAndName.compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn test_name_breaks_tag_ties() {
        assert_eq!(
            ByTagAndName.compare(&module("ConstantName"), &module("JavadocMethod")),
            Ordering::Less
        );
    }

    #[test]
    fn test_absent_name_sorts_last() {
        let unnamed = Element::new("module");
        assert_eq!(ByTagAndName.compare(&module("Zzz"), &unnamed), Ordering::Less);
        assert_eq!(ByTagAndName.compare(&unnamed, &module("Aaa")), Ordering::Greater);
    }

    #[test]
    fn test_name_priority_list() {
        let both = Element::new("x")
            .with_attribute("id", "zzz")
            .with_attribute("name", "aaa");
        assert_eq!(distinguishing_name(&both), Some("aaa"));

        let keyed = Element::new("message")
            .with_attribute("id", "zzz")
            .with_attribute("key", "bbb");
        assert_eq!(distinguishing_name(&keyed), Some("bbb"));

        let id_only = Element::new("x").with_attribute("id", "ccc");
        assert_eq!(distinguishing_name(&id_only), Some("ccc"));
    }

    #[test]
    fn test_content_is_final_tie_break() {
        let a = module("Indentation").with_child(
            Element::new("property")
                .with_attribute("name", "basicOffset")
                .with_attribute("value", "2"),
        );
        let b = module("Indentation").with_child(
            Element::new("property")
                .with_attribute("name", "basicOffset")
                .with_attribute("value", "4"),
        );
        assert_eq!(ByTagAndName.compare(&a, &b), Ordering::Less);
        assert_eq!(ByTagAndName.compare(&a, &a.clone()), Ordering::Equal);
    }

    #[test]
    fn test_absent_last_ordering() {
        assert!(AbsentLast(Some(1)) < AbsentLast(Some(2)));
        assert!(AbsentLast(Some(9)) < AbsentLast(None));
        assert_eq!(
            AbsentLast::<i32>(None).cmp(&AbsentLast(None)),
            Ordering::Equal
        );
    }
}
