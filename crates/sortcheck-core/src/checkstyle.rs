//! Checkstyle ordering profile
//!
//! Orders a module's children the way a Checkstyle configuration is usually
//! read: properties first, then nested modules grouped by check category,
//! then messages. Suppression filters that point at a module through an
//! `id` property are placed beside that module.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use tracing::trace;

use crate::compare::{distinguishing_name, AbsentLast, ChildOrdering};
use crate::element::{Attribute, Element, Node};
use crate::serializer::element_to_string;

/// Group of the non-file suppression filters
pub const SUPPRESSION_GROUP: u8 = 15;
/// Group for module names missing from the category table
pub const UNKNOWN_GROUP: u8 = 50;

const MODULE_GROUPS: &[(u8, &[&str])] = &[
    (0, &["Checker"]),
    (
        1, // annotations
        &[
            "AnnotationLocation",
            "AnnotationOnSameLine",
            "AnnotationUseStyle",
            "MissingDeprecated",
            "MissingOverride",
            "PackageAnnotation",
            "SuppressWarnings",
            "SuppressWarningsHolder",
        ],
    ),
    (
        2, // blocks
        &[
            "AvoidNestedBlocks",
            "EmptyBlock",
            "EmptyCatchBlock",
            "LeftCurly",
            "NeedBraces",
            "RightCurly",
        ],
    ),
    (
        3, // class design
        &[
            "DesignForExtension",
            "FinalClass",
            "HideUtilityClassConstructor",
            "InnerTypeLast",
            "InterfaceIsType",
            "MutableException",
            "OneTopLevelClass",
            "SealedShouldHavePermitsList",
            "ThrowsCount",
            "VisibilityModifier",
        ],
    ),
    (
        4, // coding
        &[
            "ArrayTrailingComma",
            "AvoidDoubleBraceInitialization",
            "AvoidInlineConditionals",
            "AvoidNoArgumentSuperConstructorCall",
            "ConstructorsDeclarationGrouping",
            "CovariantEquals",
            "DeclarationOrder",
            "DefaultComesLast",
            "EmptyStatement",
            "EqualsAvoidNull",
            "EqualsHashCode",
            "ExplicitInitialization",
            "FallThrough",
            "FinalLocalVariable",
            "HiddenField",
            "IllegalCatch",
            "IllegalInstantiation",
            "IllegalThrows",
            "IllegalToken",
            "IllegalTokenText",
            "IllegalType",
            "InnerAssignment",
            "MagicNumber",
            "MatchXpath",
            "MissingCtor",
            "MissingNullCaseInSwitch",
            "MissingSwitchDefault",
            "ModifiedControlVariable",
            "MultipleStringLiterals",
            "MultipleVariableDeclarations",
            "NestedForDepth",
            "NestedIfDepth",
            "NestedTryDepth",
            "NoArrayTrailingComma",
            "NoFinalizer",
            "OneStatementPerLine",
            "OverloadMethodsDeclarationOrder",
            "PackageDeclaration",
            "ParameterAssignment",
            "PatternVariableAssignment",
            "RequireThis",
            "ReturnCount",
            "SimplifyBooleanExpression",
            "SimplifyBooleanReturn",
            "StringLiteralEquality",
            "SuperClone",
            "SuperFinalize",
            "UnnecessaryNullCheckWithInstanceOf",
            "UnnecessaryParentheses",
            "UnnecessarySemicolonAfterOuterTypeDeclaration",
            "UnnecessarySemicolonAfterTypeMemberDeclaration",
            "UnnecessarySemicolonInEnumeration",
            "UnnecessarySemicolonInTryWithResources",
            "UnusedCatchParameterShouldBeUnnamed",
            "UnusedLambdaParameterShouldBeUnnamed",
            "UnusedLocalVariable",
            "VariableDeclarationUsageDistance",
            "WhenShouldBeUsed",
        ],
    ),
    (5, &["Header", "MultiFileRegexpHeader", "RegexpHeader"]),
    (
        6, // imports
        &[
            "AvoidStarImport",
            "AvoidStaticImport",
            "CustomImportOrder",
            "IllegalImport",
            "ImportControl",
            "ImportOrder",
            "RedundantImport",
            "UnusedImports",
        ],
    ),
    (
        7, // javadoc
        &[
            "AtclauseOrder",
            "InvalidJavadocPosition",
            "JavadocBlockTagLocation",
            "JavadocContentLocation",
            "JavadocLeadingAsteriskAlign",
            "JavadocMethod",
            "JavadocMissingLeadingAsterisk",
            "JavadocMissingWhitespaceAfterAsterisk",
            "JavadocPackage",
            "JavadocParagraph",
            "JavadocStyle",
            "JavadocTagContinuationIndentation",
            "JavadocType",
            "JavadocVariable",
            "MissingJavadocMethod",
            "MissingJavadocPackage",
            "MissingJavadocType",
            "NonEmptyAtclauseDescription",
            "RequireEmptyLineBeforeBlockTagGroup",
            "SingleLineJavadoc",
            "SummaryJavadoc",
            "WriteTag",
        ],
    ),
    (
        8, // metrics
        &[
            "BooleanExpressionComplexity",
            "ClassDataAbstractionCoupling",
            "ClassFanOutComplexity",
            "CyclomaticComplexity",
            "JavaNCSS",
            "NPathComplexity",
        ],
    ),
    (
        9, // miscellaneous
        &[
            "ArrayTypeStyle",
            "AvoidEscapedUnicodeCharacters",
            "CommentsIndentation",
            "DescendantToken",
            "FinalParameters",
            "Indentation",
            "NewlineAtEndOfFile",
            "NoCodeInFile",
            "OrderedProperties",
            "OuterTypeFilename",
            "TodoComment",
            "TrailingComment",
            "Translation",
            "UncommentedMain",
            "UniqueProperties",
            "UpperEll",
        ],
    ),
    (
        10, // modifiers
        &[
            "ClassMemberImpliedModifier",
            "InterfaceMemberImpliedModifier",
            "ModifierOrder",
            "RedundantModifier",
        ],
    ),
    (
        11, // naming
        &[
            "AbbreviationAsWordInName",
            "AbstractClassName",
            "CatchParameterName",
            "ClassTypeParameterName",
            "ConstantName",
            "IllegalIdentifierName",
            "InterfaceTypeParameterName",
            "LambdaParameterName",
            "LocalFinalVariableName",
            "LocalVariableName",
            "MemberName",
            "MethodName",
            "MethodTypeParameterName",
            "PackageName",
            "ParameterName",
            "PatternVariableName",
            "RecordComponentName",
            "RecordTypeParameterName",
            "StaticVariableName",
            "TypeName",
        ],
    ),
    (
        12, // regexp
        &[
            "Regexp",
            "RegexpMultiline",
            "RegexpOnFilename",
            "RegexpSingleline",
            "RegexpSinglelineJava",
        ],
    ),
    (
        13, // size
        &[
            "AnonInnerLength",
            "ExecutableStatementCount",
            "FileLength",
            "LambdaBodyLength",
            "LineLength",
            "MethodCount",
            "MethodLength",
            "OuterTypeNumber",
            "ParameterNumber",
            "RecordComponentNumber",
        ],
    ),
    (
        14, // whitespace
        &[
            "EmptyForInitializerPad",
            "EmptyForIteratorPad",
            "EmptyLineSeparator",
            "FileTabCharacter",
            "GenericWhitespace",
            "MethodParamPad",
            "NoLineWrap",
            "NoWhitespaceAfter",
            "NoWhitespaceBefore",
            "NoWhitespaceBeforeCaseDefaultColon",
            "OperatorWrap",
            "ParenPad",
            "SeparatorWrap",
            "SingleSpaceSeparator",
            "TypecastParenPad",
            "WhitespaceAfter",
            "WhitespaceAround",
        ],
    ),
    (
        SUPPRESSION_GROUP,
        &[
            "SeverityMatchFilter",
            "SuppressWarningsFilter",
            "SuppressWithNearbyCommentFilter",
            "SuppressWithNearbyTextFilter",
            "SuppressWithPlainTextCommentFilter",
            "SuppressionCommentFilter",
            "SuppressionFilter",
            "SuppressionSingleFilter",
            "SuppressionXpathFilter",
            "SuppressionXpathSingleFilter",
        ],
    ),
    (SUPPRESSION_GROUP + 1, &["BeforeExecutionExclusionFileFilter"]),
    (99, &["TreeWalker"]),
];

// ── Module metadata ────────────────────────────────────────

/// Category group of a Checkstyle module name
pub fn module_group(name: &str) -> u8 {
    MODULE_GROUPS
        .iter()
        .find(|(_, names)| names.contains(&name))
        .map(|(group, _)| *group)
        .unwrap_or(UNKNOWN_GROUP)
}

/// Value of the module's `<property name="id" value="..."/>` child, if any
pub fn module_id(module: &Element) -> Option<&str> {
    module
        .child_elements()
        .filter(|child| child.tag() == "property")
        .find(|child| child.attribute("name") == Some("id"))
        .and_then(|child| child.attribute("value"))
}

fn tag_rank(tag: &str) -> u8 {
    match tag {
        "property" => 0,
        "module" => 1,
        "message" => 2,
        _ => 3,
    }
}

// ── Ordering ───────────────────────────────────────────────

/// Checkstyle ordering, with the id map of the document being sorted
#[derive(Debug, Clone, Default)]
pub struct CheckstyleOrder {
    /// id → name of the (non-suppression) module carrying that id
    targets: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CheckstyleKey {
    pub tag_rank: u8,
    pub tag: String,
    pub group: u8,
    pub name: AbsentLast<String>,
    pub id: AbsentLast<String>,
    pub content: String,
}

impl CheckstyleOrder {
    /// Collect module ids from every module in `root`, skipping suppression
    /// filters. Shared ids resolve to the smallest module name so the map
    /// does not depend on document order.
    pub fn from_tree(root: &Element) -> Self {
        let mut targets = BTreeMap::new();
        collect_targets(root, &mut targets);
        Self { targets }
    }

    /// Module name a suppression filter with this id is ordered as
    pub fn target(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }

    fn module_name_and_group<'a>(&'a self, module: &'a Element) -> (Option<&'a str>, u8) {
        let name = module.attribute("name");
        let group = name.map(module_group).unwrap_or(UNKNOWN_GROUP);
        if group == SUPPRESSION_GROUP {
            if let Some(target) = module_id(module).and_then(|id| self.target(id)) {
                return (Some(target), module_group(target));
            }
        }
        (name, group)
    }
}

fn collect_targets(element: &Element, targets: &mut BTreeMap<String, String>) {
    if element.tag() == "module" {
        if let (Some(name), Some(id)) = (element.attribute("name"), module_id(element)) {
            if module_group(name) != SUPPRESSION_GROUP {
                let entry = targets.entry(id.to_string()).or_insert_with(|| name.to_string());
                if name < entry.as_str() {
                    *entry = name.to_string();
                }
            }
        }
    }
    for child in element.child_elements() {
        collect_targets(child, targets);
    }
}

impl ChildOrdering for CheckstyleOrder {
    type Key = CheckstyleKey;

    fn key(&self, element: &Element) -> CheckstyleKey {
        let (name, group) = if element.tag() == "module" {
            self.module_name_and_group(element)
        } else {
            (distinguishing_name(element), 0)
        };
        let id = if element.tag() == "module" {
            module_id(element)
        } else {
            None
        };
        trace!(
            tag = element.tag(),
            name = name.unwrap_or(""),
            group,
            id = id.unwrap_or(""),
            "checkstyle key"
        );
        CheckstyleKey {
            tag_rank: tag_rank(element.tag()),
            tag: element.tag().to_string(),
            group,
            name: AbsentLast(name.map(str::to_string)),
            id: AbsentLast(id.map(str::to_string)),
            content: element_to_string(element),
        }
    }
}

// ── Value whitespace ───────────────────────────────────────

/// ASCII whitespace only: no-break and other Unicode spaces are content
fn whitespace_run() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[ \t\n\x0B\x0C\r]+").expect("static pattern"))
}

/// Collapse whitespace runs to single spaces in the `value` of every
/// `property` and `message` that is a direct child of a `module`, at any
/// depth of `tree`.
pub fn collapse_values(tree: Element) -> Element {
    let in_module = tree.tag() == "module";
    let (tag, attributes, children) = tree.into_parts();
    let children = children
        .into_iter()
        .map(|child| match child {
            Node::Element(e) => {
                let e = collapse_values(e);
                if in_module && (e.tag() == "property" || e.tag() == "message") {
                    Node::Element(collapse_value_attribute(e))
                } else {
                    Node::Element(e)
                }
            }
            other => other,
        })
        .collect();
    Element::from_parts(tag, attributes, children)
}

fn collapse_value_attribute(element: Element) -> Element {
    let attributes: Vec<Attribute> = element
        .attributes()
        .iter()
        .map(|attr| {
            if attr.name == "value" {
                Attribute::new("value", whitespace_run().replace_all(&attr.value, " "))
            } else {
                attr.clone()
            }
        })
        .collect();
    element.replace_attributes(attributes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> Element {
        Element::new("module").with_attribute("name", name)
    }

    fn with_id(module: Element, id: &str) -> Element {
        module.with_child(
            Element::new("property")
                .with_attribute("name", "id")
                .with_attribute("value", id),
        )
    }

    #[test]
    fn test_module_groups() {
        assert_eq!(module_group("Checker"), 0);
        assert_eq!(module_group("JavadocMethod"), 7);
        assert_eq!(module_group("ConstantName"), 11);
        assert_eq!(module_group("SuppressionXpathSingleFilter"), SUPPRESSION_GROUP);
        assert_eq!(module_group("BeforeExecutionExclusionFileFilter"), 16);
        assert_eq!(module_group("TreeWalker"), 99);
        assert_eq!(module_group("SomeCustomCheck"), UNKNOWN_GROUP);
    }

    #[test]
    fn test_tag_rank_orders_property_module_message() {
        let order = CheckstyleOrder::default();
        let property = Element::new("property").with_attribute("name", "zzz");
        let message = Element::new("message").with_attribute("key", "aaa");
        let m = module("Aaa");
        assert!(order.key(&property) < order.key(&m));
        assert!(order.key(&m) < order.key(&message));
    }

    #[test]
    fn test_groups_before_names() {
        let order = CheckstyleOrder::default();
        assert!(order.key(&module("JavadocMethod")) < order.key(&module("ConstantName")));
        assert!(order.key(&module("LineLength")) < order.key(&module("TreeWalker")));
        assert!(order.key(&module("UnknownCheck")) < order.key(&module("TreeWalker")));
    }

    #[test]
    fn test_same_name_sorts_by_id() {
        let order = CheckstyleOrder::default();
        let a = with_id(module("Regexp"), "noTabs");
        let b = with_id(module("Regexp"), "noTrailing");
        let none = module("Regexp");
        assert!(order.key(&a) < order.key(&b));
        assert!(order.key(&b) < order.key(&none));
    }

    #[test]
    fn test_module_id_lookup() {
        let m = with_id(module("Regexp"), "noTabs");
        assert_eq!(module_id(&m), Some("noTabs"));
        assert_eq!(module_id(&module("Regexp")), None);
    }

    #[test]
    fn test_suppression_filter_follows_target() {
        let tree = module("TreeWalker")
            .with_child(with_id(module("MethodLength"), "longMethods"))
            .with_child(with_id(module("SuppressionXpathSingleFilter"), "longMethods"));
        let order = CheckstyleOrder::from_tree(&tree);
        assert_eq!(order.target("longMethods"), Some("MethodLength"));

        let filter = with_id(module("SuppressionXpathSingleFilter"), "longMethods");
        let key = order.key(&filter);
        assert_eq!(key.group, 13);
        assert_eq!(key.name, AbsentLast(Some("MethodLength".to_string())));
        // the filter lands right after its target, before later size checks
        assert!(order.key(&with_id(module("MethodLength"), "longMethods")) < key);
        assert!(key < order.key(&module("OuterTypeNumber")));
    }

    #[test]
    fn test_unlinked_suppression_filter_keeps_own_group() {
        let order = CheckstyleOrder::default();
        let filter = with_id(module("SuppressionXpathSingleFilter"), "nothing");
        assert_eq!(order.key(&filter).group, SUPPRESSION_GROUP);
    }

    #[test]
    fn test_shared_ids_resolve_to_smallest_name() {
        let tree = module("TreeWalker")
            .with_child(with_id(module("RegexpSingleline"), "dup"))
            .with_child(with_id(module("LineLength"), "dup"));
        let order = CheckstyleOrder::from_tree(&tree);
        assert_eq!(order.target("dup"), Some("LineLength"));
    }

    #[test]
    fn test_collapse_values() {
        let m = module("Regexp")
            .with_child(
                Element::new("property")
                    .with_attribute("name", "format")
                    .with_attribute("value", "a \n\t  b"),
            )
            .with_child(
                Element::new("message")
                    .with_attribute("key", "k")
                    .with_attribute("value", "x  y"),
            )
            .with_child(module("Nested").with_attribute("value", "p   q"));
        let collapsed = collapse_values(m);
        let values: Vec<&str> = collapsed
            .child_elements()
            .filter_map(|e| e.attribute("value"))
            .collect();
        assert_eq!(values, vec!["a b", "x y", "p   q"]);
    }

    #[test]
    fn test_collapse_values_keeps_unicode_spaces() {
        let m = module("Regexp").with_child(
            Element::new("property")
                .with_attribute("name", "format")
                .with_attribute("value", "a\u{A0}\u{A0}b \x0B\x0C c\u{2003}d"),
        );
        let collapsed = collapse_values(m);
        let property = collapsed.child_elements().next().unwrap();
        assert_eq!(property.attribute("value"), Some("a\u{A0}\u{A0}b c\u{2003}d"));
    }

    #[test]
    fn test_collapse_values_reaches_nested_modules() {
        let tree = module("Checker").with_child(
            module("TreeWalker").with_child(
                Element::new("property")
                    .with_attribute("name", "format")
                    .with_attribute("value", "  a  "),
            ),
        );
        let collapsed = collapse_values(tree);
        let walker = collapsed.child_elements().next().unwrap();
        let property = walker.child_elements().next().unwrap();
        assert_eq!(property.attribute("value"), Some(" a "));
    }

    #[test]
    fn test_collapse_values_ignores_non_modules() {
        let p = Element::new("property").with_child(
            Element::new("property").with_attribute("value", "a  b"),
        );
        assert_eq!(collapse_values(p.clone()), p);
    }
}
