use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RuleError;

/// Element names a condition can be rendered as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleTag {
    Description,
    Group,
    IfSid,
    IfGroup,
    IfMatchedSid,
    IfMatchedGroup,
    Match,
    Regex,
    DecodedAs,
    Category,
    #[default]
    Field,
    Srcip,
    Dstip,
    User,
    ProgramName,
    Hostname,
    List,
}

/// How a tag's attribute bag reaches the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderClass {
    /// Rendered as `<tag>value</tag>`; stored attributes are dropped.
    ContentOnly,
    /// Rendered as `<tag attrs...>value</tag>`.
    AttributeBearing,
}

/// Attribute names understood by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKey {
    Name,
    Negate,
    Type,
}

/// Values accepted by `negate`.
pub const NEGATE_VALUES: &[&str] = &["yes", "no"];

/// Values accepted by the `type` attribute of `match` and `regex`.
pub const MATCH_TYPES: &[&str] = &["osmatch", "sregex", "pcre2"];

struct TagEntry {
    tag: RuleTag,
    name: &'static str,
    class: RenderClass,
    attributes: &'static [AttributeKey],
    selectable: bool,
}

const NO_ATTRIBUTES: &[AttributeKey] = &[];
const FIELD_ATTRIBUTES: &[AttributeKey] = &[AttributeKey::Name];
const NEGATABLE: &[AttributeKey] = &[AttributeKey::Negate];
const PATTERN_ATTRIBUTES: &[AttributeKey] = &[AttributeKey::Type, AttributeKey::Negate];

macro_rules! tag_entry {
    ($tag:ident, $name:literal, $class:ident, $attrs:expr, $selectable:literal) => {
        TagEntry {
            tag: RuleTag::$tag,
            name: $name,
            class: RenderClass::$class,
            attributes: $attrs,
            selectable: $selectable,
        }
    };
}

// Indexed by `RuleTag as usize`; order must follow the enum declaration.
static TAG_TABLE: [TagEntry; 17] = [
    tag_entry!(Description, "description", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(Group, "group", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(IfSid, "if_sid", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(IfGroup, "if_group", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(IfMatchedSid, "if_matched_sid", AttributeBearing, NO_ATTRIBUTES, false),
    tag_entry!(IfMatchedGroup, "if_matched_group", AttributeBearing, NO_ATTRIBUTES, false),
    tag_entry!(Match, "match", AttributeBearing, PATTERN_ATTRIBUTES, true),
    tag_entry!(Regex, "regex", AttributeBearing, PATTERN_ATTRIBUTES, true),
    tag_entry!(DecodedAs, "decoded_as", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(Category, "category", ContentOnly, NO_ATTRIBUTES, true),
    tag_entry!(Field, "field", AttributeBearing, FIELD_ATTRIBUTES, true),
    tag_entry!(Srcip, "srcip", AttributeBearing, NEGATABLE, true),
    tag_entry!(Dstip, "dstip", AttributeBearing, NEGATABLE, true),
    tag_entry!(User, "user", AttributeBearing, NEGATABLE, true),
    tag_entry!(ProgramName, "program_name", AttributeBearing, NO_ATTRIBUTES, true),
    tag_entry!(Hostname, "hostname", AttributeBearing, NEGATABLE, true),
    tag_entry!(List, "list", AttributeBearing, NO_ATTRIBUTES, true),
];

impl RuleTag {
    /// Every tag, in declaration order.
    pub const ALL: [RuleTag; 17] = [
        RuleTag::Description,
        RuleTag::Group,
        RuleTag::IfSid,
        RuleTag::IfGroup,
        RuleTag::IfMatchedSid,
        RuleTag::IfMatchedGroup,
        RuleTag::Match,
        RuleTag::Regex,
        RuleTag::DecodedAs,
        RuleTag::Category,
        RuleTag::Field,
        RuleTag::Srcip,
        RuleTag::Dstip,
        RuleTag::User,
        RuleTag::ProgramName,
        RuleTag::Hostname,
        RuleTag::List,
    ];

    fn entry(self) -> &'static TagEntry {
        &TAG_TABLE[self as usize]
    }

    /// XML element name.
    pub fn as_str(self) -> &'static str {
        self.entry().name
    }

    pub fn render_class(self) -> RenderClass {
        self.entry().class
    }

    pub fn is_content_only(self) -> bool {
        self.render_class() == RenderClass::ContentOnly
    }

    /// Attribute keys the rule engine accepts on this element.
    pub fn legal_attributes(self) -> &'static [AttributeKey] {
        self.entry().attributes
    }

    pub fn allows(self, key: AttributeKey) -> bool {
        self.legal_attributes().contains(&key)
    }

    /// Tags offered by the interactive picker. The correlation tags
    /// (`if_matched_sid`, `if_matched_group`) are renderable but not listed.
    pub fn selectable() -> impl Iterator<Item = RuleTag> {
        TAG_TABLE
            .iter()
            .filter(|entry| entry.selectable)
            .map(|entry| entry.tag)
    }
}

impl fmt::Display for RuleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleTag {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TAG_TABLE
            .iter()
            .find(|entry| entry.name == s)
            .map(|entry| entry.tag)
            .ok_or_else(|| RuleError::UnknownTag(s.to_string()))
    }
}

impl AttributeKey {
    pub const ALL: [AttributeKey; 3] = [AttributeKey::Name, AttributeKey::Negate, AttributeKey::Type];

    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKey::Name => "name",
            AttributeKey::Negate => "negate",
            AttributeKey::Type => "type",
        }
    }

    /// Enumerated values for the key, or `None` when it takes free text.
    pub fn allowed_values(self) -> Option<&'static [&'static str]> {
        match self {
            AttributeKey::Name => None,
            AttributeKey::Negate => Some(NEGATE_VALUES),
            AttributeKey::Type => Some(MATCH_TYPES),
        }
    }

    /// Value a picker shows while the key is absent from the bag.
    pub fn ui_default(self) -> Option<&'static str> {
        match self {
            AttributeKey::Name => None,
            AttributeKey::Negate => Some("no"),
            AttributeKey::Type => Some("osmatch"),
        }
    }

    pub fn accepts(self, value: &str) -> bool {
        self.allowed_values()
            .map(|values| values.contains(&value))
            .unwrap_or(true)
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttributeKey {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(AttributeKey::Name),
            "negate" => Ok(AttributeKey::Negate),
            "type" => Ok(AttributeKey::Type),
            other => Err(RuleError::UnknownAttribute(other.to_string())),
        }
    }
}
