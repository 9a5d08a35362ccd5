//! Rendering of a rule header and its conditions into the engine's XML
//! dialect.
//!
//! The output layout is fixed:
//!
//! ```text
//! <rule id="100100" level="5" frequency="8" timeframe="120">
//!     <if_matched_sid>5716</if_matched_sid>
//!     <srcip negate="yes">10.0.0.1</srcip>
//! </rule>
//! ```
//!
//! Content and attribute values are copied verbatim unless
//! [`Escape::Xml`] is requested.

use std::borrow::Cow;

use serde::Serialize;

use crate::condition::Condition;
use crate::rule::RuleHeader;

const INDENT: &str = "    ";

/// Treatment of markup characters in values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Escape {
    /// Values are written as entered. `<`, `&` and `"` can produce
    /// malformed output.
    #[default]
    None,
    /// `&`, `<`, `>` and `"` are replaced by entity references.
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SerializeOptions {
    pub escape: Escape,
}

impl SerializeOptions {
    pub fn escaped() -> Self {
        Self { escape: Escape::Xml }
    }
}

/// Renders the rule with default options.
pub fn serialize(header: &RuleHeader, conditions: &[Condition]) -> String {
    serialize_with(header, conditions, SerializeOptions::default())
}

pub fn serialize_with(
    header: &RuleHeader,
    conditions: &[Condition],
    options: SerializeOptions,
) -> String {
    let body = conditions
        .iter()
        .map(|condition| render_condition(condition, options.escape))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n{}\n</rule>", render_open_tag(header), body)
}

fn render_open_tag(header: &RuleHeader) -> String {
    let mut tag = format!("<rule id=\"{}\" level=\"{}\"", header.id, header.level);
    if let Some(frequency) = header.frequency {
        tag.push_str(&format!(" frequency=\"{}\"", frequency));
    }
    if let Some(timeframe) = header.timeframe {
        tag.push_str(&format!(" timeframe=\"{}\"", timeframe));
    }
    tag.push('>');
    tag
}

fn render_condition(condition: &Condition, escape: Escape) -> String {
    let name = condition.tag.as_str();
    let value = escape_text(&condition.value, escape);

    if condition.tag.is_content_only() {
        return format!("{INDENT}<{name}>{value}</{name}>");
    }

    let mut attrs = String::new();
    for (key, raw) in condition.attributes.iter() {
        if raw.is_empty() {
            continue;
        }
        attrs.push_str(&format!(" {}=\"{}\"", key, escape_text(raw, escape)));
    }

    format!("{INDENT}<{name}{attrs}>{value}</{name}>")
}

fn escape_text(raw: &str, escape: Escape) -> Cow<'_, str> {
    match escape {
        Escape::None => Cow::Borrowed(raw),
        Escape::Xml if !raw.contains(['&', '<', '>', '"']) => Cow::Borrowed(raw),
        Escape::Xml => {
            let mut escaped = String::with_capacity(raw.len() + 8);
            for ch in raw.chars() {
                match ch {
                    '&' => escaped.push_str("&amp;"),
                    '<' => escaped.push_str("&lt;"),
                    '>' => escaped.push_str("&gt;"),
                    '"' => escaped.push_str("&quot;"),
                    other => escaped.push(other),
                }
            }
            Cow::Owned(escaped)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::ConditionPatch;
    use crate::model::ConditionModel;
    use crate::tag::{AttributeKey, RuleTag};
    use test_case::test_case;

    fn single(tag: RuleTag, value: &str, attrs: &[(AttributeKey, &str)]) -> ConditionModel {
        let mut model = ConditionModel::new();
        let id = model.add();
        model.update(id, ConditionPatch::new().tag(tag).value(value));
        for (key, attr) in attrs {
            model.update_attribute(id, *key, Some(*attr));
        }
        model
    }

    fn body_line(model: &ConditionModel) -> String {
        let xml = serialize(&RuleHeader::new(1, 1), model.conditions());
        xml.lines().nth(1).unwrap_or_default().to_string()
    }

    #[test]
    fn empty_rule_keeps_blank_body_line() {
        assert_eq!(
            serialize(&RuleHeader::new(1, 1), &[]),
            "<rule id=\"1\" level=\"1\">\n\n</rule>"
        );
    }

    #[test]
    fn header_attributes_follow_fixed_order() {
        let header = RuleHeader::new(100100, 5).with_timeframe(120).with_frequency(8);
        let xml = serialize(&header, &[]);
        assert!(xml.starts_with(
            "<rule id=\"100100\" level=\"5\" frequency=\"8\" timeframe=\"120\">"
        ));
    }

    #[test]
    fn optional_header_attributes_are_independent() {
        let only_timeframe = serialize(&RuleHeader::new(2, 3).with_timeframe(60), &[]);
        assert!(only_timeframe.starts_with("<rule id=\"2\" level=\"3\" timeframe=\"60\">"));

        let only_frequency = serialize(&RuleHeader::new(2, 3).with_frequency(4), &[]);
        assert!(only_frequency.starts_with("<rule id=\"2\" level=\"3\" frequency=\"4\">"));
    }

    #[test]
    fn out_of_range_numbers_pass_through() {
        let xml = serialize(&RuleHeader::new(-7, 99), &[]);
        assert!(xml.starts_with("<rule id=\"-7\" level=\"99\">"));
    }

    #[test_case(RuleTag::Description, "    <description>x</description>" ; "description")]
    #[test_case(RuleTag::Group, "    <group>x</group>" ; "group")]
    #[test_case(RuleTag::IfSid, "    <if_sid>x</if_sid>" ; "if_sid")]
    #[test_case(RuleTag::IfGroup, "    <if_group>x</if_group>" ; "if_group")]
    #[test_case(RuleTag::DecodedAs, "    <decoded_as>x</decoded_as>" ; "decoded_as")]
    #[test_case(RuleTag::Category, "    <category>x</category>" ; "category")]
    fn content_only_tags_drop_attributes(tag: RuleTag, expected: &str) {
        let model = single(tag, "x", &[(AttributeKey::Name, "y")]);
        assert_eq!(body_line(&model), expected);
    }

    #[test_case(RuleTag::IfMatchedSid, "    <if_matched_sid name=\"y\">x</if_matched_sid>" ; "if_matched_sid")]
    #[test_case(RuleTag::IfMatchedGroup, "    <if_matched_group name=\"y\">x</if_matched_group>" ; "if_matched_group")]
    #[test_case(RuleTag::ProgramName, "    <program_name name=\"y\">x</program_name>" ; "program_name")]
    #[test_case(RuleTag::List, "    <list name=\"y\">x</list>" ; "list")]
    #[test_case(RuleTag::Srcip, "    <srcip name=\"y\">x</srcip>" ; "srcip")]
    fn attribute_bearing_tags_emit_stored_attributes(tag: RuleTag, expected: &str) {
        let model = single(tag, "x", &[(AttributeKey::Name, "y")]);
        assert_eq!(body_line(&model), expected);
    }

    #[test]
    fn field_name_with_and_without_value() {
        let empty = single(RuleTag::Field, "", &[(AttributeKey::Name, "win.eventdata.targetUserName")]);
        assert_eq!(
            body_line(&empty),
            "    <field name=\"win.eventdata.targetUserName\"></field>"
        );

        let filled = single(
            RuleTag::Field,
            "administrator",
            &[(AttributeKey::Name, "win.eventdata.targetUserName")],
        );
        assert_eq!(
            body_line(&filled),
            "    <field name=\"win.eventdata.targetUserName\">administrator</field>"
        );
    }

    #[test]
    fn attributes_render_in_insertion_order() {
        let negate_first = single(
            RuleTag::Regex,
            "^Failed",
            &[(AttributeKey::Negate, "yes"), (AttributeKey::Type, "pcre2")],
        );
        assert_eq!(
            body_line(&negate_first),
            "    <regex negate=\"yes\" type=\"pcre2\">^Failed</regex>"
        );

        let type_first = single(
            RuleTag::Regex,
            "^Failed",
            &[(AttributeKey::Type, "pcre2"), (AttributeKey::Negate, "yes")],
        );
        assert_eq!(
            body_line(&type_first),
            "    <regex type=\"pcre2\" negate=\"yes\">^Failed</regex>"
        );
    }

    #[test]
    fn markup_is_not_escaped_by_default() {
        let model = single(RuleTag::Match, "a<b & \"c\"", &[]);
        assert_eq!(body_line(&model), "    <match>a<b & \"c\"</match>");
    }

    #[test]
    fn xml_escape_is_opt_in() {
        let model = single(RuleTag::Field, "a<b & c>", &[(AttributeKey::Name, "x\"y")]);
        let xml = serialize_with(
            &RuleHeader::new(1, 1),
            model.conditions(),
            SerializeOptions::escaped(),
        );
        assert_eq!(
            xml.lines().nth(1),
            Some("    <field name=\"x&quot;y\">a&lt;b &amp; c&gt;</field>")
        );
    }

    #[test]
    fn serialization_is_idempotent() {
        let model = single(RuleTag::User, "root", &[(AttributeKey::Negate, "yes")]);
        let header = RuleHeader::new(100100, 5).with_frequency(8).with_timeframe(120);

        let first = serialize(&header, model.conditions());
        let second = serialize(&header, model.conditions());
        assert_eq!(first, second);
    }
}
